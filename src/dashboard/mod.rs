pub mod builder;
pub mod payload;

pub use builder::{write_dashboard, GLOBAL_DATA_VAR};
pub use payload::{build_payload, DashboardPayload, SymbolPayload, UnderlyingPayload};
