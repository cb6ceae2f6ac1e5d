//a Rust-based dividend and total-return tracker for ETFs and stocks

pub mod config;
pub mod dashboard;
pub mod data;
pub mod fetch;
pub mod metrics;
pub mod report;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, SymbolEntry};
    pub use crate::dashboard::{build_payload, write_dashboard, DashboardPayload};
    pub use crate::data::{AggBar, DataStore, DividendEvent, DividendRecord, PricePoint};
    pub use crate::fetch::{run_fetch, PolygonClient};
    pub use crate::metrics::{
        compute_all_periods, compute_period_metrics, compute_symbol_report, LookbackPeriod,
        MetricsRecord, SymbolData, SymbolReport,
    };
    pub use crate::report::{collect_report_data, print_report, ReportEntry, ReportMetadata};
}
