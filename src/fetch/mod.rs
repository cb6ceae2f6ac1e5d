pub mod client;
pub mod update;

pub use client::{FetchError, PolygonClient};
pub use update::{fetch_date_range, run_fetch};
