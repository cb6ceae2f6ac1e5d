pub mod collect;
pub mod sparkline;
pub mod table;

pub use collect::{collect_report_data, ReportEntry, ReportMetadata};
pub use sparkline::sparkline;
pub use table::print_report;
