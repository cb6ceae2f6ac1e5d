pub mod engine;
pub mod history;

pub use engine::{
    compute_all_periods, compute_period_metrics, compute_symbol_report, validate_prices,
    LookbackPeriod, MetricsError, MetricsRecord, SymbolData, SymbolReport, UnderlyingReport,
};
pub use history::{dividend_frequency, price_history, DividendFrequency};
