pub mod series;
pub mod store;

pub use series::{
    to_dividend_events, to_price_points, AggBar, DividendEvent, DividendRecord, PricePoint,
};
pub use store::DataStore;
