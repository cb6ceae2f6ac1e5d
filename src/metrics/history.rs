use crate::data::{DividendEvent, PricePoint};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

//trailing close series for sparklines and the dashboard price chart
pub fn price_history(
    prices: &[PricePoint],
    months: u32,
    as_of_date: NaiveDate,
) -> Vec<(NaiveDate, f64)> {
    let window_start = as_of_date
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);

    prices
        .iter()
        .filter(|p| p.date >= window_start && p.date <= as_of_date)
        .map(|p| (p.date, p.close))
        .collect()
}

//payout cadence, classified from the trailing-twelve-month event count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividendFrequency {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "quarterly")]
    Quarterly,
    #[serde(rename = "semi-annual")]
    SemiAnnual,
    #[serde(rename = "annual")]
    Annual,
    #[serde(rename = "irregular")]
    Irregular,
}

impl DividendFrequency {
    pub fn label(&self) -> &'static str {
        match self {
            DividendFrequency::Monthly => "monthly",
            DividendFrequency::Quarterly => "quarterly",
            DividendFrequency::SemiAnnual => "semi-annual",
            DividendFrequency::Annual => "annual",
            DividendFrequency::Irregular => "irregular",
        }
    }
}

//none when no dividends fell in the trailing twelve months
pub fn dividend_frequency(
    dividends: &[DividendEvent],
    as_of_date: NaiveDate,
) -> Option<DividendFrequency> {
    let window_start = as_of_date
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);

    let count = dividends
        .iter()
        .filter(|d| d.ex_dividend_date >= window_start && d.ex_dividend_date <= as_of_date)
        .count();

    match count {
        0 => None,
        1 => Some(DividendFrequency::Annual),
        2 => Some(DividendFrequency::SemiAnnual),
        3..=5 => Some(DividendFrequency::Quarterly),
        //monthly payers occasionally land 11 or 13 ex-dates in a window
        10..=13 => Some(DividendFrequency::Monthly),
        _ => Some(DividendFrequency::Irregular),
    }
}
