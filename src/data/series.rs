use chrono::{DateTime, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};

//a single daily close, the engine's view of one trading day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

//a single dividend payment keyed by its ex-dividend date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DividendEvent {
    pub ex_dividend_date: NaiveDate,
    pub cash_amount: f64,
}

impl DividendEvent {
    pub fn new(ex_dividend_date: NaiveDate, cash_amount: f64) -> Self {
        DividendEvent {
            ex_dividend_date,
            cash_amount,
        }
    }
}

//raw polygon aggregate bar as fetched and cached
//t is the bar timestamp in epoch milliseconds, c the adjusted close
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggBar {
    pub t: i64,
    #[serde(default)]
    pub o: f64,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub l: f64,
    pub c: f64,
    #[serde(default)]
    pub v: f64,
}

impl AggBar {
    //converts the millisecond timestamp to a calendar date (utc)
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(self.t).map(|dt| dt.date_naive())
    }
}

//raw polygon dividend record as fetched and cached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DividendRecord {
    pub ex_dividend_date: String,
    #[serde(default)]
    pub cash_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
}

//converts cached bars into the sorted, de-duplicated close series the engine expects
//two bars mapping to the same calendar date collapse to the later one
pub fn to_price_points(bars: &[AggBar]) -> Vec<PricePoint> {
    let mut points: Vec<(NaiveDate, f64)> = Vec::with_capacity(bars.len());

    for bar in bars {
        match bar.date() {
            Some(date) => points.push((date, bar.c)),
            None => warn!("skipping price bar with invalid timestamp {}", bar.t),
        }
    }

    points.sort_by_key(|(date, _)| *date);

    let mut series: Vec<PricePoint> = Vec::with_capacity(points.len());
    for (date, close) in points {
        match series.last_mut() {
            Some(last) if last.date == date => last.close = close,
            _ => series.push(PricePoint::new(date, close)),
        }
    }

    series
}

//converts cached dividend records into sorted events, skipping unparseable dates
pub fn to_dividend_events(records: &[DividendRecord]) -> Vec<DividendEvent> {
    let mut events: Vec<DividendEvent> = Vec::with_capacity(records.len());

    for record in records {
        match record.ex_dividend_date.parse::<NaiveDate>() {
            Ok(date) if record.cash_amount >= 0.0 => {
                events.push(DividendEvent::new(date, record.cash_amount));
            }
            Ok(_) => warn!(
                "skipping dividend with negative amount {} on {}",
                record.cash_amount, record.ex_dividend_date
            ),
            Err(_) => warn!(
                "skipping dividend with invalid ex-dividend date '{}'",
                record.ex_dividend_date
            ),
        }
    }

    events.sort_by_key(|event| event.ex_dividend_date);
    events
}
