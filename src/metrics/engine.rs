use crate::data::{DividendEvent, PricePoint};
use chrono::{Months, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Price series out of order for {symbol}: {prev} followed by {next}")]
    UnsortedPrices {
        symbol: String,
        prev: NaiveDate,
        next: NaiveDate,
    },
    #[error("Duplicate price date for {symbol}: {date}")]
    DuplicatePriceDate { symbol: String, date: NaiveDate },
}

//trailing window length, measured in calendar months back from the latest price date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackPeriod {
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "12m")]
    TwelveMonths,
}

impl LookbackPeriod {
    pub const ALL: [LookbackPeriod; 3] = [
        LookbackPeriod::ThreeMonths,
        LookbackPeriod::SixMonths,
        LookbackPeriod::TwelveMonths,
    ];

    pub fn months(&self) -> u32 {
        match self {
            LookbackPeriod::ThreeMonths => 3,
            LookbackPeriod::SixMonths => 6,
            LookbackPeriod::TwelveMonths => 12,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookbackPeriod::ThreeMonths => "3m",
            LookbackPeriod::SixMonths => "6m",
            LookbackPeriod::TwelveMonths => "12m",
        }
    }
}

//per-symbol, per-period return metrics
//field names are the wire schema consumed by the dashboard, do not rename
//every data field is optional: the all-none variant means the window is not
//covered by the available data, and downstream renderers show "n/a"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsRecord {
    pub period_months: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_price: Option<f64>,
    pub end_price: Option<f64>,
    pub price_change: Option<f64>,
    pub price_change_pct: Option<f64>,
    pub total_dividends: Option<f64>,
    pub dividend_yield_pct: Option<f64>,
    pub total_return: Option<f64>,
    pub total_return_pct: Option<f64>,
    pub profitable_price: Option<bool>,
    pub profitable_total: Option<bool>,
}

impl MetricsRecord {
    //the unavailable variant: the window is not covered by the data
    pub fn unavailable(period: LookbackPeriod) -> Self {
        MetricsRecord {
            period_months: period.months(),
            start_date: None,
            end_date: None,
            start_price: None,
            end_price: None,
            price_change: None,
            price_change_pct: None,
            total_dividends: None,
            dividend_yield_pct: None,
            total_return: None,
            total_return_pct: None,
            profitable_price: None,
            profitable_total: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.start_price.is_some()
    }
}

//input series for one symbol, sorted ascending with unique dates
//(the store produces series in this shape; see validate_prices)
#[derive(Debug, Clone)]
pub struct SymbolData {
    pub symbol: String,
    pub prices: Vec<PricePoint>,
    pub dividends: Vec<DividendEvent>,
}

//full engine output for one symbol: one record per lookback period,
//plus the same computation for the linked underlying when present
#[derive(Debug, Clone, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub as_of_date: Option<NaiveDate>,
    pub metrics: IndexMap<LookbackPeriod, MetricsRecord>,
    pub underlying: Option<UnderlyingReport>,
}

//metrics of the reference asset an etf-like symbol tracks, computed over the
//primary symbol's as-of date so the comparison stays period-aligned
#[derive(Debug, Clone, Serialize)]
pub struct UnderlyingReport {
    pub symbol: String,
    pub metrics: IndexMap<LookbackPeriod, MetricsRecord>,
    //per period, true when the underlying's total return beats the primary's;
    //absent when either side's record is unavailable
    pub outperforms: IndexMap<LookbackPeriod, bool>,
}

//last price point dated at or before target, none when all points are later
fn price_at_or_before(prices: &[PricePoint], target: NaiveDate) -> Option<&PricePoint> {
    let idx = prices.partition_point(|p| p.date <= target);
    if idx == 0 {
        None
    } else {
        Some(&prices[idx - 1])
    }
}

//checks the caller-side sorting precondition without correcting it:
//silently re-sorting here would hide an upstream bug
pub fn validate_prices(symbol: &str, prices: &[PricePoint]) -> Result<(), MetricsError> {
    for pair in prices.windows(2) {
        if pair[1].date == pair[0].date {
            return Err(MetricsError::DuplicatePriceDate {
                symbol: symbol.to_string(),
                date: pair[0].date,
            });
        }
        if pair[1].date < pair[0].date {
            return Err(MetricsError::UnsortedPrices {
                symbol: symbol.to_string(),
                prev: pair[0].date,
                next: pair[1].date,
            });
        }
    }
    Ok(())
}

//computes the return metrics for one lookback window
//pure over the supplied series: no io, no sorting, no panics on data gaps
pub fn compute_period_metrics(
    prices: &[PricePoint],
    dividends: &[DividendEvent],
    period: LookbackPeriod,
    as_of_date: NaiveDate,
) -> MetricsRecord {
    //calendar-month subtraction, normalized to a valid date at month end
    let window_start = match as_of_date.checked_sub_months(Months::new(period.months())) {
        Some(date) => date,
        None => return MetricsRecord::unavailable(period),
    };

    let end = price_at_or_before(prices, as_of_date);
    let start = price_at_or_before(prices, window_start);

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        //no price at or before the window start: report the period as
        //unavailable rather than computing from partial data
        _ => return MetricsRecord::unavailable(period),
    };

    let total_dividends: f64 = dividends
        .iter()
        .filter(|d| d.ex_dividend_date >= start.date && d.ex_dividend_date <= end.date)
        .map(|d| d.cash_amount)
        .sum();

    let mut record = MetricsRecord {
        period_months: period.months(),
        start_date: Some(start.date),
        end_date: Some(end.date),
        start_price: Some(start.close),
        end_price: Some(end.close),
        price_change: Some(end.close - start.close),
        price_change_pct: None,
        total_dividends: Some(total_dividends),
        dividend_yield_pct: None,
        total_return: Some(end.close - start.close + total_dividends),
        total_return_pct: None,
        profitable_price: None,
        profitable_total: None,
    };

    //a zero start price cannot anchor a percentage; leave those fields unset
    if start.close == 0.0 {
        return record;
    }

    let price_change_pct = (end.close - start.close) / start.close * 100.0;
    //yield over the start price, not a trailing average: observed upstream
    //convention, kept for output compatibility
    let dividend_yield_pct = total_dividends / start.close * 100.0;
    let total_return_pct = price_change_pct + dividend_yield_pct;

    record.price_change_pct = Some(price_change_pct);
    record.dividend_yield_pct = Some(dividend_yield_pct);
    record.total_return_pct = Some(total_return_pct);
    record.profitable_price = Some(end.close - start.close > 0.0);
    record.profitable_total = Some(total_return_pct > 0.0);

    record
}

//one record per configured lookback period; periods are independent
pub fn compute_all_periods(
    prices: &[PricePoint],
    dividends: &[DividendEvent],
    as_of_date: NaiveDate,
) -> IndexMap<LookbackPeriod, MetricsRecord> {
    LookbackPeriod::ALL
        .iter()
        .map(|&period| {
            (
                period,
                compute_period_metrics(prices, dividends, period, as_of_date),
            )
        })
        .collect()
}

//computes a symbol's full report and, when its reference asset's data is
//supplied, the underlying's own metrics over the primary's as-of date
pub fn compute_symbol_report(
    primary: &SymbolData,
    underlying: Option<&SymbolData>,
) -> Result<SymbolReport, MetricsError> {
    validate_prices(&primary.symbol, &primary.prices)?;
    if let Some(underlying) = underlying {
        validate_prices(&underlying.symbol, &underlying.prices)?;
    }

    let as_of_date = match primary.prices.last() {
        Some(point) => point.date,
        //empty series: every period unavailable, no comparison possible
        None => {
            return Ok(SymbolReport {
                symbol: primary.symbol.clone(),
                as_of_date: None,
                metrics: LookbackPeriod::ALL
                    .iter()
                    .map(|&p| (p, MetricsRecord::unavailable(p)))
                    .collect(),
                underlying: None,
            })
        }
    };

    let metrics = compute_all_periods(&primary.prices, &primary.dividends, as_of_date);

    let underlying = underlying.map(|data| {
        //same as_of_date as the primary, not the underlying's own latest
        //price, so both sides measure the identical window
        let underlying_metrics = compute_all_periods(&data.prices, &data.dividends, as_of_date);

        let mut outperforms = IndexMap::new();
        for period in LookbackPeriod::ALL {
            let primary_return = metrics.get(&period).and_then(|r| r.total_return_pct);
            let underlying_return = underlying_metrics
                .get(&period)
                .and_then(|r| r.total_return_pct);

            if let (Some(primary_return), Some(underlying_return)) =
                (primary_return, underlying_return)
            {
                outperforms.insert(period, underlying_return > primary_return);
            }
        }

        UnderlyingReport {
            symbol: data.symbol.clone(),
            metrics: underlying_metrics,
            outperforms,
        }
    });

    Ok(SymbolReport {
        symbol: primary.symbol.clone(),
        as_of_date: Some(as_of_date),
        metrics,
        underlying,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn prices(points: &[(i32, u32, u32, f64)]) -> Vec<PricePoint> {
        points
            .iter()
            .map(|&(y, m, d, close)| PricePoint::new(date(y, m, d), close))
            .collect()
    }

    #[test]
    fn three_month_price_only_return() {
        let prices = prices(&[(2023, 1, 1, 100.0), (2023, 4, 1, 110.0)]);
        let record = compute_period_metrics(
            &prices,
            &[],
            LookbackPeriod::ThreeMonths,
            date(2023, 4, 1),
        );

        assert_eq!(record.start_date, Some(date(2023, 1, 1)));
        assert_eq!(record.end_date, Some(date(2023, 4, 1)));
        assert!((record.price_change_pct.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(record.dividend_yield_pct, Some(0.0));
        assert!((record.total_return_pct.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(record.profitable_total, Some(true));
    }

    #[test]
    fn dividend_adds_to_total_return() {
        let prices = prices(&[(2023, 1, 1, 100.0), (2023, 4, 1, 110.0)]);
        let dividends = vec![DividendEvent::new(date(2023, 2, 1), 2.0)];

        let record = compute_period_metrics(
            &prices,
            &dividends,
            LookbackPeriod::ThreeMonths,
            date(2023, 4, 1),
        );

        assert_eq!(record.total_dividends, Some(2.0));
        assert!((record.dividend_yield_pct.unwrap() - 2.0).abs() < 1e-9);
        assert!((record.total_return_pct.unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn no_dividends_in_window_is_zero_not_null() {
        let prices = prices(&[(2022, 12, 20, 50.0), (2023, 4, 1, 45.0)]);
        //dividend before the window start must not count
        let dividends = vec![DividendEvent::new(date(2022, 11, 1), 1.0)];

        let record = compute_period_metrics(
            &prices,
            &dividends,
            LookbackPeriod::ThreeMonths,
            date(2023, 4, 1),
        );

        assert_eq!(record.total_dividends, Some(0.0));
        assert_eq!(record.dividend_yield_pct, Some(0.0));
        assert_eq!(record.profitable_total, Some(false));
    }

    #[test]
    fn dividends_on_boundary_dates_are_included() {
        let prices = prices(&[(2023, 1, 1, 100.0), (2023, 4, 1, 100.0)]);
        let dividends = vec![
            DividendEvent::new(date(2023, 1, 1), 0.5),
            DividendEvent::new(date(2023, 4, 1), 0.5),
        ];

        let record = compute_period_metrics(
            &prices,
            &dividends,
            LookbackPeriod::ThreeMonths,
            date(2023, 4, 1),
        );

        assert_eq!(record.total_dividends, Some(1.0));
    }

    #[test]
    fn window_start_uses_calendar_months_not_fixed_days() {
        //3 months before 2023-03-31 normalizes to 2022-12-31,
        //not the 90-day approximation 2022-12-30
        let prices = prices(&[(2022, 12, 31, 100.0), (2023, 3, 31, 105.0)]);
        let record = compute_period_metrics(
            &prices,
            &[],
            LookbackPeriod::ThreeMonths,
            date(2023, 3, 31),
        );

        assert_eq!(record.start_date, Some(date(2022, 12, 31)));
    }

    #[test]
    fn start_point_is_at_or_before_window_start_never_after() {
        //window start 2023-01-01 falls between two points: the earlier wins
        let prices = prices(&[(2022, 12, 28, 100.0), (2023, 1, 3, 101.0), (2023, 4, 1, 102.0)]);
        let record = compute_period_metrics(
            &prices,
            &[],
            LookbackPeriod::ThreeMonths,
            date(2023, 4, 1),
        );

        assert_eq!(record.start_date, Some(date(2022, 12, 28)));
        assert_eq!(record.start_price, Some(100.0));
    }

    #[test]
    fn uncovered_window_yields_unavailable_record() {
        //all prices are after the 12-month window start
        let prices = prices(&[(2023, 1, 1, 100.0), (2023, 4, 1, 110.0)]);
        let record = compute_period_metrics(
            &prices,
            &[],
            LookbackPeriod::TwelveMonths,
            date(2023, 4, 1),
        );

        assert_eq!(record, MetricsRecord::unavailable(LookbackPeriod::TwelveMonths));
        assert_eq!(record.period_months, 12);
        assert!(!record.is_available());
    }

    #[test]
    fn empty_price_series_is_unavailable() {
        let record =
            compute_period_metrics(&[], &[], LookbackPeriod::SixMonths, date(2023, 4, 1));
        assert!(!record.is_available());
    }

    #[test]
    fn zero_start_price_nulls_percentages_without_panicking() {
        let prices = prices(&[(2023, 1, 1, 0.0), (2023, 4, 1, 10.0)]);
        let dividends = vec![DividendEvent::new(date(2023, 2, 1), 1.0)];

        let record = compute_period_metrics(
            &prices,
            &dividends,
            LookbackPeriod::ThreeMonths,
            date(2023, 4, 1),
        );

        assert_eq!(record.start_price, Some(0.0));
        assert_eq!(record.price_change_pct, None);
        assert_eq!(record.dividend_yield_pct, None);
        assert_eq!(record.total_return_pct, None);
        assert_eq!(record.profitable_total, None);
        //the dividend sum itself is still reportable
        assert_eq!(record.total_dividends, Some(1.0));
    }

    #[test]
    fn total_return_is_sum_of_price_and_dividend_return() {
        let prices = prices(&[
            (2022, 3, 15, 80.0),
            (2022, 9, 1, 90.0),
            (2023, 1, 5, 85.0),
            (2023, 4, 1, 95.0),
        ]);
        let dividends = vec![
            DividendEvent::new(date(2022, 6, 1), 0.7),
            DividendEvent::new(date(2022, 12, 1), 0.7),
            DividendEvent::new(date(2023, 3, 1), 0.8),
        ];

        for period in LookbackPeriod::ALL {
            let record = compute_period_metrics(&prices, &dividends, period, date(2023, 4, 1));
            if let (Some(price), Some(yield_pct), Some(total)) = (
                record.price_change_pct,
                record.dividend_yield_pct,
                record.total_return_pct,
            ) {
                assert!((total - (price + yield_pct)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn total_dividends_never_decrease_with_wider_windows() {
        let prices = prices(&[(2022, 1, 1, 100.0), (2022, 8, 1, 101.0), (2023, 4, 1, 103.0)]);
        let dividends = vec![
            DividendEvent::new(date(2022, 5, 1), 0.5),
            DividendEvent::new(date(2022, 11, 1), 0.5),
            DividendEvent::new(date(2023, 2, 1), 0.5),
        ];

        let all = compute_all_periods(&prices, &dividends, date(2023, 4, 1));
        let mut previous = 0.0;
        for period in LookbackPeriod::ALL {
            if let Some(total) = all.get(&period).and_then(|r| r.total_dividends) {
                assert!(total >= previous);
                previous = total;
            }
        }
    }

    #[test]
    fn validate_prices_rejects_out_of_order_input() {
        let prices = prices(&[(2023, 4, 1, 110.0), (2023, 1, 1, 100.0)]);
        let err = validate_prices("BAD", &prices).unwrap_err();
        assert!(matches!(err, MetricsError::UnsortedPrices { .. }));
    }

    #[test]
    fn validate_prices_rejects_duplicate_dates() {
        let prices = prices(&[(2023, 1, 1, 100.0), (2023, 1, 1, 101.0)]);
        let err = validate_prices("BAD", &prices).unwrap_err();
        assert!(matches!(err, MetricsError::DuplicatePriceDate { .. }));
    }

    #[test]
    fn symbol_report_with_empty_prices_has_all_periods_unavailable() {
        let data = SymbolData {
            symbol: "EMPTY".to_string(),
            prices: vec![],
            dividends: vec![],
        };

        let report = compute_symbol_report(&data, None).unwrap();

        assert_eq!(report.as_of_date, None);
        assert_eq!(report.metrics.len(), 3);
        assert!(report.metrics.values().all(|r| !r.is_available()));
    }

    #[test]
    fn underlying_comparison_uses_primary_as_of_date() {
        let etf = SymbolData {
            symbol: "SGOL".to_string(),
            prices: prices(&[(2023, 1, 1, 18.0), (2023, 4, 1, 19.8)]),
            dividends: vec![],
        };
        //underlying covers the window but its last print is older than the etf's
        let gold = SymbolData {
            symbol: "GLD".to_string(),
            prices: prices(&[(2023, 1, 1, 170.0), (2023, 3, 30, 190.0)]),
            dividends: vec![],
        };

        let report = compute_symbol_report(&etf, Some(&gold)).unwrap();
        let underlying = report.underlying.unwrap();

        //etf: +10%, gold: ~+11.8% measured to the etf's as-of date
        assert_eq!(report.as_of_date, Some(date(2023, 4, 1)));
        assert_eq!(
            underlying.outperforms.get(&LookbackPeriod::ThreeMonths),
            Some(&true)
        );
    }

    #[test]
    fn no_comparison_flag_when_underlying_window_uncovered() {
        let etf = SymbolData {
            symbol: "SGOL".to_string(),
            prices: prices(&[(2023, 1, 1, 18.0), (2023, 4, 1, 19.8)]),
            dividends: vec![],
        };
        //underlying's series starts after the etf's 3-month window start
        let gold = SymbolData {
            symbol: "GLD".to_string(),
            prices: prices(&[(2023, 2, 1, 170.0), (2023, 4, 1, 175.0)]),
            dividends: vec![],
        };

        let report = compute_symbol_report(&etf, Some(&gold)).unwrap();
        let underlying = report.underlying.unwrap();

        assert!(!underlying.metrics[&LookbackPeriod::ThreeMonths].is_available());
        assert!(!underlying
            .outperforms
            .contains_key(&LookbackPeriod::ThreeMonths));
    }
}
