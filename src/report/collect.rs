use crate::config::AppConfig;
use crate::data::DataStore;
use crate::metrics::{
    compute_symbol_report, dividend_frequency, price_history, DividendFrequency, LookbackPeriod,
    SymbolData, SymbolReport,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{error, info};
use rayon::prelude::*;

//everything the renderers need for one symbol
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub symbol: String,
    pub report: SymbolReport,
    pub price_history: Vec<(NaiveDate, f64)>,
    pub dividend_frequency: Option<DividendFrequency>,
}

//context about the run, shared by the console report and the dashboard
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    pub analysis_date: String,
    pub generated_at: String,
    pub symbol_count: usize,
    pub requested_symbol_count: usize,
    pub skipped_symbols: Vec<String>,
    pub periods: Vec<&'static str>,
}

//loads cached series for every configured symbol and runs the metrics engine
//symbols are independent, so the per-symbol work runs in parallel
pub fn collect_report_data(
    config: &AppConfig,
    store: &DataStore,
) -> Result<(Vec<ReportEntry>, ReportMetadata)> {
    let run_timestamp = Local::now();

    let results: Vec<(String, Option<ReportEntry>)> = config
        .symbols
        .par_iter()
        .map(|entry| {
            let symbol = entry.symbol().to_string();
            match build_entry(store, &symbol, entry.underlying()) {
                Ok(Some(report_entry)) => (symbol, Some(report_entry)),
                Ok(None) => {
                    info!("no price data for {}, skipping", symbol);
                    (symbol, None)
                }
                Err(err) => {
                    error!("failed to analyze {}: {:#}", symbol, err);
                    (symbol, None)
                }
            }
        })
        .collect();

    let mut entries = Vec::new();
    let mut skipped_symbols = Vec::new();
    for (symbol, entry) in results {
        match entry {
            Some(entry) => entries.push(entry),
            None => skipped_symbols.push(symbol),
        }
    }

    entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    skipped_symbols.sort();

    let metadata = ReportMetadata {
        analysis_date: run_timestamp.format("%B %d, %Y").to_string(),
        generated_at: run_timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
        symbol_count: entries.len(),
        requested_symbol_count: config.symbols.len(),
        skipped_symbols,
        periods: LookbackPeriod::ALL.iter().map(|p| p.label()).collect(),
    };

    Ok((entries, metadata))
}

fn build_entry(
    store: &DataStore,
    symbol: &str,
    underlying: Option<&str>,
) -> Result<Option<ReportEntry>> {
    let prices = store.load_price_points(symbol)?;
    if prices.is_empty() {
        return Ok(None);
    }
    let dividends = store.load_dividend_events(symbol)?;

    let primary = SymbolData {
        symbol: symbol.to_string(),
        prices,
        dividends,
    };

    //resolve the underlying's own series when a linkage is declared;
    //an underlying with no cached prices is treated as absent
    let underlying_data = match underlying {
        Some(underlying_symbol) => {
            let prices = store.load_price_points(underlying_symbol)?;
            if prices.is_empty() {
                info!(
                    "no price data for underlying {} of {}",
                    underlying_symbol, symbol
                );
                None
            } else {
                Some(SymbolData {
                    symbol: underlying_symbol.to_string(),
                    prices,
                    dividends: store.load_dividend_events(underlying_symbol)?,
                })
            }
        }
        None => None,
    };

    let report = compute_symbol_report(&primary, underlying_data.as_ref())?;

    let as_of_date = report.as_of_date.unwrap_or(NaiveDate::MIN);
    let history = price_history(&primary.prices, 12, as_of_date);
    let frequency = dividend_frequency(&primary.dividends, as_of_date);

    Ok(Some(ReportEntry {
        symbol: symbol.to_string(),
        report,
        price_history: history,
        dividend_frequency: frequency,
    }))
}
