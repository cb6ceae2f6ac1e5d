use crate::config::AppConfig;
use crate::data::DataStore;
use crate::fetch::client::PolygonClient;
use anyhow::Result;
use chrono::{Local, Months, NaiveDate};
use log::{error, info, warn};

//date range the fetch pass requests, measured back from today in calendar months
pub fn fetch_date_range(lookback_months: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today
        .checked_sub_months(Months::new(lookback_months))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

//updates the local cache for every configured symbol and declared underlying
//a failure on one ticker is logged and does not abort the rest of the pass
pub fn run_fetch(config: &AppConfig, store: &DataStore, client: &mut PolygonClient) -> Result<()> {
    let today = Local::now().date_naive();
    let (start_date, end_date) = fetch_date_range(config.fetch_lookback_months, today);

    let universe = config.fetch_universe();
    info!(
        "fetching {} symbols (including underlyings) from {} to {}",
        universe.len(),
        start_date,
        end_date
    );

    let underlying_map = config.underlying_map();
    for (symbol, underlying) in &underlying_map {
        info!("underlying mapping: {} -> {}", symbol, underlying);
    }

    let mut failed = Vec::new();
    for ticker in &universe {
        if let Err(err) = fetch_symbol(client, store, ticker, start_date, end_date) {
            error!("failed to process {}: {:#}", ticker, err);
            failed.push(ticker.clone());
        }
    }

    if failed.is_empty() {
        info!("data fetch complete for all {} symbols", universe.len());
    } else {
        warn!(
            "data fetch complete, {} of {} symbols failed: {}",
            failed.len(),
            universe.len(),
            failed.join(", ")
        );
    }

    Ok(())
}

fn fetch_symbol(
    client: &mut PolygonClient,
    store: &DataStore,
    ticker: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<()> {
    info!("processing {}", ticker);

    match store.price_date_range(ticker)? {
        Some((from, to)) => info!("existing price data: {} to {}", from, to),
        None => info!("no existing price data"),
    }
    match store.dividend_date_range(ticker)? {
        Some((from, to)) => info!("existing dividend data: {} to {}", from, to),
        None => info!("no existing dividend data"),
    }

    let dividends = client.get_dividends(ticker, Some(start_date), Some(end_date))?;
    if dividends.is_empty() {
        info!("no dividends found for {}", ticker);
    } else {
        store.save_dividends(ticker, &dividends)?;
    }

    let prices = client.get_aggregates(ticker, start_date, end_date)?;
    if prices.is_empty() {
        warn!("no price data found for {}", ticker);
    } else {
        store.save_prices(ticker, &prices)?;
    }

    Ok(())
}
