use crate::data::series::{
    to_dividend_events, to_price_points, AggBar, DividendEvent, DividendRecord, PricePoint,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

//local json cache of fetched price and dividend history, one file per ticker
//saves merge with whatever is already on disk so re-fetches are incremental
pub struct DataStore {
    prices_dir: PathBuf,
    dividends_dir: PathBuf,
}

impl DataStore {
    //opens the store, creating the directory layout if needed
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let prices_dir = data_dir.join("prices");
        let dividends_dir = data_dir.join("dividends");

        fs::create_dir_all(&prices_dir)
            .context(format!("Failed to create directory {:?}", prices_dir))?;
        fs::create_dir_all(&dividends_dir)
            .context(format!("Failed to create directory {:?}", dividends_dir))?;

        Ok(DataStore {
            prices_dir,
            dividends_dir,
        })
    }

    fn price_file(&self, ticker: &str) -> PathBuf {
        self.prices_dir.join(format!("{}_prices.json", ticker))
    }

    fn dividend_file(&self, ticker: &str) -> PathBuf {
        self.dividends_dir.join(format!("{}_dividends.json", ticker))
    }

    //merges new price bars into the cached file, keyed by bar timestamp
    pub fn save_prices(&self, ticker: &str, bars: &[AggBar]) -> Result<usize> {
        let path = self.price_file(ticker);

        let mut merged: BTreeMap<i64, AggBar> = self
            .load_prices(ticker)?
            .into_iter()
            .map(|bar| (bar.t, bar))
            .collect();

        for bar in bars {
            merged.insert(bar.t, bar.clone());
        }

        let records: Vec<&AggBar> = merged.values().collect();
        write_json(&path, &records)?;

        info!("saved {} price records for {}", records.len(), ticker);
        Ok(records.len())
    }

    //merges new dividend records into the cached file, keyed by ex-dividend date
    pub fn save_dividends(&self, ticker: &str, dividends: &[DividendRecord]) -> Result<usize> {
        let path = self.dividend_file(ticker);

        let mut merged: BTreeMap<String, DividendRecord> = self
            .load_dividends(ticker)?
            .into_iter()
            .map(|record| (record.ex_dividend_date.clone(), record))
            .collect();

        for record in dividends {
            merged.insert(record.ex_dividend_date.clone(), record.clone());
        }

        let records: Vec<&DividendRecord> = merged.values().collect();
        write_json(&path, &records)?;

        info!("saved {} dividend records for {}", records.len(), ticker);
        Ok(records.len())
    }

    //loads cached price bars, empty when nothing has been fetched yet
    pub fn load_prices(&self, ticker: &str) -> Result<Vec<AggBar>> {
        read_json(&self.price_file(ticker))
    }

    //loads cached dividend records, empty when nothing has been fetched yet
    pub fn load_dividends(&self, ticker: &str) -> Result<Vec<DividendRecord>> {
        read_json(&self.dividend_file(ticker))
    }

    //cached price series as the sorted, de-duplicated close series
    pub fn load_price_points(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        Ok(to_price_points(&self.load_prices(ticker)?))
    }

    //cached dividend series as sorted events
    pub fn load_dividend_events(&self, ticker: &str) -> Result<Vec<DividendEvent>> {
        Ok(to_dividend_events(&self.load_dividends(ticker)?))
    }

    //date coverage of the cached price data, for incremental-update logging
    pub fn price_date_range(&self, ticker: &str) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let points = self.load_price_points(ticker)?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        })
    }

    //date coverage of the cached dividend data
    pub fn dividend_date_range(&self, ticker: &str) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let events = self.load_dividend_events(ticker)?;
        Ok(match (events.first(), events.last()) {
            (Some(first), Some(last)) => Some((first.ex_dividend_date, last.ex_dividend_date)),
            _ => None,
        })
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).context(format!("Failed to write {:?}", path))?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents =
        fs::read_to_string(path).context(format!("Failed to read cache file {:?}", path))?;
    serde_json::from_str(&contents).context(format!("Failed to parse cache file {:?}", path))
}
