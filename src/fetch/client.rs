use crate::data::{AggBar, DividendRecord};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;

const BASE_URL: &str = "https://api.polygon.io";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Polygon returned status {status} for {endpoint}")]
    Status {
        status: reqwest::StatusCode,
        endpoint: String,
    },
}

#[derive(Debug, Deserialize)]
struct DividendsResponse {
    #[serde(default)]
    results: Vec<DividendRecord>,
}

//polygon omits the results array entirely for tickers with no bars
#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    #[serde(default)]
    results: Vec<AggBar>,
}

//polygon.io client with a minimum interval between requests so the
//free-tier per-minute quota is never exceeded
pub struct PolygonClient {
    http: reqwest::blocking::Client,
    api_key: String,
    min_request_interval: Duration,
    last_request: Option<Instant>,
}

impl PolygonClient {
    pub fn new(api_key: String, requests_per_minute: u32) -> Self {
        let requests_per_minute = requests_per_minute.max(1);
        PolygonClient {
            http: reqwest::blocking::Client::new(),
            api_key,
            min_request_interval: Duration::from_secs_f64(60.0 / requests_per_minute as f64),
            last_request: None,
        }
    }

    fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_request_interval {
                let wait = self.min_request_interval - elapsed;
                debug!("rate limiting: sleeping for {:.2}s", wait.as_secs_f64());
                std::thread::sleep(wait);
            }
        }
        self.last_request = Some(Instant::now());
    }

    fn get<T: serde::de::DeserializeOwned>(
        &mut self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        self.rate_limit();

        info!("requesting {}", endpoint);

        let response = self
            .http
            .get(format!("{}{}", BASE_URL, endpoint))
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response.json()?)
    }

    //dividend history for a ticker, optionally bounded by ex-dividend date
    pub fn get_dividends(
        &mut self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DividendRecord>, FetchError> {
        let mut params = vec![
            ("ticker", ticker.to_string()),
            ("limit", "1000".to_string()),
        ];
        if let Some(start) = start_date {
            params.push(("ex_dividend_date.gte", start.to_string()));
        }
        if let Some(end) = end_date {
            params.push(("ex_dividend_date.lte", end.to_string()));
        }

        let response: DividendsResponse = self.get("/v3/reference/dividends", &params)?;
        Ok(response.results)
    }

    //daily adjusted price bars for a ticker over a date range
    pub fn get_aggregates(
        &mut self,
        ticker: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<AggBar>, FetchError> {
        let endpoint = format!(
            "/v2/aggs/ticker/{}/range/1/day/{}/{}",
            ticker, from_date, to_date
        );
        let params = vec![
            ("adjusted", "true".to_string()),
            ("sort", "asc".to_string()),
            ("limit", "50000".to_string()),
        ];

        let response: AggregatesResponse = self.get(&endpoint, &params)?;
        Ok(response.results)
    }
}
