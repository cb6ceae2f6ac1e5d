use chrono::NaiveDate;
use divtrack::config::{AppConfig, SymbolEntry};
use divtrack::dashboard::build_payload;
use divtrack::data::{AggBar, DataStore, DividendRecord};
use divtrack::report::collect_report_data;
use std::path::PathBuf;

fn bar(date: NaiveDate, close: f64) -> AggBar {
    AggBar {
        t: date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis(),
        o: close,
        h: close,
        l: close,
        c: close,
        v: 10_000.0,
    }
}

fn dividend(date: &str, amount: f64) -> DividendRecord {
    DividendRecord {
        ex_dividend_date: date.to_string(),
        cash_amount: amount,
        declaration_date: None,
        record_date: None,
        pay_date: None,
        frequency: Some(4),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn monthly_bars(first: NaiveDate, months: u32, start_close: f64, drift: f64) -> Vec<AggBar> {
    (0..months)
        .map(|i| {
            let d = first
                .checked_add_months(chrono::Months::new(i))
                .unwrap();
            bar(d, start_close + drift * i as f64)
        })
        .collect()
}

fn config(data_dir: PathBuf, symbols: Vec<SymbolEntry>) -> AppConfig {
    AppConfig {
        polygon_api_key: "test-key".to_string(),
        rate_limit_requests_per_minute: 5,
        data_directory: data_dir,
        fetch_lookback_months: 24,
        symbols,
    }
}

#[test]
fn report_pipeline_produces_sorted_entries_and_skips_missing_data() {
    let dir = tempfile::tempdir().unwrap();
    let store = DataStore::open(dir.path()).unwrap();

    store
        .save_prices("SCHD", &monthly_bars(date(2022, 1, 1), 16, 74.0, 0.5))
        .unwrap();
    store
        .save_dividends(
            "SCHD",
            &[
                dividend("2022-06-22", 0.70),
                dividend("2022-09-21", 0.64),
                dividend("2022-12-07", 0.70),
                dividend("2023-03-22", 0.60),
            ],
        )
        .unwrap();
    store
        .save_prices("VYM", &monthly_bars(date(2022, 1, 1), 16, 105.0, -0.2))
        .unwrap();

    let config = config(
        dir.path().to_path_buf(),
        vec![
            SymbolEntry::Plain("VYM".to_string()),
            SymbolEntry::Plain("SCHD".to_string()),
            SymbolEntry::Plain("MISSING".to_string()),
        ],
    );

    let (entries, metadata) = collect_report_data(&config, &store).unwrap();

    // alphabetical regardless of configuration order
    let symbols: Vec<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["SCHD", "VYM"]);

    assert_eq!(metadata.symbol_count, 2);
    assert_eq!(metadata.requested_symbol_count, 3);
    assert_eq!(metadata.skipped_symbols, vec!["MISSING"]);
    assert_eq!(metadata.periods, vec!["3m", "6m", "12m"]);

    let schd = &entries[0];
    assert_eq!(schd.report.as_of_date, Some(date(2023, 4, 1)));
    // one ex-date per quarter over the trailing year
    assert_eq!(schd.dividend_frequency.map(|f| f.label()), Some("quarterly"));
    // 12-month window of the 16-month series
    assert_eq!(schd.price_history.len(), 13);

    let twelve = &schd.report.metrics[&divtrack::metrics::LookbackPeriod::TwelveMonths];
    // 2022-06 through 2023-03 ex-dates fall inside the 12m window
    assert_eq!(twelve.total_dividends, Some(0.70 + 0.64 + 0.70 + 0.60));
}

#[test]
fn underlying_resolution_flows_into_dashboard_payload() {
    let dir = tempfile::tempdir().unwrap();
    let store = DataStore::open(dir.path()).unwrap();

    store
        .save_prices("SGOL", &monthly_bars(date(2022, 1, 1), 16, 18.0, 0.05))
        .unwrap();
    store
        .save_prices("GLD", &monthly_bars(date(2022, 1, 1), 16, 170.0, 3.0))
        .unwrap();

    let config = config(
        dir.path().to_path_buf(),
        vec![SymbolEntry::Linked {
            symbol: "SGOL".to_string(),
            underlying: Some("GLD".to_string()),
        }],
    );

    let (entries, metadata) = collect_report_data(&config, &store).unwrap();
    let payload = build_payload(&entries, &metadata);
    let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

    let symbol = &json["symbols"][0];
    assert_eq!(symbol["symbol"], "SGOL");
    assert_eq!(symbol["underlying"]["symbol"], "GLD");

    // metric maps are keyed by period label, records keep wire field names
    assert!(symbol["metrics"]["3m"]["total_return_pct"].is_number());
    assert!(symbol["underlying"]["metrics"]["12m"]["total_return_pct"].is_number());
    assert!(symbol["underlying"]["outperforms"]["12m"].is_boolean());

    // camelcase envelope
    assert!(json["metadata"]["analysisDate"].is_string());
    assert!(json["metadata"]["generatedAt"].is_string());
    assert_eq!(json["metadata"]["symbolCount"], 1);
    assert!(symbol["priceHistory"].is_array());
    assert!(symbol["priceHistory"][0][0].is_string());
    assert!(symbol["priceHistory"][0][1].is_number());
}

#[test]
fn symbol_without_underlying_omits_the_field_in_payload() {
    let dir = tempfile::tempdir().unwrap();
    let store = DataStore::open(dir.path()).unwrap();

    store
        .save_prices("JEPI", &monthly_bars(date(2022, 6, 1), 11, 54.0, 0.1))
        .unwrap();

    let config = config(
        dir.path().to_path_buf(),
        vec![SymbolEntry::Plain("JEPI".to_string())],
    );

    let (entries, metadata) = collect_report_data(&config, &store).unwrap();
    let payload = build_payload(&entries, &metadata);
    let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

    let symbol = &json["symbols"][0];
    assert!(symbol.get("underlying").is_none());
    assert!(symbol["dividendFrequency"].is_null());

    // 11 months of data: the 12m record is the all-null variant
    assert!(symbol["metrics"]["12m"]["total_return_pct"].is_null());
    assert!(symbol["metrics"]["6m"]["total_return_pct"].is_number());
}

#[test]
fn declared_underlying_without_cached_data_is_treated_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = DataStore::open(dir.path()).unwrap();

    store
        .save_prices("SGOL", &monthly_bars(date(2022, 1, 1), 16, 18.0, 0.05))
        .unwrap();

    let config = config(
        dir.path().to_path_buf(),
        vec![SymbolEntry::Linked {
            symbol: "SGOL".to_string(),
            underlying: Some("GLD".to_string()),
        }],
    );

    let (entries, _) = collect_report_data(&config, &store).unwrap();

    assert!(entries[0].report.underlying.is_none());
}
