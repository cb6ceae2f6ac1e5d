use crate::metrics::{DividendFrequency, LookbackPeriod, MetricsRecord};
use crate::report::collect::{ReportEntry, ReportMetadata};
use indexmap::IndexMap;
use serde::Serialize;

//top-level shape of the exported dashboard data
//outer keys are camelcase for the client-side app; the records inside
//`metrics` keep their snake_case wire names
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub metadata: DashboardMetadata,
    pub symbols: Vec<SymbolPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetadata {
    pub analysis_date: String,
    pub generated_at: String,
    pub symbol_count: usize,
    pub requested_symbol_count: usize,
    pub skipped_symbols: Vec<String>,
    pub periods: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolPayload {
    pub symbol: String,
    pub dividend_frequency: Option<DividendFrequency>,
    //[[yyyy-mm-dd, close], ...]
    pub price_history: Vec<(String, f64)>,
    pub metrics: IndexMap<LookbackPeriod, MetricsRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying: Option<UnderlyingPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderlyingPayload {
    pub symbol: String,
    pub metrics: IndexMap<LookbackPeriod, MetricsRecord>,
    pub outperforms: IndexMap<LookbackPeriod, bool>,
}

pub fn build_payload(entries: &[ReportEntry], metadata: &ReportMetadata) -> DashboardPayload {
    let symbols = entries
        .iter()
        .map(|entry| SymbolPayload {
            symbol: entry.symbol.clone(),
            dividend_frequency: entry.dividend_frequency,
            price_history: entry
                .price_history
                .iter()
                .map(|(date, close)| (date.to_string(), *close))
                .collect(),
            metrics: entry.report.metrics.clone(),
            underlying: entry
                .report
                .underlying
                .as_ref()
                .map(|u| UnderlyingPayload {
                    symbol: u.symbol.clone(),
                    metrics: u.metrics.clone(),
                    outperforms: u.outperforms.clone(),
                }),
        })
        .collect();

    DashboardPayload {
        metadata: DashboardMetadata {
            analysis_date: metadata.analysis_date.clone(),
            generated_at: metadata.generated_at.clone(),
            symbol_count: metadata.symbol_count,
            requested_symbol_count: metadata.requested_symbol_count,
            skipped_symbols: metadata.skipped_symbols.clone(),
            periods: metadata.periods.clone(),
        },
        symbols,
    }
}
