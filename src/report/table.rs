use crate::metrics::{LookbackPeriod, MetricsRecord, UnderlyingReport};
use crate::report::collect::{ReportEntry, ReportMetadata};
use crate::report::sparkline::sparkline;
use prettytable::{Cell, Row, Table};

const CHART_WIDTH: usize = 20;

//prints the console report: one row per symbol with a 12-month sparkline
//and the 6/12-month return metrics, plus a comparison row for symbols
//that declare an underlying
pub fn print_report(entries: &[ReportEntry], metadata: &ReportMetadata) {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("Symbol"),
        Cell::new("Chart (12m)"),
        Cell::new("Price Δ 6m"),
        Cell::new("Div 6m ($+%)"),
        Cell::new("Total 6m"),
        Cell::new("✓ 6m"),
        Cell::new("Price Δ 12m"),
        Cell::new("Div 12m ($+%)"),
        Cell::new("Total 12m"),
        Cell::new("✓ 12m"),
    ]));

    for entry in entries {
        let m6 = entry.report.metrics.get(&LookbackPeriod::SixMonths);
        let m12 = entry.report.metrics.get(&LookbackPeriod::TwelveMonths);

        table.add_row(Row::new(vec![
            Cell::new(&entry.symbol),
            Cell::new(&sparkline(&entry.price_history, CHART_WIDTH)),
            Cell::new(&fmt_pct(m6.and_then(|r| r.price_change_pct))),
            Cell::new(&fmt_dividend(m6)),
            Cell::new(&fmt_pct(m6.and_then(|r| r.total_return_pct))),
            Cell::new(&fmt_flag(m6.and_then(|r| r.profitable_total))),
            Cell::new(&fmt_pct(m12.and_then(|r| r.price_change_pct))),
            Cell::new(&fmt_dividend(m12)),
            Cell::new(&fmt_pct(m12.and_then(|r| r.total_return_pct))),
            Cell::new(&fmt_flag(m12.and_then(|r| r.profitable_total))),
        ]));

        if let Some(underlying) = &entry.report.underlying {
            table.add_row(underlying_row(underlying));
        }
    }

    println!(
        "\nDividend Report — {} ({} of {} symbols)",
        metadata.analysis_date, metadata.symbol_count, metadata.requested_symbol_count
    );
    table.printstd();

    if !metadata.skipped_symbols.is_empty() {
        println!(
            "Skipped symbols (no price data): {}",
            metadata.skipped_symbols.join(", ")
        );
    }

    println!("\nLegend:");
    println!("  Price Δ: price change percentage over the period");
    println!("  Div: total dividends received (and yield on the start price)");
    println!("  Total: total return (price change + dividends)");
    println!("  ✓: profitable on total return, ✗: not profitable");
    println!("  vs: underlying comparison, ▲ marks periods where the underlying outperformed");
}

fn underlying_row(underlying: &UnderlyingReport) -> Row {
    let m6 = underlying.metrics.get(&LookbackPeriod::SixMonths);
    let m12 = underlying.metrics.get(&LookbackPeriod::TwelveMonths);

    Row::new(vec![
        Cell::new(&format!("  vs {}", underlying.symbol)),
        Cell::new(""),
        Cell::new(&fmt_pct(m6.and_then(|r| r.price_change_pct))),
        Cell::new(&fmt_dividend(m6)),
        Cell::new(&fmt_pct(m6.and_then(|r| r.total_return_pct))),
        Cell::new(&fmt_outperforms(underlying, LookbackPeriod::SixMonths)),
        Cell::new(&fmt_pct(m12.and_then(|r| r.price_change_pct))),
        Cell::new(&fmt_dividend(m12)),
        Cell::new(&fmt_pct(m12.and_then(|r| r.total_return_pct))),
        Cell::new(&fmt_outperforms(underlying, LookbackPeriod::TwelveMonths)),
    ])
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{:.2}%", v),
        Some(v) => format!("{:.2}%", v),
        None => "N/A".to_string(),
    }
}

fn fmt_dividend(record: Option<&MetricsRecord>) -> String {
    let amount = record.and_then(|r| r.total_dividends);
    let yield_pct = record.and_then(|r| r.dividend_yield_pct);
    match (amount, yield_pct) {
        (Some(amount), Some(yield_pct)) => format!("${:.2} ({:.1}%)", amount, yield_pct),
        (Some(amount), None) => format!("${:.2}", amount),
        _ => "N/A".to_string(),
    }
}

fn fmt_flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "✓".to_string(),
        Some(false) => "✗".to_string(),
        None => "N/A".to_string(),
    }
}

fn fmt_outperforms(underlying: &UnderlyingReport, period: LookbackPeriod) -> String {
    match underlying.outperforms.get(&period) {
        Some(true) => "▲".to_string(),
        Some(false) => "▽".to_string(),
        None => "N/A".to_string(),
    }
}
