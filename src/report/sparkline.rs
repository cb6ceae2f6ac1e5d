use chrono::NaiveDate;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

//mini unicode chart of a close series, sampled down to a fixed width
pub fn sparkline(history: &[(NaiveDate, f64)], width: usize) -> String {
    if history.len() < 2 || width == 0 {
        return " ".repeat(width);
    }

    let values: Vec<f64> = history.iter().map(|(_, close)| *close).collect();

    //sample evenly when the series is wider than the chart
    let sampled: Vec<f64> = if values.len() > width {
        let step = values.len() as f64 / width as f64;
        (0..width)
            .map(|i| values[(i as f64 * step) as usize])
            .collect()
    } else {
        values
    };

    let min = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return "─".repeat(sampled.len());
    }

    sampled
        .iter()
        .map(|value| {
            let level = ((value - min) / (max - min) * (BLOCKS.len() - 1) as f64) as usize;
            BLOCKS[level.min(BLOCKS.len() - 1)]
        })
        .collect()
}
