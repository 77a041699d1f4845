//! Terminal histogram of simulated valuations

use console::style;

use crate::cli::helpers::format_number;
use crate::core::summary::HistogramBin;

const BAR_MAX_WIDTH: usize = 50;

/// Render histogram bins as horizontal bars
///
/// Bins whose center falls inside `[low, high]` (the p10..p90 band) are drawn
/// solid, the tails hatched.
pub fn render_histogram(bins: &[HistogramBin], low: f64, high: f64) -> String {
    if bins.is_empty() {
        return "  (no data)".to_string();
    }
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let total: usize = bins.iter().map(|b| b.count).sum();

    let mut lines = Vec::with_capacity(bins.len() + 3);
    lines.push(format!(
        "   {} ({} values, {} bins):",
        style("Valuation Distribution").bold(),
        total,
        bins.len()
    ));
    lines.push(String::new());

    for bin in bins {
        let bar_width = bin.count * BAR_MAX_WIDTH / max_count;
        let center = bin.center();
        let in_band = center >= low && center <= high;

        let bar = if in_band {
            style("█".repeat(bar_width)).green()
        } else {
            style("░".repeat(bar_width)).red()
        };
        let padding = " ".repeat(BAR_MAX_WIDTH - bar_width);

        lines.push(format!(
            "   {:>16} │{}{}│ {:>6}",
            format_number(center),
            bar,
            padding,
            bin.count
        ));
    }

    lines.push(format!("   {:>16} └{}┘", "", "─".repeat(BAR_MAX_WIDTH)));
    lines.push(format!(
        "   {} p10={}  p90={}  (█ inside, ░ tails)",
        style("Legend:").dim(),
        format_number(low),
        format_number(high)
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::summary::histogram;

    #[test]
    fn test_render_histogram_rows() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = histogram(&values, 5);
        let out = render_histogram(&bins, 10.0, 90.0);
        assert!(out.contains("100 values, 5 bins"));
        assert_eq!(out.lines().filter(|l| l.contains('│')).count(), 5);
    }

    #[test]
    fn test_render_empty_histogram() {
        assert_eq!(render_histogram(&[], 0.0, 1.0), "  (no data)");
    }
}
