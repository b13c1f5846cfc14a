use std::fmt::Write;

const BAR_CHAR: char = '\u{2587}';

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
    pub total: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// Non-finite samples are ignored.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Histogram {
            bins: Vec::new(),
            total: 0,
        };
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    if width == 0.0 {
        return Histogram {
            bins: vec![Bin {
                low: min,
                high: max,
                count: finite.len(),
            }],
            total: finite.len(),
        };
    }

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            low: min + width * i as f64,
            high: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in &finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }

    Histogram {
        bins: out,
        total: finite.len(),
    }
}

pub fn render_histogram(hist: &Histogram, bar_width: usize) -> String {
    let mut out = String::new();
    if hist.total == 0 {
        let _ = writeln!(out, "no samples");
        return out;
    }

    let peak = hist.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &hist.bins {
        let pct = bin.count as f64 * 100.0 / hist.total as f64;
        let len = (bin.count as f64 / peak as f64 * bar_width as f64).round() as usize;
        let bar: String = std::iter::repeat_n(BAR_CHAR, len).collect();
        let _ = writeln!(
            out,
            "{:>9.3} - {:<9.3} {:>5.1}% {:>6} {}",
            bin.low, bin.high, pct, bin.count, bar
        );
    }
    out
}
