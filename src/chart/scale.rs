/// Linear mapping from a data domain onto a pixel range.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A domain that is empty, inverted or not finite collapses to `[0, 1]`
    /// so an empty dataset still yields a drawable chart.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (d0, d1) = domain;
        let domain = if d0.is_finite() && d1.is_finite() && d1 > d0 {
            domain
        } else {
            (0.0, 1.0)
        };
        Self { domain, range }
    }

    /// Domain `[0, max * headroom]`; missing `max` gives the unit domain.
    pub fn from_max(max: Option<f64>, headroom: f64, range: (f64, f64)) -> Self {
        Self::new((0.0, max.unwrap_or(0.0) * headroom), range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        let step = tick_step(start, stop, count);
        if step <= 0.0 || !step.is_finite() {
            return Vec::new();
        }
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }

    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.domain.0, self.domain.1, count)
    }
}

/// Step between roughly `count` ticks over `[start, stop]`, always 1, 2 or
/// 5 times a power of ten.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if count == 0 || span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let raw = span / count as f64;
    let mut step = 10f64.powf(raw.log10().floor());
    let error = raw / step;
    if error >= 50f64.sqrt() {
        step *= 10.0;
    } else if error >= 10f64.sqrt() {
        step *= 5.0;
    } else if error >= 2f64.sqrt() {
        step *= 2.0;
    }
    step
}

/// Tick label with just enough decimals for the tick step.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    format!("{value:.decimals$}")
}
