use chrono::{Datelike, NaiveDate};

/// Tick-step thresholds: steps snap to 1, 2, 5 times a power of ten.
const SQRT_50: f64 = 7.0710678118654755;
const SQRT_10: f64 = 3.1622776601683795;
const SQRT_2: f64 = 1.4142135623730951;

/// Linear mapping from a numeric domain onto a pixel range. The domain may
/// run high-to-low (the legend axis does).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Round the domain outward to tick-step multiples.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let reversed = d1 < d0;
        let (mut lo, mut hi) = if reversed { (d1, d0) } else { (d0, d1) };

        if (hi - lo).abs() < f64::EPSILON {
            return self;
        }

        let step = tick_increment(lo, hi, count.max(1) as f64);
        if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            let inv = -step;
            lo = (lo * inv).floor() / inv;
            hi = (hi * inv).ceil() / inv;
        }

        self.domain = if reversed { (hi, lo) } else { (lo, hi) };
        self
    }

    /// Roughly `count` round values covering the domain, in domain order.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let reversed = d1 < d0;
        let (lo, hi) = if reversed { (d1, d0) } else { (d0, d1) };

        if (hi - lo).abs() < f64::EPSILON || count == 0 {
            return vec![lo];
        }

        let step = tick_increment(lo, hi, count as f64);
        let mut ticks = Vec::new();
        if step > 0.0 {
            let start = (lo / step).ceil();
            let stop = (hi / step).floor();
            let mut i = start;
            while i <= stop {
                ticks.push(i * step);
                i += 1.0;
            }
        } else if step < 0.0 {
            let inv = -step;
            let start = (lo * inv).ceil();
            let stop = (hi * inv).floor();
            let mut i = start;
            while i <= stop {
                ticks.push(i / inv);
                i += 1.0;
            }
        }

        if reversed {
            ticks.reverse();
        }
        ticks
    }
}

/// Positive return is the step itself; negative is the reciprocal of the
/// step, used when the step would be a sub-unit fraction.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(1.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);

    let factor = if error >= SQRT_50 {
        10.0
    } else if error >= SQRT_10 {
        5.0
    } else if error >= SQRT_2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Axis label for a tick value: whole ticks print without a decimal point.
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Ordinal scale placing one band per label across the range, with 10%
/// padding inside and out.
#[derive(Debug, Clone)]
pub struct BandScale {
    labels: Vec<String>,
    step: f64,
    bandwidth: f64,
    start: f64,
}

impl BandScale {
    pub fn new(labels: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = labels.len() as f64;
        let span = range.1 - range.0;
        let step = span / (n + padding).max(1.0);
        let bandwidth = step * (1.0 - padding);
        let start = range.0 + step * padding;
        Self { labels, step, bandwidth, start }
    }

    /// Left edge of the band for the i-th label.
    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Year-boundary ticks for the trend chart's time axis: at most roughly
/// `count` of them, stepped by a round number of years.
pub fn year_ticks(start: NaiveDate, stop: NaiveDate, count: usize) -> Vec<NaiveDate> {
    if stop < start {
        return Vec::new();
    }

    let span_years = (stop.year() - start.year()).max(0) as f64;
    let raw_step = (span_years / count.max(1) as f64).max(1.0);
    let step = nice_year_step(raw_step);

    let first = {
        let y = start.year();
        let rem = y.rem_euclid(step);
        if rem == 0 { y } else { y + (step - rem) }
    };

    let mut ticks = Vec::new();
    let mut year = first;
    while year <= stop.year() {
        if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
            if date >= start && date <= stop {
                ticks.push(date);
            }
        }
        year += step;
    }
    ticks
}

fn nice_year_step(raw: f64) -> i32 {
    let mut magnitude = 1.0;
    loop {
        for factor in [1.0, 2.0, 5.0] {
            let candidate = factor * magnitude;
            if candidate >= raw {
                return candidate as i32;
            }
        }
        magnitude *= 10.0;
    }
}

/// Bar chart tick labels longer than this are shortened with an ellipsis.
pub const MAX_TICK_LABEL: usize = 10;

pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_TICK_LABEL {
        let head: String = label.chars().take(MAX_TICK_LABEL).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale_maps_endpoints() {
        let scale = LinearScale::new((0.0, 10.0), (100.0, 300.0));
        assert_eq!(scale.scale(0.0), 100.0);
        assert_eq!(scale.scale(10.0), 300.0);
        assert_eq!(scale.scale(5.0), 200.0);
    }

    #[test]
    fn inverted_range_flips_direction() {
        // The y axis of a chart: larger values land higher (smaller pixel y).
        let scale = LinearScale::new((0.0, 10.0), (470.0, 20.0));
        assert!(scale.scale(10.0) < scale.scale(0.0));
    }

    #[test]
    fn nice_rounds_outward() {
        let scale = LinearScale::new((0.13, 9.87), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain, (0.0, 10.0));
    }

    #[test]
    fn nice_keeps_descending_domains_descending() {
        let scale = LinearScale::new((9.87, 0.13), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain, (10.0, 0.0));
    }

    #[test]
    fn ticks_are_round_and_cover_the_domain() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn legend_domain_produces_descending_ticks() {
        let scale = LinearScale::new((30.0, -10.0), (0.0, 200.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks, vec![30.0, 20.0, 10.0, 0.0, -10.0]);
    }

    #[test]
    fn fractional_domains_get_fractional_steps() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks.len(), 6);
        for (tick, expected) in ticks.iter().zip([0.0, 0.2, 0.4, 0.6, 0.8, 1.0]) {
            assert!((tick - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn tick_labels_drop_trailing_zeroes() {
        assert_eq!(format_tick(30.0), "30");
        assert_eq!(format_tick(-10.0), "-10");
        assert_eq!(format_tick(0.5), "0.5");
    }

    #[test]
    fn band_scale_divides_the_range() {
        let labels = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let scale = BandScale::new(labels, (0.0, 410.0), 0.1);
        // step = 410 / 4.1 = 100
        assert!((scale.position(1) - scale.position(0) - 100.0).abs() < 1e-9);
        assert!((scale.bandwidth() - 90.0).abs() < 1e-9);
        assert!((scale.position(0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn band_scale_with_no_labels_is_harmless() {
        let scale = BandScale::new(Vec::new(), (0.0, 100.0), 0.1);
        assert!(scale.labels().is_empty());
        assert!(scale.bandwidth() >= 0.0);
    }

    #[test]
    fn year_ticks_step_by_round_years() {
        let start = NaiveDate::from_ymd_opt(1863, 5, 1).unwrap();
        let stop = NaiveDate::from_ymd_opt(2013, 9, 1).unwrap();
        let ticks = year_ticks(start, stop, 12);
        // 150-year span at 12 ticks steps by 20 years.
        assert_eq!(ticks.first().unwrap().year(), 1880);
        assert_eq!(ticks.last().unwrap().year(), 2000);
        assert!(ticks.windows(2).all(|w| w[1].year() - w[0].year() == 20));
    }

    #[test]
    fn year_ticks_handle_short_spans() {
        let start = NaiveDate::from_ymd_opt(2000, 2, 1).unwrap();
        let stop = NaiveDate::from_ymd_opt(2003, 11, 1).unwrap();
        let ticks = year_ticks(start, stop, 12);
        assert_eq!(
            ticks.iter().map(|d| d.year()).collect::<Vec<_>>(),
            vec![2001, 2002, 2003]
        );
    }

    #[test]
    fn long_labels_truncate_with_ellipsis() {
        assert_eq!(truncate_label("Uttarakhand"), "Uttarakhan...");
        assert_eq!(truncate_label("Delhi"), "Delhi");
        assert_eq!(truncate_label("Maharashtr"), "Maharashtr");
    }
}
