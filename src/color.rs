#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Cool sequential ramp, sampled at 0.1 intervals: purple through cyan to
/// yellow-green.
const STOPS: &[(f64, Rgb)] = &[
    (0.0, Rgb(0x6e, 0x40, 0xaa)),
    (0.1, Rgb(0x60, 0x54, 0xc8)),
    (0.2, Rgb(0x4c, 0x6e, 0xdb)),
    (0.3, Rgb(0x36, 0x8c, 0xe1)),
    (0.4, Rgb(0x23, 0xab, 0xd8)),
    (0.5, Rgb(0x1a, 0xc7, 0xc2)),
    (0.6, Rgb(0x1d, 0xdf, 0xa3)),
    (0.7, Rgb(0x30, 0xef, 0x82)),
    (0.8, Rgb(0x52, 0xf6, 0x67)),
    (0.9, Rgb(0x7f, 0xf6, 0x58)),
    (1.0, Rgb(0xaf, 0xf0, 0x5b)),
];

/// Sequential color scale over a fixed two-endpoint domain. The domain may
/// run high-to-low; the first endpoint always maps to the first ramp stop.
/// Out-of-domain values clamp to the nearest endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    domain: [f64; 2],
}

impl ColorScale {
    pub fn new(domain: [f64; 2]) -> Self {
        Self { domain }
    }

    pub fn color(&self, value: f64) -> Rgb {
        let [d0, d1] = self.domain;
        let t = if (d1 - d0).abs() < f64::EPSILON {
            0.0
        } else {
            (value - d0) / (d1 - d0)
        };
        sample(t.clamp(0.0, 1.0))
    }

    pub fn hex(&self, value: f64) -> String {
        self.color(value).to_hex()
    }
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    let value = a as f64 + (b as f64 - a as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}

fn sample(t: f64) -> Rgb {
    for window in STOPS.windows(2) {
        let (left_pos, left) = window[0];
        let (right_pos, right) = window[1];
        if t >= left_pos && t <= right_pos {
            let span = (right_pos - left_pos).max(f64::EPSILON);
            let local = (t - left_pos) / span;
            return Rgb(
                lerp_u8(left.0, right.0, local),
                lerp_u8(left.1, right.1, local),
                lerp_u8(left.2, right.2, local),
            );
        }
    }

    STOPS.last().map(|(_, color)| *color).unwrap_or(Rgb(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_endpoints_hit_ramp_ends() {
        let scale = ColorScale::new([30.0, -10.0]);
        // Inverted domain: the warm endpoint maps to the first (purple) stop.
        assert_eq!(scale.color(30.0), Rgb(0x6e, 0x40, 0xaa));
        assert_eq!(scale.color(-10.0), Rgb(0xaf, 0xf0, 0x5b));
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let scale = ColorScale::new([30.0, -10.0]);
        assert_eq!(scale.color(50.0), scale.color(30.0));
        assert_eq!(scale.color(-40.0), scale.color(-10.0));
    }

    #[test]
    fn midpoint_lands_mid_ramp() {
        let scale = ColorScale::new([30.0, -10.0]);
        assert_eq!(scale.color(10.0), Rgb(0x1a, 0xc7, 0xc2));
    }

    #[test]
    fn natural_domain_runs_the_same_ramp_forward() {
        let inverted = ColorScale::new([30.0, -10.0]);
        let natural = ColorScale::new([-10.0, 30.0]);
        assert_eq!(inverted.color(30.0), natural.color(-10.0));
        assert_eq!(inverted.color(-10.0), natural.color(30.0));
    }

    #[test]
    fn hex_output_is_lowercase_six_digit() {
        assert_eq!(Rgb(0x6e, 0x40, 0xaa).to_hex(), "#6e40aa");
        assert_eq!(Rgb(0, 0, 0).to_hex(), "#000000");
    }

    #[test]
    fn degenerate_domain_is_first_stop() {
        let scale = ColorScale::new([5.0, 5.0]);
        assert_eq!(scale.color(5.0), Rgb(0x6e, 0x40, 0xaa));
    }
}
