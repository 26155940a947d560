use crate::color::ColorScale;
use crate::config::MapConfig;
use crate::scale::{format_tick, LinearScale};
use std::fmt::Write;

const SWATCH_WIDTH: f64 = 20.0;
const SWATCH_HEIGHT: f64 = 200.0;
/// Room to the right of the swatch for tick marks and labels.
const LABEL_GUTTER: f64 = 45.0;
const TICK_COUNT: usize = 5;

/// Vertical gradient swatch spanning the fixed color domain, with a 5-tick
/// axis on its right labeled in °C. Independent of the observed data range.
pub fn render(cfg: &MapConfig, color: &ColorScale) -> String {
    let [d0, d1] = cfg.color_domain;
    let scale = LinearScale::new((d0, d1), (0.0, SWATCH_HEIGHT));

    let mut s = String::with_capacity(4 << 10);
    let _ = write!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = SWATCH_WIDTH + LABEL_GUTTER,
        h = SWATCH_HEIGHT
    );

    s.push_str("  <defs>\n");
    s.push_str(
        "    <linearGradient id=\"legend-gradient\" x1=\"0%\" y1=\"0%\" x2=\"0%\" y2=\"100%\">\n",
    );
    let _ = write!(
        s,
        "      <stop offset=\"0%\" stop-color=\"{}\"/>\n",
        color.hex(d0)
    );
    let _ = write!(
        s,
        "      <stop offset=\"100%\" stop-color=\"{}\"/>\n",
        color.hex(d1)
    );
    s.push_str("    </linearGradient>\n");
    s.push_str("  </defs>\n");

    let _ = write!(
        s,
        "  <rect width=\"{}\" height=\"{}\" fill=\"url(#legend-gradient)\"/>\n",
        SWATCH_WIDTH, SWATCH_HEIGHT
    );

    s.push_str("  <g font-size=\"10\" fill=\"#333\">\n");
    for tick in scale.ticks(TICK_COUNT) {
        let y = scale.scale(tick);
        let _ = write!(
            s,
            "    <line x1=\"{x0}\" y1=\"{y:.1}\" x2=\"{x1}\" y2=\"{y:.1}\" stroke=\"#333\"/>\n",
            x0 = SWATCH_WIDTH,
            x1 = SWATCH_WIDTH + 6.0,
            y = y
        );
        let _ = write!(
            s,
            "    <text x=\"{x}\" y=\"{y:.1}\" dy=\"0.32em\">{label}°C</text>\n",
            x = SWATCH_WIDTH + 9.0,
            y = y,
            label = format_tick(tick)
        );
    }
    s.push_str("  </g>\n");

    s.push_str("</svg>\n");
    s
}
