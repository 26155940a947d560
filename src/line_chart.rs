use crate::scale::{format_tick, year_ticks, LinearScale};
use crate::svg::xml_escape;
use crate::types::TemperatureRecord;
use crate::view::AtlasState;
use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

const MARGIN_TOP: f64 = 20.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 30.0;
const MARGIN_LEFT: f64 = 40.0;
const X_TICKS: usize = 12;
const Y_TICKS: usize = 10;

/// Temperature trend for one country: a single continuous polyline over a
/// time x axis and a niced linear y axis. Points are connected in input
/// order; the source table is chronological per country and is not re-sorted.
pub fn render(state: &AtlasState, country: &str) -> Result<String> {
    let records: Vec<&TemperatureRecord> = state
        .dataset
        .temperatures
        .iter()
        .filter(|r| r.country == country)
        .collect();

    if records.is_empty() {
        return Err(anyhow!("No temperature records for '{}'", country));
    }

    let cfg = &state.config.map;
    let (width, height) = (cfg.chart_width, cfg.chart_height);

    let (min_dt, max_dt) = records
        .iter()
        .fold((records[0].dt, records[0].dt), |(lo, hi), r| {
            (lo.min(r.dt), hi.max(r.dt))
        });
    let (min_temp, max_temp) = records.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), r| (lo.min(r.average_temperature), hi.max(r.average_temperature)),
    );

    let total_days = (max_dt - min_dt).num_days().max(1) as f64;
    let x_for = |date: NaiveDate| {
        MARGIN_LEFT + (date - min_dt).num_days() as f64 / total_days * (width - MARGIN_LEFT - MARGIN_RIGHT)
    };
    let y_scale = LinearScale::new((min_temp, max_temp), (height - MARGIN_BOTTOM, MARGIN_TOP))
        .nice(Y_TICKS);

    let mut s = String::with_capacity(256 << 10);
    let _ = write!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = width,
        h = height
    );

    // x axis
    let axis_y = height - MARGIN_BOTTOM;
    s.push_str("  <g font-size=\"10\" fill=\"#333\">\n");
    let _ = write!(
        s,
        "    <line x1=\"{x0}\" y1=\"{y:.1}\" x2=\"{x1}\" y2=\"{y:.1}\" stroke=\"#333\"/>\n",
        x0 = MARGIN_LEFT,
        x1 = width - MARGIN_RIGHT,
        y = axis_y
    );
    for tick in year_ticks(min_dt, max_dt, X_TICKS) {
        let x = x_for(tick);
        let _ = write!(
            s,
            "    <line x1=\"{x:.1}\" y1=\"{y0:.1}\" x2=\"{x:.1}\" y2=\"{y1:.1}\" stroke=\"#333\"/>\n",
            x = x,
            y0 = axis_y,
            y1 = axis_y + 6.0
        );
        let _ = write!(
            s,
            "    <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\">{year}</text>\n",
            x = x,
            y = axis_y + 16.0,
            year = tick.year()
        );
    }
    s.push_str("  </g>\n");

    // y axis
    s.push_str("  <g font-size=\"10\" fill=\"#333\">\n");
    let _ = write!(
        s,
        "    <line x1=\"{x:.1}\" y1=\"{y0:.1}\" x2=\"{x:.1}\" y2=\"{y1:.1}\" stroke=\"#333\"/>\n",
        x = MARGIN_LEFT,
        y0 = MARGIN_TOP,
        y1 = axis_y
    );
    for tick in y_scale.ticks(Y_TICKS) {
        let y = y_scale.scale(tick);
        let _ = write!(
            s,
            "    <line x1=\"{x0:.1}\" y1=\"{y:.1}\" x2=\"{x1:.1}\" y2=\"{y:.1}\" stroke=\"#333\"/>\n",
            x0 = MARGIN_LEFT - 6.0,
            x1 = MARGIN_LEFT,
            y = y
        );
        let _ = write!(
            s,
            "    <text x=\"{x:.1}\" y=\"{y:.1}\" dy=\"0.32em\" text-anchor=\"end\">{label}</text>\n",
            x = MARGIN_LEFT - 9.0,
            y = y,
            label = format_tick(tick)
        );
    }
    s.push_str("  </g>\n");

    // the trend line itself, in input order
    let mut d = String::new();
    for (i, record) in records.iter().enumerate() {
        let x = x_for(record.dt);
        let y = y_scale.scale(record.average_temperature);
        if i == 0 {
            let _ = write!(d, "M{:.2},{:.2}", x, y);
        } else {
            let _ = write!(d, "L{:.2},{:.2}", x, y);
        }
    }
    let _ = write!(
        s,
        "  <path d=\"{}\" fill=\"none\" stroke=\"steelblue\" stroke-width=\"1.5\"/>\n",
        d
    );

    // title and axis labels
    let _ = write!(
        s,
        "  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"16\" text-decoration=\"underline\">Temperature Trends for {name}</text>\n",
        x = width / 2.0,
        y = MARGIN_TOP,
        name = xml_escape(country)
    );
    let _ = write!(
        s,
        "  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"12\">Year</text>\n",
        x = width / 2.0,
        y = height - MARGIN_BOTTOM / 2.0
    );
    let _ = write!(
        s,
        "  <text transform=\"rotate(-90)\" y=\"{y}\" x=\"{x}\" dy=\"-1em\" text-anchor=\"middle\" font-size=\"12\">Temperature (°C)</text>\n",
        y = MARGIN_LEFT / 2.0,
        x = -height / 2.0
    );

    s.push_str("</svg>\n");
    Ok(s)
}
