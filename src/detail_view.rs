use crate::projection::Projection;
use crate::scale::{format_tick, truncate_label, BandScale, LinearScale};
use crate::svg::{multipolygon_path, xml_escape};
use crate::types::CityRecord;
use crate::view::AtlasState;
use anyhow::{anyhow, Result};
use std::fmt::Write;

const MARGIN_TOP: f64 = 20.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 50.0;
const MARGIN_LEFT: f64 = 60.0;
const BAND_PADDING: f64 = 0.1;
const Y_TICKS: usize = 10;

/// The country drill-down: the country's boundary on its own projection,
/// and a bar per city/state.
pub struct DetailView {
    pub country_map: String,
    pub bar_chart: String,
}

pub fn render(state: &AtlasState, country: &str) -> Result<DetailView> {
    if state.find_country(country).is_none() {
        return Err(anyhow!("Unknown country: '{}'", country));
    }

    let cities: Vec<&CityRecord> = state
        .dataset
        .cities
        .iter()
        .filter(|c| c.country == country)
        .collect();

    Ok(DetailView {
        country_map: render_country_map(state, country),
        bar_chart: render_bar_chart(state, country, &cities),
    })
}

fn render_country_map(state: &AtlasState, country: &str) -> String {
    let cfg = &state.config.map;
    let (width, height) = (cfg.chart_width, cfg.chart_height);

    let mut s = String::with_capacity(64 << 10);
    let _ = write!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = width,
        h = height
    );

    if let Some(feature) = state.find_country(country) {
        let projection =
            Projection::for_country(feature, cfg.projection_scale, width, height);
        let d = multipolygon_path(&feature.geometry, &projection);
        let _ = write!(
            s,
            "  <path d=\"{}\" fill=\"{}\" stroke=\"#333\"/>\n",
            d, cfg.neutral_fill
        );
    }

    s.push_str("</svg>\n");
    s
}

fn render_bar_chart(state: &AtlasState, country: &str, cities: &[&CityRecord]) -> String {
    let cfg = &state.config.map;
    let (width, height) = (cfg.chart_width, cfg.chart_height);
    let axis_y = height - MARGIN_BOTTOM;

    let labels: Vec<String> = cities.iter().map(|c| c.city.clone()).collect();
    let band = BandScale::new(labels, (MARGIN_LEFT, width - MARGIN_RIGHT), BAND_PADDING);

    let max_temp = cities
        .iter()
        .fold(0.0_f64, |max, c| max.max(c.temperature));
    let y_scale = LinearScale::new((0.0, max_temp), (axis_y, MARGIN_TOP)).nice(Y_TICKS);

    let mut s = String::with_capacity(128 << 10);
    let _ = write!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = width,
        h = height
    );

    // x axis: one rotated, possibly truncated label per band
    s.push_str("  <g font-size=\"10\" fill=\"#333\">\n");
    let _ = write!(
        s,
        "    <line x1=\"{x0}\" y1=\"{y:.1}\" x2=\"{x1}\" y2=\"{y:.1}\" stroke=\"#333\"/>\n",
        x0 = MARGIN_LEFT,
        x1 = width - MARGIN_RIGHT,
        y = axis_y
    );
    for (i, label) in band.labels().iter().enumerate() {
        let x = band.position(i) + band.bandwidth() / 2.0;
        let _ = write!(
            s,
            "    <text transform=\"translate({x:.1},{y:.1}) rotate(-45)\" text-anchor=\"end\">{label}</text>\n",
            x = x,
            y = axis_y + 12.0,
            label = xml_escape(&truncate_label(label))
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

    // bars, each with an exact-temperature tooltip
    s.push_str("  <g>\n");
    for (i, city) in cities.iter().enumerate() {
        let x = band.position(i);
        let y = y_scale.scale(city.temperature);
        let _ = write!(
            s,
            "    <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" fill=\"steelblue\">\
             <title>{name}\nTemperature: {temp}°C</title></rect>\n",
            x = x,
            y = y,
            w = band.bandwidth(),
            h = (axis_y - y).max(0.0),
            name = xml_escape(&city.city),
            temp = city.temperature
        );
    }
    s.push_str("  </g>\n");

    // title and axis labels
    let _ = write!(
        s,
        "  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"16\" text-decoration=\"underline\">Average Temperature in Cities/States of {name}</text>\n",
        x = width / 2.0,
        y = MARGIN_TOP,
        name = xml_escape(country)
    );
    let _ = write!(
        s,
        "  <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"12\">City/State</text>\n",
        x = width / 2.0,
        y = height - MARGIN_BOTTOM / 2.0 + 15.0
    );
    let _ = write!(
        s,
        "  <text transform=\"rotate(-90)\" y=\"{y}\" x=\"{x}\" dy=\"-1em\" text-anchor=\"middle\" font-size=\"12\">Average Temperature (°C)</text>\n",
        y = MARGIN_LEFT / 2.0 - 20.0,
        x = -height / 2.0
    );

    s.push_str("</svg>\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, InputConfig, MapConfig, OutputConfig, ServerConfig};
    use crate::types::{CountryFeature, Dataset};
    use crate::view::AtlasState;
    use geo::{polygon, MultiPolygon};

    fn city(country: &str, name: &str, temperature: f64) -> CityRecord {
        CityRecord {
            country: country.to_string(),
            city: name.to_string(),
            temperature,
        }
    }

    fn state_with(cities: Vec<CityRecord>) -> AtlasState {
        let config = AppConfig {
            input: InputConfig {
                world_geojson: "w".to_string(),
                country_csv: "c".to_string(),
                city_csv: "s".to_string(),
            },
            map: MapConfig::default(),
            output: OutputConfig { dir: "out".into() },
            server: ServerConfig::default(),
        };
        let world = vec![CountryFeature {
            name: "Barland".to_string(),
            geometry: MultiPolygon::new(vec![polygon![
                (x: 70.0, y: 10.0),
                (x: 80.0, y: 10.0),
                (x: 80.0, y: 20.0),
                (x: 70.0, y: 20.0),
                (x: 70.0, y: 10.0),
            ]]),
        }];
        let dataset = Dataset { world, temperatures: Vec::new(), cities };
        AtlasState::build(config, dataset)
    }

    #[test]
    fn one_bar_per_city_with_exact_tooltip() {
        let state = state_with(vec![
            city("Barland", "Port Bar", 25.7),
            city("Barland", "Barville", 18.123),
            city("Elsewhere", "Not Here", 30.0),
        ]);
        let view = render(&state, "Barland").unwrap();
        assert_eq!(view.bar_chart.matches("<rect").count(), 2);
        // tooltips carry the unrounded value
        assert!(view.bar_chart.contains("Temperature: 25.7°C"));
        assert!(view.bar_chart.contains("Temperature: 18.123°C"));
    }

    #[test]
    fn long_city_names_truncate_on_the_axis_only() {
        let state = state_with(vec![city("Barland", "Squaretown Metropolitan", 20.0)]);
        let view = render(&state, "Barland").unwrap();
        // axis label is truncated to ten characters plus an ellipsis
        assert!(view.bar_chart.contains(">Squaretown...</text>"));
        // the tooltip keeps the full name
        assert!(view.bar_chart.contains("Squaretown Metropolitan\nTemperature"));
    }

    #[test]
    fn country_map_draws_only_that_country() {
        let state = state_with(Vec::new());
        let view = render(&state, "Barland").unwrap();
        assert_eq!(view.country_map.matches("<path").count(), 1);
        assert!(view.country_map.contains("fill=\"#ccc\""));
    }

    #[test]
    fn unknown_country_is_an_error() {
        let state = state_with(Vec::new());
        assert!(render(&state, "Atlantis").is_err());
    }

    #[test]
    fn no_cities_means_no_bars_but_a_chart_frame() {
        let state = state_with(Vec::new());
        let view = render(&state, "Barland").unwrap();
        assert_eq!(view.bar_chart.matches("<rect").count(), 0);
        assert!(view.bar_chart.contains("Average Temperature in Cities/States of Barland"));
    }

    #[test]
    fn bar_heights_follow_the_temperature() {
        let state = state_with(vec![
            city("Barland", "Hot", 30.0),
            city("Barland", "Mild", 15.0),
        ]);
        let view = render(&state, "Barland").unwrap();
        // the hotter bar starts higher up (smaller y)
        let ys: Vec<f64> = view
            .bar_chart
            .lines()
            .filter(|l| l.contains("<rect"))
            .map(|l| {
                let start = l.find("y=\"").unwrap() + 3;
                let end = l[start..].find('"').unwrap() + start;
                l[start..end].parse::<f64>().unwrap()
            })
            .collect();
        assert_eq!(ys.len(), 2);
        assert!(ys[0] < ys[1]);
    }
}
