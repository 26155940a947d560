use crate::aggregate;
use crate::color::ColorScale;
use crate::projection::Projection;
use crate::svg::{href_encode, multipolygon_path, xml_escape};
use crate::view::AtlasState;
use std::fmt::Write;

/// World choropleth: one path per country, filled from the color scale when
/// the country has a mean, the neutral fill otherwise. Each path carries a
/// tooltip `<title>` and links to its drill-down route.
pub fn render(state: &AtlasState, color: &ColorScale) -> String {
    let cfg = &state.config.map;
    let projection = Projection::world(cfg.projection_scale, cfg.width, cfg.height);

    let mut s = String::with_capacity(1 << 20);
    let _ = write!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = cfg.width,
        h = cfg.height
    );
    s.push_str("  <style>path:hover { stroke: orange; }</style>\n");
    s.push_str("  <g>\n");

    for feature in &state.dataset.world {
        let d = multipolygon_path(&feature.geometry, &projection);
        if d.is_empty() {
            continue;
        }

        let stats = state.averages.get(&feature.name);
        let fill = match stats {
            Some(stats) => color.hex(stats.temperature),
            None => cfg.neutral_fill.clone(),
        };
        let tooltip_temp = match stats {
            Some(stats) => aggregate::format_temperature(stats.temperature),
            None => "No data".to_string(),
        };

        let _ = write!(
            s,
            "    <a href=\"/country/{href}\"><path d=\"{d}\" fill=\"{fill}\" stroke=\"#333\">\
             <title>{name}\nTemperature: {temp}</title></path></a>\n",
            href = href_encode(&feature.name),
            d = d,
            fill = fill,
            name = xml_escape(&feature.name),
            temp = xml_escape(&tooltip_temp),
        );
    }

    s.push_str("  </g>\n");
    s.push_str("</svg>\n");
    s
}
