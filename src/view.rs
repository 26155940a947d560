use crate::aggregate;
use crate::color::ColorScale;
use crate::config::AppConfig;
use crate::detail_view::{self, DetailView};
use crate::types::{CountryFeature, CountryStats, Dataset};
use crate::{legend, line_chart, map_view};
use anyhow::Result;
use std::collections::HashMap;
use std::fmt::Write;

/// Which of the three mutually exclusive views is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Map,
    LineChart { country: String },
    Detail { country: String },
}

/// A click on a map feature. `shift_held` mirrors the modifier key that
/// selects the trend chart over the detail view.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub country: String,
    pub shift_held: bool,
}

pub fn route_click(event: ClickEvent) -> ViewState {
    if event.shift_held {
        ViewState::LineChart { country: event.country }
    } else {
        ViewState::Detail { country: event.country }
    }
}

/// Everything loaded and derived once at startup, read-only afterwards.
pub struct AtlasState {
    pub config: AppConfig,
    pub dataset: Dataset,
    pub averages: HashMap<String, CountryStats>,
    pub extremes: Option<(f64, f64)>,
}

impl AtlasState {
    pub fn build(config: AppConfig, dataset: Dataset) -> Self {
        let averages = aggregate::country_means(&dataset.temperatures);
        let extremes = aggregate::record_extremes(&dataset.temperatures);
        Self { config, dataset, averages, extremes }
    }

    pub fn find_country(&self, name: &str) -> Option<&CountryFeature> {
        self.dataset.world.iter().find(|f| f.name == name)
    }
}

/// The four rendered container regions plus the two extremes text nodes.
/// Containers are replaced wholesale on every render; visibility is a
/// display toggle over them, so switching views never destroys the map.
pub struct Dashboard {
    pub view: ViewState,
    pub map: String,
    pub legend: String,
    pub line_chart: Option<String>,
    pub country_detail: Option<DetailView>,
    pub min_label: String,
    pub max_label: String,
}

impl Dashboard {
    pub fn render(state: &AtlasState, view: ViewState) -> Result<Self> {
        let color = ColorScale::new(state.config.map.color_domain);

        let map = map_view::render(state, &color);
        let legend = legend::render(&state.config.map, &color);

        let (line, detail) = match &view {
            ViewState::Map => (None, None),
            ViewState::LineChart { country } => (Some(line_chart::render(state, country)?), None),
            ViewState::Detail { country } => (None, Some(detail_view::render(state, country)?)),
        };

        let (min_label, max_label) = match state.extremes {
            Some((min, max)) => (
                aggregate::format_temperature(min),
                aggregate::format_temperature(max),
            ),
            None => ("No data".to_string(), "No data".to_string()),
        };

        Ok(Self {
            view,
            map,
            legend,
            line_chart: line,
            country_detail: detail,
            min_label,
            max_label,
        })
    }

    pub fn map_visible(&self) -> bool {
        matches!(self.view, ViewState::Map)
    }

    pub fn line_chart_visible(&self) -> bool {
        matches!(self.view, ViewState::LineChart { .. })
    }

    pub fn detail_visible(&self) -> bool {
        matches!(self.view, ViewState::Detail { .. })
    }

    /// One page holding all containers; hidden ones get `display: none`.
    pub fn to_html(&self) -> String {
        let display = |visible: bool| if visible { "block" } else { "none" };

        let mut page = String::with_capacity(1 << 20);
        page.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        page.push_str("<meta charset=\"utf-8\">\n<title>Global Temperature Atlas</title>\n");
        page.push_str("</head>\n<body>\n");

        let _ = write!(
            page,
            "<div id=\"temperature-range\">Min: <span id=\"min-temp\">{}</span> Max: <span id=\"max-temp\">{}</span></div>\n",
            self.min_label, self.max_label
        );

        let _ = write!(
            page,
            "<div id=\"map\" style=\"display:{}\">\n{}</div>\n",
            display(self.map_visible()),
            self.map
        );
        let _ = write!(
            page,
            "<div id=\"legend-container\" style=\"display:{}\">\n{}</div>\n",
            display(self.map_visible()),
            self.legend
        );
        let _ = write!(
            page,
            "<div id=\"line-chart-container\" style=\"display:{}\">\n{}</div>\n",
            display(self.line_chart_visible()),
            self.line_chart.as_deref().unwrap_or("")
        );
        match &self.country_detail {
            Some(detail) => {
                let _ = write!(
                    page,
                    "<div id=\"country-detail-container\" style=\"display:{}\">\n{}\n{}</div>\n",
                    display(self.detail_visible()),
                    detail.country_map,
                    detail.bar_chart
                );
            }
            None => {
                let _ = write!(
                    page,
                    "<div id=\"country-detail-container\" style=\"display:{}\">\n</div>\n",
                    display(self.detail_visible())
                );
            }
        }

        // Map links route to the detail view; holding shift reroutes the
        // same link to the trend chart.
        page.push_str(
            "<script>\n\
             document.addEventListener('click', function (event) {\n\
               var link = event.target.closest ? event.target.closest('a') : null;\n\
               var href = link && link.getAttribute('href');\n\
               if (href && event.shiftKey && href.indexOf('/country/') === 0) {\n\
                 event.preventDefault();\n\
                 window.location = href + '?trend=1';\n\
               }\n\
             });\n\
             </script>\n",
        );
        page.push_str("</body>\n</html>\n");
        page
    }
}
