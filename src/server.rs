use crate::aggregate;
use crate::view::{self, AtlasState, ClickEvent, Dashboard, ViewState};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use geo::algorithm::contains::Contains;
use geo::bounding_rect::BoundingRect;
use geo::Point;
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

// Wrapper for RTree indexing
struct CountryIndex {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for CountryIndex {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

pub struct AppState {
    pub atlas: AtlasState,
    pub tree: RTree<CountryIndex>,
}

pub async fn start_server(atlas: AtlasState) -> Result<()> {
    println!("Building spatial index...");
    let tree_items: Vec<CountryIndex> = atlas
        .dataset
        .world
        .iter()
        .enumerate()
        .filter_map(|(i, feature)| {
            let rect = feature.geometry.bounding_rect()?;
            Some(CountryIndex {
                index: i,
                aabb: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            })
        })
        .collect();

    let tree = RTree::bulk_load(tree_items);
    println!("Spatial index built for {} countries.", atlas.dataset.world.len());

    let state = Arc::new(AppState { atlas, tree });

    let port = state.atlas.config.server.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    println!("Starting server on http://{}", addr);

    let app = Router::new()
        .route("/", get(map_page))
        .route("/country/{name}", get(country_page))
        .route("/api/hover", get(hover_handler))
        .route("/api/locate", get(locate_handler))
        .nest_service("/out", ServeDir::new(&state.atlas.config.output.dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn map_page(State(state): State<Arc<AppState>>) -> Response {
    render_page(&state.atlas, ViewState::Map)
}

#[derive(Deserialize)]
struct CountryQuery {
    /// The shift-click flag: truthy values select the trend line chart.
    trend: Option<String>,
}

async fn country_page(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<CountryQuery>,
) -> Response {
    let click = ClickEvent {
        country: name,
        shift_held: is_truthy(params.trend.as_deref()),
    };
    render_page(&state.atlas, view::route_click(click))
}

fn render_page(atlas: &AtlasState, view: ViewState) -> Response {
    match Dashboard::render(atlas, view) {
        Ok(dashboard) => Html(dashboard.to_html()).into_response(),
        Err(e) => {
            tracing::warn!("view render failed: {e}");
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    match value {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => false,
    }
}

#[derive(Deserialize)]
struct HoverParams {
    name: String,
}

#[derive(Serialize)]
struct HoverResponse {
    name: String,
    /// Formatted mean, or null for countries with no data.
    mean: Option<String>,
    /// How many records the mean was built from.
    records: Option<u32>,
}

/// Tooltip payload for a hovered country.
async fn hover_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HoverParams>,
) -> Json<HoverResponse> {
    let stats = state.atlas.averages.get(&params.name);
    Json(HoverResponse {
        mean: stats.map(|s| aggregate::format_temperature(s.temperature)),
        records: stats.map(|s| s.count),
        name: params.name,
    })
}

#[derive(Deserialize)]
struct LocateParams {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct LocateResponse {
    name: String,
    mean: Option<String>,
}

/// Which country sits under a geographic point.
async fn locate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocateParams>,
) -> Json<Option<LocateResponse>> {
    let point = Point::new(params.lon, params.lat);
    let envelope = AABB::from_point([params.lon, params.lat]);

    let candidates = state.tree.locate_in_envelope_intersecting(&envelope);

    for candidate in candidates {
        if let Some(feature) = state.atlas.dataset.world.get(candidate.index) {
            if feature.geometry.contains(&point) {
                let mean = state
                    .atlas
                    .averages
                    .get(&feature.name)
                    .map(|stats| aggregate::format_temperature(stats.temperature));
                return Json(Some(LocateResponse {
                    name: feature.name.clone(),
                    mean,
                }));
            }
        }
    }

    Json(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_flag_accepts_common_truthy_spellings() {
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("YES")));
        assert!(is_truthy(Some(" on ")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("false")));
        assert!(!is_truthy(None));
    }
}
