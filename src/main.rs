pub mod types;
pub mod config;
pub mod data;
pub mod aggregate;
pub mod projection;
pub mod color;
pub mod scale;
pub mod svg;
pub mod view;
pub mod map_view;
pub mod legend;
pub mod line_chart;
pub mod detail_view;
pub mod server;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use view::{ClickEvent, Dashboard, ViewState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the world choropleth map, legend and extremes labels
    Generate {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Render the drill-down views for one country
    Chart {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        /// Country name as it appears in the boundary data
        country: String,
        /// Render the temperature trend instead of the city detail view
        #[arg(long)]
        trend: bool,
    },
    /// Serve the map and drill-down views over HTTP
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let atlas = load_atlas(app_config).await?;

            let dashboard = Dashboard::render(&atlas, ViewState::Map)?;

            let dir = &atlas.config.output.dir;
            fs::create_dir_all(dir)?;
            fs::write(dir.join("world_map.svg"), &dashboard.map)?;
            fs::write(dir.join("legend.svg"), &dashboard.legend)?;
            fs::write(dir.join("index.html"), dashboard.to_html())?;

            println!(
                "Temperature range: {} to {}",
                dashboard.min_label, dashboard.max_label
            );
            println!("Map written to {:?}", dir);
        }
        Commands::Chart { config, country, trend } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let atlas = load_atlas(app_config).await?;

            let view = view::route_click(ClickEvent {
                country: country.clone(),
                shift_held: *trend,
            });
            let dashboard = Dashboard::render(&atlas, view)?;

            let dir = &atlas.config.output.dir;
            fs::create_dir_all(dir)?;
            if let Some(chart) = &dashboard.line_chart {
                fs::write(dir.join("line_chart.svg"), chart)?;
                println!("Trend chart for {} written to {:?}", country, dir);
            }
            if let Some(detail) = &dashboard.country_detail {
                fs::write(dir.join("country_map.svg"), &detail.country_map)?;
                fs::write(dir.join("bar_chart.svg"), &detail.bar_chart)?;
                println!("Detail view for {} written to {:?}", country, dir);
            }
        }
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let atlas = load_atlas(app_config).await?;

            server::start_server(atlas).await?;
        }
    }

    Ok(())
}

async fn load_atlas(app_config: config::AppConfig) -> anyhow::Result<view::AtlasState> {
    let dataset = data::load_data(&app_config).await?;
    Ok(view::AtlasState::build(app_config, dataset))
}
