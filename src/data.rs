use crate::config::AppConfig;
use crate::types::{CityRecord, CountryFeature, Dataset, TemperatureRecord};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use geo::MultiPolygon;
use geojson::GeoJson;
use std::convert::TryInto;

/// Fetch all three sources concurrently and parse them. Any failure aborts
/// the whole load; nothing downstream ever sees partial data.
pub async fn load_data(config: &AppConfig) -> Result<Dataset> {
    println!("Loading data...");

    let (world_raw, country_raw, city_raw) = tokio::try_join!(
        fetch_source(&config.input.world_geojson),
        fetch_source(&config.input.country_csv),
        fetch_source(&config.input.city_csv),
    )?;

    let world = parse_world(&world_raw)
        .with_context(|| format!("Failed to parse world boundaries: {}", config.input.world_geojson))?;
    let temperatures = parse_country_csv(&country_raw)
        .with_context(|| format!("Failed to parse country temperatures: {}", config.input.country_csv))?;
    let cities = parse_city_csv(&city_raw)
        .with_context(|| format!("Failed to parse city temperatures: {}", config.input.city_csv))?;

    println!(
        "Loaded {} boundaries, {} country records, {} city records",
        world.len(),
        temperatures.len(),
        cities.len()
    );

    Ok(Dataset { world, temperatures, cities })
}

/// Inputs are either http(s) URLs or local paths.
async fn fetch_source(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::get(source)
            .await
            .with_context(|| format!("Failed to fetch {}", source))?
            .error_for_status()
            .with_context(|| format!("Bad response fetching {}", source))?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", source))?;
        Ok(bytes.to_vec())
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read {}", source))
    }
}

fn parse_world(raw: &[u8]) -> Result<Vec<CountryFeature>> {
    let geojson = GeoJson::from_reader(raw).context("Failed to parse GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("World boundaries must be a FeatureCollection")),
    };

    let mut features = Vec::new();

    for feature in collection.features {
        let name = match feature.properties.as_ref().and_then(|props| props.get("name")) {
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => continue, // Skip unnamed features
        };

        let geometry = match feature.geometry {
            Some(geom) => {
                let converted: geo::Geometry<f64> = geom
                    .value
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert geometry for '{}': {:?}", name, e))?;

                match converted {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => continue, // Skip points/lines
                }
            }
            None => continue,
        };

        features.push(CountryFeature { name, geometry });
    }

    Ok(features)
}

fn parse_country_csv(raw: &[u8]) -> Result<Vec<TemperatureRecord>> {
    let mut rdr = ReaderBuilder::new().from_reader(raw);
    let headers = rdr.headers()?.clone();

    let country_idx = column_index(&headers, "Country")?;
    let dt_idx = column_index(&headers, "dt")?;
    let temp_idx = column_index(&headers, "AverageTemperature")?;

    let mut records = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let country = record.get(country_idx).unwrap_or("").trim();
        if country.is_empty() {
            continue;
        }

        // A row with an unparseable date or temperature is skipped, not fatal.
        let dt = match record
            .get(dt_idx)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        {
            Some(d) => d,
            None => continue,
        };
        let average_temperature = match record.get(temp_idx).and_then(|s| s.trim().parse::<f64>().ok()) {
            Some(t) => t,
            None => continue,
        };

        records.push(TemperatureRecord {
            country: country.to_string(),
            dt,
            average_temperature,
        });
    }

    Ok(records)
}

fn parse_city_csv(raw: &[u8]) -> Result<Vec<CityRecord>> {
    let mut rdr = ReaderBuilder::new().from_reader(raw);
    let headers = rdr.headers()?.clone();

    let country_idx = column_index(&headers, "Country")?;
    let city_idx = column_index(&headers, "City/state")?;
    let temp_idx = column_index(&headers, "Temperature")?;

    let mut records = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let country = record.get(country_idx).unwrap_or("").trim();
        let city = record.get(city_idx).unwrap_or("").trim();
        if country.is_empty() || city.is_empty() {
            continue;
        }

        let temperature = match record.get(temp_idx).and_then(|s| s.trim().parse::<f64>().ok()) {
            Some(t) => t,
            None => continue,
        };

        records.push(CityRecord {
            country: country.to_string(),
            city: city.to_string(),
            temperature,
        });
    }

    Ok(records)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| anyhow!("Column '{}' not found in CSV", name))
}
