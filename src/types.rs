use chrono::NaiveDate;
use geo::MultiPolygon;

/// One country boundary from the world GeoJSON, keyed by its `name` property.
#[derive(Debug, Clone)]
pub struct CountryFeature {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// One monthly observation from the country-level temperature table.
#[derive(Debug, Clone)]
pub struct TemperatureRecord {
    pub country: String,
    pub dt: NaiveDate,
    pub average_temperature: f64,
}

/// One city/state observation from the city temperature table.
#[derive(Debug, Clone)]
pub struct CityRecord {
    pub country: String,
    pub city: String,
    pub temperature: f64,
}

/// Mean temperature for one country plus the number of records behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryStats {
    pub temperature: f64,
    pub count: u32,
}

/// The three source collections. Built once at load, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub world: Vec<CountryFeature>,
    pub temperatures: Vec<TemperatureRecord>,
    pub cities: Vec<CityRecord>,
}
