use crate::types::{CountryStats, TemperatureRecord};
use std::collections::HashMap;

/// Mean temperature per country: one pass, running sum and count, divided out
/// at the end. Countries with no records have no entry.
pub fn country_means(records: &[TemperatureRecord]) -> HashMap<String, CountryStats> {
    let mut sums: HashMap<String, (f64, u32)> = HashMap::new();

    for record in records {
        let entry = sums.entry(record.country.clone()).or_insert((0.0, 0));
        entry.0 += record.average_temperature;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(country, (sum, count))| {
            (
                country,
                CountryStats {
                    temperature: sum / count as f64,
                    count,
                },
            )
        })
        .collect()
}

/// Min and max over the raw per-record temperatures, not the country means.
pub fn record_extremes(records: &[TemperatureRecord]) -> Option<(f64, f64)> {
    records.iter().fold(None, |acc, record| {
        let t = record.average_temperature;
        Some(match acc {
            None => (t, t),
            Some((min, max)) => (min.min(t), max.max(t)),
        })
    })
}

/// Display format shared by the map tooltips and the extremes labels.
pub fn format_temperature(value: f64) -> String {
    format!("{:.2}°C", value)
}
