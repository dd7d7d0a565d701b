//! Locationforecast document model
//!
//! Mirrors the GeoJSON feature returned by the met.no Locationforecast 2.0
//! `complete` endpoint. Unknown fields are ignored and missing numeric
//! details are left as `None`, so partial documents still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A forecast for one point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locationforecast {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude, altitude]`
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub meta: Meta,
    #[serde(default)]
    pub timeseries: Vec<Timeseries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub units: Units,
}

/// Unit labels for each measured quantity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Units {
    pub air_pressure_at_sea_level: Option<String>,
    pub air_temperature: Option<String>,
    pub air_temperature_max: Option<String>,
    pub air_temperature_min: Option<String>,
    pub cloud_area_fraction: Option<String>,
    pub cloud_area_fraction_high: Option<String>,
    pub cloud_area_fraction_low: Option<String>,
    pub cloud_area_fraction_medium: Option<String>,
    pub dew_point_temperature: Option<String>,
    pub fog_area_fraction: Option<String>,
    pub precipitation_amount: Option<String>,
    pub relative_humidity: Option<String>,
    pub ultraviolet_index_clear_sky: Option<String>,
    pub wind_from_direction: Option<String>,
    pub wind_speed: Option<String>,
}

/// One forecast step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    pub time: DateTime<Utc>,
    pub data: TimeseriesData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesData {
    pub instant: Instant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_1_hours: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_6_hours: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_12_hours: Option<Period>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instant {
    #[serde(default)]
    pub details: InstantDetails,
}

/// Values valid at the step's instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstantDetails {
    pub air_pressure_at_sea_level: Option<f64>,
    pub air_temperature: Option<f64>,
    pub cloud_area_fraction: Option<f64>,
    pub cloud_area_fraction_high: Option<f64>,
    pub cloud_area_fraction_low: Option<f64>,
    pub cloud_area_fraction_medium: Option<f64>,
    pub dew_point_temperature: Option<f64>,
    pub fog_area_fraction: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub ultraviolet_index_clear_sky: Option<f64>,
    pub wind_from_direction: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Aggregate over the next 1, 6 or 12 hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub details: PeriodDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub symbol_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodDetails {
    pub air_temperature_max: Option<f64>,
    pub air_temperature_min: Option<f64>,
    pub precipitation_amount: Option<f64>,
    pub precipitation_amount_max: Option<f64>,
    pub precipitation_amount_min: Option<f64>,
    pub probability_of_precipitation: Option<f64>,
    pub probability_of_thunder: Option<f64>,
    pub ultraviolet_index_clear_sky_max: Option<f64>,
}

impl Locationforecast {
    /// Forecast steps at or after `from`
    pub fn upcoming(&self, from: DateTime<Utc>) -> impl Iterator<Item = &Timeseries> {
        self.properties
            .timeseries
            .iter()
            .filter(move |step| step.time >= from)
    }
}
