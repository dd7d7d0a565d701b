//! Renderer module
//!
//! Renders forecasts and cache metadata to json or md

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::meta::CacheMeta;
use crate::core::model::{Locationforecast, Timeseries};

/// Number of forecast steps shown in the Markdown table
const MARKDOWN_STEPS: usize = 12;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Cache metadata as shown by `inspect`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaReport {
    pub key: String,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

impl MetaReport {
    pub fn new(key: &str, meta: Option<&CacheMeta>, now: DateTime<Utc>) -> Self {
        Self {
            key: key.to_string(),
            cached: meta.is_some(),
            expires: meta.map(|m| m.expires),
            last_modified: meta.map(|m| m.last_modified),
            expired: meta.map(|m| m.is_expired(now)),
        }
    }
}

/// Renderer for forecasts and reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a forecast document
    pub fn render_forecast(&self, forecast: &Locationforecast, now: DateTime<Utc>) -> String {
        match self.config.format {
            OutputFormat::Json => self.render_json(forecast),
            OutputFormat::Markdown => render_forecast_markdown(forecast, now),
        }
    }

    /// Render an `inspect` report
    pub fn render_report(&self, report: &MetaReport) -> String {
        match self.config.format {
            OutputFormat::Json => self.render_json(report),
            OutputFormat::Markdown => render_report_markdown(report),
        }
    }

    fn render_json<T: Serialize>(&self, value: &T) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| "null".to_string())
    }
}

fn render_forecast_markdown(forecast: &Locationforecast, now: DateTime<Utc>) -> String {
    let mut output = String::new();

    let coords = &forecast.geometry.coordinates;
    output.push_str("# Forecast\n\n");
    if coords.len() >= 2 {
        output.push_str(&format!("- Location: {:.4}, {:.4}", coords[1], coords[0]));
        if let Some(alt) = coords.get(2) {
            output.push_str(&format!(" ({} m)", alt));
        }
        output.push('\n');
    }
    output.push_str(&format!(
        "- Updated: {}\n\n",
        forecast.properties.meta.updated_at.to_rfc3339()
    ));

    output.push_str("| Time (UTC) | Temp | Wind | Precip 1h | Symbol |\n");
    output.push_str("|---|---|---|---|---|\n");
    for step in forecast.upcoming(now).take(MARKDOWN_STEPS) {
        output.push_str(&markdown_row(step));
    }

    output
}

fn markdown_row(step: &Timeseries) -> String {
    let details = &step.data.instant.details;
    let next = step.data.next_1_hours.as_ref();

    format!(
        "| {} | {} | {} | {} | {} |\n",
        step.time.format("%Y-%m-%d %H:%M"),
        cell(details.air_temperature, "°C"),
        cell(details.wind_speed, " m/s"),
        cell(next.and_then(|p| p.details.precipitation_amount), " mm"),
        next.map(|p| p.summary.symbol_code.as_str()).unwrap_or("-"),
    )
}

fn cell(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{:.1}{}", v, unit))
        .unwrap_or_else(|| "-".to_string())
}

fn render_report_markdown(report: &MetaReport) -> String {
    let mut output = format!("## {}\n\n", report.key);
    if !report.cached {
        output.push_str("Nothing cached\n");
        return output;
    }
    if let Some(expires) = report.expires {
        output.push_str(&format!("- Expires: {}\n", expires.to_rfc3339()));
    }
    if let Some(last_modified) = report.last_modified {
        output.push_str(&format!("- Last-Modified: {}\n", last_modified.to_rfc3339()));
    }
    if let Some(expired) = report.expired {
        output.push_str(&format!("- Expired: {}\n", if expired { "yes" } else { "no" }));
    }
    output
}
