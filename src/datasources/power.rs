use crate::config::PowerConfig;
use crate::error::{AgroInsightError, Result};
use crate::models::{
    DailyReading, FarmerSelection, ParameterCode, ParameterSeries, SentinelPolicy, WeatherPayload,
};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;

const DAILY_POINT_PATH: &str = "api/temporal/daily/point";
const DATE_FORMAT: &str = "%Y%m%d";

/// NASA POWER daily point client
pub struct PowerClient {
    client: reqwest::Client,
    config: PowerConfig,
}

// POWER API response structures
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    /// code -> YYYYMMDD -> value
    parameter: BTreeMap<String, BTreeMap<String, f64>>,
}

pub fn format_api_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl PowerClient {
    pub fn new(client: reqwest::Client, config: PowerConfig) -> Self {
        Self { client, config }
    }

    fn daily_point_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            DAILY_POINT_PATH
        )
    }

    fn query(&self, selection: &FarmerSelection) -> Vec<(&'static str, String)> {
        let coordinate = selection.coordinate();
        let range = selection.range();
        vec![
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("parameters", ParameterCode::query_list()),
            ("format", "JSON".to_string()),
            ("start", format_api_date(range.start)),
            ("end", format_api_date(range.end)),
            ("community", self.config.community.clone()),
        ]
    }

    /// Fetch daily readings of every cataloged parameter for the selection.
    pub async fn fetch_daily(&self, selection: &FarmerSelection) -> Result<WeatherPayload> {
        tracing::info!(
            latitude = selection.coordinate().latitude,
            longitude = selection.coordinate().longitude,
            start = %selection.range().start,
            end = %selection.range().end,
            "Requesting POWER daily data"
        );

        let response = self
            .client
            .get(self.daily_point_url())
            .query(&self.query(selection))
            .send()
            .await
            .map_err(|e| AgroInsightError::DataSourceUnavailable(format!("NASA POWER: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AgroInsightError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let power_response: PowerResponse = response.json().await.map_err(|e| {
            AgroInsightError::InvalidData(format!("Failed to parse NASA POWER response: {}", e))
        })?;

        self.convert_response(power_response)
    }

    /// Check the endpoint with a one-day, one-parameter request.
    pub async fn test_connection(&self) -> Result<bool> {
        let day = format_api_date(self.config.date_policy.max_date);
        let response = self
            .client
            .get(self.daily_point_url())
            .query(&[
                ("latitude", "0"),
                ("longitude", "0"),
                ("parameters", ParameterCode::Temperature2m.as_str()),
                ("format", "JSON"),
                ("start", day.as_str()),
                ("end", day.as_str()),
                ("community", self.config.community.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AgroInsightError::DataSourceUnavailable(format!("NASA POWER: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn convert_response(&self, response: PowerResponse) -> Result<WeatherPayload> {
        let mut payload = WeatherPayload::default();
        for (code, days) in response.properties.parameter {
            let series = self.convert_series(&code, days)?;
            payload.insert(series);
        }
        Ok(payload)
    }

    fn convert_series(&self, code: &str, days: BTreeMap<String, f64>) -> Result<ParameterSeries> {
        let policy: SentinelPolicy = self.config.sentinel_policy;
        let readings = days
            .into_iter()
            .map(|(key, raw)| {
                let date = NaiveDate::parse_from_str(&key, DATE_FORMAT).map_err(|e| {
                    AgroInsightError::InvalidData(format!("{}: bad date key '{}': {}", code, key, e))
                })?;
                Ok(DailyReading::new(date, policy.ingest(raw)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ParameterSeries::new(code, readings))
    }
}
