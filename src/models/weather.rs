use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value the POWER API writes for a day without a measurement.
pub const MISSING_SENTINEL: f64 = -999.0;

/// The agro-meteorological variables requested from the POWER daily endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterCode {
    #[serde(rename = "PRECTOTCORR")]
    Precipitation,
    #[serde(rename = "GWETROOT")]
    RootZoneWetness,
    #[serde(rename = "GWETPROF")]
    ProfileWetness,
    #[serde(rename = "GWETTOP")]
    SurfaceWetness,
    #[serde(rename = "EVPTRNS")]
    Evapotranspiration,
    #[serde(rename = "T2M")]
    Temperature2m,
    #[serde(rename = "WS10M")]
    WindSpeed10m,
    #[serde(rename = "WD10M")]
    WindDirection10m,
    #[serde(rename = "ALLSKY_SFC_UV_INDEX")]
    UvIndex,
    #[serde(rename = "ALLSKY_SRF_ALB")]
    SurfaceAlbedo,
    #[serde(rename = "RH2M")]
    RelativeHumidity2m,
    #[serde(rename = "ALLSKY_SFC_SW_DWN")]
    ShortwaveDown,
    #[serde(rename = "ALLSKY_KT")]
    ClearnessIndex,
}

impl ParameterCode {
    /// Catalog order. Also the order of the `parameters` query argument.
    pub const ALL: [ParameterCode; 13] = [
        ParameterCode::Precipitation,
        ParameterCode::RootZoneWetness,
        ParameterCode::ProfileWetness,
        ParameterCode::SurfaceWetness,
        ParameterCode::Evapotranspiration,
        ParameterCode::Temperature2m,
        ParameterCode::WindSpeed10m,
        ParameterCode::WindDirection10m,
        ParameterCode::UvIndex,
        ParameterCode::SurfaceAlbedo,
        ParameterCode::RelativeHumidity2m,
        ParameterCode::ShortwaveDown,
        ParameterCode::ClearnessIndex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterCode::Precipitation => "PRECTOTCORR",
            ParameterCode::RootZoneWetness => "GWETROOT",
            ParameterCode::ProfileWetness => "GWETPROF",
            ParameterCode::SurfaceWetness => "GWETTOP",
            ParameterCode::Evapotranspiration => "EVPTRNS",
            ParameterCode::Temperature2m => "T2M",
            ParameterCode::WindSpeed10m => "WS10M",
            ParameterCode::WindDirection10m => "WD10M",
            ParameterCode::UvIndex => "ALLSKY_SFC_UV_INDEX",
            ParameterCode::SurfaceAlbedo => "ALLSKY_SRF_ALB",
            ParameterCode::RelativeHumidity2m => "RH2M",
            ParameterCode::ShortwaveDown => "ALLSKY_SFC_SW_DWN",
            ParameterCode::ClearnessIndex => "ALLSKY_KT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParameterCode::Precipitation => "Corrected Precipitation (mm/hour)",
            ParameterCode::RootZoneWetness => "Root Zone Soil Wetness",
            ParameterCode::ProfileWetness => "Soil Profile Wetness",
            ParameterCode::SurfaceWetness => "Surface Soil Wetness",
            ParameterCode::Evapotranspiration => "Evapotranspiration (mm/hour)",
            ParameterCode::Temperature2m => "Temperature at 2m (°C)",
            ParameterCode::WindSpeed10m => "Wind Speed at 10m (m/s)",
            ParameterCode::WindDirection10m => "Wind Direction at 10m (degrees)",
            ParameterCode::UvIndex => "Surface UV Index",
            ParameterCode::SurfaceAlbedo => "Surface Albedo",
            ParameterCode::RelativeHumidity2m => "Relative Humidity at 2m (%)",
            ParameterCode::ShortwaveDown => "Surface Solar Irradiance (kWh/m²/day)",
            ParameterCode::ClearnessIndex => "Atmospheric Clearness Index",
        }
    }

    /// Comma-joined codes in catalog order.
    pub fn query_list() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn catalog_position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|p| p == self)
            .unwrap_or(Self::ALL.len())
    }
}

impl std::fmt::Display for ParameterCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display label for a raw provider code; unknown codes show as-is.
pub fn parameter_label(code: &str) -> &str {
    ParameterCode::from_code(code)
        .map(|p| p.label())
        .unwrap_or(code)
}

/// How the `-999.0` marker is treated when a payload is ingested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelPolicy {
    /// Sentinel readings become missing readings.
    #[default]
    Exclude,
    /// Sentinel readings are kept as numbers, matching older deployments.
    Passthrough,
}

impl SentinelPolicy {
    pub fn ingest(&self, raw: f64) -> Option<f64> {
        match self {
            SentinelPolicy::Exclude if raw == MISSING_SENTINEL => None,
            _ => Some(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReading {
    pub date: NaiveDate,
    /// `None` when the provider had no measurement for the day.
    pub value: Option<f64>,
}

impl DailyReading {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSeries {
    pub code: String,
    pub readings: Vec<DailyReading>,
}

impl ParameterSeries {
    pub fn new(code: impl Into<String>, mut readings: Vec<DailyReading>) -> Self {
        readings.sort_by_key(|r| r.date);
        Self {
            code: code.into(),
            readings,
        }
    }

    pub fn label(&self) -> &str {
        parameter_label(&self.code)
    }

    /// First chronological reading, missing or not.
    pub fn first(&self) -> Option<&DailyReading> {
        self.readings.first()
    }

    /// Non-missing values in chronological order.
    pub fn valid_values(&self) -> Vec<f64> {
        self.readings.iter().filter_map(|r| r.value).collect()
    }
}

/// Daily time series per parameter for one point and date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    series: Vec<ParameterSeries>,
}

impl WeatherPayload {
    pub fn new(series: Vec<ParameterSeries>) -> Self {
        let mut payload = Self::default();
        for s in series {
            payload.insert(s);
        }
        payload
    }

    /// Insert or replace a series, keeping catalog order with unknown codes last.
    pub fn insert(&mut self, series: ParameterSeries) {
        self.series.retain(|s| s.code != series.code);
        let rank = |code: &str| {
            ParameterCode::from_code(code)
                .map(|p| p.catalog_position())
                .unwrap_or(ParameterCode::ALL.len())
        };
        let new_rank = rank(&series.code);
        let at = self
            .series
            .iter()
            .position(|s| rank(&s.code) > new_rank)
            .unwrap_or(self.series.len());
        self.series.insert(at, series);
    }

    pub fn get(&self, parameter: ParameterCode) -> Option<&ParameterSeries> {
        self.get_code(parameter.as_str())
    }

    pub fn get_code(&self, code: &str) -> Option<&ParameterSeries> {
        self.series.iter().find(|s| s.code == code)
    }

    pub fn series(&self) -> &[ParameterSeries] {
        &self.series
    }

    /// Compact JSON text of the payload (`code -> {YYYYMMDD -> value|null}`).
    pub fn dump(&self) -> String {
        let mut root = serde_json::Map::new();
        for series in &self.series {
            let mut days = serde_json::Map::new();
            for reading in &series.readings {
                let value = reading
                    .value
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null);
                days.insert(reading.date.format("%Y%m%d").to_string(), value);
            }
            root.insert(series.code.clone(), serde_json::Value::Object(days));
        }
        serde_json::Value::Object(root).to_string()
    }
}

/// Renders a reading the way the advisories quote it: always with a decimal part.
pub fn format_reading(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    #[test]
    fn catalog_has_thirteen_unique_codes() {
        let list = ParameterCode::query_list();
        assert_eq!(list.split(',').count(), 13);
        assert!(list.starts_with("PRECTOTCORR,GWETROOT"));
        assert!(list.ends_with("ALLSKY_SFC_SW_DWN,ALLSKY_KT"));
    }

    #[test]
    fn code_round_trip_and_unknown_label() {
        assert_eq!(
            ParameterCode::from_code("WS10M"),
            Some(ParameterCode::WindSpeed10m)
        );
        assert_eq!(ParameterCode::from_code("NOPE"), None);
        assert_eq!(parameter_label("NOPE"), "NOPE");
        assert_eq!(parameter_label("T2M"), "Temperature at 2m (°C)");
    }

    #[test]
    fn sentinel_policy_ingest() {
        assert_eq!(SentinelPolicy::Exclude.ingest(MISSING_SENTINEL), None);
        assert_eq!(SentinelPolicy::Exclude.ingest(3.5), Some(3.5));
        assert_eq!(
            SentinelPolicy::Passthrough.ingest(MISSING_SENTINEL),
            Some(MISSING_SENTINEL)
        );
    }

    #[test]
    fn series_sorted_chronologically() {
        let series = ParameterSeries::new(
            "T2M",
            vec![
                DailyReading::new(day(3), Some(22.0)),
                DailyReading::new(day(1), Some(20.0)),
                DailyReading::new(day(2), None),
            ],
        );
        assert_eq!(series.first().unwrap().date, day(1));
        assert_eq!(series.valid_values(), vec![20.0, 22.0]);
    }

    #[test]
    fn payload_keeps_catalog_order() {
        let payload = WeatherPayload::new(vec![
            ParameterSeries::new("CUSTOM", vec![]),
            ParameterSeries::new("WS10M", vec![]),
            ParameterSeries::new("PRECTOTCORR", vec![]),
            ParameterSeries::new("ALLSKY_SFC_UV_INDEX", vec![]),
        ]);
        let codes: Vec<&str> = payload.series().iter().map(|s| s.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["PRECTOTCORR", "WS10M", "ALLSKY_SFC_UV_INDEX", "CUSTOM"]
        );
    }

    #[test]
    fn insert_replaces_existing_series() {
        let mut payload = WeatherPayload::default();
        payload.insert(ParameterSeries::new(
            "T2M",
            vec![DailyReading::new(day(1), Some(1.0))],
        ));
        payload.insert(ParameterSeries::new(
            "T2M",
            vec![DailyReading::new(day(1), Some(2.0))],
        ));
        assert_eq!(payload.series().len(), 1);
        assert_eq!(
            payload.get(ParameterCode::Temperature2m).unwrap().valid_values(),
            vec![2.0]
        );
    }

    #[test]
    fn dump_writes_missing_as_null() {
        let payload = WeatherPayload::new(vec![ParameterSeries::new(
            "PRECTOTCORR",
            vec![
                DailyReading::new(day(1), Some(3.0)),
                DailyReading::new(day(2), None),
            ],
        )]);
        assert_eq!(
            payload.dump(),
            r#"{"PRECTOTCORR":{"20241001":3.0,"20241002":null}}"#
        );
    }

    #[test]
    fn format_reading_keeps_decimal() {
        assert_eq!(format_reading(3.0), "3.0");
        assert_eq!(format_reading(4.25), "4.25");
        assert_eq!(format_reading(-999.0), "-999.0");
    }
}
