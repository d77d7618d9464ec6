use crate::models::{ParameterSeries, WeatherPayload};
use serde::Serialize;

/// Card and chart data for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterView {
    pub code: String,
    pub label: String,
    /// First valid value, shown as the card metric.
    pub metric: f64,
    /// Valid values in chronological order, plotted against an ordinal x-axis.
    pub series: Vec<f64>,
}

impl ParameterView {
    pub fn min(&self) -> f64 {
        self.series.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.series.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// `(index, value)` points for a line chart.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.series
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParameterProjection {
    Available(ParameterView),
    /// Every reading was missing; no card and no chart.
    NoValidData { code: String, label: String },
}

impl ParameterProjection {
    pub fn code(&self) -> &str {
        match self {
            ParameterProjection::Available(view) => &view.code,
            ParameterProjection::NoValidData { code, .. } => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ParameterProjection::Available(view) => &view.label,
            ParameterProjection::NoValidData { label, .. } => label,
        }
    }

    pub fn view(&self) -> Option<&ParameterView> {
        match self {
            ParameterProjection::Available(view) => Some(view),
            ParameterProjection::NoValidData { .. } => None,
        }
    }
}

pub fn project_series(series: &ParameterSeries) -> ParameterProjection {
    let values = series.valid_values();
    match values.first() {
        Some(&metric) => ParameterProjection::Available(ParameterView {
            code: series.code.clone(),
            label: series.label().to_string(),
            metric,
            series: values,
        }),
        None => ParameterProjection::NoValidData {
            code: series.code.clone(),
            label: series.label().to_string(),
        },
    }
}

/// One projection per series, in payload order.
pub fn project(payload: &WeatherPayload) -> Vec<ParameterProjection> {
    payload.series().iter().map(project_series).collect()
}
