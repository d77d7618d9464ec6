use crate::config::Config;
use crate::datasources::{build_http_client, PowerClient};
use crate::error::Result;
use crate::insights::{backend_from_config, InsightComposer};
use crate::logic::projection::{project, ParameterProjection};
use crate::logic::rules::SuggestionEngine;
use crate::models::{
    Advisory, DatePolicy, FarmerSelection, InsightResult, SelectionForm, WeatherPayload,
};
use serde::Serialize;

/// Everything produced by one submission.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub selection: FarmerSelection,
    pub payload: WeatherPayload,
    pub advisories: Vec<Advisory>,
    pub projections: Vec<ParameterProjection>,
    pub insights: InsightResult,
}

impl AnalysisReport {
    pub fn actionable(&self) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().filter(|a| a.action_needed)
    }
}

/// Validate, fetch, derive advisories, project for display, compose insights.
pub struct AdvisoryPipeline {
    power: PowerClient,
    engine: SuggestionEngine,
    composer: InsightComposer,
    date_policy: DatePolicy,
}

impl AdvisoryPipeline {
    pub fn new(
        power: PowerClient,
        engine: SuggestionEngine,
        composer: InsightComposer,
        date_policy: DatePolicy,
    ) -> Self {
        Self {
            power,
            engine,
            composer,
            date_policy,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let power_http = build_http_client(config.power.timeout_secs)?;
        let insights_http = build_http_client(config.insights.timeout_secs)?;

        let backend = backend_from_config(insights_http, &config.insights)?;
        tracing::info!(backend = backend.name(), "Insight backend configured");

        Ok(Self::new(
            PowerClient::new(power_http, config.power.clone()),
            SuggestionEngine::new(),
            InsightComposer::new(backend, config.insights.generation.clone()),
            config.power.date_policy,
        ))
    }

    pub fn date_policy(&self) -> &DatePolicy {
        &self.date_policy
    }

    /// Validate the form and run the analysis. Nothing is sent when validation fails.
    pub async fn submit(&self, form: &SelectionForm) -> Result<AnalysisReport> {
        let selection = form.submit(&self.date_policy)?;
        self.run(&selection).await
    }

    pub async fn run(&self, selection: &FarmerSelection) -> Result<AnalysisReport> {
        let payload = self.power.fetch_daily(selection).await?;
        tracing::info!(series = payload.series().len(), "Weather data received");

        let advisories = self.engine.derive_advisories(&payload);
        let projections = project(&payload);

        let insights = self
            .composer
            .compose(
                selection.crops(),
                selection.size(),
                &payload,
                &advisories,
            )
            .await;
        if insights.is_fallback() {
            tracing::warn!("Continuing with fallback insights");
        }

        Ok(AnalysisReport {
            selection: selection.clone(),
            payload,
            advisories,
            projections,
            insights,
        })
    }

    /// Check the weather provider and the insight backend.
    pub async fn check_connections(&self) -> (Result<bool>, bool) {
        let power = self.power.test_connection().await;
        let insights = self.composer.test_connection().await;
        (power, insights)
    }

    pub fn backend_name(&self) -> &'static str {
        self.composer.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HostedInferenceConfig, PowerConfig};
    use crate::error::AgroInsightError;
    use crate::insights::composer::tests::StubBackend;
    use crate::insights::{GenerationConfig, HostedInferenceBackend};
    use crate::models::{
        AdvisoryCategory, Coordinate, Crop, SelectionError, SizeCategory, INSIGHT_FALLBACK,
    };
    use chrono::NaiveDate;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form() -> SelectionForm {
        SelectionForm {
            crops: [Crop::Corn, Crop::Cotton].into_iter().collect(),
            size: Some(SizeCategory::OverThreeHectares),
            coordinate: Some(Coordinate::new(-12.54, -55.72)),
            start: Some(date(2024, 10, 1)),
            end: Some(date(2024, 10, 3)),
        }
    }

    fn power_body(precip: f64, uv: f64, wind: f64) -> serde_json::Value {
        serde_json::json!({
            "properties": {
                "parameter": {
                    "PRECTOTCORR": {"20241001": precip, "20241002": 7.5, "20241003": -999.0},
                    "ALLSKY_SFC_UV_INDEX": {"20241001": uv, "20241002": 6.0, "20241003": 5.5},
                    "WS10M": {"20241001": wind, "20241002": 3.3, "20241003": 2.9},
                    "T2M": {"20241001": -999.0, "20241002": -999.0, "20241003": -999.0}
                }
            }
        })
    }

    async fn power_server(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/temporal/daily/point"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn power_client(server: &MockServer, date_policy: DatePolicy) -> PowerClient {
        PowerClient::new(
            reqwest::Client::new(),
            PowerConfig {
                base_url: server.uri(),
                date_policy,
                ..PowerConfig::default()
            },
        )
    }

    fn pipeline_with(
        server: &MockServer,
        backend: StubBackend,
        date_policy: DatePolicy,
    ) -> AdvisoryPipeline {
        AdvisoryPipeline::new(
            power_client(server, date_policy),
            SuggestionEngine::new(),
            InsightComposer::new(Box::new(backend), GenerationConfig::default()),
            date_policy,
        )
    }

    #[tokio::test]
    async fn dry_and_calm_day() {
        let server = power_server(power_body(3.0, 4.0, 2.0)).await;
        let pipeline = pipeline_with(
            &server,
            StubBackend::ok("Irrigate the corn at dawn."),
            DatePolicy::default(),
        );

        let report = pipeline.submit(&form()).await.unwrap();

        let categories: Vec<AdvisoryCategory> =
            report.advisories.iter().map(|a| a.category).collect();
        assert_eq!(
            categories,
            vec![
                AdvisoryCategory::Irrigation,
                AdvisoryCategory::UvExposure,
                AdvisoryCategory::Spraying
            ]
        );
        assert_eq!(
            report.advisories[0].message,
            "Low precipitation (3.0 mm). Irrigation suggested."
        );
        assert!(report.advisories[0].action_needed);
        assert!(!report.advisories[1].action_needed);
        assert!(!report.advisories[2].action_needed);
        assert_eq!(report.actionable().count(), 1);
        assert_eq!(report.insights.text, "Irrigate the corn at dawn.");
    }

    #[tokio::test]
    async fn harsh_day_triggers_uv_and_wind() {
        let server = power_server(power_body(12.0, 9.1, 6.4)).await;
        let pipeline = pipeline_with(&server, StubBackend::ok("ok"), DatePolicy::default());

        let report = pipeline.submit(&form()).await.unwrap();

        let messages: Vec<&str> = report
            .advisories
            .iter()
            .map(|a| a.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Sufficient precipitation (12.0 mm). Irrigation not necessary.",
                "High UV index (9.1). Protect the plants.",
                "Strong wind (6.4 m/s). Spraying not recommended.",
            ]
        );
    }

    #[tokio::test]
    async fn fully_missing_parameter_has_no_card() {
        let server = power_server(power_body(3.0, 4.0, 2.0)).await;
        let pipeline = pipeline_with(&server, StubBackend::ok("ok"), DatePolicy::default());

        let report = pipeline.submit(&form()).await.unwrap();

        let t2m = report
            .projections
            .iter()
            .find(|p| p.code() == "T2M")
            .unwrap();
        assert!(t2m.view().is_none());

        let precip = report
            .projections
            .iter()
            .find(|p| p.code() == "PRECTOTCORR")
            .and_then(|p| p.view())
            .unwrap();
        assert_eq!(precip.series, vec![3.0, 7.5]);
    }

    #[tokio::test]
    async fn prompt_carries_selection_and_advisories() {
        let server = power_server(power_body(3.0, 4.0, 2.0)).await;
        let backend = StubBackend::ok("ok");
        let prompts = backend.prompts.clone();
        let pipeline = pipeline_with(&server, backend, DatePolicy::default());

        pipeline.submit(&form()).await.unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].user.contains("Corn, Cotton"));
        assert!(prompts[0].user.contains("More than 3 hectares"));
        assert!(prompts[0]
            .user
            .contains("Low precipitation (3.0 mm). Irrigation suggested."));
    }

    #[tokio::test]
    async fn hosted_backend_outage_falls_back() {
        let power = power_server(power_body(3.0, 4.0, 2.0)).await;
        let inference = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/agronomy"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Model is loading"))
            .expect(1)
            .mount(&inference)
            .await;

        let backend = HostedInferenceBackend::new(
            reqwest::Client::new(),
            HostedInferenceConfig {
                token: "hf_test".into(),
                model_url: format!("{}/models/agronomy", inference.uri()),
            },
        );
        let pipeline = AdvisoryPipeline::new(
            power_client(&power, DatePolicy::default()),
            SuggestionEngine::new(),
            InsightComposer::new(Box::new(backend), GenerationConfig::default()),
            DatePolicy::default(),
        );

        let report = pipeline.submit(&form()).await.unwrap();

        assert_eq!(report.insights.text, INSIGHT_FALLBACK);
        assert!(report
            .insights
            .diagnostic
            .as_deref()
            .unwrap()
            .contains("503"));
        assert_eq!(report.advisories.len(), 3);
        assert!(report.projections.iter().any(|p| p.view().is_some()));
    }

    #[tokio::test]
    async fn span_violation_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(power_body(1.0, 1.0, 1.0)))
            .expect(0)
            .mount(&server)
            .await;

        let policy = DatePolicy {
            max_span_days: Some(5),
            ..DatePolicy::default()
        };
        let backend = StubBackend::ok("unused");
        let prompts = backend.prompts.clone();
        let pipeline = pipeline_with(&server, backend, policy);

        let mut form = form();
        form.start = Some(date(2024, 10, 1));
        form.end = Some(date(2024, 10, 6));

        match pipeline.submit(&form).await {
            Err(AgroInsightError::Validation(SelectionError::SpanTooLong { days, max_days })) => {
                assert_eq!(days, 6);
                assert_eq!(max_days, 5);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_error_aborts_before_insights() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let backend = StubBackend::ok("unused");
        let prompts = backend.prompts.clone();
        let pipeline = pipeline_with(&server, backend, DatePolicy::default());

        assert!(matches!(
            pipeline.submit(&form()).await,
            Err(AgroInsightError::Provider { status: 500, .. })
        ));
        assert!(prompts.lock().unwrap().is_empty());
    }
}
