//! Client for the stress engine service.

use crate::error::EngineError;
use crate::types::{
    CalculationRequest, CalculationResponse, CalculationStatus, Force, Section, StressParams,
    StressResult,
};

/// The four remote operations the engine exposes. The pipeline is generic
/// over this trait so tests can substitute an in-process engine.
pub trait EngineApi {
    fn get_sections(&self) -> impl std::future::Future<Output = Result<Vec<Section>, EngineError>>;
    fn get_forces(&self) -> impl std::future::Future<Output = Result<Vec<Force>, EngineError>>;
    fn get_stress_results(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<StressResult>, EngineError>>;
    fn calculate_stress(
        &self,
        params: &StressParams,
    ) -> impl std::future::Future<Output = Result<Vec<StressResult>, EngineError>>;
}

/// HTTP client for a running stress engine service.
pub struct HttpEngineClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEngineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, EngineError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(EngineError::Api(error_text));
        }

        Ok(response.json().await?)
    }
}

impl EngineApi for HttpEngineClient {
    async fn get_sections(&self) -> Result<Vec<Section>, EngineError> {
        self.get_json("/api/v1/sections").await
    }

    async fn get_forces(&self) -> Result<Vec<Force>, EngineError> {
        self.get_json("/api/v1/forces").await
    }

    async fn get_stress_results(&self) -> Result<Vec<StressResult>, EngineError> {
        self.get_json("/api/v1/stress-results").await
    }

    async fn calculate_stress(
        &self,
        params: &StressParams,
    ) -> Result<Vec<StressResult>, EngineError> {
        let url = format!("{}/api/v1/calculate", self.base_url);
        let request = CalculationRequest {
            params: params.clone(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(EngineError::Api(error_text));
        }

        let envelope: CalculationResponse = response.json().await?;
        match envelope.status {
            CalculationStatus::Success => Ok(envelope.results.unwrap_or_default()),
            CalculationStatus::Failed => Err(EngineError::Api(
                envelope
                    .error_message
                    .unwrap_or_else(|| "calculation failed".to_string()),
            )),
        }
    }
}
