use layers::wms::FeatureInfoRequest;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::query::{MaxPointQuery, PointInfoQuery, ReanalysisQuery};
use crate::types::{FeatureInfo, FishInfo, PointInfo, Reanalysis, ResultResponse};

pub const MAX_POINTS_PATH: &str = "/catch/max";
pub const POINT_INFO_PATH: &str = "/catch/point";
pub const REANALYSIS_PATH: &str = "/catch/reanalysis";
pub const WMS_PATH: &str = "/geo-proxy";

/// HTTP client for the catch API and the map server.
///
/// Every call resolves to `Ok(None)` when the server answers with a non-2xx
/// status or an empty payload; only transport and decode failures are errors.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    wms_url: String,
}

impl ApiClient {
    /// `base_url` is the origin serving both the API and the WMS proxy,
    /// e.g. `http://localhost:5173`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }
        let wms_url = format!("{base_url}{WMS_PATH}");
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            wms_url,
        })
    }

    /// Sends point queries to a map server other than the proxy.
    pub fn with_wms_url(mut self, wms_url: impl Into<String>) -> Self {
        self.wms_url = wms_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn max_points(&self, query: &MaxPointQuery) -> Result<Option<Vec<FishInfo>>, ApiError> {
        self.get_payload(MAX_POINTS_PATH, &query.query_pairs()).await
    }

    pub async fn point_info(&self, query: &PointInfoQuery) -> Result<Option<PointInfo>, ApiError> {
        self.get_payload(POINT_INFO_PATH, &query.query_pairs()).await
    }

    pub async fn reanalysis(&self, query: &ReanalysisQuery) -> Result<Option<Reanalysis>, ApiError> {
        self.get_payload(REANALYSIS_PATH, &query.query_pairs()).await
    }

    /// Predicted catch straight from the rendered layer.
    pub async fn wms_point_info(
        &self,
        request: &FeatureInfoRequest,
    ) -> Result<Option<FeatureInfo>, ApiError> {
        self.get_json(&self.wms_url, &request.query_pairs()).await
    }

    async fn get_payload<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let envelope: Option<ResultResponse<T>> = self.get_json(&url, query).await?;
        Ok(envelope.and_then(|e| e.payload))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<Option<T>, ApiError> {
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "no data");
            return Ok(None);
        }
        let bytes = resp.bytes().await?;
        let value = serde_json::from_slice(&bytes)?;
        tracing::debug!(%url, bytes = bytes.len(), "fetched");
        Ok(Some(value))
    }
}
