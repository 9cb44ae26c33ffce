//! HTTP client for the directions API.

use std::future::Future;

use shared::{
    Point, Profile, Route, RouteError,
    directions::{self, DirectionsRequest},
};

use crate::config::Config;

/// Anything that can turn two points into a route.
///
/// Lets the planner run against a scripted fake in tests.
pub trait DirectionsApi: Send + Sync {
    fn fetch_route(
        &self,
        start: Point,
        end: Point,
        profile: Profile,
    ) -> impl Future<Output = Result<Route, RouteError>> + Send;
}

#[derive(Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Client with the configured timeout; fails if no API key is set.
    pub fn from_config(config: &Config) -> Result<Self, crate::Error> {
        let api_key = config.require_api_key()?;
        let http = reqwest::Client::builder()
            .timeout(config.directions_timeout)
            .build()?;
        Ok(Self::new(config.directions_base_url.clone(), api_key, http))
    }
}

impl DirectionsApi for DirectionsClient {
    async fn fetch_route(
        &self,
        start: Point,
        end: Point,
        profile: Profile,
    ) -> Result<Route, RouteError> {
        let url = directions::directions_url(&self.base_url, profile);
        tracing::debug!(%url, ?start, ?end, "requesting route");

        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&DirectionsRequest::new(start, end))
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            let message = directions::error_message(&body);
            tracing::warn!(status = status.as_u16(), ?message, "directions request rejected");
            return Err(RouteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let route = directions::parse_route(&body, profile).inspect_err(|err| {
            tracing::warn!("failed to decode directions response: {err}");
        })?;
        tracing::info!(
            points = route.geometry.len(),
            distance_m = route.summary.distance_m,
            "route received"
        );
        Ok(route)
    }
}

fn network_error(err: reqwest::Error) -> RouteError {
    if err.is_timeout() {
        RouteError::Network("request timed out".into())
    } else {
        RouteError::Network(err.to_string())
    }
}
