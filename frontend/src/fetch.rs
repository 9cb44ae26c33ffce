//! Browser transport for the directions and radar services.

use seed::prelude::*;
use shared::{
    Point, Profile, RadarError, RadarFrame, Route, RouteError,
    directions::{self, DirectionsRequest},
    radar,
};

pub async fn fetch_route(
    base_url: &str,
    api_key: &str,
    start: Point,
    end: Point,
    profile: Profile,
) -> Result<Route, RouteError> {
    let url = directions::directions_url(base_url, profile);
    log::debug!("requesting {profile} route {start:?} -> {end:?}");

    let request = Request::new(url)
        .method(Method::Post)
        .header(Header::custom("Authorization", api_key.to_string()))
        .json(&DirectionsRequest::new(start, end))
        .map_err(|err| RouteError::Malformed(format!("cannot encode request: {err:?}")))?;
    let response = request
        .fetch()
        .await
        .map_err(|err| RouteError::Network(format!("{err:?}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| RouteError::Network(format!("{err:?}")))?;
    if !status.is_ok() {
        return Err(RouteError::Rejected {
            status: status.code,
            message: directions::error_message(&body),
        });
    }
    directions::parse_route(&body, profile)
}

pub async fn fetch_radar_frames() -> Result<Vec<RadarFrame>, RadarError> {
    let response = Request::new(radar::DEFAULT_METADATA_URL)
        .fetch()
        .await
        .map_err(|err| RadarError::Network(format!("{err:?}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| RadarError::Network(format!("{err:?}")))?;
    if !status.is_ok() {
        return Err(RadarError::Rejected {
            status: status.code,
            message: directions::error_message(&body),
        });
    }
    radar::parse_frames(&body)
}
