//! Wire format of the directions API: request body, response decoding and
//! error-body extraction. Transport lives with the callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::categories::{BreakdownEntry, BreakdownKind};
use crate::error::RouteError;
use crate::route::{Position, Route, RouteGeometry, RouteSummary};
use crate::{Point, Profile};

pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org/v2/directions";
pub const EXTRA_INFO: [&str; 4] = ["steepness", "surface", "waytype", "traildifficulty"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsRequest {
    pub coordinates: [[f64; 2]; 2],
    pub elevation: bool,
    pub extra_info: [&'static str; 4],
    pub units: &'static str,
}

impl DirectionsRequest {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            coordinates: [[start.lng, start.lat], [end.lng, end.lat]],
            elevation: true,
            extra_info: EXTRA_INFO,
            units: "m",
        }
    }
}

pub fn directions_url(base_url: &str, profile: Profile) -> String {
    format!(
        "{}/{}/geojson",
        base_url.trim_end_matches('/'),
        profile.api_id()
    )
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    properties: Option<Properties>,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: Vec<Position>,
}

#[derive(Deserialize)]
struct Properties {
    summary: Option<Summary>,
    #[serde(default)]
    extras: Extras,
    ascent: Option<f64>,
    descent: Option<f64>,
}

// A zero-length route comes back with an empty summary object.
#[derive(Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Default, Deserialize)]
struct Extras {
    surface: Option<Extra>,
    waytype: Option<Extra>,
    traildifficulty: Option<Extra>,
    steepness: Option<Extra>,
}

#[derive(Deserialize)]
struct Extra {
    #[serde(default)]
    summary: Vec<ExtraSummary>,
}

#[derive(Deserialize)]
struct ExtraSummary {
    value: f64,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    amount: f64,
}

/// Decode a directions response into a route. Any missing feature,
/// geometry or properties block is a [`RouteError::Malformed`].
pub fn parse_route(body: &str, profile: Profile) -> Result<Route, RouteError> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| RouteError::Malformed(e.to_string()))?;

    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| RouteError::Malformed("response contains no route feature".into()))?;
    let geometry = feature
        .geometry
        .ok_or_else(|| RouteError::Malformed("route feature has no geometry".into()))?;
    let properties = feature
        .properties
        .ok_or_else(|| RouteError::Malformed("route feature has no properties".into()))?;
    let summary = properties
        .summary
        .ok_or_else(|| RouteError::Malformed("route properties have no summary".into()))?;

    if geometry.coordinates.len() < 2 {
        return Err(RouteError::Malformed(format!(
            "route geometry has {} coordinate(s), need at least 2",
            geometry.coordinates.len()
        )));
    }
    if !is_non_negative(summary.distance) || !is_non_negative(summary.duration) {
        return Err(RouteError::Malformed(
            "summary distance and duration must be non-negative".into(),
        ));
    }

    let extras = properties.extras;
    let elevation_coordinates = geometry
        .coordinates
        .iter()
        .copied()
        .filter(|p| p.elevation.is_some())
        .collect();

    let summary = RouteSummary {
        distance_m: summary.distance,
        duration_s: summary.duration,
        ascent_m: properties.ascent.unwrap_or(0.0),
        descent_m: properties.descent.unwrap_or(0.0),
        surface: breakdown(BreakdownKind::Surface, extras.surface),
        waytype: breakdown(BreakdownKind::WayType, extras.waytype),
        trail_difficulty: breakdown(
            BreakdownKind::trail_difficulty_for(profile),
            extras.traildifficulty,
        ),
        steepness: breakdown(BreakdownKind::Steepness, extras.steepness),
        elevation_coordinates,
    };

    Ok(Route {
        geometry: RouteGeometry::new(geometry.coordinates),
        summary,
    })
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn breakdown(kind: BreakdownKind, extra: Option<Extra>) -> Vec<BreakdownEntry> {
    let mut entries: Vec<BreakdownEntry> = extra
        .map(|e| e.summary)
        .unwrap_or_default()
        .into_iter()
        .map(|s| BreakdownEntry {
            kind,
            category_id: category_id(s.value),
            distance_m: s.distance,
            percentage: s.amount,
        })
        .collect();
    entries.sort_by(|a, b| b.distance_m.total_cmp(&a.distance_m));
    entries
}

// Ids arrive as JSON numbers like `3.0`; anything non-integral maps to an id
// no table knows.
fn category_id(value: f64) -> i32 {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i32::MAX as f64 {
        value as i32
    } else {
        i32::MIN
    }
}

/// Pull a human message out of an error body:
/// `{"error": {"message": ".."}}` or `{"error": ".."}`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
}
