use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::categories::BreakdownEntry;
use crate::error::BoundsError;
use crate::geo::haversine_m;

/// One vertex of a route: `[lng, lat]` or `[lng, lat, elevation]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
    pub elevation: Option<f64>,
}

impl Position {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            lng,
            lat,
            elevation: None,
        }
    }

    pub fn with_elevation(lng: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lng,
            lat,
            elevation: Some(elevation),
        }
    }

    fn lng_lat(&self) -> (f64, f64) {
        (self.lng, self.lat)
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lng, lat] => Ok(Position::new(*lng, *lat)),
            [lng, lat, elevation] => Ok(Position::with_elevation(*lng, *lat, *elevation)),
            other => Err(format!(
                "coordinate must have 2 or 3 components, got {}",
                other.len()
            )),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        match position.elevation {
            Some(elevation) => vec![position.lng, position.lat, elevation],
            None => vec![position.lng, position.lat],
        }
    }
}

/// Ordered path of a route, as returned by the directions API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteGeometry {
    pub coordinates: Vec<Position>,
}

impl RouteGeometry {
    pub fn new(coordinates: Vec<Position>) -> Self {
        Self { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// A line needs at least two vertices to be drawn.
    pub fn is_drawable(&self) -> bool {
        self.coordinates.len() >= 2
    }

    pub fn bounds(&self) -> Result<Bounds, BoundsError> {
        Bounds::from_positions(&self.coordinates)
    }

    /// GeoJSON `Feature` with a `LineString`, ready to hand to a map source.
    pub fn to_geojson(&self) -> Value {
        let coordinates: Vec<Vec<f64>> = self.coordinates.iter().copied().map(Vec::from).collect();
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            }
        })
    }

    pub fn empty_geojson() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn from_positions(positions: &[Position]) -> Result<Self, BoundsError> {
        let first = positions.first().ok_or(BoundsError::Empty)?;
        let mut bounds = Bounds {
            min_lng: first.lng,
            min_lat: first.lat,
            max_lng: first.lng,
            max_lat: first.lat,
        };
        for p in positions {
            if !p.lng.is_finite() || !p.lat.is_finite() {
                return Err(BoundsError::NonFinite);
            }
            bounds.min_lng = bounds.min_lng.min(p.lng);
            bounds.min_lat = bounds.min_lat.min(p.lat);
            bounds.max_lng = bounds.max_lng.max(p.lng);
            bounds.max_lat = bounds.max_lat.max(p.lat);
        }
        Ok(bounds)
    }

    /// `[[west, south], [east, north]]`, the shape map libraries expect.
    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [[self.min_lng, self.min_lat], [self.max_lng, self.max_lat]]
    }
}

/// Distance-versus-elevation samples for the elevation chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    /// `(cumulative distance in metres, elevation in metres)`
    pub samples: Vec<(f64, f64)>,
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
}

impl ElevationProfile {
    /// Positions without an elevation still advance the distance but add no sample.
    pub fn from_positions(positions: &[Position]) -> Self {
        let mut samples = Vec::with_capacity(positions.len());
        let mut distance = 0.0;
        let mut previous: Option<&Position> = None;

        for position in positions {
            if let Some(prev) = previous {
                distance += haversine_m(prev.lng_lat(), position.lng_lat());
            }
            if let Some(elevation) = position.elevation.filter(|e| e.is_finite()) {
                samples.push((distance, elevation));
            }
            previous = Some(position);
        }

        let min_elevation = samples.iter().map(|s| s.1).reduce(f64::min);
        let max_elevation = samples.iter().map(|s| s.1).reduce(f64::max);

        Self {
            samples,
            min_elevation,
            max_elevation,
        }
    }

    pub fn total_distance_m(&self) -> f64 {
        self.samples.last().map(|s| s.0).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
    pub ascent_m: f64,
    pub descent_m: f64,
    pub surface: Vec<BreakdownEntry>,
    pub waytype: Vec<BreakdownEntry>,
    pub trail_difficulty: Vec<BreakdownEntry>,
    pub steepness: Vec<BreakdownEntry>,
    pub elevation_coordinates: Vec<Position>,
}

impl RouteSummary {
    pub fn elevation_profile(&self) -> ElevationProfile {
        ElevationProfile::from_positions(&self.elevation_coordinates)
    }
}

/// Geometry and summary of one directions response. They are only ever
/// produced, replaced and discarded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub geometry: RouteGeometry,
    pub summary: RouteSummary,
}
