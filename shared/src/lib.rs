pub mod categories;
pub mod directions;
pub mod error;
pub mod format;
pub mod geo;
pub mod points;
pub mod radar;
pub mod route;
pub mod sequence;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use error::{BoundsError, ConfigError, RadarError, RouteError};
pub use format::{format_distance, format_duration};
pub use points::{PointRole, PointSettingMode, PointStore};
pub use radar::{RadarFeed, RadarFrame};
pub use route::{Bounds, ElevationProfile, Position, Route, RouteGeometry, RouteSummary};
pub use sequence::{RequestSequencer, RequestTag};

/// A geographic point picked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lng: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl FromStr for Point {
    type Err = String;

    /// Parses `"lng,lat"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lng, lat) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LNG,LAT, got {s:?}"))?;
        let parse = |field: &str, label: &str| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid {label} {field:?}"))
        };
        let point = Point::new(parse(lng, "longitude")?, parse(lat, "latitude")?);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(format!("coordinate out of range: {s:?}"))
        }
    }
}

/// Travel mode used by the directions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    Driving,
    RoadCycling,
    MountainCycling,
    #[default]
    Hiking,
}

impl Profile {
    pub const ALL: [Profile; 4] = [
        Profile::Driving,
        Profile::RoadCycling,
        Profile::MountainCycling,
        Profile::Hiking,
    ];

    /// Path segment understood by the directions API.
    pub fn api_id(self) -> &'static str {
        match self {
            Profile::Driving => "driving-car",
            Profile::RoadCycling => "cycling-road",
            Profile::MountainCycling => "cycling-mountain",
            Profile::Hiking => "foot-hiking",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Profile::Driving => "Driving",
            Profile::RoadCycling => "Road cycling",
            Profile::MountainCycling => "Mountain biking",
            Profile::Hiking => "Hiking",
        }
    }

    pub fn is_cycling(self) -> bool {
        matches!(self, Profile::RoadCycling | Profile::MountainCycling)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_id())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "driving" | "driving-car" => Ok(Profile::Driving),
            "road-cycling" | "cycling-road" => Ok(Profile::RoadCycling),
            "mountain-cycling" | "cycling-mountain" => Ok(Profile::MountainCycling),
            "hiking" | "foot-hiking" => Ok(Profile::Hiking),
            other => Err(format!("unknown profile {other:?}")),
        }
    }
}
