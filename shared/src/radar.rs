//! Weather-radar metadata decoding and the feed state derived from it.

use serde::{Deserialize, Serialize};

use crate::error::RadarError;

pub const DEFAULT_METADATA_URL: &str = "https://api.rainviewer.com/public/weather-maps.json";
pub const TILE_SIZE: u32 = 512;
pub const REFRESH_INTERVAL_SECS: u64 = 600;

/// One timestamped radar image available from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RadarFrame {
    /// Unix seconds.
    pub timestamp: i64,
}

impl RadarFrame {
    pub fn tile_url(&self) -> String {
        tile_url(self.timestamp)
    }
}

/// Raster tile template for a frame; `{z}/{x}/{y}` stay as placeholders for
/// the map library to fill in.
pub fn tile_url(timestamp: i64) -> String {
    format!("https://tilecache.rainviewer.com/v2/radar/{timestamp}/{TILE_SIZE}/{{z}}/{{x}}/{{y}}/2/1_1.png")
}

#[derive(Deserialize)]
struct WeatherMaps {
    radar: Option<RadarSection>,
}

#[derive(Deserialize)]
struct RadarSection {
    #[serde(default)]
    past: Vec<FrameEntry>,
    #[serde(default)]
    nowcast: Vec<FrameEntry>,
}

#[derive(Deserialize)]
struct FrameEntry {
    time: i64,
}

/// Decode the metadata document into frames, oldest first, with "past" and
/// "nowcast" merged and duplicates dropped.
pub fn parse_frames(body: &str) -> Result<Vec<RadarFrame>, RadarError> {
    let maps: WeatherMaps =
        serde_json::from_str(body).map_err(|e| RadarError::Malformed(e.to_string()))?;
    let radar = maps
        .radar
        .ok_or_else(|| RadarError::Malformed("document has no radar section".into()))?;

    let mut frames: Vec<RadarFrame> = radar
        .past
        .into_iter()
        .chain(radar.nowcast)
        .map(|entry| RadarFrame {
            timestamp: entry.time,
        })
        .collect();
    frames.sort_unstable();
    frames.dedup();
    Ok(frames)
}

/// What the rest of the app knows about the radar feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarFeed {
    frames: Vec<RadarFrame>,
    last_error: Option<RadarError>,
}

impl RadarFeed {
    /// Replace the feed with the outcome of a metadata fetch. Failures and
    /// empty feeds drop every frame so no stale timestamp survives.
    pub fn apply(&mut self, result: Result<Vec<RadarFrame>, RadarError>) {
        match result {
            Ok(frames) if frames.is_empty() => {
                self.frames.clear();
                self.last_error = Some(RadarError::NoFrames);
            }
            Ok(mut frames) => {
                frames.sort_unstable();
                self.frames = frames;
                self.last_error = None;
            }
            Err(err) => {
                self.frames.clear();
                self.last_error = Some(err);
            }
        }
    }

    pub fn from_result(result: Result<Vec<RadarFrame>, RadarError>) -> Self {
        let mut feed = Self::default();
        feed.apply(result);
        feed
    }

    pub fn frames(&self) -> &[RadarFrame] {
        &self.frames
    }

    /// Newest frame, the one that gets rendered.
    pub fn current(&self) -> Option<RadarFrame> {
        self.frames.last().copied()
    }

    pub fn current_timestamp(&self) -> Option<i64> {
        self.current().map(|f| f.timestamp)
    }

    pub fn is_available(&self) -> bool {
        self.current().is_some()
    }

    pub fn last_error(&self) -> Option<&RadarError> {
        self.last_error.as_ref()
    }
}
