//! In-memory state of the route and radar fetches, independent of the DOM.

use shared::{
    RadarError, RadarFeed, RadarFrame, RequestSequencer, RequestTag, Route, RouteError,
    RouteGeometry, RouteSummary,
};

/// The current route and the fetch that may replace it.
///
/// Geometry and summary live in one `Route`, so they are always replaced
/// or cleared together.
#[derive(Debug, Default)]
pub struct RouteSession {
    sequencer: RequestSequencer,
    pending: Option<RequestTag>,
    route: Option<Route>,
    error: Option<RouteError>,
}

impl RouteSession {
    /// Start a fetch. The displayed route is dropped right away so the
    /// summary never describes a different geometry than the one requested.
    pub fn begin(&mut self) -> RequestTag {
        let tag = self.sequencer.issue();
        self.pending = Some(tag);
        self.route = None;
        self.error = None;
        tag
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record the outcome of the fetch tagged `tag`. Returns `false` and
    /// changes nothing when a newer fetch or a clear happened since.
    pub fn finish(&mut self, tag: RequestTag, result: Result<Route, RouteError>) -> bool {
        if !self.sequencer.is_latest(tag) {
            log::debug!("dropping superseded route response {tag:?}");
            return false;
        }
        self.pending = None;
        match result {
            Ok(route) => {
                self.route = Some(route);
                self.error = None;
            }
            Err(err) => {
                log::warn!("route fetch failed: {err}");
                self.route = None;
                self.error = Some(err);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.sequencer.invalidate();
        self.pending = None;
        self.route = None;
        self.error = None;
    }

    pub fn geometry(&self) -> Option<&RouteGeometry> {
        self.route.as_ref().map(|r| &r.geometry)
    }

    pub fn summary(&self) -> Option<&RouteSummary> {
        self.route.as_ref().map(|r| &r.summary)
    }

    pub fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

/// The radar toggle and the latest metadata fetched while it was on.
#[derive(Debug, Default)]
pub struct RadarSession {
    enabled: bool,
    feed: RadarFeed,
    sequencer: RequestSequencer,
}

impl RadarSession {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the toggle and return the new state. Turning radar off forgets
    /// the feed and supersedes any fetch in flight.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.sequencer.invalidate();
            self.feed = RadarFeed::default();
        }
        self.enabled
    }

    /// Tag for a new metadata fetch, or `None` while radar is off.
    pub fn begin_fetch(&mut self) -> Option<RequestTag> {
        self.enabled.then(|| self.sequencer.issue())
    }

    pub fn finish(&mut self, tag: RequestTag, result: Result<Vec<RadarFrame>, RadarError>) -> bool {
        if !self.enabled || !self.sequencer.is_latest(tag) {
            log::debug!("dropping superseded radar response {tag:?}");
            return false;
        }
        if let Err(err) = &result {
            log::warn!("radar fetch failed: {err}");
        }
        self.feed.apply(result);
        true
    }

    /// Frame to draw, or `None` while radar is off or has no usable frame.
    pub fn visible_timestamp(&self) -> Option<i64> {
        self.enabled.then(|| self.feed.current_timestamp()).flatten()
    }

    /// Message shown next to the toggle when radar is on but unavailable.
    pub fn warning(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.feed.last_error().map(ToString::to_string)
    }
}
