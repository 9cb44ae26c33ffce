//! Latest-request-wins wrapper around a [`DirectionsApi`].

use shared::{Point, Profile, RequestSequencer, Route, RouteError};

use crate::directions::DirectionsApi;

/// Outcome of [`RoutePlanner::plan`].
#[derive(Debug, Clone, PartialEq)]
pub enum Planned {
    /// The newest request finished; show this.
    Current(Result<Route, RouteError>),
    /// A newer request was issued while this one was in flight.
    Superseded,
}

impl Planned {
    pub fn into_current(self) -> Option<Result<Route, RouteError>> {
        match self {
            Planned::Current(result) => Some(result),
            Planned::Superseded => None,
        }
    }
}

pub struct RoutePlanner<A> {
    api: A,
    sequencer: RequestSequencer,
}

impl<A: DirectionsApi> RoutePlanner<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Fetch a route. Requests are never cancelled; a result that lands
    /// after a newer request was issued comes back as `Superseded`.
    pub async fn plan(&self, start: Point, end: Point, profile: Profile) -> Planned {
        let tag = self.sequencer.issue();
        let result = self.api.fetch_route(start, end, profile).await;

        if self.sequencer.is_latest(tag) {
            Planned::Current(result)
        } else {
            tracing::debug!(?tag, "discarding superseded route response");
            Planned::Superseded
        }
    }

    /// Drop whatever is in flight, e.g. when the user clears the route.
    pub fn cancel_pending(&self) {
        self.sequencer.invalidate();
    }
}
