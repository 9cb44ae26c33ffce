//! Keeps the live map (markers, route line, radar raster) in step with
//! application state.
//!
//! The map only accepts source and layer changes after its asynchronous
//! "ready" signal. Until then the synchronizer just records the desired
//! state; [`MapSynchronizer::mark_ready`] applies all of it at once.

use std::{cell::RefCell, rc::Rc};

use serde_json::Value;
use shared::{Bounds, Point, PointRole, RouteGeometry, radar};

pub const ROUTE_SOURCE: &str = "route";
pub const ROUTE_LAYER: &str = "route-line";
pub const RADAR_SOURCE: &str = "radar";
pub const RADAR_LAYER: &str = "radar-layer";
pub const FIT_PADDING_PX: u32 = 50;
pub const FIT_MAX_ZOOM: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct MapError(pub String);

/// The operations the synchronizer needs from a map library.
pub trait MapSurface {
    type Marker;

    fn add_geojson_source(&mut self, id: &str, data: &Value);
    fn set_geojson_data(&mut self, id: &str, data: &Value);
    fn add_route_layer(&mut self, id: &str, source: &str);

    fn add_raster_source(&mut self, id: &str, tiles: &str);
    /// Point an existing raster source at new tiles. Returns `false` when
    /// the map cannot swap tiles in place.
    fn set_raster_tiles(&mut self, id: &str, tiles: &str) -> bool;
    fn add_raster_layer(&mut self, id: &str, source: &str, before: Option<&str>);

    fn has_source(&self, id: &str) -> bool;
    fn has_layer(&self, id: &str) -> bool;
    fn remove_layer(&mut self, id: &str);
    fn remove_source(&mut self, id: &str);
    fn set_visibility(&mut self, layer: &str, visible: bool);
    /// Bottom-most label layer of the base style, if the style exposes one.
    fn first_label_layer(&self) -> Option<String>;

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32, max_zoom: f64) -> Result<(), MapError>;

    fn add_marker(&mut self, role: PointRole, point: Point) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);

    fn listen_clicks(&mut self, listener: Box<dyn FnMut(Point)>);
    fn unlisten_clicks(&mut self);
    fn dispose(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready,
    Destroyed,
}

type Handler = Box<dyn FnMut(Point)>;

#[derive(Default)]
struct HandlerSlot {
    handler: Option<Handler>,
    /// Bumped on every replace or clear.
    generation: u64,
}

/// One-slot cell holding the current click handler. The map listener is
/// registered once and always calls through this cell, so swapping the
/// handler never touches the map.
#[derive(Clone, Default)]
pub struct ClickHandler(Rc<RefCell<HandlerSlot>>);

impl ClickHandler {
    pub fn replace(&self, handler: impl FnMut(Point) + 'static) {
        let mut slot = self.0.borrow_mut();
        slot.handler = Some(Box::new(handler));
        slot.generation += 1;
    }

    pub fn clear(&self) {
        let mut slot = self.0.borrow_mut();
        slot.handler = None;
        slot.generation += 1;
    }

    /// The handler runs outside the borrow, so it may replace or clear
    /// itself. A click arriving while it runs is dropped.
    pub fn dispatch(&self, point: Point) {
        let (handler, generation) = {
            let mut slot = self.0.borrow_mut();
            (slot.handler.take(), slot.generation)
        };
        let Some(mut handler) = handler else {
            log::debug!("no click handler, dropping click");
            return;
        };
        handler(point);

        let mut slot = self.0.borrow_mut();
        if slot.generation == generation {
            slot.handler = Some(handler);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DesiredView {
    route: Option<RouteGeometry>,
    start: Option<Point>,
    end: Option<Point>,
    radar_enabled: bool,
    radar_timestamp: Option<i64>,
}

impl DesiredView {
    fn radar_timestamp_to_show(&self) -> Option<i64> {
        self.radar_enabled.then_some(self.radar_timestamp).flatten()
    }
}

pub struct MapSynchronizer<S: MapSurface> {
    lifecycle: Lifecycle,
    surface: Option<S>,
    desired: DesiredView,
    start_marker: Option<S::Marker>,
    end_marker: Option<S::Marker>,
    radar_tiles: Option<String>,
    click_handler: ClickHandler,
}

impl<S: MapSurface> Default for MapSynchronizer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MapSurface> MapSynchronizer<S> {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            surface: None,
            desired: DesiredView::default(),
            start_marker: None,
            end_marker: None,
            radar_tiles: None,
            click_handler: ClickHandler::default(),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    /// Take ownership of a freshly constructed map and register the one
    /// click listener it will ever get.
    pub fn attach(&mut self, mut surface: S) {
        if self.lifecycle != Lifecycle::Uninitialized {
            log::warn!("map already attached ({:?}), ignoring", self.lifecycle);
            return;
        }
        let handler = self.click_handler.clone();
        surface.listen_clicks(Box::new(move |point| handler.dispatch(point)));
        self.surface = Some(surface);
        self.lifecycle = Lifecycle::Initializing;
        log::debug!("map initializing");
    }

    /// The map's load event. Creates the route source and layer, then
    /// applies everything requested so far.
    pub fn mark_ready(&mut self) {
        if self.lifecycle != Lifecycle::Initializing {
            log::debug!("ready signal in state {:?}, ignoring", self.lifecycle);
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.add_geojson_source(ROUTE_SOURCE, &RouteGeometry::empty_geojson());
        surface.add_route_layer(ROUTE_LAYER, ROUTE_SOURCE);
        self.lifecycle = Lifecycle::Ready;
        log::debug!("map ready");

        self.apply_markers();
        self.apply_route();
        self.apply_radar();
    }

    /// Show `geometry` and fit the view to it, or clear the line when
    /// `None` or too short to draw.
    pub fn set_route(&mut self, geometry: Option<&RouteGeometry>) {
        let geometry = geometry.cloned();
        if self.is_ready() && self.desired.route == geometry {
            return;
        }
        self.desired.route = geometry;
        self.apply_route();
    }

    /// Replace both markers. Existing markers are always removed first.
    pub fn set_markers(&mut self, start: Option<Point>, end: Option<Point>) {
        self.desired.start = start;
        self.desired.end = end;
        self.apply_markers();
    }

    pub fn set_radar(&mut self, enabled: bool, timestamp: Option<i64>) {
        self.desired.radar_enabled = enabled;
        self.desired.radar_timestamp = timestamp;
        self.apply_radar();
    }

    /// Route clicks to `handler` from now on.
    pub fn on_user_click(&mut self, handler: impl FnMut(Point) + 'static) {
        self.click_handler.replace(handler);
    }

    /// Unregister the click listener and dispose of the map. Safe in any
    /// state and idempotent.
    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        if let Some(mut surface) = self.surface.take() {
            if let Some(marker) = self.start_marker.take() {
                surface.remove_marker(marker);
            }
            if let Some(marker) = self.end_marker.take() {
                surface.remove_marker(marker);
            }
            surface.unlisten_clicks();
            surface.dispose();
        }
        self.click_handler.clear();
        self.radar_tiles = None;
        self.lifecycle = Lifecycle::Destroyed;
        log::debug!("map destroyed");
    }

    fn ready_surface(&mut self) -> Option<&mut S> {
        match self.lifecycle {
            Lifecycle::Ready => self.surface.as_mut(),
            _ => None,
        }
    }

    fn apply_markers(&mut self) {
        if !self.is_ready() {
            return;
        }
        let (start, end) = (self.desired.start, self.desired.end);
        let old_start = self.start_marker.take();
        let old_end = self.end_marker.take();
        let Some(surface) = self.ready_surface() else {
            return;
        };

        for marker in [old_start, old_end].into_iter().flatten() {
            surface.remove_marker(marker);
        }
        let new_start = start.map(|p| surface.add_marker(PointRole::Start, p));
        let new_end = end.map(|p| surface.add_marker(PointRole::End, p));

        self.start_marker = new_start;
        self.end_marker = new_end;
    }

    fn apply_route(&mut self) {
        if !self.is_ready() {
            return;
        }
        let route = self.desired.route.clone();
        let Some(surface) = self.ready_surface() else {
            return;
        };

        match route.filter(RouteGeometry::is_drawable) {
            Some(geometry) => {
                surface.set_geojson_data(ROUTE_SOURCE, &geometry.to_geojson());
                let fitted = geometry
                    .bounds()
                    .map_err(|e| MapError(e.to_string()))
                    .and_then(|bounds| surface.fit_bounds(bounds, FIT_PADDING_PX, FIT_MAX_ZOOM));
                if let Err(err) = fitted {
                    log::warn!("could not fit map to route: {err}");
                }
            }
            None => surface.set_geojson_data(ROUTE_SOURCE, &RouteGeometry::empty_geojson()),
        }
    }

    fn apply_radar(&mut self) {
        if !self.is_ready() {
            return;
        }
        let timestamp = self.desired.radar_timestamp_to_show();
        let current_tiles = self.radar_tiles.clone();
        let Some(surface) = self.ready_surface() else {
            return;
        };

        let Some(timestamp) = timestamp else {
            if surface.has_layer(RADAR_LAYER) {
                surface.set_visibility(RADAR_LAYER, false);
            }
            return;
        };

        let tiles = radar::tile_url(timestamp);
        if !surface.has_source(RADAR_SOURCE) {
            insert_radar(surface, &tiles);
        } else if current_tiles.as_deref() != Some(tiles.as_str())
            && !surface.set_raster_tiles(RADAR_SOURCE, &tiles)
        {
            log::debug!("map cannot swap raster tiles in place, recreating radar layer");
            if surface.has_layer(RADAR_LAYER) {
                surface.remove_layer(RADAR_LAYER);
            }
            surface.remove_source(RADAR_SOURCE);
            insert_radar(surface, &tiles);
        }
        surface.set_visibility(RADAR_LAYER, true);
        self.radar_tiles = Some(tiles);
    }
}

/// Add the radar source and layer beneath labels, or beneath the route line
/// when the style has no labels.
fn insert_radar<S: MapSurface>(surface: &mut S, tiles: &str) {
    surface.add_raster_source(RADAR_SOURCE, tiles);
    let before = surface
        .first_label_layer()
        .or_else(|| surface.has_layer(ROUTE_LAYER).then(|| ROUTE_LAYER.to_string()));
    surface.add_raster_layer(RADAR_LAYER, RADAR_SOURCE, before.as_deref());
}

impl<S: MapSurface> Drop for MapSynchronizer<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
