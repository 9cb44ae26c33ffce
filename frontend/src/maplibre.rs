//! `MapSurface` over the global `maplibregl` object loaded by `index.html`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::{Bounds, Point, PointRole};
use wasm_bindgen::{
    JsCast,
    prelude::{Closure, JsValue, wasm_bindgen},
};

use crate::map_sync::{MapError, MapSurface};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    type Map;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    fn new(options: &JsValue) -> Map;
    #[wasm_bindgen(method)]
    fn on(this: &Map, event: &str, listener: &JsValue);
    #[wasm_bindgen(method)]
    fn off(this: &Map, event: &str, listener: &JsValue);
    #[wasm_bindgen(method)]
    fn once(this: &Map, event: &str, listener: &JsValue);
    #[wasm_bindgen(method, js_name = addSource)]
    fn add_source(this: &Map, id: &str, source: &JsValue);
    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &Map, id: &str) -> JsValue;
    #[wasm_bindgen(method, js_name = removeSource)]
    fn remove_source(this: &Map, id: &str);
    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &JsValue, before: Option<String>);
    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &Map, id: &str) -> JsValue;
    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &Map, id: &str);
    #[wasm_bindgen(method, js_name = setLayoutProperty)]
    fn set_layout_property(this: &Map, layer: &str, name: &str, value: &JsValue);
    #[wasm_bindgen(method, catch, js_name = fitBounds)]
    fn fit_bounds(this: &Map, bounds: &JsValue, options: &JsValue) -> Result<(), JsValue>;
    #[wasm_bindgen(method, catch, js_name = getStyle)]
    fn get_style(this: &Map) -> Result<JsValue, JsValue>;
    #[wasm_bindgen(method)]
    fn remove(this: &Map);

    #[wasm_bindgen(js_namespace = maplibregl)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    fn new(options: &JsValue) -> Marker;
    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;
    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;
    #[wasm_bindgen(method)]
    fn remove(this: &Marker);
}

#[wasm_bindgen]
extern "C" {
    type GeoJsonSource;

    #[wasm_bindgen(method, js_name = setData)]
    fn set_data(this: &GeoJsonSource, data: &JsValue);

    type RasterTileSource;

    #[wasm_bindgen(method, catch, js_name = setTiles)]
    fn set_tiles(this: &RasterTileSource, tiles: &JsValue) -> Result<JsValue, JsValue>;

    type MapMouseEvent;

    #[wasm_bindgen(method, getter, js_name = lngLat)]
    fn lng_lat(this: &MapMouseEvent) -> LngLat;

    type LngLat;

    #[wasm_bindgen(method, getter)]
    fn lng(this: &LngLat) -> f64;
    #[wasm_bindgen(method, getter)]
    fn lat(this: &LngLat) -> f64;
}

const START_COLOR: &str = "#2e7d32";
const END_COLOR: &str = "#c62828";
const ROUTE_COLOR: &str = "#1565c0";
const RADAR_OPACITY: f64 = 0.6;
const INITIAL_CENTER: [f64; 2] = [8.54, 47.37];
const INITIAL_ZOOM: f64 = 8.0;

/// Subset of a style document needed to find label layers.
#[derive(Deserialize, Default)]
struct StyleDoc {
    #[serde(default)]
    layers: Vec<StyleLayer>,
}

#[derive(Deserialize)]
struct StyleLayer {
    id: String,
    #[serde(rename = "type")]
    kind: String,
}

fn to_js(value: &Value) -> JsValue {
    // Plain objects, not JS Maps, are what maplibre expects.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or_else(|err| {
        log::error!("cannot convert value for the map: {err}");
        JsValue::NULL
    })
}

pub struct MapLibreSurface {
    map: Map,
    on_load: Option<Closure<dyn FnMut()>>,
    on_click: Option<Closure<dyn FnMut(MapMouseEvent)>>,
}

impl MapLibreSurface {
    /// Build the map inside the element with id `container`. `on_ready`
    /// fires once, when the style has loaded.
    pub fn new(container: &str, style_url: &str, on_ready: impl FnOnce() + 'static) -> Self {
        let map = Map::new(&to_js(&json!({
            "container": container,
            "style": style_url,
            "center": INITIAL_CENTER,
            "zoom": INITIAL_ZOOM,
        })));
        let on_load = Closure::once(on_ready);
        map.once("load", on_load.as_ref());
        Self {
            map,
            on_load: Some(on_load),
            on_click: None,
        }
    }
}

impl MapSurface for MapLibreSurface {
    type Marker = Marker;

    fn add_geojson_source(&mut self, id: &str, data: &Value) {
        self.map
            .add_source(id, &to_js(&json!({ "type": "geojson", "data": data })));
    }

    fn set_geojson_data(&mut self, id: &str, data: &Value) {
        let source = self.map.get_source(id);
        if source.is_undefined() {
            log::warn!("geojson source {id} missing");
            return;
        }
        source.unchecked_into::<GeoJsonSource>().set_data(&to_js(data));
    }

    fn add_route_layer(&mut self, id: &str, source: &str) {
        let layer = json!({
            "id": id,
            "type": "line",
            "source": source,
            "layout": { "line-join": "round", "line-cap": "round" },
            "paint": { "line-color": ROUTE_COLOR, "line-width": 5 },
        });
        self.map.add_layer(&to_js(&layer), None);
    }

    fn add_raster_source(&mut self, id: &str, tiles: &str) {
        let source = json!({
            "type": "raster",
            "tiles": [tiles],
            "tileSize": shared::radar::TILE_SIZE,
        });
        self.map.add_source(id, &to_js(&source));
    }

    fn set_raster_tiles(&mut self, id: &str, tiles: &str) -> bool {
        let source = self.map.get_source(id);
        if source.is_undefined() {
            return false;
        }
        source
            .unchecked_into::<RasterTileSource>()
            .set_tiles(&to_js(&json!([tiles])))
            .is_ok()
    }

    fn add_raster_layer(&mut self, id: &str, source: &str, before: Option<&str>) {
        let layer = json!({
            "id": id,
            "type": "raster",
            "source": source,
            "paint": { "raster-opacity": RADAR_OPACITY },
        });
        self.map
            .add_layer(&to_js(&layer), before.map(str::to_string));
    }

    fn has_source(&self, id: &str) -> bool {
        !self.map.get_source(id).is_undefined()
    }

    fn has_layer(&self, id: &str) -> bool {
        !self.map.get_layer(id).is_undefined()
    }

    fn remove_layer(&mut self, id: &str) {
        self.map.remove_layer(id);
    }

    fn remove_source(&mut self, id: &str) {
        self.map.remove_source(id);
    }

    fn set_visibility(&mut self, layer: &str, visible: bool) {
        let value = if visible { "visible" } else { "none" };
        self.map
            .set_layout_property(layer, "visibility", &JsValue::from_str(value));
    }

    fn first_label_layer(&self) -> Option<String> {
        let style = self.map.get_style().ok()?;
        let style: StyleDoc = serde_wasm_bindgen::from_value(style).unwrap_or_default();
        style
            .layers
            .into_iter()
            .find(|layer| layer.kind == "symbol")
            .map(|layer| layer.id)
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32, max_zoom: f64) -> Result<(), MapError> {
        let options = json!({ "padding": padding, "maxZoom": max_zoom });
        self.map
            .fit_bounds(&to_js(&json!(bounds.to_array())), &to_js(&options))
            .map_err(|err| MapError(format!("{err:?}")))
    }

    fn add_marker(&mut self, role: PointRole, point: Point) -> Marker {
        let color = match role {
            PointRole::Start => START_COLOR,
            PointRole::End => END_COLOR,
        };
        let marker = Marker::new(&to_js(&json!({ "color": color })));
        marker
            .set_lng_lat(&to_js(&json!([point.lng, point.lat])))
            .add_to(&self.map)
    }

    fn remove_marker(&mut self, marker: Marker) {
        marker.remove();
    }

    fn listen_clicks(&mut self, mut listener: Box<dyn FnMut(Point)>) {
        let closure = Closure::<dyn FnMut(MapMouseEvent)>::new(move |event: MapMouseEvent| {
            let lng_lat = event.lng_lat();
            listener(Point::new(lng_lat.lng(), lng_lat.lat()));
        });
        self.map.on("click", closure.as_ref());
        self.on_click = Some(closure);
    }

    fn unlisten_clicks(&mut self) {
        if let Some(closure) = self.on_click.take() {
            self.map.off("click", closure.as_ref());
        }
    }

    fn dispose(&mut self) {
        self.map.remove();
        self.on_load = None;
    }
}
