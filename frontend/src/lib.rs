use seed::{prelude::*, *};
use shared::{
    Point, PointSettingMode, PointStore, Profile, RadarError, RadarFrame, RequestTag, Route,
    RouteError, radar,
};
use wasm_bindgen::prelude::wasm_bindgen;

pub mod config;
mod fetch;
pub mod map_sync;
mod maplibre;
pub mod session;
mod view;

use config::AppConfig;
use map_sync::MapSynchronizer;
use maplibre::MapLibreSurface;
use session::{RadarSession, RouteSession};

const MAP_CONTAINER: &str = "map";
const RADAR_REFRESH_MS: u32 = (radar::REFRESH_INTERVAL_SECS * 1000) as u32;

pub struct Model {
    config: AppConfig,
    points: PointStore,
    profile: Profile,
    panel_open: bool,
    route: RouteSession,
    radar: RadarSession,
    /// Dropping the handle stops the refresh timer.
    radar_timer: Option<StreamHandle>,
    map: MapSynchronizer<MapLibreSurface>,
}

pub enum Msg {
    OpenPanel,
    HidePanel,
    SetMode(PointSettingMode),
    SetProfile(Profile),
    MapReady,
    MapClicked(Point),
    Calculate,
    RouteFetched {
        tag: RequestTag,
        result: Result<Route, RouteError>,
    },
    ClearRoute,
    ToggleRadar,
    RadarTick,
    RadarFetched {
        tag: RequestTag,
        result: Result<Vec<RadarFrame>, RadarError>,
    },
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    let config = AppConfig::from_build_env();
    for problem in config.problems() {
        log::error!("{problem}");
    }

    let mut map = MapSynchronizer::new();
    match config.style_url() {
        Ok(style_url) => {
            let ready = orders.msg_sender();
            let surface = MapLibreSurface::new(MAP_CONTAINER, &style_url, move || {
                ready(Some(Msg::MapReady));
            });
            map.attach(surface);

            let clicked = orders.msg_sender();
            map.on_user_click(move |point| clicked(Some(Msg::MapClicked(point))));
        }
        Err(err) => log::error!("map disabled: {err}"),
    }

    Model {
        config,
        points: PointStore::default(),
        profile: Profile::default(),
        panel_open: false,
        route: RouteSession::default(),
        radar: RadarSession::default(),
        radar_timer: None,
        map,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::OpenPanel => {
            model.panel_open = true;
            model.points.open();
        }
        Msg::HidePanel => {
            model.panel_open = false;
            model.points.set_mode(PointSettingMode::None);
        }
        Msg::SetMode(mode) => model.points.set_mode(mode),
        Msg::SetProfile(profile) => model.profile = profile,
        Msg::MapReady => model.map.mark_ready(),
        Msg::MapClicked(point) => {
            if !point.is_valid() {
                log::warn!("ignoring click outside valid coordinates: {point:?}");
                return;
            }
            if let Some(role) = model.points.handle_click(point) {
                log::debug!("{role:?} set to {:.5},{:.5}", point.lng, point.lat);
                sync_markers(model);
            } else {
                orders.skip();
            }
        }
        Msg::Calculate => {
            let Some((start, end)) = model.points.endpoints() else {
                return;
            };
            let api_key = match model.config.directions_api_key() {
                Ok(key) => key.to_string(),
                Err(err) => {
                    log::error!("cannot calculate route: {err}");
                    return;
                }
            };
            let base_url = model.config.directions_base_url().to_string();
            let profile = model.profile;

            let tag = model.route.begin();
            model.map.set_route(None);
            orders.perform_cmd(async move {
                let result = fetch::fetch_route(&base_url, &api_key, start, end, profile).await;
                Msg::RouteFetched { tag, result }
            });
        }
        Msg::RouteFetched { tag, result } => {
            if model.route.finish(tag, result) {
                model.map.set_route(model.route.geometry());
            } else {
                orders.skip();
            }
        }
        Msg::ClearRoute => {
            model.route.clear();
            model.points.clear();
            model.map.set_route(None);
            sync_markers(model);
        }
        Msg::ToggleRadar => {
            if model.radar.toggle() {
                model.radar_timer = Some(orders.stream_with_handle(streams::interval(
                    RADAR_REFRESH_MS,
                    || Msg::RadarTick,
                )));
                orders.send_msg(Msg::RadarTick);
            } else {
                model.radar_timer = None;
            }
            sync_radar(model);
        }
        Msg::RadarTick => {
            if let Some(tag) = model.radar.begin_fetch() {
                orders.perform_cmd(async move {
                    let result = fetch::fetch_radar_frames().await;
                    Msg::RadarFetched { tag, result }
                });
            }
            orders.skip();
        }
        Msg::RadarFetched { tag, result } => {
            if model.radar.finish(tag, result) {
                sync_radar(model);
            } else {
                orders.skip();
            }
        }
    }
}

fn sync_markers(model: &mut Model) {
    model
        .map
        .set_markers(model.points.start(), model.points.end());
}

fn sync_radar(model: &mut Model) {
    model
        .map
        .set_radar(model.radar.enabled(), model.radar.visible_timestamp());
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("logger already installed: {err}").into());
    }
    App::start("app", init, update, view::view);
}
