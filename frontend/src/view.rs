use seed::{prelude::*, virtual_dom::AtValue, *};
use shared::{
    ElevationProfile, PointRole, PointSettingMode, Profile, RouteError, RouteSummary,
    categories::{BreakdownEntry, BreakdownKind},
    format::{format_distance, format_duration, format_elevation},
};

use crate::{Model, Msg};

const CHART_WIDTH: f64 = 320.0;
const CHART_HEIGHT: f64 = 100.0;

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container"],
        view_config_problems(model),
        view_radar_toggle(model),
        view_planner(model),
        model
            .route
            .summary()
            .map(|summary| view_summary(summary, model.profile))
            .unwrap_or_else(|| empty![]),
    ]
}

fn view_config_problems(model: &Model) -> Node<Msg> {
    let problems = model.config.problems();
    if problems.is_empty() {
        return empty![];
    }
    div![
        C!["config-errors"],
        problems
            .iter()
            .map(|problem| p![C!["error"], problem.to_string()]),
    ]
}

fn view_radar_toggle(model: &Model) -> Node<Msg> {
    let enabled = model.radar.enabled();
    div![
        C!["radar-toggle"],
        button![
            C![IF!(enabled => "active")],
            if enabled { "Hide radar" } else { "Show radar" },
            attrs! { At::Disabled => bool_attr(!model.map.is_ready()) },
            ev(Ev::Click, |_| Msg::ToggleRadar),
        ],
        model
            .radar
            .warning()
            .map(|warning| small![C!["warning"], warning])
            .unwrap_or_else(|| empty![]),
    ]
}

fn view_planner(model: &Model) -> Node<Msg> {
    if !model.panel_open {
        return button![
            C!["open-planner"],
            "Plan a route",
            ev(Ev::Click, |_| Msg::OpenPanel),
        ];
    }

    let can_calculate = model.points.endpoints().is_some()
        && model.config.directions_api_key().is_ok()
        && !model.route.is_pending();

    div![
        C!["planning-panel"],
        h2!["Route planner"],
        fieldset![
            legend!["Mode"],
            div![
                C!["profiles"],
                Profile::ALL.iter().map(|&profile| {
                    button![
                        C![IF!(model.profile == profile => "active")],
                        profile.label(),
                        ev(Ev::Click, move |_| Msg::SetProfile(profile)),
                    ]
                }),
            ],
        ],
        fieldset![
            legend!["Points"],
            view_point_button(model, PointRole::Start),
            view_point_button(model, PointRole::End),
            small![match model.points.mode() {
                PointSettingMode::SettingStart => "Click the map to place the start.",
                PointSettingMode::SettingEnd => "Click the map to place the end.",
                PointSettingMode::None => "",
            }],
        ],
        div![
            C!["actions"],
            button![
                if model.route.is_pending() {
                    "Calculating…"
                } else {
                    "Calculate route"
                },
                attrs! { At::Disabled => bool_attr(!can_calculate) },
                ev(Ev::Click, |_| Msg::Calculate),
            ],
            button!["Clear", ev(Ev::Click, |_| Msg::ClearRoute)],
            button!["Hide", ev(Ev::Click, |_| Msg::HidePanel)],
        ],
        model
            .route
            .error()
            .map(view_route_error)
            .unwrap_or_else(|| empty![]),
    ]
}

fn view_route_error(err: &RouteError) -> Node<Msg> {
    p![
        C!["error"],
        err.to_string(),
        retry_hint(err).map(|hint| small![C!["hint"], " ", hint]),
    ]
}

/// Extra line under a route error when trying again may help.
pub fn retry_hint(err: &RouteError) -> Option<&'static str> {
    err.is_retryable()
        .then_some("Check your connection and try again.")
}

fn view_point_button(model: &Model, role: PointRole) -> Node<Msg> {
    let (label, point, mode) = match role {
        PointRole::Start => ("Start", model.points.start(), PointSettingMode::SettingStart),
        PointRole::End => ("End", model.points.end(), PointSettingMode::SettingEnd),
    };
    let text = match point {
        Some(p) => format!("{label}: {:.5}, {:.5}", p.lat, p.lng),
        None => format!("Set {}", label.to_lowercase()),
    };
    button![
        C!["point-button", IF!(model.points.mode() == mode => "active")],
        text,
        ev(Ev::Click, move |_| Msg::SetMode(mode)),
    ]
}

fn view_summary(summary: &RouteSummary, profile: Profile) -> Node<Msg> {
    let stat = |label: &str, value: String| {
        div![C!["stat-tile"], span![C!["label"], label], strong![value]]
    };

    div![
        C!["summary-card"],
        div![
            C!["stats"],
            stat("Distance", format_distance(summary.distance_m)),
            stat("Duration", format_duration(summary.duration_s)),
            stat("Ascent", format_elevation(summary.ascent_m)),
            stat("Descent", format_elevation(summary.descent_m)),
        ],
        view_breakdown(BreakdownKind::Surface.title(), &summary.surface),
        view_breakdown(BreakdownKind::WayType.title(), &summary.waytype),
        view_breakdown(
            BreakdownKind::trail_difficulty_for(profile).title(),
            &summary.trail_difficulty
        ),
        view_breakdown(BreakdownKind::Steepness.title(), &summary.steepness),
        view_elevation_chart(&summary.elevation_profile()),
    ]
}

fn view_breakdown(title: &str, entries: &[BreakdownEntry]) -> Node<Msg> {
    if entries.is_empty() {
        return empty![];
    }
    div![
        C!["breakdown"],
        h3![title],
        div![
            C!["breakdown-bar"],
            entries.iter().map(|entry| {
                div![
                    C!["segment"],
                    style! {
                        St::Width => format!("{:.1}%", entry.percentage),
                        St::BackgroundColor => entry.color(),
                    },
                    attrs! { At::Title => format!("{}: {}", entry.label(), format_distance(entry.distance_m)) },
                ]
            }),
        ],
        ul![
            C!["legend"],
            entries.iter().map(|entry| {
                li![
                    span![C!["swatch"], style! { St::BackgroundColor => entry.color() }],
                    format!("{} {:.0}%", entry.label(), entry.percentage),
                ]
            }),
        ],
    ]
}

fn view_elevation_chart(profile: &ElevationProfile) -> Node<Msg> {
    let Some(path_data) = elevation_path(profile, CHART_WIDTH, CHART_HEIGHT) else {
        return empty![];
    };
    let range = match (profile.min_elevation, profile.max_elevation) {
        (Some(min), Some(max)) => format!("{} – {}", format_elevation(min), format_elevation(max)),
        _ => String::new(),
    };

    div![
        C!["elevation-section"],
        h3!["Elevation"],
        svg![
            attrs! {
                At::ViewBox => format!("0 0 {CHART_WIDTH} {CHART_HEIGHT}"),
                At::from("preserveAspectRatio") => "none",
            },
            path![attrs! {
                At::D => path_data,
                At::Fill => "none",
                At::Stroke => "#1565c0",
                At::from("stroke-width") => "2",
            }],
        ],
        small![format!(
            "{range} over {}",
            format_distance(profile.total_distance_m())
        )],
    ]
}

/// SVG path for elevation against distance, scaled to `width` x `height`
/// with higher ground towards the top. `None` when there is nothing to draw.
pub fn elevation_path(profile: &ElevationProfile, width: f64, height: f64) -> Option<String> {
    let total = profile.total_distance_m();
    let (min, max) = (profile.min_elevation?, profile.max_elevation?);
    if profile.samples.len() < 2 || total <= 0.0 {
        return None;
    }
    let span = max - min;

    let points: Vec<String> = profile
        .samples
        .iter()
        .map(|&(distance, elevation)| {
            let x = distance / total * width;
            let y = if span > 0.0 {
                height - (elevation - min) / span * height
            } else {
                height / 2.0
            };
            format!("{x:.1},{y:.1}")
        })
        .collect();
    Some(format!("M{}", points.join(" L")))
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(samples: Vec<(f64, f64)>) -> ElevationProfile {
        let min_elevation = samples.iter().map(|s| s.1).reduce(f64::min);
        let max_elevation = samples.iter().map(|s| s.1).reduce(f64::max);
        ElevationProfile {
            samples,
            min_elevation,
            max_elevation,
        }
    }

    #[test]
    fn path_spans_the_chart() {
        let path = elevation_path(&profile(vec![(0.0, 100.0), (500.0, 200.0), (1000.0, 150.0)]), 200.0, 100.0);
        assert_eq!(path.as_deref(), Some("M0.0,100.0 L100.0,0.0 L200.0,50.0"));
    }

    #[test]
    fn flat_route_draws_a_midline() {
        let path = elevation_path(&profile(vec![(0.0, 50.0), (100.0, 50.0)]), 10.0, 10.0);
        assert_eq!(path.as_deref(), Some("M0.0,5.0 L10.0,5.0"));
    }

    #[test]
    fn transient_errors_suggest_retrying() {
        assert!(retry_hint(&RouteError::Network("offline".into())).is_some());
        assert_eq!(retry_hint(&RouteError::Malformed("no features".into())), None);
        assert_eq!(
            retry_hint(&RouteError::Rejected {
                status: 400,
                message: Some("Could not find routable point".into()),
            }),
            None
        );
    }

    #[test]
    fn nothing_to_draw_without_two_samples() {
        assert_eq!(elevation_path(&profile(vec![]), 10.0, 10.0), None);
        assert_eq!(elevation_path(&profile(vec![(0.0, 10.0)]), 10.0, 10.0), None);
        assert_eq!(elevation_path(&profile(vec![(0.0, 10.0), (0.0, 20.0)]), 10.0, 10.0), None);
    }
}
