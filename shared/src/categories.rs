//! Label and colour tables for the categorical "extras" of a route.
//!
//! Ids come straight from the directions API. Every lookup has an explicit
//! fallback so an id the tables do not know renders as "Unknown".

use serde::{Deserialize, Serialize};

use crate::Profile;

pub const UNKNOWN: CategoryInfo = CategoryInfo {
    label: "Unknown",
    color: "#9e9e9e",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub label: &'static str,
    pub color: &'static str,
}

const fn info(label: &'static str, color: &'static str) -> CategoryInfo {
    CategoryInfo { label, color }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    Surface,
    WayType,
    Steepness,
    /// Hiking difficulty (SAC scale).
    SacScale,
    /// Mountain-bike difficulty (MTB scale).
    MtbScale,
}

impl BreakdownKind {
    /// The trail difficulty scale the directions API reports for a profile.
    pub fn trail_difficulty_for(profile: Profile) -> Self {
        if profile.is_cycling() {
            BreakdownKind::MtbScale
        } else {
            BreakdownKind::SacScale
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BreakdownKind::Surface => "Surface",
            BreakdownKind::WayType => "Way type",
            BreakdownKind::Steepness => "Steepness",
            BreakdownKind::SacScale | BreakdownKind::MtbScale => "Trail difficulty",
        }
    }

    pub fn lookup(self, id: i32) -> CategoryInfo {
        match self {
            BreakdownKind::Surface => surface(id),
            BreakdownKind::WayType => waytype(id),
            BreakdownKind::Steepness => steepness(id),
            BreakdownKind::SacScale => sac_scale(id),
            BreakdownKind::MtbScale => mtb_scale(id),
        }
    }
}

/// One slice of a route's distance sharing a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub kind: BreakdownKind,
    pub category_id: i32,
    pub distance_m: f64,
    pub percentage: f64,
}

impl BreakdownEntry {
    pub fn info(&self) -> CategoryInfo {
        self.kind.lookup(self.category_id)
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn color(&self) -> &'static str {
        self.info().color
    }
}

fn surface(id: i32) -> CategoryInfo {
    match id {
        1 => info("Paved", "#424242"),
        2 => info("Unpaved", "#a1887f"),
        3 => info("Asphalt", "#212121"),
        4 => info("Concrete", "#757575"),
        5 => info("Cobblestone", "#8d6e63"),
        6 => info("Metal", "#607d8b"),
        7 => info("Wood", "#795548"),
        8 => info("Compacted gravel", "#bcaaa4"),
        9 => info("Fine gravel", "#d7ccc8"),
        10 => info("Gravel", "#c5b358"),
        11 => info("Dirt", "#6d4c41"),
        12 => info("Ground", "#8b5a2b"),
        13 => info("Ice", "#b3e5fc"),
        14 => info("Paving stones", "#90a4ae"),
        15 => info("Sand", "#f4d03f"),
        16 => info("Woodchips", "#a0522d"),
        17 => info("Grass", "#66bb6a"),
        18 => info("Grass paver", "#81c784"),
        _ => UNKNOWN,
    }
}

fn waytype(id: i32) -> CategoryInfo {
    match id {
        1 => info("State road", "#d32f2f"),
        2 => info("Road", "#f57c00"),
        3 => info("Street", "#fbc02d"),
        4 => info("Path", "#388e3c"),
        5 => info("Track", "#8d6e63"),
        6 => info("Cycleway", "#1976d2"),
        7 => info("Footway", "#7b1fa2"),
        8 => info("Steps", "#5d4037"),
        9 => info("Ferry", "#0097a7"),
        10 => info("Construction", "#ffa000"),
        _ => UNKNOWN,
    }
}

fn steepness(id: i32) -> CategoryInfo {
    match id {
        -5 => info("Descent > 16%", "#0d47a1"),
        -4 => info("Descent 12-15%", "#1565c0"),
        -3 => info("Descent 7-11%", "#1e88e5"),
        -2 => info("Descent 4-6%", "#64b5f6"),
        -1 => info("Descent 1-3%", "#bbdefb"),
        0 => info("Flat", "#e0e0e0"),
        1 => info("Climb 1-3%", "#ffcdd2"),
        2 => info("Climb 4-6%", "#ef9a9a"),
        3 => info("Climb 7-11%", "#e57373"),
        4 => info("Climb 12-15%", "#e53935"),
        5 => info("Climb > 16%", "#b71c1c"),
        _ => UNKNOWN,
    }
}

fn sac_scale(id: i32) -> CategoryInfo {
    match id {
        0 => info("No path", "#e0e0e0"),
        1 => info("Hiking", "#fdd835"),
        2 => info("Mountain hiking", "#fb8c00"),
        3 => info("Demanding mountain hiking", "#e53935"),
        4 => info("Alpine hiking", "#1e88e5"),
        5 => info("Demanding alpine hiking", "#3949ab"),
        6 => info("Difficult alpine hiking", "#212121"),
        _ => UNKNOWN,
    }
}

fn mtb_scale(id: i32) -> CategoryInfo {
    match id {
        0 => info("S0 easy", "#43a047"),
        1 => info("S1", "#7cb342"),
        2 => info("S2", "#fdd835"),
        3 => info("S3", "#fb8c00"),
        4 => info("S4", "#e53935"),
        5 => info("S5", "#8e24aa"),
        6 => info("S6 expert", "#212121"),
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_have_labels() {
        assert_eq!(BreakdownKind::Surface.lookup(3).label, "Asphalt");
        assert_eq!(BreakdownKind::WayType.lookup(4).label, "Path");
        assert_eq!(BreakdownKind::Steepness.lookup(-5).label, "Descent > 16%");
        assert_eq!(BreakdownKind::SacScale.lookup(2).label, "Mountain hiking");
    }

    #[test]
    fn unknown_ids_fall_back_to_gray() {
        assert_eq!(BreakdownKind::Surface.lookup(0), UNKNOWN);
        assert_eq!(BreakdownKind::WayType.lookup(99), UNKNOWN);
        assert_eq!(BreakdownKind::MtbScale.lookup(-1), UNKNOWN);
    }

    #[test]
    fn trail_difficulty_scale_follows_profile() {
        assert_eq!(
            BreakdownKind::trail_difficulty_for(Profile::Hiking),
            BreakdownKind::SacScale
        );
        assert_eq!(
            BreakdownKind::trail_difficulty_for(Profile::MountainCycling),
            BreakdownKind::MtbScale
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn kind() -> impl Strategy<Value = BreakdownKind> {
            prop_oneof![
                Just(BreakdownKind::Surface),
                Just(BreakdownKind::WayType),
                Just(BreakdownKind::Steepness),
                Just(BreakdownKind::SacScale),
                Just(BreakdownKind::MtbScale),
            ]
        }

        proptest! {
            #[test]
            fn prop_lookup_always_yields_a_colour(kind in kind(), id in any::<i32>()) {
                let info = kind.lookup(id);
                prop_assert!(info.color.starts_with('#'));
                prop_assert!(!info.label.is_empty());
            }
        }
    }
}
