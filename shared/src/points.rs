use serde::{Deserialize, Serialize};

use crate::Point;

/// Which point the next map click sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointSettingMode {
    #[default]
    None,
    SettingStart,
    SettingEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointRole {
    Start,
    End,
}

/// Start/end selection plus the click-interpretation mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointStore {
    start: Option<Point>,
    end: Option<Point>,
    mode: PointSettingMode,
}

impl PointStore {
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn mode(&self) -> PointSettingMode {
        self.mode
    }

    /// Opening the planning panel starts by asking for the start point.
    pub fn open(&mut self) {
        if self.mode == PointSettingMode::None {
            self.mode = PointSettingMode::SettingStart;
        }
    }

    pub fn set_mode(&mut self, mode: PointSettingMode) {
        self.mode = mode;
    }

    /// Interpret a map click. Returns the role that was set, or `None` when
    /// no point is being picked.
    pub fn handle_click(&mut self, point: Point) -> Option<PointRole> {
        match self.mode {
            PointSettingMode::None => None,
            PointSettingMode::SettingStart => {
                self.start = Some(point);
                self.mode = PointSettingMode::SettingEnd;
                Some(PointRole::Start)
            }
            PointSettingMode::SettingEnd => {
                self.end = Some(point);
                self.mode = PointSettingMode::None;
                Some(PointRole::End)
            }
        }
    }

    /// Forget both points and go back to picking the start.
    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.mode = PointSettingMode::SettingStart;
    }

    pub fn endpoints(&self) -> Option<(Point, Point)> {
        Some((self.start?, self.end?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_walk_through_start_then_end() {
        let a = Point::new(9.0, 45.0);
        let b = Point::new(9.1, 45.1);
        let mut store = PointStore::default();
        store.set_mode(PointSettingMode::SettingStart);

        assert_eq!(store.handle_click(a), Some(PointRole::Start));
        assert_eq!(store.start(), Some(a));
        assert_eq!(store.mode(), PointSettingMode::SettingEnd);

        assert_eq!(store.handle_click(b), Some(PointRole::End));
        assert_eq!(store.end(), Some(b));
        assert_eq!(store.mode(), PointSettingMode::None);
        assert_eq!(store.endpoints(), Some((a, b)));
    }

    #[test]
    fn clicks_are_ignored_when_not_picking() {
        let mut store = PointStore::default();
        assert_eq!(store.handle_click(Point::new(1.0, 1.0)), None);
        assert_eq!(store.start(), None);
    }

    #[test]
    fn reclick_replaces_point_of_same_role() {
        let mut store = PointStore::default();
        store.set_mode(PointSettingMode::SettingEnd);
        store.handle_click(Point::new(1.0, 1.0));
        store.set_mode(PointSettingMode::SettingEnd);
        store.handle_click(Point::new(2.0, 2.0));
        assert_eq!(store.end(), Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn open_only_moves_out_of_idle() {
        let mut store = PointStore::default();
        store.open();
        assert_eq!(store.mode(), PointSettingMode::SettingStart);
        store.set_mode(PointSettingMode::SettingEnd);
        store.open();
        assert_eq!(store.mode(), PointSettingMode::SettingEnd);
    }

    #[test]
    fn clear_forgets_points() {
        let mut store = PointStore::default();
        store.set_mode(PointSettingMode::SettingStart);
        store.handle_click(Point::new(1.0, 1.0));
        store.set_mode(PointSettingMode::SettingEnd);
        store.handle_click(Point::new(2.0, 2.0));
        assert!(store.endpoints().is_some());
        store.clear();
        assert_eq!(store.endpoints(), None);
        assert_eq!(store.mode(), PointSettingMode::SettingStart);
    }
}
