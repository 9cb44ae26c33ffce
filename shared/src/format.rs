/// Human-readable distance: metres below one kilometre, one decimal above.
pub fn format_distance(meters: f64) -> String {
    let rounded = meters.round();
    if rounded < 1000.0 {
        format!("{rounded:.0} m")
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds.max(0.0) / 60.0).round() as u64;
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else {
        format!("{minutes}min")
    }
}

pub fn format_elevation(meters: f64) -> String {
    format!("{meters:.0} m")
}
