const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres between two `(lng, lat)` pairs.
pub fn haversine_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lng1, lat1) = a;
    let (lng2, lat2) = b;
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat
        + lat1.to_radians().cos() * lat2.to_radians().cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        assert_eq!(haversine_m((9.0, 45.0), (9.0, 45.0)), 0.0);
    }

    #[test]
    fn test_haversine_1km_north() {
        // 1 km north is roughly 0.009 degrees of latitude
        let dist = haversine_m((5.0, 45.0), (5.0, 45.009));
        assert!((dist - 1000.0).abs() < 10.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Paris to London, about 343 km
        let dist = haversine_m((2.3522, 48.8566), (-0.1278, 51.5074));
        assert!((dist - 343_000.0).abs() < 5_000.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = (f64, f64)> {
            (-180.0..=180.0, -90.0..=90.0)
        }

        proptest! {
            #[test]
            fn prop_haversine_non_negative(a in valid_coord(), b in valid_coord()) {
                prop_assert!(haversine_m(a, b) >= 0.0);
            }

            #[test]
            fn prop_haversine_symmetric(a in valid_coord(), b in valid_coord()) {
                prop_assert!((haversine_m(a, b) - haversine_m(b, a)).abs() < 1e-6);
            }

            #[test]
            fn prop_haversine_bounded_by_half_circumference(a in valid_coord(), b in valid_coord()) {
                let max_distance = std::f64::consts::PI * EARTH_RADIUS_M;
                prop_assert!(haversine_m(a, b) <= max_distance + 1.0);
            }
        }
    }
}
