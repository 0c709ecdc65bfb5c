//! Great-circle distance helpers for the nearest-salesperson lookup.
//!
//! Deliberately a full scan and in-process sort: the salesperson table is
//! small and no spatial index is warranted at this scale.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn valid_coordinates(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Pair each item with its distance from the reference point and sort
/// nearest-first. Ties keep their input order.
pub fn sort_by_distance<T>(
    items: Vec<T>,
    lat: f64,
    lng: f64,
    coords: impl Fn(&T) -> (f64, f64),
) -> Vec<(T, f64)> {
    let mut with_distance: Vec<(T, f64)> = items
        .into_iter()
        .map(|item| {
            let (item_lat, item_lng) = coords(&item);
            let distance = haversine_km(lat, lng, item_lat, item_lng);
            (item, distance)
        })
        .collect();

    with_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
    with_distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        assert!(haversine_km(40.0, -73.0, 40.0, -73.0).abs() < 1e-9);
    }

    #[test]
    fn delhi_to_mumbai_is_about_1150_km() {
        let d = haversine_km(28.6139, 77.2090, 19.0760, 72.8777);
        assert!((1100.0..1220.0).contains(&d), "got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = haversine_km(28.6139, 77.2090, 12.9716, 77.5946);
        let b = haversine_km(12.9716, 77.5946, 28.6139, 77.2090);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn coordinate_bounds() {
        assert!(valid_coordinates(90.0, 180.0));
        assert!(valid_coordinates(-90.0, -180.0));
        assert!(!valid_coordinates(90.1, 0.0));
        assert!(!valid_coordinates(0.0, -180.5));
    }

    #[test]
    fn sorts_nearest_first() {
        // Reference point near Delhi; Mumbai, Bangalore, Kolkata stored
        let points = vec![
            ("bangalore", 12.9716, 77.5946),
            ("mumbai", 19.0760, 72.8777),
            ("kolkata", 22.5726, 88.3639),
        ];

        let sorted = sort_by_distance(points, 28.6139, 77.2090, |p| (p.1, p.2));
        let order: Vec<&str> = sorted.iter().map(|(p, _)| p.0).collect();
        assert_eq!(order, vec!["mumbai", "kolkata", "bangalore"]);

        // Distances must be non-decreasing
        for pair in sorted.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }
}
