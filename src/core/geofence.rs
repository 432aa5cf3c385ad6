use crate::model::geofence::{GeoPoint, Geofence, GeofenceKind, GeofenceVerdict};

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceEvaluation {
    pub verdict: GeofenceVerdict,
    /// Which zone validated the point. Office wins over remote when both
    /// contain it.
    pub matched_kind: Option<GeofenceKind>,
    /// Distance to every candidate zone center, for audit logging.
    pub distances_m: Vec<(GeofenceKind, f64)>,
}

impl GeofenceEvaluation {
    fn unknown() -> Self {
        Self {
            verdict: GeofenceVerdict::Unknown,
            matched_kind: None,
            distances_m: Vec::new(),
        }
    }
}

/// Decides containment of `point` against a set of circular zones.
///
/// A missing point yields `Unknown`, not `Outside`: the caller must be able
/// to tell "we don't know where the employee was" apart from "the employee
/// was elsewhere". Pure, no I/O.
pub fn evaluate(point: Option<&GeoPoint>, zones: &[Geofence]) -> GeofenceEvaluation {
    let point = match point {
        Some(p) => p,
        None => return GeofenceEvaluation::unknown(),
    };

    if zones.is_empty() {
        return GeofenceEvaluation::unknown();
    }

    let mut distances_m = Vec::with_capacity(zones.len());
    let mut matched_kind: Option<GeofenceKind> = None;

    for zone in zones {
        let distance = haversine_meters(
            point.latitude,
            point.longitude,
            zone.center_lat,
            zone.center_lng,
        );
        distances_m.push((zone.kind, distance));

        if distance <= zone.radius_meters {
            matched_kind = match (matched_kind, zone.kind) {
                // office takes precedence as the canonical workplace
                (Some(GeofenceKind::Office), _) => Some(GeofenceKind::Office),
                (_, GeofenceKind::Office) => Some(GeofenceKind::Office),
                (None, kind) => Some(kind),
                (existing, _) => existing,
            };
        }
    }

    let verdict = if matched_kind.is_some() {
        GeofenceVerdict::Inside
    } else {
        GeofenceVerdict::Outside
    };

    GeofenceEvaluation {
        verdict,
        matched_kind,
        distances_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DHAKA: (f64, f64) = (23.8103, 90.4125);

    fn office(radius_meters: f64) -> Geofence {
        Geofence {
            kind: GeofenceKind::Office,
            center_lat: DHAKA.0,
            center_lng: DHAKA.1,
            radius_meters,
        }
    }

    fn remote(radius_meters: f64) -> Geofence {
        Geofence {
            kind: GeofenceKind::Remote,
            center_lat: DHAKA.0,
            center_lng: DHAKA.1,
            radius_meters,
        }
    }

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert_eq!(haversine_meters(DHAKA.0, DHAKA.1, DHAKA.0, DHAKA.1), 0.0);
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Dhaka to Chattogram is roughly 215 km as the crow flies.
        let d = haversine_meters(23.8103, 90.4125, 22.3569, 91.7832);
        assert!((200_000.0..230_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn point_inside_radius_matches() {
        // ~110 m north of center
        let eval = evaluate(Some(&point(23.8113, 90.4125)), &[office(200.0)]);
        assert_eq!(eval.verdict, GeofenceVerdict::Inside);
        assert_eq!(eval.matched_kind, Some(GeofenceKind::Office));
    }

    #[test]
    fn point_outside_every_zone_is_outside() {
        let eval = evaluate(Some(&point(23.9000, 90.4125)), &[office(200.0), remote(50.0)]);
        assert_eq!(eval.verdict, GeofenceVerdict::Outside);
        assert_eq!(eval.matched_kind, None);
        assert_eq!(eval.distances_m.len(), 2);
    }

    #[test]
    fn point_exactly_on_the_radius_is_inside() {
        // containment is inclusive: distance == radius still matches
        let p = point(23.8120, 90.4125);
        let exact = haversine_meters(p.latitude, p.longitude, DHAKA.0, DHAKA.1);

        let eval = evaluate(Some(&p), &[office(exact)]);
        assert_eq!(eval.verdict, GeofenceVerdict::Inside);

        // any shrink of the radius puts the same point outside
        let eval = evaluate(Some(&p), &[office(exact - 0.001)]);
        assert_eq!(eval.verdict, GeofenceVerdict::Outside);
    }

    #[test]
    fn office_takes_precedence_over_remote() {
        let p = point(DHAKA.0, DHAKA.1);

        let eval = evaluate(Some(&p), &[remote(500.0), office(500.0)]);
        assert_eq!(eval.matched_kind, Some(GeofenceKind::Office));

        // order of zones must not matter
        let eval = evaluate(Some(&p), &[office(500.0), remote(500.0)]);
        assert_eq!(eval.matched_kind, Some(GeofenceKind::Office));
    }

    #[test]
    fn remote_matches_when_office_misses() {
        let eval = evaluate(
            Some(&point(DHAKA.0, DHAKA.1)),
            &[
                Geofence {
                    kind: GeofenceKind::Office,
                    center_lat: 40.0,
                    center_lng: -74.0,
                    radius_meters: 100.0,
                },
                remote(500.0),
            ],
        );
        assert_eq!(eval.verdict, GeofenceVerdict::Inside);
        assert_eq!(eval.matched_kind, Some(GeofenceKind::Remote));
    }

    #[test]
    fn missing_location_is_unknown_not_outside() {
        let eval = evaluate(None, &[office(200.0)]);
        assert_eq!(eval.verdict, GeofenceVerdict::Unknown);
        assert_eq!(eval.matched_kind, None);
        assert!(eval.distances_m.is_empty());
    }

    #[test]
    fn no_configured_zones_is_unknown() {
        let eval = evaluate(Some(&point(DHAKA.0, DHAKA.1)), &[]);
        assert_eq!(eval.verdict, GeofenceVerdict::Unknown);
    }
}
