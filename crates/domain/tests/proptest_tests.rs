//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{GeoLocation, VehicleType, haversine_km};
use proptest::prelude::*;

// ============================================================================
// GeoLocation Property Tests
// ============================================================================

mod geo_location_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_location(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let result = GeoLocation::new(lat, lon);
            prop_assert!(result.is_ok());

            let loc = result.unwrap();
            prop_assert!((loc.latitude() - lat).abs() < f64::EPSILON);
            prop_assert!((loc.longitude() - lon).abs() < f64::EPSILON);
        }

        #[test]
        fn invalid_latitude_rejected(
            lat in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ],
            lon in -180.0f64..=180.0f64
        ) {
            let result = GeoLocation::new(lat, lon);
            prop_assert!(result.is_err());
        }

        #[test]
        fn invalid_longitude_rejected(
            lat in -90.0f64..=90.0f64,
            lon in prop_oneof![
                (-1000.0f64..-180.1f64),
                (180.1f64..1000.0f64)
            ]
        ) {
            let result = GeoLocation::new(lat, lon);
            prop_assert!(result.is_err());
        }

        #[test]
        fn distance_to_self_is_zero(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let loc = GeoLocation::new_unchecked(lat, lon);
            prop_assert!(haversine_km(&loc, &loc).abs() < 1e-9);
        }

        #[test]
        fn distance_is_symmetric(
            lat1 in -80.0f64..=80.0f64,
            lon1 in -80.0f64..=80.0f64,
            lat2 in -80.0f64..=80.0f64,
            lon2 in -80.0f64..=80.0f64
        ) {
            let a = GeoLocation::new_unchecked(lat1, lon1);
            let b = GeoLocation::new_unchecked(lat2, lon2);
            prop_assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-6);
        }

        #[test]
        fn distance_obeys_triangle_inequality(
            lat1 in -80.0f64..=80.0f64,
            lon1 in -80.0f64..=80.0f64,
            lat2 in -80.0f64..=80.0f64,
            lon2 in -80.0f64..=80.0f64,
            lat3 in -80.0f64..=80.0f64,
            lon3 in -80.0f64..=80.0f64
        ) {
            let a = GeoLocation::new_unchecked(lat1, lon1);
            let b = GeoLocation::new_unchecked(lat2, lon2);
            let c = GeoLocation::new_unchecked(lat3, lon3);
            let direct = a.distance_km(&c);
            let via = a.distance_km(&b) + b.distance_km(&c);
            prop_assert!(direct >= 0.0);
            prop_assert!(direct <= via + 1e-6);
        }
    }
}

// ============================================================================
// VehicleType Property Tests
// ============================================================================

mod vehicle_type_tests {
    use super::*;

    proptest! {
        #[test]
        fn unknown_names_rejected(name in "[a-z]{1,12}") {
            prop_assume!(name != "bus" && name != "vessel" && name != "ferry");
            prop_assert!(VehicleType::from_config(&name).is_none());
        }
    }

    #[test]
    fn path_segment_round_trips_through_from_config() {
        for vehicle_type in [VehicleType::Bus, VehicleType::Vessel] {
            assert_eq!(
                VehicleType::from_config(vehicle_type.path_segment()),
                Some(vehicle_type)
            );
        }
    }
}
