//! Tests for the zone admission rule and farm capacity summary

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    evaluate_admission, farm_capacity, fits_within, used_area, Farm, GridError, IrrigationMode,
    Zone,
};
use uuid::Uuid;

fn farm(length: i64, width: i64) -> Farm {
    Farm {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        name: "Ferme".to_string(),
        location: None,
        length: Decimal::from(length),
        width: Decimal::from(width),
        created_at: Utc::now(),
    }
}

fn zone(farm_id: Uuid, width: i64, length: i64) -> Zone {
    Zone {
        id: Uuid::new_v4(),
        farm_id,
        name: "Zone".to_string(),
        crop_type: None,
        width: Decimal::from(width),
        length: Decimal::from(length),
        x: Decimal::ZERO,
        y: Decimal::ZERO,
        mode: IrrigationMode::Auto,
        moisture_threshold: None,
        created_at: Utc::now(),
    }
}

/// Area in hundredths of a square meter, as the store keeps two decimals
fn area_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=50_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn hundred_by_sixty_farm() {
        let f = farm(100, 60);
        let zones = vec![zone(f.id, 50, 40)];

        let rejected = evaluate_admission(&f, &zones, Decimal::from(60 * 70)).unwrap();
        assert!(!rejected.admitted);
        assert_eq!(rejected.used_area, Decimal::from(2000));

        let admitted = evaluate_admission(&f, &zones, Decimal::from(40 * 100)).unwrap();
        assert!(admitted.admitted);
        assert_eq!(admitted.farm_area, Decimal::from(6000));
    }

    #[test]
    fn empty_farm_admits_up_to_its_area() {
        let f = farm(20, 10);
        assert!(evaluate_admission(&f, &[], Decimal::from(200)).unwrap().admitted);
        assert!(!evaluate_admission(&f, &[], Decimal::new(20001, 2)).unwrap().admitted);
    }

    #[test]
    fn negative_candidate_is_an_error() {
        let f = farm(20, 10);
        assert!(matches!(
            evaluate_admission(&f, &[], Decimal::from(-1)),
            Err(GridError::NegativeArea { .. })
        ));
    }

    #[test]
    fn capacity_after_filling_the_farm() {
        let f = farm(100, 60);
        let zones = vec![zone(f.id, 50, 40), zone(f.id, 10, 100)];

        let capacity = farm_capacity(&f, &zones).unwrap();
        assert_eq!(capacity.zone_count, 2);
        assert_eq!(capacity.used_area, Decimal::from(3000));
        assert_eq!(capacity.remaining_area, Decimal::from(3000));
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A candidate is admitted exactly when used + candidate stays within the farm
    #[test]
    fn admission_matches_area_budget(
        farm_area in area_strategy(),
        used in area_strategy(),
        candidate in area_strategy(),
    ) {
        prop_assert_eq!(
            fits_within(farm_area, used, candidate),
            used + candidate <= farm_area
        );
    }

    /// Shrinking a candidate never turns an admission into a rejection
    #[test]
    fn admission_is_monotonic(
        farm_area in area_strategy(),
        used in area_strategy(),
        candidate in area_strategy(),
        shrink in area_strategy(),
    ) {
        let smaller = (candidate - shrink).max(Decimal::ZERO);
        if fits_within(farm_area, used, candidate) {
            prop_assert!(fits_within(farm_area, used, smaller));
        }
    }

    /// Used area is the plain sum of zone areas, whatever their placement
    #[test]
    fn used_area_sums_zone_areas(dims in prop::collection::vec((1i64..200, 1i64..200), 0..12)) {
        let farm_id = Uuid::new_v4();
        let zones: Vec<Zone> = dims.iter().map(|&(w, l)| zone(farm_id, w, l)).collect();
        let expected: i64 = dims.iter().map(|&(w, l)| w * l).sum();
        prop_assert_eq!(used_area(&zones), Ok(Decimal::from(expected)));
    }

    /// Zones admitted one by one never exceed the farm surface
    #[test]
    fn sequential_admissions_respect_farm_area(
        length in 1i64..300,
        width in 1i64..300,
        dims in prop::collection::vec((1i64..100, 1i64..100), 1..20),
    ) {
        let f = farm(length, width);
        let mut zones = Vec::new();
        for (w, l) in dims {
            let candidate = zone(f.id, w, l);
            if evaluate_admission(&f, &zones, candidate.area().unwrap()).unwrap().admitted {
                zones.push(candidate);
            }
        }
        prop_assert!(used_area(&zones).unwrap() <= f.area().unwrap());
        prop_assert!(farm_capacity(&f, &zones).unwrap().remaining_area >= Decimal::ZERO);
    }
}
