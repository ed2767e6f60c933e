//! Zone admission rule
//!
//! A farm admits a new zone when the summed area of its zones, candidate
//! included, stays within the farm's surface. Only areas are compared:
//! zone rectangles are not tested for geometric overlap here.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::GridError;
use crate::models::{Farm, Zone};

/// Surface of a `width` × `length` rectangle, in m²
pub fn surface(width: Decimal, length: Decimal) -> Result<Decimal, GridError> {
    width.checked_mul(length).ok_or(GridError::AreaOverflow)
}

/// Summed surface of `zones`, in m²
pub fn used_area<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> Result<Decimal, GridError> {
    zones.into_iter().try_fold(Decimal::ZERO, |total, zone| {
        total
            .checked_add(zone.area()?)
            .ok_or(GridError::AreaOverflow)
    })
}

/// Boundary-inclusive capacity test. A sum too large to represent never fits.
pub fn fits_within(farm_area: Decimal, used_area: Decimal, candidate_area: Decimal) -> bool {
    used_area
        .checked_add(candidate_area)
        .map_or(false, |total| total <= farm_area)
}

/// Outcome of an admission check, with the figures that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionDecision {
    pub admitted: bool,
    pub farm_area: Decimal,
    pub used_area: Decimal,
    pub candidate_area: Decimal,
}

/// Decide whether `candidate_area` can be added to `farm` given its current `zones`.
pub fn evaluate_admission(
    farm: &Farm,
    zones: &[Zone],
    candidate_area: Decimal,
) -> Result<AdmissionDecision, GridError> {
    if candidate_area < Decimal::ZERO {
        return Err(GridError::NegativeArea {
            area: candidate_area,
        });
    }

    let farm_area = farm.area()?;
    let used_area = used_area(zones)?;

    Ok(AdmissionDecision {
        admitted: fits_within(farm_area, used_area, candidate_area),
        farm_area,
        used_area,
        candidate_area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IrrigationMode;
    use chrono::Utc;
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

    fn zone(farm: &Farm, width: i64, length: i64) -> Zone {
        Zone {
            id: Uuid::new_v4(),
            farm_id: farm.id,
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

    #[test]
    fn test_rejects_candidate_over_budget() {
        let f = farm(100, 60);
        let zones = vec![zone(&f, 50, 40)];

        let decision = evaluate_admission(&f, &zones, Decimal::from(60 * 70)).unwrap();
        assert!(!decision.admitted);
        assert_eq!(decision.used_area, Decimal::from(2000));
        assert_eq!(decision.farm_area, Decimal::from(6000));
    }

    #[test]
    fn test_admits_candidate_at_exact_boundary() {
        let f = farm(100, 60);
        let zones = vec![zone(&f, 50, 40)];

        let decision = evaluate_admission(&f, &zones, Decimal::from(40 * 100)).unwrap();
        assert!(decision.admitted);
    }

    #[test]
    fn test_zero_candidate_always_admitted() {
        let f = farm(10, 10);
        let zones = vec![zone(&f, 10, 10)];
        assert!(evaluate_admission(&f, &zones, Decimal::ZERO).unwrap().admitted);
    }

    #[test]
    fn test_negative_candidate_rejected() {
        let f = farm(10, 10);
        let err = evaluate_admission(&f, &[], Decimal::from(-1)).unwrap_err();
        assert_eq!(err, GridError::NegativeArea { area: Decimal::from(-1) });
    }

    #[test]
    fn test_used_area_sums_all_zones() {
        let f = farm(100, 100);
        let zones = vec![zone(&f, 10, 10), zone(&f, 5, 4), zone(&f, 3, 3)];
        assert_eq!(used_area(&zones).unwrap(), Decimal::from(129));
    }

    #[test]
    fn test_oversized_areas_are_errors_not_panics() {
        let huge = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let mut f = farm(10, 10);
        f.length = huge;
        f.width = huge;
        assert_eq!(f.area(), Err(GridError::AreaOverflow));
        assert_eq!(
            evaluate_admission(&f, &[], Decimal::ONE),
            Err(GridError::AreaOverflow)
        );

        let mut wide = zone(&farm(10, 10), 1, 1);
        wide.width = huge;
        wide.length = huge;
        assert_eq!(used_area(&[wide]), Err(GridError::AreaOverflow));

        assert!(!fits_within(Decimal::MAX, Decimal::MAX, Decimal::ONE));
    }
}
