//! Geometry types shared across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in a farm frame, in meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Decimal,
    pub y: Decimal,
    pub width: Decimal,
    pub length: Decimal,
}

impl Rect {
    pub fn new(x: Decimal, y: Decimal, width: Decimal, length: Decimal) -> Self {
        Self {
            x,
            y,
            width,
            length,
        }
    }

    pub fn right(&self) -> Decimal {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> Decimal {
        self.y.saturating_add(self.length)
    }

    /// Area shared with `other`; rectangles that only touch share nothing
    pub fn intersection_area(&self, other: &Rect) -> Decimal {
        let overlap_x = self.right().min(other.right()).saturating_sub(self.x.max(other.x));
        let overlap_y = self.bottom().min(other.bottom()).saturating_sub(self.y.max(other.y));
        if overlap_x <= Decimal::ZERO || overlap_y <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        overlap_x.saturating_mul(overlap_y)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection_area(other) > Decimal::ZERO
    }
}

/// Physical position of a grid slot, measured from the zone's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u64,
    pub y: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i64, y: i64, w: i64, l: i64) -> Rect {
        Rect::new(x.into(), y.into(), w.into(), l.into())
    }

    #[test]
    fn test_intersection_area() {
        let a = rect(0, 0, 10, 10);
        let b = rect(5, 5, 10, 10);
        assert_eq!(a.intersection_area(&b), Decimal::from(25));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = rect(0, 0, 10, 10);
        let b = rect(10, 0, 10, 10);
        assert_eq!(a.intersection_area(&b), Decimal::ZERO);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_disjoint_rects() {
        assert!(!rect(0, 0, 5, 5).overlaps(&rect(20, 20, 5, 5)));
    }
}
