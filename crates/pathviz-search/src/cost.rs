//! Movement costs and distance estimators.
//!
//! The estimators reproduce the exact algebra of the heuristics the
//! visualizer has always offered. Two of them do not match their textbook
//! names: [`Heuristic::Chebyshev`] is `S·(dx+dy) − S·min(dx,dy)` and
//! [`Heuristic::Euclidean`] is `S·(dx + dx·dy²)`, which overestimates and is
//! therefore not admissible. Only [`Heuristic::Manhattan`] (4-way) and
//! [`Heuristic::Octile`] (8-way) keep A* and IDA* optimal.

use std::fmt;
use std::str::FromStr;

use pathviz_core::Point;

/// Cost of a horizontal or vertical step.
pub const STRAIGHT_COST: f64 = 1.0;

/// Cost of a diagonal step (√2).
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Cost of moving between two adjacent cells.
#[inline]
pub fn movement_cost(from: Point, to: Point) -> f64 {
    if from.is_diagonal_to(to) {
        DIAGONAL_COST
    } else {
        STRAIGHT_COST
    }
}

/// Total movement cost along consecutive points.
pub fn path_cost(points: &[Point]) -> f64 {
    points.windows(2).map(|w| movement_cost(w[0], w[1])).sum()
}

#[inline]
fn deltas(a: Point, b: Point) -> (f64, f64) {
    (f64::from((a.x - b.x).abs()), f64::from((a.y - b.y).abs()))
}

/// A remaining-distance estimator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    Octile,
    Chebyshev,
}

impl Heuristic {
    /// Every estimator, in menu order.
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Octile,
        Heuristic::Chebyshev,
    ];

    /// Estimate the cost of reaching `to` from `from`.
    pub fn estimate(self, from: Point, to: Point) -> f64 {
        let (dx, dy) = deltas(from, to);
        match self {
            Self::Manhattan => STRAIGHT_COST * (dx + dy),
            Self::Octile => {
                STRAIGHT_COST * (dx + dy) + (DIAGONAL_COST - 2.0 * STRAIGHT_COST) * dx.min(dy)
            }
            Self::Chebyshev => {
                STRAIGHT_COST * (dx + dy) + (STRAIGHT_COST - 2.0 * STRAIGHT_COST) * dx.min(dy)
            }
            Self::Euclidean => STRAIGHT_COST * (dx + dx * dy * dy),
        }
    }

    /// Lower-case identifier accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
            Self::Octile => "octile",
            Self::Chebyshev => "chebyshev",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown heuristic name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown heuristic {0:?}")]
pub struct UnknownHeuristic(pub String);

impl FromStr for Heuristic {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownHeuristic(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn step_costs() {
        let o = Point::new(3, 3);
        assert_eq!(movement_cost(o, Point::new(4, 3)), STRAIGHT_COST);
        assert_eq!(movement_cost(o, Point::new(3, 2)), STRAIGHT_COST);
        assert_eq!(movement_cost(o, Point::new(2, 4)), DIAGONAL_COST);
        let path = [Point::new(0, 0), Point::new(1, 1), Point::new(2, 1)];
        assert!((path_cost(&path) - (1.0 + DIAGONAL_COST)).abs() < EPS);
        assert_eq!(path_cost(&path[..1]), 0.0);
    }

    #[test]
    fn estimator_formulas() {
        let a = Point::new(0, 0);
        let b = Point::new(4, 2);
        assert!((Heuristic::Manhattan.estimate(a, b) - 6.0).abs() < EPS);
        assert!((Heuristic::Octile.estimate(a, b) - (2.0 + 2.0 * DIAGONAL_COST)).abs() < EPS);
        assert!((Heuristic::Chebyshev.estimate(a, b) - 4.0).abs() < EPS);
        // dx + dx·dy² = 4 + 4·4
        assert!((Heuristic::Euclidean.estimate(a, b) - 20.0).abs() < EPS);
        // Symmetric in the argument order.
        for h in Heuristic::ALL {
            assert!((h.estimate(a, b) - h.estimate(b, a)).abs() < EPS);
            assert_eq!(h.estimate(b, b), 0.0);
        }
    }

    #[test]
    fn octile_is_exact_on_open_ground() {
        // On an obstacle-free 8-way grid octile distance is the true cost.
        let a = Point::new(1, 1);
        let b = Point::new(6, 3);
        let straight = 3.0;
        let diagonal = 2.0;
        let truth = straight * STRAIGHT_COST + diagonal * DIAGONAL_COST;
        assert!((Heuristic::Octile.estimate(a, b) - truth).abs() < EPS);
    }

    #[test]
    fn names_round_trip() {
        for h in Heuristic::ALL {
            assert_eq!(h.to_string().parse::<Heuristic>(), Ok(h));
        }
        assert_eq!(" Octile ".parse::<Heuristic>(), Ok(Heuristic::Octile));
        assert_eq!(
            "taxicab".parse::<Heuristic>(),
            Err(UnknownHeuristic("taxicab".into()))
        );
    }
}
