//! Points, distances and tours.

use crate::error::InstanceError;
use rand::Rng;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A city in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Precomputed pairwise Euclidean distances, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(points: &[Point]) -> Self {
        let n = points.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance(&points[j]);
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }
        Self { n, values }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// # Panics
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range for {} points", self.n);
        self.values[i * self.n + j]
    }

    /// Closed tour length: consecutive stops plus the edge from the last
    /// stop back to the first.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        match tour.len() {
            0 | 1 => 0.0,
            len => (0..len)
                .map(|k| self.get(tour[k], tour[(k + 1) % len]))
                .sum(),
        }
    }
}

/// Whether `tour` visits every index in `0..n` exactly once.
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

/// Rejects point sets with fewer than `min` points, non-finite
/// coordinates, or two points at the same coordinates.
pub fn validate_points(points: &[Point], min: usize) -> Result<(), InstanceError> {
    crate::instance::validate_point_count(points.len(), min)?;
    for (i, p) in points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(InstanceError::param(
                "points",
                format!("point {i} has non-finite coordinates ({}, {})", p.x, p.y),
            ));
        }
        if let Some(j) = points[..i].iter().position(|q| q == p) {
            return Err(InstanceError::DuplicatePoint { first: j, second: i });
        }
    }
    Ok(())
}

/// `count` distinct integer-coordinate points inside the box
/// `[padding, width - padding] x [padding, height - padding]`.
pub fn random_points<R: Rng>(
    count: usize,
    width: u32,
    height: u32,
    padding: u32,
    rng: &mut R,
) -> Result<Vec<Point>, InstanceError> {
    let doubled = padding.saturating_mul(2);
    if width < doubled || height < doubled {
        return Err(InstanceError::param(
            "padding",
            format!("{padding} leaves no room in a {width}x{height} area"),
        ));
    }
    let (x_max, y_max) = (width - padding, height - padding);
    let capacity = u64::from(x_max - padding + 1) * u64::from(y_max - padding + 1);
    if count as u64 > capacity {
        return Err(InstanceError::param(
            "count",
            format!("cannot place {count} distinct points in {capacity} positions"),
        ));
    }

    let mut used = HashSet::with_capacity(count);
    let mut points = Vec::with_capacity(count);
    while points.len() < count {
        let x = rng.random_range(padding..=x_max);
        let y = rng.random_range(padding..=y_max);
        if used.insert((x, y)) {
            points.push(Point::new(f64::from(x), f64::from(y)));
        }
    }
    Ok(points)
}
