//! Caller-side instance validation and random instance generation.
//!
//! Engines trust their inputs beyond the checks in their configs; the
//! helpers here are what a front end runs before constructing one.
//! Random graphs and point sets live next to their types
//! ([`Graph::random`](crate::graph::Graph::random),
//! [`random_points`](crate::tsp::random_points)).

use crate::error::InstanceError;
use rand::seq::index;
use rand::Rng;
use std::collections::HashMap;

/// Smallest graph the interactive ACO coloring accepts.
pub const MIN_VISUAL_VERTICES: usize = 50;

/// Smallest graph the backtracking demo accepts.
pub const MIN_BACKTRACK_VERTICES: usize = 3;

/// Smallest city count for a tour.
pub const MIN_CITIES: usize = 3;

/// Fails if `n < min`.
pub fn validate_vertex_count(n: usize, min: usize) -> Result<(), InstanceError> {
    if n < min {
        return Err(InstanceError::TooFewVertices { min, got: n });
    }
    Ok(())
}

/// Fails if `n < min`.
pub fn validate_point_count(n: usize, min: usize) -> Result<(), InstanceError> {
    if n < min {
        return Err(InstanceError::TooFewPoints { min, got: n });
    }
    Ok(())
}

/// Largest item total (and target) a subset-sum instance may have, so
/// every subset sum and signed deviation fits in an `i64`.
pub const MAX_ITEM_TOTAL: u64 = i64::MAX as u64;

/// Item lists must be non-empty with strictly positive values whose total
/// is at most [`MAX_ITEM_TOTAL`].
pub fn validate_items(items: &[u64]) -> Result<(), InstanceError> {
    if items.is_empty() {
        return Err(InstanceError::EmptyItems);
    }
    if let Some(index) = items.iter().position(|&v| v == 0) {
        return Err(InstanceError::NonPositiveItem { index });
    }
    let total = items.iter().try_fold(0u64, |acc, &v| acc.checked_add(v));
    if total.is_none_or(|t| t > MAX_ITEM_TOTAL) {
        return Err(InstanceError::param(
            "items",
            format!("total must not exceed {MAX_ITEM_TOTAL}"),
        ));
    }
    Ok(())
}

/// [`validate_items`] plus pairwise-distinct values.
pub fn validate_unique_items(items: &[u64]) -> Result<(), InstanceError> {
    validate_items(items)?;
    let mut seen: HashMap<u64, usize> = HashMap::with_capacity(items.len());
    for (i, &value) in items.iter().enumerate() {
        if let Some(&first) = seen.get(&value) {
            return Err(InstanceError::DuplicateItem {
                first,
                second: i,
                value,
            });
        }
        seen.insert(value, i);
    }
    Ok(())
}

/// `count` distinct values drawn uniformly from `min..=max`.
pub fn random_items<R: Rng>(
    count: usize,
    min: u64,
    max: u64,
    rng: &mut R,
) -> Result<Vec<u64>, InstanceError> {
    if min == 0 || min > max {
        return Err(InstanceError::param(
            "value range",
            format!("need 0 < min <= max, got {min}..={max}"),
        ));
    }
    let span = max - min + 1;
    if (count as u64) > span {
        return Err(InstanceError::param(
            "count",
            format!("cannot draw {count} distinct values from {min}..={max}"),
        ));
    }

    let mut items = Vec::with_capacity(count);
    let mut used = std::collections::HashSet::with_capacity(count);
    while items.len() < count {
        let value = rng.random_range(min..=max);
        if used.insert(value) {
            items.push(value);
        }
    }
    Ok(items)
}

/// Sum of `floor(len * fraction)` items sampled without replacement, so a
/// zero-deviation subset always exists.
pub fn random_target<R: Rng>(items: &[u64], fraction: f64, rng: &mut R) -> u64 {
    let amount = ((items.len() as f64) * fraction.clamp(0.0, 1.0)).floor() as usize;
    index::sample(rng, items.len(), amount)
        .iter()
        .map(|i| items[i])
        .sum()
}
