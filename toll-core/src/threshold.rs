//! Proximity filters relative to a reference location's mean distance.
//!
//! Two flavors are provided:
//!
//! - [`find_ids_within_ten_percentage_threshold`] / [`find_within_threshold`]:
//!   the compatible filter. It only ever returns rows whose `id_start` is the
//!   reference itself, keeping those whose distance lies in the band.
//! - [`find_ids_with_average_within_threshold`]: compares every location's
//!   own average outgoing distance against the reference band and returns the
//!   qualifying locations.
//!
//! The band is `[mean - mean * t, mean + mean * t]`, inclusive on both ends.

use std::collections::BTreeMap;

use crate::config::{MissingReference, ThresholdConfig};
use crate::error::{Result, TollError};
use crate::types::{Edge, LocationAverage, LocationId};

/// Inclusive distance band around a mean.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceBand {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl DistanceBand {
    /// Band of relative half-width `tolerance` around `mean`.
    pub fn around(mean: f64, tolerance: f64) -> Self {
        Self {
            mean,
            lower: mean - mean * tolerance,
            upper: mean + mean * tolerance,
        }
    }

    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.lower && distance <= self.upper
    }
}

/// Rows starting at `reference` whose distance is within ±10% of that
/// reference's mean distance.
///
/// Empty input returns an empty result. A reference with no rows as
/// `id_start` fails with `ReferenceNotFound`, and a reference row with a
/// non-finite distance fails with `InvalidDistance`.
pub fn find_ids_within_ten_percentage_threshold<Id: LocationId>(
    edges: &[Edge<Id>],
    reference: &Id,
) -> Result<Vec<Edge<Id>>> {
    find_within_threshold(edges, reference, &ThresholdConfig::default())
}

/// Configurable form of [`find_ids_within_ten_percentage_threshold`].
///
/// Rows keep their input order.
pub fn find_within_threshold<Id: LocationId>(
    edges: &[Edge<Id>],
    reference: &Id,
    config: &ThresholdConfig,
) -> Result<Vec<Edge<Id>>> {
    config.validate()?;
    if edges.is_empty() {
        return Ok(Vec::new());
    }
    reject_non_finite(edges, |edge| &edge.id_start == reference)?;

    let (sum, count) = edges
        .iter()
        .filter(|edge| &edge.id_start == reference)
        .fold((0.0, 0usize), |(sum, count), edge| {
            (sum + edge.distance, count + 1)
        });
    if count == 0 {
        return missing_reference(reference, config);
    }

    let band = DistanceBand::around(sum / count as f64, config.tolerance);
    tracing::debug!(
        "Reference {:?}: mean {} over {} rows, band [{}, {}]",
        reference,
        band.mean,
        count,
        band.lower,
        band.upper
    );

    Ok(edges
        .iter()
        .filter(|edge| &edge.id_start == reference && band.contains(edge.distance))
        .cloned()
        .collect())
}

/// Average outgoing distance of every location that appears as `id_start`,
/// in ascending label order.
pub fn average_distances<Id: LocationId>(edges: &[Edge<Id>]) -> Vec<LocationAverage<Id>> {
    let mut totals: BTreeMap<&Id, (f64, usize)> = BTreeMap::new();
    for edge in edges {
        let entry = totals.entry(&edge.id_start).or_insert((0.0, 0));
        entry.0 += edge.distance;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(id, (sum, count))| LocationAverage {
            id: id.clone(),
            average_distance: sum / count as f64,
            edge_count: count,
        })
        .collect()
}

/// Locations whose own average outgoing distance falls in the band around
/// the reference's average.
///
/// The reference always qualifies when present. Results are in ascending
/// label order. Empty input and missing references behave as in
/// [`find_within_threshold`]. Every row feeds an average, so a non-finite
/// distance anywhere fails with `InvalidDistance`.
pub fn find_ids_with_average_within_threshold<Id: LocationId>(
    edges: &[Edge<Id>],
    reference: &Id,
    config: &ThresholdConfig,
) -> Result<Vec<LocationAverage<Id>>> {
    config.validate()?;
    if edges.is_empty() {
        return Ok(Vec::new());
    }
    reject_non_finite(edges, |_| true)?;

    let averages = average_distances(edges);
    let band = match averages.iter().find(|avg| &avg.id == reference) {
        Some(avg) => DistanceBand::around(avg.average_distance, config.tolerance),
        None => return missing_reference(reference, config),
    };

    let matches: Vec<_> = averages
        .into_iter()
        .filter(|avg| band.contains(avg.average_distance))
        .collect();
    tracing::debug!(
        "{} locations average within [{}, {}] of reference {:?}",
        matches.len(),
        band.lower,
        band.upper,
        reference
    );
    Ok(matches)
}

/// Fail on the first selected row whose distance is NaN or infinite.
fn reject_non_finite<Id>(edges: &[Edge<Id>], selected: impl Fn(&Edge<Id>) -> bool) -> Result<()> {
    match edges
        .iter()
        .enumerate()
        .find(|(_, edge)| selected(edge) && !edge.distance.is_finite())
    {
        Some((row, edge)) => Err(TollError::InvalidDistance {
            row,
            value: edge.distance,
        }),
        None => Ok(()),
    }
}

fn missing_reference<Id: LocationId, T>(reference: &Id, config: &ThresholdConfig) -> Result<Vec<T>> {
    match config.on_missing_reference {
        MissingReference::Error => Err(TollError::ReferenceNotFound {
            reference: format!("{:?}", reference),
        }),
        MissingReference::Empty => {
            tracing::warn!(
                "Reference {:?} has no outgoing rows, returning empty result",
                reference
            );
            Ok(Vec::new())
        }
    }
}
