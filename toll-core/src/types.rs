//! Core data types shared by the matrix builder, unroller and filters.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Anything usable as a location label: integers, strings, newtypes.
///
/// `Ord` fixes the row/column order of built matrices, `Hash` backs the
/// label-to-index lookup, and `Debug` renders labels in error messages.
pub trait LocationId: Clone + Eq + Hash + Ord + Debug {}

impl<T> LocationId for T where T: Clone + Eq + Hash + Ord + Debug {}

/// A measured or accumulated distance between two locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge<Id> {
    pub id_start: Id,
    pub id_end: Id,
    pub distance: f64,
}

impl<Id> Edge<Id> {
    pub fn new(id_start: Id, id_end: Id, distance: f64) -> Self {
        Self {
            id_start,
            id_end,
            distance,
        }
    }

    /// Whether the edge starts and ends at the same location.
    pub fn is_self_loop(&self) -> bool
    where
        Id: PartialEq,
    {
        self.id_start == self.id_end
    }
}

/// Mean outgoing distance of one location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationAverage<Id> {
    pub id: Id,
    pub average_distance: f64,
    /// Number of rows the average was taken over.
    pub edge_count: usize,
}
