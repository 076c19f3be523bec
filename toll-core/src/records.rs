//! Validation boundary between loosely typed rows and [`Edge`]s.
//!
//! Rows arriving from a data-loading harness may be missing columns. They
//! are deserialized into [`EdgeRecord`] (all fields optional) and checked
//! here before anything reaches the matrix builder.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TollError};
use crate::types::Edge;

/// An unvalidated edge row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord<Id> {
    pub id_start: Option<Id>,
    pub id_end: Option<Id>,
    pub distance: Option<f64>,
}

impl<Id> EdgeRecord<Id> {
    pub fn new(id_start: Option<Id>, id_end: Option<Id>, distance: Option<f64>) -> Self {
        Self {
            id_start,
            id_end,
            distance,
        }
    }

    /// Validate this record, tagging errors with its position `row`.
    pub fn into_edge(self, row: usize) -> Result<Edge<Id>> {
        let id_start = self.id_start.ok_or(TollError::MissingField {
            row,
            field: "id_start",
        })?;
        let id_end = self.id_end.ok_or(TollError::MissingField {
            row,
            field: "id_end",
        })?;
        let distance = self.distance.ok_or(TollError::MissingField {
            row,
            field: "distance",
        })?;

        if !distance.is_finite() || distance < 0.0 {
            return Err(TollError::InvalidDistance {
                row,
                value: distance,
            });
        }

        Ok(Edge::new(id_start, id_end, distance))
    }
}

impl<Id> From<Edge<Id>> for EdgeRecord<Id> {
    fn from(edge: Edge<Id>) -> Self {
        Self::new(Some(edge.id_start), Some(edge.id_end), Some(edge.distance))
    }
}

/// Validate a sequence of records, stopping at the first bad one.
pub fn edges_from_records<Id, I>(records: I) -> Result<Vec<Edge<Id>>>
where
    I: IntoIterator<Item = EdgeRecord<Id>>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(row, record)| record.into_edge(row))
        .collect()
}

/// Parse a JSON array of `{id_start, id_end, distance}` objects into edges.
///
/// Absent keys and `null` values both count as missing fields.
pub fn edges_from_json<Id: DeserializeOwned>(json: &str) -> Result<Vec<Edge<Id>>> {
    let records: Vec<EdgeRecord<Id>> = serde_json::from_str(json)?;
    let edges = edges_from_records(records)?;
    tracing::debug!("Parsed {} edges from JSON", edges.len());
    Ok(edges)
}
