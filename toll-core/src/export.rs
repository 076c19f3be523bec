//! Text renderings of edge lists and matrices.
//!
//! CSV output follows the column layout of the input dataset
//! (`id_start,id_end,distance`). Matrices are written as a labeled grid with
//! an empty corner cell.

use serde::Serialize;
use std::fmt::Display;

use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::types::{Edge, LocationId};

/// Header row for edge CSV output.
pub const EDGE_CSV_HEADER: &str = "id_start,id_end,distance";

/// Format an edge list as CSV.
///
/// An empty list still produces the header row.
pub fn edges_to_csv<Id: Display>(edges: &[Edge<Id>]) -> String {
    let mut output = String::from(EDGE_CSV_HEADER);
    for edge in edges {
        output.push('\n');
        output.push_str(&format!(
            "{},{},{}",
            escape_value(&edge.id_start.to_string()),
            escape_value(&edge.id_end.to_string()),
            edge.distance
        ));
    }
    output
}

/// Format a matrix as a labeled CSV grid.
pub fn matrix_to_csv<Id: LocationId + Display>(matrix: &DistanceMatrix<Id>) -> String {
    let mut header = vec![String::new()];
    header.extend(matrix.ids().iter().map(|id| escape_value(&id.to_string())));

    let mut output = header.join(",");
    for id in matrix.ids() {
        let mut row = vec![escape_value(&id.to_string())];
        if let Some(cells) = matrix.row(id) {
            row.extend(cells.iter().map(|cell| cell.to_string()));
        }
        output.push('\n');
        output.push_str(&row.join(","));
    }
    output
}

/// Serialize an edge list to JSON.
///
/// serde_json writes non-finite distances as `null`, which
/// [`crate::edges_from_json`] then rejects as a missing field. Edges that came
/// through the record boundary, a built matrix or `DistanceMatrix::from_rows`
/// never carry such values.
pub fn edges_to_json<Id: Serialize>(edges: &[Edge<Id>], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(edges)?
    } else {
        serde_json::to_string(edges)?
    };
    Ok(json)
}

/// Escape a string value for CSV
///
/// Wraps in quotes if the value contains comma, newline, or quote.
/// Doubles any existing quotes.
fn escape_value(s: &str) -> String {
    if s.contains(',') || s.contains('\n') || s.contains('\r') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
