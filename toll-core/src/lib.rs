//! Toll Core - Distance matrix construction and proximity filtering.
//!
//! This crate turns a list of measured distances between toll network
//! locations into a symmetric distance matrix, expands matrices back into
//! flat edge lists, and filters locations by proximity to a reference.
//!
//! # Features
//!
//! - **Symmetric accumulation**: Repeated pairs sum in both directions
//! - **Parallel construction**: Optional rayon-backed matrix builder
//! - **Unrolling**: Matrix to every ordered pair of distinct locations
//! - **Threshold filters**: ±10% band around a reference's mean distance
//! - **Record validation**: Structural checks on loosely typed input rows
//! - **Export**: CSV and JSON renderings
//!
//! # Usage
//!
//! ```rust
//! use toll_core::{calculate_distance_matrix, unroll_distance_matrix, Edge};
//! use toll_core::find_ids_within_ten_percentage_threshold;
//!
//! let edges = vec![Edge::new(1, 2, 10.0), Edge::new(2, 3, 20.0), Edge::new(1, 3, 5.0)];
//!
//! let matrix = calculate_distance_matrix(&edges);
//! assert_eq!(matrix.get(&3, &2), Some(20.0));
//!
//! let unrolled = unroll_distance_matrix(&matrix);
//! assert_eq!(unrolled.len(), 6);
//!
//! let near = find_ids_within_ten_percentage_threshold(&unrolled, &1)?;
//! assert!(near.iter().all(|edge| edge.id_start == 1));
//! # Ok::<(), toll_core::TollError>(())
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod export;
pub mod matrix;
pub mod records;
pub mod threshold;
pub mod types;

pub use config::{MissingReference, ThresholdConfig, DEFAULT_TOLERANCE};
pub use error::{Result, TollError};
pub use export::{edges_to_csv, edges_to_json, matrix_to_csv};
pub use matrix::{
    calculate_distance_matrix, calculate_distance_matrix_parallel, unroll_distance_matrix,
    DistanceMatrix,
};
pub use records::{edges_from_json, edges_from_records, EdgeRecord};
pub use threshold::{
    average_distances, find_ids_with_average_within_threshold,
    find_ids_within_ten_percentage_threshold, find_within_threshold, DistanceBand,
};
pub use types::{Edge, LocationAverage, LocationId};

/// Get the version of toll-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
