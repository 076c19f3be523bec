//! Symmetric distance matrix over a set of labeled locations.
//!
//! The matrix is a labeled 2D array: labels live in a `Vec` (row order ==
//! column order) with a label-to-index map for O(1) cell access, and cells
//! are stored row-major in a flat `Vec<f64>`.
//!
//! # Pipeline
//!
//! ```text
//! edges -> calculate_distance_matrix -> DistanceMatrix -> unroll_distance_matrix -> edges
//! ```
//!
//! Construction writes every edge in both directions and sums repeated pairs,
//! so a built matrix is always symmetric. Unrolling expands it back into every
//! ordered pair except the diagonal; it does not undo accumulation.

use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

use crate::error::{Result, TollError};
use crate::types::{Edge, LocationId};

/// Square table of accumulated distances indexed by location on both axes.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix<Id: LocationId> {
    ids: Vec<Id>,
    index: HashMap<Id, usize>,
    cells: Vec<f64>,
}

impl<Id: LocationId> DistanceMatrix<Id> {
    fn zeroed(ids: Vec<Id>) -> Self {
        let n = ids.len();
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            ids,
            index,
            cells: vec![0.0; n * n],
        }
    }

    /// Build a matrix from externally supplied labels and rows.
    ///
    /// Labels keep the order given. Each row must have exactly one cell per
    /// label. Symmetry is not enforced here; see [`DistanceMatrix::is_symmetric`].
    ///
    /// # Errors
    ///
    /// - `DuplicateLocation` if a label repeats
    /// - `DimensionMismatch` if the table is not `ids.len()` square
    /// - `InvalidDistance` if a cell is negative or not finite, tagged with
    ///   its row position
    pub fn from_rows(ids: Vec<Id>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = ids.len();
        if rows.len() != n {
            return Err(TollError::DimensionMismatch {
                expected: n,
                found: rows.len(),
            });
        }

        let mut index = HashMap::with_capacity(n);
        for (i, id) in ids.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(TollError::DuplicateLocation {
                    id: format!("{:?}", id),
                });
            }
        }

        let mut cells = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(TollError::DimensionMismatch {
                    expected: n,
                    found: row.len(),
                });
            }
            if let Some(&value) = row.iter().find(|cell| !cell.is_finite() || **cell < 0.0) {
                return Err(TollError::InvalidDistance { row: i, value });
            }
            cells.extend(row);
        }

        Ok(Self { ids, index, cells })
    }

    /// Location labels in row (and column) order.
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.index.contains_key(id)
    }

    /// Distance stored at `(start, end)`, or `None` if either label is unknown.
    pub fn get(&self, start: &Id, end: &Id) -> Option<f64> {
        let i = *self.index.get(start)?;
        let j = *self.index.get(end)?;
        Some(self.cells[i * self.len() + j])
    }

    /// Full row for `start`, in label order.
    pub fn row(&self, start: &Id) -> Option<&[f64]> {
        let n = self.len();
        let i = *self.index.get(start)?;
        Some(&self.cells[i * n..(i + 1) * n])
    }

    /// Check `cell(a, b) == cell(b, a)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| (i + 1..n).all(|j| self.cells[i * n + j] == self.cells[j * n + i]))
    }

    fn accumulate(&mut self, start: usize, end: usize, distance: f64) {
        let n = self.len();
        self.cells[start * n + end] += distance;
        self.cells[end * n + start] += distance;
    }
}

/// Sorted union of every start and end label.
fn location_universe<Id: LocationId>(edges: &[Edge<Id>]) -> Vec<Id> {
    edges
        .iter()
        .flat_map(|e| [&e.id_start, &e.id_end])
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build a symmetric distance matrix from an edge list.
///
/// Every edge `(s, e, d)` adds `d` to both `cell(s, e)` and `cell(e, s)`, so
/// repeated pairs (in either direction) sum rather than overwrite. A self
/// edge lands on the diagonal and, like any other edge, is written twice.
/// Rows and columns follow ascending label order. Empty input yields an
/// empty matrix.
pub fn calculate_distance_matrix<Id: LocationId>(edges: &[Edge<Id>]) -> DistanceMatrix<Id> {
    let mut matrix = DistanceMatrix::zeroed(location_universe(edges));

    for edge in edges {
        let start = matrix.index[&edge.id_start];
        let end = matrix.index[&edge.id_end];
        matrix.accumulate(start, end, edge.distance);
    }

    tracing::debug!(
        "Built distance matrix: {} locations from {} edges",
        matrix.len(),
        edges.len()
    );
    matrix
}

/// Parallel variant of [`calculate_distance_matrix`] using rayon.
///
/// Edge contributions are bucketed by matrix row, then each row is summed in
/// place by a single worker. Memory stays at one matrix plus two bucket
/// entries per edge, and every cell receives its additions in edge order, so
/// the result is identical to the sequential builder.
///
/// # Arguments
///
/// * `edges` - Input edge list
/// * `num_threads` - Optional thread count (defaults to the global rayon pool)
pub fn calculate_distance_matrix_parallel<Id>(
    edges: &[Edge<Id>],
    num_threads: Option<usize>,
) -> DistanceMatrix<Id>
where
    Id: LocationId + Send + Sync,
{
    let mut matrix = DistanceMatrix::zeroed(location_universe(edges));
    let n = matrix.len();
    if n == 0 {
        return matrix;
    }

    let mut buckets: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for edge in edges {
        let start = matrix.index[&edge.id_start];
        let end = matrix.index[&edge.id_end];
        buckets[start].push((end, edge.distance));
        buckets[end].push((start, edge.distance));
    }

    let pool = match num_threads {
        Some(threads) if threads > 0 => {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    tracing::warn!(
                        "Failed to build {}-thread pool, using global pool: {}",
                        threads,
                        e
                    );
                    None
                }
            }
        }
        _ => None,
    };

    let cells = &mut matrix.cells;
    let mut fill = || {
        cells
            .par_chunks_mut(n)
            .zip(buckets.par_iter())
            .for_each(|(row, bucket)| {
                for &(col, distance) in bucket {
                    row[col] += distance;
                }
            });
    };

    match pool {
        Some(pool) => pool.install(fill),
        None => fill(),
    }

    tracing::debug!(
        "Built distance matrix in parallel: {} locations from {} edges",
        matrix.len(),
        edges.len()
    );
    matrix
}

/// Expand a matrix into one edge per ordered pair of distinct locations.
///
/// Rows come out row-major in the matrix's label order, `n * (n - 1)` of them.
/// The diagonal is always skipped.
pub fn unroll_distance_matrix<Id: LocationId>(matrix: &DistanceMatrix<Id>) -> Vec<Edge<Id>> {
    let n = matrix.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1));

    for (i, start) in matrix.ids.iter().enumerate() {
        for (j, end) in matrix.ids.iter().enumerate() {
            if i == j {
                continue;
            }
            edges.push(Edge::new(start.clone(), end.clone(), matrix.cells[i * n + j]));
        }
    }

    tracing::debug!("Unrolled {} locations into {} edges", n, edges.len());
    edges
}
