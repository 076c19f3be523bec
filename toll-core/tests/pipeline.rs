//! Integration tests for the toll-core pipeline
//!
//! Exercises records -> edges -> matrix -> unrolled edges -> filtered rows
//! through the public API only.

use approx::assert_relative_eq;
use toll_core::*;

// ============================================================================
// Test Utilities
// ============================================================================

/// A small slice of a toll corridor, loaded the way a harness would hand it over
fn corridor_json() -> &'static str {
    r#"[
        {"id_start": 1001400, "id_end": 1001402, "distance": 9.7},
        {"id_start": 1001402, "id_end": 1001404, "distance": 20.2},
        {"id_start": 1001404, "id_end": 1001406, "distance": 16.0},
        {"id_start": 1001406, "id_end": 1001408, "distance": 21.7},
        {"id_start": 1001400, "id_end": 1001404, "distance": 29.9}
    ]"#
}

fn corridor() -> Vec<Edge<u64>> {
    edges_from_json(corridor_json()).expect("corridor fixture should parse")
}

// ============================================================================
// Matrix properties
// ============================================================================

#[test]
fn test_matrix_covers_all_locations_and_is_symmetric() {
    let edges = corridor();
    let matrix = calculate_distance_matrix(&edges);

    assert_eq!(matrix.len(), 5);
    assert!(matrix.is_symmetric());
    for edge in &edges {
        assert!(matrix.contains(&edge.id_start));
        assert!(matrix.contains(&edge.id_end));
        assert_eq!(
            matrix.get(&edge.id_start, &edge.id_end),
            matrix.get(&edge.id_end, &edge.id_start)
        );
    }
    // Pairs never observed stay at zero
    assert_eq!(matrix.get(&1001400, &1001408), Some(0.0));
}

#[test]
fn test_accumulation_across_duplicate_rows() {
    let mut edges = corridor();
    edges.push(Edge::new(1001402, 1001400, 0.3));

    let matrix = calculate_distance_matrix(&edges);
    let cell = matrix.get(&1001400, &1001402).unwrap();
    assert_relative_eq!(cell, 10.0);
    assert_relative_eq!(matrix.get(&1001402, &1001400).unwrap(), cell);
}

#[test]
fn test_parallel_builder_agrees() {
    let edges = corridor();
    let sequential = calculate_distance_matrix(&edges);
    let parallel = calculate_distance_matrix_parallel(&edges, Some(2));

    assert_eq!(sequential.ids(), parallel.ids());
    for a in sequential.ids() {
        for b in sequential.ids() {
            assert_relative_eq!(sequential.get(a, b).unwrap(), parallel.get(a, b).unwrap());
        }
    }
}

// ============================================================================
// Unrolling
// ============================================================================

#[test]
fn test_unroll_round_trip_cardinality() {
    let matrix = calculate_distance_matrix(&corridor());
    let unrolled = unroll_distance_matrix(&matrix);

    let n = matrix.len();
    assert_eq!(unrolled.len(), n * (n - 1));
    for edge in &unrolled {
        assert!(!edge.is_self_loop());
        assert_eq!(matrix.get(&edge.id_start, &edge.id_end), Some(edge.distance));
    }

    // Rebuilding from the unrolled rows doubles every cell: each unordered
    // pair now appears once in each direction
    let rebuilt = calculate_distance_matrix(&unrolled);
    assert_eq!(rebuilt.ids(), matrix.ids());
    assert_relative_eq!(
        rebuilt.get(&1001400, &1001402).unwrap(),
        2.0 * matrix.get(&1001400, &1001402).unwrap()
    );
}

// ============================================================================
// Threshold filters
// ============================================================================

#[test]
fn test_threshold_on_unrolled_rows() {
    let unrolled = unroll_distance_matrix(&calculate_distance_matrix(&corridor()));

    // Row for 1001404: 29.9, 20.2, 16.0 and 0.0 to the unlinked 1001408
    let reference = 1001404u64;
    let rows: Vec<_> = unrolled
        .iter()
        .filter(|edge| edge.id_start == reference)
        .collect();
    let mean = rows.iter().map(|edge| edge.distance).sum::<f64>() / rows.len() as f64;
    assert_relative_eq!(mean, 16.525, epsilon = 1e-9);

    let result = find_ids_within_ten_percentage_threshold(&unrolled, &reference).unwrap();
    assert_eq!(result, vec![Edge::new(1001404, 1001406, 16.0)]);
    for edge in &result {
        assert!(edge.distance >= mean * 0.9 && edge.distance <= mean * 1.1);
    }
}

#[test]
fn test_threshold_band_via_records() {
    let records = vec![
        EdgeRecord::new(Some(1), Some(2), Some(10.0)),
        EdgeRecord::new(Some(1), Some(3), Some(5.0)),
        EdgeRecord::new(Some(1), Some(4), Some(15.0)),
    ];
    let edges = edges_from_records(records).unwrap();

    let result = find_ids_within_ten_percentage_threshold(&edges, &1).unwrap();
    assert_eq!(result, vec![Edge::new(1, 2, 10.0)]);
}

#[test]
fn test_threshold_missing_reference_policies() {
    let edges = corridor();

    let err = find_ids_within_ten_percentage_threshold(&edges, &42).unwrap_err();
    assert!(matches!(err, TollError::ReferenceNotFound { .. }));

    let config = ThresholdConfig::from_toml_str(
        r#"
[threshold]
on_missing_reference = "empty"
"#,
    )
    .unwrap();
    assert!(find_within_threshold(&edges, &42, &config).unwrap().is_empty());
}

#[test]
fn test_average_variant_on_string_ids() {
    let edges = vec![
        Edge::new("north".to_string(), "east".to_string(), 10.0),
        Edge::new("east".to_string(), "north".to_string(), 10.5),
        Edge::new("south".to_string(), "north".to_string(), 40.0),
    ];

    let result = find_ids_with_average_within_threshold(
        &edges,
        &"north".to_string(),
        &ThresholdConfig::default(),
    )
    .unwrap();

    let ids: Vec<_> = result.iter().map(|avg| avg.id.as_str()).collect();
    assert_eq!(ids, vec!["east", "north"]);
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_unrolled_csv() {
    let edges = vec![Edge::new(1, 2, 10.0), Edge::new(2, 3, 20.0), Edge::new(1, 3, 5.0)];
    let unrolled = unroll_distance_matrix(&calculate_distance_matrix(&edges));
    let csv = edges_to_csv(&unrolled);

    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "id_start,id_end,distance");
    assert_eq!(lines[1], "1,2,10");
    assert_eq!(lines[6], "3,2,20");

    let json = edges_to_json(&unrolled, false).unwrap();
    let parsed: Vec<Edge<i32>> = edges_from_json(&json).unwrap();
    assert_eq!(parsed, unrolled);
}
