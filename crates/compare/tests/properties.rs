// Property-based tests for sorting, tolerance extraction and pruning.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use simcheck_compare::prune::{distance, prune_rows, PrunePolicy, POSITION_EPSILON};
use simcheck_compare::sort_key::select_sort_key;
use simcheck_compare::sorter::{sort_rows, SortOrder};
use simcheck_compare::tolerance::{extract_tolerances, within_tolerance};
use simcheck_compare::{Row, Table, TableRole};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn header() -> Vec<String> {
    ["Points:0", "Points:1", "Points:2", "phi_1", "val"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Small coordinate alphabet so coincident points are common.
fn arb_coord() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("0".to_string()),
        Just("0.5".to_string()),
        Just("1".to_string()),
        Just("-1".to_string()),
        Just("10".to_string()),
    ]
}

fn arb_value() -> impl Strategy<Value = String> {
    r"-?[0-9]{1,3}(\.[0-9]{1,4})?"
}

fn arb_row() -> impl Strategy<Value = Row> {
    (arb_coord(), arb_coord(), arb_coord(), arb_value(), arb_value())
        .prop_map(|(x, y, z, phi, val)| vec![x, y, z, phi, val])
}

fn arb_table() -> impl Strategy<Value = Table> {
    prop::collection::vec(arb_row(), 0..40)
        .prop_map(|rows| Table::new(TableRole::Parallel, header(), rows).unwrap())
}

fn arb_order() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Text), Just(SortOrder::Numeric)]
}

/// Key fields mixing numbers, numeric spellings of the same value and text.
fn arb_mixed_field() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_value(),
        Just("1".to_string()),
        Just("1.0".to_string()),
        Just("-0".to_string()),
        Just("nan".to_string()),
        r"[0-9]{1,2}[a-z]{1,2}",
        r"[a-z]{1,3}",
    ]
}

fn arb_mixed_table() -> impl Strategy<Value = Table> {
    prop::collection::vec(
        (arb_mixed_field(), arb_mixed_field(), arb_mixed_field())
            .prop_map(|(x, y, z)| vec![x, y, z]),
        0..60,
    )
    .prop_map(|rows| {
        let header = COORD_HEADER.iter().map(|s| s.to_string()).collect();
        Table::new(TableRole::Parallel, header, rows).unwrap()
    })
}

const COORD_HEADER: [&str; 3] = ["Points:0", "Points:1", "Points:2"];

fn parse_pos(row: &Row) -> [f64; 3] {
    [
        row[0].parse().unwrap(),
        row[1].parse().unwrap(),
        row[2].parse().unwrap(),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn sorting_is_idempotent(table in arb_table(), order in arb_order()) {
        let key = select_sort_key(&table).unwrap();
        let once = sort_rows(&table, &key, order);
        let twice = sort_rows(&table.with_rows(once.clone()), &key, order);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sorting_ignores_input_order(table in arb_mixed_table(), order in arb_order()) {
        let key = select_sort_key(&table).unwrap();
        let forward = sort_rows(&table, &key, order);
        let mut reversed_rows = table.rows().to_vec();
        reversed_rows.reverse();
        let backward = sort_rows(&table.with_rows(reversed_rows), &key, order);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn sorting_is_a_permutation(table in arb_table()) {
        let key = select_sort_key(&table).unwrap();
        let mut sorted = sort_rows(&table, &key, SortOrder::Text);
        let mut original = table.rows().to_vec();
        sorted.sort();
        original.sort();
        prop_assert_eq!(sorted, original);
    }

    #[test]
    fn sorting_is_stable_beyond_key(table in arb_table()) {
        // Tag each row with its input position in a non-key column.
        let tagged: Vec<Row> = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut r = r.clone();
                r[4] = format!("{i:06}");
                r
            })
            .collect();
        let tagged = table.with_rows(tagged);
        let key = select_sort_key(&tagged).unwrap();
        let sorted = sort_rows(&tagged, &key, SortOrder::Text);
        for pair in sorted.windows(2) {
            let same_key = key.columns.iter().all(|&c| pair[0][c] == pair[1][c]);
            if same_key {
                prop_assert!(pair[0][4] < pair[1][4]);
            }
        }
    }

    #[test]
    fn extraction_round_trips(rows in prop::collection::vec(
        (arb_row(), 0.0..1.0f64).prop_map(|(mut r, tol)| { r.push(tol.to_string()); r }),
        0..30,
    )) {
        let extracted = extract_tolerances(&rows).unwrap();
        prop_assert_eq!(extracted.rows.len(), rows.len());
        prop_assert_eq!(extracted.tolerances.len(), rows.len());
        for ((data, tol), original) in extracted.rows.iter().zip(&extracted.tolerances).zip(&rows) {
            prop_assert_eq!(data.len(), original.len() - 1);
            let mut joined = data.clone();
            joined.push(original.last().unwrap().clone());
            prop_assert_eq!(&joined, original);
            prop_assert_eq!(*tol, original.last().unwrap().parse::<f64>().unwrap());
        }
    }

    #[test]
    fn tolerance_accepts_equal_and_rejects_clear_excess(a in -1e6..1e6f64, tol in 0.0..10.0f64) {
        prop_assert!(within_tolerance(a, a, tol, true));
        prop_assert!(within_tolerance(a, a, tol, false));
        let far = a + tol + 1e-6 * (1.0 + a.abs());
        prop_assert!(!within_tolerance(a, far, tol, true));
    }

    #[test]
    fn unmatched_pruning_keeps_exactly_the_rows_with_counterparts(
        rows in prop::collection::vec(arb_row(), 0..30),
        reference in prop::collection::vec(arb_row(), 0..10),
    ) {
        let out = prune_rows(&rows, [0, 1, 2], TableRole::Parallel, &reference, [0, 1, 2], PrunePolicy::Unmatched, POSITION_EPSILON).unwrap();
        let ref_pos: Vec<_> = reference.iter().map(parse_pos).collect();
        let has_match = |r: &Row| ref_pos.iter().any(|q| distance(&parse_pos(r), q) < POSITION_EPSILON);

        let expected: Vec<Row> = rows.iter().filter(|r| has_match(*r)).cloned().collect();
        prop_assert_eq!(out.rows, expected);
        prop_assert!(out.removed.iter().all(|r| !has_match(r)));
    }

    #[test]
    fn matched_pruning_never_removes_far_rows(
        rows in prop::collection::vec(arb_row(), 0..30),
        reference in prop::collection::vec(arb_row(), 0..10),
    ) {
        let out = prune_rows(&rows, [0, 1, 2], TableRole::Parallel, &reference, [0, 1, 2], PrunePolicy::Matched, POSITION_EPSILON).unwrap();
        let ref_pos: Vec<_> = reference.iter().map(parse_pos).collect();
        let has_match = |r: &Row| ref_pos.iter().any(|q| distance(&parse_pos(r), q) < POSITION_EPSILON);

        for r in rows.iter().filter(|r| !has_match(*r)) {
            prop_assert!(out.rows.contains(r));
        }
        prop_assert!(out.rows.iter().all(|r| !has_match(r)));
    }
}
