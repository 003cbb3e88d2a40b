use proptest::prelude::*;
use roster_model::{RawRow, Workbook};
use roster_test_utils::{client_row, task_row, worker_row};
use roster_validate::{validate_all, Validator, ValidatorConfig};

fn arb_client() -> impl Strategy<Value = RawRow> {
    (
        "C[0-3]",
        -1..8i64,
        proptest::sample::select(vec!["T1", "T2", "T1,T9", "", "T2,T3"]),
        proptest::sample::select(vec!["", "vip", "{oops", r#"{"a":1}"#]),
    )
        .prop_map(|(id, priority, requested, attrs)| {
            client_row(&id, "name", priority, requested).with("AttributesJSON", attrs)
        })
}

fn arb_worker() -> impl Strategy<Value = RawRow> {
    (
        "W[0-3]",
        proptest::sample::select(vec!["a", "b", "a,b", ""]),
        proptest::sample::select(vec!["1-3", "[1,2]", "2", "x", ""]),
        -1..4i64,
    )
        .prop_map(|(id, skills, slots, load)| worker_row(&id, "name", skills, slots, load))
}

fn arb_task() -> impl Strategy<Value = RawRow> {
    (
        "T[0-3]",
        0..4i64,
        proptest::sample::select(vec!["a", "b", "c", ""]),
        proptest::sample::select(vec!["1", "1-2", "[3]", "soon"]),
        -1..3i64,
    )
        .prop_map(|(id, duration, skills, phases, mc)| {
            task_row(&id, "name", duration, skills, phases, mc)
        })
}

fn arb_workbook() -> impl Strategy<Value = Workbook> {
    (
        proptest::collection::vec(arb_client(), 0..5),
        proptest::collection::vec(arb_worker(), 0..5),
        proptest::collection::vec(arb_task(), 0..5),
    )
        .prop_map(|(clients, workers, tasks)| {
            Workbook::new()
                .with_sheet("Clients", clients)
                .with_sheet("Workers", workers)
                .with_sheet("Tasks", tasks)
        })
}

proptest! {
    #[test]
    fn prop_validation_is_idempotent(wb in arb_workbook()) {
        let mut wb = wb;
        let first = validate_all(&mut wb);
        let second = validate_all(&mut wb);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_cache_is_transparent(wb in arb_workbook()) {
        let cached = Validator::new(ValidatorConfig::default().with_cache_capacity(2)).unwrap();

        let mut plain_wb = wb.clone();
        let expected = validate_all(&mut plain_wb);

        let mut cached_wb = wb.clone();
        prop_assert_eq!(&cached.validate_all(&mut cached_wb), &expected);
        let mut again = wb;
        prop_assert_eq!(&cached.validate_all(&mut again), &expected);
        prop_assert_eq!(cached_wb, plain_wb);
    }

    #[test]
    fn prop_duplicates_flag_only_repeats(ids in proptest::collection::vec("C[0-4]", 0..12)) {
        let rows: Vec<_> = ids.iter().map(|id| client_row(id, "n", 1.0, "")).collect();
        let mut wb = Workbook::new().with_sheet("Clients", rows);
        let report = validate_all(&mut wb);

        let mut seen = std::collections::HashSet::new();
        let expected: Vec<i64> = ids
            .iter()
            .enumerate()
            .filter(|(_, id)| !seen.insert(id.as_str()))
            .map(|(i, _)| i as i64)
            .collect();
        let flagged: Vec<i64> = report.errors.iter().map(|e| e.row_index()).collect();
        prop_assert_eq!(flagged, expected);
    }

    #[test]
    fn prop_is_valid_iff_no_errors(wb in arb_workbook()) {
        let mut wb = wb;
        let report = validate_all(&mut wb);
        prop_assert_eq!(report.is_valid, report.errors.is_empty());
    }
}
