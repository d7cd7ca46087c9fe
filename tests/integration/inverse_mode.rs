//! Inverse mode: the emit/skip decision is flipped, nothing else changes.

use proptest::prelude::*;
use uniqseq::config::EngineConfig;
use uniqseq::engine::{Classification, Engine};
use uniqseq::emitter::EmittedItem;
use uniqseq::error::EngineError;

fn run_tracked(config: EngineConfig, records: &[&str]) -> Vec<String> {
    let mut engine = Engine::new(config).unwrap();
    let mut out = Vec::new();
    for r in records {
        out.extend(
            engine
                .push(r.as_bytes().to_vec(), r.as_bytes().to_vec(), Classification::Tracked)
                .unwrap(),
        );
    }
    out.extend(engine.flush().unwrap());
    out.into_iter()
        .filter_map(|item| match item {
            EmittedItem::Tracked(bytes) => Some(String::from_utf8(bytes).unwrap()),
            _ => None,
        })
        .collect()
}

#[test]
fn inverse_mode_emits_exactly_what_normal_mode_skips() {
    let records = ["A", "B", "C", "A", "B", "C", "D"];
    let mut normal = EngineConfig::new(3);
    normal.inverse_mode = false;
    let mut inverse = EngineConfig::new(3);
    inverse.inverse_mode = true;

    let kept = run_tracked(normal, &records);
    let flipped = run_tracked(inverse, &records);

    assert_eq!(kept, vec!["A", "B", "C", "D"]);
    assert_eq!(flipped, vec!["A", "B", "C"]);
}

#[test]
fn inverse_mode_disables_annotations_even_when_requested() {
    let mut config = EngineConfig::new(3);
    config.inverse_mode = true;
    config.annotate = true;
    let mut engine = Engine::new(config).unwrap();
    let mut out = Vec::new();
    for r in ["A", "B", "C", "A", "B", "C"] {
        out.extend(
            engine
                .push(r.as_bytes().to_vec(), r.as_bytes().to_vec(), Classification::Tracked)
                .unwrap(),
        );
    }
    out.extend(engine.flush().unwrap());
    assert!(!out.iter().any(|item| matches!(item, EmittedItem::Annotation(_))));
}

#[test]
fn rejects_window_size_below_minimum() {
    let err = Engine::new(EngineConfig::new(1)).unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}

fn alphabet_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..5, 0..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn normal_and_inverse_runs_partition_the_tracked_input(values in alphabet_strategy(50)) {
        let records: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let refs: Vec<&str> = records.iter().map(String::as_str).collect();

        let mut normal = EngineConfig::new(3);
        normal.inverse_mode = false;
        let mut inverse = EngineConfig::new(3);
        inverse.inverse_mode = true;

        let kept = run_tracked(normal, &refs);
        let flipped = run_tracked(inverse, &refs);

        // Every tracked record appears in exactly one of the two outputs.
        prop_assert_eq!(kept.len() + flipped.len(), records.len());

        let mut kept_cursor = 0;
        let mut flipped_cursor = 0;
        for record in &records {
            let is_kept = kept_cursor < kept.len() && &kept[kept_cursor] == record;
            let is_flipped = flipped_cursor < flipped.len() && &flipped[flipped_cursor] == record;
            prop_assert!(is_kept != is_flipped, "record {record:?} must land in exactly one stream");
            if is_kept {
                kept_cursor += 1;
            } else {
                flipped_cursor += 1;
            }
        }
    }
}
