//! Verifies that inserting bypassed records anywhere in the stream never
//! changes which tracked records are emitted or skipped.

use proptest::prelude::*;
use uniqseq::config::EngineConfig;
use uniqseq::engine::{Classification, Engine};
use uniqseq::emitter::EmittedItem;

fn tracked_only(window_size: usize, records: &[&str]) -> Vec<String> {
    let mut engine = Engine::new(EngineConfig::new(window_size)).unwrap();
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
fn scenario_seven_bypass_interleaved_with_tracked_duplicate() {
    let mut engine = Engine::new(EngineConfig::new(3)).unwrap();
    let mut out = Vec::new();
    let push = |engine: &mut Engine, out: &mut Vec<EmittedItem>, s: &str, c: Classification| {
        out.extend(engine.push(s.as_bytes().to_vec(), s.as_bytes().to_vec(), c).unwrap());
    };
    push(&mut engine, &mut out, "A", Classification::Tracked);
    push(&mut engine, &mut out, "B", Classification::Tracked);
    push(&mut engine, &mut out, "C", Classification::Tracked);
    push(&mut engine, &mut out, "X", Classification::Bypassed);
    push(&mut engine, &mut out, "A", Classification::Tracked);
    push(&mut engine, &mut out, "B", Classification::Tracked);
    push(&mut engine, &mut out, "C", Classification::Tracked);
    out.extend(engine.flush().unwrap());

    let rendered: Vec<String> = out
        .into_iter()
        .filter_map(|item| match item {
            EmittedItem::Tracked(bytes) | EmittedItem::Bypassed(bytes) => {
                Some(String::from_utf8(bytes).unwrap())
            }
            EmittedItem::Annotation(_) => None,
        })
        .collect();
    assert_eq!(rendered, vec!["A", "B", "C", "X"]);
}

#[test]
fn bypass_records_scattered_throughout_do_not_change_tracked_emission() {
    let tracked = ["A", "B", "C", "A", "B", "C", "D", "A", "B", "C"];
    let baseline = tracked_only(3, &tracked);

    // Same tracked records, now with bypassed lines inserted at every
    // boundary (including before the first and after the last).
    let mut engine = Engine::new(EngineConfig::new(3)).unwrap();
    let mut out = Vec::new();
    let push = |engine: &mut Engine, out: &mut Vec<EmittedItem>, s: &str, c: Classification| {
        out.extend(engine.push(s.as_bytes().to_vec(), s.as_bytes().to_vec(), c).unwrap());
    };
    push(&mut engine, &mut out, "#1", Classification::Bypassed);
    for (i, r) in tracked.iter().enumerate() {
        push(&mut engine, &mut out, r, Classification::Tracked);
        push(&mut engine, &mut out, &format!("#{}", i + 2), Classification::Bypassed);
    }
    out.extend(engine.flush().unwrap());

    let tracked_emitted: Vec<String> = out
        .into_iter()
        .filter_map(|item| match item {
            EmittedItem::Tracked(bytes) => Some(String::from_utf8(bytes).unwrap()),
            _ => None,
        })
        .collect();
    assert_eq!(tracked_emitted, baseline);
}

fn alphabet_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..5, 0..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn bypass_placement_never_changes_tracked_emission(
        values in alphabet_strategy(40),
        bypass_mask in proptest::collection::vec(any::<bool>(), 0..40),
    ) {
        let records: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let refs: Vec<&str> = records.iter().map(String::as_str).collect();
        let baseline = tracked_only(3, &refs);

        // Interleave a bypassed marker record before every tracked record
        // whose index has a `true` in the (possibly shorter/longer) mask.
        let mut engine = Engine::new(EngineConfig::new(3)).unwrap();
        let mut out = Vec::new();
        for (i, r) in records.iter().enumerate() {
            if bypass_mask.get(i).copied().unwrap_or(false) {
                out.extend(
                    engine
                        .push(b"#".to_vec(), b"#".to_vec(), Classification::Bypassed)
                        .unwrap(),
                );
            }
            out.extend(
                engine
                    .push(r.as_bytes().to_vec(), r.as_bytes().to_vec(), Classification::Tracked)
                    .unwrap(),
            );
        }
        out.extend(engine.flush().unwrap());
        let tracked_emitted: Vec<String> = out
            .into_iter()
            .filter_map(|item| match item {
                EmittedItem::Tracked(bytes) => Some(String::from_utf8(bytes).unwrap()),
                _ => None,
            })
            .collect();
        prop_assert_eq!(tracked_emitted, baseline);
    }
}
