//! Terminal resolution behavior: candidates still in flight at end of
//! stream, and known-sequence matches that never completed.

use uniqseq::config::EngineConfig;
use uniqseq::engine::{Classification, Engine};
use uniqseq::emitter::EmittedItem;

fn run(window_size: usize, records: &[&str]) -> (Vec<String>, uniqseq::Stats) {
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
    let tracked: Vec<String> = out
        .into_iter()
        .filter_map(|item| match item {
            EmittedItem::Tracked(bytes) => Some(String::from_utf8(bytes).unwrap()),
            _ => None,
        })
        .collect();
    (tracked, engine.stats())
}

#[test]
fn candidate_still_in_flight_at_eos_is_confirmed() {
    // W=3: "A B C" establishes the pattern, then "A B C" repeats right up
    // to the last record with nothing after it. The repeat is only
    // resolved by flush, never mid-stream.
    let (emitted, stats) = run(3, &["A", "B", "C", "A", "B", "C"]);
    assert_eq!(emitted, vec!["A", "B", "C"]);
    assert_eq!(stats.skipped, 3);
}

#[test]
fn incomplete_known_sequence_match_at_eos_is_not_confirmed() {
    // Discover a known 4-record sequence "A B C D" by repeating it twice
    // in a seed run, then preload it into a fresh engine and feed only
    // its first three records: the resulting match never reaches the end
    // of the sequence and must be discarded, not confirmed.
    let mut engine = Engine::new(EngineConfig::new(3)).unwrap();
    let mut seed = Engine::new(EngineConfig::new(3)).unwrap();
    for r in ["A", "B", "C", "D", "A", "B", "C", "D"] {
        seed.push(r.as_bytes().to_vec(), r.as_bytes().to_vec(), Classification::Tracked)
            .unwrap();
    }
    seed.flush().unwrap();
    assert_eq!(seed.stats().known_sequences, 1);
    engine.import_known_sequences(seed.export_known_sequences());

    let mut out = Vec::new();
    for r in ["A", "B", "C"] {
        out.extend(
            engine
                .push(r.as_bytes().to_vec(), r.as_bytes().to_vec(), Classification::Tracked)
                .unwrap(),
        );
    }
    out.extend(engine.flush().unwrap());
    let tracked: Vec<String> = out
        .into_iter()
        .filter_map(|item| match item {
            EmittedItem::Tracked(bytes) => Some(String::from_utf8(bytes).unwrap()),
            _ => None,
        })
        .collect();
    assert_eq!(tracked, vec!["A", "B", "C"]);
}

#[test]
fn windows_that_never_fully_depart_never_start_a_candidate() {
    // Five identical records span windows starting at 0, 1, 2 only; none
    // of those ever fully departs another, so nothing is ever confirmed
    // even though the whole stream is one repeated symbol.
    let (emitted, stats) = run(3, &["Z", "Z", "Z", "Z", "Z"]);
    assert_eq!(emitted, vec!["Z", "Z", "Z", "Z", "Z"]);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn eos_preserves_bypassed_records_after_a_confirmed_tail_candidate() {
    let mut engine = Engine::new(EngineConfig::new(3)).unwrap();
    let mut out = Vec::new();
    let push = |engine: &mut Engine, out: &mut Vec<EmittedItem>, s: &str, c: Classification| {
        out.extend(engine.push(s.as_bytes().to_vec(), s.as_bytes().to_vec(), c).unwrap());
    };
    for r in ["A", "B", "C", "A", "B", "C"] {
        push(&mut engine, &mut out, r, Classification::Tracked);
    }
    push(&mut engine, &mut out, "tail-marker", Classification::Bypassed);
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
    assert_eq!(rendered, vec!["A", "B", "C", "tail-marker"]);
}
