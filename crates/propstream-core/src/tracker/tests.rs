use super::*;
use crate::error::StreamError;
use crate::events::{ComponentEvent, EventKind};
use crate::partial_json::MockPartialJsonParser;
use serde_json::{Map, Value, json};
use std::sync::Arc;

fn kinds(events: &[ComponentEvent]) -> Vec<EventKind> {
    events.iter().map(ComponentEvent::kind).collect()
}

fn only_delta(events: &[ComponentEvent]) -> (&[PatchOp], &StatusMap) {
    let deltas: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            ComponentEvent::PropsDelta {
                patch,
                streaming_status,
                ..
            } => Some((patch.as_slice(), streaming_status)),
            _ => None,
        })
        .collect();
    assert_eq!(deltas.len(), 1, "expected exactly one props_delta in {:?}", events);
    deltas[0]
}

fn final_props(events: &[ComponentEvent]) -> Map<String, Value> {
    match events.last() {
        Some(ComponentEvent::End { final_props, .. }) => final_props.clone(),
        other => panic!("expected end event, got {:?}", other),
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

// ==================== Tracker ====================

#[test]
fn test_start_then_add_when_value_arrives() {
    let mut tracker = ComponentTracker::new("c1", "Greeting");

    let first = tracker.process_delta(r#"{"title":"#);
    assert_eq!(kinds(&first), vec![EventKind::Start]);
    match &first[0] {
        ComponentEvent::Start {
            component_id,
            component_name,
            ..
        } => {
            assert_eq!(component_id, "c1");
            assert_eq!(component_name, "Greeting");
        }
        other => panic!("expected start, got {:?}", other),
    }

    let second = tracker.process_delta(r#""hello"}"#);
    assert_eq!(kinds(&second), vec![EventKind::PropsDelta]);
    let (patch, status) = only_delta(&second);
    assert_eq!(patch, &[PatchOp::add("title", json!("hello"))]);
    assert_eq!(status.get("title"), Some(&PropStatus::Done));
    assert_eq!(status.len(), 1);
}

#[test]
fn test_start_emitted_exactly_once() {
    let mut tracker = ComponentTracker::new("c1", "Card");
    let mut events = Vec::new();
    for piece in [r#"{"a""#, ":1", r#","b":"#, "2}"] {
        events.extend(tracker.process_delta(piece));
    }
    events.extend(tracker.finalize());

    let starts = events.iter().filter(|e| e.kind() == EventKind::Start).count();
    let ends = events.iter().filter(|e| e.kind() == EventKind::End).count();
    assert_eq!(starts, 1);
    assert_eq!(ends, 1);
    assert_eq!(events.first().map(ComponentEvent::kind), Some(EventKind::Start));
    assert_eq!(events.last().map(ComponentEvent::kind), Some(EventKind::End));
}

#[test]
fn test_key_disappearing_emits_remove() {
    let mut tracker = ComponentTracker::new("c1", "Stats");

    let events = tracker.process_delta(r#"{"a":1,"n":-1"#);
    let (patch, _) = only_delta(&events);
    assert_eq!(
        patch,
        &[PatchOp::add("a", json!(1)), PatchOp::add("n", json!(-1))]
    );

    // "-1." is not a number yet, so the key drops out of the parsed object
    let events = tracker.process_delta(".");
    let (patch, status) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::remove("n")]);
    assert!(!status.contains_key("n"));
    assert!(!tracker.status().contains_key("n"));

    let events = tracker.process_delta("5}");
    let (patch, status) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::add("n", json!(-1.5))]);
    assert_eq!(status.get("n"), Some(&PropStatus::Done));
}

#[test]
fn test_removed_key_absent_from_later_status_maps() {
    let mut parser = MockPartialJsonParser::new();
    parser.expect_parse_partial().returning(|text| match text.len() {
        1 => Some(json!({"keep": 1, "drop": 2})),
        2 => Some(json!({"keep": 1})),
        _ => Some(json!({"keep": 1, "other": 3})),
    });
    let mut tracker = ComponentTracker::with_parser("c1", "Card", Arc::new(parser));

    tracker.process_delta("x");
    let events = tracker.process_delta("x");
    let (patch, status) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::remove("drop")]);
    assert!(!status.contains_key("drop"));

    let events = tracker.process_delta("x");
    let (patch, status) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::add("other", json!(3))]);
    assert!(!status.contains_key("drop"));
    assert_eq!(status.len(), 2);
}

#[test]
fn test_unchanged_done_key_is_not_patched_again() {
    let mut tracker = ComponentTracker::new("c1", "Card");

    let events = tracker.process_delta(r#"{"title":"hello","#);
    let (patch, _) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::add("title", json!("hello"))]);

    assert!(tracker.process_delta("  ").is_empty());

    let events = tracker.process_delta(r#""sub":"x""#);
    let (patch, status) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::add("sub", json!("x"))]);
    assert_eq!(status.get("title"), Some(&PropStatus::Done));
}

#[test]
fn test_growing_string_is_replaced_and_reported_done() {
    // The completeness heuristic cannot see that "he" is still streaming,
    // so the key is reported done from its first appearance.
    let mut tracker = ComponentTracker::new("c1", "Card");

    let events = tracker.process_delta(r#"{"title":"he"#);
    let (patch, status) = only_delta(&events[1..]);
    assert_eq!(patch, &[PatchOp::add("title", json!("he"))]);
    assert_eq!(status.get("title"), Some(&PropStatus::Done));

    let events = tracker.process_delta(r#"llo"#);
    let (patch, status) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::replace("title", json!("hello"))]);
    assert_eq!(status.get("title"), Some(&PropStatus::Done));
}

#[test]
fn test_nested_change_replaces_whole_property() {
    let mut tracker = ComponentTracker::new("c1", "Chart");
    tracker.process_delta(r#"{"series":[{"x":1}"#);

    let events = tracker.process_delta(r#",{"x":2}"#);
    let (patch, _) = only_delta(&events);
    assert_eq!(
        patch,
        &[PatchOp::replace("series", json!([{"x": 1}, {"x": 2}]))]
    );
    assert!(patch.iter().all(|op| op.path.matches('/').count() == 1));
}

#[test]
fn test_one_shot_and_char_by_char_agree() {
    let text = r#"{"title":"Weather in Paris","temp":21.5,"tags":["sunny","warm"],"details":{"humidity":40,"wind":null},"ok":true,"note":"naïve \"quoted\" é"}"#;

    let mut whole = ComponentTracker::new("w", "Weather");
    whole.process_delta(text);
    let whole_props = final_props(&whole.finalize());

    let mut pieces = ComponentTracker::new("p", "Weather");
    let mut buf = [0u8; 4];
    for c in text.chars() {
        pieces.process_delta(c.encode_utf8(&mut buf));
    }
    let piece_props = final_props(&pieces.finalize());

    assert_eq!(whole_props, piece_props);
    assert_eq!(Value::Object(whole_props), serde_json::from_str::<Value>(text).unwrap());
}

#[test]
fn test_parser_failure_waits_for_more_data() {
    let mut parser = MockPartialJsonParser::new();
    parser.expect_parse_partial().times(2).returning(|_| None);
    let mut tracker = ComponentTracker::with_parser("c1", "Card", Arc::new(parser));

    assert_eq!(kinds(&tracker.process_delta("{")), vec![EventKind::Start]);
    assert!(tracker.process_delta("\"").is_empty());
    assert_eq!(tracker.raw_text(), "{\"");
}

#[test]
fn test_non_object_value_waits_for_more_data() {
    let mut parser = MockPartialJsonParser::new();
    parser
        .expect_parse_partial()
        .returning(|_| Some(json!(["not", "props"])));
    let mut tracker = ComponentTracker::with_parser("c1", "Card", Arc::new(parser));

    assert_eq!(kinds(&tracker.process_delta("[")), vec![EventKind::Start]);
    assert!(tracker.props().is_empty());
}

#[test]
fn test_finalize_falls_back_to_last_snapshot() {
    let mut parser = MockPartialJsonParser::new();
    parser.expect_parse_partial().returning(|text| {
        if text.ends_with("!") {
            None
        } else {
            Some(json!({"a": 1}))
        }
    });
    let mut tracker = ComponentTracker::with_parser("c1", "Card", Arc::new(parser));

    tracker.process_delta("ok");
    tracker.process_delta("!");
    let events = tracker.finalize();

    assert_eq!(final_props(&events), object(json!({"a": 1})));
    assert!(tracker.is_finalized());
}

#[test]
fn test_finalize_marks_every_key_done() {
    let mut tracker = ComponentTracker::new("c1", "Card");
    tracker.process_delta(r#"{"a":"x","b":[1"#);
    assert_eq!(tracker.status().len(), 2);

    let events = tracker.finalize();
    assert_eq!(kinds(&events), vec![EventKind::End]);
    assert!(tracker.status().values().all(|s| *s == PropStatus::Done));
    assert_eq!(final_props(&events), object(json!({"a": "x", "b": [1]})));
    assert_eq!(tracker.props(), &object(json!({"a": "x", "b": [1]})));
}

#[test]
fn test_finalize_without_deltas() {
    let mut tracker = ComponentTracker::new("c1", "Empty");
    let events = tracker.finalize();
    assert_eq!(kinds(&events), vec![EventKind::Start, EventKind::End]);
    assert!(final_props(&events).is_empty());
    match &events[1] {
        ComponentEvent::End { final_state, .. } => assert!(final_state.is_none()),
        other => panic!("expected end, got {:?}", other),
    }
}

#[test]
fn test_nothing_after_finalize() {
    let mut tracker = ComponentTracker::new("c1", "Card");
    tracker.process_delta(r#"{"a":1}"#);
    assert_eq!(tracker.finalize().len(), 1);
    assert!(tracker.finalize().is_empty());
    assert!(tracker.process_delta(r#"{"b":2}"#).is_empty());
}

#[test]
fn test_interleaved_trackers_are_independent() {
    let mut a = ComponentTracker::new("a", "Left");
    let mut b = ComponentTracker::new("b", "Right");

    let script: [(&str, &str); 6] = [
        ("b", r#"{"y":"#),
        ("a", r#"{"x":1"#),
        ("b", "true"),
        ("a", r#","z":"q""#),
        ("b", "}"),
        ("a", "}"),
    ];
    for (id, text) in script {
        let tracker = if id == "a" { &mut a } else { &mut b };
        for event in tracker.process_delta(text) {
            assert_eq!(event.component_id(), id);
        }
    }

    assert_eq!(a.status().keys().collect::<Vec<_>>(), vec!["x", "z"]);
    assert_eq!(b.status().keys().collect::<Vec<_>>(), vec!["y"]);
    assert_eq!(final_props(&a.finalize()), object(json!({"x": 1, "z": "q"})));
    assert_eq!(final_props(&b.finalize()), object(json!({"y": true})));
}

#[test]
fn test_trackers_on_separate_threads() {
    let mut left = ComponentTracker::new("a", "Left");
    let mut right = ComponentTracker::new("b", "Right");

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for piece in [r#"{"n":"#, "1", ",", r#""m":2}"#] {
                left.process_delta(piece);
            }
        });
        scope.spawn(|| {
            for piece in [r#"{"s":"#, r#""hi"}"#] {
                right.process_delta(piece);
            }
        });
    });

    assert_eq!(left.props(), &object(json!({"n": 1, "m": 2})));
    assert_eq!(right.props(), &object(json!({"s": "hi"})));
}

// ==================== Diff ====================

#[test]
fn test_diff_streaming_key_settles_without_patch() {
    let previous = object(json!({"a": "x"}));
    let current = object(json!({"a": "x"}));
    let mut status = StatusMap::new();
    status.insert("a".to_string(), PropStatus::Streaming);

    assert!(diff_props(&previous, &current, &mut status).is_empty());
    assert_eq!(status.get("a"), Some(&PropStatus::Done));
}

#[test]
fn test_diff_replace_never_demotes_done() {
    let previous = object(json!({"a": 1}));
    let current = object(json!({"a": 2}));
    let mut status = StatusMap::new();
    status.insert("a".to_string(), PropStatus::Done);

    let patch = diff_props(&previous, &current, &mut status);
    assert_eq!(patch, vec![PatchOp::replace("a", json!(2))]);
    assert_eq!(status.get("a"), Some(&PropStatus::Done));
}

#[test]
fn test_diff_add_replace_remove_together() {
    let previous = object(json!({"keep": 1, "change": [1], "gone": "x"}));
    let current = object(json!({"keep": 1, "change": [1, 2], "new": {"k": null}}));
    let mut status = StatusMap::new();
    for key in ["keep", "change", "gone"] {
        status.insert(key.to_string(), PropStatus::Done);
    }

    let patch = diff_props(&previous, &current, &mut status);
    assert_eq!(
        patch,
        vec![
            PatchOp::replace("change", json!([1, 2])),
            PatchOp::add("new", json!({"k": null})),
            PatchOp::remove("gone"),
        ]
    );
    assert_eq!(status.keys().collect::<Vec<_>>(), vec!["change", "keep", "new"]);
}

#[test]
fn test_every_parsed_value_counts_as_complete() {
    assert!(is_complete(&json!("")));
    assert!(is_complete(&Value::Null));
    assert!(is_complete(&json!([])));
    assert!(is_complete(&json!({"a": [1, {"b": "partial"}]})));
}

#[test]
fn test_deep_equality_ignores_key_order() {
    let previous = object(serde_json::from_str(r#"{"o":{"a":1,"b":2}}"#).unwrap());
    let current = object(serde_json::from_str(r#"{"o":{"b":2,"a":1}}"#).unwrap());
    let mut status = StatusMap::new();
    assert!(diff_props(&previous, &current, &mut status).is_empty());
}

// ==================== Registry ====================

#[test]
fn test_registry_routes_envelopes_by_component_id() {
    let mut registry = TrackerRegistry::new();

    let events = registry
        .route(&json!({"componentId": "a", "componentName": "Card", "delta": "{\"t\":"}))
        .unwrap();
    assert_eq!(kinds(&events), vec![EventKind::Start]);

    let events = registry
        .route(&json!({"componentId": "b", "componentName": "Chart", "delta": "{\"n\":1}"}))
        .unwrap();
    assert_eq!(kinds(&events), vec![EventKind::Start, EventKind::PropsDelta]);

    let events = registry
        .route(&json!({"componentId": "a", "delta": "\"x\"}"}))
        .unwrap();
    let (patch, _) = only_delta(&events);
    assert_eq!(patch, &[PatchOp::add("t", json!("x"))]);
    assert_eq!(registry.active_ids(), vec!["a", "b"]);
    assert_eq!(registry.get("a").unwrap().component_name(), "Card");

    let events = registry.route(&json!({"componentId": "a", "done": true})).unwrap();
    assert_eq!(kinds(&events), vec![EventKind::End]);
    assert_eq!(final_props(&events), object(json!({"t": "x"})));
    assert_eq!(registry.active_ids(), vec!["b"]);
}

#[test]
fn test_registry_delta_and_done_in_one_envelope() {
    let mut registry = TrackerRegistry::new();
    let events = registry
        .route(&json!({"componentId": "z", "delta": "{\"k\":0}", "done": true}))
        .unwrap();
    assert_eq!(
        kinds(&events),
        vec![EventKind::Start, EventKind::PropsDelta, EventKind::End]
    );
    assert!(registry.is_empty());
}

#[test]
fn test_registry_done_for_unknown_component() {
    let mut registry = TrackerRegistry::new();
    let events = registry.route(&json!({"componentId": "ghost", "done": true})).unwrap();
    assert_eq!(kinds(&events), vec![EventKind::Start, EventKind::End]);
    match &events[0] {
        ComponentEvent::Start { component_name, .. } => {
            assert_eq!(component_name, UNKNOWN_COMPONENT_NAME)
        }
        other => panic!("expected start, got {:?}", other),
    }
}

#[test]
fn test_registry_rejects_malformed_envelopes() {
    let mut registry = TrackerRegistry::new();
    assert!(matches!(
        registry.route(&json!({"message": "hello"})),
        Err(StreamError::InvalidInput { .. })
    ));
    assert!(matches!(
        registry.route(&json!({"componentId": "a"})),
        Err(StreamError::InvalidInput { .. })
    ));
    assert!(matches!(
        registry.route(&json!(42)),
        Err(StreamError::InvalidInput { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_registry_finish_all_in_id_order() {
    let mut registry = TrackerRegistry::new();
    registry.process_delta("b", "B", "{\"x\":1}");
    registry.process_delta("a", "A", "{\"y\":2}");
    assert_eq!(registry.len(), 2);

    let events = registry.finish_all();
    let ids: Vec<&str> = events.iter().map(ComponentEvent::component_id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(events.iter().all(|e| e.kind() == EventKind::End));
    assert!(registry.is_empty());
    assert!(registry.finish("a").is_none());
}
