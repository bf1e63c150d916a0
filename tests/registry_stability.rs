use proptest::prelude::*;
use std::collections::BTreeMap;
use taghue::TagRegistry;
use taghue::model::tag::parse_all;

fn ensure(registry: &mut TagRegistry, raw: &[String]) -> bool {
    let tags = parse_all(raw);
    registry.ensure(&tags)
}

#[test]
fn test_late_sibling_never_reuses_slots() {
    // 1. Introduce three siblings together
    let mut registry = TagRegistry::new();
    let first: Vec<String> = ["a/b", "a/c", "a/d"].iter().map(|s| s.to_string()).collect();
    assert!(ensure(&mut registry, &first));

    let under_a: Vec<u32> = ["a/b", "a/c", "a/d"]
        .iter()
        .map(|p| registry.get(p).unwrap())
        .collect();
    assert_eq!(under_a, vec![1, 2, 3]);

    // 2. A later sibling continues the numbering
    assert!(ensure(&mut registry, &["a/e".to_string()]));
    assert_eq!(registry.get("a/e"), Some(4));

    // 3. Re-adding everything changes nothing
    let mut all = first.clone();
    all.push("a/e".to_string());
    assert!(!ensure(&mut registry, &all));
}

#[test]
fn test_registry_round_trips_through_json() {
    let mut registry = TagRegistry::new();
    ensure(
        &mut registry,
        &["work/docs".to_string(), "home".to_string()],
    );
    let json = serde_json::to_string(&registry).unwrap();
    let back: TagRegistry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, registry);

    let as_map: BTreeMap<String, u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(as_map.get("work/docs"), Some(&1));
}

fn tag_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-d]", 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #[test]
    fn prop_slots_are_stable_across_batches(
        batches in prop::collection::vec(prop::collection::vec(tag_strategy(), 0..8), 1..6)
    ) {
        let mut registry = TagRegistry::new();
        for batch in &batches {
            let before = registry.slots().clone();
            ensure(&mut registry, batch);

            // Nothing assigned earlier moved
            for (path, slot) in &before {
                prop_assert_eq!(registry.get(path), Some(*slot));
            }
            // Every tag and ancestor has a positive slot
            for tag in parse_all(batch) {
                for prefix in tag.prefixes() {
                    prop_assert!(registry.get(prefix).unwrap_or(0) >= 1);
                }
            }
            // Second pass is a no-op
            prop_assert!(!ensure(&mut registry, batch));
        }
    }
}
