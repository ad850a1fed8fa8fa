// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId;
}

#[test]
fn define_id_display_and_as_str() {
    let id = TestId::new("hello");
    assert_eq!(id.as_str(), "hello");
    assert_eq!(id.to_string(), "hello");
}

#[test]
fn define_id_compares_with_str() {
    let id: TestId = "abc".into();
    assert_eq!(id, "abc");
    assert_eq!(id, *"abc");
}

#[test]
fn define_id_hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(TestId::new("k"), 42);
    assert_eq!(map.get("k"), Some(&42));
}

#[test]
fn define_id_serializes_as_bare_string() {
    let id = TestId::new("j-1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"j-1\"");
    let back: TestId = serde_json::from_str("\"j-2\"").unwrap();
    assert_eq!(back, "j-2");
}

#[test]
fn define_id_from_owned_and_borrowed() {
    let owned: TestId = String::from("j-3").into();
    let borrowed: TestId = "j-3".into();
    assert_eq!(owned, borrowed);
}
