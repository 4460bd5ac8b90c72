//! Integration tests for persistent collections
//!
//! Tests ordering, uniqueness, and equality semantics of the tagmarsh collections.

use tagmarsh_foundation::{Pair, TmCollection, TmMap, TmRecord, TmSet, TmVec, Value};

// =============================================================================
// TmVec
// =============================================================================

#[test]
fn vec_push_is_persistent() {
    let empty: TmVec<i64> = TmVec::new();
    let one = empty.push_back(1);
    let two = one.push_back(2);

    assert!(empty.is_empty());
    assert_eq!(one.len(), 1);
    assert_eq!(two.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn vec_update_out_of_range() {
    let v: TmVec<i64> = [1, 2, 3].into_iter().collect();
    assert_eq!(v.update(1, 9).and_then(|u| u.get(1).copied()), Some(9));
    assert!(v.update(3, 9).is_none());
}

// =============================================================================
// TmSet
// =============================================================================

#[test]
fn set_keeps_first_insertion_position() {
    let set = TmSet::new().insert("b").insert("a").insert("b");
    assert_eq!(set.len(), 2);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
}

#[test]
fn set_equality_ignores_order() {
    let ab: TmSet<i64> = [1, 2].into_iter().collect();
    let ba: TmSet<i64> = [2, 1].into_iter().collect();
    assert_eq!(ab, ba);
}

// =============================================================================
// TmMap
// =============================================================================

#[test]
fn map_preserves_insertion_order() {
    let map = TmMap::new().insert("z", 1).insert("a", 2).insert("m", 3);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["z", "a", "m"]);
}

#[test]
fn map_replace_keeps_position() {
    let map = TmMap::new().insert("z", 1).insert("a", 2).insert("z", 9);
    assert_eq!(
        map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        vec![("z", 9), ("a", 2)]
    );
}

#[test]
fn map_with_pair_key() {
    let map = TmMap::new().insert(Value::Pair(Pair::new(1, 2)), Value::from("x"));
    assert_eq!(map.get(&Value::Pair(Pair::new(1, 2))), Some(&Value::from("x")));
    assert!(!map.contains_key(&Value::Pair(Pair::new(2, 1))));
}

// =============================================================================
// TmCollection
// =============================================================================

#[test]
fn collection_counts_duplicates() {
    let bag = TmCollection::new().add(1).add(1).add(2);
    assert_eq!(bag.len(), 3);
    assert_eq!(bag.count(&1), 2);
    assert!(bag.contains(&2));
}

#[test]
fn collection_equality_is_multiset() {
    let a: TmCollection<i64> = [1, 1, 2].into_iter().collect();
    let b: TmCollection<i64> = [2, 1, 1].into_iter().collect();
    let c: TmCollection<i64> = [1, 2, 2].into_iter().collect();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// =============================================================================
// TmRecord
// =============================================================================

#[test]
fn record_lookup_by_str() {
    let record: TmRecord<i64> = [("b", 2), ("a", 1)].into_iter().collect();
    assert_eq!(record.get("a"), Some(&1));
    assert!(record.contains_key("b"));
}
