//! End-to-end usage scenarios through the public API.

use nexus_skiplist::{Config, Error, SkipMap};

fn make_map<V>() -> SkipMap<u64, V> {
    SkipMap::with_seed(12345)
}

#[test]
fn enumerates_in_key_order() {
    let mut map = make_map();
    for key in [5, 3, 8, 1] {
        map.set(key, key.to_string());
    }

    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, vec![1, 3, 5, 8]);

    let entries: Vec<_> = map.iter().map(|(k, v)| (*k, v.as_str())).collect();
    assert_eq!(entries, vec![(1, "1"), (3, "3"), (5, "5"), (8, "8")]);
}

#[test]
fn update_does_not_duplicate() {
    let mut map = make_map();
    map.set(1, "a");
    map.set(1, "b");

    assert_eq!(map.get(&1), Some(&"b"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.iter().count(), 1);
}

#[test]
fn remove_evens() {
    let mut map = make_map();
    for key in 1..=100 {
        map.set(key, key * key);
    }
    for key in (2..=100).step_by(2) {
        assert_eq!(map.remove(&key), Some(key * key));
    }

    let keys: Vec<_> = map.keys().copied().collect();
    let odds: Vec<_> = (1..100).step_by(2).collect();
    assert_eq!(keys, odds);
    assert_eq!(map.len(), 50);
    assert_eq!(map.check_invariants(), Ok(()));
}

#[test]
fn lookup_on_empty() {
    let map: SkipMap<u64, String> = make_map();

    assert_eq!(map.get(&7), None);
    assert_eq!(map.get_or_default(&7), String::new());
    assert_eq!(map.try_get(&7), Err(Error::KeyNotFound));
    assert!(!map.contains_key(&7));
}

#[test]
fn clear_after_inserts() {
    let mut map = make_map();
    for key in 0..1000 {
        map.set(key, key);
    }

    map.clear();

    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.iter().next(), None);
    assert_eq!(map.height(), 1);
    assert_eq!(map.check_invariants(), Ok(()));
}

#[test]
fn head_tower_never_shrinks() {
    let mut map = make_map();
    for key in 0..512 {
        map.set(key, key);
    }
    let height = map.height();

    for key in 0..512 {
        map.remove(&key);
    }

    assert!(map.is_empty());
    assert_eq!(map.height(), height);
    assert_eq!(map.to_debug_string().lines().count(), height);
    assert!(map.to_debug_string().lines().all(|line| line == "(front)->nil"));
}

#[test]
fn debug_string_without_promotion() {
    let mut map: SkipMap<u64, &str> = SkipMap::builder().max_level(0).seed(9).build().unwrap();
    map.set(2, "two");
    map.set(1, "one");
    map.set(3, "three");

    assert_eq!(
        map.to_debug_string(),
        "(front)->(1,one)->(2,two)->(3,three)->nil\n"
    );
    assert_eq!(map.levels().to_string(), map.to_debug_string());
}

#[test]
fn every_level_is_a_sorted_subset_of_the_one_below() {
    let mut map = make_map();
    for key in (0..300).rev() {
        map.set(key, key);
    }

    let rendered = map.to_debug_string();
    let levels: Vec<Vec<&str>> = rendered
        .lines()
        .map(|line| {
            line.trim_start_matches("(front)->")
                .trim_end_matches("nil")
                .split("->")
                .filter(|s| !s.is_empty())
                .collect()
        })
        .collect();

    assert_eq!(levels[0].len(), 300);
    for pair in levels.windows(2) {
        let (below, above) = (&pair[0], &pair[1]);
        assert!(above.len() <= below.len());
        assert!(above.iter().all(|node| below.contains(node)));
    }
}

#[test]
fn builder_rejects_cap_above_limit() {
    let result = SkipMap::<u64, u64>::builder().max_level(33).build();
    assert!(matches!(result, Err(Error::InvalidArgument(_))));

    let config = Config {
        max_level: 33,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn string_keys_with_borrowed_lookup() {
    let mut map: SkipMap<String, usize> = SkipMap::with_seed(3);
    for word in ["pear", "apple", "fig", "banana"] {
        map.set(word.to_string(), word.len());
    }

    assert_eq!(map["fig"], 3);
    assert_eq!(map.first(), Some((&"apple".to_string(), &5)));
    assert_eq!(map.last(), Some((&"pear".to_string(), &4)));
    assert_eq!(map.remove("banana"), Some(6));
    assert_eq!(
        map.into_iter().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["apple", "fig", "pear"]
    );
}

#[test]
fn values_survive_until_removed() {
    use std::rc::Rc;

    let tracked = Rc::new(());
    let mut map = make_map();
    for key in 0..100 {
        map.set(key, Rc::clone(&tracked));
    }
    assert_eq!(Rc::strong_count(&tracked), 101);

    for key in 0..50 {
        map.remove(&key);
    }
    assert_eq!(Rc::strong_count(&tracked), 51);

    drop(map);
    assert_eq!(Rc::strong_count(&tracked), 1);
}
