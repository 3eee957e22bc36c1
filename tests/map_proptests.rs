// HashMap property tests.
//
// Drives a map through random operation sequences and checks every
// observation against std::collections::HashMap as the model. Key ranges
// are dense enough that insert-heavy sequences cross the growth
// threshold, and clear resets the table mid-sequence.

use proptest::prelude::*;
use rht::HashMap;

use std::collections::HashMap as StdHashMap;

proptest! {
    #[test]
    fn matches_std_hash_map(
        ops in proptest::collection::vec((0u8..=6u8, 0u8..32u8, 0i32..1000i32), 1..200)
    ) {
        let map: HashMap<u8, i32> = HashMap::new();
        let mut model: StdHashMap<u8, i32> = StdHashMap::new();

        for (op, key, value) in ops {
            match op {
                0 => prop_assert_eq!(map.insert(key, value), model.insert(key, value)),
                1 => prop_assert_eq!(map.remove(&key), model.remove(&key)),
                2 => prop_assert_eq!(map.get(&key), model.get(&key).copied()),
                3 => prop_assert_eq!(map.get_and(&key, |v| *v), model.get(&key).copied()),
                4 => {
                    prop_assert_eq!(map.contains_key(&key), model.contains_key(&key));
                    prop_assert_eq!(map.contains_key(&key), map.get(&key).is_some());
                }
                5 => prop_assert_eq!(
                    map.contains_value(&value),
                    model.values().any(|&v| v == value)
                ),
                6 => {
                    map.clear();
                    model.clear();
                }
                _ => unreachable!(),
            }

            // len and emptiness must agree after every step
            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.is_empty(), model.is_empty());
        }
    }
}

// Exercises owned keys looked up through their borrowed form.
proptest! {
    #[test]
    fn string_keys_match_std_hash_map(
        ops in proptest::collection::vec((0u8..=2u8, 0u8..16u8), 1..100)
    ) {
        let map: HashMap<String, u8> = HashMap::new();
        let mut model: StdHashMap<String, u8> = StdHashMap::new();

        for (op, k) in ops {
            let key = format!("key-{}", k);

            match op {
                0 => prop_assert_eq!(map.insert(key.clone(), k), model.insert(key.clone(), k)),
                1 => prop_assert_eq!(map.remove(key.as_str()), model.remove(&key)),
                2 => prop_assert_eq!(map.get(key.as_str()), model.get(&key).copied()),
                _ => unreachable!(),
            }

            prop_assert_eq!(map.len(), model.len());
        }
    }
}
