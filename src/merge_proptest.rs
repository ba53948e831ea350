//! Property-based tests for document merging and path mutation.
//!
//! These tests use proptest to generate random documents and verify that
//! the merge and path invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::yaml::{merge, merge_all};
    use crate::merge::{get_path, set_path, Document};
    use proptest::prelude::*;
    use serde_yaml::Value as YamlValue;

    fn leaf() -> impl Strategy<Value = YamlValue> {
        prop_oneof![
            Just(YamlValue::Null),
            any::<bool>().prop_map(YamlValue::from),
            any::<i64>().prop_map(YamlValue::from),
            "[a-z0-9 ]{0,8}".prop_map(YamlValue::from),
        ]
    }

    fn value() -> impl Strategy<Value = YamlValue> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(YamlValue::Sequence),
                prop::collection::btree_map("[a-c]", inner, 0..4).prop_map(|entries| {
                    YamlValue::Mapping(
                        entries
                            .into_iter()
                            .map(|(k, v)| (YamlValue::from(k), v))
                            .collect(),
                    )
                }),
            ]
        })
    }

    fn document() -> impl Strategy<Value = Document> {
        prop::collection::btree_map("[a-d]", value(), 0..5).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (YamlValue::from(k), v))
                .collect()
        })
    }

    fn dotted_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-c]", 1..4).prop_map(|segments| segments.join("."))
    }

    // ============================================================================
    // merge property tests
    // ============================================================================

    proptest! {
        /// Property: merging a document with itself yields the document
        #[test]
        fn merge_is_idempotent(doc in document()) {
            prop_assert_eq!(merge(&doc, &doc), doc);
        }

        /// Property: the empty document is a left and right identity
        #[test]
        fn merge_empty_is_identity(doc in document()) {
            prop_assert_eq!(merge(&Document::new(), &doc), doc.clone());
            prop_assert_eq!(merge(&doc, &Document::new()), doc);
        }

        /// Property: every top-level non-mapping value of the overlay wins
        #[test]
        fn merge_overlay_leaf_wins(base in document(), overlay in document()) {
            let merged = merge(&base, &overlay);
            for (key, value) in &overlay {
                if !value.is_mapping() {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
        }

        /// Property: keys only in the base survive unchanged
        #[test]
        fn merge_keeps_base_only_keys(base in document(), overlay in document()) {
            let merged = merge(&base, &overlay);
            for (key, value) in &base {
                if !overlay.contains_key(key) {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
        }

        /// Property: merge_all folds merge from the left
        #[test]
        fn merge_all_folds_left(a in document(), b in document(), c in document()) {
            let folded = merge(&merge(&a, &b), &c);
            prop_assert_eq!(merge_all([&a, &b, &c]), folded);
        }
    }

    // ============================================================================
    // set_path property tests
    // ============================================================================

    proptest! {
        /// Property: a value written at a path can be read back from it
        #[test]
        fn set_path_then_get_path(mut doc in document(), path in dotted_path(), v in leaf()) {
            set_path(&mut doc, &path, v.clone()).unwrap();
            prop_assert_eq!(get_path(&doc, &path), Some(&v));
        }

        /// Property: setting a path leaves other top-level keys untouched
        #[test]
        fn set_path_preserves_other_keys(mut doc in document(), path in dotted_path(), v in leaf()) {
            let original = doc.clone();
            set_path(&mut doc, &path, v).unwrap();
            let first = path.split('.').next().unwrap();
            for (key, value) in &original {
                if key.as_str() != Some(first) {
                    prop_assert_eq!(doc.get(key), Some(value));
                }
            }
        }
    }
}
