//! Flow-level localization map assembly.
//!
//! Each node contributes a small map of `language -> (element uuid ->
//! translation)` for its localizable text; the serializer unions the
//! contributions of every discovered node into the flow's localization
//! block. `BTreeMap` keeps emitted JSON deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The translation payload attached to one localizable element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: Vec<String>,
}

impl Translation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: vec![text.into()],
        }
    }
}

/// `language -> (localizable element uuid -> translation)`.
pub type LocalizationMap = BTreeMap<String, BTreeMap<Uuid, Translation>>;

/// Unions `src` into `dst`, merging per-language buckets rather than
/// replacing them. Leaf keys are node-scoped element uuids, so two nodes
/// can never contribute the same leaf.
pub fn merge_into(dst: &mut LocalizationMap, src: LocalizationMap) {
    for (language, entries) in src {
        dst.entry(language).or_default().extend(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u128, text: &str) -> (Uuid, Translation) {
        (Uuid::from_u128(id), Translation::new(text))
    }

    #[test]
    fn test_merge_disjoint_languages() {
        let mut dst = LocalizationMap::from([("som".to_string(), BTreeMap::from([entry(1, "a")]))]);
        let src = LocalizationMap::from([("swa".to_string(), BTreeMap::from([entry(2, "b")]))]);

        merge_into(&mut dst, src);

        assert_eq!(dst.len(), 2);
        assert_eq!(dst["som"][&Uuid::from_u128(1)], Translation::new("a"));
        assert_eq!(dst["swa"][&Uuid::from_u128(2)], Translation::new("b"));
    }

    #[test]
    fn test_merge_unions_entries_within_a_language() {
        let mut dst = LocalizationMap::from([("som".to_string(), BTreeMap::from([entry(1, "a")]))]);
        let src = LocalizationMap::from([("som".to_string(), BTreeMap::from([entry(2, "b")]))]);

        merge_into(&mut dst, src);

        assert_eq!(dst.len(), 1);
        assert_eq!(dst["som"].len(), 2);
    }

    #[test]
    fn test_merge_empty_source_is_a_no_op() {
        let mut dst = LocalizationMap::from([("som".to_string(), BTreeMap::from([entry(1, "a")]))]);
        merge_into(&mut dst, LocalizationMap::new());
        assert_eq!(dst["som"].len(), 1);
    }
}
