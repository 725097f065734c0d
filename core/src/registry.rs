//! Indexed collection of keyboard definitions.
//!
//! The registry is the single place definitions live. It has two access
//! paths: the canonical composite key `(layout, locale)` and the legacy string
//! id kept for resolving old configuration. Entries are kept in insertion
//! order, which is the adaptors' enumeration order.

use crate::definition::KeyboardDefinition;
use crate::utils::nfc;
use ahash::AHashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct KeyboardRegistry {
    entries: Vec<KeyboardDefinition>,
    by_key: AHashMap<(String, String), usize>,
    by_legacy_id: AHashMap<String, usize>,
}

impl KeyboardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition.
    ///
    /// Returns `false` (and leaves the registry untouched) when an entry with
    /// the same composite key already exists or `keyboard` is the zero
    /// sentinel.
    pub fn add(&mut self, keyboard: KeyboardDefinition) -> bool {
        if keyboard.is_zero() {
            return false;
        }
        let key = composite_key(keyboard.layout(), keyboard.locale());
        if self.by_key.contains_key(&key) {
            debug!(layout = keyboard.layout(), locale = keyboard.locale(), "duplicate keyboard ignored");
            return false;
        }
        let index = self.entries.len();
        // Two composite keys can share a legacy id ("a-b" + "c" vs "a" + "b-c");
        // the first one registered keeps it.
        self.by_legacy_id.entry(nfc(&keyboard.legacy_id())).or_insert(index);
        self.by_key.insert(key, index);
        self.entries.push(keyboard);
        true
    }

    /// Add every definition from `keyboards`, returning how many were new.
    pub fn extend<I: IntoIterator<Item = KeyboardDefinition>>(&mut self, keyboards: I) -> usize {
        keyboards.into_iter().filter_map(|kb| self.add(kb).then_some(())).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_key.clear();
        self.by_legacy_id.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact composite lookup.
    pub fn lookup(&self, layout: &str, locale: &str) -> Option<&KeyboardDefinition> {
        self.by_key
            .get(&composite_key(layout, locale))
            .map(|&i| &self.entries[i])
    }

    pub fn contains(&self, layout: &str, locale: &str) -> bool {
        self.by_key.contains_key(&composite_key(layout, locale))
    }

    /// Lookup by a legacy string id.
    ///
    /// Known legacy ids match verbatim; otherwise a `layout|locale` value is
    /// decomposed into its composite key.
    pub fn lookup_by_legacy_id(&self, id: &str) -> Option<&KeyboardDefinition> {
        if let Some(&i) = self.by_legacy_id.get(&nfc(id)) {
            return Some(&self.entries[i]);
        }
        let mut parts = id.split('|');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(layout), Some(locale), None) => self.lookup(layout, locale),
            _ => None,
        }
    }

    /// Membership test against the verbatim legacy ids only.
    pub fn contains_legacy_id(&self, id: &str) -> bool {
        self.by_legacy_id.contains_key(&nfc(id))
    }

    /// All definitions, available or not, in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyboardDefinition> {
        self.entries.iter()
    }

    /// Definitions that can currently be used.
    pub fn available(&self) -> impl Iterator<Item = &KeyboardDefinition> {
        self.entries.iter().filter(|kb| kb.is_available())
    }

    /// First definition (in enumeration order) matching `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<&KeyboardDefinition>
    where
        P: FnMut(&KeyboardDefinition) -> bool,
    {
        self.entries.iter().find(|kb| predicate(kb))
    }

    /// Update the availability flag of a registered keyboard.
    pub fn set_available(&mut self, layout: &str, locale: &str, available: bool) -> bool {
        match self.by_key.get(&composite_key(layout, locale)) {
            Some(&i) => {
                self.entries[i].set_available(available);
                true
            }
            None => false,
        }
    }
}

fn composite_key(layout: &str, locale: &str) -> (String, String) {
    (nfc(layout), nfc(locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AdaptorId, Category};

    fn kb(layout: &str, locale: &str) -> KeyboardDefinition {
        KeyboardDefinition::new(layout, locale, Category::Primary, AdaptorId("test"))
    }

    #[test]
    fn test_add_rejects_duplicate_composite_key() {
        let mut reg = KeyboardRegistry::new();
        assert!(reg.add(kb("us", "en-US").with_name("first")));
        assert!(!reg.add(kb("us", "en-US").with_name("second")));
        assert!(reg.add(kb("us", "en-GB")));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.lookup("us", "en-US").unwrap().name(), "first");
    }

    #[test]
    fn test_zero_is_never_registered() {
        let mut reg = KeyboardRegistry::new();
        assert!(!reg.add(KeyboardDefinition::ZERO));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_lookup_by_legacy_id() {
        let mut reg = KeyboardRegistry::new();
        reg.add(kb("us", "en-US"));
        reg.add(kb("pinyin", ""));
        assert_eq!(reg.lookup_by_legacy_id("us-en-US"), Some(&kb("us", "en-US")));
        assert_eq!(reg.lookup_by_legacy_id("us|en-US"), Some(&kb("us", "en-US")));
        assert_eq!(reg.lookup_by_legacy_id("pinyin"), Some(&kb("pinyin", "")));
        assert!(reg.lookup_by_legacy_id("us|en|US").is_none());
        assert!(reg.contains_legacy_id("us-en-US"));
        assert!(!reg.contains_legacy_id("us|en-US"));
    }

    #[test]
    fn test_keys_are_normalized() {
        let mut reg = KeyboardRegistry::new();
        // precomposed "ç" vs. "c" + combining cedilla
        reg.add(kb("fran\u{e7}ais", "fr-FR"));
        assert!(!reg.add(kb("franc\u{327}ais", "fr-FR")));
        assert!(reg.contains("franc\u{327}ais", "fr-FR"));
    }

    #[test]
    fn test_available_filters_unavailable() {
        let mut reg = KeyboardRegistry::new();
        reg.add(kb("us", "en-US"));
        reg.add(kb("de", "de-DE").with_available(false));
        let names: Vec<_> = reg.available().map(|k| k.layout().to_string()).collect();
        assert_eq!(names, vec!["us"]);
        assert_eq!(reg.iter().count(), 2);

        assert!(reg.set_available("de", "de-DE", true));
        assert_eq!(reg.available().count(), 2);
        assert!(!reg.set_available("fr", "fr-FR", true));
    }

    #[test]
    fn test_clear() {
        let mut reg = KeyboardRegistry::new();
        reg.add(kb("us", "en-US"));
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.lookup("us", "en-US").is_none());
        assert!(!reg.contains_legacy_id("us-en-US"));
    }
}
