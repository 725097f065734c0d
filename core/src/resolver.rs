//! Resolution of free-form keyboard identifiers.
//!
//! Identifiers reach the controller in three shapes: verbatim legacy ids,
//! `layout|locale` (written by some applications while a temporary fix was in
//! place) and the older dash-joined `layout-locale`. The strategies are tried
//! in a fixed order and the first hit wins.

use crate::definition::{KeyboardDefinition, ZERO_KEYBOARD};
use crate::registry::KeyboardRegistry;
use tracing::trace;

/// Resolve `identifier` against `registry`.
///
/// Returns the registered definition, or [`KeyboardDefinition::ZERO`] when
/// nothing matches.
pub fn resolve<'a>(registry: &'a KeyboardRegistry, identifier: &str) -> &'a KeyboardDefinition {
    if identifier.is_empty() {
        return &ZERO_KEYBOARD;
    }

    if registry.contains_legacy_id(identifier) {
        if let Some(kb) = registry.lookup_by_legacy_id(identifier) {
            trace!(identifier, "resolved by legacy id");
            return kb;
        }
    }

    let parts: Vec<&str> = identifier.split('|').collect();
    if parts.len() == 2 {
        trace!(identifier, "resolving pipe-delimited id");
        return lookup_composite(registry, parts[0], parts[1]);
    }

    for (layout, locale) in dash_splits(identifier) {
        let kb = lookup_composite(registry, &layout, &locale);
        if !kb.is_zero() {
            trace!(identifier, layout = %layout, "resolved dash-delimited id");
            return kb;
        }
    }

    &ZERO_KEYBOARD
}

/// Every `(layout, locale)` split of a dash-joined id, shortest layout first,
/// so that locale subtags such as "en-GB" are not swallowed into the layout.
fn dash_splits(identifier: &str) -> impl Iterator<Item = (String, String)> + '_ {
    let segments: Vec<&str> = identifier.split('-').collect();
    (1..segments.len()).map(move |i| (segments[..i].join("-"), segments[i..].join("-")))
}

/// Direct composite lookup; both parts empty resolves to the zero sentinel.
pub fn lookup_composite<'a>(
    registry: &'a KeyboardRegistry,
    layout: &str,
    locale: &str,
) -> &'a KeyboardDefinition {
    if layout.is_empty() && locale.is_empty() {
        return &ZERO_KEYBOARD;
    }
    registry.lookup(layout, locale).unwrap_or(&ZERO_KEYBOARD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AdaptorId, Category};

    fn kb(layout: &str, locale: &str) -> KeyboardDefinition {
        KeyboardDefinition::new(layout, locale, Category::Primary, AdaptorId("test"))
    }

    fn registry(entries: &[(&str, &str)]) -> KeyboardRegistry {
        let mut reg = KeyboardRegistry::new();
        for (layout, locale) in entries {
            reg.add(kb(layout, locale));
        }
        reg
    }

    #[test]
    fn test_empty_identifier_is_zero() {
        let reg = registry(&[("us", "en-US")]);
        assert!(resolve(&reg, "").is_zero());
    }

    #[test]
    fn test_verbatim_legacy_id() {
        let reg = registry(&[("pinyin", "")]);
        assert_eq!(resolve(&reg, "pinyin"), &kb("pinyin", ""));
    }

    #[test]
    fn test_pipe_form_always_decomposes() {
        let reg = registry(&[("A", "B")]);
        assert_eq!(resolve(&reg, "A|B"), &kb("A", "B"));
        // Two pipes is not the pipe form; dash splitting has nothing to try.
        assert!(resolve(&reg, "A|B|C").is_zero());
    }

    #[test]
    fn test_pipe_form_does_not_fall_through_to_dash_splitting() {
        let reg = registry(&[("us", "en-US")]);
        assert!(resolve(&reg, "us-en|US").is_zero());
    }

    #[test]
    fn test_dash_split_at_first_segment() {
        let reg = registry(&[("us", "en-US")]);
        assert_eq!(resolve(&reg, "us-en-US"), &kb("us", "en-US"));
    }

    #[test]
    fn test_dash_split_shortest_prefix_first() {
        let reg = registry(&[("en", "GB")]);
        assert_eq!(resolve(&reg, "en-GB"), &kb("en", "GB"));

        // "en-GB-US": i=1 tries ("en", "GB-US") and misses, i=2 finds ("en-GB", "US").
        let reg = registry(&[("en", "GB"), ("en-GB", "US")]);
        assert_eq!(resolve(&reg, "en-GB-US"), &kb("en-GB", "US"));
    }

    #[test]
    fn test_dash_split_order() {
        let splits: Vec<_> = dash_splits("a-b-c-d").collect();
        assert_eq!(
            splits,
            vec![
                ("a".to_string(), "b-c-d".to_string()),
                ("a-b".to_string(), "c-d".to_string()),
                ("a-b-c".to_string(), "d".to_string()),
            ]
        );
        assert_eq!(dash_splits("nodash").count(), 0);
    }

    #[test]
    fn test_unresolvable_is_zero() {
        let reg = registry(&[("us", "en-US")]);
        assert!(resolve(&reg, "de-DE").is_zero());
        assert!(resolve(&reg, "nodash").is_zero());
    }

    #[test]
    fn test_lookup_composite() {
        let reg = registry(&[("us", "en-US")]);
        assert_eq!(lookup_composite(&reg, "us", "en-US"), &kb("us", "en-US"));
        assert!(lookup_composite(&reg, "", "").is_zero());
        assert!(lookup_composite(&reg, "us", "").is_zero());
    }
}
