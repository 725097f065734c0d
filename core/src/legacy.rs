//! Keyboards stored in obsolete writing-system fields.
//!
//! Old writing-system records name their keyboard either by a Windows locale
//! identifier, by a free-text keyboard name, or by both. The heuristics below
//! map those onto a registered keyboard. Falling back to the default keyboard
//! is left to the caller so that a silent default is never mistaken for a
//! match.

use crate::definition::{Category, KeyboardDefinition};
use crate::lcid::locale_for_lcid;
use crate::registry::KeyboardRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Read-only view of a writing system, plus the keyboard back-reference the
/// controller fills in.
pub trait WritingSystem {
    /// BCP 47 language tag.
    fn language_tag(&self) -> &str;

    /// Obsolete numeric OS locale identifier, as stored.
    fn windows_lcid(&self) -> Option<&str> {
        None
    }

    /// Obsolete free-text keyboard name.
    fn legacy_keyboard(&self) -> Option<&str> {
        None
    }

    fn local_keyboard(&self) -> Option<&KeyboardDefinition>;

    fn set_local_keyboard(&mut self, keyboard: KeyboardDefinition);
}

/// Plain writing-system record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WritingSystemDefinition {
    pub language_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_lcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<String>,
    #[serde(skip)]
    pub local_keyboard: Option<KeyboardDefinition>,
}

impl WritingSystemDefinition {
    pub fn new(language_tag: impl Into<String>) -> Self {
        Self {
            language_tag: language_tag.into(),
            ..Default::default()
        }
    }

    pub fn with_windows_lcid(mut self, lcid: impl Into<String>) -> Self {
        self.windows_lcid = Some(lcid.into());
        self
    }

    pub fn with_keyboard(mut self, keyboard: impl Into<String>) -> Self {
        self.keyboard = Some(keyboard.into());
        self
    }
}

impl WritingSystem for WritingSystemDefinition {
    fn language_tag(&self) -> &str {
        &self.language_tag
    }

    fn windows_lcid(&self) -> Option<&str> {
        self.windows_lcid.as_deref()
    }

    fn legacy_keyboard(&self) -> Option<&str> {
        self.keyboard.as_deref()
    }

    fn local_keyboard(&self) -> Option<&KeyboardDefinition> {
        self.local_keyboard.as_ref()
    }

    fn set_local_keyboard(&mut self, keyboard: KeyboardDefinition) {
        self.local_keyboard = Some(keyboard);
    }
}

/// Find the keyboard named by the legacy fields of `ws`, if any.
pub fn resolve_legacy<'a, W>(registry: &'a KeyboardRegistry, ws: &W) -> Option<&'a KeyboardDefinition>
where
    W: WritingSystem + ?Sized,
{
    let keyboard_name = ws.legacy_keyboard().filter(|s| !s.is_empty());

    if let Some(lcid) = ws.windows_lcid().filter(|s| !s.is_empty()).and_then(parse_lcid) {
        if let Some(kb) = resolve_by_lcid(registry, lcid, keyboard_name) {
            debug!(lcid, keyboard = %kb, "legacy keyboard resolved by locale identifier");
            return Some(kb);
        }
    }

    let name = keyboard_name?;

    if registry.contains_legacy_id(name) {
        if let Some(kb) = registry.lookup_by_legacy_id(name) {
            return Some(kb);
        }
    }

    let layout = layout_name(name);
    let locale = locale_name(name);
    if let Some(kb) = registry.lookup(&layout, &locale) {
        return Some(kb);
    }

    registry
        .find(|kb| kb.layout() == name)
        .or_else(|| registry.find(|kb| kb.layout() == layout))
}

fn resolve_by_lcid<'a>(
    registry: &'a KeyboardRegistry,
    lcid: u32,
    keyboard_name: Option<&str>,
) -> Option<&'a KeyboardDefinition> {
    match keyboard_name {
        // The first primary keyboard for the locale wins, even if several
        // share it.
        None => registry.find(|kb| kb.category() == Some(Category::Primary) && kb.lcid() == Some(lcid)),
        Some(name) => {
            let locale = locale_for_lcid(lcid)?;
            registry.lookup(name, locale)
        }
    }
}

/// Parse a stored LCID. Anything that is not a non-negative 32-bit integer is
/// ignored.
pub fn parse_lcid(value: &str) -> Option<u32> {
    value.trim().parse::<i32>().ok().and_then(|v| u32::try_from(v).ok())
}

/// Locale part of a dash-joined keyboard name.
///
/// One segment has no locale; two or three segments use everything after
/// the first; longer names use the last two segments, because layout names
/// themselves may contain dashes.
pub fn locale_name(name: &str) -> String {
    let split: Vec<&str> = name.split('-').collect();
    match split.len() {
        0 | 1 => String::new(),
        2 | 3 => split[1..].join("-"),
        n => split[n - 2..].join("-"),
    }
}

/// Layout part of a dash-joined keyboard name: the name minus its locale
/// suffix.
pub fn layout_name(name: &str) -> String {
    let locale = locale_name(name);
    if locale.is_empty() {
        return name.to_string();
    }
    name[..name.len() - (locale.len() + 1)].to_string()
}
