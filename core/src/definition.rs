//! Keyboard definitions.
//!
//! A `KeyboardDefinition` describes one selectable keyboard: a layout paired
//! with a locale, as reported by the adaptor that enumerated it. Identity is
//! the composite key `(layout, locale)`; every other field is descriptive.
//!
//! The zero sentinel (`KeyboardDefinition::ZERO`) stands for "no keyboard" so
//! that lookups and the controller's active keyboard never need `Option`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Capability category served by an adaptor.
///
/// The set is closed: the controller matches on it exhaustively and never
/// inspects which concrete adaptor it is talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Native system keyboard layouts; owns the system default keyboard.
    Primary,
    /// Additional input-method engines layered on top of the primary subsystem.
    Secondary,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Primary, Category::Secondary];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Primary => f.write_str("primary"),
            Category::Secondary => f.write_str("secondary"),
        }
    }
}

/// Short static name of the adaptor that produced a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AdaptorId(pub &'static str);

impl AdaptorId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for AdaptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The host's description of the language a primary keyboard belongs to.
///
/// `lcid` is the numeric OS locale identifier; legacy writing-system records
/// refer to keyboards by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputLanguage {
    pub locale: String,
    pub layout_name: String,
    pub lcid: Option<u32>,
}

impl InputLanguage {
    pub fn new(locale: impl Into<String>, layout_name: impl Into<String>) -> Self {
        let locale = locale.into();
        let lcid = crate::lcid::lcid_for_locale(&locale);
        Self {
            locale,
            layout_name: layout_name.into(),
            lcid,
        }
    }

    pub fn with_lcid(mut self, lcid: Option<u32>) -> Self {
        self.lcid = lcid;
        self
    }
}

/// One selectable keyboard.
#[derive(Debug, Clone, Serialize)]
pub struct KeyboardDefinition {
    layout: String,
    locale: String,
    name: String,
    category: Option<Category>,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    adaptor: Option<AdaptorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_language: Option<InputLanguage>,
}

impl KeyboardDefinition {
    /// The "no keyboard" sentinel.
    pub const ZERO: KeyboardDefinition = KeyboardDefinition {
        layout: String::new(),
        locale: String::new(),
        name: String::new(),
        category: None,
        available: false,
        adaptor: None,
        input_language: None,
    };

    /// Create a definition owned by `adaptor`. The display name defaults to
    /// the legacy id; use [`with_name`](Self::with_name) to override it.
    pub fn new(
        layout: impl Into<String>,
        locale: impl Into<String>,
        category: Category,
        adaptor: AdaptorId,
    ) -> Self {
        // Stored in NFC so equality agrees with the registry's composite key.
        let layout = crate::utils::nfc(&layout.into());
        let locale = crate::utils::nfc(&locale.into());
        let name = compose_legacy_id(&layout, &locale);
        Self {
            layout,
            locale,
            name,
            category: Some(category),
            available: true,
            adaptor: Some(adaptor),
            input_language: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn with_input_language(mut self, language: InputLanguage) -> Self {
        self.input_language = Some(language);
        self
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Human-readable name for menus.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` means the category is unknown (the zero sentinel, or a
    /// definition that no adaptor claimed).
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn adaptor(&self) -> Option<AdaptorId> {
        self.adaptor
    }

    pub fn input_language(&self) -> Option<&InputLanguage> {
        self.input_language.as_ref()
    }

    /// Host locale identifier of the keyboard, if the adaptor knows it.
    pub fn lcid(&self) -> Option<u32> {
        self.input_language.as_ref().and_then(|l| l.lcid)
    }

    pub fn is_zero(&self) -> bool {
        self.layout.is_empty() && self.locale.is_empty()
    }

    /// Backward-compatible string id (`layout-locale`, or `layout` when the
    /// locale is empty). Only used to resolve old configuration.
    pub fn legacy_id(&self) -> String {
        compose_legacy_id(&self.layout, &self.locale)
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

/// Addressable copy of the zero sentinel for lookups that hand out references.
pub(crate) static ZERO_KEYBOARD: KeyboardDefinition = KeyboardDefinition::ZERO;

fn compose_legacy_id(layout: &str, locale: &str) -> String {
    if locale.is_empty() {
        layout.to_string()
    } else {
        format!("{}-{}", layout, locale)
    }
}

impl Default for KeyboardDefinition {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for KeyboardDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.layout == other.layout && self.locale == other.locale
    }
}

impl Eq for KeyboardDefinition {}

impl Hash for KeyboardDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.layout.hash(state);
        self.locale.hash(state);
    }
}

impl fmt::Display for KeyboardDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("<no keyboard>");
        }
        write!(f, "{} ({}|{})", self.name, self.layout, self.locale)
    }
}
