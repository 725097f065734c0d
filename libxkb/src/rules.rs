//! Parsers for XKB text output.
//!
//! Two formats are read:
//! - the rules list (`evdev.lst`), which names every layout and variant the
//!   X server knows about, in `! section` blocks;
//! - `setxkbmap -query`, which reports the layouts currently in use.

use libkeyboarding_core::AdaptorError;
use once_cell::sync::Lazy;
use regex::Regex;

/// `  name   description` inside a section.
static ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+(\S+)\s+(.+?)\s*$").unwrap());

/// `layout: description` as used for variant descriptions.
static VARIANT_DESCRIPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:\s]+):\s*(.+)$").unwrap());

/// `key:   value` lines of `setxkbmap -query`.
static QUERY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+):\s*(.*?)\s*$").unwrap());

/// One layout or layout variant from the rules list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XkbLayout {
    /// Base layout code, e.g. `de`.
    pub code: String,
    pub variant: Option<String>,
    pub description: String,
}

impl XkbLayout {
    /// `de` or `de(nodeadkeys)`; used as the keyboard's layout key.
    pub fn name(&self) -> String {
        layout_name(&self.code, self.variant.as_deref())
    }
}

pub fn layout_name(code: &str, variant: Option<&str>) -> String {
    match variant {
        Some(variant) if !variant.is_empty() => format!("{}({})", code, variant),
        _ => code.to_string(),
    }
}

/// Split `de(nodeadkeys)` into its code and variant.
pub fn split_layout_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once('(') {
        Some((code, rest)) => (code, rest.strip_suffix(')').filter(|v| !v.is_empty())),
        None => (name, None),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Layout,
    Variant,
    Other,
}

/// Layouts and variants from a rules list, in file order: every layout is
/// followed later by the variants section, so variants come last.
pub fn parse_rules_list(content: &str) -> Result<Vec<XkbLayout>, AdaptorError> {
    let mut section = Section::Other;
    let mut seen_layout_section = false;
    let mut layouts = Vec::new();

    for line in content.lines() {
        if let Some(header) = line.strip_prefix('!') {
            section = match header.trim() {
                "layout" => {
                    seen_layout_section = true;
                    Section::Layout
                }
                "variant" => Section::Variant,
                _ => Section::Other,
            };
            continue;
        }
        if section == Section::Other {
            continue;
        }
        let Some(caps) = ENTRY.captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        let description = caps[2].to_string();
        match section {
            Section::Layout => layouts.push(XkbLayout {
                code: name,
                variant: None,
                description,
            }),
            Section::Variant => {
                // Variant lines read `nodeadkeys  de: German (no dead keys)`.
                let Some(desc) = VARIANT_DESCRIPTION.captures(&description) else {
                    continue;
                };
                layouts.push(XkbLayout {
                    code: desc[1].to_string(),
                    variant: Some(name),
                    description: desc[2].to_string(),
                });
            }
            Section::Other => {}
        }
    }

    if !seen_layout_section {
        return Err(AdaptorError::Parse("rules list has no `! layout` section".to_string()));
    }
    Ok(layouts)
}

/// Current layout as reported by `setxkbmap -query`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XkbQuery {
    pub rules: Option<String>,
    pub model: Option<String>,
    /// Every configured layout; the first one is in effect.
    pub layouts: Vec<String>,
    pub variants: Vec<String>,
}

impl XkbQuery {
    /// Name of the layout in effect, with its variant.
    pub fn current(&self) -> Option<String> {
        let code = self.layouts.first()?;
        let variant = self.variants.first().map(String::as_str);
        Some(layout_name(code, variant))
    }
}

pub fn parse_query(output: &str) -> Result<XkbQuery, AdaptorError> {
    let mut query = XkbQuery::default();
    for line in output.lines() {
        let Some(caps) = QUERY_LINE.captures(line) else {
            continue;
        };
        let value = caps[2].to_string();
        match &caps[1] {
            "rules" => query.rules = Some(value),
            "model" => query.model = Some(value),
            "layout" => query.layouts = value.split(',').map(|s| s.trim().to_string()).collect(),
            "variant" => query.variants = value.split(',').map(|s| s.trim().to_string()).collect(),
            _ => {}
        }
    }
    if query.layouts.is_empty() {
        return Err(AdaptorError::Parse(
            "could not find the layout entry in setxkbmap output".to_string(),
        ));
    }
    Ok(query)
}
