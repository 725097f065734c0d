//! Locale of each XKB layout code.
//!
//! XKB layouts are named after countries (`de`, `gb`, `ch`), not languages.
//! This table gives the locale a layout is normally used for; configuration
//! can override it per layout.

use phf::phf_map;
use std::collections::BTreeMap;

static LAYOUT_LOCALES: phf::Map<&'static str, &'static str> = phf_map! {
    "us" => "en-US",
    "gb" => "en-GB",
    "au" => "en-AU",
    "ca" => "fr-CA",
    "ie" => "en-IE",
    "in" => "hi-IN",
    "za" => "en-ZA",
    "de" => "de-DE",
    "at" => "de-AT",
    "ch" => "de-CH",
    "fr" => "fr-FR",
    "be" => "fr-BE",
    "es" => "es-ES",
    "latam" => "es-MX",
    "pt" => "pt-PT",
    "br" => "pt-BR",
    "it" => "it-IT",
    "nl" => "nl-NL",
    "se" => "sv-SE",
    "no" => "nb-NO",
    "dk" => "da-DK",
    "fi" => "fi-FI",
    "is" => "is-IS",
    "ee" => "et-EE",
    "lv" => "lv-LV",
    "lt" => "lt-LT",
    "pl" => "pl-PL",
    "cz" => "cs-CZ",
    "sk" => "sk-SK",
    "hu" => "hu-HU",
    "ro" => "ro-RO",
    "bg" => "bg-BG",
    "rs" => "sr-RS",
    "hr" => "hr-HR",
    "si" => "sl-SI",
    "gr" => "el-GR",
    "tr" => "tr-TR",
    "ru" => "ru-RU",
    "ua" => "uk-UA",
    "by" => "be-BY",
    "il" => "he-IL",
    "ara" => "ar-SA",
    "ir" => "fa-IR",
    "th" => "th-TH",
    "vn" => "vi-VN",
    "cn" => "zh-CN",
    "tw" => "zh-TW",
    "jp" => "ja-JP",
    "kr" => "ko-KR",
    "et" => "am-ET",
    "ke" => "sw-KE",
    "ng" => "en-NG",
    "np" => "ne-NP",
    "lk" => "si-LK",
    "mn" => "mn-MN",
    "ge" => "ka-GE",
    "am" => "hy-AM",
    "kz" => "kk-KZ",
};

/// Locale for the layout `name` (`de` or `de(nodeadkeys)`), or `None` if it
/// is not known.
pub fn locale_for_layout<'a>(name: &str, overrides: &'a BTreeMap<String, String>) -> Option<&'a str> {
    if let Some(locale) = overrides.get(name) {
        return Some(locale.as_str());
    }
    let (code, _) = crate::rules::split_layout_name(name);
    if let Some(locale) = overrides.get(code) {
        return Some(locale.as_str());
    }
    LAYOUT_LOCALES.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_locales() {
        let none = BTreeMap::new();
        assert_eq!(locale_for_layout("us", &none), Some("en-US"));
        assert_eq!(locale_for_layout("de(nodeadkeys)", &none), Some("de-DE"));
        assert_eq!(locale_for_layout("custom", &none), None);
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = BTreeMap::new();
        overrides.insert("us(chr)".to_string(), "chr-US".to_string());
        overrides.insert("ch".to_string(), "fr-CH".to_string());
        assert_eq!(locale_for_layout("us(chr)", &overrides), Some("chr-US"));
        assert_eq!(locale_for_layout("us(dvorak)", &overrides), Some("en-US"));
        assert_eq!(locale_for_layout("ch(fr)", &overrides), Some("fr-CH"));
    }
}
