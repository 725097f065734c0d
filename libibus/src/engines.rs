//! `ibus list-engine` parsing and engine locales.

use libkeyboarding_core::AdaptorError;
use once_cell::sync::Lazy;
use phf::phf_map;
use regex::Regex;

/// `language: Chinese`
static LANGUAGE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^language:\s*(.+?)\s*$").unwrap());

/// `  pinyin - Pinyin`
static ENGINE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+(\S+)\s+-\s+(.+?)\s*$").unwrap());

/// ISO 639-2 codes used in `xkb:` engine names.
static THREE_LETTER: phf::Map<&'static str, &'static str> = phf_map! {
    "eng" => "en",
    "ger" => "de",
    "deu" => "de",
    "fra" => "fr",
    "fre" => "fr",
    "spa" => "es",
    "por" => "pt",
    "ita" => "it",
    "rus" => "ru",
    "ukr" => "uk",
    "pol" => "pl",
    "cze" => "cs",
    "ces" => "cs",
    "dut" => "nl",
    "nld" => "nl",
    "swe" => "sv",
    "nor" => "nb",
    "dan" => "da",
    "fin" => "fi",
    "gre" => "el",
    "ell" => "el",
    "tur" => "tr",
    "ara" => "ar",
    "heb" => "he",
    "per" => "fa",
    "fas" => "fa",
    "hin" => "hi",
    "tha" => "th",
    "vie" => "vi",
    "jpn" => "ja",
    "kor" => "ko",
    "chi" => "zh",
    "zho" => "zh",
};

/// Engines whose names carry no language.
static ENGINE_LOCALES: phf::Map<&'static str, &'static str> = phf_map! {
    "pinyin" => "zh-CN",
    "libpinyin" => "zh-CN",
    "intpinyin" => "zh-CN",
    "rime" => "zh-CN",
    "chewing" => "zh-TW",
    "libzhuyin" => "zh-TW",
    "bopomofo" => "zh-TW",
    "anthy" => "ja",
    "kkc" => "ja",
    "mozc-jp" => "ja",
    "hangul" => "ko",
    "Unikey" => "vi",
    "Bamboo" => "vi",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbusEngine {
    pub name: String,
    pub description: String,
    /// Display name of the `language:` section the engine was listed under.
    pub language: String,
}

impl IbusEngine {
    pub fn is_xkb(&self) -> bool {
        self.name.starts_with("xkb:")
    }

    pub fn locale(&self) -> String {
        engine_locale(&self.name)
    }
}

/// Parse `ibus list-engine` output, in listing order.
pub fn parse_engine_list(output: &str) -> Result<Vec<IbusEngine>, AdaptorError> {
    let mut language: Option<String> = None;
    let mut engines = Vec::new();

    for line in output.lines() {
        if let Some(caps) = LANGUAGE_HEADER.captures(line) {
            language = Some(caps[1].to_string());
            continue;
        }
        let Some(caps) = ENGINE_LINE.captures(line) else {
            continue;
        };
        let Some(language) = language.as_ref() else {
            return Err(AdaptorError::Parse(format!(
                "engine listed before any language header: {}",
                line.trim()
            )));
        };
        engines.push(IbusEngine {
            name: caps[1].to_string(),
            description: caps[2].to_string(),
            language: language.clone(),
        });
    }
    Ok(engines)
}

/// Locale for an engine name, or "" when the name does not tell.
///
/// - `xkb:<layout>:<variant>:<lang>` uses the (ISO 639-2) language field;
/// - `m17n:<lang>:<name>` and other `<prefix>:<lang>:...` names use the second field;
/// - known engine names come from a table.
pub fn engine_locale(name: &str) -> String {
    let fields: Vec<&str> = name.split(':').collect();
    match fields.as_slice() {
        ["xkb", _, _, lang, ..] => {
            let lang = lang.split(',').next().unwrap_or_default();
            THREE_LETTER.get(lang).copied().unwrap_or(lang).to_string()
        }
        [_, lang, ..] if is_language_code(lang) => lang.to_string(),
        _ => ENGINE_LOCALES.get(name).copied().unwrap_or_default().to_string(),
    }
}

fn is_language_code(s: &str) -> bool {
    (2..=3).contains(&s.len()) && s.chars().all(|c| c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
language: English
  xkb:us::eng - English (US)
  xkb:us:dvorak:eng - English (Dvorak)
language: Chinese
  pinyin - Pinyin
  libzhuyin - New Zhuyin
language: Hindi
  m17n:hi:inscript - inscript (m17n)
";

    #[test]
    fn test_parse_engine_list() {
        let engines = parse_engine_list(LISTING).unwrap();
        assert_eq!(engines.len(), 5);
        assert_eq!(engines[2].name, "pinyin");
        assert_eq!(engines[2].description, "Pinyin");
        assert_eq!(engines[2].language, "Chinese");
        assert!(engines[0].is_xkb());
        assert!(!engines[4].is_xkb());
    }

    #[test]
    fn test_engine_before_language_is_an_error() {
        assert!(parse_engine_list("  pinyin - Pinyin\n").is_err());
    }

    #[test]
    fn test_engine_locale() {
        assert_eq!(engine_locale("xkb:us::eng"), "en");
        assert_eq!(engine_locale("xkb:de:nodeadkeys:ger"), "de");
        assert_eq!(engine_locale("m17n:hi:inscript"), "hi");
        assert_eq!(engine_locale("table:cangjie5"), "");
        assert_eq!(engine_locale("pinyin"), "zh-CN");
        assert_eq!(engine_locale("libzhuyin"), "zh-TW");
        assert_eq!(engine_locale("something-else"), "");
    }
}
