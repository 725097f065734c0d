//! Windows locale identifiers (LCIDs).
//!
//! Older writing-system records stored the keyboard as a numeric LCID. The
//! table covers the locales keyboards are commonly installed for; an LCID
//! that is not listed behaves like a culture the host does not support.

use phf::phf_map;

static LCID_LOCALES: phf::Map<u32, &'static str> = phf_map! {
    1025u32 => "ar-SA",
    1026u32 => "bg-BG",
    1027u32 => "ca-ES",
    1028u32 => "zh-TW",
    1029u32 => "cs-CZ",
    1030u32 => "da-DK",
    1031u32 => "de-DE",
    1032u32 => "el-GR",
    1033u32 => "en-US",
    1034u32 => "es-ES",
    1035u32 => "fi-FI",
    1036u32 => "fr-FR",
    1037u32 => "he-IL",
    1038u32 => "hu-HU",
    1039u32 => "is-IS",
    1040u32 => "it-IT",
    1041u32 => "ja-JP",
    1042u32 => "ko-KR",
    1043u32 => "nl-NL",
    1044u32 => "nb-NO",
    1045u32 => "pl-PL",
    1046u32 => "pt-BR",
    1048u32 => "ro-RO",
    1049u32 => "ru-RU",
    1050u32 => "hr-HR",
    1051u32 => "sk-SK",
    1053u32 => "sv-SE",
    1054u32 => "th-TH",
    1055u32 => "tr-TR",
    1057u32 => "id-ID",
    1058u32 => "uk-UA",
    1061u32 => "et-EE",
    1062u32 => "lv-LV",
    1063u32 => "lt-LT",
    1065u32 => "fa-IR",
    1066u32 => "vi-VN",
    1081u32 => "hi-IN",
    1086u32 => "ms-MY",
    1089u32 => "sw-KE",
    1106u32 => "cy-GB",
    2052u32 => "zh-CN",
    2055u32 => "de-CH",
    2057u32 => "en-GB",
    2058u32 => "es-MX",
    2060u32 => "fr-BE",
    2064u32 => "it-CH",
    2067u32 => "nl-BE",
    2070u32 => "pt-PT",
    3076u32 => "zh-HK",
    3079u32 => "de-AT",
    3081u32 => "en-AU",
    3084u32 => "fr-CA",
    4105u32 => "en-CA",
    4108u32 => "fr-CH",
    5129u32 => "en-NZ",
    6153u32 => "en-IE",
    7177u32 => "en-ZA",
    16393u32 => "en-IN",
};

/// Locale name for a Windows LCID, e.g. `1033` → `"en-US"`.
pub fn locale_for_lcid(lcid: u32) -> Option<&'static str> {
    LCID_LOCALES.get(&lcid).copied()
}

/// Reverse lookup; locale names compare case-insensitively.
pub fn lcid_for_locale(locale: &str) -> Option<u32> {
    if locale.is_empty() {
        return None;
    }
    LCID_LOCALES
        .entries()
        .find(|(_, name)| name.eq_ignore_ascii_case(locale))
        .map(|(lcid, _)| *lcid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcid_round_trip_for_known_locales() {
        assert_eq!(locale_for_lcid(1033), Some("en-US"));
        assert_eq!(locale_for_lcid(2057), Some("en-GB"));
        assert_eq!(lcid_for_locale("de-DE"), Some(1031));
        assert_eq!(lcid_for_locale("en-gb"), Some(2057));
    }

    #[test]
    fn test_unknown_lcid() {
        assert_eq!(locale_for_lcid(0), None);
        assert_eq!(locale_for_lcid(99999), None);
        assert_eq!(lcid_for_locale(""), None);
        assert_eq!(lcid_for_locale("xx-YY"), None);
    }
}
