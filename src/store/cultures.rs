//! Built-in culture inventory used to seed locale aliases.

/// A neutral culture: two- or three-letter code plus its names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Culture {
    /// ISO 639 code (`pl`).
    pub code: &'static str,
    /// English display name, used as the default language name (`Polish`).
    pub english_name: &'static str,
    /// Name in the language itself (`polski`).
    pub native_name: &'static str,
}

/// Shorthand constructor for the table below.
const fn culture(
    code: &'static str,
    english_name: &'static str,
    native_name: &'static str,
) -> Culture {
    Culture { code, english_name, native_name }
}

/// Neutral cultures, sorted by code.
pub static CULTURES: &[Culture] = &[
    culture("af", "Afrikaans", "Afrikaans"),
    culture("ar", "Arabic", "العربية"),
    culture("az", "Azerbaijani", "azərbaycan"),
    culture("be", "Belarusian", "беларуская"),
    culture("bg", "Bulgarian", "български"),
    culture("bs", "Bosnian", "bosanski"),
    culture("ca", "Catalan", "català"),
    culture("cs", "Czech", "čeština"),
    culture("cy", "Welsh", "Cymraeg"),
    culture("da", "Danish", "dansk"),
    culture("de", "German", "Deutsch"),
    culture("dv", "Divehi", "ދިވެހިބަސް"),
    culture("el", "Greek", "Ελληνικά"),
    culture("en", "English", "English"),
    culture("eo", "Esperanto", "esperanto"),
    culture("es", "Spanish", "español"),
    culture("et", "Estonian", "eesti"),
    culture("eu", "Basque", "euskara"),
    culture("fa", "Persian", "فارسی"),
    culture("fi", "Finnish", "suomi"),
    culture("fo", "Faroese", "føroyskt"),
    culture("fr", "French", "français"),
    culture("gl", "Galician", "galego"),
    culture("gu", "Gujarati", "ગુજરાતી"),
    culture("he", "Hebrew", "עברית"),
    culture("hi", "Hindi", "हिन्दी"),
    culture("hr", "Croatian", "hrvatski"),
    culture("hu", "Hungarian", "magyar"),
    culture("hy", "Armenian", "Հայերեն"),
    culture("id", "Indonesian", "Indonesia"),
    culture("is", "Icelandic", "íslenska"),
    culture("it", "Italian", "italiano"),
    culture("ja", "Japanese", "日本語"),
    culture("ka", "Georgian", "ქართული"),
    culture("kk", "Kazakh", "қазақ тілі"),
    culture("kn", "Kannada", "ಕನ್ನಡ"),
    culture("ko", "Korean", "한국어"),
    culture("kok", "Konkani", "कोंकणी"),
    culture("ky", "Kyrgyz", "кыргызча"),
    culture("lt", "Lithuanian", "lietuvių"),
    culture("lv", "Latvian", "latviešu"),
    culture("mi", "Maori", "Māori"),
    culture("mk", "Macedonian", "македонски"),
    culture("mn", "Mongolian", "монгол"),
    culture("mr", "Marathi", "मराठी"),
    culture("ms", "Malay", "Melayu"),
    culture("mt", "Maltese", "Malti"),
    culture("nb", "Norwegian Bokmål", "norsk bokmål"),
    culture("nl", "Dutch", "Nederlands"),
    culture("nn", "Norwegian Nynorsk", "nynorsk"),
    culture("pa", "Punjabi", "ਪੰਜਾਬੀ"),
    culture("pl", "Polish", "polski"),
    culture("ps", "Pashto", "پښتو"),
    culture("pt", "Portuguese", "português"),
    culture("qu", "Quechua", "Runasimi"),
    culture("ro", "Romanian", "română"),
    culture("ru", "Russian", "русский"),
    culture("sa", "Sanskrit", "संस्कृतम्"),
    culture("se", "Northern Sami", "davvisámegiella"),
    culture("sk", "Slovak", "slovenčina"),
    culture("sl", "Slovenian", "slovenščina"),
    culture("sq", "Albanian", "shqip"),
    culture("sr", "Serbian", "српски"),
    culture("sv", "Swedish", "svenska"),
    culture("sw", "Swahili", "Kiswahili"),
    culture("syr", "Syriac", "ܣܘܪܝܝܐ"),
    culture("ta", "Tamil", "தமிழ்"),
    culture("te", "Telugu", "తెలుగు"),
    culture("th", "Thai", "ไทย"),
    culture("tl", "Tagalog", "Tagalog"),
    culture("tn", "Tswana", "Setswana"),
    culture("tr", "Turkish", "Türkçe"),
    culture("ts", "Tsonga", "Xitsonga"),
    culture("tt", "Tatar", "татар"),
    culture("uk", "Ukrainian", "українська"),
    culture("ur", "Urdu", "اردو"),
    culture("uz", "Uzbek", "oʻzbek"),
    culture("vi", "Vietnamese", "Tiếng Việt"),
    culture("xh", "Xhosa", "isiXhosa"),
    culture("zh", "Chinese", "中文"),
    culture("zu", "Zulu", "isiZulu"),
];

/// Regional locale codes (RFC 5646). Each aliases the culture of its leading subtag.
pub static REGIONAL_CODES: &[&str] = &[
    "af-ZA", "ar-AE", "ar-BH", "ar-DZ", "ar-EG", "ar-IQ", "ar-JO", "ar-KW", "ar-LB", "ar-LY",
    "ar-MA", "ar-OM", "ar-QA", "ar-SA", "ar-SY", "ar-TN", "ar-YE", "az-AZ", "az-Cyrl-AZ",
    "be-BY", "bg-BG", "bs-BA", "ca-ES", "cs-CZ", "cy-GB", "da-DK", "de-AT", "de-CH", "de-DE",
    "de-LI", "de-LU", "dv-MV", "el-GR", "en-AU", "en-BZ", "en-CA", "en-CB", "en-GB", "en-IE",
    "en-JM", "en-NZ", "en-PH", "en-TT", "en-US", "en-ZA", "en-ZW", "es-AR", "es-BO", "es-CL",
    "es-CO", "es-CR", "es-DO", "es-EC", "es-ES", "es-GT", "es-HN", "es-MX", "es-NI", "es-PA",
    "es-PE", "es-PR", "es-PY", "es-SV", "es-UY", "es-VE", "et-EE", "eu-ES", "fa-IR", "fi-FI",
    "fo-FO", "fr-BE", "fr-CA", "fr-CH", "fr-FR", "fr-LU", "fr-MC", "gl-ES", "gu-IN", "he-IL",
    "hi-IN", "hr-BA", "hr-HR", "hu-HU", "hy-AM", "id-ID", "is-IS", "it-CH", "it-IT", "ja-JP",
    "ka-GE", "kk-KZ", "kn-IN", "ko-KR", "kok-IN", "ky-KG", "lt-LT", "lv-LV", "mi-NZ", "mk-MK",
    "mn-MN", "mr-IN", "ms-BN", "ms-MY", "mt-MT", "nb-NO", "nl-BE", "nl-NL", "nn-NO", "pa-IN",
    "pl-PL", "ps-AR", "pt-BR", "pt-PT", "qu-BO", "qu-EC", "qu-PE", "ro-RO", "ru-RU", "sa-IN",
    "se-FI", "se-NO", "se-SE", "sk-SK", "sl-SI", "sq-AL", "sr-BA", "sr-Cyrl-BA", "sr-SP",
    "sr-Cyrl-SP", "sv-FI", "sv-SE", "sw-KE", "syr-SY", "ta-IN", "te-IN", "th-TH", "tl-PH",
    "tn-ZA", "tr-TR", "tt-RU", "uk-UA", "ur-PK", "uz-UZ", "uz-Cyrl-UZ", "vi-VN", "xh-ZA",
    "zh-CN", "zh-HK", "zh-MO", "zh-SG", "zh-TW", "zu-ZA",
];

/// Leading subtag of a locale code (`pt-BR` → `pt`, `pl_PL` → `pl`).
#[must_use]
pub fn primary_subtag(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale).trim()
}

/// Finds the culture for a code, ignoring case and any region subtag.
#[must_use]
pub fn by_code(locale: &str) -> Option<&'static Culture> {
    let code = primary_subtag(locale);
    CULTURES.iter().find(|culture| culture.code.eq_ignore_ascii_case(code))
}

/// Finds the culture whose English name matches, ignoring case.
#[must_use]
pub fn by_english_name(name: &str) -> Option<&'static Culture> {
    let name = name.trim().to_lowercase();
    CULTURES.iter().find(|culture| culture.english_name.to_lowercase() == name)
}

/// Finds the culture whose native name matches, ignoring case.
#[must_use]
pub fn by_native_name(name: &str) -> Option<&'static Culture> {
    let name = name.trim().to_lowercase();
    CULTURES.iter().find(|culture| culture.native_name.to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("pl", Some("pl"))]
    #[case("pl-PL", Some("pl"))]
    #[case("PT_br", Some("pt"))]
    #[case("sr-Cyrl-SP", Some("sr"))]
    #[case("kok-IN", Some("kok"))]
    #[case("xx", None)]
    #[case("", None)]
    fn test_by_code(#[case] locale: &str, #[case] expected: Option<&str>) {
        assert_eq!(by_code(locale).map(|culture| culture.code), expected);
    }

    #[rstest]
    #[case::english("polish", Some("pl"))]
    #[case::english_mixed_case("GERMAN", Some("de"))]
    #[case::unknown("Klingon", None)]
    fn test_by_english_name(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(by_english_name(name).map(|culture| culture.code), expected);
    }

    #[rstest]
    #[case::native("Polski", Some("pl"))]
    #[case::native_non_ascii("ČEŠTINA", Some("cs"))]
    #[case::english_is_not_native("Polish", None)]
    fn test_by_native_name(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(by_native_name(name).map(|culture| culture.code), expected);
    }

    #[test]
    fn test_every_regional_code_has_a_culture() {
        for code in REGIONAL_CODES {
            assert!(by_code(code).is_some(), "no culture for {code}");
        }
    }

    #[test]
    fn test_cultures_sorted_by_code() {
        assert!(CULTURES.windows(2).all(|pair| matches!(pair, [a, b] if a.code < b.code)));
    }
}
