// Table-driven rewriting of OCR misreadings into canonical ASCII.
// Thai slips mix Thai digits, spelled-out Latin letter names and odd
// separators into the reference line; this undoes the systematic ones.

/// Type codes split into slash-prefixed letter names.
pub const TYPE_CODE_SEGMENTS: &[(&str, &str)] = &[
    ("/บีคิวอาร์", "BQR"),
    ("/เอทีเอฟ", "ATF"),
    ("/เอพีเอ็ม", "APM"),
    ("/บีพีเอ็ม", "BPM"),
];

/// Thai spellings of Latin letter names, longest and most specific first.
pub const LETTER_NAMES: &[(&str, &str)] = &[
    ("อาร์", "R"),
    ("เอ็ม", "M"),
    ("เอฟ", "F"),
    ("เอส", "S"),
    ("คิว", "Q"),
    ("เอ", "A"),
    ("บี", "B"),
    ("ซี", "C"),
    ("ดี", "D"),
    ("อี", "E"),
    ("ไอ", "I"),
    ("โอ", "O"),
    ("พี", "P"),
    ("ที", "T"),
];

/// Thai and full-width digits, plus separators OCR confuses.
pub const NUMERALS: &[(&str, &str)] = &[
    ("๐", "0"),
    ("๑", "1"),
    ("๒", "2"),
    ("๓", "3"),
    ("๔", "4"),
    ("๕", "5"),
    ("๖", "6"),
    ("๗", "7"),
    ("๘", "8"),
    ("๙", "9"),
    ("０", "0"),
    ("１", "1"),
    ("２", "2"),
    ("３", "3"),
    ("４", "4"),
    ("５", "5"),
    ("６", "6"),
    ("７", "7"),
    ("８", "8"),
    ("９", "9"),
    ("：", ":"),
    ("–", "-"),
    ("—", "-"),
    ("\u{00a0}", " "),
];

/// Tables in the order `normalize` applies them.
///
/// A pattern must come before any pattern it contains as a substring,
/// otherwise the shorter one fires first and breaks the longer match
/// (เอ would turn เอฟ into "Aฟ"). Every pattern contains a non-ASCII
/// character and every replacement is ASCII, which keeps `normalize`
/// idempotent.
pub const ORDERED_TABLES: &[&[(&str, &str)]] = &[TYPE_CODE_SEGMENTS, LETTER_NAMES, NUMERALS];

/// All substitutions flattened in application order.
pub fn substitutions() -> Vec<(&'static str, &'static str)> {
    ORDERED_TABLES.concat()
}

/// Apply every table, in order.
pub fn normalize(text: &str) -> String {
    ORDERED_TABLES
        .iter()
        .fold(text.to_string(), |acc, table| normalize_with(&acc, table))
}

/// Digits and separators only; leaves Thai words intact.
pub fn normalize_numerals(text: &str) -> String {
    normalize_with(text, NUMERALS)
}

/// Fold an ordered substitution table over `text`.
pub fn normalize_with(text: &str, table: &[(&str, &str)]) -> String {
    table.iter().fold(text.to_string(), |acc, (pattern, replacement)| {
        if acc.contains(pattern) {
            acc.replace(pattern, replacement)
        } else {
            acc
        }
    })
}

/// Keep only ASCII letters and digits, upper-cased.
pub fn strip_to_alphanumeric(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thai_digits_become_ascii() {
        assert_eq!(normalize("๐๑๕๒๙๘"), "015298");
        assert_eq!(normalize("เวลา ๑๗:๐๘"), "เวลา 17:08");
    }

    #[test]
    fn letter_names_become_letters() {
        assert_eq!(normalize("บีคิวอาร์0"), "BQR0");
        assert_eq!(normalize("เอทีเอฟ0"), "ATF0");
    }

    #[test]
    fn slash_segmented_type_code_is_collapsed() {
        assert_eq!(normalize("015298170819/บีคิวอาร์02651"), "015298170819BQR02651");
    }

    #[test]
    fn longer_patterns_precede_their_substrings() {
        let table = substitutions();
        for (i, (later, _)) in table.iter().enumerate() {
            for (earlier, _) in &table[..i] {
                assert!(
                    !later.contains(earlier),
                    "{:?} is listed before {:?}, which contains it",
                    earlier,
                    later
                );
            }
        }
    }

    #[test]
    fn reordering_the_table_changes_output() {
        let reversed: Vec<(&str, &str)> = substitutions().into_iter().rev().collect();
        let fixture = "เอฟ";
        assert_eq!(normalize(fixture), "F");
        assert_ne!(normalize_with(fixture, &reversed), "F");

        let fixture = "/บีคิวอาร์";
        assert_eq!(normalize(fixture), "BQR");
        assert_eq!(normalize_with(fixture, &reversed), "/BQR");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "plain ascii 123",
            "๐๑๕๒๙๘๑๗๐๘๑๙บีคิวอาร์๐๒๖๕๑",
            "เอเอฟเอ็มเอส",
            "/บีคิวอาร์/เอทีเอฟ",
            "อาร์อาร์คิวคิว",
            "เวลา：๑๗–๐๘",
            "เเออ",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn numerals_only_keeps_thai_words() {
        assert_eq!(normalize_numerals("ใจดี ๑๗：๐๘"), "ใจดี 17:08");
        assert_eq!(normalize("ใจดี"), "ใจD");
    }

    #[test]
    fn ascii_passes_through_unchanged() {
        let text = "015298170819BQR02651 Amount 1,500.00";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn strip_keeps_uppercase_alphanumerics() {
        assert_eq!(strip_to_alphanumeric("0152-9817 0819.bqr0/2651"), "015298170819BQR02651");
    }
}
