use crate::models::rules::{
    is_known_type_code, MAX_IDENTIFIER_LENGTH, MIN_IDENTIFIER_LENGTH, TYPE_CODE_LENGTH,
    TYPE_CODE_OFFSET,
};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// A known misreading of the type-code region and the code it stands for.
///
/// `X` in `observed` matches any Latin capital letter; the captured letters
/// are substituted, in order, for the `X`s in `corrected`. The rule matches
/// the start of everything after the 12-character prefix, and what follows
/// the observed segment must be a 3-5 digit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairRule {
    pub observed: &'static str,
    pub corrected: &'static str,
}

impl RepairRule {
    pub const fn new(observed: &'static str, corrected: &'static str) -> Self {
        RepairRule { observed, corrected }
    }

    /// Rewrite `tail` (type-code region + sequence) if this rule matches.
    pub fn apply(&self, tail: &str) -> Option<String> {
        if !tail.is_ascii() || tail.len() < self.observed.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (expected, actual) in self.observed.bytes().zip(tail.bytes()) {
            if expected == b'X' {
                if !actual.is_ascii_uppercase() {
                    return None;
                }
                captured.push(actual as char);
            } else if expected != actual {
                return None;
            }
        }

        let sequence = &tail[self.observed.len()..];
        if !is_sequence(sequence) {
            return None;
        }

        let mut letters = captured.into_iter();
        let code: String = self
            .corrected
            .chars()
            .map(|c| if c == 'X' { letters.next().unwrap_or(c) } else { c })
            .collect();
        Some(format!("{}{}", code, sequence))
    }
}

/// Ordered repair table. Longer observations come first: `8XX80` has to win
/// over `8XX8` or the stray `0` ends up in the sequence.
pub const REPAIR_RULES: &[RepairRule] = &[
    RepairRule::new("8XX80", "BXX0"),
    RepairRule::new("8XX8", "BXX0"),
    RepairRule::new("8XX0", "BXX0"),
    RepairRule::new("8XXO", "BXX0"),
    RepairRule::new("8160", "BQR0"),
    RepairRule::new("816", "BQR0"),
    RepairRule::new("A7F0", "ATF0"),
    RepairRule::new("4TF0", "ATF0"),
    RepairRule::new("A9M0", "APM0"),
];

/// Digit to letter substitutions for rebuilding a type code's letters.
const DIGIT_TO_LETTER: &[(char, char)] = &[
    ('0', 'O'),
    ('1', 'I'),
    ('2', 'Z'),
    ('3', 'B'),
    ('4', 'A'),
    ('5', 'S'),
    ('6', 'G'),
    ('7', 'T'),
    ('8', 'B'),
];

lazy_static! {
    // prefix(12) + shortest middle + trailing 3-5 digit sequence
    static ref SEGMENTS: Regex = Regex::new(r"^([0-9]{12})(.+?)([0-9]{3,5})$").unwrap();
}

/// Coerce a near-miss reference toward a known type code.
///
/// Candidates shorter than 20 characters, or whose type-code region is
/// already a known code, are returned unchanged. So is anything no rule
/// can fix; final acceptance is left to the grammar parser.
pub fn repair(candidate: &str) -> String {
    repair_with(candidate, REPAIR_RULES)
}

pub fn repair_with(candidate: &str, rules: &[RepairRule]) -> String {
    if candidate.chars().count() < MIN_IDENTIFIER_LENGTH {
        return candidate.to_string();
    }
    if let Some(code) = candidate.get(TYPE_CODE_OFFSET..TYPE_CODE_OFFSET + TYPE_CODE_LENGTH) {
        if is_known_type_code(code) {
            return candidate.to_string();
        }
    }

    let caps = match SEGMENTS.captures(candidate) {
        Some(caps) => caps,
        None => return candidate.to_string(),
    };
    let prefix = &caps[1];
    let middle: String = caps[2]
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let sequence = &caps[3];
    let tail = format!("{}{}", middle, sequence);

    for rule in rules {
        if let Some(fixed) = rule.apply(&tail) {
            let repaired = format!("{}{}", prefix, fixed);
            if has_canonical_length(&repaired) {
                debug!(
                    "repair rule {} -> {} fired: {} => {}",
                    rule.observed, rule.corrected, candidate, repaired
                );
                return repaired;
            }
        }
    }

    if let Some((code, sequence)) = reconstruct_type_code(&middle, sequence) {
        let repaired = format!("{}{}{}", prefix, code, sequence);
        if has_canonical_length(&repaired) {
            debug!("type code rebuilt by substitution: {} => {}", candidate, repaired);
            return repaired;
        }
    }

    candidate.to_string()
}

/// Fallback when no rule matches: turn digits in the letter positions back
/// into letters. A 3-character middle followed by a `0` means the split took
/// the code's trailing zero into the sequence.
///
/// A 4-character middle already satisfies the grammar, so it is only
/// rewritten when the result is a dictionary code: `T0P0` becomes `TOP0`,
/// while `ABCD` or `A1B0` are left as printed.
fn reconstruct_type_code(middle: &str, sequence: &str) -> Option<(String, String)> {
    let chars: Vec<char> = middle.chars().collect();
    match chars.len() {
        4 => {
            let mut code: String = chars[..3].iter().map(|&c| digit_to_letter(c)).collect();
            code.push(letter_to_zero(chars[3]));
            (code != middle && is_known_type_code(&code)).then(|| (code, sequence.to_string()))
        }
        3 if sequence.starts_with('0') && sequence.len() >= 4 => {
            let mut code: String = chars.iter().map(|&c| digit_to_letter(c)).collect();
            code.push('0');
            (is_known_type_code(&code) || looks_like_type_code(&code))
                .then(|| (code, sequence[1..].to_string()))
        }
        _ => None,
    }
}

fn digit_to_letter(c: char) -> char {
    DIGIT_TO_LETTER
        .iter()
        .find(|(digit, _)| *digit == c)
        .map(|(_, letter)| *letter)
        .unwrap_or(c)
}

fn letter_to_zero(c: char) -> char {
    match c {
        'O' | 'D' | 'Q' => '0',
        other => other,
    }
}

/// Three letters followed by `0`, the shape every dictionary code has.
fn looks_like_type_code(code: &str) -> bool {
    code.len() == TYPE_CODE_LENGTH
        && code.ends_with('0')
        && code[..3].chars().all(|c| c.is_ascii_uppercase())
}

fn is_sequence(s: &str) -> bool {
    (3..=5).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn has_canonical_length(s: &str) -> bool {
    (MIN_IDENTIFIER_LENGTH..=MAX_IDENTIFIER_LENGTH).contains(&s.len())
}
