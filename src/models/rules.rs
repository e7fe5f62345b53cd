/// Literal issuer prefix every reference starts with.
pub const DOMAIN_PREFIX: &str = "0152";

/// Added to the 2-digit year code to get the Buddhist-calendar year.
pub const YEAR_EPOCH_OFFSET: i32 = 2470;

/// Years accepted around the reference year: `[current - 5, current + 1]`.
pub const YEAR_WINDOW_PAST: i32 = 5;
pub const YEAR_WINDOW_FUTURE: i32 = 1;

pub const MIN_IDENTIFIER_LENGTH: usize = 20;
pub const MAX_IDENTIFIER_LENGTH: usize = 21;

/// Length of prefix + year code + HHMMSS, where the type code starts.
pub const TYPE_CODE_OFFSET: usize = 12;
pub const TYPE_CODE_LENGTH: usize = 4;

pub const UNKNOWN_TYPE_DESCRIPTION: &str = "Unknown";

/// Transaction channel dictionary. Every code is stored in its 4-character
/// form; 3-letter variants seen on slips are the same code with the trailing
/// `0` dropped by OCR and are restored by the repair engine.
pub const TYPE_CODES: &[TypeCode] = &[
    TypeCode::new("BQR0", "Bill QR Payment"),
    TypeCode::new("ATF0", "Account Transfer"),
    TypeCode::new("APM0", "PromptPay Mobile Transfer"),
    TypeCode::new("API0", "PromptPay ID Transfer"),
    TypeCode::new("BPM0", "Bill Payment"),
    TypeCode::new("ORM0", "Online Remittance"),
    TypeCode::new("TOP0", "Top-up Payment"),
    TypeCode::new("CDM0", "Cash Deposit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCode {
    pub code: &'static str,
    pub description: &'static str,
}

impl TypeCode {
    pub const fn new(code: &'static str, description: &'static str) -> Self {
        TypeCode { code, description }
    }
}

pub fn lookup_type_code(code: &str) -> Option<&'static TypeCode> {
    TYPE_CODES.iter().find(|entry| entry.code == code)
}

pub fn is_known_type_code(code: &str) -> bool {
    lookup_type_code(code).is_some()
}
