use thiserror::Error;

/// Why a candidate string is not a canonical transaction reference.
///
/// The first three variants are format failures; the last two are semantic
/// failures on a structurally well-formed reference. Callers treat both as
/// hard errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("prefix mismatch: expected {expected}, found {found}")]
    PrefixMismatch { expected: String, found: String },

    #[error("invalid length: expected 20 or 21 characters, found {0}")]
    InvalidLength(usize),

    #[error("pattern mismatch: {0} does not match the reference grammar")]
    PatternMismatch(String),

    #[error("invalid time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },

    #[error("year out of range: {year} not within {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
}

impl IdentifierError {
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            IdentifierError::InvalidTime { .. } | IdentifierError::YearOutOfRange { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum SlipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid scoring policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

pub type Result<T> = std::result::Result<T, SlipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_errors_are_distinguished() {
        assert!(IdentifierError::InvalidTime { hour: 25, minute: 0, second: 0 }.is_semantic());
        assert!(IdentifierError::YearOutOfRange { year: 2500, min: 2563, max: 2569 }.is_semantic());
        assert!(!IdentifierError::InvalidLength(19).is_semantic());
        assert!(!IdentifierError::PatternMismatch("X".to_string()).is_semantic());
    }

    #[test]
    fn messages_name_the_failed_check() {
        let err = IdentifierError::PrefixMismatch {
            expected: "0152".to_string(),
            found: "0153".to_string(),
        };
        assert!(err.to_string().starts_with("prefix mismatch"));
        let err = IdentifierError::InvalidTime { hour: 25, minute: 1, second: 2 };
        assert_eq!(err.to_string(), "invalid time 25:01:02");
    }
}
