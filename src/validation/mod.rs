pub mod format;
pub mod risk;
pub mod timestamp;

pub use format::IdentifierParser;
pub use risk::RiskScorer;
pub use timestamp::TimestampVerifier;
