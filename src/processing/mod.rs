pub mod candidates;
pub mod extractors;
pub mod normalizer;
pub mod repair;

pub use candidates::{extract_candidates, extract_identifier, IdentifierCandidate};
pub use extractors::SlipFieldExtractor;
pub use normalizer::{normalize, normalize_numerals};
pub use repair::{repair, RepairRule};
