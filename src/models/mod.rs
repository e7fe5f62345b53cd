pub mod data;
pub mod policy;
pub mod rules;

pub use data::*;
pub use policy::ScoringPolicy;
