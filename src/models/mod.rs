pub mod address;
pub mod result;
pub mod score;

pub use address::{AddressRecord, RiskCategory};
pub use result::EvaluationResult;
pub use score::{RiskLevel, ScoreRecord, UNKNOWN_STATUS};
