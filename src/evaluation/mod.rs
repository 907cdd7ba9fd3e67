pub mod harness;
pub mod report;
pub mod tally;

pub use harness::{evaluate, evaluate_entry, CorrectnessPolicy, EvalOptions, RunOutcome};
pub use report::{Report, SystemStatus};
pub use tally::{percentage, CategoryTally, Metrics};
