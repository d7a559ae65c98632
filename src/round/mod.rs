pub mod aggregator;
pub mod summary;

pub use aggregator::{aggregate_round, aggregate_rounds, all_correct_bonus, group_by_round, RoundResult};
pub use summary::{summarize_round, RoundSummary};
