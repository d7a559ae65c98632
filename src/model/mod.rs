pub mod types;

pub use types::{CompetitionId, Game, GameId, Member, TeamId, Tip, TipRecord, UserId};
