pub mod builder;
pub mod margin_rank;
pub mod rank_delta;

pub use builder::{
    build_leaderboard, build_leaderboard_with_members, compare_standings, rank_standings,
    UserStanding,
};
pub use margin_rank::{margin_rank, margin_ranks};
pub use rank_delta::{apply_rank_changes, with_rank_changes};
