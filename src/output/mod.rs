pub mod formatter;

pub use formatter::{
    format_accuracy, format_change, format_leaderboard, format_margin_rank, format_recalculation,
    format_round_summary, format_tsv, should_use_colors,
};
