use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::leaderboard::{margin_rank, UserStanding};
use crate::model::{Game, Tip};
use crate::recalc::Recalculation;
use crate::round::RoundSummary;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Position change since last round: "▲2", "▼1", "=" or "-" when unknown
pub fn format_change(change: Option<i32>) -> String {
    match change {
        None => "-".to_string(),
        Some(0) => "=".to_string(),
        Some(n) if n > 0 => format!("▲{}", n),
        Some(n) => format!("▼{}", n.unsigned_abs()),
    }
}

/// Accuracy as a whole percentage ("66%")
pub fn format_accuracy(accuracy: f64) -> String {
    format!("{:.0}%", accuracy)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a display name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format standings as a table: rank, change, name, points, correct/decided,
/// accuracy, margin difference. No headers.
pub fn format_leaderboard(standings: &[UserStanding], use_colors: bool) -> String {
    if standings.is_empty() {
        return "No tips recorded yet.".to_string();
    }

    let term_width = get_terminal_width();

    // rank(4) change(4) points(6) correct(9) accuracy(5) margin(6) + separators
    let fixed_width = 4 + 1 + 4 + 2 + 6 + 2 + 9 + 2 + 5 + 2 + 6 + 2;
    let name_width = standings
        .iter()
        .map(|s| s.username.chars().count())
        .max()
        .unwrap_or(0);
    let name_width = match term_width {
        Some(width) if width > fixed_width + 10 => name_width.min(width - fixed_width),
        Some(_) => name_width.min(20),
        None => name_width,
    };

    standings
        .iter()
        .map(|s| {
            let rank = format!("{:>3}.", s.rank);
            let change = format!("{:>4}", format_change(s.change));
            let name = format!(
                "{:<width$}",
                truncate_name(&s.username, name_width),
                width = name_width
            );
            let points = format!("{:>6}", s.total_points);
            let correct = format!("{:>9}", format!("{}/{}", s.total_correct, s.total_decided));
            let accuracy = format!("{:>5}", format_accuracy(s.accuracy));
            let margin = format!("{:>6}", s.total_margin_diff);

            if use_colors {
                let change = match s.change {
                    Some(n) if n > 0 => change.green().to_string(),
                    Some(n) if n < 0 => change.red().to_string(),
                    _ => change.dimmed().to_string(),
                };
                format!(
                    "{} {}  {}  {}  {}  {}  {}",
                    rank.dimmed(),
                    change,
                    name.cyan(),
                    points.bold(),
                    correct,
                    accuracy,
                    margin.dimmed()
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}  {}  {}",
                    rank, change, name, points, correct, accuracy, margin
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format standings as tab-separated values for scripting
/// Columns: rank, user_id, username, points, correct, decided, accuracy, margin_diff, change
pub fn format_tsv(standings: &[UserStanding]) -> String {
    standings
        .iter()
        .map(|s| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{:.1}\t{}\t{}",
                s.rank,
                s.user_id,
                s.username,
                s.total_points,
                s.total_correct,
                s.total_decided,
                s.accuracy,
                s.total_margin_diff,
                s.change.map(|c| c.to_string()).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_round_summary(summary: &RoundSummary, use_colors: bool) -> String {
    let title = format!("Round {}", summary.round);
    let title = if use_colors {
        title.bold().to_string()
    } else {
        title
    };
    format!(
        "{}\n  Games: {} ({} completed)\n  Tippers: {}\n  Average score: {:.2}\n  Perfect rounds: {}",
        title,
        summary.total_games,
        summary.completed_games,
        summary.participants,
        summary.average_score,
        summary.perfect_rounds
    )
}

/// One line describing where `user_id`'s margin prediction places on `game`
pub fn format_margin_rank(game: &Game, tips: &[Tip], user_id: &str) -> String {
    match margin_rank(game, tips, user_id) {
        Some(rank) => {
            let with_margin = tips
                .iter()
                .filter(|t| t.game_id == game.id && t.margin.is_some())
                .count();
            format!("{} ranks {} of {} on game {}", user_id, rank, with_margin, game.id)
        }
        None if game.actual_margin().is_none() => {
            format!("Game {} has no final score yet", game.id)
        }
        None => format!("{} made no margin prediction for game {}", user_id, game.id),
    }
}

pub fn format_recalculation(recalc: &Recalculation, updated: usize) -> String {
    let decided = recalc.tips.iter().filter(|s| s.is_correct.is_some()).count();
    let bonus_points: i64 = recalc.bonuses.iter().map(|b| i64::from(b.points)).sum();
    format!(
        "Recalculated {} tips ({} decided, {} updated)\n  Round bonuses: {} ({} points)\n  Total points: {}",
        recalc.tips.len(),
        decided,
        updated,
        recalc.bonuses.len(),
        bonus_points,
        recalc.total_points()
    )
}
