use crate::model::{Game, Tip, UserId};

/// 1-based margin ranks for every tip on `game` that predicted a margin,
/// closest first. Equal errors keep their input order.
///
/// Empty until the game is complete with both scores recorded.
pub fn margin_ranks(game: &Game, tips: &[Tip]) -> Vec<(UserId, u32)> {
    if game.actual_margin().is_none() {
        return Vec::new();
    }

    let mut errors: Vec<(&Tip, u32)> = tips
        .iter()
        .filter(|tip| tip.game_id == game.id)
        .filter_map(|tip| tip.margin_error(game).map(|err| (tip, err)))
        .collect();

    // sort_by_key is stable
    errors.sort_by_key(|(_, err)| *err);

    errors
        .into_iter()
        .enumerate()
        .map(|(idx, (tip, _))| (tip.user_id.clone(), idx as u32 + 1))
        .collect()
}

/// Where `user_id`'s margin prediction places among all tips on `game`.
/// `None` if the game has no final margin yet or the user gave no margin.
pub fn margin_rank(game: &Game, tips: &[Tip], user_id: &str) -> Option<u32> {
    margin_ranks(game, tips)
        .into_iter()
        .find(|(user, _)| user == user_id)
        .map(|(_, rank)| rank)
}
