use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type CompetitionId = String;
pub type GameId = u64;
pub type TeamId = u32;

/// A fixture between two teams. Read-only to the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub round: u32,
    pub home_team: TeamId,
    pub away_team: TeamId,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub home_score: Option<i32>,
    #[serde(default)]
    pub away_score: Option<i32>,
    #[serde(default)]
    pub winner: Option<TeamId>,
}

impl Game {
    /// Create a scheduled (not yet played) game
    pub fn scheduled(id: GameId, round: u32, home_team: TeamId, away_team: TeamId) -> Self {
        Self {
            id,
            round,
            home_team,
            away_team,
            is_complete: false,
            home_score: None,
            away_score: None,
            winner: None,
        }
    }

    /// Record a final score. Equal scores are a draw and leave `winner` unset.
    pub fn final_result(mut self, home_score: i32, away_score: i32) -> Self {
        self.is_complete = true;
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self.winner = if home_score > away_score {
            Some(self.home_team)
        } else if away_score > home_score {
            Some(self.away_team)
        } else {
            None
        };
        self
    }

    /// Complete with a known winner that can be scored against
    pub fn is_decided(&self) -> bool {
        self.is_complete && self.winner.is_some()
    }

    /// Absolute final margin, once the game is complete and both scores are in
    pub fn actual_margin(&self) -> Option<u32> {
        if !self.is_complete {
            return None;
        }
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some(home.abs_diff(away)),
            _ => None,
        }
    }
}

/// One user's prediction for one game in one competition.
///
/// `points`, `is_correct`, `margin_accuracy` and `margin_rank` are computed
/// values: recalculation overwrites them, it never adds to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub user_id: UserId,
    pub game_id: GameId,
    pub competition_id: CompetitionId,
    pub predicted_winner: TeamId,
    #[serde(default)]
    pub margin: Option<i32>,
    #[serde(default)]
    pub confidence: Option<u32>,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub margin_accuracy: Option<u32>,
    #[serde(default)]
    pub margin_rank: Option<u32>,
}

impl Tip {
    pub fn new(
        user_id: impl Into<UserId>,
        game_id: GameId,
        competition_id: impl Into<CompetitionId>,
        predicted_winner: TeamId,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            game_id,
            competition_id: competition_id.into(),
            predicted_winner,
            margin: None,
            confidence: None,
            points: 0,
            is_correct: None,
            margin_accuracy: None,
            margin_rank: None,
        }
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_confidence(mut self, confidence: u32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Whether this tip and `other` occupy the same (user, game, competition) slot
    pub fn same_slot(&self, other: &Tip) -> bool {
        self.user_id == other.user_id
            && self.game_id == other.game_id
            && self.competition_id == other.competition_id
    }

    /// Same pick, margin and confidence as `other`
    pub fn same_prediction(&self, other: &Tip) -> bool {
        self.predicted_winner == other.predicted_winner
            && self.margin == other.margin
            && self.confidence == other.confidence
    }

    /// Drop every computed value
    pub fn clear_scores(&mut self) {
        self.points = 0;
        self.is_correct = None;
        self.margin_accuracy = None;
        self.margin_rank = None;
    }

    /// Absolute difference between the predicted and actual margin
    pub fn margin_error(&self, game: &Game) -> Option<u32> {
        let predicted = self.margin?.unsigned_abs();
        let actual = game.actual_margin()?;
        Some(actual.abs_diff(predicted))
    }
}

/// Minimal user fields needed for leaderboard display and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Member {
    pub fn new(user_id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            avatar: None,
        }
    }
}

/// A tip joined with its game and the member who made it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRecord {
    pub tip: Tip,
    pub game: Game,
    pub member: Member,
}

impl TipRecord {
    pub fn new(tip: Tip, game: Game, member: Member) -> Self {
        Self { tip, game, member }
    }

    pub fn round(&self) -> u32 {
        self.game.round
    }

    /// Correctness of the winner pick; `None` until the game is decided
    pub fn is_correct(&self) -> Option<bool> {
        if !self.game.is_decided() {
            return None;
        }
        self.game.winner.map(|winner| winner == self.tip.predicted_winner)
    }
}
