//! Scoring and leaderboard engine for AFL tipping competitions.
//!
//! Tips plus game results go in; per-tip points, round results, ranked
//! standings and rank changes come out. Everything under [`scoring`],
//! [`round`] and [`leaderboard`] is a pure function of its arguments.
//! Fetching and storing data goes through [`store::CompetitionSource`].

pub mod config;
pub mod leaderboard;
pub mod model;
pub mod output;
pub mod recalc;
pub mod round;
pub mod scoring;
pub mod store;
