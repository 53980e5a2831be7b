//! Read-only views of a match for the presentation layer.

use crate::models::{BatterRecord, BowlerFigures, Innings, MatchPhase, MatchResult, MatchState};
use serde::Serialize;

/// Runs per over in the latest innings; 0 before a legal ball.
pub fn current_run_rate(state: &MatchState) -> f64 {
    state.current_innings().map(Innings::run_rate).unwrap_or(0.0)
}

/// Runs per over still needed in a chase. None outside a chase, 0 once no balls remain.
pub fn required_run_rate(state: &MatchState) -> Option<f64> {
    let innings = state.open_innings()?;
    let target = innings.target?;
    let needed = target.saturating_sub(innings.runs);
    let balls = innings.balls_remaining();
    if balls == 0 {
        return Some(0.0);
    }
    Some(needed as f64 * 6.0 / balls as f64)
}

/// Runs still needed in a chase.
pub fn runs_required(state: &MatchState) -> Option<u32> {
    let innings = state.open_innings()?;
    innings.target.map(|t| t.saturating_sub(innings.runs))
}

/// Result text, or "Match in progress".
pub fn result_text(state: &MatchState) -> String {
    state.result_text()
}

/// Short summary of one innings.
#[derive(Clone, Debug, Serialize)]
pub struct InningsLine {
    pub team: String,
    pub score: String,
    pub overs: String,
    pub sealed: bool,
}

impl From<&Innings> for InningsLine {
    fn from(innings: &Innings) -> Self {
        Self {
            team: innings.team.clone(),
            score: innings.score_line(),
            overs: innings.overs_display(),
            sealed: innings.is_sealed(),
        }
    }
}

/// Everything a scoring screen needs after each call.
#[derive(Clone, Debug, Serialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub batting_team: Option<String>,
    pub bowling_team: Option<String>,
    pub score: String,
    pub overs: String,
    pub target: Option<u32>,
    pub runs_required: Option<u32>,
    pub run_rate: f64,
    pub required_run_rate: Option<f64>,
    pub striker: Option<BatterRecord>,
    pub non_striker: Option<BatterRecord>,
    pub bowler: Option<BowlerFigures>,
    pub pending_batters: Vec<String>,
    pub eligible_bowlers: Vec<String>,
    pub innings: Vec<InningsLine>,
    pub result: Option<MatchResult>,
    pub result_text: String,
}

pub fn snapshot(state: &MatchState) -> MatchSnapshot {
    let current = state.current_innings();
    MatchSnapshot {
        phase: state.phase(),
        batting_team: state.batting_team().map(|t| t.name.clone()),
        bowling_team: state.fielding_team().map(|t| t.name.clone()),
        score: current.map(Innings::score_line).unwrap_or_default(),
        overs: current.map(Innings::overs_display).unwrap_or_default(),
        target: state.target(),
        runs_required: runs_required(state),
        run_rate: current_run_rate(state),
        required_run_rate: required_run_rate(state),
        striker: state.striker().cloned(),
        non_striker: state.non_striker().cloned(),
        bowler: state.bowler().cloned(),
        pending_batters: state.pending_batters().into_iter().map(String::from).collect(),
        eligible_bowlers: state.eligible_bowlers().into_iter().map(String::from).collect(),
        innings: state.innings.iter().map(InningsLine::from).collect(),
        result: state.result,
        result_text: state.result_text(),
    }
}
