//! Innings transitions: sealing, the chase, super overs, declarations and the final result.

use crate::models::{
    Crease, Innings, InningsEnd, InningsKind, Margin, MatchError, MatchPhase, MatchResult,
    MatchState,
};
use std::cmp::Ordering;

/// Overs in a super over.
const SUPER_OVER_OVERS: u32 = 1;
/// Wickets that end a super over innings.
const SUPER_OVER_WICKETS: u32 = 2;

/// Whether the open innings has just ended, and why.
///
/// Checked in order: all out, overs used up, target passed, nobody left to bat.
pub(crate) fn innings_over(state: &MatchState) -> Option<InningsEnd> {
    let innings = state.open_innings()?;
    if innings.wickets >= innings.wicket_limit {
        return Some(InningsEnd::AllOut);
    }
    if innings.legal_balls >= innings.over_limit.saturating_mul(6) {
        return Some(InningsEnd::OversCompleted);
    }
    if let Some(target) = innings.target {
        if innings.runs >= target {
            return Some(InningsEnd::TargetReached);
        }
    }
    let live = state.crease.live_batters().count();
    let openers_in = innings.batters.len() >= 2;
    let lone_allowed = state.setup.last_man_stands && live == 1;
    if openers_in && live < 2 && !lone_allowed && state.pending_batters().is_empty() {
        return Some(InningsEnd::AllOut);
    }
    None
}

/// Seal the open innings and move the match on: start the chase, a super over, or finish.
pub(crate) fn seal_innings(state: &mut MatchState, end: InningsEnd) {
    let Some(innings) = state.innings.last_mut() else {
        return;
    };
    innings.end = Some(end);
    log::info!(
        "Innings closed: {} {} ({} overs), {:?}",
        innings.team,
        innings.score_line(),
        innings.overs_display(),
        end
    );
    state.crease = Crease::default();

    // Innings come in pairs: the second of each pair chases the first.
    if state.innings.len() % 2 == 1 {
        start_chase(state);
    } else {
        settle_pair(state);
    }
}

fn start_chase(state: &mut MatchState) {
    let Some(first) = state.innings.last() else {
        return;
    };
    let batting = first.batting.opponent();
    let target = first.runs.saturating_add(1);
    let chase = Innings::new(
        batting,
        state.setup.team(batting).name.clone(),
        first.kind,
        first.over_limit,
        first.wicket_limit,
        Some(target),
    );
    log::info!("{} need {} to win", chase.team, target);
    state.innings.push(chase);
}

fn settle_pair(state: &mut MatchState) {
    let n = state.innings.len();
    if n < 2 {
        return;
    }
    let defending = &state.innings[n - 2];
    let chasing = &state.innings[n - 1];
    let super_over = chasing.kind == InningsKind::SuperOver;

    let result = match chasing.runs.cmp(&defending.runs) {
        Ordering::Greater => MatchResult::Won {
            winner: chasing.batting,
            margin: Margin::Wickets(chasing.wicket_limit.saturating_sub(chasing.wickets)),
            super_over,
        },
        Ordering::Less => MatchResult::Won {
            winner: defending.batting,
            margin: Margin::Runs(defending.runs - chasing.runs),
            super_over,
        },
        Ordering::Equal => {
            if !super_over && state.setup.super_over_on_tie {
                start_super_over(state);
                return;
            }
            tie_result(state, super_over)
        }
    };
    finish(state, result);
}

/// Scores level: boundary countback after a super over when enabled, otherwise a tie.
fn tie_result(state: &MatchState, super_over: bool) -> MatchResult {
    if !(super_over && state.setup.boundary_countback) {
        return MatchResult::Tied;
    }
    let Some(last) = state.innings.last() else {
        return MatchResult::Tied;
    };
    let side = last.batting;
    let ours = state.boundaries_for(side);
    let theirs = state.boundaries_for(side.opponent());
    match ours.cmp(&theirs) {
        Ordering::Greater => MatchResult::Won {
            winner: side,
            margin: Margin::Boundaries {
                winner: ours,
                loser: theirs,
            },
            super_over: true,
        },
        Ordering::Less => MatchResult::Won {
            winner: side.opponent(),
            margin: Margin::Boundaries {
                winner: theirs,
                loser: ours,
            },
            super_over: true,
        },
        Ordering::Equal => MatchResult::Tied,
    }
}

/// The side that batted second bats first in the super over.
fn start_super_over(state: &mut MatchState) {
    let Some(last) = state.innings.last() else {
        return;
    };
    let batting = last.batting;
    let wickets = state.setup.wicket_limit().min(SUPER_OVER_WICKETS);
    log::info!("Scores level, super over: {} bat first", state.setup.team(batting).name);
    let innings = Innings::new(
        batting,
        state.setup.team(batting).name.clone(),
        InningsKind::SuperOver,
        SUPER_OVER_OVERS,
        wickets,
        None,
    );
    state.innings.push(innings);
}

fn finish(state: &mut MatchState, result: MatchResult) {
    state.result = Some(result);
    log::info!("Result: {}", result.describe(&state.setup));
}

/// Close the open innings early. Counts as overs completed when the result is worked out.
pub fn declare_innings(state: &mut MatchState) -> Result<(), MatchError> {
    if !state.setup.allow_declaration {
        return Err(MatchError::DeclarationNotAllowed);
    }
    let phase = state.phase();
    if phase == MatchPhase::Completed {
        return Err(MatchError::NotReady(phase));
    }
    seal_innings(state, InningsEnd::Declared);
    Ok(())
}
