//! Fixture results: points table, knockout progression, and engine hand-off.

use crate::logic::fantasy::{match_fantasy_points, merge_fantasy_points};
use crate::logic::schedule::place_winner;
use crate::models::{
    FixtureId, FixtureResult, FixtureStatus, InningsEnd, InningsKind, InningsSummary,
    MatchFormat, MatchSetup, MatchState, TeamSide, Tournament, TournamentError, TournamentFormat,
    TournamentStatus,
};

const WIN_POINTS: u32 = 2;
const TIE_POINTS: u32 = 1;
const NO_RESULT_POINTS: u32 = 1;

/// Build the match setup for a fixture: team one bats first, tournament overs, declarations on.
/// Knockout fixtures go to a super over (then boundary count) on a tie.
pub fn match_setup_for_fixture(
    tournament: &Tournament,
    fixture_id: FixtureId,
) -> Result<MatchSetup, TournamentError> {
    let fixture = tournament
        .fixture(fixture_id)
        .ok_or(TournamentError::FixtureNotFound(fixture_id))?;
    let (Some(team_1), Some(team_2)) = (&fixture.team_1, &fixture.team_2) else {
        return Err(TournamentError::FixtureNotReady(fixture_id));
    };
    let sheet = |name: &String| {
        tournament
            .team(name)
            .cloned()
            .ok_or_else(|| TournamentError::UnknownTeam(name.clone()))
    };
    let knockout = tournament.format == TournamentFormat::Knockout;
    let setup = MatchSetup::new(sheet(team_1)?, sheet(team_2)?)
        .with_format(MatchFormat::Custom)
        .with_overs(tournament.overs)
        .with_last_man_stands(tournament.last_man_stands)
        .with_toss(TeamSide::One, TeamSide::One)
        .with_declarations(true)
        .with_super_over(knockout, knockout);
    Ok(setup)
}

/// Mark a fixture as being played and hand back its match setup.
pub fn start_fixture(
    tournament: &mut Tournament,
    fixture_id: FixtureId,
) -> Result<MatchSetup, TournamentError> {
    if tournament.status != TournamentStatus::Ongoing {
        return Err(TournamentError::InvalidState);
    }
    let setup = match_setup_for_fixture(tournament, fixture_id)?;
    let fixture = tournament
        .fixture_mut(fixture_id)
        .ok_or(TournamentError::FixtureNotFound(fixture_id))?;
    if fixture.status == FixtureStatus::Completed {
        return Err(TournamentError::FixtureAlreadyCompleted(fixture_id));
    }
    fixture.status = FixtureStatus::Ongoing;
    Ok(setup)
}

/// Balls charged for net run rate: an all-out side is charged its full quota.
fn nrr_balls(summary: &InningsSummary, overs: u32) -> u32 {
    if summary.all_out {
        overs.saturating_mul(6)
    } else {
        summary.legal_balls
    }
}

/// Record a fixture result: points table, knockout progression, tournament completion.
pub fn record_fixture_result(
    tournament: &mut Tournament,
    fixture_id: FixtureId,
    result: FixtureResult,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Ongoing {
        return Err(TournamentError::InvalidState);
    }
    let knockout = tournament.format == TournamentFormat::Knockout;
    let overs = tournament.overs;
    let fixture = tournament
        .fixture(fixture_id)
        .ok_or(TournamentError::FixtureNotFound(fixture_id))?;
    if fixture.status == FixtureStatus::Completed {
        return Err(TournamentError::FixtureAlreadyCompleted(fixture_id));
    }
    let (Some(team_1), Some(team_2)) = (fixture.team_1.clone(), fixture.team_2.clone()) else {
        return Err(TournamentError::FixtureNotReady(fixture_id));
    };
    if knockout && (result.winner.is_none() || result.no_result) {
        return Err(TournamentError::KnockoutNeedsWinner);
    }
    if let Some(winner) = &result.winner {
        if !fixture.involves(winner) {
            return Err(TournamentError::TeamNotInFixture(winner.clone()));
        }
    }
    let (round, slot) = (fixture.round, fixture.slot);
    for team in [&team_1, &team_2] {
        if tournament.standing(team).is_none() {
            return Err(TournamentError::UnknownTeam(team.clone()));
        }
    }

    for (me, opponent, mine, theirs) in [
        (&team_1, &team_2, result.team_1_innings, result.team_2_innings),
        (&team_2, &team_1, result.team_2_innings, result.team_1_innings),
    ] {
        let Some(standing) = tournament.standing_mut(me) else {
            return Err(TournamentError::UnknownTeam(me.clone()));
        };
        standing.played += 1;
        match &result.winner {
            _ if result.no_result => {
                standing.no_result += 1;
                standing.points += NO_RESULT_POINTS;
            }
            Some(w) if w == me => {
                standing.won += 1;
                standing.points += WIN_POINTS;
            }
            Some(w) if w == opponent => standing.lost += 1,
            _ => {
                standing.tied += 1;
                standing.points += TIE_POINTS;
            }
        }
        if result.no_result {
            continue;
        }
        if let (Some(mine), Some(theirs)) = (mine, theirs) {
            standing.runs_for = standing.runs_for.saturating_add(mine.runs);
            standing.balls_faced = standing.balls_faced.saturating_add(nrr_balls(&mine, overs));
            standing.runs_against = standing.runs_against.saturating_add(theirs.runs);
            standing.balls_bowled = standing.balls_bowled.saturating_add(nrr_balls(&theirs, overs));
        }
    }

    if knockout {
        if let (Some(round), Some(winner)) = (round, result.winner.clone()) {
            place_winner(&mut tournament.fixtures, round, slot, winner);
        }
    }

    if let Some(fixture) = tournament.fixture_mut(fixture_id) {
        fixture.status = FixtureStatus::Completed;
        fixture.result = Some(result);
    }
    log::info!("Fixture {} v {} recorded", team_1, team_2);

    if tournament
        .fixtures
        .iter()
        .all(|f| f.status == FixtureStatus::Completed)
    {
        tournament.status = TournamentStatus::Completed;
        log::info!("Tournament {} completed", tournament.name);
    }
    Ok(())
}

/// Turn a finished engine match into a fixture result and add its fantasy points.
pub fn complete_fixture_from_match(
    tournament: &mut Tournament,
    fixture_id: FixtureId,
    state: &MatchState,
) -> Result<(), TournamentError> {
    let outcome = state.result.ok_or(TournamentError::MatchNotFinished)?;
    let fixture = tournament
        .fixture(fixture_id)
        .ok_or(TournamentError::FixtureNotFound(fixture_id))?;
    let side_of = |name: &Option<String>| -> Result<TeamSide, TournamentError> {
        let name = name.as_deref().unwrap_or_default();
        if state.setup.team_1.name == name {
            Ok(TeamSide::One)
        } else if state.setup.team_2.name == name {
            Ok(TeamSide::Two)
        } else {
            Err(TournamentError::TeamNotInFixture(name.to_string()))
        }
    };
    let side_1 = side_of(&fixture.team_1)?;
    let side_2 = side_of(&fixture.team_2)?;

    let regular = |side: TeamSide| {
        state
            .innings
            .iter()
            .find(|i| i.batting == side && i.kind == InningsKind::Regular)
    };
    let score = |side: TeamSide| {
        regular(side)
            .map(|i| format!("{} ({})", i.score_line(), i.overs_display()))
            .unwrap_or_default()
    };
    let summary = |side: TeamSide| {
        regular(side).map(|i| InningsSummary {
            runs: i.runs,
            wickets: i.wickets,
            legal_balls: i.legal_balls,
            all_out: i.end == Some(InningsEnd::AllOut),
        })
    };

    let result = FixtureResult {
        winner: outcome.winner().map(|w| state.setup.team(w).name.clone()),
        no_result: false,
        team_1_score: score(side_1),
        team_2_score: score(side_2),
        margin: outcome.margin_text(),
        team_1_innings: summary(side_1),
        team_2_innings: summary(side_2),
    };
    record_fixture_result(tournament, fixture_id, result)?;
    merge_fantasy_points(&mut tournament.fantasy, &match_fantasy_points(state));
    Ok(())
}
