//! Integration tests for innings transitions: all out, the chase, results, super overs,
//! last man stands, declarations and retirements.

use approx::assert_relative_eq;
use cricket_scorer_web::logic::{
    declare_innings, record_delivery, required_run_rate, retire_batter, runs_required,
    select_batter, select_bowler, select_openers, snapshot, Outcome,
};
use cricket_scorer_web::models::{
    DismissalKind, InningsEnd, InningsKind, InvalidSelection, Margin, MatchError, MatchFormat,
    MatchPhase, MatchResult, MatchSetup, MatchState, TeamSheet, TeamSide,
};

fn sheet(name: &str, prefix: &str, n: usize) -> TeamSheet {
    TeamSheet::new(name, (1..=n).map(|i| format!("{prefix}{i}")))
}

fn setup_with(players: usize, overs: u32) -> MatchSetup {
    MatchSetup::new(sheet("Lions", "L", players), sheet("Tigers", "T", players))
        .with_format(MatchFormat::Custom)
        .with_overs(overs)
}

/// Opening pair for whichever side is batting.
fn open(state: &mut MatchState) {
    let prefix = if state.batting_side() == Some(TeamSide::One) { "L" } else { "T" };
    select_openers(state, &format!("{prefix}1"), &format!("{prefix}2")).unwrap();
}

/// Record a delivery, first picking the next eligible bowler if an over just ended.
fn deliver(state: &mut MatchState, outcome: Outcome) {
    if state.phase() == MatchPhase::AwaitingBowler {
        let next = state.eligible_bowlers()[0].to_string();
        select_bowler(state, &next).unwrap();
    }
    record_delivery(state, outcome).unwrap();
}

fn dots(state: &mut MatchState, n: usize) {
    for _ in 0..n {
        deliver(state, Outcome::runs(0));
    }
}

#[test]
fn two_wickets_bowl_out_a_three_player_side() {
    let mut state = MatchState::new(setup_with(3, 20)).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::runs(2));
    deliver(&mut state, Outcome::wicket(DismissalKind::Bowled));
    select_batter(&mut state, "L3").unwrap();
    deliver(&mut state, Outcome::wicket(DismissalKind::Lbw));

    let first = &state.innings[0];
    assert_eq!(first.end, Some(InningsEnd::AllOut));
    assert_eq!(first.score_line(), "2/2");
    assert_eq!(first.dismissed().count(), 2);
    assert!(state.result.is_none());

    let chase = &state.innings[1];
    assert_eq!(chase.batting, TeamSide::Two);
    assert_eq!(chase.target, Some(3));
    assert_eq!(state.phase(), MatchPhase::AwaitingBatters);
    assert_eq!(state.result_text(), "Match in progress");
}

#[test]
fn chase_ends_the_moment_the_target_is_passed() {
    let mut state = MatchState::new(setup_with(11, 5)).unwrap();
    open(&mut state);
    for _ in 0..25 {
        deliver(&mut state, Outcome::six());
    }
    dots(&mut state, 5);
    assert_eq!(state.innings[0].end, Some(InningsEnd::OversCompleted));
    assert_eq!(state.target(), Some(151));

    open(&mut state);
    for _ in 0..24 {
        deliver(&mut state, Outcome::six());
    }
    deliver(&mut state, Outcome::runs(3));
    assert_eq!(runs_required(&state), Some(4));
    deliver(&mut state, Outcome::four());

    let chase = &state.innings[1];
    assert_eq!(chase.end, Some(InningsEnd::TargetReached));
    assert_eq!(chase.runs, 151);
    assert_eq!(chase.overs_display(), "4.2");
    assert_eq!(
        state.result,
        Some(MatchResult::Won {
            winner: TeamSide::Two,
            margin: Margin::Wickets(10),
            super_over: false,
        })
    );
    assert_eq!(state.result_text(), "Tigers won by 10 wickets");
    assert_eq!(state.phase(), MatchPhase::Completed);
    assert!(matches!(
        record_delivery(&mut state, Outcome::runs(1)),
        Err(MatchError::NotReady(MatchPhase::Completed))
    ));
}

#[test]
fn defending_side_wins_by_runs() {
    let mut state = MatchState::new(setup_with(11, 1)).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::four());
    deliver(&mut state, Outcome::six());
    dots(&mut state, 4);

    open(&mut state);
    deliver(&mut state, Outcome::runs(1));
    deliver(&mut state, Outcome::runs(3));
    dots(&mut state, 4);

    assert_eq!(state.innings[1].end, Some(InningsEnd::OversCompleted));
    assert_eq!(state.result_text(), "Lions won by 6 runs");
}

#[test]
fn required_rate_tracks_the_chase() {
    let mut state = MatchState::new(setup_with(11, 2)).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::six());
    dots(&mut state, 5);
    assert!(required_run_rate(&state).is_none());
    dots(&mut state, 6);

    open(&mut state);
    assert_eq!(runs_required(&state), Some(7));
    assert_relative_eq!(required_run_rate(&state).unwrap(), 3.5);
    dots(&mut state, 6);
    assert_relative_eq!(required_run_rate(&state).unwrap(), 7.0);

    let view = snapshot(&state);
    assert_eq!(view.batting_team.as_deref(), Some("Tigers"));
    assert_eq!(view.score, "0/0");
    assert_eq!(view.overs, "1.0");
    assert_eq!(view.target, Some(7));
    assert_eq!(view.phase, MatchPhase::AwaitingBowler);
}

#[test]
fn tie_without_super_over() {
    let mut state = MatchState::new(setup_with(3, 1)).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::six());
    dots(&mut state, 5);
    open(&mut state);
    deliver(&mut state, Outcome::six());
    dots(&mut state, 5);

    assert_eq!(state.result, Some(MatchResult::Tied));
    assert_eq!(state.result_text(), "Match tied");
}

#[test]
fn super_over_decides_a_tie() {
    let setup = setup_with(3, 1).with_super_over(true, false);
    let mut state = MatchState::new(setup).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::six());
    dots(&mut state, 5);
    open(&mut state);
    deliver(&mut state, Outcome::six());
    dots(&mut state, 5);

    assert!(state.result.is_none());
    let super_over = &state.innings[2];
    assert_eq!(super_over.kind, InningsKind::SuperOver);
    assert_eq!(super_over.batting, TeamSide::Two);
    assert_eq!(super_over.over_limit, 1);
    assert_eq!(super_over.wicket_limit, 2);

    open(&mut state);
    deliver(&mut state, Outcome::four());
    dots(&mut state, 5);
    assert_eq!(state.target(), Some(5));

    open(&mut state);
    deliver(&mut state, Outcome::six());
    assert_eq!(state.result_text(), "Lions won the super over by 2 wickets");
    assert_eq!(state.innings.len(), 4);
}

#[test]
fn tied_super_over_goes_to_boundary_count() {
    let setup = setup_with(3, 1).with_super_over(true, true);
    let mut state = MatchState::new(setup).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::runs(6));
    dots(&mut state, 5);
    open(&mut state);
    deliver(&mut state, Outcome::six());
    dots(&mut state, 5);

    open(&mut state);
    deliver(&mut state, Outcome::four());
    dots(&mut state, 5);
    open(&mut state);
    deliver(&mut state, Outcome::four());
    dots(&mut state, 5);

    assert_eq!(
        state.result,
        Some(MatchResult::Won {
            winner: TeamSide::Two,
            margin: Margin::Boundaries { winner: 2, loser: 1 },
            super_over: true,
        })
    );
    assert_eq!(state.result_text(), "Tigers won on boundary count (2 to 1)");
}

#[test]
fn last_man_stands_lets_the_survivor_bat_alone() {
    let setup = setup_with(2, 5).with_last_man_stands(true);
    let mut state = MatchState::new(setup).unwrap();
    assert_eq!(state.setup.wicket_limit(), 2);
    open(&mut state);
    deliver(&mut state, Outcome::wicket(DismissalKind::Bowled));

    assert_eq!(state.phase(), MatchPhase::InProgress);
    assert_eq!(state.striker().unwrap().name, "L2");
    assert!(state.non_striker().is_none());
    deliver(&mut state, Outcome::runs(1));
    assert_eq!(state.striker().unwrap().name, "L2");

    deliver(&mut state, Outcome::wicket(DismissalKind::Bowled));
    assert_eq!(state.innings[0].end, Some(InningsEnd::AllOut));
    assert_eq!(state.innings[0].score_line(), "1/2");
}

#[test]
fn without_last_man_stands_one_wicket_ends_a_pair() {
    let mut state = MatchState::new(setup_with(2, 5)).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::wicket(DismissalKind::Bowled));
    assert_eq!(state.innings[0].end, Some(InningsEnd::AllOut));
    assert_eq!(state.innings.len(), 2);
}

#[test]
fn declaration_closes_the_innings_when_allowed() {
    let mut state = MatchState::new(setup_with(11, 20)).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::four());
    assert!(matches!(
        declare_innings(&mut state),
        Err(MatchError::DeclarationNotAllowed)
    ));

    let setup = setup_with(11, 20).with_declarations(true);
    let mut state = MatchState::new(setup).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::four());
    declare_innings(&mut state).unwrap();
    assert_eq!(state.innings[0].end, Some(InningsEnd::Declared));
    assert_eq!(state.target(), Some(5));
    assert_eq!(state.batting_side(), Some(TeamSide::Two));
}

#[test]
fn retired_batter_is_replaced_and_cannot_return() {
    let mut state = MatchState::new(setup_with(3, 20)).unwrap();
    open(&mut state);
    deliver(&mut state, Outcome::runs(2));
    retire_batter(&mut state, "L1").unwrap();
    assert_eq!(state.phase(), MatchPhase::AwaitingBatter);
    assert_eq!(state.innings[0].batter("L1").unwrap().status(), "retired not out");

    assert!(matches!(
        select_batter(&mut state, "L1"),
        Err(MatchError::InvalidSelection(InvalidSelection::AlreadyRetired(_)))
    ));
    select_batter(&mut state, "L3").unwrap();
    assert_eq!(state.striker().unwrap().name, "L3");

    assert!(matches!(
        retire_batter(&mut state, "L2"),
        Err(MatchError::InvalidSelection(InvalidSelection::NoReplacement))
    ));
    assert!(matches!(
        retire_batter(&mut state, "L1"),
        Err(MatchError::InvalidSelection(InvalidSelection::NotBatting(_)))
    ));
}
