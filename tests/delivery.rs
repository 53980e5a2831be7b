//! Integration tests for ball-by-ball scoring: runs, strike rotation, extras and wickets.

use approx::assert_relative_eq;
use cricket_scorer_web::logic::{record_delivery, select_batter, select_bowler, select_openers, Outcome};
use cricket_scorer_web::models::{
    ConfigInvalid, DismissalKind, ExtraKind, InvalidSelection, MatchError, MatchFormat, MatchPhase,
    MatchSetup, MatchState, TeamSheet, MAX_OVERS,
};

fn sheet(name: &str, prefix: &str, n: usize) -> TeamSheet {
    TeamSheet::new(name, (1..=n).map(|i| format!("{prefix}{i}")))
}

fn setup_with(players: usize, overs: u32) -> MatchSetup {
    MatchSetup::new(sheet("Lions", "L", players), sheet("Tigers", "T", players))
        .with_format(MatchFormat::Custom)
        .with_overs(overs)
}

/// Lions batting with L1 on strike, L2 at the other end, T1 bowling.
fn ready_match(players: usize, overs: u32) -> MatchState {
    let mut state = MatchState::new(setup_with(players, overs)).unwrap();
    select_openers(&mut state, "L1", "L2").unwrap();
    select_bowler(&mut state, "T1").unwrap();
    state
}

fn striker(state: &MatchState) -> String {
    state.striker().map(|b| b.name.clone()).unwrap_or_default()
}

#[test]
fn new_match_waits_for_openers_then_bowler() {
    let mut state = MatchState::new(setup_with(11, 20)).unwrap();
    assert_eq!(state.phase(), MatchPhase::AwaitingBatters);
    assert!(matches!(
        record_delivery(&mut state, Outcome::runs(1)),
        Err(MatchError::NotReady(MatchPhase::AwaitingBatters))
    ));
    select_batter(&mut state, "L1").unwrap();
    assert_eq!(state.phase(), MatchPhase::AwaitingBatters);
    select_batter(&mut state, "L2").unwrap();
    assert_eq!(state.phase(), MatchPhase::AwaitingBowler);
    select_bowler(&mut state, "T1").unwrap();
    assert_eq!(state.phase(), MatchPhase::InProgress);
    assert_eq!(striker(&state), "L1");
}

#[test]
fn six_singles_leave_the_original_non_striker_on_strike() {
    let mut state = ready_match(11, 2);
    for _ in 0..6 {
        record_delivery(&mut state, Outcome::runs(1)).unwrap();
    }
    let innings = state.current_innings().unwrap();
    assert_eq!(innings.runs, 6);
    assert_eq!(innings.overs_display(), "1.0");
    assert_eq!(striker(&state), "L2");
    assert_eq!(state.phase(), MatchPhase::AwaitingBowler);
    assert!(state.bowler().is_none());
}

#[test]
fn even_runs_keep_strike_and_odd_runs_rotate() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::runs(2)).unwrap();
    assert_eq!(striker(&state), "L1");
    record_delivery(&mut state, Outcome::runs(3)).unwrap();
    assert_eq!(striker(&state), "L2");
    record_delivery(&mut state, Outcome::four()).unwrap();
    assert_eq!(striker(&state), "L2");

    let innings = state.current_innings().unwrap();
    let l1 = innings.batter("L1").unwrap();
    assert_eq!(l1.runs, 5);
    assert_eq!(l1.balls, 2);
    let l2 = innings.batter("L2").unwrap();
    assert_eq!(l2.fours, 1);
    assert_eq!(innings.boundaries(), 1);
}

#[test]
fn wide_adds_a_run_without_using_a_ball() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::extra(ExtraKind::Wide, 1)).unwrap();

    let innings = state.current_innings().unwrap();
    assert_eq!(innings.runs, 1);
    assert_eq!(innings.legal_balls, 0);
    assert_eq!(innings.extras.wides, 1);
    let l1 = innings.batter("L1").unwrap();
    assert_eq!(l1.runs, 0);
    assert_eq!(l1.balls, 0);
    assert_eq!(striker(&state), "L1");
    let bowler = state.bowler().unwrap();
    assert_eq!(bowler.runs, 1);
    assert_eq!(bowler.wides, 1);
}

#[test]
fn wide_that_was_run_once_changes_ends() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::extra(ExtraKind::Wide, 2)).unwrap();
    assert_eq!(striker(&state), "L2");
    assert_eq!(state.current_innings().unwrap().runs, 2);
}

#[test]
fn byes_are_legal_and_not_charged_to_the_bowler() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::extra(ExtraKind::LegBye, 1)).unwrap();

    let innings = state.current_innings().unwrap();
    assert_eq!(innings.runs, 1);
    assert_eq!(innings.legal_balls, 1);
    assert_eq!(innings.extras.leg_byes, 1);
    assert_eq!(innings.batter("L1").unwrap().runs, 0);
    assert_eq!(innings.batter("L1").unwrap().balls, 1);
    assert_eq!(state.bowler().unwrap().runs, 0);
    assert_eq!(striker(&state), "L2");
}

#[test]
fn no_ball_is_charged_to_the_bowler_and_not_faced() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::extra(ExtraKind::NoBall, 1)).unwrap();

    let innings = state.current_innings().unwrap();
    assert_eq!(innings.runs, 1);
    assert_eq!(innings.legal_balls, 0);
    assert_eq!(innings.extras.no_balls, 1);
    assert_eq!(innings.batter("L1").unwrap().balls, 0);
    assert_eq!(striker(&state), "L1");
    let bowler = state.bowler().unwrap();
    assert_eq!(bowler.runs, 1);
    assert_eq!(bowler.no_balls, 1);
    assert_eq!(bowler.balls, 0);

    // Penalty plus one run taken: the batters cross.
    record_delivery(&mut state, Outcome::extra(ExtraKind::NoBall, 2)).unwrap();
    assert_eq!(striker(&state), "L2");
    assert_eq!(state.current_innings().unwrap().legal_balls, 0);
    assert_eq!(state.bowler().unwrap().runs, 3);
}

#[test]
fn mixed_over_keeps_totals_and_strike_consistent() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::runs(1)).unwrap();
    assert_eq!(striker(&state), "L2");
    record_delivery(&mut state, Outcome::four()).unwrap();
    record_delivery(&mut state, Outcome::extra(ExtraKind::Wide, 1)).unwrap();
    record_delivery(&mut state, Outcome::extra(ExtraKind::Bye, 2)).unwrap();
    assert_eq!(striker(&state), "L2");
    record_delivery(&mut state, Outcome::extra(ExtraKind::LegBye, 1)).unwrap();
    assert_eq!(striker(&state), "L1");
    record_delivery(&mut state, Outcome::extra(ExtraKind::NoBall, 3)).unwrap();
    assert_eq!(striker(&state), "L1");
    record_delivery(&mut state, Outcome::wicket(DismissalKind::Bowled)).unwrap();
    select_batter(&mut state, "L3").unwrap();
    record_delivery(&mut state, Outcome::runs(2)).unwrap();
    // Two runs keep strike, the end of the over swaps it.
    assert_eq!(striker(&state), "L2");
    assert_eq!(state.phase(), MatchPhase::AwaitingBowler);

    let innings = state.current_innings().unwrap();
    let batter_runs: u32 = innings.batters.iter().map(|b| b.runs).sum();
    let balls_faced: u32 = innings.batters.iter().map(|b| b.balls).sum();
    assert_eq!(batter_runs, 7);
    assert_eq!(innings.extras.total(), 7);
    assert_eq!(innings.runs, batter_runs + innings.extras.total());
    // Two runs, one boundary, one bye, one leg-bye, one wicket.
    assert_eq!(innings.legal_balls, 6);
    assert_eq!(balls_faced, innings.legal_balls);

    let t1 = innings.bowler("T1").unwrap();
    assert_eq!(t1.overs, 1);
    assert_eq!(t1.balls, 0);
    assert_eq!(t1.runs, 11);
    assert_eq!(t1.wides, 1);
    assert_eq!(t1.no_balls, 1);
    assert_eq!(t1.wickets, 1);
}

#[test]
fn extras_outside_one_delivery_are_rejected_without_change() {
    let mut state = ready_match(11, 20);
    let before = state.clone();
    for outcome in [
        Outcome::extra(ExtraKind::Wide, 0),
        Outcome::extra(ExtraKind::Wide, 8),
        Outcome::extra(ExtraKind::NoBall, u32::MAX),
        Outcome::extra(ExtraKind::Bye, 0),
        Outcome::extra(ExtraKind::LegBye, 7),
    ] {
        assert!(matches!(
            record_delivery(&mut state, outcome),
            Err(MatchError::InvalidOutcome(_))
        ));
    }
    assert_eq!(state.current_innings(), before.current_innings());
    record_delivery(&mut state, Outcome::extra(ExtraKind::NoBall, 7)).unwrap();
    assert_eq!(state.current_innings().unwrap().runs, 7);
}

#[test]
fn overs_are_capped() {
    assert!(MatchState::new(setup_with(11, MAX_OVERS)).is_ok());
    for overs in [MAX_OVERS + 1, u32::MAX] {
        assert!(matches!(
            MatchState::new(setup_with(11, overs)),
            Err(MatchError::ConfigInvalid(ConfigInvalid::TooManyOvers { max: MAX_OVERS }))
        ));
    }
}

#[test]
fn padded_names_are_trimmed_and_selectable() {
    let setup = MatchSetup::new(
        TeamSheet::new(" Lions ", [" Ann", "Ben "]),
        TeamSheet::new("Tigers", ["Cat", "  Dan"]),
    )
    .with_overs(1);
    let mut state = MatchState::new(setup).unwrap();
    assert_eq!(state.setup.team_1.name, "Lions");
    assert_eq!(state.setup.team_1.players, ["Ann", "Ben"]);
    select_openers(&mut state, "Ann", " Ben").unwrap();
    select_bowler(&mut state, "Dan").unwrap();
    assert_eq!(state.phase(), MatchPhase::InProgress);
    assert_eq!(striker(&state), "Ann");
}

#[test]
fn seven_runs_off_the_bat_is_rejected_without_change() {
    let mut state = ready_match(11, 20);
    let before = state.clone();
    assert!(matches!(
        record_delivery(&mut state, Outcome::runs(7)),
        Err(MatchError::InvalidOutcome(_))
    ));
    assert_eq!(state.current_innings(), before.current_innings());
    assert_eq!(state.crease, before.crease);
}

#[test]
fn wicket_counts_as_a_ball_and_waits_for_the_next_batter() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::wicket_by(DismissalKind::Caught, "T5")).unwrap();

    let innings = state.current_innings().unwrap();
    assert_eq!(innings.wickets, 1);
    assert_eq!(innings.legal_balls, 1);
    assert_eq!(innings.fall_of_wickets.len(), 1);
    assert_eq!(innings.fall_of_wickets[0].batter, "L1");
    let out = innings.batter("L1").unwrap();
    assert_eq!(out.status(), "c T5 b T1");
    assert_eq!(state.bowler().unwrap().wickets, 1);
    assert_eq!(state.phase(), MatchPhase::AwaitingBatter);

    assert!(matches!(
        record_delivery(&mut state, Outcome::runs(1)),
        Err(MatchError::NotReady(MatchPhase::AwaitingBatter))
    ));
    assert!(matches!(
        select_batter(&mut state, "L1"),
        Err(MatchError::InvalidSelection(InvalidSelection::AlreadyOut(_)))
    ));
    select_batter(&mut state, "L3").unwrap();
    assert_eq!(striker(&state), "L3");
    assert_eq!(state.phase(), MatchPhase::InProgress);
}

#[test]
fn run_out_is_not_credited_to_the_bowler() {
    let mut state = ready_match(11, 20);
    record_delivery(&mut state, Outcome::wicket_by(DismissalKind::RunOut, "T4")).unwrap();
    assert_eq!(state.bowler().unwrap().wickets, 0);
    let innings = state.current_innings().unwrap();
    assert_eq!(innings.batter("L1").unwrap().status(), "run out (T4)");
}

#[test]
fn fielders_must_be_fielding_and_bowler_cannot_stump() {
    let mut state = ready_match(11, 20);
    assert!(matches!(
        record_delivery(&mut state, Outcome::wicket_by(DismissalKind::Caught, "L5")),
        Err(MatchError::InvalidOutcome(_))
    ));
    assert!(matches!(
        record_delivery(&mut state, Outcome::wicket_by(DismissalKind::Stumped, "T1")),
        Err(MatchError::InvalidOutcome(_))
    ));
    assert!(matches!(
        record_delivery(&mut state, Outcome::wicket_by(DismissalKind::Bowled, "T2")),
        Err(MatchError::InvalidOutcome(_))
    ));
    assert_eq!(state.current_innings().unwrap().wickets, 0);
}

#[test]
fn wicket_on_last_ball_of_over_moves_the_vacancy() {
    let mut state = ready_match(11, 20);
    for _ in 0..5 {
        record_delivery(&mut state, Outcome::runs(0)).unwrap();
    }
    record_delivery(&mut state, Outcome::wicket(DismissalKind::Bowled)).unwrap();
    // L2 faces the next over; the new batter goes to the other end.
    assert_eq!(striker(&state), "L2");
    assert!(state.crease.non_striker.is_none());
    select_batter(&mut state, "L3").unwrap();
    assert_eq!(state.non_striker().unwrap().name, "L3");
    assert_eq!(state.phase(), MatchPhase::AwaitingBowler);
}

#[test]
fn maiden_over_and_consecutive_overs_rule() {
    let mut state = ready_match(11, 20);
    for _ in 0..6 {
        record_delivery(&mut state, Outcome::runs(0)).unwrap();
    }
    let innings = state.current_innings().unwrap();
    let t1 = innings.bowler("T1").unwrap();
    assert_eq!(t1.maidens, 1);
    assert_eq!(t1.overs_display(), "1.0");

    assert!(matches!(
        select_bowler(&mut state, "T1"),
        Err(MatchError::InvalidSelection(InvalidSelection::ConsecutiveOvers(_)))
    ));
    assert!(!state.eligible_bowlers().contains(&"T1"));
    select_bowler(&mut state, "T2").unwrap();
    assert_eq!(state.phase(), MatchPhase::InProgress);
}

#[test]
fn economy_and_strike_rate() {
    let mut state = ready_match(11, 20);
    for runs in [4, 0, 6, 0, 2, 0] {
        let outcome = match runs {
            4 => Outcome::four(),
            6 => Outcome::six(),
            n => Outcome::runs(n),
        };
        record_delivery(&mut state, outcome).unwrap();
    }
    let innings = state.current_innings().unwrap();
    assert_relative_eq!(innings.bowler("T1").unwrap().economy(), 12.0);
    let l1 = innings.batter("L1").unwrap();
    assert_eq!(l1.balls, 6);
    assert_relative_eq!(l1.strike_rate(), 200.0);
    assert_relative_eq!(innings.run_rate(), 12.0);
}

#[test]
fn outcome_json_shapes() {
    let four: Outcome = serde_json::from_str(r#"{"kind":"boundary","value":4}"#).unwrap();
    assert_eq!(four, Outcome::four());
    let wide: Outcome = serde_json::from_str(r#"{"kind":"extra","subtype":"wide","runs":1}"#).unwrap();
    assert_eq!(wide, Outcome::extra(ExtraKind::Wide, 1));
    assert!(serde_json::from_str::<Outcome>(r#"{"kind":"boundary","value":5}"#).is_err());
}
