//! Integration tests for fantasy scoring.

use cricket_scorer_web::logic::{
    batting_points, bowling_points, match_fantasy_points, merge_fantasy_points, record_delivery,
    select_bowler, select_openers, Outcome,
};
use cricket_scorer_web::models::{
    BatterRecord, BowlerFigures, DismissalKind, FantasyPoints, MatchSetup, MatchState, TeamSheet,
};

fn batter(runs: u32, balls: u32, fours: u32, sixes: u32) -> BatterRecord {
    BatterRecord {
        runs,
        balls,
        fours,
        sixes,
        ..BatterRecord::new("Asha")
    }
}

#[test]
fn fifty_at_a_fast_rate() {
    // 52 + 5 fours + 2 sixes * 2, milestones 4 + 8, strike rate 173
    assert_eq!(batting_points(&batter(52, 30, 5, 2)), 79);
}

#[test]
fn slow_innings_is_penalised_after_ten_balls() {
    assert_eq!(batting_points(&batter(4, 12, 0, 0)), 0);
    assert_eq!(batting_points(&batter(4, 9, 0, 0)), 4);
    assert_eq!(batting_points(&batter(7, 12, 0, 0)), 5);
}

#[test]
fn three_wicket_spell_with_a_maiden() {
    let figures = BowlerFigures {
        overs: 4,
        runs: 20,
        wickets: 3,
        maidens: 1,
        ..BowlerFigures::new("Dev")
    };
    // 75 + 12 + economy 5.0 bonus 6 + haul bonus 4
    assert_eq!(bowling_points(&figures), 97);

    let expensive = BowlerFigures {
        overs: 2,
        runs: 26,
        ..BowlerFigures::new("Eli")
    };
    assert_eq!(bowling_points(&expensive), -6);
}

#[test]
fn match_points_cover_batting_bowling_and_fielding() {
    let setup = MatchSetup::new(
        TeamSheet::new("Lions", ["Asha", "Ben", "Cal"]),
        TeamSheet::new("Tigers", ["Dev", "Eli", "Fin"]),
    )
    .with_overs(2);
    let mut state = MatchState::new(setup).unwrap();
    select_openers(&mut state, "Asha", "Ben").unwrap();
    select_bowler(&mut state, "Dev").unwrap();
    record_delivery(&mut state, Outcome::six()).unwrap();
    record_delivery(&mut state, Outcome::wicket_by(DismissalKind::Stumped, "Fin")).unwrap();

    let points = match_fantasy_points(&state);
    let asha = points.iter().find(|p| p.player == "Asha").unwrap();
    assert_eq!(asha.points, 8);
    assert_eq!(asha.team, "Lions");
    let dev = points.iter().find(|p| p.player == "Dev").unwrap();
    assert_eq!(dev.points, 25);
    let fin = points.iter().find(|p| p.player == "Fin").unwrap();
    assert_eq!(fin.stumpings, 1);
    assert_eq!(fin.points, 12);
    assert_eq!(points[0].player, "Dev");
    // Ben has not faced a ball.
    assert!(points.iter().all(|p| p.player != "Ben"));
}

#[test]
fn leaderboard_sums_across_matches() {
    let mut board = Vec::new();
    let mut first = FantasyPoints::new("Asha", "Lions");
    first.runs = 30;
    first.points = 34;
    let mut second = FantasyPoints::new("Asha", "Lions");
    second.runs = 10;
    second.points = 10;
    let other = FantasyPoints::new("Dev", "Tigers");

    merge_fantasy_points(&mut board, &[first, other]);
    merge_fantasy_points(&mut board, &[second]);
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].player, "Asha");
    assert_eq!(board[0].runs, 40);
    assert_eq!(board[0].points, 44);
}
