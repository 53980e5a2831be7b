//! Cricket scorekeeper web app: library with the match engine, models and tournament logic.

pub mod logic;
pub mod models;

pub use logic::{
    complete_fixture_from_match, current_run_rate, declare_innings, decode_setup, encode_setup,
    match_fantasy_points, match_setup_for_fixture, record_delivery, record_fixture_result,
    required_run_rate, result_text, retire_batter, rosters_from_csv, runs_required, select_batter,
    select_bowler, select_openers, snapshot, spectate_url, start_fixture, start_tournament,
    Boundary, MatchSnapshot, Outcome,
};
pub use models::{
    DismissalKind, ExtraKind, MatchError, MatchFormat, MatchId, MatchPhase, MatchResult,
    MatchSetup, MatchState, TeamSheet, TeamSide, Tournament, TournamentError, TournamentFormat,
    TournamentId,
};
