//! Scoring engine and tournament logic: deliveries, selections, innings flow, fixtures, etc.

mod delivery;
mod fantasy;
mod innings;
mod queries;
mod roster;
mod schedule;
mod selection;
mod share;
mod standings;

pub use delivery::{record_delivery, Boundary, Outcome};
pub use fantasy::{batting_points, bowling_points, match_fantasy_points, merge_fantasy_points};
pub use innings::declare_innings;
pub use queries::{
    current_run_rate, required_run_rate, result_text, runs_required, snapshot, InningsLine,
    MatchSnapshot,
};
pub use roster::rosters_from_csv;
pub use schedule::start_tournament;
pub use selection::{retire_batter, select_batter, select_bowler, select_openers};
pub use share::{decode_setup, encode_setup, spectate_url};
pub use standings::{
    complete_fixture_from_match, match_setup_for_fixture, record_fixture_result, start_fixture,
};
