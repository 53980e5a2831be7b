//! Data structures for cricket scoring: setup, innings, records, match state, tournaments.

mod error;
mod innings;
mod match_state;
mod player;
mod setup;
mod tournament;

pub use error::{ConfigInvalid, InvalidSelection, MatchError};
pub use innings::{ExtraKind, Extras, FallOfWicket, Innings, InningsEnd, InningsKind};
pub use match_state::{Crease, Margin, MatchId, MatchPhase, MatchResult, MatchState};
pub use player::{BatterRecord, BowlerFigures, Dismissal, DismissalKind};
pub use setup::{MatchFormat, MatchSetup, TeamSheet, TeamSide, MAX_OVERS};
pub use tournament::{
    FantasyPoints, Fixture, FixtureId, FixtureResult, FixtureStatus, InningsSummary, TeamStanding,
    Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
