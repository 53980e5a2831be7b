//! Errors raised by the match engine.

use crate::models::match_state::MatchPhase;
use std::fmt;

/// Why a batter or bowler choice was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvalidSelection {
    /// Not in the roster of the side that should provide the player.
    UnknownPlayer(String),
    /// Already at the crease.
    AlreadyBatting(String),
    /// Already dismissed this innings.
    AlreadyOut(String),
    /// Retired earlier this innings.
    AlreadyRetired(String),
    /// Bowled the previous over.
    ConsecutiveOvers(String),
    /// Retirement requested for someone who is not at the crease.
    NotBatting(String),
    /// Nobody is left to take the retiring batter's place.
    NoReplacement,
}

impl fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidSelection::UnknownPlayer(name) => write!(f, "{} is not available to this side", name),
            InvalidSelection::AlreadyBatting(name) => write!(f, "{} is already batting", name),
            InvalidSelection::AlreadyOut(name) => write!(f, "{} is already out", name),
            InvalidSelection::AlreadyRetired(name) => write!(f, "{} has retired", name),
            InvalidSelection::ConsecutiveOvers(name) => {
                write!(f, "{} bowled the previous over", name)
            }
            InvalidSelection::NotBatting(name) => write!(f, "{} is not at the crease", name),
            InvalidSelection::NoReplacement => write!(f, "No batter is left to come in"),
        }
    }
}

/// Why a match setup (or something decoded into one) was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigInvalid {
    EmptyTeamName,
    DuplicateTeamName(String),
    TooFewPlayers { team: String, count: usize },
    UnequalRosters { team_1: usize, team_2: usize },
    BlankPlayerName { team: String },
    DuplicatePlayer { team: String, player: String },
    CaptainNotInRoster { team: String, captain: String },
    ZeroOvers,
    TooManyOvers { max: u32 },
    MalformedShareLink(String),
    MalformedRoster(String),
}

impl fmt::Display for ConfigInvalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigInvalid::EmptyTeamName => write!(f, "Team names must not be empty"),
            ConfigInvalid::DuplicateTeamName(name) => {
                write!(f, "Both teams are called {}", name)
            }
            ConfigInvalid::TooFewPlayers { team, count } => {
                write!(f, "{} needs at least 2 players (has {})", team, count)
            }
            ConfigInvalid::UnequalRosters { team_1, team_2 } => {
                write!(f, "Teams must have the same number of players ({} vs {})", team_1, team_2)
            }
            ConfigInvalid::BlankPlayerName { team } => {
                write!(f, "{} has a player without a name", team)
            }
            ConfigInvalid::DuplicatePlayer { team, player } => {
                write!(f, "{} lists {} more than once", team, player)
            }
            ConfigInvalid::CaptainNotInRoster { team, captain } => {
                write!(f, "Captain {} is not in the {} roster", captain, team)
            }
            ConfigInvalid::ZeroOvers => write!(f, "An innings needs at least one over"),
            ConfigInvalid::TooManyOvers { max } => {
                write!(f, "An innings can have at most {} overs", max)
            }
            ConfigInvalid::MalformedShareLink(reason) => write!(f, "Bad share link: {}", reason),
            ConfigInvalid::MalformedRoster(reason) => write!(f, "Bad roster file: {}", reason),
        }
    }
}

/// Errors returned by engine operations. Every rejected call leaves the match untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchError {
    /// The engine is waiting for something else (a selection, or the match is over).
    NotReady(MatchPhase),
    InvalidSelection(InvalidSelection),
    ConfigInvalid(ConfigInvalid),
    /// The delivery itself cannot happen (e.g. 7 runs off the bat).
    InvalidOutcome(String),
    /// This match was not set up with declarations.
    DeclarationNotAllowed,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NotReady(phase) => write!(f, "Not ready: {}", phase.prompt()),
            MatchError::InvalidSelection(e) => write!(f, "Invalid selection: {}", e),
            MatchError::ConfigInvalid(e) => write!(f, "Invalid match setup: {}", e),
            MatchError::InvalidOutcome(reason) => write!(f, "Invalid delivery: {}", reason),
            MatchError::DeclarationNotAllowed => {
                write!(f, "Declarations are not allowed in this match")
            }
        }
    }
}

impl std::error::Error for MatchError {}

impl From<InvalidSelection> for MatchError {
    fn from(e: InvalidSelection) -> Self {
        MatchError::InvalidSelection(e)
    }
}

impl From<ConfigInvalid> for MatchError {
    fn from(e: ConfigInvalid) -> Self {
        MatchError::ConfigInvalid(e)
    }
}
