//! Match configuration: teams, rosters, format and toss.

use crate::models::error::ConfigInvalid;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Longest innings a setup may ask for.
pub const MAX_OVERS: u32 = 100;

/// One of the two sides in a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[default]
    One,
    Two,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::One => TeamSide::Two,
            TeamSide::Two => TeamSide::One,
        }
    }
}

/// Preset formats. Only the overs differ; everything else is the same state machine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    #[default]
    T20,
    Odi,
    SuperOver,
    Custom,
}

impl MatchFormat {
    /// Overs per innings for the presets; `Custom` has none.
    pub fn default_overs(self) -> Option<u32> {
        match self {
            MatchFormat::T20 => Some(20),
            MatchFormat::Odi => Some(50),
            MatchFormat::SuperOver => Some(1),
            MatchFormat::Custom => None,
        }
    }
}

/// A team name with its ordered playing roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamSheet {
    pub name: String,
    pub players: Vec<String>,
    pub captain: String,
}

impl TeamSheet {
    /// Build a sheet; the first listed player captains until told otherwise.
    pub fn new<I, S>(name: impl Into<String>, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players: Vec<String> = players.into_iter().map(Into::into).collect();
        let captain = players.first().cloned().unwrap_or_default();
        Self {
            name: name.into(),
            players,
            captain,
        }
    }

    pub fn with_captain(mut self, captain: impl Into<String>) -> Self {
        self.captain = captain.into();
        self
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    /// Trim names and drop blank roster lines (form input tends to leave them behind).
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.players = self
            .players
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self.captain = self.captain.trim().to_string();
        self
    }

    /// Roster checks shared by match setup and tournament registration.
    pub fn validate(&self) -> Result<(), ConfigInvalid> {
        if self.name.trim().is_empty() {
            return Err(ConfigInvalid::EmptyTeamName);
        }
        if self.players.len() < 2 {
            return Err(ConfigInvalid::TooFewPlayers {
                team: self.name.clone(),
                count: self.players.len(),
            });
        }
        let mut seen = HashSet::new();
        for player in &self.players {
            if player.trim().is_empty() {
                return Err(ConfigInvalid::BlankPlayerName {
                    team: self.name.clone(),
                });
            }
            if !seen.insert(player.as_str()) {
                return Err(ConfigInvalid::DuplicatePlayer {
                    team: self.name.clone(),
                    player: player.clone(),
                });
            }
        }
        if !self.has_player(&self.captain) {
            return Err(ConfigInvalid::CaptainNotInRoster {
                team: self.name.clone(),
                captain: self.captain.clone(),
            });
        }
        Ok(())
    }
}

/// Everything fixed before the first ball. Immutable once a match is created from it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub format: MatchFormat,
    pub team_1: TeamSheet,
    pub team_2: TeamSheet,
    /// Overs per innings.
    pub overs: u32,
    /// The last batter may carry on alone once no partner is left.
    pub last_man_stands: bool,
    pub toss_winner: TeamSide,
    pub batting_first: TeamSide,
    /// Tournament matches allow a side to declare its innings closed.
    #[serde(default)]
    pub allow_declaration: bool,
    /// Play a super over when the regular innings finish level.
    #[serde(default)]
    pub super_over_on_tie: bool,
    /// Break a tied super over on total boundaries.
    #[serde(default)]
    pub boundary_countback: bool,
}

impl MatchSetup {
    /// T20 defaults, team one wins the toss and bats.
    pub fn new(team_1: TeamSheet, team_2: TeamSheet) -> Self {
        Self {
            format: MatchFormat::T20,
            team_1,
            team_2,
            overs: 20,
            last_man_stands: false,
            toss_winner: TeamSide::One,
            batting_first: TeamSide::One,
            allow_declaration: false,
            super_over_on_tie: false,
            boundary_countback: false,
        }
    }

    /// Switch format; preset formats also set the overs.
    pub fn with_format(mut self, format: MatchFormat) -> Self {
        self.format = format;
        if let Some(overs) = format.default_overs() {
            self.overs = overs;
        }
        self
    }

    pub fn with_overs(mut self, overs: u32) -> Self {
        self.overs = overs;
        self
    }

    pub fn with_last_man_stands(mut self, last_man_stands: bool) -> Self {
        self.last_man_stands = last_man_stands;
        self
    }

    pub fn with_toss(mut self, winner: TeamSide, batting_first: TeamSide) -> Self {
        self.toss_winner = winner;
        self.batting_first = batting_first;
        self
    }

    pub fn with_declarations(mut self, allow: bool) -> Self {
        self.allow_declaration = allow;
        self
    }

    pub fn with_super_over(mut self, on_tie: bool, boundary_countback: bool) -> Self {
        self.super_over_on_tie = on_tie;
        self.boundary_countback = boundary_countback;
        self
    }

    pub fn team(&self, side: TeamSide) -> &TeamSheet {
        match side {
            TeamSide::One => &self.team_1,
            TeamSide::Two => &self.team_2,
        }
    }

    /// Players per side (rosters are equal once validated).
    pub fn roster_size(&self) -> usize {
        self.team_1.players.len().min(self.team_2.players.len())
    }

    /// Wickets that end an innings: the whole roster under last-man-stands, otherwise one fewer.
    pub fn wicket_limit(&self) -> u32 {
        let n = self.roster_size() as u32;
        if self.last_man_stands {
            n
        } else {
            n.saturating_sub(1)
        }
    }

    /// Whether the toss winner chose to bat.
    pub fn toss_winner_batted(&self) -> bool {
        self.toss_winner == self.batting_first
    }

    /// Both sheets with names trimmed, so selections by trimmed name always match.
    pub fn normalized(self) -> Self {
        Self {
            team_1: self.team_1.normalized(),
            team_2: self.team_2.normalized(),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigInvalid> {
        self.team_1.validate()?;
        self.team_2.validate()?;
        if self.team_1.name.trim().eq_ignore_ascii_case(self.team_2.name.trim()) {
            return Err(ConfigInvalid::DuplicateTeamName(self.team_1.name.clone()));
        }
        if self.team_1.players.len() != self.team_2.players.len() {
            return Err(ConfigInvalid::UnequalRosters {
                team_1: self.team_1.players.len(),
                team_2: self.team_2.players.len(),
            });
        }
        if self.overs == 0 {
            return Err(ConfigInvalid::ZeroOvers);
        }
        if self.overs > MAX_OVERS {
            return Err(ConfigInvalid::TooManyOvers { max: MAX_OVERS });
        }
        Ok(())
    }
}
