//! MatchState: the single owned value every engine operation mutates.

use crate::models::error::MatchError;
use crate::models::innings::{Innings, InningsKind};
use crate::models::player::{BatterRecord, BowlerFigures};
use crate::models::setup::{MatchSetup, TeamSheet, TeamSide};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// What the engine is waiting for. Only `InProgress` accepts deliveries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Two openers needed.
    AwaitingBatters,
    AwaitingBowler,
    InProgress,
    /// A wicket or retirement left a vacancy.
    AwaitingBatter,
    Completed,
}

impl MatchPhase {
    pub fn prompt(self) -> &'static str {
        match self {
            MatchPhase::AwaitingBatters => "select the opening batters",
            MatchPhase::AwaitingBowler => "select a bowler",
            MatchPhase::InProgress => "match in progress",
            MatchPhase::AwaitingBatter => "select the next batter",
            MatchPhase::Completed => "match is over",
        }
    }
}

/// Who is at the crease and who is bowling. Indices point into the open innings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Crease {
    pub striker: Option<usize>,
    pub non_striker: Option<usize>,
    pub bowler: Option<usize>,
    /// Bowler of the last completed over; cannot bowl the next one.
    pub previous_bowler: Option<String>,
}

impl Crease {
    pub fn has_vacancy(&self) -> bool {
        self.striker.is_none() || self.non_striker.is_none()
    }

    pub fn live_batters(&self) -> impl Iterator<Item = usize> {
        self.striker.into_iter().chain(self.non_striker)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
    /// Tied super over decided on boundaries hit across the match.
    Boundaries { winner: u32, loser: u32 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    Won {
        winner: TeamSide,
        margin: Margin,
        /// Decided in (or after) a super over.
        super_over: bool,
    },
    Tied,
}

impl MatchResult {
    pub fn winner(&self) -> Option<TeamSide> {
        match self {
            MatchResult::Won { winner, .. } => Some(*winner),
            MatchResult::Tied => None,
        }
    }

    /// Human-readable result, e.g. `Lions won by 4 wickets`.
    pub fn describe(&self, setup: &MatchSetup) -> String {
        match self {
            MatchResult::Tied => "Match tied".to_string(),
            MatchResult::Won {
                winner,
                margin,
                super_over,
            } => {
                let name = &setup.team(*winner).name;
                let how = match margin {
                    Margin::Runs(1) => "1 run".to_string(),
                    Margin::Runs(n) => format!("{} runs", n),
                    Margin::Wickets(1) => "1 wicket".to_string(),
                    Margin::Wickets(n) => format!("{} wickets", n),
                    Margin::Boundaries { winner, loser } => {
                        return format!(
                            "{} won on boundary count ({} to {})",
                            name, winner, loser
                        );
                    }
                };
                if *super_over {
                    format!("{} won the super over by {}", name, how)
                } else {
                    format!("{} won by {}", name, how)
                }
            }
        }
    }

    /// Margin without the team name, for fixture summaries.
    pub fn margin_text(&self) -> String {
        match self {
            MatchResult::Tied => String::new(),
            MatchResult::Won { margin, .. } => match margin {
                Margin::Runs(n) => format!("{} runs", n),
                Margin::Wickets(n) => format!("{} wickets", n),
                Margin::Boundaries { winner, loser } => {
                    format!("boundary count {}-{}", winner, loser)
                }
            },
        }
    }
}

/// Full match state. Innings are appended as they start; at most the last one is open.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    pub id: MatchId,
    pub setup: MatchSetup,
    pub innings: Vec<Innings>,
    pub crease: Crease,
    /// Set exactly once; the match accepts nothing afterwards.
    pub result: Option<MatchResult>,
}

impl MatchState {
    /// Validate the setup and open the first innings.
    pub fn new(setup: MatchSetup) -> Result<Self, MatchError> {
        let setup = setup.normalized();
        setup.validate()?;
        let batting = setup.batting_first;
        let first = Innings::new(
            batting,
            setup.team(batting).name.clone(),
            InningsKind::Regular,
            setup.overs,
            setup.wicket_limit(),
            None,
        );
        log::info!(
            "New match: {} v {} ({} overs, {} wickets)",
            setup.team_1.name,
            setup.team_2.name,
            setup.overs,
            setup.wicket_limit()
        );
        Ok(Self {
            id: Uuid::new_v4(),
            setup,
            innings: vec![first],
            crease: Crease::default(),
            result: None,
        })
    }

    /// The innings currently being played, if any.
    pub fn open_innings(&self) -> Option<&Innings> {
        self.innings.last().filter(|i| !i.is_sealed())
    }

    /// Latest innings, open or sealed.
    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings.last()
    }

    pub fn batting_side(&self) -> Option<TeamSide> {
        self.current_innings().map(|i| i.batting)
    }

    pub fn batting_team(&self) -> Option<&TeamSheet> {
        self.batting_side().map(|side| self.setup.team(side))
    }

    pub fn fielding_team(&self) -> Option<&TeamSheet> {
        self.batting_side().map(|side| self.setup.team(side.opponent()))
    }

    /// Roster players of the batting side who have not come in yet.
    pub fn pending_batters(&self) -> Vec<&str> {
        let (Some(innings), Some(team)) = (self.open_innings(), self.batting_team()) else {
            return Vec::new();
        };
        team.players
            .iter()
            .filter(|p| innings.batter(p).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Fielding players allowed to bowl the next over.
    pub fn eligible_bowlers(&self) -> Vec<&str> {
        let Some(team) = self.fielding_team() else {
            return Vec::new();
        };
        team.players
            .iter()
            .filter(|p| self.crease.previous_bowler.as_deref() != Some(p.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn phase(&self) -> MatchPhase {
        if self.result.is_some() {
            return MatchPhase::Completed;
        }
        let Some(innings) = self.open_innings() else {
            return MatchPhase::Completed;
        };
        if innings.batters.len() < 2 && innings.wickets == 0 {
            MatchPhase::AwaitingBatters
        } else if self.crease.has_vacancy() && !self.pending_batters().is_empty() {
            MatchPhase::AwaitingBatter
        } else if self.crease.bowler.is_none() {
            MatchPhase::AwaitingBowler
        } else {
            MatchPhase::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Target for the open innings, if it is a chase.
    pub fn target(&self) -> Option<u32> {
        self.open_innings().and_then(|i| i.target)
    }

    pub fn striker(&self) -> Option<&BatterRecord> {
        let innings = self.open_innings()?;
        self.crease.striker.map(|i| &innings.batters[i])
    }

    pub fn non_striker(&self) -> Option<&BatterRecord> {
        let innings = self.open_innings()?;
        self.crease.non_striker.map(|i| &innings.batters[i])
    }

    pub fn bowler(&self) -> Option<&BowlerFigures> {
        let innings = self.open_innings()?;
        self.crease.bowler.map(|i| &innings.bowlers[i])
    }

    /// Boundaries hit by one side across every innings of the match.
    pub fn boundaries_for(&self, side: TeamSide) -> u32 {
        self.innings
            .iter()
            .filter(|i| i.batting == side)
            .map(Innings::boundaries)
            .sum()
    }

    pub fn result_text(&self) -> String {
        match &self.result {
            Some(result) => result.describe(&self.setup),
            None => "Match in progress".to_string(),
        }
    }
}
