//! Tournament, fixtures, standings and the fantasy leaderboard.

use crate::models::error::MatchError;
use crate::models::setup::TeamSheet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Need at least 2 teams (exactly 3 for a tri-series).
    NotEnoughTeams { required: usize },
    TooManyTeams { allowed: usize },
    /// Team names are unique (case-insensitive).
    DuplicateTeamName(String),
    UnknownTeam(String),
    FixtureNotFound(FixtureId),
    FixtureAlreadyCompleted(FixtureId),
    /// Knockout slot not decided yet.
    FixtureNotReady(FixtureId),
    TeamNotInFixture(String),
    /// Knockout matches cannot end tied or without a result.
    KnockoutNeedsWinner,
    /// The match handed in is not finished.
    MatchNotFinished,
    Match(MatchError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::NotEnoughTeams { required } => {
                write!(f, "Need at least {} teams", required)
            }
            TournamentError::TooManyTeams { allowed } => {
                write!(f, "This format allows at most {} teams", allowed)
            }
            TournamentError::DuplicateTeamName(name) => {
                write!(f, "A team called {} already exists", name)
            }
            TournamentError::UnknownTeam(name) => write!(f, "No team called {}", name),
            TournamentError::FixtureNotFound(_) => write!(f, "Fixture not found"),
            TournamentError::FixtureAlreadyCompleted(_) => {
                write!(f, "Fixture already has a result")
            }
            TournamentError::FixtureNotReady(_) => {
                write!(f, "Both teams for this fixture are not known yet")
            }
            TournamentError::TeamNotInFixture(name) => {
                write!(f, "{} is not playing in this fixture", name)
            }
            TournamentError::KnockoutNeedsWinner => {
                write!(f, "Knockout matches need a winner")
            }
            TournamentError::MatchNotFinished => write!(f, "The match has not finished"),
            TournamentError::Match(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<MatchError> for TournamentError {
    fn from(e: MatchError) -> Self {
        TournamentError::Match(e)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Unique identifier for a fixture.
pub type FixtureId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Every pair meets once.
    #[default]
    RoundRobin,
    /// Three teams, every pair meets twice.
    TriSeries,
    /// Every pair meets twice, home and away.
    League,
    /// Single elimination.
    Knockout,
}

impl TournamentFormat {
    pub fn max_teams(self) -> Option<usize> {
        match self {
            TournamentFormat::TriSeries => Some(3),
            _ => None,
        }
    }

    pub fn min_teams(self) -> usize {
        match self {
            TournamentFormat::TriSeries => 3,
            _ => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Adding teams; no fixtures yet.
    #[default]
    Setup,
    Ongoing,
    Completed,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
}

/// Runs, wickets and balls of one side's innings, for net run rate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct InningsSummary {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub all_out: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixtureResult {
    /// None for a tie or no result.
    pub winner: Option<String>,
    #[serde(default)]
    pub no_result: bool,
    #[serde(default)]
    pub team_1_score: String,
    #[serde(default)]
    pub team_2_score: String,
    #[serde(default)]
    pub margin: String,
    #[serde(default)]
    pub team_1_innings: Option<InningsSummary>,
    #[serde(default)]
    pub team_2_innings: Option<InningsSummary>,
}

/// A scheduled match. Knockout fixtures beyond the first round start with empty slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub number: u32,
    pub team_1: Option<String>,
    pub team_2: Option<String>,
    /// Knockout round (1-based); None for league-style formats.
    pub round: Option<u32>,
    /// Position within the knockout round.
    pub slot: u32,
    pub scheduled: NaiveDate,
    pub status: FixtureStatus,
    pub result: Option<FixtureResult>,
}

impl Fixture {
    pub fn new(number: u32, team_1: Option<String>, team_2: Option<String>, scheduled: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            team_1,
            team_2,
            round: None,
            slot: 0,
            scheduled,
            status: FixtureStatus::Scheduled,
            result: None,
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team_1.as_deref() == Some(team) || self.team_2.as_deref() == Some(team)
    }

    /// Round label for grouping, e.g. `Round 2` or `Round Robin`.
    pub fn round_label(&self) -> String {
        match self.round {
            Some(r) => format!("Round {}", r),
            None => "Round Robin".to_string(),
        }
    }
}

/// One row of the points table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub no_result: u32,
    pub points: u32,
    pub runs_for: u32,
    pub balls_faced: u32,
    pub runs_against: u32,
    pub balls_bowled: u32,
}

impl TeamStanding {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            ..Self::default()
        }
    }

    /// Runs per over scored minus runs per over conceded.
    pub fn net_run_rate(&self) -> f64 {
        let rate = |runs: u32, balls: u32| {
            if balls == 0 {
                0.0
            } else {
                runs as f64 * 6.0 / balls as f64
            }
        };
        rate(self.runs_for, self.balls_faced) - rate(self.runs_against, self.balls_bowled)
    }
}

/// Fantasy tally for one player.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FantasyPoints {
    pub player: String,
    pub team: String,
    pub runs: u32,
    pub fours: u32,
    pub sixes: u32,
    pub wickets: u32,
    pub catches: u32,
    pub stumpings: u32,
    pub run_outs: u32,
    pub points: i32,
}

impl FantasyPoints {
    pub fn new(player: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            team: team.into(),
            ..Self::default()
        }
    }

    pub fn absorb(&mut self, other: &FantasyPoints) {
        self.runs += other.runs;
        self.fours += other.fours;
        self.sixes += other.sixes;
        self.wickets += other.wickets;
        self.catches += other.catches;
        self.stumpings += other.stumpings;
        self.run_outs += other.run_outs;
        self.points += other.points;
    }
}

/// Full tournament state: teams, rules, fixtures, standings and leaderboard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub teams: Vec<TeamSheet>,
    pub status: TournamentStatus,
    pub start_date: NaiveDate,
    /// Overs per innings for every fixture.
    pub overs: u32,
    pub last_man_stands: bool,
    pub fixtures: Vec<Fixture>,
    pub points_table: Vec<TeamStanding>,
    pub fantasy: Vec<FantasyPoints>,
}

impl Tournament {
    /// Create a new tournament in Setup with no teams.
    pub fn new(
        name: impl Into<String>,
        format: TournamentFormat,
        start_date: NaiveDate,
        overs: u32,
        last_man_stands: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            teams: Vec::new(),
            status: TournamentStatus::Setup,
            start_date,
            overs,
            last_man_stands,
            fixtures: Vec::new(),
            points_table: Vec::new(),
            fantasy: Vec::new(),
        }
    }

    pub fn team(&self, name: &str) -> Option<&TeamSheet> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub fn fixture_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == id)
    }

    pub fn standing(&self, team: &str) -> Option<&TeamStanding> {
        self.points_table.iter().find(|s| s.team == team)
    }

    pub fn standing_mut(&mut self, team: &str) -> Option<&mut TeamStanding> {
        self.points_table.iter_mut().find(|s| s.team == team)
    }

    /// Add a team (Setup only). Names must be unique, case-insensitive.
    pub fn add_team(&mut self, team: TeamSheet) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Setup {
            return Err(TournamentError::InvalidState);
        }
        let team = team.normalized();
        team.validate().map_err(MatchError::from)?;
        if self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(&team.name))
        {
            return Err(TournamentError::DuplicateTeamName(team.name));
        }
        if let Some(allowed) = self.format.max_teams() {
            if self.teams.len() >= allowed {
                return Err(TournamentError::TooManyTeams { allowed });
            }
        }
        self.teams.push(team);
        Ok(())
    }

    /// Remove a team by name (Setup only).
    pub fn remove_team(&mut self, name: &str) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .teams
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| TournamentError::UnknownTeam(name.to_string()))?;
        self.teams.remove(idx);
        Ok(())
    }

    /// Standings sorted by points, then net run rate.
    pub fn sorted_points_table(&self) -> Vec<TeamStanding> {
        let mut table = self.points_table.clone();
        table.sort_by(|a, b| {
            b.points.cmp(&a.points).then_with(|| {
                b.net_run_rate()
                    .partial_cmp(&a.net_run_rate())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        table
    }
}
