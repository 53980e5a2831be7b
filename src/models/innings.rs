//! One side's turn at batting.

use crate::models::player::{BatterRecord, BowlerFigures};
use crate::models::setup::TeamSide;
use serde::{Deserialize, Serialize};

/// Regular innings or one half of a super over.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsKind {
    #[default]
    Regular,
    SuperOver,
}

/// Why an innings was sealed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsEnd {
    AllOut,
    OversCompleted,
    TargetReached,
    Declared,
}

/// Which kind of extra a run came from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraKind {
    /// Byes and leg-byes come off a fair delivery; wides and no-balls do not.
    pub fn is_legal(self) -> bool {
        matches!(self, ExtraKind::Bye | ExtraKind::LegBye)
    }

    /// Wides and no-balls go against the bowler's figures.
    pub fn charged_to_bowler(self) -> bool {
        !self.is_legal()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Extras {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl Extras {
    pub fn add(&mut self, kind: ExtraKind, runs: u32) {
        match kind {
            ExtraKind::Wide => self.wides += runs,
            ExtraKind::NoBall => self.no_balls += runs,
            ExtraKind::Bye => self.byes += runs,
            ExtraKind::LegBye => self.leg_byes += runs,
        }
    }

    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// Score at the fall of a wicket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub wicket: u32,
    pub runs: u32,
    pub legal_balls: u32,
    pub batter: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    pub batting: TeamSide,
    pub team: String,
    pub kind: InningsKind,
    pub over_limit: u32,
    pub wicket_limit: u32,
    /// Runs needed to win; set for the second innings of a pair.
    pub target: Option<u32>,
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub extras: Extras,
    /// Batters in order of arrival, including those still at the crease.
    pub batters: Vec<BatterRecord>,
    pub bowlers: Vec<BowlerFigures>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    /// Set when the innings is sealed; nothing changes afterwards.
    pub end: Option<InningsEnd>,
}

impl Innings {
    pub fn new(
        batting: TeamSide,
        team: impl Into<String>,
        kind: InningsKind,
        over_limit: u32,
        wicket_limit: u32,
        target: Option<u32>,
    ) -> Self {
        Self {
            batting,
            team: team.into(),
            kind,
            over_limit,
            wicket_limit,
            target,
            runs: 0,
            wickets: 0,
            legal_balls: 0,
            extras: Extras::default(),
            batters: Vec::new(),
            bowlers: Vec::new(),
            fall_of_wickets: Vec::new(),
            end: None,
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.end.is_some()
    }

    pub fn completed_overs(&self) -> u32 {
        self.legal_balls / 6
    }

    pub fn ball_in_over(&self) -> u32 {
        self.legal_balls % 6
    }

    /// Overs in `O.B` notation.
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.completed_overs(), self.ball_in_over())
    }

    /// `runs/wickets`.
    pub fn score_line(&self) -> String {
        format!("{}/{}", self.runs, self.wickets)
    }

    pub fn balls_remaining(&self) -> u32 {
        self.over_limit.saturating_mul(6).saturating_sub(self.legal_balls)
    }

    /// Batters who have been dismissed, in order.
    pub fn dismissed(&self) -> impl Iterator<Item = &BatterRecord> {
        self.batters.iter().filter(|b| b.is_out())
    }

    pub fn batter(&self, name: &str) -> Option<&BatterRecord> {
        self.batters.iter().find(|b| b.name == name)
    }

    pub fn bowler(&self, name: &str) -> Option<&BowlerFigures> {
        self.bowlers.iter().find(|b| b.name == name)
    }

    /// Index of the bowler's figures, creating them on first use.
    pub fn bowler_index(&mut self, name: &str) -> usize {
        match self.bowlers.iter().position(|b| b.name == name) {
            Some(idx) => idx,
            None => {
                self.bowlers.push(BowlerFigures::new(name));
                self.bowlers.len() - 1
            }
        }
    }

    /// Fours plus sixes.
    pub fn boundaries(&self) -> u32 {
        self.batters.iter().map(|b| b.fours + b.sixes).sum()
    }

    /// Runs per six legal balls; 0 before the first ball.
    pub fn run_rate(&self) -> f64 {
        if self.legal_balls == 0 {
            0.0
        } else {
            self.runs as f64 * 6.0 / self.legal_balls as f64
        }
    }
}
