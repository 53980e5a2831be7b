//! Batting and bowling records for a single innings.

use serde::{Deserialize, Serialize};

/// How a batter was dismissed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
}

impl DismissalKind {
    /// Everything except a run out goes into the bowler's wicket column.
    pub fn credits_bowler(self) -> bool {
        !matches!(self, DismissalKind::RunOut)
    }

    /// Dismissals that name a fielder.
    pub fn takes_fielder(self) -> bool {
        matches!(
            self,
            DismissalKind::Caught | DismissalKind::RunOut | DismissalKind::Stumped
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            DismissalKind::Bowled => "Bowled",
            DismissalKind::Caught => "Caught",
            DismissalKind::Lbw => "LBW",
            DismissalKind::RunOut => "Run Out",
            DismissalKind::Stumped => "Stumped",
            DismissalKind::HitWicket => "Hit Wicket",
        }
    }
}

/// A recorded dismissal with the players it is credited to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: DismissalKind,
    /// None for run outs.
    pub bowler: Option<String>,
    pub fielder: Option<String>,
}

impl Dismissal {
    /// Scorecard notation, e.g. `c Smith b Jones`.
    pub fn describe(&self) -> String {
        let bowler = self.bowler.as_deref().unwrap_or("?");
        match (self.kind, self.fielder.as_deref()) {
            (DismissalKind::Bowled, _) => format!("b {}", bowler),
            (DismissalKind::Caught, Some(f)) if f == bowler => format!("c & b {}", bowler),
            (DismissalKind::Caught, Some(f)) => format!("c {} b {}", f, bowler),
            (DismissalKind::Caught, None) => format!("c ? b {}", bowler),
            (DismissalKind::Lbw, _) => format!("lbw b {}", bowler),
            (DismissalKind::RunOut, Some(f)) => format!("run out ({})", f),
            (DismissalKind::RunOut, None) => "run out".to_string(),
            (DismissalKind::Stumped, f) => format!("st {} b {}", f.unwrap_or("?"), bowler),
            (DismissalKind::HitWicket, _) => format!("hit wicket b {}", bowler),
        }
    }
}

/// One batter's innings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BatterRecord {
    pub name: String,
    pub runs: u32,
    /// Legal balls faced.
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub dismissal: Option<Dismissal>,
    pub retired: bool,
}

impl BatterRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_out(&self) -> bool {
        self.dismissal.is_some()
    }

    /// Runs per 100 balls; 0 before the first ball.
    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            0.0
        } else {
            self.runs as f64 * 100.0 / self.balls as f64
        }
    }

    /// `out`/`retired`/`not out` column of a scorecard.
    pub fn status(&self) -> String {
        match &self.dismissal {
            Some(d) => d.describe(),
            None if self.retired => "retired not out".to_string(),
            None => "not out".to_string(),
        }
    }
}

/// One bowler's figures for an innings.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BowlerFigures {
    pub name: String,
    /// Completed overs.
    pub overs: u32,
    /// Legal balls in the over currently being bowled.
    pub balls: u32,
    pub runs: u32,
    pub wickets: u32,
    pub maidens: u32,
    pub wides: u32,
    pub no_balls: u32,
    /// Runs conceded in the current over (maiden check).
    pub over_runs: u32,
}

impl BowlerFigures {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn legal_balls(&self) -> u32 {
        self.overs.saturating_mul(6).saturating_add(self.balls)
    }

    /// Overs in `O.B` notation.
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.overs, self.balls)
    }

    /// Runs conceded per six legal balls; 0 before the first ball.
    pub fn economy(&self) -> f64 {
        let balls = self.legal_balls();
        if balls == 0 {
            0.0
        } else {
            self.runs as f64 * 6.0 / balls as f64
        }
    }
}
