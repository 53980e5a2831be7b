//! Ball-by-ball scoring: one delivery in, every consequence applied.

use crate::logic::innings::{innings_over, seal_innings};
use crate::models::{
    Dismissal, DismissalKind, ExtraKind, FallOfWicket, MatchError, MatchPhase, MatchState,
};
use serde::{Deserialize, Serialize};

/// A four or a six.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Boundary {
    Four,
    Six,
}

impl Boundary {
    pub fn runs(self) -> u32 {
        match self {
            Boundary::Four => 4,
            Boundary::Six => 6,
        }
    }
}

impl TryFrom<u8> for Boundary {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Boundary::Four),
            6 => Ok(Boundary::Six),
            other => Err(format!("a boundary is worth 4 or 6, not {}", other)),
        }
    }
}

impl From<Boundary> for u8 {
    fn from(b: Boundary) -> Self {
        b.runs() as u8
    }
}

/// What happened on one delivery.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Runs taken between the wickets (0..=6).
    Runs { value: u32 },
    Boundary { value: Boundary },
    /// `runs` is the full amount added to the total, penalty included.
    Extra { subtype: ExtraKind, runs: u32 },
    /// The striker is out.
    Wicket {
        dismissal: DismissalKind,
        #[serde(default)]
        fielder: Option<String>,
    },
}

impl Outcome {
    pub fn runs(value: u32) -> Self {
        Outcome::Runs { value }
    }

    pub fn four() -> Self {
        Outcome::Boundary {
            value: Boundary::Four,
        }
    }

    pub fn six() -> Self {
        Outcome::Boundary {
            value: Boundary::Six,
        }
    }

    pub fn extra(subtype: ExtraKind, runs: u32) -> Self {
        Outcome::Extra { subtype, runs }
    }

    pub fn wicket(dismissal: DismissalKind) -> Self {
        Outcome::Wicket {
            dismissal,
            fielder: None,
        }
    }

    pub fn wicket_by(dismissal: DismissalKind, fielder: impl Into<String>) -> Self {
        Outcome::Wicket {
            dismissal,
            fielder: Some(fielder.into()),
        }
    }
}

/// Bookkeeping for a delivery that did not take a wicket.
struct Scored {
    batter_runs: u32,
    extra: Option<(ExtraKind, u32)>,
    conceded: u32,
    legal: bool,
    /// Batters finished at opposite ends from where they started.
    crossed: bool,
    boundary: Option<Boundary>,
}

impl Scored {
    fn from_outcome(outcome: &Outcome) -> Option<Self> {
        let scored = match *outcome {
            Outcome::Runs { value } => Scored {
                batter_runs: value,
                extra: None,
                conceded: value,
                legal: true,
                crossed: value % 2 == 1,
                boundary: None,
            },
            Outcome::Boundary { value } => Scored {
                batter_runs: value.runs(),
                extra: None,
                conceded: value.runs(),
                legal: true,
                crossed: false,
                boundary: Some(value),
            },
            Outcome::Extra { subtype, runs } => {
                // Beyond the one-run penalty, wide and no-ball runs were run.
                let ran = if subtype.is_legal() {
                    runs
                } else {
                    runs.saturating_sub(1)
                };
                Scored {
                    batter_runs: 0,
                    extra: Some((subtype, runs)),
                    conceded: if subtype.charged_to_bowler() { runs } else { 0 },
                    legal: subtype.is_legal(),
                    crossed: ran % 2 == 1,
                    boundary: None,
                }
            }
            Outcome::Wicket { .. } => return None,
        };
        Some(scored)
    }
}

/// Record one delivery. Rejected calls change nothing.
///
/// Preconditions: the match is `InProgress` (openers, a bowler, and any replacement batter
/// chosen). Afterwards the innings may have moved on to `AwaitingBowler` (over complete),
/// `AwaitingBatter` (wicket), the next innings, or a final result.
pub fn record_delivery(state: &mut MatchState, outcome: Outcome) -> Result<(), MatchError> {
    let phase = state.phase();
    if phase != MatchPhase::InProgress {
        return Err(MatchError::NotReady(phase));
    }
    validate_outcome(state, &outcome)?;
    log::debug!("Delivery: {:?}", outcome);

    match outcome {
        Outcome::Wicket { dismissal, fielder } => apply_wicket(state, dismissal, fielder),
        other => {
            if let Some(scored) = Scored::from_outcome(&other) {
                apply_scored(state, scored);
            }
        }
    }

    if let Some(end) = innings_over(state) {
        seal_innings(state, end);
    }
    Ok(())
}

/// Runs one extra may add: the penalty run plus up to six, or up to six byes.
fn extra_runs(kind: ExtraKind) -> std::ops::RangeInclusive<u32> {
    if kind.is_legal() {
        1..=6
    } else {
        1..=7
    }
}

fn validate_outcome(state: &MatchState, outcome: &Outcome) -> Result<(), MatchError> {
    match outcome {
        Outcome::Runs { value } if *value > 6 => Err(MatchError::InvalidOutcome(format!(
            "{} runs cannot be run off one ball",
            value
        ))),
        Outcome::Extra { subtype, runs } if !extra_runs(*subtype).contains(runs) => {
            Err(MatchError::InvalidOutcome(format!(
                "{} runs is not a valid {:?}",
                runs, subtype
            )))
        }
        Outcome::Wicket {
            dismissal,
            fielder: Some(fielder),
        } => {
            if !dismissal.takes_fielder() {
                return Err(MatchError::InvalidOutcome(format!(
                    "{} does not involve a fielder",
                    dismissal.label()
                )));
            }
            let in_field = state
                .fielding_team()
                .map(|t| t.has_player(fielder))
                .unwrap_or(false);
            if !in_field {
                return Err(MatchError::InvalidOutcome(format!(
                    "{} is not fielding",
                    fielder
                )));
            }
            if *dismissal == DismissalKind::Stumped
                && state.bowler().map(|b| &b.name) == Some(fielder)
            {
                return Err(MatchError::InvalidOutcome(
                    "the bowler cannot make a stumping".to_string(),
                ));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn apply_scored(state: &mut MatchState, scored: Scored) {
    let MatchState {
        innings, crease, ..
    } = &mut *state;
    let Some(innings) = innings.last_mut() else {
        return;
    };
    let (Some(striker), Some(bowler)) = (crease.striker, crease.bowler) else {
        return;
    };

    innings.runs += scored.batter_runs;
    if let Some((kind, runs)) = scored.extra {
        innings.runs += runs;
        innings.extras.add(kind, runs);
    }

    let batter = &mut innings.batters[striker];
    batter.runs += scored.batter_runs;
    if scored.legal {
        batter.balls += 1;
    }
    match scored.boundary {
        Some(Boundary::Four) => batter.fours += 1,
        Some(Boundary::Six) => batter.sixes += 1,
        None => {}
    }

    let figures = &mut innings.bowlers[bowler];
    figures.runs += scored.conceded;
    figures.over_runs += scored.conceded;
    match scored.extra {
        Some((ExtraKind::Wide, _)) => figures.wides += 1,
        Some((ExtraKind::NoBall, _)) => figures.no_balls += 1,
        _ => {}
    }
    if scored.legal {
        figures.balls += 1;
        innings.legal_balls += 1;
    }

    // Run parity and end of over each move the strike once; two moves cancel.
    let over_complete = scored.legal && innings.legal_balls % 6 == 0;
    if scored.crossed != over_complete && crease.non_striker.is_some() {
        std::mem::swap(&mut crease.striker, &mut crease.non_striker);
    }
    if over_complete {
        end_over(state);
    }
}

fn apply_wicket(state: &mut MatchState, kind: DismissalKind, fielder: Option<String>) {
    let MatchState {
        innings,
        crease,
        setup,
        ..
    } = &mut *state;
    let Some(innings) = innings.last_mut() else {
        return;
    };
    let (Some(striker), Some(bowler)) = (crease.striker, crease.bowler) else {
        return;
    };

    let bowler_name = innings.bowlers[bowler].name.clone();
    let figures = &mut innings.bowlers[bowler];
    figures.balls += 1;
    if kind.credits_bowler() {
        figures.wickets += 1;
    }
    innings.legal_balls += 1;
    innings.wickets += 1;

    let batter = &mut innings.batters[striker];
    batter.balls += 1;
    batter.dismissal = Some(Dismissal {
        kind,
        bowler: kind.credits_bowler().then_some(bowler_name),
        fielder,
    });
    let fall = FallOfWicket {
        wicket: innings.wickets,
        runs: innings.runs,
        legal_balls: innings.legal_balls,
        batter: batter.name.clone(),
    };
    log::debug!("Wicket: {} {}", fall.batter, kind.label());
    innings.fall_of_wickets.push(fall);
    crease.striker = None;

    // The batters change ends at the end of the over, so the vacancy does too.
    let over_complete = innings.legal_balls % 6 == 0;
    if over_complete {
        std::mem::swap(&mut crease.striker, &mut crease.non_striker);
    }
    let pending = innings.batters.len() < setup.roster_size();
    if !pending && crease.striker.is_none() {
        // Last man stands: the survivor faces every ball.
        crease.striker = crease.non_striker.take();
    }
    if over_complete {
        end_over(state);
    }
}

/// Close the bowler's over: completed count, maiden check, and the bowler steps aside.
fn end_over(state: &mut MatchState) {
    let MatchState {
        innings, crease, ..
    } = &mut *state;
    let (Some(innings), Some(idx)) = (innings.last_mut(), crease.bowler.take()) else {
        return;
    };
    let figures = &mut innings.bowlers[idx];
    figures.overs += 1;
    figures.balls = 0;
    if figures.over_runs == 0 {
        figures.maidens += 1;
    }
    figures.over_runs = 0;
    crease.previous_bowler = Some(figures.name.clone());
    log::debug!("End of over {}: {} {}", innings.completed_overs(), innings.team, innings.score_line());
}
