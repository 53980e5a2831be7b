//! Batter and bowler selection, and retirements.

use crate::logic::innings::{innings_over, seal_innings};
use crate::models::{BatterRecord, InvalidSelection, MatchError, MatchPhase, MatchState};

/// Send in a batter. Fills the striker's end first, then the non-striker's.
///
/// Valid while waiting for the openers or for a replacement after a wicket.
pub fn select_batter(state: &mut MatchState, name: &str) -> Result<(), MatchError> {
    let phase = state.phase();
    if !matches!(phase, MatchPhase::AwaitingBatters | MatchPhase::AwaitingBatter) {
        return Err(MatchError::NotReady(phase));
    }
    let name = name.trim();
    check_batter(state, name)?;

    let MatchState {
        innings, crease, ..
    } = &mut *state;
    let Some(innings) = innings.last_mut() else {
        return Err(MatchError::NotReady(phase));
    };
    innings.batters.push(BatterRecord::new(name));
    let idx = innings.batters.len() - 1;
    if crease.striker.is_none() {
        crease.striker = Some(idx);
    } else {
        crease.non_striker = Some(idx);
    }
    log::debug!("{} comes in for {}", name, innings.team);
    Ok(())
}

/// Pick both openers at once (striker first).
pub fn select_openers(state: &mut MatchState, striker: &str, non_striker: &str) -> Result<(), MatchError> {
    let phase = state.phase();
    if phase != MatchPhase::AwaitingBatters {
        return Err(MatchError::NotReady(phase));
    }
    if striker.trim() == non_striker.trim() {
        return Err(InvalidSelection::AlreadyBatting(non_striker.trim().to_string()).into());
    }
    check_batter(state, striker.trim())?;
    check_batter(state, non_striker.trim())?;
    select_batter(state, striker)?;
    select_batter(state, non_striker)
}

fn check_batter(state: &MatchState, name: &str) -> Result<(), InvalidSelection> {
    let in_roster = state
        .batting_team()
        .map(|t| t.has_player(name))
        .unwrap_or(false);
    if !in_roster {
        return Err(InvalidSelection::UnknownPlayer(name.to_string()));
    }
    if let Some(record) = state.open_innings().and_then(|i| i.batter(name)) {
        return Err(if record.is_out() {
            InvalidSelection::AlreadyOut(name.to_string())
        } else if record.retired {
            InvalidSelection::AlreadyRetired(name.to_string())
        } else {
            InvalidSelection::AlreadyBatting(name.to_string())
        });
    }
    Ok(())
}

/// Hand the ball to a bowler for the next over. The previous over's bowler is refused.
pub fn select_bowler(state: &mut MatchState, name: &str) -> Result<(), MatchError> {
    let phase = state.phase();
    if phase != MatchPhase::AwaitingBowler {
        return Err(MatchError::NotReady(phase));
    }
    let name = name.trim();
    let in_field = state
        .fielding_team()
        .map(|t| t.has_player(name))
        .unwrap_or(false);
    if !in_field {
        return Err(InvalidSelection::UnknownPlayer(name.to_string()).into());
    }
    if state.crease.previous_bowler.as_deref() == Some(name) {
        return Err(InvalidSelection::ConsecutiveOvers(name.to_string()).into());
    }

    let MatchState {
        innings, crease, ..
    } = &mut *state;
    let Some(innings) = innings.last_mut() else {
        return Err(MatchError::NotReady(phase));
    };
    crease.bowler = Some(innings.bowler_index(name));
    log::debug!("{} to bowl over {}", name, innings.completed_overs() + 1);
    Ok(())
}

/// A batter at the crease retires not out.
///
/// Refused when nobody could replace them and last-man-stands does not let the partner
/// carry on alone.
pub fn retire_batter(state: &mut MatchState, name: &str) -> Result<(), MatchError> {
    let phase = state.phase();
    if !matches!(phase, MatchPhase::InProgress | MatchPhase::AwaitingBowler) {
        return Err(MatchError::NotReady(phase));
    }
    let name = name.trim();
    let Some(innings) = state.open_innings() else {
        return Err(MatchError::NotReady(phase));
    };
    let end = state
        .crease
        .live_batters()
        .find(|&i| innings.batters[i].name == name)
        .ok_or_else(|| InvalidSelection::NotBatting(name.to_string()))?;
    let partner_stays = state.crease.live_batters().count() == 2;
    let has_pending = !state.pending_batters().is_empty();
    if !has_pending && !(state.setup.last_man_stands && partner_stays) {
        return Err(InvalidSelection::NoReplacement.into());
    }

    let MatchState {
        innings, crease, ..
    } = &mut *state;
    if let Some(innings) = innings.last_mut() {
        innings.batters[end].retired = true;
    }
    if crease.striker == Some(end) {
        crease.striker = None;
    } else {
        crease.non_striker = None;
    }
    if !has_pending {
        // The partner carries on alone and takes strike.
        crease.striker = crease.striker.or(crease.non_striker.take());
    }
    log::debug!("{} retires", name);

    if let Some(over) = innings_over(state) {
        seal_innings(state, over);
    }
    Ok(())
}
