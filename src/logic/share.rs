//! Spectator share links: a `MatchSetup` packed into a URL parameter.
//!
//! Only the setup travels; live state does not. Decoding fills in defaults for anything
//! missing and derives the wicket limit from the rosters.

use crate::models::{ConfigInvalid, MatchError, MatchFormat, MatchSetup, TeamSheet, TeamSide};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SharedTeam {
    #[serde(default)]
    name: String,
    #[serde(default)]
    players: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    captain: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SharePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<MatchFormat>,
    #[serde(default)]
    team_1: SharedTeam,
    #[serde(default)]
    team_2: SharedTeam,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overs: Option<u32>,
    #[serde(default)]
    last_man_stands: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    toss_winner: Option<TeamSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    batting_first: Option<TeamSide>,
    #[serde(default)]
    allow_declaration: bool,
    #[serde(default)]
    super_over_on_tie: bool,
    #[serde(default)]
    boundary_countback: bool,
}

impl From<&TeamSheet> for SharedTeam {
    fn from(team: &TeamSheet) -> Self {
        Self {
            name: team.name.clone(),
            players: team.players.clone(),
            captain: Some(team.captain.clone()),
        }
    }
}

impl From<SharedTeam> for TeamSheet {
    fn from(shared: SharedTeam) -> Self {
        let sheet = TeamSheet::new(shared.name, shared.players);
        match shared.captain {
            Some(captain) => sheet.with_captain(captain),
            None => sheet,
        }
    }
}

/// Encode a setup as a URL-safe token.
pub fn encode_setup(setup: &MatchSetup) -> String {
    let payload = SharePayload {
        format: Some(setup.format),
        team_1: SharedTeam::from(&setup.team_1),
        team_2: SharedTeam::from(&setup.team_2),
        overs: Some(setup.overs),
        last_man_stands: setup.last_man_stands,
        toss_winner: Some(setup.toss_winner),
        batting_first: Some(setup.batting_first),
        allow_declaration: setup.allow_declaration,
        super_over_on_tie: setup.super_over_on_tie,
        boundary_countback: setup.boundary_countback,
    };
    // Plain structs with string keys always serialize.
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a share token back into a validated setup.
pub fn decode_setup(token: &str) -> Result<MatchSetup, MatchError> {
    let token = token.trim();
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim_end_matches('='))
        .or_else(|_| STANDARD.decode(token))
        .map_err(|e| ConfigInvalid::MalformedShareLink(e.to_string()))?;
    let payload: SharePayload = serde_json::from_slice(&bytes)
        .map_err(|e| ConfigInvalid::MalformedShareLink(e.to_string()))?;

    let format = payload.format.unwrap_or_default();
    let overs = payload
        .overs
        .or_else(|| format.default_overs())
        .unwrap_or(20);
    let toss_winner = payload.toss_winner.unwrap_or_default();
    let setup = MatchSetup {
        format,
        team_1: payload.team_1.into(),
        team_2: payload.team_2.into(),
        overs,
        last_man_stands: payload.last_man_stands,
        toss_winner,
        batting_first: payload.batting_first.unwrap_or(toss_winner),
        allow_declaration: payload.allow_declaration,
        super_over_on_tie: payload.super_over_on_tie,
        boundary_countback: payload.boundary_countback,
    }
    .normalized();
    setup.validate()?;
    Ok(setup)
}

/// Spectator URL under `base` (no trailing slash needed).
pub fn spectate_url(base: &str, setup: &MatchSetup) -> String {
    format!("{}/spectate?setup={}", base.trim_end_matches('/'), encode_setup(setup))
}
