//! Roster import from CSV (`team,player[,captain]`).

use crate::models::{ConfigInvalid, MatchError, TeamSheet};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRow {
    team: String,
    player: String,
    #[serde(default)]
    captain: Option<String>,
}

fn is_truthy(flag: &str) -> bool {
    matches!(
        flag.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "c" | "captain"
    )
}

/// Read team sheets from CSV with a header row. Teams keep the order they first appear in.
pub fn rosters_from_csv<R: Read>(reader: R) -> Result<Vec<TeamSheet>, MatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut teams: Vec<TeamSheet> = Vec::new();
    for (line, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = row.map_err(|e| {
            ConfigInvalid::MalformedRoster(format!("row {}: {}", line + 2, e))
        })?;
        if row.team.is_empty() || row.player.is_empty() {
            return Err(ConfigInvalid::MalformedRoster(format!(
                "row {}: team and player are required",
                line + 2
            ))
            .into());
        }
        let is_captain = row.captain.as_deref().map(is_truthy).unwrap_or(false);
        let idx = match teams.iter().position(|t| t.name == row.team) {
            Some(idx) => idx,
            None => {
                teams.push(TeamSheet::new(row.team.clone(), Vec::<String>::new()));
                teams.len() - 1
            }
        };
        let team = &mut teams[idx];
        if team.players.is_empty() || is_captain {
            team.captain = row.player.clone();
        }
        team.players.push(row.player);
    }

    if teams.is_empty() {
        return Err(ConfigInvalid::MalformedRoster("no players listed".to_string()).into());
    }
    for team in &teams {
        team.validate()?;
    }
    log::info!("Imported {} team(s) from CSV", teams.len());
    Ok(teams)
}
