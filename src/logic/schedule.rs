//! Tournament start: fixture generation for league-style and knockout formats.

use crate::models::{
    Fixture, TeamStanding, Tournament, TournamentError, TournamentFormat, TournamentStatus,
};
use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;

/// Start the tournament: generate fixtures and an empty points table, Setup -> Ongoing.
///
/// With `shuffle_draw` the team order (knockout seeding included) is randomised first.
pub fn start_tournament(tournament: &mut Tournament, shuffle_draw: bool) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Setup {
        return Err(TournamentError::InvalidState);
    }
    let required = tournament.format.min_teams();
    if tournament.teams.len() < required {
        return Err(TournamentError::NotEnoughTeams { required });
    }

    let mut names: Vec<String> = tournament.teams.iter().map(|t| t.name.clone()).collect();
    if shuffle_draw {
        names.shuffle(&mut rand::thread_rng());
    }

    let start = tournament.start_date;
    tournament.fixtures = match tournament.format {
        TournamentFormat::RoundRobin => round_robin_fixtures(&names, start, false),
        TournamentFormat::TriSeries | TournamentFormat::League => {
            round_robin_fixtures(&names, start, true)
        }
        TournamentFormat::Knockout => knockout_fixtures(&names, start),
    };
    tournament.points_table = tournament
        .teams
        .iter()
        .map(|t| TeamStanding::new(t.name.clone()))
        .collect();
    tournament.status = TournamentStatus::Ongoing;
    log::info!(
        "Tournament {} started: {} teams, {} fixtures",
        tournament.name,
        tournament.teams.len(),
        tournament.fixtures.len()
    );
    Ok(())
}

/// One fixture per day from the start date.
fn match_day(start: NaiveDate, number: u32) -> NaiveDate {
    start
        .checked_add_days(Days::new(u64::from(number.saturating_sub(1))))
        .unwrap_or(start)
}

/// Every pair once in listing order; `return_legs` adds the reversed pairings afterwards.
fn round_robin_fixtures(names: &[String], start: NaiveDate, return_legs: bool) -> Vec<Fixture> {
    let mut pairs: Vec<(&String, &String)> = Vec::new();
    for (i, home) in names.iter().enumerate() {
        for away in &names[i + 1..] {
            pairs.push((home, away));
        }
    }
    if return_legs {
        let reversed: Vec<_> = pairs.iter().map(|&(a, b)| (b, a)).collect();
        pairs.extend(reversed);
    }

    pairs
        .into_iter()
        .zip(1u32..)
        .map(|((a, b), number)| {
            Fixture::new(number, Some(a.clone()), Some(b.clone()), match_day(start, number))
        })
        .collect()
}

/// Single-elimination bracket over the next power of two. The first seeds get byes
/// straight into round 2; later rounds start empty and fill as winners advance.
fn knockout_fixtures(names: &[String], start: NaiveDate) -> Vec<Fixture> {
    let slots = names.len().next_power_of_two();
    let rounds = slots.trailing_zeros();
    let byes = slots - names.len();
    let mut seeds = names.iter().cloned();
    let mut fixtures = Vec::new();
    let mut number = 1u32;
    let mut byes_through: Vec<(usize, String)> = Vec::new();

    for pair in 0..slots / 2 {
        if pair < byes {
            if let Some(team) = seeds.next() {
                byes_through.push((pair, team));
            }
            continue;
        }
        let mut fixture = Fixture::new(number, seeds.next(), seeds.next(), match_day(start, number));
        fixture.round = Some(1);
        fixture.slot = pair as u32;
        fixtures.push(fixture);
        number += 1;
    }

    for round in 2..=rounds {
        for slot in 0..(slots >> round) {
            let mut fixture = Fixture::new(number, None, None, match_day(start, number));
            fixture.round = Some(round);
            fixture.slot = slot as u32;
            fixtures.push(fixture);
            number += 1;
        }
    }

    for (pair, team) in byes_through {
        place_winner(&mut fixtures, 1, pair as u32, team);
    }
    fixtures
}

/// Put the winner of (round, slot) into their next-round fixture. No-op after the final.
pub(crate) fn place_winner(fixtures: &mut [Fixture], round: u32, slot: u32, team: String) {
    let next = fixtures
        .iter_mut()
        .find(|f| f.round == Some(round + 1) && f.slot == slot / 2);
    if let Some(next) = next {
        if slot % 2 == 0 {
            next.team_1 = Some(team);
        } else {
            next.team_2 = Some(team);
        }
    }
}
