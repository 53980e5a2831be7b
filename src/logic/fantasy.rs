//! Fantasy points for batting, bowling and fielding.

use crate::models::{BatterRecord, BowlerFigures, DismissalKind, FantasyPoints, MatchState};

/// Runs, boundary bonuses, milestones and a strike-rate adjustment after 10 balls.
pub fn batting_points(batter: &BatterRecord) -> i32 {
    let mut points = batter.runs as i32;
    points += batter.fours as i32;
    points += batter.sixes as i32 * 2;

    if batter.runs >= 30 {
        points += 4;
    }
    if batter.runs >= 50 {
        points += 8;
    }
    if batter.runs >= 100 {
        points += 16;
    }

    if batter.balls >= 10 {
        let sr = batter.strike_rate();
        points += if sr >= 170.0 {
            6
        } else if sr >= 150.0 {
            4
        } else if sr >= 130.0 {
            2
        } else if sr < 50.0 {
            -4
        } else if sr < 70.0 {
            -2
        } else {
            0
        };
    }
    points
}

/// Wickets, maidens, haul bonuses and an economy adjustment after two overs.
pub fn bowling_points(bowler: &BowlerFigures) -> i32 {
    let mut points = bowler.wickets as i32 * 25;
    points += bowler.maidens as i32 * 12;

    if bowler.legal_balls() >= 12 {
        let economy = bowler.economy();
        points += if economy <= 5.0 {
            6
        } else if economy <= 6.0 {
            4
        } else if economy <= 7.0 {
            2
        } else if economy >= 12.0 {
            -6
        } else if economy >= 11.0 {
            -4
        } else if economy >= 10.0 {
            -2
        } else {
            0
        };
    }

    if bowler.wickets >= 3 {
        points += 4;
    }
    if bowler.wickets >= 5 {
        points += 8;
    }
    points
}

const CATCH_POINTS: i32 = 8;
const STUMPING_POINTS: i32 = 12;
const RUN_OUT_POINTS: i32 = 6;

fn entry<'a>(table: &'a mut Vec<FantasyPoints>, name: &str, team: &str) -> &'a mut FantasyPoints {
    match table.iter().position(|p| p.player == name && p.team == team) {
        Some(idx) => &mut table[idx],
        None => {
            table.push(FantasyPoints::new(name, team));
            let last = table.len() - 1;
            &mut table[last]
        }
    }
}

/// Points for every player who batted, bowled or fielded, across all innings, best first.
pub fn match_fantasy_points(state: &MatchState) -> Vec<FantasyPoints> {
    let mut table: Vec<FantasyPoints> = Vec::new();
    for innings in &state.innings {
        let batting = innings.team.as_str();
        let fielding = state.setup.team(innings.batting.opponent()).name.as_str();

        for batter in &innings.batters {
            if batter.balls == 0 && batter.runs == 0 && !batter.is_out() {
                continue;
            }
            let e = entry(&mut table, &batter.name, batting);
            e.runs += batter.runs;
            e.fours += batter.fours;
            e.sixes += batter.sixes;
            e.points += batting_points(batter);

            let Some(dismissal) = &batter.dismissal else {
                continue;
            };
            let Some(fielder) = &dismissal.fielder else {
                continue;
            };
            let f = entry(&mut table, fielder, fielding);
            match dismissal.kind {
                DismissalKind::Caught => {
                    f.catches += 1;
                    f.points += CATCH_POINTS;
                }
                DismissalKind::Stumped => {
                    f.stumpings += 1;
                    f.points += STUMPING_POINTS;
                }
                DismissalKind::RunOut => {
                    f.run_outs += 1;
                    f.points += RUN_OUT_POINTS;
                }
                _ => {}
            }
        }

        for bowler in &innings.bowlers {
            let e = entry(&mut table, &bowler.name, fielding);
            e.wickets += bowler.wickets;
            e.points += bowling_points(bowler);
        }
    }
    table.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.player.cmp(&b.player)));
    table
}

/// Add one match's points into a running leaderboard, keeping it sorted.
pub fn merge_fantasy_points(leaderboard: &mut Vec<FantasyPoints>, points: &[FantasyPoints]) {
    for p in points {
        let e = entry(leaderboard, &p.player, &p.team);
        e.absorb(p);
    }
    leaderboard.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.player.cmp(&b.player)));
}
