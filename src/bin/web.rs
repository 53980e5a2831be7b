//! Single binary web server: cricket scoring and tournaments over a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::NaiveDate;
use cricket_scorer_web::logic::{
    complete_fixture_from_match, declare_innings, decode_setup, encode_setup,
    match_fantasy_points, record_delivery, record_fixture_result, retire_batter,
    rosters_from_csv, select_batter, select_bowler, select_openers, snapshot, spectate_url,
    start_fixture, start_tournament, Outcome,
};
use cricket_scorer_web::models::{
    FixtureId, FixtureResult, MatchFormat, MatchId, MatchSetup, MatchState, TeamSheet, TeamSide,
    Tournament, TournamentFormat, TournamentId, MAX_OVERS,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-match entry: engine state, the fixture it belongs to, last activity (for auto-cleanup).
struct MatchEntry {
    state: MatchState,
    fixture: Option<(TournamentId, FixtureId)>,
    last_activity: Instant,
}

struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

type Matches = Data<RwLock<HashMap<MatchId, MatchEntry>>>;
type Tournaments = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: matches and tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct TeamBody {
    name: String,
    players: Vec<String>,
    #[serde(default)]
    captain: Option<String>,
}

impl From<TeamBody> for TeamSheet {
    fn from(body: TeamBody) -> Self {
        let sheet = TeamSheet::new(body.name, body.players);
        match body.captain {
            Some(captain) => sheet.with_captain(captain),
            None => sheet,
        }
    }
}

#[derive(Deserialize)]
struct CreateMatchBody {
    team_1: TeamBody,
    team_2: TeamBody,
    #[serde(default)]
    format: MatchFormat,
    /// Required for Custom; overrides the preset otherwise.
    #[serde(default)]
    overs: Option<u32>,
    #[serde(default)]
    last_man_stands: bool,
    #[serde(default)]
    toss_winner: TeamSide,
    #[serde(default)]
    batting_first: Option<TeamSide>,
    #[serde(default)]
    allow_declaration: bool,
    #[serde(default)]
    super_over_on_tie: bool,
    #[serde(default)]
    boundary_countback: bool,
}

impl From<CreateMatchBody> for MatchSetup {
    fn from(body: CreateMatchBody) -> Self {
        let mut setup = MatchSetup::new(body.team_1.into(), body.team_2.into())
            .with_format(body.format)
            .with_last_man_stands(body.last_man_stands)
            .with_toss(body.toss_winner, body.batting_first.unwrap_or(body.toss_winner))
            .with_declarations(body.allow_declaration)
            .with_super_over(body.super_over_on_tie, body.boundary_countback);
        if let Some(overs) = body.overs {
            setup = setup.with_overs(overs);
        }
        setup
    }
}

#[derive(Deserialize)]
struct ShareTokenBody {
    token: String,
}

#[derive(Deserialize)]
struct PlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct OpenersBody {
    striker: String,
    non_striker: String,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: TournamentFormat,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default = "default_tournament_overs")]
    overs: u32,
    #[serde(default)]
    last_man_stands: bool,
}

fn default_tournament_overs() -> u32 {
    20
}

#[derive(Deserialize, Default)]
struct StartTournamentBody {
    #[serde(default)]
    shuffle_draw: bool,
}

#[derive(Deserialize)]
struct CompleteFixtureBody {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    name: String,
}

#[derive(Deserialize)]
struct FixturePath {
    id: TournamentId,
    fixture_id: FixtureId,
}

#[derive(Deserialize)]
struct TokenPath {
    token: String,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": format!("No {}", what) }))
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    log::warn!("Rejected request: {}", e);
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Scheme and host the request came in on, for share links.
fn base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cricket-scorer-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn insert_match(matches: &Matches, state: MatchState, fixture: Option<(TournamentId, FixtureId)>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let id = state.id;
    let body = serde_json::json!({ "id": id, "snapshot": snapshot(&state) });
    g.insert(
        id,
        MatchEntry {
            state,
            fixture,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(body)
}

/// Create a match (returns its id; client stores it for subsequent requests).
#[post("/api/matches")]
async fn api_create_match(matches: Matches, body: Json<CreateMatchBody>) -> HttpResponse {
    let setup = MatchSetup::from(body.into_inner());
    match MatchState::new(setup) {
        Ok(state) => insert_match(&matches, state, None),
        Err(e) => bad_request(e),
    }
}

/// Create a match from a share token.
#[post("/api/matches/from-link")]
async fn api_create_match_from_link(matches: Matches, body: Json<ShareTokenBody>) -> HttpResponse {
    match decode_setup(&body.token).and_then(MatchState::new) {
        Ok(state) => insert_match(&matches, state, None),
        Err(e) => bad_request(e),
    }
}

/// Snapshot for the scoring screen. Touching a match refreshes last_activity.
#[get("/api/matches/{id}")]
async fn api_get_match(matches: Matches, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(snapshot(&entry.state))
        }
        None => not_found("match"),
    }
}

/// Full match state: every innings, batter and bowler.
#[get("/api/matches/{id}/scorecard")]
async fn api_scorecard(matches: Matches, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.state)
        }
        None => not_found("match"),
    }
}

/// Record one delivery.
#[post("/api/matches/{id}/deliveries")]
async fn api_record_delivery(matches: Matches, path: Path<MatchPath>, body: Json<Outcome>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("match"),
    };
    entry.last_activity = Instant::now();
    match record_delivery(&mut entry.state, body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(snapshot(&entry.state)),
        Err(e) => bad_request(e),
    }
}

/// Pick both opening batters.
#[post("/api/matches/{id}/openers")]
async fn api_select_openers(matches: Matches, path: Path<MatchPath>, body: Json<OpenersBody>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("match"),
    };
    entry.last_activity = Instant::now();
    match select_openers(&mut entry.state, body.striker.trim(), body.non_striker.trim()) {
        Ok(()) => HttpResponse::Ok().json(snapshot(&entry.state)),
        Err(e) => bad_request(e),
    }
}

/// Send in the next batter.
#[post("/api/matches/{id}/batter")]
async fn api_select_batter(matches: Matches, path: Path<MatchPath>, body: Json<PlayerBody>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("match"),
    };
    entry.last_activity = Instant::now();
    match select_batter(&mut entry.state, body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(snapshot(&entry.state)),
        Err(e) => bad_request(e),
    }
}

/// Pick the bowler for the next over.
#[post("/api/matches/{id}/bowler")]
async fn api_select_bowler(matches: Matches, path: Path<MatchPath>, body: Json<PlayerBody>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("match"),
    };
    entry.last_activity = Instant::now();
    match select_bowler(&mut entry.state, body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(snapshot(&entry.state)),
        Err(e) => bad_request(e),
    }
}

/// Retire a batter not out.
#[post("/api/matches/{id}/retire")]
async fn api_retire_batter(matches: Matches, path: Path<MatchPath>, body: Json<PlayerBody>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("match"),
    };
    entry.last_activity = Instant::now();
    match retire_batter(&mut entry.state, body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(snapshot(&entry.state)),
        Err(e) => bad_request(e),
    }
}

/// Declare the open innings closed (only when the setup allows it).
#[post("/api/matches/{id}/declare")]
async fn api_declare(matches: Matches, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match matches.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("match"),
    };
    entry.last_activity = Instant::now();
    match declare_innings(&mut entry.state) {
        Ok(()) => HttpResponse::Ok().json(snapshot(&entry.state)),
        Err(e) => bad_request(e),
    }
}

/// Share token and spectator URL for a match setup.
#[get("/api/matches/{id}/share")]
async fn api_share(req: HttpRequest, matches: Matches, path: Path<MatchPath>) -> HttpResponse {
    let g = match matches.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(entry) => {
            let setup = &entry.state.setup;
            HttpResponse::Ok().json(serde_json::json!({
                "token": encode_setup(setup),
                "url": spectate_url(&base_url(&req), setup),
            }))
        }
        None => not_found("match"),
    }
}

/// Fantasy points for one match.
#[get("/api/matches/{id}/fantasy")]
async fn api_match_fantasy(matches: Matches, path: Path<MatchPath>) -> HttpResponse {
    let g = match matches.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(entry) => HttpResponse::Ok().json(match_fantasy_points(&entry.state)),
        None => not_found("match"),
    }
}

/// Decode a share token so a spectator page can show the fixture.
#[get("/api/spectate/{token}")]
async fn api_spectate(path: Path<TokenPath>) -> HttpResponse {
    match decode_setup(&path.token) {
        Ok(setup) => HttpResponse::Ok().json(setup),
        Err(e) => bad_request(e),
    }
}

/// Create a new tournament in Setup.
#[post("/api/tournaments")]
async fn api_create_tournament(tournaments: Tournaments, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let start = body
        .start_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    if body.overs == 0 || body.overs > MAX_OVERS {
        return bad_request(format!("Overs must be between 1 and {}", MAX_OVERS));
    }
    let tournament = Tournament::new(body.name.trim(), body.format, start, body.overs, body.last_man_stands);
    let id = tournament.id;
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(tournaments: Tournaments, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => not_found("tournament"),
    }
}

/// Add a team (tournament must be in Setup).
#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(tournaments: Tournaments, path: Path<TournamentPath>, body: Json<TeamBody>) -> HttpResponse {
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("tournament"),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.add_team(body.into_inner().into()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    }
}

/// Add every team in a CSV body (`team,player[,captain]`). All or nothing.
#[post("/api/tournaments/{id}/teams/csv")]
async fn api_add_teams_csv(tournaments: Tournaments, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let teams = match rosters_from_csv(body.as_bytes()) {
        Ok(teams) => teams,
        Err(e) => return bad_request(e),
    };
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("tournament"),
    };
    entry.last_activity = Instant::now();
    let mut staged = entry.tournament.clone();
    for team in teams {
        if let Err(e) = staged.add_team(team) {
            return bad_request(e);
        }
    }
    entry.tournament = staged;
    HttpResponse::Ok().json(&entry.tournament)
}

/// Remove a team by name (tournament must be in Setup).
#[delete("/api/tournaments/{id}/teams/{name}")]
async fn api_remove_team(tournaments: Tournaments, path: Path<TournamentTeamPath>) -> HttpResponse {
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("tournament"),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match t.remove_team(&path.name) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    }
}

/// Start the tournament (Setup -> Ongoing): fixtures and an empty points table.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    tournaments: Tournaments,
    path: Path<TournamentPath>,
    body: Option<Json<StartTournamentBody>>,
) -> HttpResponse {
    let shuffle_draw = body.map(|b| b.into_inner()).unwrap_or_default().shuffle_draw;
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("tournament"),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match start_tournament(t, shuffle_draw) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    }
}

/// Start a scoring engine for a fixture; the match remembers its fixture.
#[post("/api/tournaments/{id}/fixtures/{fixture_id}/match")]
async fn api_start_fixture(matches: Matches, tournaments: Tournaments, path: Path<FixturePath>) -> HttpResponse {
    let setup = {
        let mut g = match tournaments.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let entry = match g.get_mut(&path.id) {
            Some(e) => e,
            None => return not_found("tournament"),
        };
        entry.last_activity = Instant::now();
        match start_fixture(&mut entry.tournament, path.fixture_id) {
            Ok(setup) => setup,
            Err(e) => return bad_request(e),
        }
    };
    match MatchState::new(setup) {
        Ok(state) => insert_match(&matches, state, Some((path.id, path.fixture_id))),
        Err(e) => bad_request(e),
    }
}

/// Enter a fixture result by hand (e.g. a washed-out match).
#[put("/api/tournaments/{id}/fixtures/{fixture_id}/result")]
async fn api_set_fixture_result(
    tournaments: Tournaments,
    path: Path<FixturePath>,
    body: Json<FixtureResult>,
) -> HttpResponse {
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("tournament"),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match record_fixture_result(t, path.fixture_id, body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    }
}

/// Close a fixture from its finished match.
#[post("/api/tournaments/{id}/fixtures/{fixture_id}/complete")]
async fn api_complete_fixture(
    matches: Matches,
    tournaments: Tournaments,
    path: Path<FixturePath>,
    body: Json<CompleteFixtureBody>,
) -> HttpResponse {
    let state = {
        let g = match matches.read() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        match g.get(&body.match_id) {
            Some(entry) if entry.fixture == Some((path.id, path.fixture_id)) => entry.state.clone(),
            Some(_) => return bad_request("That match was not started for this fixture"),
            None => return not_found("match"),
        }
    };
    let mut g = match tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found("tournament"),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match complete_fixture_from_match(t, path.fixture_id, &state) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    }
}

/// Standings sorted by points, then net run rate.
#[get("/api/tournaments/{id}/points-table")]
async fn api_points_table(tournaments: Tournaments, path: Path<TournamentPath>) -> HttpResponse {
    let g = match tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(entry) => {
            let rows: Vec<_> = entry
                .tournament
                .sorted_points_table()
                .into_iter()
                .map(|s| {
                    let nrr = s.net_run_rate();
                    serde_json::json!({ "standing": s, "net_run_rate": nrr })
                })
                .collect();
            HttpResponse::Ok().json(rows)
        }
        None => not_found("tournament"),
    }
}

/// Fantasy leaderboard summed over completed fixtures.
#[get("/api/tournaments/{id}/fantasy")]
async fn api_tournament_fantasy(tournaments: Tournaments, path: Path<TournamentPath>) -> HttpResponse {
    let g = match tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(entry) => HttpResponse::Ok().json(&entry.tournament.fantasy),
        None => not_found("tournament"),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let matches = Data::new(RwLock::new(HashMap::<MatchId, MatchEntry>::new()));
    let tournaments = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove matches and tournaments inactive for 12+ hours
    let matches_cleanup = matches.clone();
    let tournaments_cleanup = tournaments.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            if let Ok(mut g) = matches_cleanup.write() {
                let before = g.len();
                g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
                let removed = before - g.len();
                if removed > 0 {
                    log::info!("Cleaned up {} inactive match(es) (no activity for 12h)", removed);
                }
            }
            if let Ok(mut g) = tournaments_cleanup.write() {
                let before = g.len();
                g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
                let removed = before - g.len();
                if removed > 0 {
                    log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
                }
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(matches.clone())
            .app_data(tournaments.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_match)
            .service(api_create_match_from_link)
            .service(api_get_match)
            .service(api_scorecard)
            .service(api_record_delivery)
            .service(api_select_openers)
            .service(api_select_batter)
            .service(api_select_bowler)
            .service(api_retire_batter)
            .service(api_declare)
            .service(api_share)
            .service(api_match_fantasy)
            .service(api_spectate)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_teams_csv)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_start_tournament)
            .service(api_start_fixture)
            .service(api_set_fixture_result)
            .service(api_complete_fixture)
            .service(api_points_table)
            .service(api_tournament_fantasy)
    })
    .bind(bind)?
    .run()
    .await
}
