// HTTP handler bindings for the arena
//
// Thin wrappers that bind Rocket routes to the arena's interface. Handlers pull
// the runtime from managed state, delegate one call under the arena lock and
// serialize the result. Rendering clients poll /state.

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};
use std::time::Instant;

use snake_arena::runtime::ArenaRuntime;
use snake_arena::snapshot::{ArenaSnapshot, ScorePage};
use snake_arena::types::Direction;

/// Score board rows per page when the client does not say
const DEFAULT_PAGE_SIZE: usize = 10;

/// GET / endpoint
/// Server metadata
#[get("/")]
pub fn index(runtime: &rocket::State<ArenaRuntime>) -> Json<Value> {
    let (screen, seed, cells) =
        runtime.read(|arena| (arena.screen(), arena.seed(), arena.grid().cell_count()));
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "screen": screen,
        "seed": seed,
        "cell_count": cells,
        "running": runtime.is_running(),
    }))
}

/// GET /state endpoint
/// Full render snapshot
#[get("/state")]
pub fn state(runtime: &rocket::State<ArenaRuntime>) -> Json<ArenaSnapshot> {
    Json(runtime.read(|arena| arena.snapshot()))
}

/// GET /scores endpoint
/// One page of the score board; the client owns the scroll offset
#[get("/scores?<offset>&<limit>")]
pub fn scores(
    runtime: &rocket::State<ArenaRuntime>,
    offset: Option<usize>,
    limit: Option<usize>,
) -> Json<ScorePage> {
    let offset = offset.unwrap_or(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
    Json(runtime.read(|arena| arena.score_page(offset, limit)))
}

/// POST /direction/<dir> endpoint
/// Player steering input
#[post("/direction/<dir>")]
pub fn direction(runtime: &rocket::State<ArenaRuntime>, dir: &str) -> Result<Json<Value>, Status> {
    let direction = Direction::parse(dir).map_err(|_| Status::BadRequest)?;
    let accepted = runtime.with_arena(|arena| arena.on_direction_input(direction));
    Ok(Json(json!({ "accepted": accepted })))
}

/// POST /menu/<index> endpoint
/// Menu selection on the current screen
#[post("/menu/<index>")]
pub fn menu(runtime: &rocket::State<ArenaRuntime>, index: usize) -> Json<Value> {
    let (accepted, screen) = runtime.with_arena(|arena| {
        let accepted = arena.select_menu_option(index, Instant::now());
        (accepted, arena.screen())
    });
    Json(json!({ "accepted": accepted, "screen": screen }))
}

/// POST /reset endpoint
#[post("/reset")]
pub fn reset(runtime: &rocket::State<ArenaRuntime>) -> Json<Value> {
    transition(runtime, |arena| arena.request_reset(Instant::now()))
}

/// POST /scoreboard endpoint
#[post("/scoreboard")]
pub fn scoreboard(runtime: &rocket::State<ArenaRuntime>) -> Json<Value> {
    transition(runtime, |arena| arena.request_scoreboard())
}

/// POST /back endpoint
#[post("/back")]
pub fn back(runtime: &rocket::State<ArenaRuntime>) -> Json<Value> {
    transition(runtime, |arena| arena.request_back_to_menu())
}

/// POST /tick endpoint
/// Steps every due agent once; for hosts that drive the arena per frame
/// instead of running the agent loops
#[post("/tick")]
pub fn tick(runtime: &rocket::State<ArenaRuntime>) -> Json<Value> {
    let acted = runtime.with_arena(|arena| arena.tick(Instant::now()));
    Json(json!({ "acted": acted }))
}

fn transition(
    runtime: &ArenaRuntime,
    f: impl FnOnce(&mut snake_arena::arena::Arena) -> bool,
) -> Json<Value> {
    let (accepted, screen) = runtime.with_arena(|arena| {
        let accepted = f(arena);
        (accepted, arena.screen())
    });
    Json(json!({ "accepted": accepted, "screen": screen }))
}
