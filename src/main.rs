#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;
use std::time::Instant;

use snake_arena::arena::Arena;
use snake_arena::config::Config;
use snake_arena::journal::EventJournal;
use snake_arena::runtime::ArenaRuntime;

mod handler;

#[launch]
async fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Snake Arena Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let journal = EventJournal::new(config.debug.journal_enabled, &config.debug.journal_path).await;
    let arena = Arena::with_file_store(config, Instant::now());
    let runtime = ArenaRuntime::new(arena, journal);

    rocket::build()
        .manage(runtime)
        .attach(AdHoc::on_liftoff("Agent Loops", |rocket| {
            Box::pin(async move {
                if let Some(runtime) = rocket.state::<ArenaRuntime>() {
                    runtime.start();
                }
            })
        }))
        .attach(AdHoc::on_shutdown("Agent Loops Shutdown", |rocket| {
            Box::pin(async move {
                if let Some(runtime) = rocket.state::<ArenaRuntime>() {
                    runtime.shutdown().await;
                }
            })
        }))
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "snake-arena");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::state,
                handler::scores,
                handler::direction,
                handler::menu,
                handler::reset,
                handler::scoreboard,
                handler::back,
                handler::tick
            ],
        )
}
