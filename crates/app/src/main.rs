//! Wayfarer CLI

use std::process;

use wayfarer_app::{
    api::TourApi,
    config::{Cli, Command, SimulateArgs},
    context::AppContext,
    fixtures::WalkFixture,
    observability::init_subscriber,
    simulation::run_walk,
};

#[tokio::main]
pub async fn main() {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = init_subscriber(&cli.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Simulate(args) => simulate(args).await,
    }
}

async fn simulate(args: SimulateArgs) -> Result<(), String> {
    let fixture = WalkFixture::from_path(&args.fixture)
        .map_err(|error| format!("failed to load fixture: {error}"))?;

    tracing::info!(fixture = %args.fixture.display(), "replaying walk");

    let api = TourApi::new(AppContext::in_memory());
    let mut transcript = Vec::new();

    let result = run_walk(&api, fixture, &mut transcript).await;

    for entry in &transcript {
        let line = if args.pretty {
            serde_json::to_string_pretty(entry)
        } else {
            serde_json::to_string(entry)
        }
        .map_err(|error| format!("failed to encode response: {error}"))?;

        println!("{line}");
    }

    result.map_err(|error| format!("walk failed: {error}"))
}
