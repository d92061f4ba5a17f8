use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use coop::{
    autopilot::{Autopilot, AutopilotReport},
    events::EventTally,
    farm::Farm,
    scenario::ScenarioLoader,
    snapshot::SnapshotWriter,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless chicken farm runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/backyard.yaml")]
    scenario: PathBuf,

    /// Stop after this many simulated seconds (defaults to a full round)
    #[arg(long)]
    seconds: Option<f64>,

    /// Override frame length in milliseconds
    #[arg(long)]
    frame_ms: Option<f64>,

    /// Let a scripted player harvest, cure and feed
    #[arg(long)]
    autopilot: bool,

    /// Print the final snapshot as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Directory for periodic JSON snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Frames between snapshots (0 disables)
    #[arg(long, default_value_t = 0)]
    snapshot_interval: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(ms) = cli.frame_ms {
        scenario.frame_seconds = ms / 1000.0;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&scenario.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let frames = scenario.frames(cli.seconds);
    let mut farm = Farm::new(&scenario)?;
    let mut snapshots = SnapshotWriter::new(
        cli.snapshot_dir
            .unwrap_or_else(|| PathBuf::from("snapshots").join(&scenario.name)),
        cli.snapshot_interval,
    )?;
    let pilot = cli.autopilot.then(Autopilot::default);
    let mut totals = AutopilotReport::default();
    let mut tally = EventTally::default();
    let mut write_error = None;

    let played = farm.run_with_hook(scenario.frame_seconds, frames, |farm| {
        if let Some(pilot) = &pilot {
            let step = pilot.step(farm);
            totals.harvested += step.harvested;
            totals.cured += step.cured;
            totals.fed += step.fed;
        }
        for event in farm.drain_events() {
            tracing::debug!(?event, "farm event");
            tally.record(&event);
        }
        let frame = farm.world().tick();
        if write_error.is_none() {
            if let Err(err) = snapshots.maybe_write(frame, &farm.snapshot()) {
                write_error = Some(err);
            }
        }
    })?;
    if let Some(err) = write_error {
        return Err(err);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&farm.snapshot())?);
        return Ok(());
    }

    let economy = farm.economy();
    println!(
        "Scenario '{}' ran {} frames ({}s, {}s left). Chickens alive: {}. Eggs on the ground: {}. Money: {}.",
        scenario.name,
        played,
        economy.elapsed_display(),
        economy.remaining_display(),
        farm.final_score(),
        farm.world().egg_count(),
        economy.money_display()
    );
    println!(
        "Laid {} eggs ({} golden), hatched {}, starved {}, lost {} to disease, {} infections.{}",
        tally.eggs_laid,
        tally.golden_eggs,
        tally.hatched,
        tally.starved,
        tally.died_of_disease,
        tally.infections,
        if tally.outbreak_started {
            " Bird flu season is active."
        } else {
            ""
        }
    );
    if pilot.is_some() {
        println!(
            "Autopilot harvested {} eggs, cured {} chickens, fed {} times.",
            totals.harvested, totals.cured, totals.fed
        );
    }
    if farm.is_game_over() {
        println!("Game over! Final score: {}", farm.final_score());
    }
    Ok(())
}
