//! Powerhouse - Strength Training Periodization Engine
//!
//! Command line front end over the planner state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use powerhouse::fatigue::{FrequencyConstraints, RecoveryCapacity, TrainingAge};
use powerhouse::storage::config::{load_config, load_config_from};
use powerhouse::volume::{SessionFeedback, StimulusFeedback};
use powerhouse::Planner;

#[derive(Parser)]
#[command(
    name = "powerhouse",
    version,
    about = "Strength training periodization planner",
    long_about = "Track volume landmarks, deloads and resensitization phases for a training block."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the platform data directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Show week, block, phase and target RIR
    Status,

    /// Advance to the next training week
    NextWeek,

    /// Start a deload
    Deload {
        /// Use the fatigue-based strategy instead of the basic 50% deload
        #[arg(long)]
        strategy: bool,
    },

    /// End the active deload and return to MEV
    EndDeload,

    /// Start a resensitization phase at maintenance volume
    Resensitize,

    /// End the active resensitization phase
    EndResensitization,

    /// Show or set a muscle's weekly sets
    Volume {
        muscle: String,

        /// New weekly set count
        #[arg(long)]
        sets: Option<i64>,
    },

    /// Add (or remove, when negative) weekly sets for a muscle
    AddSets {
        muscle: String,

        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },

    /// Recommend next session's sets for a muscle from session feedback
    Progression {
        muscle: String,

        /// Soreness since the last session, 0-3
        #[arg(long, default_value = "1")]
        soreness: u8,

        /// Performance against the last session, 0 (worse) to 3 (much better)
        #[arg(long, default_value = "1")]
        performance: u8,

        /// Mind-muscle connection, pump and disruption ratings, 0-3 each
        #[arg(long, num_args = 3, value_names = ["MMC", "PUMP", "DISRUPTION"], default_values = ["0", "0", "0"])]
        stimulus: Vec<u8>,

        #[arg(long)]
        illness: bool,
    },

    /// Recommend a weekly training frequency for a muscle
    Frequency {
        muscle: String,

        /// Training days available per week
        #[arg(long, default_value = "6")]
        days: u32,

        /// beginner, intermediate or advanced
        #[arg(long, default_value = "intermediate")]
        age: String,

        /// low, normal or high
        #[arg(long, default_value = "normal")]
        recovery: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    tracing::debug!(path = %config.state_path().display(), "Using training state");

    let mut planner = Planner::open(&config)?;

    match cli.command {
        Command::Status => {
            print_json(&planner.summary())?;
            for trigger in planner.deload_triggers() {
                println!("deload trigger: {}", trigger);
            }
            println!("{}", planner.deload_status().message());
        }
        Command::NextWeek => {
            let transition = planner.next_week();
            print_json(&transition)?;
        }
        Command::Deload { strategy } => {
            if strategy {
                let plan = planner.calculate_deload_strategy();
                planner.execute_deload(&plan);
                print_json(&plan)?;
            } else {
                planner.start_deload();
                print_json(&planner.summary())?;
            }
        }
        Command::EndDeload => {
            planner.exit_deload()?;
            print_json(&planner.summary())?;
        }
        Command::Resensitize => {
            planner.start_resensitization();
            print_json(&planner.summary())?;
        }
        Command::EndResensitization => {
            planner.end_resensitization()?;
            print_json(&planner.summary())?;
        }
        Command::Volume { muscle, sets } => {
            if let Some(sets) = sets {
                planner.update_weekly_sets(&muscle, sets)?;
            }
            let current = planner.state().volume.weekly_sets(&muscle);
            let status = planner.volume_status(&muscle, None)?;
            println!("{}: {} sets ({})", muscle, current, status);
        }
        Command::AddSets { muscle, delta } => {
            let current = planner.add_sets(&muscle, delta)?;
            let status = planner.volume_status(&muscle, None)?;
            println!("{}: {} sets ({})", muscle, current, status);
        }
        Command::Progression {
            muscle,
            soreness,
            performance,
            stimulus,
            illness,
        } => {
            let rating = |i: usize| stimulus.get(i).copied().unwrap_or(0);
            let feedback = SessionFeedback {
                stimulus: StimulusFeedback {
                    mmc: rating(0),
                    pump: rating(1),
                    disruption: rating(2),
                },
                soreness,
                performance,
                has_illness: illness,
            };
            print_json(&planner.get_volume_progression(&muscle, &feedback)?)?;
        }
        Command::Frequency {
            muscle,
            days,
            age,
            recovery,
        } => {
            let constraints = FrequencyConstraints {
                available_days: days,
                training_age: age.parse::<TrainingAge>().map_err(anyhow::Error::msg)?,
                recovery_capacity: recovery
                    .parse::<RecoveryCapacity>()
                    .map_err(anyhow::Error::msg)?,
                ..Default::default()
            };
            print_json(&planner.calculate_optimal_frequency(&muscle, &constraints)?)?;
        }
    }

    Ok(())
}
