//! Seating Planner CLI.
//!
//! Generate demo rosters, seat them, and repair single rooms of a saved chart.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use seating_kernel::{EngineConfig, Progress, ProgressObserver, SeatingEngine};
use seating_planner::{ChartView, Roster, RosterGenerator, RosterGeneratorConfig, RunReport, placements};

#[derive(Parser)]
#[command(name = "seating-planner")]
#[command(about = "Assign people to two-seat desks across rooms, keeping desk partners diverse")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a demo roster.
    Generate {
        /// Preset: small, school, tight
        #[arg(short, long, default_value = "school")]
        preset: String,
        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Output file for the roster (JSON); printed when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Seat everyone on a roster.
    Assign {
        /// Roster file (JSON)
        #[arg(short, long)]
        roster: PathBuf,
        /// Keep desk partners within one gender code
        #[arg(long)]
        segregate: bool,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Engine settings (JSON)
        #[arg(short, long, env = "SEATING_CONFIG")]
        config: Option<PathBuf>,
        /// Output file for the run report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also print the per-group placement list
        #[arg(long)]
        placements: bool,
    },

    /// Reshuffle one room of a saved run.
    Repair {
        /// Roster file the run was made from (JSON)
        #[arg(short, long)]
        roster: PathBuf,
        /// Run report to update in place (JSON)
        #[arg(long)]
        report: PathBuf,
        /// Room id to reshuffle
        #[arg(long)]
        room: String,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show group head counts and capacity for a roster.
    Summary {
        /// Roster file (JSON)
        #[arg(short, long)]
        roster: PathBuf,
    },
}

/// Forwards engine progress to the log.
struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&mut self, progress: &Progress) {
        if progress.phase.is_terminal() {
            info!(percent = progress.percent, "{}", progress.label);
        } else {
            debug!(percent = progress.percent, "{}", progress.label);
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Generate {
            preset,
            seed,
            output,
        } => {
            let Some(config) = RosterGeneratorConfig::preset(&preset) else {
                bail!("unknown preset: {preset} (expected small, school or tight)");
            };
            let roster = RosterGenerator::new(config, seed).generate();

            match output {
                Some(output) => {
                    roster.save(&output)?;
                    info!(
                        people = roster.people.len(),
                        rooms = roster.rooms.len(),
                        "Roster written to {}",
                        output.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&roster)?),
            }
        }

        Commands::Assign {
            roster,
            segregate,
            seed,
            config,
            output,
            placements: show_placements,
        } => {
            let roster = Roster::load(&roster)?;
            let config = load_config(config.as_deref())?;
            let engine = SeatingEngine::new(config)?;

            if segregate && !roster.has_mixed_genders() {
                warn!("Segregation requested but the roster holds a single gender code");
            }

            let started_at = Utc::now();
            let mut rng = rng_for(seed);
            let outcome = engine.arrange_with(
                &roster.people,
                &roster.rooms,
                segregate,
                &mut rng,
                &mut TracingObserver,
            )?;

            let report = RunReport::from_outcome(
                outcome,
                started_at,
                seed,
                segregate,
                roster.total_seats(),
                engine.config(),
            );

            print!("{}", ChartView::new(&report.arrangement, &roster.rooms, segregate));
            if show_placements {
                println!("=== Placements ===");
                print!("{}", placements(&report.arrangement, &roster.rooms));
            }

            println!("\n=== Run Complete ===");
            println!("People: {} / Seats: {}", report.people, report.seats);
            println!("Resolved: {}", report.resolved);
            println!(
                "Attempts: {} (repair passes: {})",
                report.full_attempts, report.repair_passes
            );
            if let Some(warning) = &report.warning {
                println!("Warning: {warning}");
            }

            if let Some(output) = output {
                report.save(&output)?;
                println!("\nReport written to: {}", output.display());
            }
        }

        Commands::Repair {
            roster,
            report: report_path,
            room,
            seed,
        } => {
            let roster = Roster::load(&roster)?;
            let mut report = RunReport::load(&report_path)?;
            let engine = SeatingEngine::new(report.config.clone())?;

            let mut rng = rng_for(seed);
            let repaired = engine.rerandomize_room_with(
                &report.arrangement,
                &room,
                &roster.rooms,
                report.segregate,
                &mut rng,
            )?;
            report.apply_repair(repaired);
            report.save(&report_path)?;

            print!("{}", ChartView::new(&report.arrangement, &roster.rooms, report.segregate));
            println!(
                "Room {room} reshuffled; rooms with conflicts: {}",
                report.conflicted_rooms.len()
            );
        }

        Commands::Summary { roster } => {
            let roster = Roster::load(&roster)?;

            println!("=== Roster Summary ===");
            for (group, count) in roster.group_summary() {
                println!("{group}: {count}");
            }
            println!(
                "\nPeople: {} / Seats: {} in {} room(s)",
                roster.people.len(),
                roster.total_seats(),
                roster.rooms.len()
            );
            println!("Mixed genders: {}", roster.has_mixed_genders());
            if !roster.report.is_clean() {
                println!(
                    "Dropped rows: {} invalid, {} duplicate, {} room(s)",
                    roster.report.dropped_invalid,
                    roster.report.dropped_duplicates,
                    roster.report.dropped_rooms
                );
            }
            if roster.people.len() > roster.total_seats() {
                println!(
                    "Short by {} seat(s)",
                    roster.people.len() - roster.total_seats()
                );
            }
        }
    }

    Ok(())
}
