mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    cmd_adherence, cmd_exercise, cmd_history, cmd_log, cmd_reminder, cmd_setup,
    cmd_targets_recalculate, cmd_targets_set, cmd_targets_show, cmd_today, cmd_unlog, cmd_water,
    cmd_weight_delete, cmd_weight_history, cmd_weight_log, cmd_weight_stats, cmd_wipe,
};
use crate::config::Config;
use portion_core::service::PortionService;

#[derive(Parser)]
#[command(
    name = "portion",
    version,
    about = "Track daily food portions against your targets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ReminderAction {
    On,
    Off,
    Show,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up (or redo) your profile and calculate targets
    Setup {
        /// Sex: male or female
        #[arg(long)]
        sex: String,
        /// Current body weight
        #[arg(long)]
        weight: f64,
        /// Goal: lose, maintain, build
        #[arg(long, default_value = "maintain")]
        goal: String,
        /// Goal weight (same unit as --weight)
        #[arg(long)]
        goal_weight: Option<f64>,
        /// Unit for weights: lbs or kg
        #[arg(short, long, default_value = "lbs")]
        unit: String,
        /// Daily alcohol servings to budget for (omit to opt out)
        #[arg(long)]
        alcohol: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or override daily targets
    Targets {
        #[command(subcommand)]
        command: Option<TargetCommands>,
    },
    /// Log one portion of a food group
    Log {
        /// Food group (protein, veggies, fruit, carbs, legumes, nuts, fats, dairy, water, alcohol)
        category: String,
        /// Serving size: S, M, L
        #[arg(short, long, default_value = "M")]
        size: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the last logged portion of a food group
    Unlog {
        /// Food group
        category: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the number of glasses of water for a day
    Water {
        /// Glasses of water
        glasses: u32,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark whether you exercised on a day
    Exercise {
        #[arg(value_enum)]
        done: Switch,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show portions logged against targets (defaults to today)
    Today {
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show adherence for recorded days
    History {
        /// Number of most recent recorded days to show
        #[arg(short, long, default_value = "14")]
        days: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today, week and month adherence
    Adherence {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Turn the daily logging reminder on or off
    Reminder {
        #[arg(value_enum, default_value = "show")]
        action: ReminderAction,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all stored data
    Wipe {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TargetCommands {
    /// Show current targets
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Override one target
    Set {
        /// Food group
        category: String,
        /// Portions per day
        value: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recalculate targets from your profile and latest weight
    Recalculate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log a weight entry (replaces any entry for the same date)
    Log {
        /// Weight value (number)
        value: f64,
        /// Unit: lbs or kg (default: lbs)
        #[arg(short, long, default_value = "lbs")]
        unit: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight history
    History {
        /// Range: week, 30days, 60days, 90days, all
        #[arg(short, long, default_value = "30days")]
        range: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the weight entry for a date
    Delete {
        /// Date (YYYY-MM-DD or today/yesterday)
        date: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show change, trend and distance to goal
    Stats {
        /// Range: week, 30days, 60days, 90days, all
        #[arg(short, long, default_value = "30days")]
        range: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("PORTION_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    tracing::debug!(db = %config.db_path.display(), "Opening database");
    let svc = PortionService::open(&config.db_path)?;

    match cli.command {
        Commands::Setup {
            sex,
            weight,
            goal,
            goal_weight,
            unit,
            alcohol,
            json,
        } => cmd_setup(&svc, &sex, weight, &goal, goal_weight, &unit, alcohol, json),
        Commands::Targets { command } => match command {
            None => cmd_targets_show(&svc, false),
            Some(TargetCommands::Show { json }) => cmd_targets_show(&svc, json),
            Some(TargetCommands::Set {
                category,
                value,
                json,
            }) => cmd_targets_set(&svc, &category, value, json),
            Some(TargetCommands::Recalculate { json }) => cmd_targets_recalculate(&svc, json),
        },
        Commands::Log {
            category,
            size,
            date,
            json,
        } => cmd_log(&svc, &category, &size, date, json),
        Commands::Unlog {
            category,
            date,
            json,
        } => cmd_unlog(&svc, &category, date, json),
        Commands::Water {
            glasses,
            date,
            json,
        } => cmd_water(&svc, glasses, date, json),
        Commands::Exercise { done, date, json } => cmd_exercise(&svc, done.enabled(), date, json),
        Commands::Today { date, json } => cmd_today(&svc, date, json),
        Commands::History { days, json } => cmd_history(&svc, days, json),
        Commands::Adherence { json } => cmd_adherence(&svc, json),
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                value,
                unit,
                date,
                json,
            } => cmd_weight_log(&svc, value, &unit, date, json),
            WeightCommands::History { range, json } => cmd_weight_history(&svc, &range, json),
            WeightCommands::Delete { date, json } => cmd_weight_delete(&svc, &date, json),
            WeightCommands::Stats { range, json } => cmd_weight_stats(&svc, &range, json),
        },
        Commands::Reminder { action, json } => {
            let enabled = match action {
                ReminderAction::On => Some(true),
                ReminderAction::Off => Some(false),
                ReminderAction::Show => None,
            };
            cmd_reminder(&svc, enabled, json)
        }
        Commands::Wipe { yes, json } => cmd_wipe(&svc, yes, json),
    }
}
