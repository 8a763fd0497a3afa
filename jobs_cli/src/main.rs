use clap::{Parser, Subcommand};
use jobs_core::*;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "jobs")]
#[command(about = "Job progression engine for game servers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to load instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the job configuration and report problems
    Validate,

    /// Create job data for a player if none exists yet
    Join {
        #[arg(long)]
        player: PlayerId,
    },

    /// Perform an in-world action and award XP
    Act {
        #[arg(long)]
        player: PlayerId,

        /// Action name as used in the job XP tables
        #[arg(long, default_value = "break")]
        action: String,

        /// Material key (e.g. stone, minecraft:oak_log)
        #[arg(long)]
        material: String,

        /// Repeat the action this many times
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Show a player's level and XP in every job
    Status {
        #[arg(long)]
        player: PlayerId,

        /// Drop stored progress for jobs that are no longer configured
        #[arg(long)]
        prune: bool,
    },

    /// Show a player's most recent journaled awards
    History {
        #[arg(long)]
        player: PlayerId,

        /// Number of awards to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Export all stored player progress to CSV
    Export {
        /// Output path (defaults to progress-<date>.csv in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    jobs_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Validate => cmd_validate(&config),
        Commands::Join { player } => cmd_join(&config, player),
        Commands::Act {
            player,
            action,
            material,
            count,
        } => cmd_act(&config, player, &action, &material, count),
        Commands::Status { player, prune } => cmd_status(&config, player, prune),
        Commands::History { player, limit } => cmd_history(&config, player, limit),
        Commands::Export { output } => cmd_export(&config, output),
    }
}

/// Build the registry, logging every load diagnostic
fn load_registry(config: &Config) -> Result<Arc<JobRegistry>> {
    let catalog = MaterialCatalog::builtin_with(&config.materials.extra);
    let registry = JobRegistry::load_from(&config.jobs, &catalog)?;

    for diagnostic in registry.diagnostics() {
        tracing::warn!("{}", diagnostic);
    }

    Ok(Arc::new(registry))
}

fn open_service(config: &Config) -> Result<JobsService<JsonFileStore>> {
    let registry = load_registry(config)?;
    let store = JsonFileStore::new(config.players_dir());

    let mut service = JobsService::new(registry, store);
    if config.journal.enabled {
        service = service.with_journal(JsonlJournal::new(config.journal_path()));
    }
    Ok(service)
}

fn cmd_validate(config: &Config) -> Result<()> {
    let registry = load_registry(config)?;

    println!("✓ Configuration OK: {} jobs", registry.len());
    for job in registry.jobs() {
        println!(
            "  {} ({}, {}): {} actions, {} reward milestones",
            job.id(),
            job.name(),
            job.color(),
            job.actions().count(),
            job.milestones().len()
        );
    }

    let diagnostics = registry.diagnostics();
    if !diagnostics.is_empty() {
        println!();
        println!("{} warnings:", diagnostics.len());
        for diagnostic in diagnostics {
            println!("  - {}", diagnostic);
        }
    }

    Ok(())
}

fn cmd_join(config: &Config, player: PlayerId) -> Result<()> {
    let mut service = open_service(config)?;

    match service.on_player_join(player) {
        JoinOutcome::Existing => println!("Player {} already has job data", player),
        JoinOutcome::Initialized { persisted: true } => {
            println!("✓ Initialized job data for player {}", player)
        }
        JoinOutcome::Initialized { persisted: false } => {
            println!("Initialized job data for player {} (not saved)", player)
        }
        JoinOutcome::LoadFailed => {
            println!("Could not read job data for player {}, using defaults", player)
        }
    }

    Ok(())
}

/// Prints progression events the way an in-game chat would
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn xp_gained(&mut self, _player_id: PlayerId, job: &JobDefinition, xp: u32) {
        println!("  +{} {} XP", xp, job.name());
    }

    fn level_up(&mut self, _player_id: PlayerId, job: &JobDefinition, level: u32) {
        println!("  ★ {} level up! Now level {}", job.name(), level);
    }

    fn reward_granted(&mut self, _player_id: PlayerId, job: &JobDefinition, reward: &Reward) {
        println!(
            "  → Reward: {} x {} ({} level {})",
            reward.quantity,
            reward.material,
            job.name(),
            reward.level
        );
    }
}

fn cmd_act(
    config: &Config,
    player: PlayerId,
    action: &str,
    material: &str,
    count: u32,
) -> Result<()> {
    let mut service = open_service(config)?;
    service.on_player_join(player);

    let mut notifier = ConsoleNotifier;
    let mut awarded = 0usize;
    let mut unsaved = 0usize;

    for _ in 0..count {
        let outcome = service.on_action(player, action, material, &mut notifier)?;
        awarded += outcome.awards.len();
        if !outcome.persisted {
            unsaved += 1;
        }
    }

    if awarded == 0 {
        println!("No job rewards '{}' on '{}'", action, material);
    }
    if unsaved > 0 {
        eprintln!("Warning: {} actions could not be saved", unsaved);
    }

    Ok(())
}

fn cmd_status(config: &Config, player: PlayerId, prune: bool) -> Result<()> {
    let mut service = open_service(config)?;

    if prune {
        let removed = service.prune_orphans(player)?;
        for job_id in &removed {
            println!("Removed progress for unknown job '{}'", job_id);
        }
    }

    println!("Jobs for player {}:", player);
    for status in service.progress(player) {
        println!(
            "  {:<16} level {:>3}  {}/{} XP",
            status.job_name, status.level, status.current_xp, status.xp_required
        );
    }

    Ok(())
}

fn cmd_history(config: &Config, player: PlayerId, limit: usize) -> Result<()> {
    let entries = journal::read_entries_for(&config.journal_path(), player, Some(limit))?;
    if entries.is_empty() {
        println!("No awards journaled for player {}", player);
        return Ok(());
    }

    println!("Recent awards for player {}:", player);
    for entry in &entries {
        print!(
            "  {}  {} +{} XP ({} {})",
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            entry.job_id,
            entry.xp_gained,
            entry.action,
            entry.material
        );
        if let Some(level) = entry.levels_reached.last() {
            print!(" → level {}", level);
        }
        println!();
    }

    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let csv_path = output.unwrap_or_else(|| {
        let date = chrono::Local::now().format("%Y-%m-%d");
        config.data.data_dir.join(format!("progress-{}.csv", date))
    });

    let store = JsonFileStore::new(config.players_dir());
    let count = export::export_progress(&store, &csv_path)?;

    println!("✓ Exported {} rows", count);
    println!("  CSV: {}", csv_path.display());

    Ok(())
}
