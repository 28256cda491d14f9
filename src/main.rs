//! CLI entry point for overlay-hotkeys
//!
//! Provides command-line interface for checking conflicts, listing
//! bindings, resolving profiles, and watching the config file.

use clap::{Parser, Subcommand};
use colored::*;
use overlay_hotkeys::config::{
    expand_path, ConfigError, ConfigManager, ConfigValidator, ConfigWatcher, ValidationLevel,
    ValidationReport, DEFAULT_CONFIG_PATH,
};
use overlay_hotkeys::core::{normalize_process_name, Config};
use overlay_hotkeys::logging;
use std::path::Path;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "overlay-hotkeys")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Verbose logging (honours RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and report binding conflicts
    Check,

    /// List every profile and its bindings
    List,

    /// Show which profile is active for a foreground process
    Resolve {
        /// Process name, e.g. game.exe
        process: String,
    },

    /// Write the built-in default config
    Init {
        /// Replace an existing config (the old file is backed up)
        #[arg(short, long)]
        force: bool,
    },

    /// Re-check the config every time it changes on disk
    Watch,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let manager = ConfigManager::new(expand_path(&cli.config));

    match cli.command {
        Commands::Check => {
            let clean = check_config(&manager)?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::List => list_bindings(&manager)?,
        Commands::Resolve { process } => resolve_profile(&manager, &process)?,
        Commands::Init { force } => init_config(&manager, force)?,
        Commands::Watch => watch_config(&manager)?,
    }

    Ok(())
}

fn load(manager: &ConfigManager) -> anyhow::Result<Config> {
    println!(
        "{} Reading config: {}",
        "→".cyan(),
        manager.config_path().display()
    );
    manager.load().map_err(|e| match e {
        ConfigError::NotFound(path) => anyhow::anyhow!(
            "No config at {} (run `overlay-hotkeys init` to create one)",
            path.display()
        ),
        other => other.into(),
    })
}

/// Validates the config and prints the report.
///
/// Returns false when there are errors or conflicts.
fn check_config(manager: &ConfigManager) -> anyhow::Result<bool> {
    let config = load(manager)?;
    let report = ConfigValidator::new().validate(&config);

    let binding_count: usize = config.profiles.iter().map(|p| p.bindings.len()).sum();
    println!(
        "{} Found {} profile{} with {} bindings\n",
        "✓".green(),
        config.profiles.len(),
        if config.profiles.len() == 1 { "" } else { "s" },
        binding_count
    );

    print_report(&report);
    Ok(!report.has_errors() && report.conflicts.is_empty())
}

fn print_report(report: &ValidationReport) {
    for issue in report.issues_at(ValidationLevel::Error) {
        println!("{} {}", "error:".red().bold(), issue);
    }
    for issue in report.issues_at(ValidationLevel::Warning) {
        println!("{} {}", "warning:".yellow().bold(), issue);
    }
    for issue in report.issues_at(ValidationLevel::Info) {
        println!("{} {}", "info:".dimmed(), issue);
    }

    if report.conflicts.is_empty() {
        if !report.has_errors() {
            println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
        }
        return;
    }

    println!(
        "\n{} Found {} conflict{}:\n",
        "✗".red().bold(),
        report.conflicts.len(),
        if report.conflicts.len() == 1 { "" } else { "s" }
    );

    for (i, entry) in report.conflicts.iter().enumerate() {
        println!(
            "{} {} in {}",
            format!("Conflict {}", i + 1).yellow().bold(),
            format!("{}", entry.conflict.signature).cyan(),
            entry.profile.magenta()
        );

        for (idx, binding) in entry.conflict.conflicting_bindings.iter().enumerate() {
            let note = if idx == 0 { "(wins)" } else { "(shadowed)" };
            println!(
                "  {} {} {}",
                format!("{}.", idx + 1).dimmed(),
                binding.action,
                note.dimmed()
            );
        }
        println!();
    }

    println!("{}", "⚠ Only the first binding of each conflict fires at runtime!".yellow());
}

fn list_bindings(manager: &ConfigManager) -> anyhow::Result<()> {
    let config = load(manager)?;
    let default_name = config
        .active_profile("")
        .map(|p| p.name.clone())
        .unwrap_or_default();

    for profile in &config.profiles {
        let marker = if profile.name == default_name { " (default)" } else { "" };
        println!("\n{}{}", format!("{}", profile).bold(), marker.dimmed());

        for binding in &profile.bindings {
            let hotkey = format!("{}", binding.signature()).cyan().bold();
            let action = if binding.enabled {
                binding.action.green()
            } else {
                format!("{} (disabled)", binding.action).dimmed()
            };
            println!("  {} → {}", hotkey, action);
        }
    }

    let total: usize = config.profiles.iter().map(|p| p.bindings.len()).sum();
    println!("\n{} Total: {} bindings", "✓".green(), total);

    Ok(())
}

fn resolve_profile(manager: &ConfigManager, process: &str) -> anyhow::Result<()> {
    let config = load(manager)?;
    let normalized = normalize_process_name(process);

    match config.active_profile(process) {
        Some(profile) => {
            let how = if profile.matches_process(process) {
                "process filter"
            } else {
                "fallback"
            };
            println!(
                "{} {} → {} ({})",
                "✓".green(),
                normalized.cyan(),
                profile.name.bold(),
                how.dimmed()
            );
        }
        None => println!("{} No profiles configured", "✗".red()),
    }

    Ok(())
}

fn init_config(manager: &ConfigManager, force: bool) -> anyhow::Result<()> {
    if manager.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to replace it)",
            manager.config_path().display()
        );
    }

    manager.save(&Config::default())?;
    println!(
        "{} Wrote default config to {}",
        "✓".green(),
        manager.config_path().display()
    );
    Ok(())
}

fn watch_config(manager: &ConfigManager) -> anyhow::Result<()> {
    let path: &Path = manager.config_path();
    let watcher = ConfigWatcher::new(path)?;

    println!("{} Watching {} (Ctrl+C to stop)", "→".cyan(), path.display());
    run_check(manager);

    loop {
        if watcher.check_for_changes() {
            println!("\n{} Config changed", "↻".cyan());
            run_check(manager);
        }
        thread::sleep(Duration::from_millis(250));
    }
}

fn run_check(manager: &ConfigManager) {
    if let Err(e) = check_config(manager) {
        println!("{} {}", "✗".red(), e);
    }
}
