//! Command-line front-end
//!
//! Each invocation plays the part of one screen: it mounts a session,
//! performs the requested action and unmounts again. All state lives in
//! the preference file, so consecutive invocations behave like screens of
//! one app sharing a store.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use feedkit_core::{
    CatalogKind, DisplayRow, MeasurementSystem, Multiplier, PersistedResult, SelectionField,
};
use feedkit_settings::{keys, Config, JsonFileStore, PreferenceStore};
use feedkit_sync::{HttpBackend, SyncEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Feeds and speeds for your CNC, tuned to taste
#[derive(Debug, Parser)]
#[command(name = "feedkit", version, about)]
pub struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show lengths in inches and speeds in inches per minute
    #[arg(long, global = true)]
    pub imperial: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Change the stored selection
    Select(SelectArgs),
    /// Print the stored selection and result without contacting the server
    Show,
    /// Resolve the stored selection now
    Resolve,
    /// Step the multiplier
    Adjust {
        /// Amount to add, e.g. 0.1 or -0.2
        #[arg(allow_hyphen_values = true)]
        delta: f64,
        /// Persist the adjusted value
        #[arg(long)]
        save: bool,
    },
    /// Share the saved multiplier
    Share,
    /// Reset the remembered preference
    Reset,
    /// List a catalog (machines, spindles, materials, bits)
    Catalog {
        /// Catalog to list
        kind: CatalogKind,
    },
    /// Store the bearer token used for share and reset
    Login {
        /// Token issued by the service
        token: String,
    },
    /// Forget every stored preference
    Logout,
    /// Print the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Machine
    #[arg(long)]
    pub machine: Option<String>,
    /// Spindle or router
    #[arg(long)]
    pub spindle: Option<String>,
    /// Material
    #[arg(long)]
    pub material: Option<String>,
    /// Bit
    #[arg(long)]
    pub bit: Option<String>,
    /// Ask the server to remember this combination
    #[arg(long, conflicts_with = "forget")]
    pub remember: bool,
    /// Stop remembering this combination
    #[arg(long)]
    pub forget: bool,
}

impl SelectArgs {
    fn values(&self) -> [(SelectionField, Option<&String>); 4] {
        [
            (SelectionField::Machine, self.machine.as_ref()),
            (SelectionField::Spindle, self.spindle.as_ref()),
            (SelectionField::Material, self.material.as_ref()),
            (SelectionField::Bit, self.bit.as_ref()),
        ]
    }
}

/// Run one command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    if let Command::Config { init } = &cli.command {
        return config_command(&config_path, *init);
    }

    let config = Config::load_or_default(Some(&config_path))?;
    let system = if cli.imperial {
        MeasurementSystem::Imperial
    } else {
        config.display.measurement_system
    };

    let preferences = config.preferences_path()?;
    let store: Arc<dyn PreferenceStore> = Arc::new(JsonFileStore::open(&preferences).await?);
    let backend = Arc::new(HttpBackend::new(config.remote.clone())?);
    let engine = SyncEngine::new(store.clone(), backend, &config.sync);
    engine.start().await?;

    match cli.command {
        Command::Select(args) => select(&engine, &args).await?,
        Command::Show => show(&engine, system).await,
        Command::Resolve => resolve(&engine, system).await?,
        Command::Adjust { delta, save } => {
            let screen = engine.open_screen("cli");
            screen.multiplier().load().await;
            let value = screen.on_user_adjusts(delta);
            if save {
                screen.on_user_saves().await?;
                println!("Multiplier saved: {}", value);
            } else {
                println!("Multiplier: {} (not saved, use --save)", value);
            }
        }
        Command::Share => {
            let screen = engine.open_screen("cli");
            let value = screen.on_user_shares().await?;
            println!("Shared multiplier {}", value);
        }
        Command::Reset => {
            let token = engine.reset_preferences().await?;
            println!("Preferences reset ({})", token);
        }
        Command::Catalog { kind } => {
            for entry in engine.catalog(kind).await? {
                println!("{:>6}  {}", entry.id, entry.name);
            }
        }
        Command::Login { token } => {
            store
                .set(keys::AUTH_TOKEN, token.trim())
                .await
                .context("Failed to store token")?;
            println!("Token stored");
        }
        Command::Logout => {
            engine.logout().await?;
            println!("Logged out, preferences cleared");
        }
        Command::Config { .. } => {}
    }

    Ok(())
}

fn config_command(path: &std::path::Path, init: bool) -> anyhow::Result<()> {
    if init {
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        Config::default().save_to_file(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = Config::load_or_default(Some(path))?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

async fn select(engine: &SyncEngine, args: &SelectArgs) -> anyhow::Result<()> {
    let mut selection = engine.selection().await;
    for (field, value) in args.values() {
        if let Some(value) = value {
            selection.set_field(field, value.trim());
        }
    }
    if args.remember {
        selection.remember_choice = true;
    } else if args.forget {
        selection.remember_choice = false;
    }

    engine.set_selection(&selection).await?;
    print_selection(&selection);
    Ok(())
}

async fn show(engine: &SyncEngine, system: MeasurementSystem) {
    let selection = engine.selection().await;
    print_selection(&selection);

    match engine.stored_result().await {
        Some(result) => {
            let multiplier = engine.stored_multiplier().await.unwrap_or_default();
            if !result.is_for(&selection.key()) {
                println!("\nStored result is for {}", result.selection);
            }
            print_result(&result, multiplier, system);
        }
        None => println!("\nNo stored result"),
    }
}

async fn resolve(engine: &SyncEngine, system: MeasurementSystem) -> anyhow::Result<()> {
    let screen = engine.open_screen("cli");
    let mut selection = engine.resolver().load_selection().await;
    let defaulted = engine.resolver().fill_defaults(&mut selection).await;
    for field in defaulted {
        println!("Using default {}: {}", field, selection.field(field));
    }

    let outcome = engine
        .resolver()
        .resolve_for(screen.view(), &selection)
        .await?;
    if outcome.kept_local {
        println!(
            "Keeping your multiplier {} (server suggests {})",
            outcome.multiplier, outcome.result.snapshot.base_multiplier
        );
    }
    print_result(&outcome.result, outcome.multiplier, system);
    screen.on_screen_unmounted().await;
    Ok(())
}

fn print_selection(selection: &feedkit_core::SelectionState) {
    for field in SelectionField::ALL {
        let value = selection.field(field);
        println!(
            "{:<9} {}",
            format!("{}:", field),
            if value.is_empty() { "-" } else { value }
        );
    }
    println!("remember: {}", selection.remember_choice);
}

fn print_result(result: &PersistedResult, multiplier: Multiplier, system: MeasurementSystem) {
    let view = feedkit_core::CutParameters::area_clearance(&result.snapshot, multiplier);
    let profile = feedkit_core::CutParameters::profile(&result.snapshot, multiplier);

    println!("\nMultiplier: {}", multiplier);
    print_rows("Area clearance", &view.rows(system, true));
    print_rows("Profile", &profile.rows(system, false));
    if let Some(warning) = result.snapshot.warning_text() {
        println!("\nWarning: {}", warning);
    }
}

fn print_rows(title: &str, rows: &[DisplayRow]) {
    println!("\n{}", title);
    for row in rows {
        println!("  {:<9} {}", row.label, row.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adjust_negative_delta() {
        let cli = Cli::try_parse_from(["feedkit", "adjust", "-0.2", "--save"]).unwrap();
        match cli.command {
            Command::Adjust { delta, save } => {
                assert_eq!(delta, -0.2);
                assert!(save);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["feedkit", "show", "--imperial"]).unwrap();
        assert!(cli.imperial);
        assert!(matches!(cli.command, Command::Show));
    }

    #[test]
    fn test_parse_catalog_kind() {
        let cli = Cli::try_parse_from(["feedkit", "catalog", "bits"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Catalog {
                kind: CatalogKind::Bits
            }
        ));
        assert!(Cli::try_parse_from(["feedkit", "catalog", "lasers"]).is_err());
    }

    #[test]
    fn test_remember_conflicts_with_forget() {
        assert!(Cli::try_parse_from(["feedkit", "select", "--remember", "--forget"]).is_err());
    }
}
