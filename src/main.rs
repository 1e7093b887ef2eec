use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod builder;
mod cli;
mod config;
mod duplicate;
mod flows;
mod gateway;
mod prompt;
mod record;
mod render;
mod store;
mod validate;

use cli::{Command, InitArgs, RootArgs};
use config::{Backend, IntakeConfig};
use flows::Session;
use prompt::TerminalPrompter;
use store::{Collection, FirestoreCollection, FirestoreSettings, MemoryCollection};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    if let Some(Command::Init(init)) = &args.command {
        return run_init(&args, init);
    }

    let config = config::resolve(&args)?;
    let collection = open_collection(&config)?;
    tracing::info!(
        backend = ?config.backend,
        collection = collection.name(),
        duplicate_check = ?config.duplicate_check,
        "collection ready"
    );
    let session = Session::new(
        collection.as_ref(),
        config.duplicate_check,
        config.country_code.as_str(),
    );

    let stdin = std::io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), std::io::stdout());

    match args.command.unwrap_or(Command::Menu) {
        Command::Menu => session.run_menu(&mut prompter),
        Command::Add => session.add_single(&mut prompter).map(|_| ()),
        Command::Bulk => session.add_bulk(&mut prompter).map(|_| ()),
        Command::List(list) if list.json => {
            let employees = session.fetch_employees()?;
            let text =
                serde_json::to_string_pretty(&employees).context("serialize employee list")?;
            println!("{text}");
            Ok(())
        }
        Command::List(_) => session.list_employees(&mut prompter),
        Command::Init(_) => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_collection(config: &IntakeConfig) -> Result<Box<dyn Collection>> {
    match config.backend {
        Backend::Memory => {
            eprintln!("using in-memory collection; records are discarded on exit");
            Ok(Box::new(MemoryCollection::new(config.collection.clone())))
        }
        Backend::Firestore => {
            let project_id = config
                .project_id
                .clone()
                .ok_or_else(|| anyhow!("firestore backend needs a project id"))?;
            let settings = FirestoreSettings {
                project_id,
                database: config.database.clone(),
                collection: config.collection.clone(),
                emulator_host: config.emulator_host.clone(),
                access_token: config.access_token.clone(),
                timeout: config.timeout(),
            };
            Ok(Box::new(FirestoreCollection::connect(settings)))
        }
    }
}

fn run_init(args: &RootArgs, init: &InitArgs) -> Result<()> {
    if init.out.is_file() && !init.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            init.out.display()
        ));
    }
    let mut config = IntakeConfig::default();
    config::apply_env(&mut config, |key| std::env::var(key).ok());
    config::apply_args(&mut config, args);
    // Tokens belong in the environment, not in a file on disk.
    config.access_token = None;
    config::write_config(&init.out, &config)?;
    println!("wrote {}", init.out.display());
    Ok(())
}
