//! ddev CLI - developer tooling for Datadog integrations.

use clap::{CommandFactory, Parser};
use ddev_config::cli::{Cli, Commands, ConfigCommands};
use ddev_config::commands::{self, Context, Output};
use ddev_config::config::{ConfigStore, RepoChoice};
use ddev_config::logging;
use std::process;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = logging::init_logging() {
        if !cli.quiet {
            eprintln!("Warning: {}", e);
        }
    }

    if let Err(e) = run(cli) {
        if json {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        } else {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ddev_config::Error> {
    let json = cli.json;
    let repo_choice = if cli.extras {
        RepoChoice::Extras
    } else {
        RepoChoice::Core
    };

    let store = ConfigStore::open_default()?;
    let mut ctx = Context::load(store, repo_choice, cli.here)?;

    if !cli.quiet {
        for warning in &ctx.warnings {
            eprintln!("Warning: {}", warning);
        }
    }

    match cli.command {
        None => Cli::command().print_help()?,
        Some(Commands::Config {
            update,
            restore,
            command,
        }) => {
            let location = commands::config(&mut ctx, update, restore)?;
            if command.is_none() || update || restore {
                output(&location, json);
            }

            match command {
                None => {}
                Some(ConfigCommands::Set { key, value }) => {
                    let result = commands::config_set(&mut ctx, &key, &value)?;
                    output(&result, json);
                }
                Some(ConfigCommands::Get { key }) => {
                    let result = commands::config_get(&ctx, &key)?;
                    output(&result, json);
                }
                Some(ConfigCommands::Show { all }) => {
                    let result = commands::config_show(&ctx, all)?;
                    output(&result, json);
                }
            }
        }
    }

    Ok(())
}

fn output<T: Output>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}
