use std::{env, path::PathBuf};

use clap::Parser;
use cli::{Args, Commands};
use error::{CliResult, ErrorContext};
use fleetq_config::config::{self, generate_default_config, get_config, set_config_path, Config};
use logging::setup_logging;
use query::UrlOptions;
use tracing::{debug, info};
use utils::{print_json, set_color};

mod action;
mod cli;
mod entities;
mod error;
mod logging;
mod query;
mod utils;

fn resolve_config_path(path: &str) -> CliResult<PathBuf> {
    let path = PathBuf::from(path.trim());
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(env::current_dir()
        .with_context(|| "retrieving current directory".into())?
        .join(path))
}

fn load_config() -> CliResult<Config> {
    config::init()?;
    Ok(get_config())
}

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color || args.json {
        set_color(false);
    }

    if let Some(ref path) = args.config {
        let path = resolve_config_path(path)?;
        debug!("using config file {}", path.display());
        set_config_path(path);
    }

    let json = args.json;

    match args.command {
        Commands::Escape {
            value,
            pattern,
        } => query::escape(&value, pattern, json)?,
        Commands::Search {
            entity,
            term,
            fields,
        } => query::search(&entity, &term, &fields, json)?,
        Commands::Build {
            entity,
            filters,
        } => query::build(&load_config()?, &entity, &filters, json)?,
        Commands::Url {
            entity,
            search,
            filters,
            page,
            limit,
            sort,
            base_url,
        } => {
            let options = UrlOptions {
                search: search.as_deref(),
                page,
                limit,
                sort: &sort,
                base_url: base_url.as_deref(),
            };
            query::url(&load_config()?, &entity, &filters, &options, json)?
        }
        Commands::Combine {
            parts,
            or,
            group,
        } => {
            let combined = query::combine(&parts, or, group);
            if json {
                print_json(&serde_json::json!({ "q": combined }))?;
            } else {
                println!("{combined}");
            }
        }
        Commands::ActionState {
            file,
        } => action::action_state(file.as_deref(), json)?,
        Commands::Entities => entities::list_entities(json)?,
        Commands::Config => {
            let config = load_config()?;
            if json {
                print_json(&config)?;
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            info!("Loaded from {}", config::config_path().display());
        }
        Commands::DefConfig => {
            let path = generate_default_config()?;
            if json {
                print_json(&serde_json::json!({ "path": path }))?;
            }
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
