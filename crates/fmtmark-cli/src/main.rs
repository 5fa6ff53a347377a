mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Commands, TemplateInput};
use fmtmark_config::{Config, OutputFormat};
use fmtmark_engine::{Node, validate_all};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse {
            input,
            format,
            strict,
        } => {
            let config = load_config(cli.config.as_deref())?;
            // Flags win over the config file
            let format = format.map(OutputFormat::from).unwrap_or(config.format);
            let strict = strict || config.strict;
            let template = read_template(&input)?;
            parse_command(&template, format, strict)
        }
        Commands::Args { input } => {
            let template = read_template(&input)?;
            args_command(&template);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init {
            format,
            strict,
            force,
        } => {
            let config = Config {
                format: format.map(OutputFormat::from).unwrap_or_default(),
                strict,
            };
            init_command(&config, cli.config.as_deref(), force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    // RUST_LOG still overrides the default level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let path = Config::expand_path(path);
            log::debug!("loading config from {}", path.display());
            Config::load_from_path(&path)?
                .ok_or_else(|| anyhow!("Config file not found: {}", path.display()))
        }
        None => {
            let loaded = Config::load()?;
            if loaded.is_none() {
                log::debug!(
                    "no config at {}, using defaults",
                    Config::config_path().display()
                );
            }
            Ok(loaded.unwrap_or_default())
        }
    }
}

fn init_command(config: &Config, path: Option<&Path>, force: bool) -> Result<()> {
    let target = path.map_or_else(Config::config_path, Config::expand_path);
    if target.exists() && !force {
        return Err(anyhow!(
            "Config file already exists: {} (use --force to overwrite)",
            target.display()
        ));
    }

    match path {
        Some(_) => config.save_to_path(&target)?,
        None => config.save()?,
    }
    println!("wrote {}", target.display());
    Ok(())
}

fn read_template(input: &TemplateInput) -> Result<String> {
    if let Some(template) = &input.template {
        return Ok(template.clone());
    }

    if let Some(path) = &input.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file {}", path.display()));
    }

    let mut template = String::new();
    std::io::stdin()
        .read_to_string(&mut template)
        .context("Failed to read template from stdin")?;
    Ok(template)
}

fn parse_command(template: &str, format: OutputFormat, strict: bool) -> Result<ExitCode> {
    let (syntax, tree) = fmtmark_engine::parse_with_syntax(template);

    match format {
        OutputFormat::Tree => match &tree {
            Some(tree) => print!("{tree}"),
            None => println!("raw"),
        },
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&tree).context("Failed to serialize tree")?;
            println!("{json}");
        }
        OutputFormat::Syntax => print!("{}", fmtmark_syntax::format_tree(&syntax)),
    }

    if !strict {
        return Ok(ExitCode::SUCCESS);
    }

    let problems = tree.as_ref().map(validate_all).unwrap_or_default();
    for problem in &problems {
        eprintln!("error: {problem}");
    }

    if problems.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn args_command(template: &str) {
    let tree = fmtmark_engine::parse(template);
    let count = tree.as_ref().map_or(0, Node::argument_count);
    let order = tree
        .as_ref()
        .map(Node::interpolation_indexes_in_order)
        .unwrap_or_default();

    println!("arguments: {count}");
    let order: Vec<String> = order.iter().map(ToString::to_string).collect();
    println!("order: {}", order.join(" "));
}
