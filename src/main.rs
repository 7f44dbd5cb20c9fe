mod cli;

use scenerename::{
    config::{self, persist},
    processor::{self, Processor},
    prompt::{Confirm, TerminalConfirm},
    services,
};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "scenerename=debug,scenerename_parser=debug".to_string()
        } else {
            "scenerename=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let (mut config, config_path) = config::load_config_or_default(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    let mut overrides_edited = false;
    if let Some([pattern, replacement]) = cli.add_override.as_deref() {
        config.overrides.insert(pattern.clone(), replacement.clone());
        println!("Added override: {:?} -> {:?}", pattern, replacement);
        overrides_edited = true;
    }
    if let Some(pattern) = &cli.rm_override {
        match config.overrides.remove(pattern) {
            Some(_) => println!("Removed override: {:?}", pattern),
            None => tracing::warn!("No override for {:?}", pattern),
        }
        overrides_edited = true;
    }

    config::validate_config(&config)?;

    if cli.save_config {
        persist::save_config(&config_path, &config)?;
        println!("Saved configuration to {}", config_path.display());
    } else if overrides_edited {
        persist::update_overrides(&config_path, &config.overrides)?;
        println!("Saved overrides to {}", config_path.display());
    }

    if cli.files.is_empty() {
        if !cli.save_config && !overrides_edited {
            Cli::command().print_help()?;
            println!();
        }
        return Ok(());
    }

    let registry = services::build_registry(&config);
    let confirm: Arc<dyn Confirm> = Arc::new(TerminalConfirm);
    let processor = Processor::new(config, registry, confirm);

    let rt = tokio::runtime::Runtime::new()?;
    if cli.dry_run {
        let (entries, unparsed) = rt.block_on(processor.plan(&cli.files));
        processor::print_plan(&entries, &unparsed);
        return Ok(());
    }

    let report = rt.block_on(processor.run(&cli.files));
    report.print_summary();
    Ok(())
}
