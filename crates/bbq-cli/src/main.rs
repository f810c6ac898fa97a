// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use bbq_app::{AppState, CaseId, CaseRecord};
use bbq_store::Store;
use config::Config;
use runtime::StoreRuntime;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `bbq --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let cases = match config.cases_path() {
        Some(path) => load_cases_file(&path)?,
        None => bbq_seed::seed_cases()?,
    };

    let mut store = Store::with_cases(cases)?;
    let ids: Vec<CaseId> = store.cases().iter().map(|case| case.id).collect();
    for id in ids {
        store.seed_notes(id, bbq_seed::note_history(id));
        store.seed_payments(id, bbq_seed::payment_history(id));
    }

    if options.check_only {
        return Ok(());
    }

    let mut state = AppState::default();
    state.filter.active_only = config.active_filter();
    state.filter.follow_up_only = config.follow_up_filter();

    let mut runtime = StoreRuntime::new(store);
    bbq_tui::run_app(&mut state, &mut runtime)
}

fn load_cases_file(path: &Path) -> Result<Vec<CaseRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read cases file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse cases file {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("bbq");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config + seed data without launching");
    println!("  --help                   Show this help");
}
