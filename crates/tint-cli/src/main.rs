// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! tint: inspect and simulate presentation settings.
//!
//! JSON goes to stdout, logs to stderr. The settings file is only read.

use std::cell::Cell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tint_settings::{
    parse_assignment, FnHooks, PartialSettings, SettingKey, Settings, SettingsController,
    SettingsStore, Snapshot,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tint", author, version, about = "Inspect and simulate presentation settings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the default settings.
    Defaults,
    /// Print the snapshot for the merged settings plus the customized keys.
    Show(InputArgs),
    /// Print the full settings `update` hands to the host.
    Update(UpdateArgs),
    /// Run `reset` and print the state the host observes afterward.
    Reset(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Partial settings JSON file; omit to start from the defaults.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Override as KEY=VALUE (repeatable), e.g. `--set colorPreset=cyan`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set)]
    set: Vec<Assignment>,
}

#[derive(Debug, Clone)]
struct Assignment {
    key: SettingKey,
    value: Value,
}

fn parse_set(raw: &str) -> Result<Assignment, String> {
    parse_assignment(raw)
        .map(|(key, value)| Assignment { key, value })
        .map_err(|err| err.to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowReport<'a> {
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    customized: Vec<SettingKey>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetReport<'a> {
    reset_calls: usize,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Defaults => emit(SettingsStore::new().defaults()),
        Commands::Show(args) => show(&args),
        Commands::Update(args) => update(args),
        Commands::Reset(args) => reset(&args),
    }
}

fn load(input: &InputArgs) -> Result<Option<Rc<PartialSettings>>> {
    let Some(path) = &input.file else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let partial = PartialSettings::from_json(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;
    debug!(path = %path.display(), keys = ?partial.supplied_keys(), "loaded settings");
    Ok(Some(Rc::new(partial)))
}

fn show(args: &InputArgs) -> Result<()> {
    let ctl = SettingsController::builder().build();
    ctl.set_initial_settings(load(args)?);
    let snapshot = ctl.snapshot();
    emit(&ShowReport {
        customized: SettingsStore::new().customized_keys(&snapshot.settings),
        snapshot: &snapshot,
    })
}

fn update(args: UpdateArgs) -> Result<()> {
    let received: Rc<Cell<Option<Settings>>> = Rc::default();
    let hooks = FnHooks::new().with_update({
        let received = Rc::clone(&received);
        move |settings| received.set(Some(settings))
    });
    let ctl = SettingsController::new(load(&args.input)?, hooks);
    let patch = PartialSettings::from_pairs(args.set.into_iter().map(|a| (a.key, a.value)));
    ctl.update(&patch);
    let settings = received.take().context("update hook was not invoked")?;
    emit(&settings)
}

fn reset(args: &InputArgs) -> Result<()> {
    let calls = Rc::new(Cell::new(0usize));
    let ctl = SettingsController::builder()
        .on_reset({
            let calls = Rc::clone(&calls);
            move || calls.set(calls.get() + 1)
        })
        .build();
    ctl.set_initial_settings(load(args)?);
    ctl.snapshot().handle_reset();
    let snapshot = ctl.snapshot();
    emit(&ResetReport {
        reset_calls: calls.get(),
        snapshot: &snapshot,
    })
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
