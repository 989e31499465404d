//! anglecad - line-angle drafting from the terminal.

mod cli;
mod console;
mod session;

use anglecad_core::ToolSettings;
use anyhow::Context;
use clap::Parser;
use cli::Cli;
use session::{Session, load_script, parse_line};
use std::io::{self, BufRead};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting anglecad with the {} tool", cli.tool);

    let settings = load_settings(&cli)?;
    if cli.print_config {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    let mut session = Session::new(cli.tool, &settings, io::stderr());
    match &cli.script {
        Some(path) => {
            let events = load_script(path)?;
            log::info!("replaying {} events from {}", events.len(), path.display());
            for event in &events {
                session.apply(event);
            }
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read stdin")?;
                match parse_line(&line) {
                    Ok(Some(event)) => session.apply(&event),
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }

    let document = session.into_document();
    log::info!("document has {} lines", document.len());
    let json = document.to_json().context("failed to serialize document")?;
    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> anyhow::Result<ToolSettings> {
    if let Some(path) = &cli.config {
        return ToolSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()));
    }
    match ToolSettings::default_path() {
        Ok(path) => Ok(ToolSettings::load_or_default(&path)?),
        Err(err) => {
            log::warn!("{err}, using default settings");
            Ok(ToolSettings::default())
        }
    }
}
