//! Command dispatch.

use chrono::{DateTime, FixedOffset, Local};
use std::fs;
use std::io::{self, Write};

use crate::cli::{AddArgs, Cli, Command, RenderArgs};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::{heatmap, journal};

/// Run one CLI command.
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    let data = cli.data_path();
    match cli.command {
        Command::Add(ref args) => add(&data, args, Local::now().fixed_offset()),
        Command::Render(ref args) => {
            let svg = render(&data, args, &config)?;
            write_output(args, &svg)
        }
        Command::Config { save } => show_config(&config, save),
    }
}

fn add(data: &std::path::Path, args: &AddArgs, now: DateTime<FixedOffset>) -> Result<()> {
    let record = args.record(now)?;
    journal::append(data, &record)?;
    tracing::info!(project = %record.project, value = record.value, "recorded activity");
    Ok(())
}

/// Loads, filters, and renders. Returns an empty string when nothing matched.
pub fn render(data: &std::path::Path, args: &RenderArgs, config: &AppConfig) -> Result<String> {
    let filter = args.filter()?;
    let options = args.options(config, &filter)?;
    let records = journal::load(data)?;
    let points = filter.points(&records);
    if points.is_empty() {
        tracing::warn!(path = %data.display(), "no records matched");
        return Ok(String::new());
    }
    tracing::info!(points = points.len(), mode = options.mode.label(), "rendering");
    Ok(heatmap::render(&points, &options))
}

fn write_output(args: &RenderArgs, svg: &str) -> Result<()> {
    if svg.is_empty() {
        return Ok(());
    }
    match args.output {
        Some(ref path) => {
            fs::write(path, svg)?;
            tracing::info!(path = %path.display(), "wrote heatmap");
        }
        None => io::stdout().lock().write_all(svg.as_bytes())?,
    }
    Ok(())
}

fn show_config(config: &AppConfig, save: bool) -> Result<()> {
    let contents =
        toml::to_string_pretty(config).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    io::stdout().lock().write_all(contents.as_bytes())?;
    if save {
        let path = config.save()?;
        tracing::info!(path = %path.display(), "saved config");
    }
    Ok(())
}
