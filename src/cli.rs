use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AppConfig, Palette};
use crate::error::{Error, Result};
use crate::heatmap::{Mode, RenderOptions};
use crate::journal;
use crate::record::{Record, RecordFilter};

/// `heatmark` - track activity records and render them as a contribution heatmap
#[derive(Parser, Debug)]
#[command(name = "heatmark", version, about)]
pub struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(long, env = "HEATMARK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Record journal (JSON lines)
    #[arg(long, env = "HEATMARK_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append a record to the journal
    Add(AddArgs),
    /// Render matching records as an SVG heatmap
    Render(RenderArgs),
    /// Print the effective configuration
    Config {
        /// Also write it to the user config directory
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project the activity belongs to
    #[arg(short, long)]
    pub project: String,

    /// Positive amount of activity
    #[arg(short, long, default_value_t = 1)]
    pub value: i64,

    /// When it happened: RFC 3339 or YYYY-MM-DD (defaults to now)
    #[arg(long)]
    pub at: Option<String>,

    /// Tag to attach; repeat for several
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Only records of this project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Only records carrying this tag; repeat to require several
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Layout (overrides config file)
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Range start: RFC 3339 or YYYY-MM-DD (start of day)
    #[arg(long)]
    pub from: Option<String>,

    /// Range end: RFC 3339 or YYYY-MM-DD (end of day)
    #[arg(long)]
    pub to: Option<String>,

    /// Color palette (overrides config file)
    #[arg(long, value_enum)]
    pub palette: Option<Palette>,

    /// Write the SVG here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Which end of a day a bare date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parses RFC 3339, or a bare `YYYY-MM-DD` in the local offset.
pub fn parse_instant(input: &str, bound: Bound) -> Result<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| Error::InvalidTimestamp(input.to_string()))?;
    let (h, m, s) = match bound {
        Bound::Start => (0, 0, 0),
        Bound::End => (23, 59, 59),
    };
    let time = NaiveTime::from_hms_opt(h, m, s)
        .ok_or_else(|| Error::InvalidTimestamp(input.to_string()))?;
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| Error::InvalidTimestamp(input.to_string()))
}

impl Cli {
    pub fn data_path(&self) -> PathBuf {
        self.data.clone().unwrap_or_else(journal::default_path)
    }

    /// An explicit `--config` must load cleanly; the default location falls
    /// back to built-in defaults.
    pub fn load_config(&self) -> Result<AppConfig> {
        match self.config {
            Some(ref path) => AppConfig::load_from(path),
            None => {
                let config = AppConfig::load();
                config.validate()?;
                Ok(config)
            }
        }
    }
}

impl AddArgs {
    pub fn record(&self, now: DateTime<FixedOffset>) -> Result<Record> {
        let timestamp = match self.at {
            Some(ref at) => parse_instant(at, Bound::Start)?,
            None => now,
        };
        Ok(Record::new(self.project.clone(), timestamp, self.value).with_tags(self.tags.clone()))
    }
}

impl RenderArgs {
    pub fn filter(&self) -> Result<RecordFilter> {
        Ok(RecordFilter {
            project: self.project.clone(),
            tags: self.tags.clone(),
            from: self
                .from
                .as_deref()
                .map(|s| parse_instant(s, Bound::Start))
                .transpose()?,
            to: self
                .to
                .as_deref()
                .map(|s| parse_instant(s, Bound::End))
                .transpose()?,
        })
    }

    /// Engine options for this invocation. Weekly mode needs both bounds.
    pub fn options(&self, config: &AppConfig, filter: &RecordFilter) -> Result<RenderOptions> {
        let mut config = config.clone();
        if let Some(palette) = self.palette {
            config.palette = palette;
            config.colors = None;
        }
        tracing::debug!(
            palette = config.palette.label(),
            custom_colors = config.colors.is_some(),
            "palette"
        );
        let mut options = config.render_options();
        if let Some(mode) = self.mode {
            options.mode = mode;
        }
        if options.mode == Mode::Weekly && (filter.from.is_none() || filter.to.is_none()) {
            return Err(Error::MissingRange);
        }
        options.project_name = filter.project.clone();
        options.tags = filter.tags.clone();
        options.from = filter.from;
        options.to = filter.to;
        Ok(options)
    }
}
