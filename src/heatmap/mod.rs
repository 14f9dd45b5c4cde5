//! Calendar heatmap engine.
//!
//! Turns an ascending sequence of `(timestamp, value)` observations into a
//! self-contained SVG document. The pipeline runs strictly forward:
//! aggregate into buckets, resolve the grid, scale bucket values to color
//! levels, emit markup. Nothing here performs I/O or returns errors; bad
//! input degrades to an empty string.

pub mod aggregate;
pub mod range;
pub mod render;
pub mod scale;


use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use aggregate::{aggregate, BucketKey, Granularity};
pub use range::{resolve_range, Grid};
pub use scale::{AutoScale, LevelScaler, ScalePolicy};

/// A single observation. Multiple points may land in the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub value: i64,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<FixedOffset>, value: i64) -> Self {
        Self { timestamp, value }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One cell per day, weeks as columns, Sunday-aligned.
    #[default]
    Yearly,
    /// Same calendar layout as `Yearly`.
    Daily,
    /// One cell per 4-hour slot, days as columns, Monday-aligned.
    Weekly,
}

impl Mode {
    pub fn granularity(self) -> Granularity {
        match self {
            Self::Yearly | Self::Daily => Granularity::Day,
            Self::Weekly => Granularity::Slot,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Yearly => "Yearly",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
        }
    }
}

pub const GITHUB_COLORS: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub mode: Mode,
    pub cell_size: u32,
    pub cell_padding: u32,
    pub font_size: u32,
    pub font_family: String,
    /// Ordered from lowest to highest intensity; the length defines the level count.
    pub colors: Vec<String>,
    /// Ascending thresholds. Only honored when there are exactly `colors.len() - 1`.
    pub value_ranges: Option<Vec<i64>>,
    pub auto_scale: AutoScale,
    pub project_name: Option<String>,
    pub tags: Vec<String>,
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Yearly,
            cell_size: 11,
            cell_padding: 2,
            font_size: 10,
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            colors: GITHUB_COLORS.iter().map(|c| c.to_string()).collect(),
            value_ranges: None,
            auto_scale: AutoScale::ZeroReserved,
            project_name: None,
            tags: Vec::new(),
            from: None,
            to: None,
        }
    }
}

impl RenderOptions {
    /// Title line shown above the grid, if there is anything to show.
    pub fn title(&self) -> Option<String> {
        let project = self.project_name.as_deref().filter(|p| !p.is_empty());
        let tags = (!self.tags.is_empty()).then(|| self.tags.join(", "));
        match (project, tags) {
            (Some(p), Some(t)) => Some(format!("{} (tags: {})", p, t)),
            (None, Some(t)) => Some(format!("tags: {}", t)),
            (Some(p), None) => Some(p.to_string()),
            (None, None) => None,
        }
    }
}

/// Renders `points` (ascending by timestamp) as an SVG document.
///
/// Returns an empty string when there is no data, no colors, or, in weekly
/// mode, when `from`/`to` are not both set.
pub fn render(points: &[DataPoint], options: &RenderOptions) -> String {
    if points.is_empty() || options.colors.is_empty() {
        return String::new();
    }

    let Some(grid) = resolve_range(points, options) else {
        tracing::debug!(mode = options.mode.label(), "no renderable range");
        return String::new();
    };

    let buckets = aggregate(points, options.mode.granularity());
    let visible: Vec<(BucketKey, i64)> = buckets
        .into_iter()
        .filter(|(key, _)| {
            let inside = grid.contains(key.date);
            if !inside {
                tracing::trace!(date = %key.date, "bucket outside grid, skipped");
            }
            inside
        })
        .collect();

    let policy = ScalePolicy::select(options);
    let max = visible.iter().map(|(_, v)| *v).max().unwrap_or(0);
    let scaler = LevelScaler::new(policy, options.colors.len(), max);
    tracing::debug!(
        anchor = %grid.anchor,
        end = %grid.end,
        columns = grid.columns,
        buckets = visible.len(),
        policy = ?scaler.policy(),
        levels = scaler.levels(),
        "rendering heatmap"
    );

    render::render_svg(&grid, &visible, &scaler, options)
}
