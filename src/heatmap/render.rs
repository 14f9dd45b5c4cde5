use chrono::{Datelike, NaiveDate};
use std::fmt::{self, Write};

use super::aggregate::{BucketKey, Granularity, SLOT_HOURS};
use super::range::Grid;
use super::scale::LevelScaler;
use super::RenderOptions;

const LABEL_COLOR: &str = "#767676";

/// Pixel geometry shared by labels and cells. Widened to `u64` so that any
/// `u32` option fits; only the canvas size needs an overflow check.
struct Layout {
    cell: u64,
    pad: u64,
    step: u64,
    font: u64,
    title_height: u64,
    week_gap: u64,
}

impl Layout {
    fn new(grid: &Grid, options: &RenderOptions, has_title: bool) -> Self {
        let cell = u64::from(options.cell_size);
        let font = u64::from(options.font_size);
        let week_gap = match grid.granularity {
            Granularity::Day => 0,
            Granularity::Slot => cell / 2,
        };
        Self {
            cell,
            pad: u64::from(options.cell_padding),
            step: cell + u64::from(options.cell_padding),
            font,
            title_height: if has_title { font + 8 } else { 0 },
            week_gap,
        }
    }

    /// `None` when the canvas does not fit in `u64`.
    fn width(&self, grid: &Grid) -> Option<u64> {
        let columns = u64::from(grid.columns);
        let gaps = columns.saturating_sub(1) / 7;
        columns
            .checked_mul(self.step)?
            .checked_add(self.pad)?
            .checked_add(gaps.checked_mul(self.week_gap)?)
    }

    fn height(&self, grid: &Grid) -> Option<u64> {
        u64::from(grid.rows)
            .checked_mul(self.step)?
            .checked_add(self.pad + self.font + 4 + self.title_height)
    }

    fn title_baseline(&self) -> u64 {
        self.font + 2
    }

    fn label_baseline(&self) -> u64 {
        self.title_height + self.font
    }

    /// Bounded by `width` for every column of the grid.
    fn x(&self, column: u32) -> u64 {
        let column = u64::from(column);
        self.pad + column * self.step + (column / 7) * self.week_gap
    }

    /// Bounded by `height` for every row of the grid.
    fn y(&self, row: u32) -> u64 {
        self.title_height + self.font + 4 + self.pad + u64::from(row) * self.step
    }
}

/// Emits the complete document for already-clipped buckets.
pub fn render_svg(
    grid: &Grid,
    buckets: &[(BucketKey, i64)],
    scaler: &LevelScaler,
    options: &RenderOptions,
) -> String {
    let mut out = String::with_capacity(512 + buckets.len() * 160);
    match write_document(&mut out, grid, buckets, scaler, options) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

fn write_document(
    out: &mut String,
    grid: &Grid,
    buckets: &[(BucketKey, i64)],
    scaler: &LevelScaler,
    options: &RenderOptions,
) -> fmt::Result {
    let title = options.title();
    let layout = Layout::new(grid, options, title.is_some());
    let (width, height) = match (layout.width(grid), layout.height(grid)) {
        (Some(width), Some(height)) => (width, height),
        _ => return Err(fmt::Error),
    };

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    )?;
    write_style(out, options)?;

    if let Some(title) = title {
        writeln!(
            out,
            r#"<text class="title" x="{}" y="{}">{}</text>"#,
            layout.pad,
            layout.title_baseline(),
            escape(&title)
        )?;
    }

    match grid.granularity {
        Granularity::Day => write_month_labels(out, grid, &layout)?,
        Granularity::Slot => write_week_labels(out, grid, &layout)?,
    }

    for (key, value) in buckets {
        write_cell(out, grid, &layout, key, *value, scaler.level(*value))?;
    }

    writeln!(out, "</svg>")
}

fn write_style(out: &mut String, options: &RenderOptions) -> fmt::Result {
    write!(
        out,
        "<style>text{{font-family:{};font-size:{}px;fill:{}}}.title{{font-weight:bold}}",
        escape(&options.font_family),
        options.font_size,
        LABEL_COLOR
    )?;
    for (level, color) in options.colors.iter().enumerate() {
        write!(out, ".l{}{{fill:{}}}", level, escape(color))?;
    }
    writeln!(out, "</style>")
}

/// Month abbreviation over the first column that starts within the first
/// week of each month.
fn write_month_labels(out: &mut String, grid: &Grid, layout: &Layout) -> fmt::Result {
    let mut last_month = None;
    for column in 0..grid.columns {
        let date = grid.column_date(column);
        if date > grid.end {
            break;
        }
        if date.day() <= 7 && last_month != Some(date.month()) {
            last_month = Some(date.month());
            writeln!(
                out,
                r#"<text x="{}" y="{}">{}</text>"#,
                layout.x(column),
                layout.label_baseline(),
                date.format("%b")
            )?;
        }
    }
    Ok(())
}

/// `MM/DD` over every Monday column.
fn write_week_labels(out: &mut String, grid: &Grid, layout: &Layout) -> fmt::Result {
    for column in (0..grid.columns).step_by(7) {
        let date = grid.column_date(column);
        if date > grid.end {
            break;
        }
        writeln!(
            out,
            r#"<text x="{}" y="{}">{}</text>"#,
            layout.x(column),
            layout.label_baseline(),
            date.format("%m/%d")
        )?;
    }
    Ok(())
}

fn write_cell(
    out: &mut String,
    grid: &Grid,
    layout: &Layout,
    key: &BucketKey,
    value: i64,
    level: usize,
) -> fmt::Result {
    let (column, row) = grid.position(key);
    write!(
        out,
        r#"<rect x="{}" y="{}" width="{c}" height="{c}" rx="2" class="l{}" data-date="{}""#,
        layout.x(column),
        layout.y(row),
        level,
        key.date.format("%Y-%m-%d"),
        c = layout.cell
    )?;
    if let Some(slot) = key.slot {
        write!(out, r#" data-slot="{}""#, slot)?;
    }
    writeln!(
        out,
        r#" data-value="{}" data-level="{}"><title>{}: {}</title></rect>"#,
        value,
        level,
        tooltip_label(key.date, key.slot),
        value
    )
}

fn tooltip_label(date: NaiveDate, slot: Option<u8>) -> String {
    let day = date.format("%a %b %-d, %Y");
    match slot {
        Some(slot) => {
            let start = u32::from(slot) * SLOT_HOURS;
            format!("{} {:02}:00-{:02}:00", day, start, start + SLOT_HOURS)
        }
        None => day.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
