use chrono::{Datelike, Duration, NaiveDate};

use super::aggregate::{BucketKey, Granularity, SLOTS_PER_DAY};
use super::{DataPoint, RenderOptions};

/// Minimum number of day columns in weekly mode (8 weeks).
pub const MIN_WEEKLY_DAYS: i64 = 56;

/// Resolved drawing area for one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub granularity: Granularity,
    pub start: NaiveDate,
    /// Last date that may be drawn. Later cells never appear, even when the
    /// canvas is wider.
    pub end: NaiveDate,
    /// Date of the first cell in column 0 (a Sunday for calendar grids, a
    /// Monday for weekly grids).
    pub anchor: NaiveDate,
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    /// Calendar grids draw from the anchor; weekly grids hide the days
    /// between the Monday anchor and `start`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let first = match self.granularity {
            Granularity::Day => self.anchor,
            Granularity::Slot => self.start,
        };
        date >= first && date <= self.end
    }

    /// Column and row of a bucket. Callers must check `contains` first.
    pub fn position(&self, key: &BucketKey) -> (u32, u32) {
        let offset = (key.date - self.anchor).num_days() as u32;
        match self.granularity {
            Granularity::Day => (offset / 7, key.date.weekday().num_days_from_sunday()),
            Granularity::Slot => (offset, u32::from(key.slot.unwrap_or(0))),
        }
    }

    /// First date shown in `column`.
    pub fn column_date(&self, column: u32) -> NaiveDate {
        let days = match self.granularity {
            Granularity::Day => i64::from(column) * 7,
            Granularity::Slot => i64::from(column),
        };
        self.anchor + Duration::days(days)
    }
}

/// Works out the span, alignment, and width of the grid.
///
/// Calendar grids (day granularity) take start/end from the first and last
/// point unless `from`/`to` override them, and align to the Sunday on or
/// before the start. Weekly grids require both `from` and `to`, align to the
/// Monday on or before the start, and are at least eight weeks wide.
/// Returns `None` when no grid can be built.
pub fn resolve_range(points: &[DataPoint], options: &RenderOptions) -> Option<Grid> {
    let granularity = options.mode.granularity();
    let (start, end) = match granularity {
        Granularity::Day => {
            let first = points.first()?;
            let last = points.last()?;
            let start = options.from.unwrap_or(first.timestamp).date_naive();
            let end = options.to.unwrap_or(last.timestamp).date_naive();
            (start, end)
        }
        Granularity::Slot => (options.from?.date_naive(), options.to?.date_naive()),
    };
    if end < start {
        return None;
    }

    let grid = match granularity {
        Granularity::Day => {
            let anchor = start - Duration::days(i64::from(start.weekday().num_days_from_sunday()));
            let weeks = (end - anchor).num_days() / 7 + 1;
            Grid {
                granularity,
                start,
                end,
                anchor,
                columns: weeks as u32,
                rows: 7,
            }
        }
        Granularity::Slot => {
            let anchor = start - Duration::days(i64::from(start.weekday().num_days_from_monday()));
            let days = ((end - anchor).num_days() + 1).max(MIN_WEEKLY_DAYS);
            Grid {
                granularity,
                start,
                end,
                anchor,
                columns: days as u32,
                rows: u32::from(SLOTS_PER_DAY),
            }
        }
    };
    Some(grid)
}
