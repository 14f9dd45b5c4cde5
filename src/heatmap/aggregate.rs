use chrono::{NaiveDate, Timelike};
use std::collections::BTreeMap;

use super::DataPoint;

pub const SLOTS_PER_DAY: u8 = 6;
pub const SLOT_HOURS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One bucket per calendar date.
    Day,
    /// One bucket per date and 4-hour window.
    Slot,
}

/// Bucket identity. `slot` is `Some(0..=5)` only for slot granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub date: NaiveDate,
    pub slot: Option<u8>,
}

impl BucketKey {
    pub fn day(date: NaiveDate) -> Self {
        Self { date, slot: None }
    }

    pub fn slot(date: NaiveDate, slot: u8) -> Self {
        Self {
            date,
            slot: Some(slot),
        }
    }
}

/// Sums point values per bucket. Dates and hours are taken in each
/// timestamp's own offset.
pub fn aggregate(points: &[DataPoint], granularity: Granularity) -> BTreeMap<BucketKey, i64> {
    let mut buckets = BTreeMap::new();
    for point in points {
        let date = point.timestamp.date_naive();
        let key = match granularity {
            Granularity::Day => BucketKey::day(date),
            Granularity::Slot => {
                BucketKey::slot(date, (point.timestamp.hour() / SLOT_HOURS) as u8)
            }
        };
        *buckets.entry(key).or_insert(0) += point.value;
    }
    buckets
}
