//! Property tests for the heatmap engine.
//!
//! These exercise laws that must hold for any input: deterministic output,
//! no cells after the resolved end date, one cell per bucket carrying the
//! bucket's sum, and color levels within the palette.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Timelike};
use heatmark::heatmap::{render, DataPoint, Mode, RenderOptions};
use proptest::prelude::*;

struct Cell {
    date: NaiveDate,
    slot: Option<u8>,
    value: i64,
    level: usize,
}

fn attr<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let start = line.find(&format!(" {}=\"", name))? + name.len() + 3;
    let len = line[start..].find('"')?;
    Some(&line[start..start + len])
}

fn cells(svg: &str) -> Vec<Cell> {
    svg.lines()
        .filter(|l| l.starts_with("<rect"))
        .map(|l| Cell {
            date: NaiveDate::parse_from_str(attr(l, "data-date").unwrap(), "%Y-%m-%d").unwrap(),
            slot: attr(l, "data-slot").map(|s| s.parse().unwrap()),
            value: attr(l, "data-value").unwrap().parse().unwrap(),
            level: attr(l, "data-level").unwrap().parse().unwrap(),
        })
        .collect()
}

fn base() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .unwrap()
}

fn to_points(raw: &[(i64, i64, i64)]) -> Vec<DataPoint> {
    let mut points: Vec<DataPoint> = raw
        .iter()
        .map(|&(day, hour, value)| {
            DataPoint::new(base() + Duration::days(day) + Duration::hours(hour), value)
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}

fn raw_points() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec((0i64..180, 0i64..24, 1i64..60), 1..60)
}

fn calendar_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Yearly), Just(Mode::Daily)]
}

proptest! {
    #[test]
    fn render_is_idempotent(raw in raw_points(), mode in calendar_mode()) {
        let points = to_points(&raw);
        let options = RenderOptions { mode, ..RenderOptions::default() };
        prop_assert_eq!(render(&points, &options), render(&points, &options));
    }

    #[test]
    fn calendar_buckets_are_conserved(raw in raw_points(), mode in calendar_mode()) {
        let points = to_points(&raw);
        let mut expected: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for p in &points {
            *expected.entry(p.timestamp.date_naive()).or_insert(0) += p.value;
        }

        let svg = render(&points, &RenderOptions { mode, ..RenderOptions::default() });
        let drawn = cells(&svg);
        prop_assert_eq!(drawn.len(), expected.len());
        for cell in &drawn {
            prop_assert!(cell.slot.is_none());
            prop_assert_eq!(Some(&cell.value), expected.get(&cell.date));
        }
    }

    #[test]
    fn weekly_buckets_are_conserved(raw in raw_points()) {
        let points = to_points(&raw);
        let mut expected: BTreeMap<(NaiveDate, u8), i64> = BTreeMap::new();
        for p in &points {
            let key = (p.timestamp.date_naive(), (p.timestamp.hour() / 4) as u8);
            *expected.entry(key).or_insert(0) += p.value;
        }
        let options = RenderOptions {
            mode: Mode::Weekly,
            from: points.first().map(|p| p.timestamp),
            to: points.last().map(|p| p.timestamp),
            ..RenderOptions::default()
        };
        let drawn = cells(&render(&points, &options));
        prop_assert_eq!(drawn.len(), expected.len());
        for cell in &drawn {
            let slot = cell.slot.expect("weekly cells carry a slot");
            prop_assert!(slot < 6);
            prop_assert_eq!(Some(&cell.value), expected.get(&(cell.date, slot)));
        }
    }

    #[test]
    fn no_cell_after_end(
        raw in raw_points(),
        from_day in 0i64..150,
        span in 0i64..40,
        weekly in any::<bool>(),
    ) {
        let points = to_points(&raw);
        let from = base() + Duration::days(from_day);
        let to = from + Duration::days(span) + Duration::hours(12);
        let options = RenderOptions {
            mode: if weekly { Mode::Weekly } else { Mode::Yearly },
            from: Some(from),
            to: Some(to),
            ..RenderOptions::default()
        };
        let end = to.date_naive();
        for cell in cells(&render(&points, &options)) {
            prop_assert!(cell.date <= end, "{} drawn after {}", cell.date, end);
        }
    }

    #[test]
    fn levels_stay_within_palette(
        raw in raw_points(),
        colors in 2usize..8,
        ranges in prop::option::of(prop::collection::vec(1i64..100, 1..8)),
        mode in prop_oneof![Just(Mode::Yearly), Just(Mode::Daily), Just(Mode::Weekly)],
    ) {
        let points = to_points(&raw);
        let value_ranges = ranges.map(|mut r| {
            r.sort_unstable();
            r
        });
        let options = RenderOptions {
            mode,
            colors: (0..colors).map(|i| format!("#{:06x}", i * 0x111111)).collect(),
            value_ranges,
            from: points.first().map(|p| p.timestamp),
            to: points.last().map(|p| p.timestamp),
            ..RenderOptions::default()
        };
        let drawn = cells(&render(&points, &options));
        prop_assert!(!drawn.is_empty());
        for cell in drawn {
            prop_assert!(cell.level < colors);
        }
    }
}

#[test]
fn empty_input_is_empty_output() {
    assert_eq!(render(&[], &RenderOptions::default()), "");
    let weekly = RenderOptions {
        mode: Mode::Weekly,
        ..RenderOptions::default()
    };
    assert_eq!(render(&[], &weekly), "");
    assert_eq!(render(&to_points(&[(3, 10, 1)]), &weekly), "");
}

#[test]
fn max_bucket_takes_top_level() {
    let points = to_points(&[(0, 9, 1), (1, 9, 10), (2, 9, 4)]);
    let drawn = cells(&render(&points, &RenderOptions::default()));
    let top = drawn.iter().find(|c| c.value == 10).unwrap();
    let low = drawn.iter().find(|c| c.value == 1).unwrap();
    assert_eq!(top.level, 4);
    assert_eq!(low.level, 1);
}
