use std::sync::OnceLock;

use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, PrimitiveDateTime};

pub const EPOCH_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

fn naive_formats() -> &'static [Vec<FormatItem<'static>>; 2] {
    static FMT: OnceLock<[Vec<FormatItem<'static>>; 2]> = OnceLock::new();
    FMT.get_or_init(|| {
        [
            time::format_description::parse(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
            )
            .expect("valid time format"),
            time::format_description::parse("[year]-[month]-[day]T[hour]:[minute]:[second]")
                .expect("valid time format"),
        ]
    })
}

fn parse_naive(ts: &str) -> Option<PrimitiveDateTime> {
    naive_formats()
        .iter()
        .find_map(|fmt| PrimitiveDateTime::parse(ts, fmt).ok())
}

/// Parses RFC3339, falling back to naive ISO-8601 as written by older session files.
///
/// Naive values were local wall-clock time with no recorded offset; they are pinned to UTC
/// here, so they only order correctly against other naive values (see `is_naive_timestamp`).
pub fn parse_timestamp(ts: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(ts, &Rfc3339) {
        return Some(dt);
    }
    parse_naive(ts).map(PrimitiveDateTime::assume_utc)
}

/// `true` for a legacy timestamp without an offset.
pub fn is_naive_timestamp(ts: &str) -> bool {
    OffsetDateTime::parse(ts, &Rfc3339).is_err() && parse_naive(ts).is_some()
}

pub fn format_timestamp(dt: OffsetDateTime) -> String {
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| EPOCH_TIMESTAMP.to_string())
}

pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}
