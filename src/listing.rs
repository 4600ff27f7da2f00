//! Batch conversion of scraped listing records.
//!
//! Input is JSON Lines: one object per line with string `ydate` and `ytime`
//! fields plus whatever else the scraper captured. Each converted record is
//! written back out with its fields in their original order and `start`/`end`
//! added as RFC 3339 timestamps. Records that cannot be converted are logged
//! and skipped; only I/O failures stop the batch.

use std::io::{BufRead, Write};

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::*;
use crate::ydatetime::{convert_to_datetimes_at, DateTimeRange};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
}

/// Convert every record read from `reader`, writing results to `writer`.
pub fn convert_listings<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    offset: FixedOffset,
) -> Result<BatchSummary> {
    convert_listings_at(reader, writer, Utc::now().with_timezone(&offset))
}

/// Same as [`convert_listings`] with a fixed clock. All records share `now`,
/// so a batch running across New Year still uses one year.
pub fn convert_listings_at<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    now: DateTime<FixedOffset>,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    let mut buf = Vec::new();
    let mut line_number = 0;

    // Lines are read as bytes so invalid UTF-8 is skipped like any other bad JSON.
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = trim_line_ending(&buf);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match convert_record(line, now) {
            Ok(record) => {
                serde_json::to_writer(&mut writer, &record)?;
                writer.write_all(b"\n")?;
                summary.converted += 1;
            }
            Err(e @ (Error::InvalidArgument(_) | Error::Serde(_))) => {
                log::warn!("Skipping record on line {}: {}", line_number, e);
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    writer.flush()?;
    Ok(summary)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Parse one JSON line and add `start` and `end` to it.
pub fn convert_record<L: AsRef<[u8]>>(
    line: L,
    now: DateTime<FixedOffset>,
) -> Result<Map<String, Value>> {
    let mut record: Map<String, Value> = serde_json::from_slice(line.as_ref())?;

    let range: DateTimeRange = convert_to_datetimes_at(
        string_field(&record, "ydate")?,
        string_field(&record, "ytime")?,
        now,
    )?
    .into();

    record.insert("start".to_string(), Value::String(range.start.to_rfc3339()));
    record.insert("end".to_string(), Value::String(range.end.to_rfc3339()));
    Ok(record)
}

fn string_field<'a>(record: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match record.get(name) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(Error::invalid(format!("{} must be a string", name))),
        None => Err(Error::invalid("ydate and ytime are required")),
    }
}
