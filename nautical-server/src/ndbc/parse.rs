//! Parsers for the NDBC station list and realtime observation files.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{NaiveDate, TimeZone, Utc};
use regex::Regex;
use tracing::debug;

use crate::domain::{BuoySnapshot, Source, StationId};

use super::error::NdbcError;

static STATION_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<station\s([^>]*?)/?>").unwrap());

static ATTRIBUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#).unwrap());

/// Marker NDBC writes in place of a value the station did not report.
const MISSING: &str = "MM";

/// Columns that together form the observation timestamp.
const TIME_COLUMNS: [&str; 5] = ["YY", "MM", "DD", "hh", "mm"];

/// Parse `activestations.xml` into sources grouped by program (`pgm`).
///
/// Sources are returned in the order their program first appears, and
/// stations within a source keep document order. Stations with an
/// invalid id or no program are skipped.
pub fn parse_active_stations(xml: &str) -> Result<Vec<Source>, NdbcError> {
    if !xml.contains("<stations") {
        return Err(NdbcError::Parse {
            message: "missing <stations> element".to_string(),
        });
    }

    let mut sources: Vec<Source> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tag in STATION_TAG_RE.captures_iter(xml) {
        let mut id = None;
        let mut program = None;

        for attr in ATTRIBUTE_RE.captures_iter(&tag[1]) {
            match &attr[1] {
                "id" => id = Some(decode_entities(&attr[2])),
                "pgm" => program = Some(decode_entities(&attr[2])),
                _ => {}
            }
        }

        let (Some(id), Some(program)) = (id, program) else {
            debug!(tag = &tag[0], "skipping station without id or pgm");
            continue;
        };

        let station = match StationId::parse(&id) {
            Ok(station) => station,
            Err(e) => {
                debug!(id = %id, error = %e, "skipping station with invalid id");
                continue;
            }
        };

        let slot = *index.entry(program.clone()).or_insert_with(|| {
            sources.push(Source::new(program, Vec::new()));
            sources.len() - 1
        });
        sources[slot].stations.push(station);
    }

    Ok(sources)
}

/// Parse a `realtime2/{ID}.txt` file, keeping only the latest row.
///
/// The first `#` line names the columns and the remaining `#` lines carry
/// units. Rows are newest first.
pub fn parse_realtime(station: &StationId, text: &str) -> Result<BuoySnapshot, NdbcError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines
        .next()
        .filter(|l| l.starts_with('#'))
        .ok_or_else(|| NdbcError::Parse {
            message: format!("{station}: missing column header"),
        })?;
    let columns: Vec<&str> = header.trim_start_matches('#').split_whitespace().collect();

    let row = lines
        .find(|l| !l.starts_with('#'))
        .ok_or_else(|| NdbcError::Parse {
            message: format!("{station}: no observation rows"),
        })?;
    let values: Vec<&str> = row.split_whitespace().collect();

    if values.len() != columns.len() {
        return Err(NdbcError::Parse {
            message: format!(
                "{station}: row has {} values but header has {} columns",
                values.len(),
                columns.len()
            ),
        });
    }

    let mut snapshot = BuoySnapshot::new(station.clone(), observation_time(&columns, &values));

    for (column, value) in columns.iter().zip(&values) {
        if TIME_COLUMNS.contains(column) || *value == MISSING {
            continue;
        }
        if let Ok(number) = value.parse::<f64>() {
            snapshot.measurements.insert((*column).to_string(), number);
        }
    }

    Ok(snapshot)
}

/// Build the UTC observation time from the `YY MM DD hh mm` columns.
fn observation_time(columns: &[&str], values: &[&str]) -> Option<chrono::DateTime<Utc>> {
    let field = |name: &str| -> Option<u32> {
        let idx = columns.iter().position(|c| *c == name)?;
        values.get(idx)?.parse().ok()
    };

    let mut year = field("YY")? as i32;
    // Files from before 1999 carry two-digit years
    if year < 100 {
        year += 1900;
    }

    let naive = NaiveDate::from_ymd_opt(year, field("MM")?, field("DD")?)?
        .and_hms_opt(field("hh")?, field("mm")?, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
