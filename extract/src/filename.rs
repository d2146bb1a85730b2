use std::sync::LazyLock;

pub const REC_EXT: &str = ".mgz";
pub const ZIP_EXT: &str = ".zip";

static NUMERIC_PREFIX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[0-9]+").unwrap());
static MANUAL_SPAN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^.+?-[0-9]+-[0-9]+").unwrap());

/// Series identifier derived from a filename: either a leading numeric run
/// or a `<text>-<digits>-<digits>` span kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SeriesId {
    Numeric(i64),
    Tag(String),
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{}", v),
            Self::Tag(v) => write!(f, "{}", v),
        }
    }
}

/// Derive a series label and optional series id from a replay/archive path.
pub fn parse_series_path(path: &std::path::Path) -> (String, Option<SeriesId>) {
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut start = 0;
    let mut series_id = None;
    if let Some(m) = NUMERIC_PREFIX.find(&filename) {
        if let Ok(value) = filename[..m.end()].parse::<i64>() {
            series_id = Some(SeriesId::Numeric(value));
            start = m.end() + 1;
        }
    }
    if let Some(m) = MANUAL_SPAN.find(&filename) {
        series_id = Some(SeriesId::Tag(filename[..m.end()].to_owned()));
        start = m.end() + 1;
    }

    let name = filename
        .get(start..)
        .unwrap_or("")
        .replace(ZIP_EXT, "");
    (name, series_id)
}

/// Recognize the fixed `rec.YYYYMMDD-HHMMSS.mgz` filename shape.
///
/// Fallback only; explicit and platform timestamps win over this, and the
/// file modification time is the last resort after it.
pub fn parse_filename_timestamp(name: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if !name.starts_with("rec.") || !name.ends_with(REC_EXT) || name.len() != 23 {
        return None;
    }

    // Checked access: member names come out of archives, so a 23-byte name
    // is not guaranteed to have char boundaries where the digits belong.
    let date = chrono::NaiveDate::from_ymd_opt(
        name.get(4..8)?.parse().ok()?,
        name.get(8..10)?.parse().ok()?,
        name.get(10..12)?.parse().ok()?,
    )?;
    let time = chrono::NaiveTime::from_hms_opt(
        name.get(13..15)?.parse().ok()?,
        name.get(15..17)?.parse().ok()?,
        name.get(17..19)?.parse().ok()?,
    )?;
    Some(date.and_time(time).and_utc())
}
