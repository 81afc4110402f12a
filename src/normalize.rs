//! Field normalizers: multi-format dates, durations, system names.
//!
//! Every function here is total over its input: unparsable values map to
//! `None` instead of an error, because one malformed field must not drop a
//! row whose primary key is known. Callers decide whether an absence is
//! worth a warning.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Hours in a workday when converting `<n>d` duration tokens.
const WORKDAY_HOURS: f64 = 8.0;

/// Bare numbers above this threshold are taken to be seconds, not hours.
const SECONDS_THRESHOLD: f64 = 1000.0;

/// Three-letter month abbreviations as Jira emits them in Portuguese and
/// English installs. Collisions ("mai"/"may", "out"/"oct") both resolve to
/// the right month.
const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("fev", 2),
    ("mar", 3),
    ("apr", 4),
    ("abr", 4),
    ("may", 5),
    ("mai", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("ago", 8),
    ("sep", 9),
    ("set", 9),
    ("oct", 10),
    ("out", 10),
    ("nov", 11),
    ("dec", 12),
    ("dez", 12),
];

/// Historical system renamings collapsed to one canonical spelling.
const SYSTEM_SYNONYMS: &[(&str, &str)] = &[
    ("Portal Legado", "Portal"),
    ("Portal Web", "Portal"),
    ("SAP ECC", "SAP"),
    ("SAP S/4", "SAP"),
    ("CRM Antigo", "CRM"),
    ("App Mobile", "Mobile"),
];

fn short_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2})\s+\d{1,2}:\d{2}").unwrap()
    })
}

fn named_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})/([[:alpha:]]{3})/(\d{4}|\d{2})(?:\s+\d{1,2}:\d{2})?").unwrap()
    })
}

fn day_month_year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap())
}

fn duration_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*([dhm])").unwrap())
}

/// Parses an export date in any of the formats Jira has shipped over the
/// years, in priority order:
///
/// 1. `D/M/YY HH:MM` with a numeric month and two-digit year (always
///    2000+YY)
/// 2. `D/Mon/YY HH:MM` or `D/Mon/YYYY HH:MM` with a named month, PT or EN
/// 3. ISO `YYYY-MM-DD` prefix, time-of-day ignored
/// 4. `D/M/YYYY`, day before month
/// 5. a generic fallback over the formats older exports used
///
/// Time-of-day is always discarded; the result is a calendar date.
pub fn parse_export_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = short_date_re().captures(value) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(2000 + year, month, day);
    }

    if let Some(caps) = named_month_re().captures(value) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        let year_raw: i32 = caps[3].parse().ok()?;
        let year = if caps[3].len() == 2 {
            2000 + year_raw
        } else {
            year_raw
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if value.len() >= 10
        && value.is_char_boundary(10)
        && let Ok(date) = NaiveDate::parse_from_str(&value[..10], "%Y-%m-%d")
    {
        return Some(date);
    }

    if let Some(caps) = day_month_year_re().captures(value) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    fallback_parse(value)
}

fn month_from_name(name: &str) -> Option<u32> {
    let lowered = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(token, _)| *token == lowered)
        .map(|(_, index)| *index)
}

fn fallback_parse(value: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M:%S", "%Y/%m/%d", "%d-%m-%Y"];
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Whole days from creation to resolution. Negative spans are invalid data
/// (resolved before created) and yield `None` rather than a negative count.
pub fn lead_time_days(created: NaiveDate, resolved: NaiveDate) -> Option<i64> {
    let days = (resolved - created).num_days();
    (days >= 0).then_some(days)
}

/// Parses a time-tracking value into decimal hours.
///
/// Bare numbers above 1000 are assumed to be seconds (Jira's internal unit)
/// and converted; smaller bare numbers are taken as hours. Otherwise the
/// value is scanned for `<n>d`, `<n>h`, `<n>m` tokens in any order, with a
/// day worth 8 hours. No recognizable token, a zero sum, or a negative bare
/// number all yield `None`.
pub fn parse_time_value(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(number) = value.parse::<f64>() {
        if number < 0.0 {
            return None;
        }
        if number > SECONDS_THRESHOLD {
            return Some((number / 3600.0 * 100.0).round() / 100.0);
        }
        return Some(number);
    }

    let mut hours = 0.0;
    let mut matched = false;
    for caps in duration_token_re().captures_iter(value) {
        let amount: f64 = caps[1].parse().ok()?;
        matched = true;
        match caps[2].to_ascii_lowercase().as_str() {
            "d" => hours += amount * WORKDAY_HOURS,
            "h" => hours += amount,
            "m" => hours += amount / 60.0,
            _ => unreachable!(),
        }
    }
    (matched && hours > 0.0).then_some(hours)
}

/// Collapses known historical system renamings to one canonical spelling.
/// Unknown names pass through trimmed but otherwise untouched.
pub fn canonical_system(raw: &str) -> String {
    let trimmed = raw.trim();
    SYSTEM_SYNONYMS
        .iter()
        .find(|(old, _)| *old == trimmed)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Extracts the system from a summary's leading bracket tag (`[Portal] fix
/// login`), canonicalized. The bracket tag is the source of truth for
/// system attribution; the export's component column is not consulted.
pub fn system_from_summary(summary: &str) -> Option<String> {
    let trimmed = summary.trim();
    let rest = trimmed.strip_prefix('[')?;
    let end = rest.find(']')?;
    let tag = rest[..end].trim();
    if tag.is_empty() {
        return None;
    }
    Some(canonical_system(tag))
}
