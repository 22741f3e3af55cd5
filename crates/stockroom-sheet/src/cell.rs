//! Cell values and the lenient coercions applied to them.
//!
//! Spreadsheet cells arrive typed (calamine) while CSV cells arrive as text;
//! both are funnelled through [`Cell`] so product fields are coerced the same
//! way regardless of the source format.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
  Empty,
  Text(String),
  Number(f64),
  Bool(bool),
  DateTime(NaiveDateTime),
}

impl Cell {
  /// Build a cell from CSV text. Blank text is [`Cell::Empty`].
  pub(crate) fn from_text(s: &str) -> Self {
    let s = s.trim();
    if s.is_empty() {
      Cell::Empty
    } else {
      Cell::Text(s.to_owned())
    }
  }

  pub(crate) fn from_calamine(data: &calamine::Data) -> Self {
    use calamine::Data;
    match data {
      Data::Empty | Data::Error(_) => Cell::Empty,
      Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
        Cell::from_text(s)
      }
      Data::Float(f) => Cell::Number(*f),
      Data::Int(i) => Cell::Number(*i as f64),
      Data::Bool(b) => Cell::Bool(*b),
      Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
        Some(ndt) => Cell::DateTime(ndt),
        None => Cell::Empty,
      },
    }
  }

  pub(crate) fn is_empty(&self) -> bool { matches!(self, Cell::Empty) }

  /// Display form. Whole numbers lose their `.0` so numeric codes read
  /// naturally (`1234.0` → `"1234"`).
  pub(crate) fn as_text(&self) -> Option<String> {
    match self {
      Cell::Empty => None,
      Cell::Text(s) => Some(s.clone()),
      Cell::Number(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
        Some(format!("{}", *f as i64))
      }
      Cell::Number(f) => Some(f.to_string()),
      Cell::Bool(b) => Some(b.to_string()),
      Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
  }

  pub(crate) fn as_number(&self) -> Option<f64> {
    match self {
      Cell::Number(f) if f.is_finite() => Some(*f),
      Cell::Text(s) => parse_number(s),
      _ => None,
    }
  }

  pub(crate) fn as_integer(&self) -> Option<i64> {
    self.as_number().map(|f| f.round() as i64)
  }

  /// Coerce to a timestamp. Anything unparseable is `None`; a bad date never
  /// fails the load.
  pub(crate) fn as_datetime(&self) -> Option<NaiveDateTime> {
    match self {
      Cell::DateTime(dt) => Some(*dt),
      Cell::Number(f) => excel_serial_to_datetime(*f),
      Cell::Text(s) => parse_datetime(s),
      _ => None,
    }
  }
}

// ─── Numbers ─────────────────────────────────────────────────────────────────

/// Parse a number written by a person: currency symbols and spaces are
/// ignored, and both `1.234,56` and `1,234.56` are understood. A single
/// separator followed by exactly three digits is read as grouping, so
/// `12.500` and `12,500` are both twelve thousand five hundred.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
  let cleaned: String = raw
    .chars()
    .filter(|c| !c.is_whitespace() && *c != '$')
    .collect();
  if cleaned.is_empty() {
    return None;
  }

  let last_dot = cleaned.rfind('.');
  let last_comma = cleaned.rfind(',');
  let normalised = match (last_dot, last_comma) {
    // Both present: whichever comes last is the decimal separator.
    (Some(d), Some(c)) if c > d => cleaned.replace('.', "").replace(',', "."),
    (Some(_), Some(_)) => cleaned.replace(',', ""),
    (None, Some(c)) => {
      let decimals = cleaned.len() - c - 1;
      if cleaned.matches(',').count() == 1 && (1..=2).contains(&decimals) {
        cleaned.replace(',', ".")
      } else {
        cleaned.replace(',', "")
      }
    }
    // A lone dot before exactly three digits groups thousands (`12.500`),
    // unless the integer part is zero (`0.125`).
    (Some(d), None) => {
      let decimals = cleaned.len() - d - 1;
      let whole = cleaned[..d].trim_start_matches(['-', '+']);
      let grouped = decimals == 3 && !matches!(whole, "" | "0");
      if cleaned.matches('.').count() > 1 || grouped {
        cleaned.replace('.', "")
      } else {
        cleaned
      }
    }
    (None, None) => cleaned,
  };

  normalised.parse::<f64>().ok().filter(|f| f.is_finite())
}

// ─── Dates ───────────────────────────────────────────────────────────────────

const DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
  "%d/%m/%Y %H:%M:%S",
  "%d/%m/%Y %H:%M",
  "%d-%m-%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Parse a timestamp. Slash dates are read day-first (`24/09/2024`).
pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
  let s = raw.trim();
  if s.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.naive_local());
  }
  DATETIME_FORMATS
    .iter()
    .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    .or_else(|| {
      DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Convert an Excel serial date (days since 1899-12-30, fractional part is
/// the time of day) to a timestamp, rounded to the millisecond.
pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
  if !serial.is_finite() || serial < 0.0 {
    return None;
  }
  let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
  let millis = (serial * 86_400_000.0).round() as i64;
  epoch.checked_add_signed(Duration::milliseconds(millis))
}
