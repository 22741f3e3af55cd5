//! "Last updated" line: the date of the most recent commit touching the
//! catalog file in its source-hosting repository.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

/// Shown whenever the commit date cannot be fetched.
pub const UNAVAILABLE: &str = "no disponible";

fn default_api_base() -> String { "https://api.github.com".to_string() }

fn default_utc_offset() -> i32 { -3 }

/// Where to ask for the catalog file's history.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataConfig {
  #[serde(default = "default_api_base")]
  pub api_base:         String,
  pub owner:            String,
  pub repo:             String,
  /// Path of the catalog file inside the repository.
  pub path:             String,
  /// Fixed offset the date is displayed in.
  #[serde(default = "default_utc_offset")]
  pub utc_offset_hours: i32,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
  commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
  committer: Signature,
}

#[derive(Debug, Deserialize)]
struct Signature {
  date: DateTime<Utc>,
}

async fn fetch_last_commit(
  http: &reqwest::Client,
  cfg: &MetadataConfig,
) -> reqwest::Result<Option<DateTime<Utc>>> {
  let url = format!(
    "{}/repos/{}/{}/commits",
    cfg.api_base.trim_end_matches('/'),
    cfg.owner,
    cfg.repo
  );
  let commits: Vec<CommitEntry> = http
    .get(url)
    .query(&[("path", cfg.path.as_str()), ("per_page", "1")])
    .header(USER_AGENT, "stockroom")
    .header(ACCEPT, "application/vnd.github+json")
    .send()
    .await?
    .error_for_status()?
    .json()
    .await?;
  Ok(commits.into_iter().next().map(|c| c.commit.committer.date))
}

/// Render `ts` in the configured fixed offset, e.g. `24/09/2024 15:30`.
pub fn format_local(ts: DateTime<Utc>, utc_offset_hours: i32) -> String {
  let offset =
    FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
  ts.with_timezone(&offset).format("%d/%m/%Y %H:%M").to_string()
}

/// The formatted last-commit date, or [`UNAVAILABLE`]. Never fails.
pub async fn last_updated(http: &reqwest::Client, cfg: &MetadataConfig) -> String {
  match fetch_last_commit(http, cfg).await {
    Ok(Some(ts)) => format_local(ts, cfg.utc_offset_hours),
    Ok(None) => {
      tracing::warn!(path = %cfg.path, "no commits found for catalog file");
      UNAVAILABLE.to_string()
    }
    Err(e) => {
      tracing::warn!(error = %e, "could not fetch last-updated date");
      UNAVAILABLE.to_string()
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn commit_listing_parses() {
    let body = r#"[{"sha":"abc","commit":{"committer":{"name":"bot","date":"2024-09-24T18:30:00Z"}}}]"#;
    let commits: Vec<CommitEntry> = serde_json::from_str(body).unwrap();
    assert_eq!(
      commits[0].commit.committer.date,
      Utc.with_ymd_and_hms(2024, 9, 24, 18, 30, 0).unwrap()
    );
  }

  #[test]
  fn formats_in_fixed_offset() {
    let ts = Utc.with_ymd_and_hms(2024, 9, 24, 1, 30, 0).unwrap();
    assert_eq!(format_local(ts, -3), "23/09/2024 22:30");
    assert_eq!(format_local(ts, 0), "24/09/2024 01:30");
  }

  #[test]
  fn out_of_range_offset_falls_back_to_utc() {
    let ts = Utc.with_ymd_and_hms(2024, 9, 24, 1, 30, 0).unwrap();
    assert_eq!(format_local(ts, 99), "24/09/2024 01:30");
  }

  #[tokio::test]
  async fn unreachable_host_degrades() {
    let cfg = MetadataConfig {
      api_base:         "http://127.0.0.1:9".into(),
      owner:            "o".into(),
      repo:             "r".into(),
      path:             "productos.xlsx".into(),
      utc_offset_hours: -3,
    };
    let http = reqwest::Client::new();
    assert_eq!(last_updated(&http, &cfg).await, UNAVAILABLE);
  }
}
