//! Public holiday lookup with a per-year file cache in the config directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use jira_api::HolidayService;
use log::{debug, warn};
use serde::Deserialize;

use crate::error::CacheError;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicHoliday {
    pub date: NaiveDate,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country_code: String,
}

pub fn holiday_cache_path(cache_dir: &Path, year: i32, country_code: &str) -> PathBuf {
    cache_dir.join(format!(
        "public-holidays-{}-{}.json",
        year,
        country_code.to_uppercase()
    ))
}

/// Holidays for `year`, fetched once and then served from the cache file.
///
/// Never fails: problems are logged and an empty list is returned, so a later
/// run can retry the fetch.
pub async fn load_public_holidays(
    service: &HolidayService,
    cache_dir: &Path,
    year: i32,
    country_code: &str,
) -> Vec<PublicHoliday> {
    match try_load(service, cache_dir, year, country_code).await {
        Ok(holidays) => holidays,
        Err(err) => {
            warn!("{err}");
            Vec::new()
        }
    }
}

async fn try_load(
    service: &HolidayService,
    cache_dir: &Path,
    year: i32,
    country_code: &str,
) -> Result<Vec<PublicHoliday>, CacheError> {
    let path = holiday_cache_path(cache_dir, year, country_code);
    let display = path.display().to_string();

    if !path.exists() {
        let bytes = service.fetch_raw(year, country_code).await?;
        fs::create_dir_all(cache_dir).map_err(|source| CacheError::Io {
            path: display.clone(),
            source,
        })?;
        fs::write(&path, &bytes).map_err(|source| CacheError::Io {
            path: display.clone(),
            source,
        })?;
        debug!("cached public holidays for {year} in {display}");
    }

    let content = fs::read(&path).map_err(|source| CacheError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| CacheError::Parse {
        path: display,
        source,
    })
}

/// Holidays for every calendar year touched by `[from, to]`.
pub async fn load_range(
    service: &HolidayService,
    cache_dir: &Path,
    country_code: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<PublicHoliday> {
    let mut holidays = Vec::new();
    for year in from.year()..=to.year() {
        holidays.extend(load_public_holidays(service, cache_dir, year, country_code).await);
    }
    holidays
}

pub fn holiday_dates(holidays: &[PublicHoliday]) -> Vec<NaiveDate> {
    holidays.iter().map(|holiday| holiday.date).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const BODY: &str = r#"[{"date":"2024-05-01","localName":"Offentlig høytidsdag","name":"Labour Day","countryCode":"NO"},{"date":"2024-05-17","name":"Constitution Day","countryCode":"NO"}]"#;

    #[tokio::test]
    async fn fetches_once_then_reads_cache() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/publicholidays/2024/NO")
            .with_status(200)
            .with_body(BODY)
            .expect(1)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let service = HolidayService::new(server.url()).unwrap();

        let first = load_public_holidays(&service, dir.path(), 2024, "no").await;
        let second = load_public_holidays(&service, dir.path(), 2024, "NO").await;

        mock.assert_async().await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, "Labour Day");
        let cached = fs::read_to_string(dir.path().join("public-holidays-2024-NO.json")).unwrap();
        assert_eq!(cached, BODY);
    }

    #[tokio::test]
    async fn failed_fetch_writes_nothing_and_degrades_to_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/publicholidays/2024/SE")
            .with_status(500)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let service = HolidayService::new(server.url()).unwrap();

        let holidays = load_public_holidays(&service, dir.path(), 2024, "SE").await;

        assert!(holidays.is_empty());
        assert!(!holiday_cache_path(dir.path(), 2024, "SE").exists());
    }

    #[tokio::test]
    async fn corrupt_cache_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(holiday_cache_path(dir.path(), 2023, "NO"), "not json").unwrap();
        let service = HolidayService::new("http://127.0.0.1:9").unwrap();

        let holidays = load_public_holidays(&service, dir.path(), 2023, "NO").await;
        assert!(holidays.is_empty());
    }

    #[test]
    fn extracts_dates() {
        let holidays: Vec<PublicHoliday> = serde_json::from_str(BODY).unwrap();
        assert_eq!(
            holiday_dates(&holidays),
            vec![
                NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
            ]
        );
    }
}
