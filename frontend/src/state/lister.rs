//! Lister state: the date-range filter and what the listing shows.
//!
//! The range is edited as local wall-clock time (`datetime-local`
//! inputs) and converted to UTC instants before it reaches the API.

use chrono::{DateTime, Duration, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::config::DEFAULT_LIST_WINDOW_DAYS;
use crate::state::LoadState;
use crate::types::ImportedFileSummary;

/// Value format of a `datetime-local` input.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// The two filter inputs, as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRangeInput {
    pub start: String,
    pub end: String,
}

/// A validated range, ready to query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRangeInput {
    /// The default window ending at `now`.
    pub fn default_at<Tz: TimeZone>(now: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let start = now.clone() - Duration::days(DEFAULT_LIST_WINDOW_DAYS);
        Self {
            start: start.format(INPUT_FORMAT).to_string(),
            end: now.format(INPUT_FORMAT).to_string(),
        }
    }

    /// The default window ending now, in local time.
    pub fn last_week() -> Self {
        Self::default_at(Local::now())
    }

    /// Validate the inputs and convert them to absolute instants.
    pub fn to_range(&self) -> Result<DateRange, String> {
        let start = parse_local(&self.start, "Start")?;
        let end = parse_local(&self.end, "End")?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err("Start date must be before end date.".to_string());
            }
        }
        Ok(DateRange { start, end })
    }
}

impl DateRange {
    /// Query parameters for `GET /raw-data`; unbounded sides are omitted.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("start_date", start.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        if let Some(end) = self.end {
            params.push(("end_date", end.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        params
    }
}

fn parse_local(input: &str, which: &str) -> Result<Option<DateTime<Utc>>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let naive = NaiveDateTime::parse_from_str(input, INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("{} date is not a valid date and time.", which))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| Some(local.with_timezone(&Utc)))
        .ok_or_else(|| format!("{} date does not exist in the local time zone.", which))
}

/// Format a server timestamp in local time, falling back to the raw text.
pub fn display_local(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();
    }
    // Naive timestamps (no offset) are taken as UTC
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%a, %d %b %Y %H:%M:%S GMT"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, format) {
            return Utc
                .from_utc_datetime(&naive)
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();
        }
    }
    timestamp.to_string()
}

/// What the listing area renders.
#[derive(Clone, Debug, PartialEq)]
pub enum ListingView {
    Loading,
    Error(String),
    NoFiles,
    Table(Vec<ImportedFileSummary>),
}

impl ListingView {
    pub const NO_FILES_MESSAGE: &'static str = "No files found for the selected time range.";

    pub fn from_state(state: &LoadState<Vec<ImportedFileSummary>>) -> Self {
        match state {
            LoadState::Loading => ListingView::Loading,
            LoadState::Failed(msg) => ListingView::Error(msg.clone()),
            LoadState::Ready(rows) if rows.is_empty() => ListingView::NoFiles,
            LoadState::Ready(rows) => ListingView::Table(rows.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> ImportedFileSummary {
        ImportedFileSummary {
            raw_data_id: id.to_string(),
            source_file_name: format!("{}.pdf", id),
            created_at: "2024-03-01T10:00:00".to_string(),
            type_name: "Hospital Discharge".to_string(),
            status: "Records still pending review".to_string(),
        }
    }

    #[test]
    fn test_default_window_is_seven_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 30, 0).unwrap();
        let input = DateRangeInput::default_at(now);
        assert_eq!(input.start, "2024-03-01T12:30");
        assert_eq!(input.end, "2024-03-08T12:30");
    }

    #[test]
    fn test_default_window_converts() {
        let range = DateRangeInput::last_week().to_range().unwrap();
        let (start, end) = (range.start.unwrap(), range.end.unwrap());
        assert!(start < end);
        assert_eq!(range.query_params().len(), 2);
    }

    #[test]
    fn test_start_after_end_rejected() {
        let input = DateRangeInput {
            start: "2024-03-02T00:00".to_string(),
            end: "2024-03-01T00:00".to_string(),
        };
        assert_eq!(input.to_range(), Err("Start date must be before end date.".to_string()));
    }

    #[test]
    fn test_open_ended_range() {
        let input = DateRangeInput {
            start: String::new(),
            end: "2024-03-01T00:00".to_string(),
        };
        let params = input.to_range().unwrap().query_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].0, "end_date");
        assert!(params[0].1.ends_with('Z'));
    }

    #[test]
    fn test_garbage_input_rejected() {
        let input = DateRangeInput {
            start: "yesterday".to_string(),
            end: String::new(),
        };
        assert!(input.to_range().is_err());
    }

    #[test]
    fn test_listing_view() {
        assert_eq!(
            ListingView::from_state(&LoadState::Ready(Vec::new())),
            ListingView::NoFiles
        );
        assert_eq!(
            ListingView::from_state(&LoadState::Failed("Failed to fetch raw data.".into())),
            ListingView::Error("Failed to fetch raw data.".into())
        );
        match ListingView::from_state(&LoadState::Ready(vec![summary("a"), summary("b")])) {
            ListingView::Table(rows) => assert_eq!(rows.len(), 2),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_display_local_keeps_unparseable() {
        assert_eq!(display_local("not a date"), "not a date");
        assert_ne!(display_local("2024-03-01T10:00:00Z"), "2024-03-01T10:00:00Z");
    }
}
