//! Application configuration.
//!
//! Centralized configuration for the Discharge Review frontend.
//! Values are compile-time constants; the API base URL can be
//! overridden when building with `DISCHARGE_API_URL` set.

/// Backend API base URL.
///
/// Defaults to the local development server.
pub const API_BASE_URL: &str = match option_env!("DISCHARGE_API_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:5000",
};

/// Application name, used in page titles.
pub const APP_NAME: &str = "Discharge Review";

/// Default width of the imported-file listing window, in days.
pub const DEFAULT_LIST_WINDOW_DAYS: i64 = 7;

/// Maximum length of a free-text enrichment value (characters).
pub const MAX_ENRICHMENT_TEXT_LEN: usize = 255;

/// Minimum digit count for a non-empty phone number.
pub const MIN_PHONE_DIGITS: usize = 6;

/// Placeholder option of the boolean enrichment select.
pub const ENRICHMENT_PLACEHOLDER: &str = "--select--";

/// Enrichment types treated as boolean when the catalog carries no `kind`.
///
/// Older catalog servers do not send the attribute; these two identifiers
/// are the yes/no fields of the seeded catalog.
pub const LEGACY_BOOLEAN_ENRICHMENT_TYPES: &[&str] = &[
    "c8f7629d-38ec-4506-93b8-c2a9a08b3b65",
    "2a8760cb-505b-4c6f-a0b0-2a4d87fe8850",
];
