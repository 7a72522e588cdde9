//! UI Components for the Discharge Review application.
//!
//! # Layout Components
//! - [`Nav`] - Navigation bar
//! - [`Home`] - Landing page
//! - [`Footer`] - Page footer
//!
//! # Screens
//! - [`UploadPage`] - PDF upload and extracted rows
//! - [`FileListPage`] - Imported files filtered by date range
//! - [`ReviewPage`] - Approve/reject the records of one imported file
//! - [`EditPage`] - Edit one record and its enrichment values
//! - [`ConfirmModal`] - Blocking confirmation dialog

mod confirm_modal;
mod edit;
mod file_list;
mod footer;
mod home;
mod nav;
mod review;
mod upload;

pub use confirm_modal::*;
pub use edit::*;
pub use file_list::*;
pub use footer::*;
pub use home::*;
pub use nav::*;
pub use review::*;
pub use upload::*;

use leptos::*;

use crate::services::ApiClient;
use crate::state::RequestTracker;

/// API client provided by [`crate::App`].
pub(crate) fn use_api() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_default()
}

/// A request tracker that closes when the current view unmounts.
pub(crate) fn scoped_tracker() -> RequestTracker {
    let tracker = RequestTracker::new();
    let on_unmount = tracker.clone();
    on_cleanup(move || on_unmount.close());
    tracker
}

/// Blocking browser notice.
pub(crate) fn alert(message: &str) {
    if let Err(e) = gloo_utils::window().alert_with_message(message) {
        log::warn!("Could not show alert: {:?}", e);
    }
}

/// Navigate back one history entry.
pub(crate) fn go_back() {
    let back = gloo_utils::window().history().and_then(|history| history.back());
    if let Err(e) = back {
        log::warn!("Could not navigate back: {:?}", e);
    }
}
