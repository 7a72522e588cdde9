//! Discharge Review - Frontend Rust/Leptos Application
//!
//! A WebAssembly client for uploading hospital discharge PDFs, reviewing
//! the records extracted from them, and approving, rejecting or editing
//! each record before it is committed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Nav (Home / Upload PDF / Review)                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Routes                                                     │
//! │  ├── /                          Home                        │
//! │  ├── /upload                    UploadPage                  │
//! │  ├── /review-list               FileListPage                │
//! │  ├── /review/:raw_data_id       ReviewPage + ConfirmModal   │
//! │  ├── /edit/:temp_discharge_id   EditPage                    │
//! │  └── *                          NotFound                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Build-time configuration and constants
//! - [`types`] - Wire types and errors
//! - [`validation`] - Client-side record validation
//! - [`state`] - Per-screen state machines, free of any DOM code
//! - [`services`] - Backend API client and raw PDF download
//! - [`components`] - UI components

use leptos::*;
use leptos_meta::provide_meta_context;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Upload
    ExtractedRow, ImportType, UploadResponse,
    // Listing
    ImportedFileSummary,
    // Review
    DischargeRecord, DischargeStatus, EnrichmentType, EnrichmentValue, RawData, ReviewData,
    // Errors
    AppError, AppResult, FieldErrors,
};

// Components
pub use components::*;

// Services
pub use services::ApiClient;

// =============================================================================
// Application
// =============================================================================

/// Root component: router, navigation and the shared API client.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(ApiClient::default());

    view! {
        <Router>
            <Nav/>
            <main class="container">
                <Routes>
                    <Route path="/" view=Home/>
                    <Route path="/upload" view=UploadPage/>
                    <Route path="/review-list" view=FileListPage/>
                    <Route path="/review/:raw_data_id" view=ReviewPage/>
                    <Route path="/edit/:temp_discharge_id" view=EditPage/>
                    <Route path="/*any" view=NotFound/>
                </Routes>
            </main>
            <Footer/>
        </Router>
    }
}
