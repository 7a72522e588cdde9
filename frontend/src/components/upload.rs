//! PDF upload screen.
//!
//! Loads the import types on mount, sends the chosen PDF as multipart form
//! data and renders the rows the server extracted from it.

use leptos::ev::SubmitEvent;
use leptos::*;
use leptos_meta::Title;
use leptos_router::use_navigate;
use web_sys::{Event, File, HtmlInputElement};

use super::{scoped_tracker, use_api};
use crate::state::UploadState;
use crate::types::{ExtractedRow, ImportType};
use crate::APP_NAME;

const MISSING_CELL: &str = "—";

const COLUMNS: [&str; 9] = [
    "Name",
    "Epic ID",
    "Phone Number",
    "Attending Physician",
    "Date",
    "Primary Care Provider",
    "Insurance",
    "Disposition",
    "Hospital",
];

/// Table cells of one extracted row, in column order.
fn row_cells(row: &ExtractedRow) -> [String; 9] {
    [
        &row.name,
        &row.epic_id,
        &row.phone_number,
        &row.attending_physician,
        &row.date,
        &row.primary_care_provider,
        &row.insurance,
        &row.disposition,
        &row.hospital,
    ]
    .map(|value| match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => MISSING_CELL.to_string(),
    })
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();

    let (import_types, set_import_types) = create_signal(Vec::<ImportType>::new());
    let (selected_type, set_selected_type) = create_signal(String::new());
    let (file, set_file) = create_signal(None::<File>);
    let (state, set_state) = create_signal(UploadState::default());
    let file_input = create_node_ref::<html::Input>();

    let catalog_requests = scoped_tracker();
    let upload_requests = scoped_tracker();

    // Import types, once per mount
    {
        let api = api.clone();
        let ticket = catalog_requests.begin();
        spawn_local(async move {
            let result = api.import_types().await;
            let Some(result) = ticket.accept(result) else {
                return;
            };
            match result {
                Ok(types) => {
                    log::info!("📋 Loaded {} import types", types.len());
                    if let Some(first) = types.first() {
                        set_selected_type.set(first.id.clone());
                    }
                    set_import_types.set(types);
                }
                Err(e) => {
                    log::error!("❌ Failed to fetch import types: {}", e);
                    set_state.update(|s| s.error = Some("Failed to fetch import types.".to_string()));
                }
            }
        });
    }

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let chosen = input.files().and_then(|files| files.get(0));
        set_file.set(chosen);
        set_state.update(UploadState::file_selected);
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let chosen = file.get_untracked();
        let import_type_id = selected_type.get_untracked();
        let mut started = false;
        set_state.update(|s| started = s.begin(chosen.is_some(), &import_type_id));
        let (true, Some(chosen)) = (started, chosen) else {
            return;
        };

        let api = api.clone();
        let ticket = upload_requests.begin();
        spawn_local(async move {
            let result = api.upload_pdf(&chosen, &import_type_id).await;
            let Some(result) = ticket.accept(result) else {
                return;
            };
            let succeeded = result.is_ok();
            set_state.update(|s| s.finish(result));
            if succeeded {
                log::info!("✅ {} processed", chosen.name());
                if let Some(input) = file_input.get_untracked() {
                    input.set_value("");
                }
                set_file.set(None);
            }
        });
    };

    let uploading = move || state.with(|s| s.uploading);

    view! {
        <Title text=format!("{} - Upload PDF", APP_NAME)/>
        <section class="upload-section">
            <h1>"Upload PDF"</h1>
            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="importType">"Import Type:"</label>
                    <select
                        id="importType"
                        required
                        on:change=move |ev| set_selected_type.set(event_target_value(&ev))
                    >
                        <For
                            each=move || import_types.get()
                            key=|t| t.id.clone()
                            children=move |t: ImportType| {
                                let id = t.id.clone();
                                let is_selected = move || selected_type.get() == id;
                                view! { <option value=t.id selected=is_selected>{t.name}</option> }
                            }
                        />
                    </select>
                </div>
                <div class="form-group">
                    <label for="pdfFile">"PDF File:"</label>
                    <input
                        type="file"
                        id="pdfFile"
                        accept="application/pdf"
                        node_ref=file_input
                        on:change=on_file_change
                    />
                </div>
                <button type="submit" disabled=uploading>
                    {move || if uploading() { "Uploading..." } else { "Upload" }}
                </button>
            </form>

            {move || state.with(|s| s.error.clone()).map(|msg| view! {
                <p class="error-message" role="alert">{msg}</p>
            })}
            {move || state.with(|s| s.message.clone()).map(|msg| view! {
                <p class="success-message" role="status">{msg}</p>
            })}

            {move || {
                let navigate = navigate.clone();
                state.with(|s| s.rows.clone()).filter(|rows| !rows.is_empty()).map(|rows| {
                    let review_id = state.with_untracked(|s| s.raw_data_id.clone());
                    view! {
                        <h2>"Extracted Data"</h2>
                        <table class="extracted-table">
                            <thead>
                                <tr>{COLUMNS.iter().map(|c| view! { <th>{*c}</th> }).collect_view()}</tr>
                            </thead>
                            <tbody>
                                {rows.iter().map(|row| view! {
                                    <tr>{row_cells(row).into_iter().map(|c| view! { <td>{c}</td> }).collect_view()}</tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                        {review_id.map(|id| view! {
                            <button
                                class="review-now"
                                on:click=move |_| navigate(&format!("/review/{}", id), Default::default())
                            >
                                "Review Now"
                            </button>
                        })}
                    }
                })
            }}
        </section>
    }
}
