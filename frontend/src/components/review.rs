//! Review screen for one imported file.
//!
//! Shows the raw file, every discharge record extracted from it and the
//! enrichment values attached to each record. Approve and Reject go
//! through [`ConfirmModal`]; after a successful action the review data is
//! fetched again so the server copy replaces the local one.

use leptos::ev::MouseEvent;
use leptos::*;
use leptos_meta::Title;
use leptos_router::{use_navigate, use_params_map, NavigateOptions};

use super::{alert, scoped_tracker, use_api, ConfirmModal};
use crate::services::{decode_raw_content, download_pdf};
use crate::state::{
    display_local, ActionOutcome, LoadPhase, LoadState, RecordCard, ReviewAction, ReviewSession,
};
use crate::types::RawData;
use crate::APP_NAME;

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn timestamp_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => display_local(v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[component]
pub fn ReviewPage() -> impl IntoView {
    let api = use_api();
    let params = use_params_map();
    let raw_data_id = move || params.with(|p| p.get("raw_data_id").cloned().unwrap_or_default());

    let (session, set_session) = create_signal(LoadState::<ReviewSession>::Loading);

    let fetch_requests = scoped_tracker();
    let action_requests = scoped_tracker();

    // `refresh` keeps the open session and only swaps its data
    let load = {
        let api = api.clone();
        move |id: String, refresh: bool| {
            let api = api.clone();
            let ticket = fetch_requests.begin();
            spawn_local(async move {
                log::info!("🔍 Fetching review data for {}", id);
                let result = api.review(&id).await;
                let Some(result) = ticket.accept(result) else {
                    return;
                };
                match result {
                    Ok(data) => set_session.update(|state| {
                        if refresh {
                            if let Some(session) = state.ready_mut() {
                                session.replace_data(data);
                                return;
                            }
                        }
                        *state = LoadState::Ready(ReviewSession::new(data));
                    }),
                    Err(e) if refresh => log::warn!("Could not refresh review data: {}", e),
                    Err(e) => {
                        set_session.set(LoadState::from_result(Err(e), "Failed to fetch review data."))
                    }
                }
            });
        }
    };

    {
        let load = load.clone();
        create_effect(move |_| {
            let id = raw_data_id();
            set_session.set(LoadState::Loading);
            load(id, false);
        });
    }

    let on_action = Callback::new(move |(action, record_id): (ReviewAction, String)| {
        set_session.update(|state| {
            if let Some(session) = state.ready_mut() {
                if !session.request(action, &record_id) {
                    log::debug!("Ignored {} request for {}", action, record_id);
                }
            }
        });
    });

    let on_cancel = Callback::new(move |_: ()| {
        set_session.update(|state| {
            if let Some(session) = state.ready_mut() {
                session.cancel();
            }
        });
    });

    let on_confirm = Callback::new(move |_: ()| {
        let mut pending = None;
        set_session.update(|state| pending = state.ready_mut().and_then(ReviewSession::confirm));
        let Some(pending) = pending else {
            return;
        };

        let api = api.clone();
        let load = load.clone();
        let ticket = action_requests.begin();
        let id = params.with_untracked(|p| p.get("raw_data_id").cloned().unwrap_or_default());
        spawn_local(async move {
            let result = api.review_action(pending.action, &pending.record_id).await;
            let Some(result) = ticket.accept(result) else {
                return;
            };
            let mut outcome = ActionOutcome::Ignored;
            set_session.update(|state| {
                if let Some(session) = state.ready_mut() {
                    outcome = session.resolve(result);
                }
            });
            if let ActionOutcome::Completed(done) = outcome {
                log::info!("✅ Record {} {}d", done.record_id, done.action);
                alert("Discharge record updated successfully.");
                load(id, true);
            }
        });
    });

    let modal_visible = Signal::derive(move || {
        session.with(|s| s.ready().map(ReviewSession::modal_visible).unwrap_or(false))
    });
    let modal_text = Signal::derive(move || {
        session.with(|s| s.ready().map(|s| s.modal_text().to_string()).unwrap_or_default())
    });
    let busy = Signal::derive(move || {
        session.with(|s| s.ready().map(ReviewSession::is_submitting).unwrap_or(false))
    });

    let phase = create_memo(move |_| session.with(LoadState::phase));
    let raw = create_memo(move |_| {
        session.with(|s| s.ready().and_then(|r| r.data().raw_data.clone()))
    });

    view! {
        <Title text=format!("{} - Review", APP_NAME)/>
        <section class="review">
            <h1>"Review File Import"</h1>
            {move || match phase.get() {
                LoadPhase::Loading => view! { <div class="spinner" aria-label="Loading"></div> }.into_view(),
                LoadPhase::Failed(msg) => view! { <p class="error-message" role="alert">{msg}</p> }.into_view(),
                LoadPhase::Ready => view! {
                    {move || raw.get().map(|raw| view! { <RawFileInfo raw=raw/> })}
                    <h2>"Discharge Records"</h2>
                    <For
                        each=move || session.with(|s| s.ready().map(ReviewSession::record_ids).unwrap_or_default())
                        key=|id| id.clone()
                        children=move |id: String| view! {
                            <DischargeCard record_id=id session=session on_action=on_action/>
                        }
                    />
                }.into_view(),
            }}
            <ConfirmModal
                visible=modal_visible
                text=modal_text
                busy=busy
                on_confirm=on_confirm
                on_cancel=on_cancel
            />
        </section>
    }
}

/// Metadata of the uploaded file and the raw PDF download.
#[component]
fn RawFileInfo(raw: RawData) -> impl IntoView {
    let uploaded_at = timestamp_or_na(raw.ingest_timestamp.as_deref());
    let import_type = or_na(raw.import_type.as_deref());
    let uploaded_by = or_na(raw.uploaded_by.as_deref());
    let file_name = raw.file_name.clone();
    let has_content = raw.raw_content.as_deref().is_some_and(|c| !c.is_empty());

    let on_download = move |_: MouseEvent| {
        let Some(content) = raw.raw_content.as_deref() else {
            return;
        };
        let downloaded = decode_raw_content(content).and_then(|bytes| download_pdf(&raw.file_name, &bytes));
        if let Err(e) = downloaded {
            log::error!("❌ Raw PDF download failed: {}", e);
            alert("Failed to download the raw PDF.");
        }
    };

    view! {
        <div class="raw-data">
            <p><strong>"Import Type: "</strong>{import_type}</p>
            <p><strong>"File Name: "</strong>{file_name}</p>
            <p><strong>"Uploaded By: "</strong>{uploaded_by}</p>
            <p><strong>"Uploaded At: "</strong>{uploaded_at}</p>
            <button disabled=!has_content on:click=on_download>"Download Raw PDF"</button>
        </div>
    }
}

/// One discharge record with its enrichment values and actions.
///
/// Re-renders only when [`ReviewSession::card`] changes for this record;
/// the action buttons follow the busy flag separately.
#[component]
fn DischargeCard(
    record_id: String,
    session: ReadSignal<LoadState<ReviewSession>>,
    on_action: Callback<(ReviewAction, String)>,
) -> impl IntoView {
    let navigate = use_navigate();
    let id = store_value(record_id);
    let card = create_memo(move |_| {
        session.with(|s| s.ready().and_then(|r| id.with_value(|id| r.card(id))))
    });
    let busy = create_memo(move |_| {
        session.with(|s| s.ready().map(ReviewSession::is_submitting).unwrap_or(false))
    });

    move || {
        let navigate = navigate.clone();
        card.get().map(|card| card_view(card, busy, on_action, navigate))
    }
}

fn card_view(
    card: RecordCard,
    busy: Memo<bool>,
    on_action: Callback<(ReviewAction, String)>,
    navigate: impl Fn(&str, NavigateOptions) + 'static,
) -> View {
    let RecordCard {
        record,
        enrichment,
        errors,
    } = card;
    let id = record.temp_discharge_id.clone();
    let status = record.status.label().to_string();

    let fields = [
        ("Name", record.name.clone()),
        ("Epic ID", record.epic_id.clone()),
        ("Phone Number", record.phone_number.clone()),
        ("Attending Physician", record.attending_physician.clone()),
        ("Date", record.date.clone()),
        ("Primary Care Provider", record.primary_care_provider.clone()),
        ("Insurance", record.insurance.clone()),
        ("Disposition", record.disposition.clone()),
        ("Hospital", or_na(record.hospital_name.as_deref())),
    ];

    let actions = if record.status.is_approved() {
        view! { <span class="badge approved">"Approved"</span> }.into_view()
    } else {
        let edit_target = format!("/edit/{}", id);
        let approve_id = id.clone();
        let reject_id = id;
        view! {
            <div class="record-actions">
                <button class="outlined" on:click=move |_| navigate(&edit_target, Default::default())>
                    "Edit"
                </button>
                <button
                    disabled=move || busy.get()
                    on:click=move |_| on_action.call((ReviewAction::Approve, approve_id.clone()))
                >
                    "Approve"
                </button>
                <button
                    class="danger"
                    disabled=move || busy.get()
                    on:click=move |_| on_action.call((ReviewAction::Reject, reject_id.clone()))
                >
                    "Reject"
                </button>
            </div>
        }
        .into_view()
    };

    view! {
        <article class="discharge-card">
            <dl>
                {fields.into_iter().map(|(label, value)| view! {
                    <dt>{label}</dt>
                    <dd>{value}</dd>
                }).collect_view()}
                <dt>"Status"</dt>
                <dd>{status}</dd>
            </dl>

            {errors.map(|errors| view! {
                <ul class="error-message" role="alert">
                    {errors.into_iter().map(|(field, msg)| view! {
                        <li><strong>{field}": "</strong>{msg}</li>
                    }).collect_view()}
                </ul>
            })}

            <h3>"Enrichment Data"</h3>
            {if enrichment.is_empty() {
                view! { <p class="info-message">"No enrichment data available for this discharge."</p> }.into_view()
            } else {
                view! {
                    <table class="enrichment-table">
                        <thead>
                            <tr>
                                <th>"Type"</th>
                                <th>"Value"</th>
                                <th>"Created At"</th>
                                <th>"Updated At"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {enrichment.iter().map(|value| view! {
                                <tr>
                                    <td>{or_na(value.type_name.as_deref())}</td>
                                    <td>{or_na(value.enrichment_value.as_deref())}</td>
                                    <td>{timestamp_or_na(value.created_at.as_deref())}</td>
                                    <td>{timestamp_or_na(value.updated_at.as_deref())}</td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_view()
            }}

            {actions}
        </article>
    }
    .into_view()
}
