//! Edit screen for one discharge record and its enrichment values.

use leptos::ev::SubmitEvent;
use leptos::*;
use leptos_meta::Title;
use leptos_router::use_params_map;

use super::{alert, go_back, scoped_tracker, use_api};
use crate::config::{ENRICHMENT_PLACEHOLDER, MAX_ENRICHMENT_TEXT_LEN};
use crate::services::ApiClient;
use crate::state::{EditorForm, LoadPhase, LoadState};
use crate::types::{AppResult, DischargeField, EnrichmentKind, EnrichmentType};
use crate::validation::enrichment_error_key;
use crate::APP_NAME;

/// Catalog first, then the record, then the merge.
async fn load_form(api: &ApiClient, temp_discharge_id: &str) -> AppResult<EditorForm> {
    let catalog = api.enrichment_types().await?;
    log::info!("📋 Loaded {} enrichment types", catalog.len());
    let detail = api.discharge(temp_discharge_id).await?;
    Ok(EditorForm::merge(catalog, detail))
}

#[component]
pub fn EditPage() -> impl IntoView {
    let api = use_api();
    let params = use_params_map();
    let record_id = move || params.with(|p| p.get("temp_discharge_id").cloned().unwrap_or_default());

    let (form, set_form) = create_signal(LoadState::<EditorForm>::Loading);
    let (saving, set_saving) = create_signal(false);

    let load_requests = scoped_tracker();
    let save_requests = scoped_tracker();

    {
        let api = api.clone();
        create_effect(move |_| {
            let id = record_id();
            set_form.set(LoadState::Loading);
            let api = api.clone();
            let ticket = load_requests.begin();
            spawn_local(async move {
                let result = load_form(&api, &id).await;
                if let Some(result) = ticket.accept(result) {
                    set_form.set(LoadState::from_result(result, "Failed to fetch data."));
                }
            });
        });
    }

    // Typing changes the form, not the phase, so inputs are not rebuilt
    let phase = create_memo(move |_| form.with(LoadState::phase));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }

        let mut checked = None;
        set_form.update(|state| {
            checked = state.ready_mut().map(|f| f.validate().then(|| f.payload()));
        });
        let payload = match checked {
            None => return,
            Some(None) => {
                alert("Please correct the errors in the form.");
                return;
            }
            Some(Some(payload)) => payload,
        };

        let id = params.with_untracked(|p| p.get("temp_discharge_id").cloned().unwrap_or_default());
        let api = api.clone();
        let ticket = save_requests.begin();
        set_saving.set(true);
        spawn_local(async move {
            let result = api.update_discharge(&id, &payload).await;
            let Some(result) = ticket.accept(result) else {
                return;
            };
            set_saving.set(false);
            match result {
                Ok(()) => {
                    log::info!("✅ Record {} updated", id);
                    alert("Record updated successfully!");
                    go_back();
                }
                Err(e) => {
                    log::error!("❌ Error updating record {}: {}", id, e);
                    alert("Failed to update record.");
                }
            }
        });
    };

    view! {
        <Title text=format!("{} - Edit Record", APP_NAME)/>
        <section class="edit">
            <h1>"Edit Discharge Record"</h1>
            {move || match phase.get() {
                LoadPhase::Loading => view! { <div class="spinner" aria-label="Loading"></div> }.into_view(),
                LoadPhase::Failed(msg) => view! { <p class="error-message" role="alert">{msg}</p> }.into_view(),
                LoadPhase::Ready => {
                    let catalog: Vec<EnrichmentType> = form.with_untracked(|state| {
                        state
                            .ready()
                            .map(|f| f.enrichment_rows().map(|(t, _)| t.clone()).collect())
                            .unwrap_or_default()
                    });
                    view! {
                        <form on:submit=on_submit.clone()>
                            {DischargeField::EDITABLE
                                .into_iter()
                                .map(|field| view! { <FieldInput field=field form=form set_form=set_form/> })
                                .collect_view()}

                            <h2>"Enrichment Data"</h2>
                            {catalog
                                .into_iter()
                                .map(|etype| view! { <EnrichmentInput etype=etype form=form set_form=set_form/> })
                                .collect_view()}

                            <div class="form-actions">
                                <button type="submit" disabled=move || saving.get()>
                                    {move || if saving.get() { "Saving..." } else { "Save" }}
                                </button>
                                <button type="button" class="outlined" on:click=move |_| go_back()>
                                    "Cancel"
                                </button>
                            </div>
                        </form>
                    }
                    .into_view()
                }
            }}
        </section>
    }
}

#[component]
fn FieldInput(
    field: DischargeField,
    form: ReadSignal<LoadState<EditorForm>>,
    set_form: WriteSignal<LoadState<EditorForm>>,
) -> impl IntoView {
    let key = field.key();
    let value = move || {
        form.with(|state| state.ready().map(|f| f.record().field(field).to_string()).unwrap_or_default())
    };
    let error = move || form.with(|state| state.ready().and_then(|f| f.error(key).map(str::to_string)));

    view! {
        <div class="form-group">
            <label for=key>{format!("{}:", field.label())}</label>
            <input
                type="text"
                id=key
                name=key
                required=field.is_required()
                aria-invalid=move || error().is_some().to_string()
                prop:value=value
                on:input=move |ev| {
                    let input = event_target_value(&ev);
                    set_form.update(|state| {
                        if let Some(f) = state.ready_mut() {
                            f.set_field(field, input);
                        }
                    });
                }
            />
            {move || error().map(|msg| view! { <p class="error-message">{msg}</p> })}
        </div>
    }
}

#[component]
fn EnrichmentInput(
    etype: EnrichmentType,
    form: ReadSignal<LoadState<EditorForm>>,
    set_form: WriteSignal<LoadState<EditorForm>>,
) -> impl IntoView {
    let type_id = store_value(etype.enrichment_type_id.clone());
    let input_id = format!("enrichment-{}", etype.enrichment_type_id);
    let error_key = enrichment_error_key(&etype.enrichment_type_id);

    let value = move || {
        form.with(|state| {
            state
                .ready()
                .map(|f| type_id.with_value(|id| f.enrichment_value(id).to_string()))
                .unwrap_or_default()
        })
    };
    let error = move || {
        form.with(|state| state.ready().and_then(|f| f.error(&error_key).map(str::to_string)))
    };
    let on_change = move |ev: ev::Event| {
        let input = event_target_value(&ev);
        set_form.update(|state| {
            if let Some(f) = state.ready_mut() {
                type_id.with_value(|id| f.set_enrichment(id, input));
            }
        });
    };

    let control = match etype.kind() {
        EnrichmentKind::Boolean => view! {
            <select
                id=input_id.clone()
                prop:value=move || {
                    let current = value();
                    if current.is_empty() { ENRICHMENT_PLACEHOLDER.to_string() } else { current }
                }
                on:change=on_change
            >
                <option value=ENRICHMENT_PLACEHOLDER>{ENRICHMENT_PLACEHOLDER}</option>
                <option value="true">"Yes"</option>
                <option value="false">"No"</option>
            </select>
        }
        .into_view(),
        EnrichmentKind::Text => view! {
            <input
                type="text"
                id=input_id.clone()
                maxlength=MAX_ENRICHMENT_TEXT_LEN
                prop:value=value
                on:input=on_change
            />
        }
        .into_view(),
    };

    view! {
        <div class="form-group">
            <label for=input_id title=etype.description.clone()>{format!("{}:", etype.type_name)}</label>
            {control}
            {(!etype.description.is_empty()).then(|| view! { <small>{etype.description.clone()}</small> })}
            {move || error().map(|msg| view! { <p class="error-message">{msg}</p> })}
        </div>
    }
}
