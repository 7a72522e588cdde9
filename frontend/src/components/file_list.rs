//! Imported files, filtered by upload time.

use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::*;
use leptos_meta::Title;
use leptos_router::use_navigate;

use super::{scoped_tracker, use_api};
use crate::state::{display_local, DateRangeInput, ListingView, LoadState};
use crate::types::ImportedFileSummary;
use crate::APP_NAME;

#[component]
pub fn FileListPage() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();

    let initial = DateRangeInput::last_week();
    let (start, set_start) = create_signal(initial.start.clone());
    let (end, set_end) = create_signal(initial.end.clone());
    let (listing, set_listing) = create_signal(LoadState::<Vec<ImportedFileSummary>>::Loading);
    let (filter_error, set_filter_error) = create_signal(None::<String>);

    let requests = scoped_tracker();

    let fetch = move |input: DateRangeInput| {
        let range = match input.to_range() {
            Ok(range) => range,
            Err(msg) => {
                log::warn!("Rejected date filter: {}", msg);
                set_filter_error.set(Some(msg));
                return;
            }
        };
        set_filter_error.set(None);
        set_listing.set(LoadState::Loading);

        let api = api.clone();
        let ticket = requests.begin();
        spawn_local(async move {
            let result = api.imported_files(&range).await;
            if let Some(result) = ticket.accept(result) {
                if let Ok(files) = &result {
                    log::info!("📂 {} imported files in range", files.len());
                }
                set_listing.set(LoadState::from_result(result, "Failed to fetch raw data."));
            }
        });
    };

    fetch(initial);

    let on_filter = {
        let fetch = fetch.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            fetch(DateRangeInput {
                start: start.get_untracked(),
                end: end.get_untracked(),
            });
        }
    };

    let on_clear = move |_: MouseEvent| {
        let defaults = DateRangeInput::last_week();
        set_start.set(defaults.start.clone());
        set_end.set(defaults.end.clone());
        fetch(defaults);
    };

    view! {
        <Title text=format!("{} - Imported Files", APP_NAME)/>
        <section class="file-list">
            <h1>"Imported Files"</h1>
            <form class="filters" on:submit=on_filter>
                <label for="startDate">"Start:"</label>
                <input
                    type="datetime-local"
                    id="startDate"
                    prop:value=move || start.get()
                    on:input=move |ev| set_start.set(event_target_value(&ev))
                />
                <label for="endDate">"End:"</label>
                <input
                    type="datetime-local"
                    id="endDate"
                    prop:value=move || end.get()
                    on:input=move |ev| set_end.set(event_target_value(&ev))
                />
                <button type="submit">"Filter"</button>
                <button type="button" class="outlined" on:click=on_clear>"Clear Filters"</button>
            </form>

            {move || filter_error.get().map(|msg| view! {
                <p class="error-message" role="alert">{msg}</p>
            })}

            {move || match listing.with(ListingView::from_state) {
                ListingView::Loading => view! { <div class="spinner" aria-label="Loading"></div> }.into_view(),
                ListingView::Error(msg) => view! { <p class="error-message" role="alert">{msg}</p> }.into_view(),
                ListingView::NoFiles => view! { <p class="info-message">{ListingView::NO_FILES_MESSAGE}</p> }.into_view(),
                ListingView::Table(files) => {
                    let navigate = navigate.clone();
                    view! {
                        <table class="file-table">
                            <thead>
                                <tr>
                                    <th>"File Name"</th>
                                    <th>"Created At"</th>
                                    <th>"Import Type"</th>
                                    <th>"Status"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {files.into_iter().map(|file| {
                                    let navigate = navigate.clone();
                                    let target = format!("/review/{}", file.raw_data_id);
                                    view! {
                                        <tr>
                                            <td>{file.source_file_name}</td>
                                            <td>{display_local(&file.created_at)}</td>
                                            <td>{file.type_name}</td>
                                            <td>{file.status}</td>
                                            <td>
                                                <button on:click=move |_| navigate(&target, Default::default())>
                                                    "Review"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view()
                }
            }}
        </section>
    }
}
