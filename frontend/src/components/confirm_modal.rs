//! Generic blocking confirmation dialog.

use leptos::*;

/// Modal with a message and Confirm/Cancel buttons.
///
/// Renders nothing while `visible` is false. Both buttons are disabled
/// while `busy` is true.
#[component]
pub fn ConfirmModal(
    /// Whether the dialog is shown
    #[prop(into)]
    visible: Signal<bool>,
    /// Message shown above the buttons
    #[prop(into)]
    text: Signal<String>,
    /// A confirmed action is in flight
    #[prop(into)]
    busy: Signal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <Show
            when=move || visible.get()
            fallback=|| view! { }
        >
            <div class="confirm-modal-overlay visible">
                <div class="confirm-modal" role="dialog" aria-modal="true">
                    <p>{move || text.get()}</p>
                    <div class="modal-actions">
                        <button
                            disabled=move || busy.get()
                            on:click=move |_| on_confirm.call(())
                        >
                            {move || if busy.get() { "Working..." } else { "Confirm" }}
                        </button>
                        <button
                            class="outlined"
                            disabled=move || busy.get()
                            on:click=move |_| on_cancel.call(())
                        >
                            "Cancel"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
