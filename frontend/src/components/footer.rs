//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>
                "Discharge Review • Powered by "
                <span class="rust-badge">"🦀 Rust + Leptos"</span>
            </div>
        </footer>
    }
}
