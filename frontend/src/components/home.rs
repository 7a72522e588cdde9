//! Landing page

use leptos::*;
use leptos_meta::Title;
use leptos_router::A;

use crate::APP_NAME;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <Title text=APP_NAME/>
        <div class="hero">
            <h1>"Welcome to the PDF Processor App"</h1>
            <p class="subtitle">
                "Navigate to the " <A href="/upload">"Upload PDF"</A>
                " page to start processing PDFs."
            </p>
        </div>
    }
}

/// Fallback for unknown routes.
#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <Title text=format!("{} - Not found", APP_NAME)/>
        <div class="hero">
            <h1>"Page not found"</h1>
            <p class="subtitle">
                "Nothing lives at this address. " <A href="/">"Back to home"</A>
            </p>
        </div>
    }
}
