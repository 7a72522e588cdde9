//! Navigation bar shown on every route.

use leptos::*;
use leptos_router::A;

#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <header>
            <nav>
                <ul>
                    <li><A href="/">"Home"</A></li>
                    <li><A href="/upload">"Upload PDF"</A></li>
                    <li><A href="/review-list">"Review"</A></li>
                </ul>
            </nav>
        </header>
    }
}
