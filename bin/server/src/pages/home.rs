//! Protected page component.

use leptos::prelude::*;

/// The page behind the login; greets the visitor by name.
#[component]
pub fn HomePage(
    /// Display name from the visitor's session.
    name: String,
) -> impl IntoView {
    let greeting = format!("Welcome, {}!", name);

    view! {
        <div class="home-page">
            <h1>{greeting}</h1>
            <p>"You are signed in."</p>
            <a href="/logout" class="logout-button">"Logout"</a>
        </div>
    }
}
