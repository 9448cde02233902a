//! Public landing page.

use leptos::prelude::*;

/// Public page - offers a single action that starts the OIDC login.
#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <div class="login-page">
            <div class="login-box">
                <h1>"Log in to gatehouse"</h1>
                <p>"Click below to authenticate with your identity provider."</p>
                <a href="/login" class="login-button">"Login"</a>
            </div>
        </div>
    }
}
