//! Page components and their handlers.
//!
//! Pages are Leptos components rendered to HTML on the server. The public
//! page renders for everyone; the protected page requires [`RequireUser`].

pub mod home;
pub mod login;

pub use home::HomePage;
pub use login::LoginPage;

use axum::response::Html;
use leptos::prelude::*;

use crate::auth::RequireUser;

/// Wraps a page body in the HTML document shell.
fn document(title: &'static str, body: impl IntoView + 'static) -> Html<String> {
    let html = view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{title}</title>
            </head>
            <body>{body}</body>
        </html>
    }
    .to_html();

    Html(html)
}

/// Serves the public page.
pub async fn public_page() -> Html<String> {
    document("gatehouse", view! { <LoginPage/> })
}

/// Serves the protected page; anonymous visitors are redirected by the extractor.
pub async fn protected_page(RequireUser(name): RequireUser) -> Html<String> {
    document("gatehouse", view! { <HomePage name=name/> })
}
