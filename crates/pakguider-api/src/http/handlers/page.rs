//! Single-page chat UI.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// GET / - The chat page. All state lives behind the JSON API.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
