use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The transaction IDs of the ledger rows in `html`, top to bottom.
pub(crate) fn ledger_row_ids(html: &Html) -> Vec<String> {
    html.select(&Selector::parse("#ledger tr[data-transaction-id]").unwrap())
        .filter_map(|row| row.value().attr("data-transaction-id"))
        .map(str::to_owned)
        .collect()
}

/// The type of every alert in `html`, e.g. `["success"]`.
pub(crate) fn alert_types(html: &Html) -> Vec<String> {
    html.select(&Selector::parse("[data-alert-type]").unwrap())
        .filter_map(|alert| alert.value().attr("data-alert-type"))
        .map(str::to_owned)
        .collect()
}
