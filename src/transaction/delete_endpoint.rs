//! The endpoints behind the ledger's two-step delete.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    alert::Alert,
    app::Page,
    app_state::AppController,
    database_id::TransactionId,
    ledger::{ledger_update_view, ledger_view},
    user::UserId,
};

fn render_ledger(page: &Page) -> Response {
    page.read(|state| ledger_view(state.transactions(), state.pending_delete()))
        .map(IntoResponse::into_response)
        .unwrap_or_else(|error| error.into_alert_response())
}

/// A route handler that asks for confirmation before deleting the ledger row
/// `transaction_id`. Any other pending row goes back to normal.
pub async fn pending_delete_endpoint(
    State(controller): State<AppController>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let page = match controller.page_for(&user_id) {
        Ok(page) => page,
        Err(error) => return error.into_alert_response(),
    };

    match controller.request_delete(&page, transaction_id) {
        Ok(true) => render_ledger(&page),
        Ok(false) => Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// A route handler that puts the pending ledger row back to normal.
pub async fn cancel_delete_endpoint(
    State(controller): State<AppController>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    let page = match controller.page_for(&user_id) {
        Ok(page) => page,
        Err(error) => return error.into_alert_response(),
    };

    match controller.cancel_delete(&page) {
        Ok(()) => render_ledger(&page),
        Err(error) => error.into_alert_response(),
    }
}

/// A route handler for deleting a transaction, responds with the updated
/// ledger and bucket summary and an alert saying how it went.
///
/// A failed delete is not retried. The row stays in the ledger and the status
/// is still 200 OK so that htmx swaps the ledger back to normal.
pub async fn delete_transaction_endpoint(
    State(controller): State<AppController>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let page = match controller.page_for(&user_id) {
        Ok(page) => page,
        Err(error) => return error.into_alert_response(),
    };

    let details;
    let alert = match controller.confirm_delete(&page, transaction_id).await {
        Ok(()) => {
            details = format!("Transaction with ID {transaction_id} has been deleted.");
            Alert::success("Deletion Successful", &details)
        }
        Err(error @ (Error::NotSignedIn | Error::PageLockError)) => {
            return error.into_alert_response();
        }
        Err(error) => {
            details = format!("Failed to delete transaction with ID {transaction_id}. {error}");
            Alert::error("Deletion Failed", &details)
        }
    };

    page.read(|state| ledger_update_view(state, Some(alert)))
        .map(IntoResponse::into_response)
        .unwrap_or_else(|error| error.into_alert_response())
}
