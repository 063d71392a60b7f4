//! Defines the endpoint for adding a transaction to the ledger.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use serde::Deserialize;
use time::Date;

use crate::{
    alert::Alert,
    app_state::AppController,
    ledger::ledger_update_view,
    transaction::{NewTransaction, TransactionType, dollars_to_cents},
    user::UserId,
};

/// The form data for adding a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// When the transaction happened. Left blank if unknown.
    #[serde(default)]
    pub date: Option<Date>,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// Whether the money came in or went out.
    pub type_: TransactionType,
    /// The account the money moved through.
    pub account: String,
    /// The bucket to file the transaction under.
    pub bucket: String,
    /// Text detailing the transaction.
    pub description: String,
}

/// A route handler for adding a transaction for the signed-in user.
///
/// Responds with the updated ledger, the bucket summary and a success alert,
/// or with an error alert if the transaction could not be stored.
pub async fn create_transaction_endpoint(
    State(controller): State<AppController>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let amount = match dollars_to_cents(form.amount) {
        Ok(amount) => amount,
        Err(error) => return error.into_alert_response(),
    };

    let page = match controller.page_for(&user_id) {
        Ok(page) => page,
        Err(error) => return error.into_alert_response(),
    };

    let new_transaction = NewTransaction {
        date: form.date,
        amount,
        type_: form.type_,
        account: form.account.trim().to_owned(),
        bucket: form.bucket.trim().to_owned(),
        description: form.description.trim().to_owned(),
        user_id,
    };

    let transaction = match controller.add_transaction(&page, new_transaction).await {
        Ok(transaction) => transaction,
        Err(error) => return error.into_alert_response(),
    };

    let details = format!("Transaction with ID {} has been added.", transaction.id);

    page.read(|state| {
        ledger_update_view(state, Some(Alert::success("Transaction Added", &details)))
    })
    .map(IntoResponse::into_response)
    .unwrap_or_else(|error| error.into_alert_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use axum_extra::extract::Form;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        TransactionType,
        app_state::AppState,
        test_utils::{parse_html_fragment, signed_in_state},
        user::UserId,
    };

    use super::{TransactionForm, create_transaction_endpoint};

    fn form(amount: f64) -> TransactionForm {
        TransactionForm {
            date: Some(date!(2025 - 03 - 14)),
            amount,
            type_: TransactionType::Debit,
            account: "Everyday".to_owned(),
            bucket: " food ".to_owned(),
            description: "groceries".to_owned(),
        }
    }

    async fn submit(state: &AppState, user_id: &UserId, form: TransactionForm) -> Response {
        create_transaction_endpoint(
            State(state.controller.clone()),
            Extension(user_id.clone()),
            Form(form),
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, user_id) = signed_in_state().await;

        let response = submit(&state, &user_id, form(12.3)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let page = state.controller.page_for(&user_id).unwrap();
        let transactions = page.read(|state| state.transactions().to_vec()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 1230);
        assert_eq!(transactions[0].bucket, "food");
        assert_eq!(transactions[0].user_id, user_id);
    }

    #[tokio::test]
    async fn response_has_ledger_buckets_and_alert() {
        let (state, user_id) = signed_in_state().await;

        let response = submit(&state, &user_id, form(5.0)).await;

        let html = parse_html_fragment(response).await;
        let row_count = html
            .select(&Selector::parse("#ledger tr[data-transaction-id]").unwrap())
            .count();
        assert_eq!(row_count, 1);
        let buckets = html
            .select(&Selector::parse("#buckets").unwrap())
            .next()
            .expect("No bucket summary found");
        assert_eq!(buckets.value().attr("hx-swap-oob"), Some("true"));
        assert_eq!(
            html.select(&Selector::parse("[data-alert-type=success]").unwrap())
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn transaction_without_date_is_stored() {
        let (state, user_id) = signed_in_state().await;
        let mut form = form(1.0);
        form.date = None;

        let response = submit(&state, &user_id, form).await;

        assert_eq!(response.status(), StatusCode::OK);
        let page = state.controller.page_for(&user_id).unwrap();
        let dates: Vec<_> = page
            .read(|state| state.transactions().iter().map(|row| row.date).collect())
            .unwrap();
        assert_eq!(dates, vec![None]);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let (state, user_id) = signed_in_state().await;

        let response = submit(&state, &user_id, form(0.0)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let page = state.controller.page_for(&user_id).unwrap();
        assert_eq!(page.read(|state| state.transactions().len()).unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_insert_shows_alert_and_changes_nothing() {
        let (state, _) = signed_in_state().await;
        // Not in the user table, so the insert fails the foreign key check.
        let stranger = UserId::new("stranger");

        let response = submit(&state, &stranger, form(12.3)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            html.select(&Selector::parse("[data-alert-type=error]").unwrap())
                .count(),
            1
        );
        let page = state.controller.page_for(&stranger).unwrap();
        assert_eq!(page.read(|state| state.transactions().len()).unwrap(), 0);
    }
}
