//! The page a signed-in user lands on: the add-transaction form, the bucket
//! summary and the ledger.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    app::PageState,
    app_state::AppController,
    bucket::bucket_summary_view,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, dollar_input_styles},
    ledger::ledger_view,
    navigation::NavBar,
    timezone::local_today,
    transaction::add_transaction_form,
    user::UserId,
};

/// The state needed to render the home page.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// Drives the signed-in user's page.
    pub controller: AppController,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            controller: state.controller.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn home_view(state: &PageState, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="grid gap-4 lg:grid-cols-2"
            {
                (add_transaction_form(today))
                (bucket_summary_view(state.transactions()))
            }

            (ledger_view(state.transactions(), state.pending_delete()))
        }
    );

    base("Ledger", &[dollar_input_styles()], &content)
}

/// Display the signed-in user's page.
///
/// The auth guard has already restored the session, so the page state holds
/// the user's transactions.
pub async fn get_home_page(
    State(state): State<HomeState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let page = state.controller.page_for(&user_id)?;
    let snapshot = page.read(PageState::clone)?;

    Ok(home_view(&snapshot, today).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use scraper::Selector;

    use crate::{
        Error, TransactionType,
        test_utils::{assert_valid_html, parse_html_document, signed_in_state},
        transaction::test_utils::new_transaction,
    };

    use super::{HomeState, get_home_page};

    #[tokio::test]
    async fn home_page_shows_form_buckets_and_ledger() {
        let (state, user_id) = signed_in_state().await;
        let page = state.controller.page_for(&user_id).unwrap();
        state
            .controller
            .add_transaction(
                &page,
                new_transaction(500, TransactionType::Credit, "food", &user_id),
            )
            .await
            .unwrap();
        let home_state = HomeState {
            controller: state.controller.clone(),
            local_timezone: state.local_timezone.clone(),
        };

        let response = get_home_page(State(home_state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        for selector in ["#add-transaction form", "#buckets", "#ledger", "#log-out"] {
            assert_eq!(
                document.select(&Selector::parse(selector).unwrap()).count(),
                1,
                "expected one element matching {selector}"
            );
        }
        assert_eq!(
            document
                .select(&Selector::parse("#ledger tr[data-transaction-id]").unwrap())
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let (state, user_id) = signed_in_state().await;
        let home_state = HomeState {
            controller: state.controller.clone(),
            local_timezone: "Middle/Earth".to_owned(),
        };

        let result = get_home_page(State(home_state), Extension(user_id)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidTimezoneError("Middle/Earth".to_owned())
        );
    }
}
