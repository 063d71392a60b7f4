//! The ledger widget: a table of the signed-in user's transactions with a
//! two-step delete.

use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    alert::Alert,
    app::PageState,
    bucket::bucket_summary_oob_view,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BADGE_OUTLINE_STYLE, BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE,
        CREDIT_BADGE_STYLE, DEBIT_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_cents,
    },
    transaction::{Transaction, TransactionType},
};

/// The max number of graphemes to display in the ledger rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const LEDGER_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[month]/[day]");

/// The ledger card for `transactions`, with the row `pending_delete` asking
/// for confirmation.
pub(crate) fn ledger_view(
    transactions: &[Transaction],
    pending_delete: Option<TransactionId>,
) -> Markup {
    html! {
        section id="ledger" class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold" { "All Transactions" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400" { "List of all transactions" }

            div class="relative overflow-x-auto"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class="hidden lg:table-cell px-6 py-3" { "#" }
                            th scope="col" class="px-6 py-3" { "Date" }
                            th scope="col" class="px-6 py-3" { "Amount" }
                            th scope="col" class="px-6 py-3" { "Type" }
                            th scope="col" class="hidden lg:table-cell px-6 py-3" { "Account" }
                            th scope="col" class="hidden lg:table-cell px-6 py-3" { "Bucket" }
                            th scope="col" class="px-6 py-3" { "Description" }
                            th scope="col" class="px-6 py-3" { span class="sr-only" { "Actions" } }
                        }
                    }

                    tbody
                    {
                        @for (index, transaction) in transactions.iter().enumerate() {
                            (ledger_row_view(index + 1, transaction, pending_delete == Some(transaction.id)))
                        }

                        @if transactions.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="8" class="px-6 py-4 text-center" { "No transactions yet." }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The response body for any change to the ledger: the ledger itself, the
/// bucket summary and, if given, an alert.
pub(crate) fn ledger_update_view(state: &PageState, alert: Option<Alert<'_>>) -> Markup {
    html! {
        (ledger_view(state.transactions(), state.pending_delete()))
        (bucket_summary_oob_view(state.transactions()))

        @if let Some(alert) = alert {
            (alert.into_oob_markup())
        }
    }
}

fn ledger_row_view(row_number: usize, transaction: &Transaction, is_pending: bool) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let type_badge_style = match transaction.type_ {
        TransactionType::Credit => CREDIT_BADGE_STYLE,
        TransactionType::Debit => DEBIT_BADGE_STYLE,
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class="hidden lg:table-cell px-6 py-4 font-medium" { (row_number) }
            td class="px-6 py-4 text-center" data-date="true" { (format_date(transaction.date)) }
            td class="px-6 py-4 text-center" { (format_cents(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(type_badge_style) { (transaction.type_) }
            }
            td class="hidden lg:table-cell px-6 py-4"
            {
                span class=(BADGE_OUTLINE_STYLE) { (transaction.account) }
            }
            td class="hidden lg:table-cell px-6 py-4"
            {
                span class=(BADGE_OUTLINE_STYLE) { (transaction.bucket) }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-2"
                {
                    @if is_pending {
                        button
                            type="button"
                            hx-delete=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id))
                            hx-target="#ledger"
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Confirm Delete"
                        }

                        button
                            type="button"
                            hx-post=(endpoints::CANCEL_DELETE)
                            hx-target="#ledger"
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Cancel"
                        }
                    } @else {
                        button
                            type="button"
                            aria-label="Delete"
                            hx-post=(format_endpoint(endpoints::PENDING_DELETE, transaction.id))
                            hx-target="#ledger"
                            hx-swap="outerHTML"
                            hx-target-error="#alert-container"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            (trash_icon())
                        }
                    }
                }
            }
        }
    }
}

fn format_date(date: Option<Date>) -> String {
    date.and_then(|date| date.format(LEDGER_DATE_FORMAT).ok())
        .unwrap_or_default()
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}

fn trash_icon() -> Markup {
    html! {
        svg
            class="w-4 h-4"
            aria-hidden="true"
            xmlns="http://www.w3.org/2000/svg"
            fill="none"
            viewBox="0 0 24 24"
            stroke="currentColor"
            stroke-width="2"
        {
            path
                stroke-linecap="round"
                stroke-linejoin="round"
                d="M3 6h18M8 6V4h8v2m-9 0 1 14h8l1-14" {}
        }
    }
}
