use maud::{Markup, html};
use time::Date;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::TransactionType,
};

fn text_input(name: &str, label: &str, placeholder: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="text"
                placeholder=(placeholder)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn type_radio(type_: TransactionType, label: &str, is_checked: bool) -> Markup {
    let id = format!("transaction-type-{type_}");

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type_"
                id=(id)
                type="radio"
                value=(type_)
                checked[is_checked]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

/// The add-transaction widget. The date defaults to `today`.
///
/// A successful submit swaps in the updated ledger and clears the form.
pub fn add_transaction_form(today: Date) -> Markup {
    html! {
        section id="add-transaction" class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { "Add Transaction" }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target="#ledger"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                hx-indicator="#add-transaction-indicator"
                data-reset-on-success="true"
                class="space-y-4"
            {
                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        value=(today)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="amount"
                            id="amount"
                            type="number"
                            step="0.01"
                            min="0.01"
                            placeholder="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                fieldset class="space-y-2"
                {
                    legend class=(FORM_LABEL_STYLE) { "Type" }

                    div class=(FORM_RADIO_GROUP_STYLE)
                    {
                        (type_radio(TransactionType::Debit, "Debit", true))
                        (type_radio(TransactionType::Credit, "Credit", false))
                    }
                }

                (text_input("account", "Account", "Everyday"))
                (text_input("bucket", "Bucket", "Groceries"))
                (text_input("description", "Description", "What was it for?"))

                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="add-transaction-indicator"
                    {
                        (loading_spinner())
                    }
                    "Add"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form,
        },
    };

    use super::add_transaction_form;

    #[test]
    fn form_posts_to_transactions_api() {
        let html =
            Html::parse_fragment(&add_transaction_form(date!(2025 - 03 - 14)).into_string());

        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "account", "text");
        assert_form_input(&form, "bucket", "text");
        assert_form_input(&form, "description", "text");
        assert_form_submit_button(&form);
    }

    #[test]
    fn date_defaults_to_today() {
        let html =
            Html::parse_fragment(&add_transaction_form(date!(2025 - 03 - 14)).into_string());

        let date_input = html
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .expect("No date input");
        assert_eq!(date_input.value().attr("value"), Some("2025-03-14"));
    }

    #[test]
    fn debit_is_checked_by_default() {
        let html =
            Html::parse_fragment(&add_transaction_form(date!(2025 - 03 - 14)).into_string());

        let checked: Vec<_> = html
            .select(&Selector::parse("input[name=type_][checked]").unwrap())
            .filter_map(|input| input.value().attr("value"))
            .collect();
        assert_eq!(checked, vec!["debit"]);
    }
}
