#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod state;

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_submit_button,
    assert_form_submit_button_with_text, assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{
    alert_types, assert_valid_html, ledger_row_ids, parse_html_document, parse_html_fragment,
};
pub(crate) use http::assert_content_type;
pub(crate) use state::{TEST_EMAIL, TEST_PASSWORD, sign_up, signed_in_state, test_state};
