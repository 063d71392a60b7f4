//! Authentication: the auth client, the auth cookie and the log-in,
//! registration and log-out pages.

mod client;
mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod register;
mod token;

pub use client::{AuthClient, SqliteAuthClient, create_auth_session_table};
pub(crate) use cookie::{
    DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed, get_token_from_cookies,
    invalidate_auth_cookie, set_auth_cookie,
};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::post_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use register::{get_register_page, register_user};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
