//! Login and registration screens.

use std::fmt::Write;

use roster_core::form::FormErrors;
use roster_core::html::escape;

use super::layout::Page;

fn input(kind: &str, name: &str, label: &str, value: &str, error: Option<&str>) -> String {
    let mut html = format!(
        r#"<div class="field"><label class="label is-uppercase" for="{name}">{label}</label><div class="control"><input class="input" type="{kind}" id="{name}" name="{name}" value="{}"></div>"#,
        escape(value)
    );
    if let Some(error) = error {
        let _ = write!(html, r#"<p class="help is-danger">{}</p>"#, escape(error));
    }
    html.push_str("</div>");
    html
}

fn notification(class: &str, text: Option<&str>) -> String {
    text.map(|t| format!(r#"<div class="notification {class}">{}</div>"#, escape(t)))
        .unwrap_or_default()
}

/// The login form, with an optional error and notice banner.
pub fn login_page(username: &str, error: Option<&str>, notice: Option<&str>) -> Page<'static> {
    let body = format!(
        r#"<div class="columns"><div class="column is-one-third">{}{}<form action="/auth/login" method="POST">{}{}<div class="field is-grouped"><div class="control"><input class="button is-primary" type="submit" value="Log in"></div><div class="control"><a class="button is-text" href="/auth/register">Register</a></div></div></form></div></div>"#,
        notification("is-success is-light", notice),
        notification("is-danger is-light", error),
        input("text", "username", "Username", username, None),
        input("password", "password", "Password", "", None),
    );
    Page::new("Log in", None, body)
}

/// The registration form with per-field errors.
pub fn register_page(username: &str, email: &str, errors: &FormErrors) -> Page<'static> {
    let body = format!(
        r#"<div class="columns"><div class="column is-one-third"><form action="/auth/register" method="POST">{}{}{}{}<div class="field is-grouped"><div class="control"><input class="button is-primary" type="submit" value="Register"></div><div class="control"><a class="button is-text" href="/auth/login">Log in</a></div></div></form></div></div>"#,
        input("text", "username", "Username", username, errors.get("username")),
        input("email", "email", "Email", email, errors.get("email")),
        input("password", "password", "Password", "", errors.get("password")),
        input(
            "password",
            "password_confirm",
            "Confirm Password",
            "",
            errors.get("password_confirm")
        ),
    );
    Page::new("Register", None, body)
}
