//! The shared HTML shell: Bulma styling, Font Awesome icons, navigation.

use axum::response::Html;
use roster_core::html::escape;

const BULMA_CSS: &str = "https://cdn.jsdelivr.net/npm/bulma@0.9.4/css/bulma.min.css";
const FONT_AWESOME_JS: &str = "https://use.fontawesome.com/releases/v5.15.4/js/all.js";
const JQUERY_JS: &str = "https://code.jquery.com/jquery-3.7.1.min.js";
const DATATABLES_CSS: &str = "https://cdn.datatables.net/1.13.8/css/jquery.dataTables.min.css";
const DATATABLES_JS: &str = "https://cdn.datatables.net/1.13.8/js/jquery.dataTables.min.js";

/// Navigation entries: `(path, label)`.
const NAV_LINKS: &[(&str, &str)] = &[
    ("/index", "Zip Codes"),
    ("/companies", "Companies"),
    ("/departments", "Departments"),
    ("/employees", "Employees"),
    ("/contractors", "Contractors"),
    ("/datatables", "DataTables"),
];

/// A full HTML page.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub title: &'a str,
    /// Logged-in username; `None` hides the navigation.
    pub user: Option<&'a str>,
    pub body: String,
    /// Load jQuery and the datatables.net assets.
    pub datatables: bool,
}

impl<'a> Page<'a> {
    pub fn new(title: &'a str, user: Option<&'a str>, body: String) -> Self {
        Self {
            title,
            user,
            body,
            datatables: false,
        }
    }

    pub fn with_datatables(mut self) -> Self {
        self.datatables = true;
        self
    }

    pub fn render(&self) -> String {
        let mut head = format!(
            r#"<meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{}</title><link rel="stylesheet" href="{BULMA_CSS}"><script defer src="{FONT_AWESOME_JS}"></script>"#,
            escape(self.title)
        );
        if self.datatables {
            head.push_str(&format!(
                r#"<link rel="stylesheet" href="{DATATABLES_CSS}"><script src="{JQUERY_JS}"></script><script src="{DATATABLES_JS}"></script>"#
            ));
        }

        format!(
            r#"<!DOCTYPE html><html lang="en"><head>{head}</head><body>{nav}<section class="section"><div class="container"><h1 class="title">{title}</h1>{body}</div></section></body></html>"#,
            nav = self.nav(),
            title = escape(self.title),
            body = self.body,
        )
    }

    fn nav(&self) -> String {
        let Some(user) = self.user else {
            return String::new();
        };
        let links: String = NAV_LINKS
            .iter()
            .map(|(path, label)| {
                let active = if *label == self.title { " is-active" } else { "" };
                format!(r#"<a class="navbar-item{active}" href="{path}">{label}</a>"#)
            })
            .collect();
        format!(
            r#"<nav class="navbar is-dark" role="navigation"><div class="navbar-menu is-active"><div class="navbar-start">{links}</div><div class="navbar-end"><span class="navbar-item">{}</span><a class="navbar-item" href="/auth/logout">Log out</a></div></div></nav>"#,
            escape(user)
        )
    }
}

impl From<Page<'_>> for Html<String> {
    fn from(page: Page<'_>) -> Self {
        Html(page.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_page_has_no_navigation() {
        let html = Page::new("Log in", None, "<p>x</p>".into()).render();
        assert!(!html.contains("navbar"));
        assert!(html.contains("<title>Log in</title>"));
        assert!(!html.contains("jquery"));
    }

    #[test]
    fn navigation_marks_current_page_and_escapes_user() {
        let html = Page::new("Companies", Some("<pat>"), String::new()).render();
        assert!(html.contains(r#"<a class="navbar-item is-active" href="/companies">"#));
        assert!(html.contains("&lt;pat&gt;"));
    }

    #[test]
    fn datatables_assets_are_opt_in() {
        let html = Page::new("DataTables", Some("pat"), String::new())
            .with_datatables()
            .render();
        assert!(html.contains(JQUERY_JS));
        assert!(html.contains(DATATABLES_JS));
    }
}
