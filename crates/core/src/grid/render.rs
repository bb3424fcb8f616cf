//! HTML rendering of a loaded grid page.

use std::fmt::Write;

use chrono::NaiveDate;

use super::column::{ColumnKind, GridColumn};
use super::pager::{PageLink, Pager};
use super::sort::SortOrder;
use super::state::StorageSignature;
use super::{ActionTarget, GridAction, GridRow, GridSpec};
use crate::html::{escape, heading_text, icon_button, url_with_query};
use crate::search::SearchForm;
use crate::types::DbId;

/// Display format for date cells.
const DATE_DISPLAY_FORMAT: &str = "%m/%d/%Y";

const CONFIRM_SCRIPT: &str = r#"<script type="text/javascript">
document.querySelectorAll('.confirmation').forEach(function (el) {
    el.addEventListener('click', function (event) {
        if (!confirm(el.getAttribute('data-message') + ' - Are you sure?')) {
            event.preventDefault();
        }
    });
});
</script>"#;

/// One page of a grid, ready to render.
#[derive(Debug, Clone)]
pub struct GridView<'a> {
    pub spec: &'a GridSpec,
    pub rows: Vec<GridRow>,
    pub pager: Pager,
    pub order: SortOrder,
    pub signature: StorageSignature,
    pub search: Option<SearchForm>,
}

impl GridView<'_> {
    /// URL for an action button, or `None` when the action is disabled.
    ///
    /// Delete links do not carry the page; the grid recomputes it after the
    /// row count changes.
    pub fn action_url(&self, action: GridAction, id: DbId) -> Option<String> {
        let target = match action {
            GridAction::New => &self.spec.create,
            GridAction::Details => &self.spec.details,
            GridAction::Edit => &self.spec.edit,
            GridAction::Delete => &self.spec.delete,
        };
        let base = match target {
            ActionTarget::Disabled => return None,
            ActionTarget::BuiltIn => format!(
                "{}/{}/{}/{id}",
                self.spec.endpoint.trim_end_matches('/'),
                action.as_str(),
                self.spec.table
            ),
            ActionTarget::Url(url) => format!("{}/{id}", url.trim_end_matches('/')),
        };

        let mut params = vec![("user_signature", self.signature.to_string())];
        if action != GridAction::Delete {
            params.push(("page", self.pager.current_page.to_string()));
        }
        Some(url_with_query(&base, &params))
    }

    fn heading(&self, index: usize, column: &GridColumn) -> String {
        let label = self.spec.headings.get(index).copied().unwrap_or(column.label);
        heading_text(label)
    }

    fn has_row_actions(&self) -> bool {
        self.spec.details.is_enabled() || self.spec.edit.is_enabled() || self.spec.delete.is_enabled()
    }

    /// Table header with sort links.
    ///
    /// A column sorted ascending links to its negated index so the next click
    /// sorts descending; a descending or unsorted column links to its index.
    pub fn render_header(&self) -> String {
        let mut html = String::from("<thead><tr>");
        for (index, column) in self.spec.visible_columns() {
            let direction = self.order.direction_of(column.key);
            let (sort, icon) = match direction {
                Some(false) => (format!("-{index}"), Some("fa-sort-up")),
                Some(true) => (index.to_string(), Some("fa-sort-down")),
                None => (index.to_string(), None),
            };
            let url = url_with_query(
                &self.spec.endpoint,
                &[("sort", sort), ("user_signature", self.signature.to_string())],
            );
            let _ = write!(
                html,
                r#"<th><a href="{}">{}"#,
                escape(&url),
                escape(&self.heading(index, column))
            );
            if let Some(icon) = icon {
                let _ = write!(
                    html,
                    r#"<span class="is-pulled-right"><i class="fas {icon}"></i></span>"#
                );
            }
            html.push_str("</a></th>");
        }
        if self.has_row_actions() {
            html.push_str(
                r#"<th style="text-align: center; width: 1px; white-space: nowrap;">ACTIONS</th>"#,
            );
        }
        html.push_str("</tr></thead>");
        html
    }

    /// Render one cell according to its column kind.
    pub fn render_cell(kind: ColumnKind, value: Option<&str>) -> String {
        let value = value.filter(|v| !v.is_empty());
        match kind {
            ColumnKind::Date => {
                let text = value
                    .map(|v| match NaiveDate::parse_from_str(v, "%Y-%m-%d") {
                        Ok(date) => date.format(DATE_DISPLAY_FORMAT).to_string(),
                        Err(_) => v.to_string(),
                    })
                    .unwrap_or_default();
                format!(r#"<td class="has-text-centered">{}</td>"#, escape(&text))
            }
            ColumnKind::Boolean => match value {
                Some("true" | "t") => r#"<td class="has-text-centered"><span class="icon is-small"><i class="fas fa-check-circle"></i></span></td>"#.to_string(),
                _ => "<td>&nbsp;</td>".to_string(),
            },
            ColumnKind::Text | ColumnKind::Number | ColumnKind::Decimal => {
                format!("<td>{}</td>", escape(value.unwrap_or_default()))
            }
        }
    }

    fn render_row_actions(&self, id: DbId) -> String {
        let text = self.spec.include_action_button_text;
        let mut html = String::from(
            r#"<td class="center" style="text-align: center; white-space: nowrap;">"#,
        );
        if let Some(url) = self.action_url(GridAction::Details, id) {
            html.push_str(&icon_button(&url, "Details", "fa-id-card", "small", text));
        }
        if let Some(url) = self.action_url(GridAction::Edit, id) {
            html.push_str(&icon_button(&url, "Edit", "fa-edit", "small", text));
        }
        if let Some(url) = self.action_url(GridAction::Delete, id) {
            let label = if text { "<span>Delete</span>" } else { "" };
            let _ = write!(
                html,
                r#"<a href="{}" class="button is-small confirmation" title="Delete" data-message="Delete record"><span class="icon is-small"><i class="fas fa-trash"></i></span>{label}</a>"#,
                escape(&url)
            );
        }
        html.push_str("</td>");
        html
    }

    pub fn render_body(&self) -> String {
        let mut html = String::from("<tbody>");
        for row in &self.rows {
            html.push_str("<tr>");
            for (index, column) in self.spec.visible_columns() {
                let value = row.cells.get(index).and_then(|c| c.as_deref());
                html.push_str(&Self::render_cell(column.kind, value));
            }
            if self.has_row_actions() {
                html.push_str(&self.render_row_actions(row.id));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody>");
        html
    }

    pub fn render_pager(&self) -> String {
        let mut html = String::from(r#"<div class="is-pulled-right">"#);
        for link in self.pager.pages(&self.spec.window) {
            match link {
                PageLink::Page(page) => {
                    let url = url_with_query(
                        &self.spec.endpoint,
                        &[
                            ("page", page.to_string()),
                            ("user_signature", self.signature.to_string()),
                        ],
                    );
                    let class = if page == self.pager.current_page {
                        "button is-primary is-small"
                    } else {
                        "button is-small"
                    };
                    let _ = write!(html, r#"<a href="{}" class="{class}">{page}</a>"#, escape(&url));
                }
                PageLink::Gap => html.push_str("..."),
            }
        }
        html.push_str("</div>");
        html
    }

    /// Render the complete grid: toolbar, table, row counter, and pager.
    pub fn render(&self) -> String {
        let mut html = String::from(r#"<div class="field"><div style="padding-bottom: 1rem;">"#);

        if self.spec.create.is_enabled() {
            let url = match &self.spec.create {
                ActionTarget::Url(url) => url_with_query(
                    url,
                    &[("user_signature", self.signature.to_string())],
                ),
                _ => self.action_url(GridAction::New, 0).unwrap_or_default(),
            };
            html.push_str(&icon_button(
                &url,
                "New",
                "fa-plus",
                "normal",
                self.spec.include_action_button_text,
            ));
        }
        if let Some(search) = &self.search {
            html.push_str(&search.render(self.spec.search_button.as_deref()));
        }
        html.push_str("</div>");

        html.push_str(r#"<table class="table is-bordered is-striped is-hoverable is-fullwidth">"#);
        html.push_str(&self.render_header());
        html.push_str(&self.render_body());
        html.push_str("</table>");

        let _ = write!(
            html,
            r#"<div class="is-pulled-left"><p>{}</p></div>"#,
            self.pager.summary()
        );

        if self.pager.has_multiple_pages() {
            html.push_str(&self.render_pager());
        }
        if self.spec.delete.is_enabled() {
            html.push_str(CONFIRM_SCRIPT);
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::sort::SortSpec;

    fn spec() -> GridSpec {
        GridSpec::new(
            "/employees",
            "employees",
            vec![
                GridColumn::id("employees.id"),
                GridColumn::text("employees.last_name", "Last Name"),
                GridColumn::new("employees.hired_on", "Hired", ColumnKind::Date),
                GridColumn::new("employees.active", "Active", ColumnKind::Boolean),
            ],
        )
        .per_page(2)
        .with_builtin_actions()
    }

    fn signature() -> StorageSignature {
        StorageSignature::from_query(Some("6f1c2b0e-3a59-4c1e-9b9a-2d4f1f0c8a11"))
    }

    fn view(spec: &GridSpec, order: SortOrder, pager: Pager) -> GridView<'_> {
        GridView {
            spec,
            rows: vec![
                GridRow {
                    id: 11,
                    cells: vec![
                        Some("11".into()),
                        Some("<Smith>".into()),
                        Some("2021-03-04".into()),
                        Some("true".into()),
                    ],
                },
                GridRow {
                    id: 12,
                    cells: vec![Some("12".into()), None, None, Some("false".into())],
                },
            ],
            pager,
            order,
            signature: signature(),
            search: None,
        }
    }

    #[test]
    fn ascending_column_links_to_descending() {
        let spec = spec();
        let v = view(
            &spec,
            SortOrder(vec![SortSpec::asc("employees.last_name")]),
            Pager::new(2, 2, 1),
        );
        let header = v.render_header();
        assert!(header.contains("sort=-1&amp;user_signature="));
        assert!(header.contains("fa-sort-up"));
        assert!(header.contains("sort=2&amp;"), "unsorted column links ascending");
    }

    #[test]
    fn descending_column_links_to_ascending() {
        let spec = spec();
        let v = view(
            &spec,
            SortOrder(vec![SortSpec::desc("employees.last_name")]),
            Pager::new(2, 2, 1),
        );
        let header = v.render_header();
        assert!(header.contains("sort=1&amp;"));
        assert!(header.contains("fa-sort-down"));
        assert!(!header.contains("sort=-1"));
    }

    #[test]
    fn header_hides_id_and_adds_actions() {
        let spec = spec();
        let header = view(&spec, SortOrder::default(), Pager::new(2, 2, 1)).render_header();
        assert!(!header.contains(">ID<"));
        assert!(header.contains("LAST NAME"));
        assert!(header.contains("ACTIONS"));
    }

    #[test]
    fn cells_render_by_kind() {
        assert_eq!(
            GridView::render_cell(ColumnKind::Date, Some("2021-03-04")),
            r#"<td class="has-text-centered">03/04/2021</td>"#
        );
        assert!(GridView::render_cell(ColumnKind::Boolean, Some("true")).contains("fa-check-circle"));
        assert_eq!(
            GridView::render_cell(ColumnKind::Boolean, Some("false")),
            "<td>&nbsp;</td>"
        );
        assert_eq!(GridView::render_cell(ColumnKind::Text, None), "<td></td>");
        assert_eq!(
            GridView::render_cell(ColumnKind::Text, Some("<b>")),
            "<td>&lt;b&gt;</td>"
        );
    }

    #[test]
    fn builtin_action_urls_carry_signature_and_page() {
        let spec = spec();
        let v = view(&spec, SortOrder::default(), Pager::new(6, 2, 2));
        assert_eq!(
            v.action_url(GridAction::Edit, 11).unwrap(),
            "/employees/edit/employees/11?user_signature=6f1c2b0e-3a59-4c1e-9b9a-2d4f1f0c8a11&page=2"
        );
        assert_eq!(
            v.action_url(GridAction::Delete, 11).unwrap(),
            "/employees/delete/employees/11?user_signature=6f1c2b0e-3a59-4c1e-9b9a-2d4f1f0c8a11"
        );
    }

    #[test]
    fn explicit_action_url_appends_id() {
        let mut spec = spec();
        spec.edit = ActionTarget::Url("/zip_code".into());
        spec.details = ActionTarget::Disabled;
        let v = view(&spec, SortOrder::default(), Pager::new(2, 2, 1));
        assert!(v
            .action_url(GridAction::Edit, 5)
            .unwrap()
            .starts_with("/zip_code/5?user_signature="));
        assert_eq!(v.action_url(GridAction::Details, 5), None);
    }

    #[test]
    fn pager_only_rendered_with_multiple_pages() {
        let spec = spec();
        let single = view(&spec, SortOrder::default(), Pager::new(2, 2, 1)).render();
        assert!(!single.contains("is-primary is-small"));
        assert!(single.contains("Displaying rows 1 thru 2 of 2"));

        let multi = view(&spec, SortOrder::default(), Pager::new(6, 2, 2)).render();
        assert!(multi.contains(r#"class="button is-primary is-small">2</a>"#));
        assert!(multi.contains("Displaying rows 3 thru 4 of 6"));
    }

    #[test]
    fn render_escapes_cell_text_and_includes_confirm_script() {
        let spec = spec();
        let html = view(&spec, SortOrder::default(), Pager::new(2, 2, 1)).render();
        assert!(html.contains("&lt;Smith&gt;"));
        assert!(!html.contains("<Smith>"));
        assert!(html.contains("confirmation"));
        assert!(html.contains("/employees/new/employees/0?user_signature="));
    }
}
