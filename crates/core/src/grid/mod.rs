//! SimpleTable: a searchable, sortable, paginated HTML grid.
//!
//! A grid is described by a [`GridSpec`]. For each request the caller:
//!
//! 1. opens the stored [`GridState`] for the request's [`StorageSignature`],
//! 2. resolves the order with [`GridSpec::resolve_order`],
//! 3. counts matching rows and builds a [`Pager`] (see [`GridSpec::plan`]),
//! 4. fetches the page and wraps it in a [`GridView`] for rendering,
//! 5. persists the result of [`next_state`] back into the cookie.

pub mod column;
pub mod pager;
pub mod render;
pub mod sort;
pub mod state;

use std::collections::BTreeMap;

pub use column::{ColumnKind, GridColumn};
pub use pager::{PageLink, PageWindow, Pager, DEFAULT_ROWS_PER_PAGE};
pub use render::GridView;
pub use sort::{resolve_order, SortOrder, SortRequest, SortSpec};
pub use state::{GridState, StateCodec, StorageSignature, DEFAULT_SIGNATURE_MAX_AGE_SECS};

use crate::types::DbId;

/// Where an action button points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// No button.
    Disabled,
    /// The grid's own `/<endpoint>/<action>/<table>/<id>` route.
    BuiltIn,
    /// An explicit base URL; the record id is appended as a path segment.
    Url(String),
}

impl ActionTarget {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ActionTarget::Disabled)
    }
}

/// Built-in record actions a grid can route to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAction {
    New,
    Details,
    Edit,
    Delete,
}

impl GridAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridAction::New => "new",
            GridAction::Details => "details",
            GridAction::Edit => "edit",
            GridAction::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(GridAction::New),
            "details" => Some(GridAction::Details),
            "edit" => Some(GridAction::Edit),
            "delete" => Some(GridAction::Delete),
            _ => None,
        }
    }
}

/// Static description of a grid.
#[derive(Debug, Clone)]
pub struct GridSpec {
    /// Path of the list page; links and built-in action routes hang off it.
    pub endpoint: String,
    /// Primary table, used in built-in action routes.
    pub table: &'static str,
    pub columns: Vec<GridColumn>,
    /// Encoded default order (`table.field` / `~table.field`).
    pub default_order: Vec<String>,
    /// Optional heading overrides, by column index.
    pub headings: Vec<&'static str>,
    pub per_page: i64,
    pub show_id: bool,
    pub create: ActionTarget,
    pub details: ActionTarget,
    pub edit: ActionTarget,
    pub delete: ActionTarget,
    pub include_action_button_text: bool,
    pub search_button: Option<String>,
    pub window: PageWindow,
}

impl GridSpec {
    pub fn new(endpoint: impl Into<String>, table: &'static str, columns: Vec<GridColumn>) -> Self {
        Self {
            endpoint: endpoint.into(),
            table,
            columns,
            default_order: Vec::new(),
            headings: Vec::new(),
            per_page: DEFAULT_ROWS_PER_PAGE,
            show_id: false,
            create: ActionTarget::Disabled,
            details: ActionTarget::Disabled,
            edit: ActionTarget::Disabled,
            delete: ActionTarget::Disabled,
            include_action_button_text: false,
            search_button: None,
            window: PageWindow::default(),
        }
    }

    pub fn order_by(mut self, order: &[&str]) -> Self {
        self.default_order = order.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Enable create, details, edit, and delete through the built-in routes.
    pub fn with_builtin_actions(mut self) -> Self {
        self.create = ActionTarget::BuiltIn;
        self.details = ActionTarget::BuiltIn;
        self.edit = ActionTarget::BuiltIn;
        self.delete = ActionTarget::BuiltIn;
        self
    }

    /// Columns shown on the list page, paired with their index in `columns`.
    pub fn visible_columns(&self) -> impl Iterator<Item = (usize, &GridColumn)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_visible(self.show_id))
    }

    /// Resolve the effective order for this grid.
    pub fn resolve_order(&self, request: Option<&SortRequest>, stored: &[String]) -> SortOrder {
        resolve_order(
            &self.columns,
            self.show_id,
            request,
            stored,
            &self.default_order,
        )
    }

    /// Work out order and page for a request before any rows are counted.
    ///
    /// The requested page comes from the query string, falling back to the
    /// stored page. A change of order (a header click) resets to page 1.
    pub fn plan(
        &self,
        stored: &GridState,
        sort: Option<&SortRequest>,
        requested_page: Option<i64>,
    ) -> GridPlan {
        let order = self.resolve_order(sort, &stored.orderby);
        let order_changed = order.encode() != stored.orderby;
        let page = if order_changed {
            1
        } else {
            requested_page.or(stored.page).unwrap_or(1)
        };
        GridPlan { order, page }
    }
}

/// Order and requested page for one grid request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    pub order: SortOrder,
    pub page: i64,
}

impl GridPlan {
    /// Clamp the requested page against the matching row count.
    pub fn paginate(&self, total_rows: i64, per_page: i64) -> Pager {
        Pager::new(total_rows, per_page, self.page)
    }
}

/// One fetched grid row: the record id plus one display value per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub id: DbId,
    pub cells: Vec<Option<String>>,
}

/// Build the next state to persist from the resolved order, page, and filters.
pub fn next_state(order: &SortOrder, pager: &Pager, filters: BTreeMap<String, String>) -> GridState {
    GridState {
        filters,
        orderby: order.encode(),
        page: Some(pager.current_page),
    }
}
