//! Grid column definitions.

use serde::Serialize;

/// How a column's value is rendered in a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
    Decimal,
    Date,
    Boolean,
}

/// A single grid column.
///
/// `key` is the fully qualified `table.field` name. It doubles as the SQL
/// expression used to select and order the column, so it must only ever come
/// from code, never from request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    /// Columns that are not readable are hidden from the list page.
    pub readable: bool,
}

impl GridColumn {
    pub const fn new(key: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self {
            key,
            label,
            kind,
            readable: true,
        }
    }

    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, ColumnKind::Text)
    }

    /// The `id` column of a table. Hidden unless the grid sets `show_id`.
    pub const fn id(key: &'static str) -> Self {
        Self::new(key, "id", ColumnKind::Number)
    }

    pub const fn hidden(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Table (or join alias) part of the key.
    pub fn table(&self) -> &str {
        self.key.split_once('.').map_or("", |(table, _)| table)
    }

    /// Field part of the key.
    pub fn name(&self) -> &str {
        self.key.split_once('.').map_or(self.key, |(_, name)| name)
    }

    pub fn is_id(&self) -> bool {
        self.name() == "id"
    }

    /// Whether the column is shown on the list page.
    pub fn is_visible(&self, show_id: bool) -> bool {
        self.readable && (show_id || !self.is_id())
    }
}
