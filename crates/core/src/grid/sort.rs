//! Sort order encoding and resolution.
//!
//! An order is stored between requests as a list of strings: `table.field`
//! for ascending and `~table.field` for descending. Header clicks arrive as a
//! column index in the `sort` query parameter, negated (or paired with
//! `sort_dir=desc`) for descending.

use super::column::GridColumn;

/// Prefix marking a descending entry in the encoded form.
const DESC_PREFIX: char = '~';

/// One ordering term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            descending: false,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            descending: true,
        }
    }

    pub fn encode(&self) -> String {
        if self.descending {
            format!("{DESC_PREFIX}{}", self.key)
        } else {
            self.key.clone()
        }
    }

    pub fn decode(encoded: &str) -> Self {
        let encoded = encoded.trim();
        match encoded.strip_prefix(DESC_PREFIX) {
            Some(key) => Self::desc(key.trim()),
            None => Self::asc(encoded),
        }
    }
}

/// An ordered list of sort terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder(pub Vec<SortSpec>);

impl SortOrder {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortSpec> {
        self.0.iter()
    }

    /// Encoded form persisted in the grid state cookie.
    pub fn encode(&self) -> Vec<String> {
        self.0.iter().map(SortSpec::encode).collect()
    }

    /// Direction of `key` in this order, if it takes part at all.
    pub fn direction_of(&self, key: &str) -> Option<bool> {
        self.0
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.descending)
    }

    /// Keep only the terms whose key satisfies `allowed`.
    pub fn retain_keys(mut self, allowed: impl Fn(&str) -> bool) -> Self {
        self.0.retain(|spec| allowed(&spec.key));
        self
    }
}

/// Ordering requested through the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortRequest {
    /// A header click: sort by the column at `index`.
    Column { index: usize, descending: bool },
    /// An explicit list of encoded terms (`table.field`, `~table.field`).
    Encoded(Vec<String>),
}

impl SortRequest {
    /// Parse the `sort` and `sort_dir` query parameters.
    ///
    /// Returns `None` when no sort was requested.
    pub fn from_query(sort: Option<&str>, sort_dir: Option<&str>) -> Option<Self> {
        let raw = sort?.trim();
        if raw.is_empty() {
            return None;
        }

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        if let Ok(index) = digits.parse::<usize>() {
            let descending = negative || sort_dir.is_some_and(|d| d.eq_ignore_ascii_case("desc"));
            return Some(SortRequest::Column { index, descending });
        }

        Some(SortRequest::Encoded(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

/// Decode a list of encoded terms, dropping any key that is not a grid column.
fn decode_known(columns: &[GridColumn], encoded: &[String]) -> Option<SortOrder> {
    let order = SortOrder(encoded.iter().map(|e| SortSpec::decode(e)).collect())
        .retain_keys(|key| columns.iter().any(|c| c.key == key));
    (!order.is_empty()).then_some(order)
}

/// Resolve the effective order for a grid request.
///
/// Precedence: the query request, then the stored order, then the grid's
/// default, then the first visible column ascending. Terms that do not name
/// a grid column are discarded at every step.
pub fn resolve_order(
    columns: &[GridColumn],
    show_id: bool,
    request: Option<&SortRequest>,
    stored: &[String],
    default: &[String],
) -> SortOrder {
    let requested = match request {
        Some(SortRequest::Column { index, descending }) => columns.get(*index).map(|col| {
            SortOrder(vec![SortSpec {
                key: col.key.to_string(),
                descending: *descending,
            }])
        }),
        Some(SortRequest::Encoded(encoded)) => decode_known(columns, encoded),
        None => None,
    };

    requested
        .or_else(|| decode_known(columns, stored))
        .or_else(|| decode_known(columns, default))
        .or_else(|| {
            columns
                .iter()
                .find(|c| c.is_visible(show_id))
                .map(|c| SortOrder(vec![SortSpec::asc(c.key)]))
        })
        .unwrap_or_default()
}
