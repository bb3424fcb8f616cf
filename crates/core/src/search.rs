//! Grid search forms and the filters they produce.
//!
//! Two flavours are supported:
//!
//! - a single free-text `search` box whose value is matched with "contains"
//!   against several columns ([`SearchForm::single`]), and
//! - [`GridSearch`], a set of labelled fields named `sq_<label>` that each
//!   contribute one filter. Filters are combined with AND. A value a field
//!   cannot use is reported next to its input and contributes no filter.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use crate::grid::GridState;
use crate::html::escape;

/// Prefix for [`GridSearch`] field names.
pub const SEARCH_FIELD_PREFIX: &str = "sq_";

/// Default text of the search form's submit button.
pub const DEFAULT_SEARCH_BUTTON: &str = "Filter";

/// Maximum accepted length of a search value.
pub const MAX_SEARCH_LENGTH: usize = 50;

/// Value compared by an equality filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Id(i64),
    Flag(bool),
}

/// Error for a reference search value that is not a number.
pub const NOT_AN_INTEGER: &str = "Enter an integer";

/// Error for a reference id that none of the options carry.
pub const NOT_AN_OPTION: &str = "Value not in database";

/// Error for a yes/no search value other than `true` or `false`.
pub const NOT_ALLOWED: &str = "Value not allowed";

/// A WHERE-clause term. Column names come from code, values from users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridFilter {
    /// Case-insensitive substring match against any of `columns`.
    Contains {
        columns: Vec<&'static str>,
        value: String,
    },
    Equals {
        column: &'static str,
        value: FilterValue,
    },
}

impl GridFilter {
    pub fn contains(columns: &[&'static str], value: impl Into<String>) -> Self {
        GridFilter::Contains {
            columns: columns.to_vec(),
            value: value.into(),
        }
    }
}

/// Choice offered by a select-style search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOption {
    pub value: String,
    pub label: String,
}

/// How a [`GridSearch`] field turns its value into a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMatch {
    Contains(Vec<&'static str>),
    /// Exact match on a reference id, picked from `options`.
    EqualsId {
        column: &'static str,
        options: Vec<SearchOption>,
    },
    /// Yes/no select over a boolean column.
    EqualsFlag(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchField {
    pub label: &'static str,
    pub matcher: SearchMatch,
}

impl SearchField {
    pub fn contains(label: &'static str, columns: &[&'static str]) -> Self {
        Self {
            label,
            matcher: SearchMatch::Contains(columns.to_vec()),
        }
    }

    pub fn equals_id(label: &'static str, column: &'static str, options: Vec<SearchOption>) -> Self {
        Self {
            label,
            matcher: SearchMatch::EqualsId { column, options },
        }
    }

    pub fn flag(label: &'static str, column: &'static str) -> Self {
        Self {
            label,
            matcher: SearchMatch::EqualsFlag(column),
        }
    }

    /// Form field name: `sq_` plus the snake-cased label.
    pub fn name(&self) -> String {
        format!(
            "{SEARCH_FIELD_PREFIX}{}",
            self.label.replace(' ', "_").to_lowercase()
        )
    }

    /// Title-cased label (`"company name"` -> `"Company Name"`).
    pub fn title(&self) -> String {
        self.label
            .split(' ')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sentence-cased placeholder (`"company name"` -> `"Company name"`).
    pub fn placeholder(&self) -> String {
        let lower = self.label.to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Choices rendered as a select; `None` for a text input.
    fn options(&self) -> Option<Vec<SearchOption>> {
        match &self.matcher {
            SearchMatch::Contains(_) => None,
            SearchMatch::EqualsId { options, .. } => Some(options.clone()),
            SearchMatch::EqualsFlag(_) => Some(vec![
                SearchOption {
                    value: "true".into(),
                    label: "Yes".into(),
                },
                SearchOption {
                    value: "false".into(),
                    label: "No".into(),
                },
            ]),
        }
    }

    /// Turn a non-empty value into a filter, or the message shown beside
    /// the input.
    fn check(&self, value: &str) -> Result<GridFilter, &'static str> {
        let (column, value) = match &self.matcher {
            SearchMatch::Contains(columns) => {
                return Ok(GridFilter::Contains {
                    columns: columns.clone(),
                    value: value.to_string(),
                })
            }
            SearchMatch::EqualsId { column, options } => {
                let id: i64 = value.parse().map_err(|_| NOT_AN_INTEGER)?;
                let id_text = id.to_string();
                if !options.iter().any(|option| option.value == id_text) {
                    return Err(NOT_AN_OPTION);
                }
                (*column, FilterValue::Id(id))
            }
            SearchMatch::EqualsFlag(column) => match value {
                "true" => (*column, FilterValue::Flag(true)),
                "false" => (*column, FilterValue::Flag(false)),
                _ => return Err(NOT_ALLOWED),
            },
        };
        Ok(GridFilter::Equals { column, value })
    }
}

/// Filters from the usable search values, errors keyed by field name for
/// the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub filters: Vec<GridFilter>,
    pub errors: BTreeMap<String, String>,
}

/// A multi-field search form.
#[derive(Debug, Clone, Default)]
pub struct GridSearch {
    pub fields: Vec<SearchField>,
}

impl GridSearch {
    pub fn new(fields: Vec<SearchField>) -> Self {
        Self { fields }
    }

    /// Collect current values for every field.
    ///
    /// A submitted form wins over the query string, which wins over the
    /// stored grid state. Values are trimmed and truncated to
    /// [`MAX_SEARCH_LENGTH`] characters.
    pub fn values(
        &self,
        query: &HashMap<String, String>,
        submitted: Option<&HashMap<String, String>>,
        stored: &GridState,
    ) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        for field in &self.fields {
            let name = field.name();
            let value = submitted
                .and_then(|form| form.get(&name).cloned())
                .or_else(|| query.get(&name).cloned())
                .or_else(|| stored.filter(&name).map(str::to_string));
            if let Some(value) = value {
                values.insert(name, clean_value(&value));
            }
        }
        values
    }

    /// Check every non-empty value. Empty values neither filter nor fail.
    pub fn evaluate(&self, values: &BTreeMap<String, String>) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        for field in &self.fields {
            let name = field.name();
            let Some(value) = values.get(&name).filter(|v| !v.is_empty()) else {
                continue;
            };
            match field.check(value) {
                Ok(filter) => outcome.filters.push(filter),
                Err(message) => {
                    outcome.errors.insert(name, message.to_string());
                }
            }
        }
        outcome
    }

    /// Render-ready form with the current values and their errors.
    pub fn form(
        &self,
        values: &BTreeMap<String, String>,
        errors: BTreeMap<String, String>,
        action: impl Into<String>,
    ) -> SearchForm {
        SearchForm {
            action: action.into(),
            inputs: self
                .fields
                .iter()
                .map(|field| {
                    let name = field.name();
                    SearchInput {
                        value: values.get(&name).cloned().unwrap_or_default(),
                        name,
                        label: field.title(),
                        placeholder: field.placeholder(),
                        options: field.options(),
                    }
                })
                .collect(),
            errors,
        }
    }
}

/// Trim a user-supplied search value and cap its length.
pub fn clean_value(value: &str) -> String {
    value.trim().chars().take(MAX_SEARCH_LENGTH).collect()
}

/// One rendered search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub value: String,
    /// Present for select inputs.
    pub options: Option<Vec<SearchOption>>,
}

/// A search form rendered above a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    /// URL the form posts to (carries the storage signature).
    pub action: String,
    pub inputs: Vec<SearchInput>,
    pub errors: BTreeMap<String, String>,
}

impl SearchForm {
    /// The single free-text `search` box.
    pub fn single(value: Option<&str>, action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            inputs: vec![SearchInput {
                name: "search".to_string(),
                label: "Search".to_string(),
                placeholder: "Search".to_string(),
                value: value.unwrap_or_default().to_string(),
                options: None,
            }],
            errors: BTreeMap::new(),
        }
    }

    pub fn render(&self, button: Option<&str>) -> String {
        let mut html = String::from(
            r#"<div class="is-pulled-right" style="padding-bottom: 1rem;">"#,
        );
        let _ = write!(
            html,
            r#"<form action="{}" method="POST"><table><tr>"#,
            escape(&self.action)
        );

        for input in &self.inputs {
            html.push_str(r#"<td style="padding-right: .5rem;">"#);
            match &input.options {
                Some(options) => {
                    let _ = write!(
                        html,
                        r#"<div class="select"><select name="{}" title="{}"><option value="">{}</option>"#,
                        escape(&input.name),
                        escape(&input.placeholder),
                        escape(&input.label)
                    );
                    for option in options {
                        let selected = if option.value == input.value {
                            " selected"
                        } else {
                            ""
                        };
                        let _ = write!(
                            html,
                            r#"<option value="{}"{selected}>{}</option>"#,
                            escape(&option.value),
                            escape(&option.label)
                        );
                    }
                    html.push_str("</select></div>");
                }
                None => {
                    let _ = write!(
                        html,
                        r#"<input class="input" type="text" name="{}" value="{}" placeholder="{}" title="{}" maxlength="{MAX_SEARCH_LENGTH}">"#,
                        escape(&input.name),
                        escape(&input.value),
                        escape(&input.placeholder),
                        escape(&input.placeholder)
                    );
                }
            }
            if let Some(error) = self.errors.get(&input.name) {
                let _ = write!(html, r#"<div style="color:#ff0000">{}</div>"#, escape(error));
            }
            html.push_str("</td>");
        }

        let _ = write!(
            html,
            r#"<td><input class="button" type="submit" value="{}"></td></tr></table></form></div>"#,
            escape(button.unwrap_or(DEFAULT_SEARCH_BUTTON))
        );
        html
    }
}
