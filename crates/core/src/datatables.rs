//! Server-side processing for datatables.net grids.
//!
//! The browser library sends its state as flattened query keys such as
//! `columns[2][search][value]` and `order[0][dir]`. [`DataTablesRequest`]
//! reassembles them; [`DataTablesResponse`] is the JSON it expects back.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::grid::{GridColumn, GridRow, SortOrder, SortSpec, DEFAULT_ROWS_PER_PAGE};
use crate::html::{escape, icon_button};
use crate::search::GridFilter;

/// Placeholder in edit/delete URLs replaced client side with the row id.
pub const RECORD_ID_PLACEHOLDER: &str = "record_id";

fn indexed_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(columns|order)\[(\d+)\]\[([^\]]+)\](?:\[([^\]]+)\])?$")
            .expect("static regex is valid")
    })
}

/// One `order[i]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTablesOrder {
    pub column: Option<usize>,
    pub descending: bool,
}

/// A decoded datatables.net ajax request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTablesRequest {
    pub draw: i64,
    pub start: i64,
    /// Rows requested; `None` means all rows (`length=-1`).
    pub length: Option<i64>,
    pub search_value: Option<String>,
    pub search_regex: Option<String>,
    /// Column attributes by column index. Nested keys are joined with `_`,
    /// so `columns[0][search][value]` lands under `search_value`.
    pub columns: BTreeMap<usize, BTreeMap<String, String>>,
    /// Order entries by their position in the request.
    pub order: BTreeMap<usize, DataTablesOrder>,
}

impl Default for DataTablesRequest {
    fn default() -> Self {
        Self {
            draw: 0,
            start: 0,
            length: Some(DEFAULT_ROWS_PER_PAGE),
            search_value: None,
            search_regex: None,
            columns: BTreeMap::new(),
            order: BTreeMap::new(),
        }
    }
}

impl DataTablesRequest {
    /// Decode query pairs. Unknown keys and unparsable numbers are ignored.
    pub fn parse<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = Self::default();

        for (key, value) in pairs {
            match key {
                "draw" => request.draw = value.parse().unwrap_or(0),
                "start" => request.start = value.parse::<i64>().unwrap_or(0).max(0),
                "length" => {
                    request.length = match value.parse::<i64>() {
                        Ok(n) if n < 0 => None,
                        Ok(n) => Some(n.max(1)),
                        Err(_) => Some(DEFAULT_ROWS_PER_PAGE),
                    }
                }
                "search[value]" => request.search_value = Some(value.to_string()),
                "search[regex]" => request.search_regex = Some(value.to_string()),
                _ => request.parse_indexed(key, value),
            }
        }

        request
    }

    fn parse_indexed(&mut self, key: &str, value: &str) {
        let Some(caps) = indexed_key().captures(key) else {
            return;
        };
        let Ok(index) = caps[2].parse::<usize>() else {
            return;
        };
        let attribute = match caps.get(4) {
            Some(sub) => format!("{}_{}", &caps[3], sub.as_str()),
            None => caps[3].to_string(),
        };

        if &caps[1] == "columns" {
            self.columns
                .entry(index)
                .or_default()
                .insert(attribute, value.to_string());
            return;
        }

        let entry = self.order.entry(index).or_default();
        match attribute.as_str() {
            "column" => entry.column = value.parse().ok(),
            "dir" => entry.descending = value.eq_ignore_ascii_case("desc"),
            _ => {}
        }
    }

    /// The `name` attribute of a requested column.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns
            .get(&index)
            .and_then(|attrs| attrs.get("name"))
            .map(String::as_str)
    }

    /// Build a sort order from the request, keeping only known columns.
    ///
    /// Requested names are matched against the field part of each column
    /// key; anything else is dropped.
    pub fn sort_order(&self, columns: &[GridColumn]) -> SortOrder {
        let specs = self
            .order
            .values()
            .filter_map(|entry| {
                let name = self.column_name(entry.column?)?;
                let column = columns.iter().find(|c| c.name() == name && c.readable)?;
                Some(if entry.descending {
                    SortSpec::desc(column.key)
                } else {
                    SortSpec::asc(column.key)
                })
            })
            .collect();
        SortOrder(specs)
    }

    /// Global search as a case-insensitive contains filter over `columns`.
    pub fn filter(&self, columns: &[&'static str]) -> Option<GridFilter> {
        self.search_value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| GridFilter::contains(columns, v))
    }
}

/// A column shown in a datatables.net grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTablesField {
    pub name: String,
    pub label: String,
    pub visible: bool,
}

impl DataTablesField {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let label = name.to_uppercase().replace('_', " ");
        Self {
            name,
            label,
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Page-side description of a datatables.net grid.
#[derive(Debug, Clone)]
pub struct DataTablesView {
    pub fields: Vec<DataTablesField>,
    pub data_url: String,
    /// Edit/delete URLs containing [`RECORD_ID_PLACEHOLDER`].
    pub edit_url: Option<String>,
    pub delete_url: Option<String>,
    pub create_url: Option<String>,
    pub page_length: i64,
    /// `(field index, ascending?)` pairs for the initial order.
    pub sort_sequence: Vec<(usize, bool)>,
}

impl DataTablesView {
    pub fn new(fields: Vec<DataTablesField>, data_url: impl Into<String>) -> Self {
        Self {
            fields,
            data_url: data_url.into(),
            edit_url: None,
            delete_url: None,
            create_url: None,
            page_length: DEFAULT_ROWS_PER_PAGE,
            sort_sequence: Vec::new(),
        }
    }

    /// Table skeleton plus the optional New button.
    pub fn table(&self) -> String {
        let mut html = String::from("<div>");
        if let Some(url) = self.create_url.as_deref().filter(|u| !u.is_empty()) {
            let _ = write!(
                html,
                r#"<a class="button" href="{}" style="margin-bottom: 1rem;"><span class="icon is-small"><i class="fas fa-plus"></i></span><span>New</span></a>"#,
                escape(url)
            );
        }
        html.push_str(
            r#"<table id="datatables_table" class="compact stripe hover cell-border order-column" style="padding-top: 1rem;"><thead><tr>"#,
        );
        for field in &self.fields {
            let _ = write!(
                html,
                r#"<th class="datatables-header">{}</th>"#,
                escape(&field.label)
            );
        }
        html.push_str(
            r#"<th class="datatables-header has-text-centered" style="color: black; width: 1px; white-space: nowrap;">ACTIONS</th></tr></thead><tbody></tbody></table></div>"#,
        );
        html
    }

    /// Initialisation script for the table rendered by [`DataTablesView::table`].
    pub fn script(&self) -> String {
        let columns: Vec<Value> = self
            .fields
            .iter()
            .map(|f| serde_json::json!({ "data": f.name, "name": f.name, "visible": f.visible }))
            .collect();
        let hidden_targets: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.visible)
            .map(|(i, _)| i)
            .collect();
        let order: Vec<Value> = self
            .sort_sequence
            .iter()
            .map(|(index, ascending)| serde_json::json!([index, if *ascending { "asc" } else { "desc" }]))
            .collect();

        let edit = icon_button(
            self.edit_url.as_deref().unwrap_or("#"),
            "",
            "fa-edit",
            "small",
            false,
        );
        let delete = icon_button(
            self.delete_url.as_deref().unwrap_or("#"),
            "",
            "fa-trash",
            "small",
            false,
        );

        format!(
            r#"<script type="text/javascript">
$(document).ready(function() {{
    var editLink = {edit};
    var deleteLink = {delete};
    var columns = {columns};
    columns.push({{
        data: null,
        orderable: false,
        render: function (data, type, row) {{
            return editLink.replace("{placeholder}", row.DT_RowId) + "&nbsp;" +
                deleteLink.replace("{placeholder}", row.DT_RowId);
        }}
    }});
    $('#datatables_table').DataTable({{
        dom: "lfrtip",
        processing: true,
        serverSide: true,
        lengthMenu: [[10, 15, 20, -1], [10, 15, 20, 'All']],
        pageLength: {page_length},
        pagingType: "numbers",
        ajax: {data_url},
        columns: columns,
        columnDefs: [
            {{ visible: false, targets: {hidden} }},
            {{ className: "has-text-centered", targets: {actions} }}
        ],
        order: {order},
        stateSave: true,
        select: true
    }});
    $(".dataTables_filter input").focus().select();
}});
</script>"#,
            edit = Value::from(edit),
            delete = Value::from(delete),
            columns = Value::from(columns),
            placeholder = RECORD_ID_PLACEHOLDER,
            page_length = self.page_length,
            data_url = Value::from(self.data_url.as_str()),
            hidden = Value::from(hidden_targets),
            actions = self.fields.len(),
            order = Value::from(order),
        )
    }
}

/// JSON body answering a [`DataTablesRequest`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DataTablesResponse {
    pub draw: i64,
    #[serde(rename = "recordsTotal")]
    pub records_total: i64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: i64,
    pub data: Vec<Map<String, Value>>,
}

impl DataTablesResponse {
    /// Convert fetched grid rows into keyed objects named after each
    /// column's field, each carrying `DT_RowId`.
    pub fn from_rows(
        draw: i64,
        records_total: i64,
        records_filtered: i64,
        columns: &[GridColumn],
        rows: Vec<GridRow>,
    ) -> Self {
        let data = rows
            .into_iter()
            .map(|row| {
                let mut object = Map::new();
                object.insert("DT_RowId".to_string(), Value::from(row.id));
                for (column, cell) in columns.iter().zip(row.cells) {
                    object.insert(
                        column.name().to_string(),
                        cell.map(Value::from).unwrap_or(Value::Null),
                    );
                }
                object
            })
            .collect();

        Self {
            draw,
            records_total,
            records_filtered,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn columns() -> Vec<GridColumn> {
        vec![
            GridColumn::id("zip_codes.id"),
            GridColumn::text("zip_codes.zip_code", "Zip Code"),
            GridColumn::text("zip_codes.state", "State"),
        ]
    }

    fn sample_request() -> DataTablesRequest {
        DataTablesRequest::parse([
            ("draw", "3"),
            ("start", "30"),
            ("length", "15"),
            ("search[value]", "fort"),
            ("search[regex]", "false"),
            ("columns[0][data]", "zip_code"),
            ("columns[0][name]", "zip_code"),
            ("columns[0][search][value]", ""),
            ("columns[1][name]", "state"),
            ("order[0][column]", "1"),
            ("order[0][dir]", "desc"),
            ("order[1][column]", "0"),
            ("order[1][dir]", "asc"),
        ])
    }

    #[test]
    fn parses_scalars() {
        let request = sample_request();
        assert_eq!(request.draw, 3);
        assert_eq!(request.start, 30);
        assert_eq!(request.length, Some(15));
        assert_eq!(request.search_value.as_deref(), Some("fort"));
        assert_eq!(request.search_regex.as_deref(), Some("false"));
    }

    #[test]
    fn nested_column_attributes_are_joined() {
        let request = sample_request();
        let first = &request.columns[&0];
        assert_eq!(first.get("data").map(String::as_str), Some("zip_code"));
        assert_eq!(first.get("search_value").map(String::as_str), Some(""));
        assert_eq!(request.column_name(1), Some("state"));
    }

    #[test]
    fn length_minus_one_means_all() {
        let request = DataTablesRequest::parse([("length", "-1")]);
        assert_eq!(request.length, None);
    }

    #[test]
    fn defaults_when_missing() {
        let request = DataTablesRequest::parse([("start", "abc")]);
        assert_eq!(request, DataTablesRequest::default());
    }

    #[test]
    fn sort_order_follows_request_positions() {
        let order = sample_request().sort_order(&columns());
        assert_eq!(
            order.encode(),
            vec!["~zip_codes.state".to_string(), "zip_codes.zip_code".to_string()]
        );
    }

    #[test]
    fn unknown_sort_columns_are_dropped() {
        let request = DataTablesRequest::parse([
            ("columns[0][name]", "password_hash"),
            ("order[0][column]", "0"),
            ("order[1][column]", "7"),
        ]);
        assert!(request.sort_order(&columns()).is_empty());
    }

    #[test]
    fn blank_search_has_no_filter() {
        let request = DataTablesRequest::parse([("search[value]", "  ")]);
        assert_eq!(request.filter(&["zip_codes.state"]), None);
        assert_matches!(
            sample_request().filter(&["zip_codes.state"]),
            Some(GridFilter::Contains { value, .. }) if value == "fort"
        );
    }

    #[test]
    fn field_label_defaults_from_name() {
        assert_eq!(DataTablesField::new("primary_city").label, "PRIMARY CITY");
        assert_eq!(DataTablesField::new("zip_code").label, "ZIP CODE");
    }

    #[test]
    fn table_has_headers_and_actions() {
        let mut view = DataTablesView::new(
            vec![DataTablesField::new("zip_code"), DataTablesField::new("id").hidden()],
            "/datatables_data",
        );
        view.create_url = Some("/zip_code/0".into());
        let html = view.table();
        assert!(html.contains(r#"href="/zip_code/0""#));
        assert!(html.contains(">ZIP CODE</th>"));
        assert!(html.contains(">ACTIONS</th>"));
    }

    #[test]
    fn script_lists_columns_and_order() {
        let mut view = DataTablesView::new(
            vec![DataTablesField::new("zip_code"), DataTablesField::new("id").hidden()],
            "/datatables_data",
        );
        view.sort_sequence = vec![(0, true)];
        view.edit_url = Some("/zip_code/record_id".into());
        let script = view.script();
        assert!(script.contains(r#""data":"zip_code""#));
        assert!(script.contains("targets: [1]"));
        assert!(script.contains(r#"order: [[0,"asc"]]"#));
        assert!(script.contains(r#"ajax: "/datatables_data""#));
        assert!(script.contains("/zip_code/record_id"));
    }

    #[test]
    fn response_serializes_datatables_names() {
        let response = DataTablesResponse::from_rows(
            3,
            100,
            2,
            &columns(),
            vec![GridRow {
                id: 7,
                cells: vec![Some("7".into()), Some("46201".into()), None],
            }],
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recordsTotal"], 100);
        assert_eq!(json["recordsFiltered"], 2);
        assert_eq!(json["data"][0]["DT_RowId"], 7);
        assert_eq!(json["data"][0]["zip_code"], "46201");
        assert!(json["data"][0]["state"].is_null());
    }
}
