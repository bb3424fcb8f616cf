//! Record forms: field schema, input parsing/validation, and rendering.
//!
//! A [`FormSchema`] describes the editable shape of one table. Fields that
//! are not writable render readonly; fields that are not readable are left
//! out entirely. Neither is ever read from submitted input.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use chrono::NaiveDate;

use crate::html::{escape, heading_text};

/// Message shown for a missing required value.
pub const REQUIRED_MESSAGE: &str = "Enter a value";

/// Choice offered by a reference (select) field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// `NUMERIC(precision, scale)`.
    Decimal { precision: u32, scale: u32 },
    Date,
    Boolean,
    /// A foreign key picked from a list of options.
    Reference(Vec<SelectOption>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub readable: bool,
    pub writable: bool,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            max_length: None,
            readable: true,
            writable: true,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn readonly(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.readable = false;
        self.writable = false;
        self
    }

    fn accepts_input(&self) -> bool {
        self.readable && self.writable
    }
}

/// A parsed, typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Decimal(f64),
    Date(NaiveDate),
    Flag(bool),
    Id(i64),
}

/// Field-name to error-message map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub BTreeMap<String, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }
}

/// Successfully parsed form input. Empty fields are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedForm {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ParsedForm {
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(FieldValue::Text(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn decimal(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FieldValue::Decimal(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.values.get(name) {
            Some(FieldValue::Date(v)) => Some(*v),
            _ => None,
        }
    }

    /// Checkbox value; an unchecked box is `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FieldValue::Flag(true)))
    }

    pub fn id(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Id(v)) => Some(*v),
            _ => None,
        }
    }
}

/// The form shape of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Parse and validate submitted values.
    ///
    /// Every writable, readable field is checked; all problems are collected
    /// before returning.
    pub fn parse(&self, input: &HashMap<String, String>) -> Result<ParsedForm, FormErrors> {
        let mut parsed = ParsedForm::default();
        let mut errors = FormErrors::default();

        for field in self.fields.iter().filter(|f| f.accepts_input()) {
            let raw = input.get(field.name).map(|v| v.trim()).unwrap_or("");

            if let FieldKind::Boolean = field.kind {
                let checked = matches!(raw, "on" | "true" | "1" | "yes");
                parsed.insert(field.name, FieldValue::Flag(checked));
                continue;
            }

            if raw.is_empty() {
                if field.required {
                    errors.add(field.name, REQUIRED_MESSAGE);
                }
                continue;
            }

            match parse_value(field, raw) {
                Ok(value) => parsed.insert(field.name, value),
                Err(message) => errors.add(field.name, message),
            }
        }

        if errors.is_empty() {
            Ok(parsed)
        } else {
            Err(errors)
        }
    }
}

fn parse_value(field: &FormField, raw: &str) -> Result<FieldValue, String> {
    match &field.kind {
        FieldKind::Text => {
            if let Some(max) = field.max_length {
                if raw.chars().count() > max {
                    return Err(format!("Enter from 0 to {max} characters"));
                }
            }
            Ok(FieldValue::Text(raw.to_string()))
        }
        FieldKind::Decimal { precision, scale } => parse_decimal(raw, *precision, *scale),
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|_| "Enter date as YYYY-MM-DD".to_string()),
        FieldKind::Reference(options) => {
            let id: i64 = raw.parse().map_err(|_| "Value not allowed".to_string())?;
            if !options.is_empty() && !options.iter().any(|o| o.value == raw) {
                return Err("Value not allowed".to_string());
            }
            Ok(FieldValue::Id(id))
        }
        FieldKind::Boolean => Ok(FieldValue::Flag(true)),
    }
}

/// Parse a decimal that must fit `NUMERIC(precision, scale)`.
fn parse_decimal(raw: &str, precision: u32, scale: u32) -> Result<FieldValue, String> {
    let invalid = || format!("Enter a number with at most {scale} decimal places");
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }
    if fraction.len() > scale as usize {
        return Err(invalid());
    }
    let whole_digits = whole.trim_start_matches('0').len();
    if whole_digits > precision.saturating_sub(scale) as usize {
        return Err(format!(
            "Enter a number with at most {} digits before the decimal point",
            precision.saturating_sub(scale)
        ));
    }

    raw.parse::<f64>()
        .map(FieldValue::Decimal)
        .map_err(|_| invalid())
}

/// A form ready to render.
#[derive(Debug, Clone)]
pub struct FormView<'a> {
    pub schema: &'a FormSchema,
    /// Raw display values by field name.
    pub values: &'a BTreeMap<String, String>,
    pub errors: &'a FormErrors,
    /// Render every field readonly and omit the submit button.
    pub readonly: bool,
    pub action: String,
}

impl FormView<'_> {
    pub fn render(&self) -> String {
        let mut html = format!(
            r#"<form action="{}" method="POST">"#,
            escape(&self.action)
        );

        for field in self.schema.fields.iter().filter(|f| f.readable) {
            let value = self.values.get(field.name).map(String::as_str).unwrap_or("");
            let readonly = self.readonly || !field.writable;
            let _ = write!(
                html,
                r#"<div class="field"><label class="label is-uppercase" for="{name}">{label}</label><div class="control">"#,
                name = field.name,
                label = escape(&heading_text(field.label)),
            );
            html.push_str(&render_widget(field, value, readonly));
            html.push_str("</div>");
            if let Some(error) = self.errors.get(field.name) {
                let _ = write!(
                    html,
                    r#"<p class="help is-danger">{}</p>"#,
                    escape(error)
                );
            }
            html.push_str("</div>");
        }

        if !self.readonly {
            html.push_str(
                r#"<div class="field"><div class="control"><input class="button is-success" type="submit" value="Submit"></div></div>"#,
            );
        }
        html.push_str("</form>");
        html
    }
}

fn render_widget(field: &FormField, value: &str, readonly: bool) -> String {
    let name = field.name;
    let disabled = if readonly { " disabled" } else { "" };
    match &field.kind {
        FieldKind::Boolean => {
            let checked = if matches!(value, "true" | "t" | "on") {
                " checked"
            } else {
                ""
            };
            format!(r#"<input class="checkbox" type="checkbox" id="{name}" name="{name}"{checked}{disabled}>"#)
        }
        FieldKind::Reference(options) => {
            let mut html = format!(
                r#"<div class="control select"><select id="{name}" name="{name}"{disabled}><option value=""></option>"#
            );
            for option in options {
                let selected = if option.value == value { " selected" } else { "" };
                let _ = write!(
                    html,
                    r#"<option value="{}"{selected}>{}</option>"#,
                    escape(&option.value),
                    escape(&option.label)
                );
            }
            html.push_str("</select></div>");
            html
        }
        FieldKind::Date => format!(
            r#"<input class="input" type="date" id="{name}" name="{name}" value="{}"{disabled}>"#,
            escape(value)
        ),
        FieldKind::Text | FieldKind::Decimal { .. } => {
            let maxlength = field
                .max_length
                .map(|m| format!(r#" maxlength="{m}""#))
                .unwrap_or_default();
            format!(
                r#"<input class="input" type="text" id="{name}" name="{name}" value="{}"{maxlength}{disabled}>"#,
                escape(value)
            )
        }
    }
}
