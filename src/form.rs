//! Project entry form.
//!
//! The form is an ordered list of `(label, field id)` pairs. A [`FormBuilder`]
//! walks that list, asks the caller for the raw text of each field, and
//! converts it to a typed [`FormValue`]. The collected [`FormValues`] then turn
//! into a [`CreateProjectInput`] for the core.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::CreateProjectInput;

/// Date format accepted by date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Missing value for '{label}'")]
    MissingField { label: &'static str },

    #[error("Invalid date for '{label}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { label: &'static str, value: String },

    #[error("Invalid number for '{label}': '{value}'")]
    InvalidNumber { label: &'static str, value: String },

    #[error("Field '{label}' does not hold a {expected} value")]
    WrongKind {
        label: &'static str,
        expected: FieldKind,
    },
}

/// Identifier of a single input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    ResponsibleUserId,
    ProjectCode,
    StartDate,
    EstimatedEndDate,
    LeadHours,
    EngineerHours,
    SubcontractingCost,
    Expenses,
    Revenue,
    LeadHourlyRate,
    EngineerHourlyRate,
}

/// How a field's raw text is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Number,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Date => f.write_str("date"),
            Self::Number => f.write_str("number"),
        }
    }
}

impl FieldId {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::ResponsibleUserId | Self::ProjectCode => FieldKind::Text,
            Self::StartDate | Self::EstimatedEndDate => FieldKind::Date,
            _ => FieldKind::Number,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResponsibleUserId => "responsible_user_id",
            Self::ProjectCode => "project_code",
            Self::StartDate => "start_date",
            Self::EstimatedEndDate => "estimated_end_date",
            Self::LeadHours => "lead_hours",
            Self::EngineerHours => "engineer_hours",
            Self::SubcontractingCost => "subcontracting_cost",
            Self::Expenses => "expenses",
            Self::Revenue => "revenue",
            Self::LeadHourlyRate => "lead_hourly_rate",
            Self::EngineerHourlyRate => "engineer_hourly_rate",
        }
    }
}

/// A labelled field in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub id: FieldId,
}

const fn field(label: &'static str, id: FieldId) -> FieldSpec {
    FieldSpec { label, id }
}

/// The project registration form, in prompt order.
pub const PROJECT_FORM: &[FieldSpec] = &[
    field("User ID", FieldId::ResponsibleUserId),
    field("Project Code", FieldId::ProjectCode),
    field("Start Date (YYYY-MM-DD)", FieldId::StartDate),
    field("Estimated End Date (YYYY-MM-DD)", FieldId::EstimatedEndDate),
    field("Lead Hours", FieldId::LeadHours),
    field("Engineer Hours", FieldId::EngineerHours),
    field("Subcontracting Cost", FieldId::SubcontractingCost),
    field("Expenses", FieldId::Expenses),
    field("Revenue", FieldId::Revenue),
    field("Lead Hourly Rate", FieldId::LeadHourlyRate),
    field("Engineer Hourly Rate", FieldId::EngineerHourlyRate),
];

/// A converted field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Date(NaiveDate),
    Number(f64),
}

/// Typed values keyed by field id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: BTreeMap<FieldId, FormValue>,
}

/// Converts raw text for each field of a form into typed values.
#[derive(Debug, Clone, Copy)]
pub struct FormBuilder<'a> {
    fields: &'a [FieldSpec],
}

impl Default for FormBuilder<'static> {
    fn default() -> Self {
        Self::new(PROJECT_FORM)
    }
}

impl<'a> FormBuilder<'a> {
    pub fn new(fields: &'a [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'a [FieldSpec] {
        self.fields
    }

    /// Ask `read` for each field's raw text, in form order, and convert it.
    ///
    /// Stops at the first field that fails to convert.
    pub fn collect<F>(&self, mut read: F) -> Result<FormValues, FormError>
    where
        F: FnMut(&FieldSpec) -> String,
    {
        let mut values = FormValues::default();
        for spec in self.fields {
            let raw = read(spec);
            values.insert(spec.id, parse_field(spec, &raw)?);
        }
        Ok(values)
    }

    /// Like [`collect`](Self::collect), but the reader may fail (e.g. on I/O).
    ///
    /// Every field is read before any conversion error is reported, so an
    /// interactive reader always consumes the whole form. The first field that
    /// fails to convert wins.
    pub fn try_collect<F, E>(&self, mut read: F) -> Result<Result<FormValues, FormError>, E>
    where
        F: FnMut(&FieldSpec) -> Result<String, E>,
    {
        let mut values = FormValues::default();
        let mut first_error = None;
        for spec in self.fields {
            let raw = read(spec)?;
            if first_error.is_some() {
                continue;
            }
            match parse_field(spec, &raw) {
                Ok(value) => values.insert(spec.id, value),
                Err(e) => first_error = Some(e),
            }
        }
        Ok(match first_error {
            Some(e) => Err(e),
            None => Ok(values),
        })
    }
}

/// Convert one field's raw text according to its kind.
///
/// Text fields are kept verbatim; dates and numbers are trimmed first.
pub fn parse_field(spec: &FieldSpec, raw: &str) -> Result<FormValue, FormError> {
    match spec.id.kind() {
        FieldKind::Text => Ok(FormValue::Text(raw.to_string())),
        FieldKind::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(FormValue::Date)
            .map_err(|_| FormError::InvalidDate {
                label: spec.label,
                value: raw.to_string(),
            }),
        FieldKind::Number => raw
            .trim()
            .parse::<f64>()
            .map(FormValue::Number)
            .map_err(|_| FormError::InvalidNumber {
                label: spec.label,
                value: raw.to_string(),
            }),
    }
}

impl FormValues {
    pub fn insert(&mut self, id: FieldId, value: FormValue) {
        self.values.insert(id, value);
    }

    pub fn get(&self, id: FieldId) -> Option<&FormValue> {
        self.values.get(&id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Assemble the construction input from the collected project form values.
    pub fn into_create_input(self) -> Result<CreateProjectInput, FormError> {
        Ok(CreateProjectInput {
            responsible_user_id: self.text(FieldId::ResponsibleUserId)?,
            project_code: self.text(FieldId::ProjectCode)?,
            start_date: self.date(FieldId::StartDate)?,
            estimated_end_date: self.date(FieldId::EstimatedEndDate)?,
            lead_hours: self.number(FieldId::LeadHours)?,
            engineer_hours: self.number(FieldId::EngineerHours)?,
            subcontracting_cost: self.number(FieldId::SubcontractingCost)?,
            expenses: self.number(FieldId::Expenses)?,
            revenue: self.number(FieldId::Revenue)?,
            lead_hourly_rate: self.number(FieldId::LeadHourlyRate)?,
            engineer_hourly_rate: self.number(FieldId::EngineerHourlyRate)?,
            status: None,
            actual_end_date: None,
        })
    }

    fn text(&self, id: FieldId) -> Result<String, FormError> {
        match self.require(id)? {
            FormValue::Text(s) => Ok(s.clone()),
            _ => Err(wrong_kind(id, FieldKind::Text)),
        }
    }

    fn date(&self, id: FieldId) -> Result<NaiveDate, FormError> {
        match self.require(id)? {
            FormValue::Date(d) => Ok(*d),
            _ => Err(wrong_kind(id, FieldKind::Date)),
        }
    }

    fn number(&self, id: FieldId) -> Result<f64, FormError> {
        match self.require(id)? {
            FormValue::Number(n) => Ok(*n),
            _ => Err(wrong_kind(id, FieldKind::Number)),
        }
    }

    fn require(&self, id: FieldId) -> Result<&FormValue, FormError> {
        self.values.get(&id).ok_or(FormError::MissingField {
            label: label_for(id),
        })
    }
}

/// Label of a field in [`PROJECT_FORM`], or its id when the form lacks it.
pub fn label_for(id: FieldId) -> &'static str {
    PROJECT_FORM
        .iter()
        .find(|spec| spec.id == id)
        .map(|spec| spec.label)
        .unwrap_or_else(|| id.as_str())
}

fn wrong_kind(id: FieldId, expected: FieldKind) -> FormError {
    FormError::WrongKind {
        label: label_for(id),
        expected,
    }
}
