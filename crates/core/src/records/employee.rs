//! Employee directory records.

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::draft::{Draft, DraftError, DraftInput, DraftSchema, Editable, FieldKind, FieldSpec, NumericPolicy, DATE_FORMAT};
use crate::record::{Record, Searchable};
use crate::types::{Email, EmployeeId, EmploymentStatus};

/// An employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: Email,
    pub department: String,
    #[serde(default)]
    pub position: String,
    pub status: EmploymentStatus,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    /// Annual salary.
    #[serde(default)]
    pub salary: Decimal,
}

impl Record for Employee {
    type Id = EmployeeId;

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Searchable for Employee {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.department.as_str()),
            Cow::Borrowed(self.position.as_str()),
            Cow::Owned(self.id.to_string()),
        ]
    }

    fn status_value(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn category_value(&self) -> Option<&str> {
        Some(&self.department)
    }
}

static EMPLOYEE_SCHEMA: DraftSchema = DraftSchema {
    entity: "employee",
    fields: &[
        FieldSpec::text("name", "Full Name").required(),
        FieldSpec::text("email", "Email").required(),
        FieldSpec::text("department", "Department").required(),
        FieldSpec::text("position", "Position"),
        FieldSpec::text("status", "Status").default_value("active"),
        FieldSpec::of("hire_date", "Hire Date", FieldKind::Date),
        FieldSpec::of("salary", "Salary", FieldKind::Decimal),
    ],
};

/// Body of employee create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    pub email: Email,
    pub department: String,
    pub position: String,
    pub status: EmploymentStatus,
    pub hire_date: Option<NaiveDate>,
    pub salary: Decimal,
}

impl DraftInput for EmployeeInput {
    fn schema() -> &'static DraftSchema {
        &EMPLOYEE_SCHEMA
    }

    fn from_draft(draft: &Draft, policy: NumericPolicy) -> Result<Self, DraftError> {
        Ok(Self {
            name: draft.text("name"),
            email: draft.parsed("email")?,
            department: draft.text("department"),
            position: draft.text("position"),
            status: draft.parsed("status")?,
            hire_date: draft.date("hire_date", policy)?,
            salary: draft.decimal("salary", policy)?,
        })
    }
}

impl Editable for Employee {
    type Input = EmployeeInput;

    fn to_draft(&self) -> Draft {
        Draft::with_values(
            &EMPLOYEE_SCHEMA,
            [
                ("name", self.name.clone()),
                ("email", self.email.to_string()),
                ("department", self.department.clone()),
                ("position", self.position.clone()),
                ("status", self.status.as_str().to_owned()),
                (
                    "hire_date",
                    self.hire_date
                        .map(|d| d.format(DATE_FORMAT).to_string())
                        .unwrap_or_default(),
                ),
                ("salary", self.salary.to_string()),
            ],
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_draft_parses_email_and_status() {
        let mut draft = Draft::for_input::<EmployeeInput>();
        draft.set("name", "Ana Ortiz").unwrap();
        draft.set("email", " ana@example.com ").unwrap();
        draft.set("department", "Finance").unwrap();
        draft.set("status", "On_Leave").unwrap();
        draft.set("salary", "72000").unwrap();

        let input: EmployeeInput = draft.to_input(NumericPolicy::Strict).unwrap();
        assert_eq!(input.email.as_str(), "ana@example.com");
        assert_eq!(input.status, EmploymentStatus::OnLeave);
        assert_eq!(input.salary, Decimal::new(72000, 0));
        assert_eq!(input.hire_date, None);
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut draft = Draft::for_input::<EmployeeInput>();
        draft.set("name", "Ana").unwrap();
        draft.set("email", "ana-at-example").unwrap();
        draft.set("department", "Finance").unwrap();
        assert!(matches!(
            draft.to_input::<EmployeeInput>(NumericPolicy::ZeroOnInvalid),
            Err(DraftError::InvalidValue { field: "email", .. })
        ));
    }

    #[test]
    fn test_search_includes_id() {
        let employee = Employee {
            id: EmployeeId::new(1042),
            name: "Ana Ortiz".to_owned(),
            email: Email::parse("ana@example.com").unwrap(),
            department: "Finance".to_owned(),
            position: "Analyst".to_owned(),
            status: EmploymentStatus::Active,
            hire_date: None,
            salary: Decimal::ZERO,
        };
        assert!(crate::filter::Filter::new("1042", "all", "all").matches(&employee));
        assert!(crate::filter::Filter::new("analyst", "active", "Finance").matches(&employee));
    }
}
