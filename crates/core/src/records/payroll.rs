//! Payroll entries.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::draft::{Draft, DraftError, DraftInput, DraftSchema, Editable, FieldKind, FieldSpec, NumericPolicy};
use crate::record::{Record, Searchable};
use crate::types::{PayrollEntryId, PayrollStatus};

/// One employee's pay for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub id: PayrollEntryId,
    pub employee_name: String,
    pub department: String,
    /// Pay period label, e.g. `2024-03`.
    pub period: String,
    pub base_salary: Decimal,
    #[serde(default)]
    pub bonus: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    /// Computed by the backend.
    pub net_pay: Decimal,
    pub status: PayrollStatus,
}

impl PayrollEntry {
    /// Base salary plus bonus.
    #[must_use]
    pub fn gross_pay(&self) -> Decimal {
        self.base_salary.saturating_add(self.bonus)
    }
}

impl Record for PayrollEntry {
    type Id = PayrollEntryId;

    fn id(&self) -> PayrollEntryId {
        self.id
    }

    fn label(&self) -> &str {
        &self.employee_name
    }
}

impl Searchable for PayrollEntry {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.employee_name.as_str()),
            Cow::Borrowed(self.department.as_str()),
            Cow::Borrowed(self.period.as_str()),
        ]
    }

    fn status_value(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn category_value(&self) -> Option<&str> {
        Some(&self.department)
    }
}

static PAYROLL_SCHEMA: DraftSchema = DraftSchema {
    entity: "payroll entry",
    fields: &[
        FieldSpec::text("employee_name", "Employee").required(),
        FieldSpec::text("department", "Department").required(),
        FieldSpec::text("period", "Pay Period").required(),
        FieldSpec::of("base_salary", "Base Salary", FieldKind::Decimal).required(),
        FieldSpec::of("bonus", "Bonus", FieldKind::Decimal),
        FieldSpec::of("deductions", "Deductions", FieldKind::Decimal),
        FieldSpec::text("status", "Status").default_value("pending"),
    ],
};

/// Body of payroll create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    pub employee_name: String,
    pub department: String,
    pub period: String,
    pub base_salary: Decimal,
    pub bonus: Decimal,
    pub deductions: Decimal,
    pub status: PayrollStatus,
}

impl PayrollInput {
    /// Net pay the backend is expected to compute for this input.
    #[must_use]
    pub fn expected_net_pay(&self) -> Decimal {
        self.base_salary
            .saturating_add(self.bonus)
            .saturating_sub(self.deductions)
    }
}

impl DraftInput for PayrollInput {
    fn schema() -> &'static DraftSchema {
        &PAYROLL_SCHEMA
    }

    fn from_draft(draft: &Draft, policy: NumericPolicy) -> Result<Self, DraftError> {
        Ok(Self {
            employee_name: draft.text("employee_name"),
            department: draft.text("department"),
            period: draft.text("period"),
            base_salary: draft.decimal("base_salary", policy)?,
            bonus: draft.decimal("bonus", policy)?,
            deductions: draft.decimal("deductions", policy)?,
            status: draft.parsed("status")?,
        })
    }
}

impl Editable for PayrollEntry {
    type Input = PayrollInput;

    fn to_draft(&self) -> Draft {
        Draft::with_values(
            &PAYROLL_SCHEMA,
            [
                ("employee_name", self.employee_name.clone()),
                ("department", self.department.clone()),
                ("period", self.period.clone()),
                ("base_salary", self.base_salary.to_string()),
                ("bonus", self.bonus.to_string()),
                ("deductions", self.deductions.to_string()),
                ("status", self.status.as_str().to_owned()),
            ],
        )
    }
}
