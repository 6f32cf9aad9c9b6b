//! Marketing campaigns.

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::draft::{Draft, DraftError, DraftInput, DraftSchema, Editable, FieldKind, FieldSpec, NumericPolicy, DATE_FORMAT};
use crate::record::{Record, Searchable};
use crate::types::{CampaignChannel, CampaignId, CampaignStatus};

/// A marketing campaign with its budget and results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub channel: CampaignChannel,
    pub status: CampaignStatus,
    /// Planned spend.
    pub budget: Decimal,
    /// Spend so far.
    #[serde(default)]
    pub spent: Decimal,
    /// People reached.
    #[serde(default)]
    pub reach: i64,
    #[serde(default)]
    pub conversions: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Campaign {
    /// Conversions per person reached, or `None` before any reach.
    #[must_use]
    pub fn conversion_rate(&self) -> Option<Decimal> {
        (self.reach > 0).then(|| Decimal::from(self.conversions) / Decimal::from(self.reach))
    }
}

impl Record for Campaign {
    type Id = CampaignId;

    fn id(&self) -> CampaignId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Searchable for Campaign {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.channel.label()),
        ]
    }

    fn status_value(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    // The campaign "type" dropdown filters on channel.
    fn category_value(&self) -> Option<&str> {
        Some(self.channel.as_str())
    }
}

static CAMPAIGN_SCHEMA: DraftSchema = DraftSchema {
    entity: "campaign",
    fields: &[
        FieldSpec::text("name", "Campaign Name").required(),
        FieldSpec::text("channel", "Channel").required().default_value("email"),
        FieldSpec::text("status", "Status").default_value("draft"),
        FieldSpec::of("budget", "Budget", FieldKind::Decimal).required(),
        FieldSpec::of("spent", "Spent", FieldKind::Decimal),
        FieldSpec::of("reach", "Reach", FieldKind::Integer),
        FieldSpec::of("conversions", "Conversions", FieldKind::Integer),
        FieldSpec::of("start_date", "Start Date", FieldKind::Date),
        FieldSpec::of("end_date", "End Date", FieldKind::Date),
    ],
};

/// Body of campaign create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignInput {
    pub name: String,
    pub channel: CampaignChannel,
    pub status: CampaignStatus,
    pub budget: Decimal,
    pub spent: Decimal,
    pub reach: i64,
    pub conversions: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DraftInput for CampaignInput {
    fn schema() -> &'static DraftSchema {
        &CAMPAIGN_SCHEMA
    }

    fn from_draft(draft: &Draft, policy: NumericPolicy) -> Result<Self, DraftError> {
        let start_date = draft.date("start_date", policy)?;
        let end_date = draft.date("end_date", policy)?;
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(DraftError::InvalidValue {
                field: "end_date",
                message: "end date is before start date".to_owned(),
            });
        }

        Ok(Self {
            name: draft.text("name"),
            channel: draft.parsed("channel")?,
            status: draft.parsed("status")?,
            budget: draft.decimal("budget", policy)?,
            spent: draft.decimal("spent", policy)?,
            reach: draft.integer("reach", policy)?,
            conversions: draft.integer("conversions", policy)?,
            start_date,
            end_date,
        })
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

impl Editable for Campaign {
    type Input = CampaignInput;

    fn to_draft(&self) -> Draft {
        Draft::with_values(
            &CAMPAIGN_SCHEMA,
            [
                ("name", self.name.clone()),
                ("channel", self.channel.as_str().to_owned()),
                ("status", self.status.as_str().to_owned()),
                ("budget", self.budget.to_string()),
                ("spent", self.spent.to_string()),
                ("reach", self.reach.to_string()),
                ("conversions", self.conversions.to_string()),
                ("start_date", format_date(self.start_date)),
                ("end_date", format_date(self.end_date)),
            ],
        )
    }
}
