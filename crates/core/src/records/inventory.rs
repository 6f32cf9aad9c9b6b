//! Inventory items, categories and the stats endpoint payload.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::draft::{Draft, DraftError, DraftInput, DraftSchema, Editable, FieldKind, FieldSpec, NumericPolicy};
use crate::record::{Record, Searchable};
use crate::types::{CategoryId, ItemId, StockStatus};

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Server-assigned id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Category name (not id); category deletes cascade by name.
    pub category: String,
    /// Unit of measure, e.g. `pcs` or `kg`.
    #[serde(default)]
    pub unit: String,
    /// Units on hand.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Threshold below which the item is low on stock.
    #[serde(default)]
    pub min_quantity: i64,
    /// Reorder ceiling.
    #[serde(default)]
    pub max_quantity: i64,
    /// Computed by the backend from quantity and thresholds.
    pub status: StockStatus,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last written.
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    /// Quantity times unit price, saturating at the `Decimal` range.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }
}

impl Record for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Searchable for InventoryItem {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.sku.as_str()),
            Cow::Borrowed(self.category.as_str()),
        ]
    }

    fn status_value(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn category_value(&self) -> Option<&str> {
        Some(&self.category)
    }
}

static ITEM_SCHEMA: DraftSchema = DraftSchema {
    entity: "inventory item",
    fields: &[
        FieldSpec::text("name", "Item Name").required(),
        FieldSpec::text("sku", "SKU").required(),
        FieldSpec::text("category", "Category").required(),
        FieldSpec::text("unit", "Unit"),
        FieldSpec::of("quantity", "Quantity", FieldKind::Integer),
        FieldSpec::of("unit_price", "Unit Price", FieldKind::Decimal),
        FieldSpec::of("min_quantity", "Minimum Quantity", FieldKind::Integer),
        FieldSpec::of("max_quantity", "Maximum Quantity", FieldKind::Integer),
        FieldSpec::text("supplier", "Supplier"),
        FieldSpec::text("location", "Location"),
        FieldSpec::text("description", "Description"),
    ],
};

/// Body of item create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInput {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub min_quantity: i64,
    pub max_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DraftInput for ItemInput {
    fn schema() -> &'static DraftSchema {
        &ITEM_SCHEMA
    }

    fn from_draft(draft: &Draft, policy: NumericPolicy) -> Result<Self, DraftError> {
        Ok(Self {
            name: draft.text("name"),
            sku: draft.text("sku"),
            category: draft.text("category"),
            unit: draft.text("unit"),
            quantity: draft.integer("quantity", policy)?,
            unit_price: draft.decimal("unit_price", policy)?,
            min_quantity: draft.integer("min_quantity", policy)?,
            max_quantity: draft.integer("max_quantity", policy)?,
            supplier: draft.optional_text("supplier"),
            location: draft.optional_text("location"),
            description: draft.optional_text("description"),
        })
    }
}

impl Editable for InventoryItem {
    type Input = ItemInput;

    fn to_draft(&self) -> Draft {
        Draft::with_values(
            &ITEM_SCHEMA,
            [
                ("name", self.name.clone()),
                ("sku", self.sku.clone()),
                ("category", self.category.clone()),
                ("unit", self.unit.clone()),
                ("quantity", self.quantity.to_string()),
                ("unit_price", self.unit_price.to_string()),
                ("min_quantity", self.min_quantity.to_string()),
                ("max_quantity", self.max_quantity.to_string()),
                ("supplier", self.supplier.clone().unwrap_or_default()),
                ("location", self.location.clone().unwrap_or_default()),
                ("description", self.description.clone().unwrap_or_default()),
            ],
        )
    }
}

/// An inventory category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Number of items in the category, maintained by the backend.
    #[serde(default)]
    pub item_count: i64,
}

impl Record for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![Cow::Borrowed(self.name.as_str())];
        fields.extend(self.description.as_deref().map(Cow::Borrowed));
        fields
    }
}

static CATEGORY_SCHEMA: DraftSchema = DraftSchema {
    entity: "category",
    fields: &[
        FieldSpec::text("name", "Category Name").required(),
        FieldSpec::text("description", "Description"),
    ],
};

/// Body of the category create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DraftInput for CategoryInput {
    fn schema() -> &'static DraftSchema {
        &CATEGORY_SCHEMA
    }

    fn from_draft(draft: &Draft, _policy: NumericPolicy) -> Result<Self, DraftError> {
        Ok(Self {
            name: draft.text("name"),
            description: draft.optional_text("description"),
        })
    }
}

impl Editable for Category {
    type Input = CategoryInput;

    fn to_draft(&self) -> Draft {
        Draft::with_values(
            &CATEGORY_SCHEMA,
            [
                ("name", self.name.clone()),
                ("description", self.description.clone().unwrap_or_default()),
            ],
        )
    }
}

/// Roll-up figures returned by the inventory stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryStats {
    pub total_items: i64,
    pub total_value: Decimal,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    pub category_count: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::draft::REQUIRED_FIELDS_MESSAGE;

    fn widget() -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: ItemId::new(1),
            name: "Widget".to_owned(),
            sku: "W1".to_owned(),
            category: "Tools".to_owned(),
            unit: "pcs".to_owned(),
            quantity: 10,
            unit_price: Decimal::new(250, 2),
            min_quantity: 2,
            max_quantity: 50,
            status: StockStatus::InStock,
            supplier: None,
            location: Some("A-3".to_owned()),
            description: None,
            created_at: now,
            last_updated: now,
        }
    }

    #[test]
    fn test_add_item_draft_converts_numbers() {
        let mut draft = Draft::for_input::<ItemInput>();
        for (field, value) in [
            ("name", "Widget"),
            ("sku", "W1"),
            ("category", "Tools"),
            ("unit", "pcs"),
            ("quantity", "10"),
            ("unit_price", "2.50"),
        ] {
            draft.set(field, value).unwrap();
        }

        let input: ItemInput = draft.to_input(NumericPolicy::ZeroOnInvalid).unwrap();
        assert_eq!(input.quantity, 10);
        assert_eq!(input.unit_price, Decimal::new(25, 1));
        assert_eq!(input.min_quantity, 0);
        assert_eq!(input.supplier, None);
    }

    #[test]
    fn test_invalid_quantity_becomes_zero() {
        let mut draft = Draft::for_input::<ItemInput>();
        draft.set("name", "Widget").unwrap();
        draft.set("sku", "W1").unwrap();
        draft.set("category", "Tools").unwrap();
        draft.set("quantity", "ten").unwrap();
        draft.set("unit_price", "").unwrap();

        let input: ItemInput = draft.to_input(NumericPolicy::ZeroOnInvalid).unwrap();
        assert_eq!(input.quantity, 0);
        assert_eq!(input.unit_price, Decimal::ZERO);
    }

    #[test]
    fn test_missing_required_fields() {
        let mut draft = Draft::for_input::<ItemInput>();
        draft.set("name", "Widget").unwrap();
        let err = draft
            .to_input::<ItemInput>(NumericPolicy::ZeroOnInvalid)
            .unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);
        assert!(matches!(
            err,
            DraftError::Validation(ref v) if v.missing == ["sku", "category"]
        ));
    }

    #[test]
    fn test_to_draft_round_trips_through_input() {
        let item = widget();
        let input: ItemInput = item.to_draft().to_input(NumericPolicy::Strict).unwrap();
        assert_eq!(input.name, item.name);
        assert_eq!(input.unit_price, item.unit_price);
        assert_eq!(input.location.as_deref(), Some("A-3"));
    }

    #[test]
    fn test_search_fields_cover_name_sku_category() {
        let item = widget();
        let fields = item.search_fields();
        assert_eq!(fields, ["Widget", "W1", "Tools"]);
        assert_eq!(item.status_value(), Some("in_stock"));
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(widget().stock_value(), Decimal::new(25, 0));
    }

    #[test]
    fn test_item_deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": 5, "name": "Bolt", "sku": "B-5", "category": "Fasteners",
            "quantity": 3, "unit_price": "0.10", "status": "low_stock",
            "created_at": "2024-01-01T00:00:00Z", "last_updated": "2024-01-02T00:00:00Z"
        }"#;
        let item: InventoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, StockStatus::LowStock);
        assert_eq!(item.unit, "");
        assert_eq!(item.location, None);
    }
}
