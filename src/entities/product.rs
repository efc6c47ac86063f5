//! Product entity type - a single inventory item record

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque, server-assigned product identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A Product record as returned by the inventory service
///
/// The id and the two timestamps are assigned by the service and have no
/// setters; everything a client may change lives in [`ProductForm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier
    id: ProductId,

    /// Display name
    pub name: String,

    /// Category label
    pub category: String,

    /// Price per unit
    pub unit_price: f64,

    /// Units currently in stock
    pub quantity_in_stock: u32,

    /// Expiration date for perishable goods
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<NaiveDate>,

    /// Creation timestamp (server-assigned)
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    creation_date: Option<DateTime<Utc>>,

    /// Last update timestamp (server-assigned)
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    update_date: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a product record from form data under the given id
    pub fn new(id: impl Into<ProductId>, form: ProductForm) -> Self {
        Self {
            id: id.into(),
            name: form.name,
            category: form.category,
            unit_price: form.unit_price,
            quantity_in_stock: form.quantity_in_stock,
            expiration_date: form.expiration_date,
            creation_date: None,
            update_date: None,
        }
    }

    /// Attach service-side timestamps
    pub fn with_timestamps(
        mut self,
        created: Option<DateTime<Utc>>,
        updated: Option<DateTime<Utc>>,
    ) -> Self {
        self.creation_date = created;
        self.update_date = updated;
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.creation_date
    }

    pub fn update_date(&self) -> Option<DateTime<Utc>> {
        self.update_date
    }

    /// True when at least one unit is available
    pub fn in_stock(&self) -> bool {
        self.quantity_in_stock > 0
    }

    /// Stock below the reorder threshold but not empty
    pub fn is_low_stock(&self) -> bool {
        self.quantity_in_stock > 0 && self.quantity_in_stock < LOW_STOCK_THRESHOLD
    }

    /// Value of the units on hand
    pub fn stock_value(&self) -> f64 {
        self.unit_price * f64::from(self.quantity_in_stock)
    }

    /// Overwrite the editable fields with the form's values
    pub fn apply_form(&mut self, form: ProductForm) {
        self.name = form.name;
        self.category = form.category;
        self.unit_price = form.unit_price;
        self.quantity_in_stock = form.quantity_in_stock;
        self.expiration_date = form.expiration_date;
    }
}

/// Stock levels under this count are flagged as low
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Client-editable product fields, used as the body of create and update calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity_in_stock: u32,
    /// Sent as `null` when absent so an update can clear the date
    #[serde(default, deserialize_with = "lenient_date")]
    pub expiration_date: Option<NaiveDate>,
}

impl ProductForm {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        unit_price: f64,
        quantity_in_stock: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            unit_price,
            quantity_in_stock,
            expiration_date: None,
        }
    }

    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.expiration_date = Some(date);
        self
    }
}

impl From<&Product> for ProductForm {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            category: p.category.clone(),
            unit_price: p.unit_price,
            quantity_in_stock: p.quantity_in_stock,
            expiration_date: p.expiration_date,
        }
    }
}

/// One page of products as returned by `GET /products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products on this page
    #[serde(default)]
    pub content: Vec<Product>,

    /// Zero-based page index
    #[serde(default)]
    pub number: usize,

    /// Total number of pages for the current filter
    #[serde(default)]
    pub total_pages: usize,

    /// Total number of matching products
    #[serde(default, alias = "totalElements")]
    pub total_items: u64,
}

/// Accepts `null`, `""` or `YYYY-MM-DD`; form inputs send an empty string
/// when the optional date is left blank.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            // Some services send a full timestamp for date columns
            let date_part = s.split('T').next().unwrap_or(s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Accepts RFC 3339 timestamps as well as zone-less local date-times,
/// which are taken as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid timestamp '{}'", s))
        }),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
