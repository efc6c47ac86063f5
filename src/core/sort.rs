//! Multi-column sort specification
//!
//! A sort spec is an ordered list of distinct `(column, direction)` keys. The
//! first key is the primary one; later keys only break ties. Toggling a column
//! cycles ascending -> descending -> removed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sortable product columns, named as the inventory service expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    Category,
    UnitPrice,
    QuantityInStock,
    ExpirationDate,
    CreationDate,
    UpdateDate,
}

impl SortColumn {
    pub fn all() -> &'static [SortColumn] {
        &[
            SortColumn::Name,
            SortColumn::Category,
            SortColumn::UnitPrice,
            SortColumn::QuantityInStock,
            SortColumn::ExpirationDate,
            SortColumn::CreationDate,
            SortColumn::UpdateDate,
        ]
    }

    /// Wire name used in the `sort` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Category => "category",
            SortColumn::UnitPrice => "unitPrice",
            SortColumn::QuantityInStock => "quantityInStock",
            SortColumn::ExpirationDate => "expirationDate",
            SortColumn::CreationDate => "creationDate",
            SortColumn::UpdateDate => "updateDate",
        }
    }

    /// Short header label for tables and prompts
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Category => "Category",
            SortColumn::UnitPrice => "Price",
            SortColumn::QuantityInStock => "Stock",
            SortColumn::ExpirationDate => "Expiration",
            SortColumn::CreationDate => "Created",
            SortColumn::UpdateDate => "Updated",
        }
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Ok(SortColumn::Name),
            "category" => Ok(SortColumn::Category),
            "unitprice" | "price" => Ok(SortColumn::UnitPrice),
            "quantityinstock" | "stock" | "quantity" => Ok(SortColumn::QuantityInStock),
            "expirationdate" | "expiration" | "expires" => Ok(SortColumn::ExpirationDate),
            "creationdate" | "created" => Ok(SortColumn::CreationDate),
            "updatedate" | "updated" => Ok(SortColumn::UpdateDate),
            _ => Err(format!("Unknown sort column: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// A single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }

    /// Query parameter value, e.g. `unitPrice,desc`
    pub fn to_param(&self) -> String {
        format!("{},{}", self.column, self.direction)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.column, self.direction)
    }
}

/// Parses `column`, `column:dir` or `column,dir`
impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once([':', ',']) {
            Some((column, direction)) => (column, direction.parse()?),
            None => (s, SortDirection::Asc),
        };
        Ok(SortKey {
            column: column.parse()?,
            direction,
        })
    }
}

/// Ordered sort keys; each column appears at most once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from keys; a repeated column keeps its first position
    /// and takes the later direction.
    pub fn from_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut spec = Self::new();
        for key in keys {
            spec.set(key.column, key.direction);
        }
        spec
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn direction_of(&self, column: SortColumn) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// Set a column's direction, appending it if absent
    pub fn set(&mut self, column: SortColumn, direction: SortDirection) {
        match self.keys.iter_mut().find(|k| k.column == column) {
            Some(key) => key.direction = direction,
            None => self.keys.push(SortKey { column, direction }),
        }
    }

    /// Cycle a column: absent -> asc (appended) -> desc -> removed.
    /// Other columns keep their relative order.
    pub fn toggle(&mut self, column: SortColumn) {
        match self.keys.iter().position(|k| k.column == column) {
            None => self.keys.push(SortKey::asc(column)),
            Some(idx) => match self.keys[idx].direction {
                SortDirection::Asc => self.keys[idx].direction = SortDirection::Desc,
                SortDirection::Desc => {
                    self.keys.remove(idx);
                }
            },
        }
    }

    /// `sort` query parameter values in precedence order
    pub fn to_params(&self) -> Vec<String> {
        self.keys.iter().map(SortKey::to_param).collect()
    }
}
