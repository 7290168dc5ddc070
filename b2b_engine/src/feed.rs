//! Supplier price-list feeds.
//!
//! Suppliers publish their catalog as a YAML document:
//!
//! ```yaml
//! shop: Связной
//! categories:
//!   - id: 224
//!     name: Смартфоны
//! goods:
//!   - id: 4216292
//!     category: 224
//!     model: apple/iphone/xs-max
//!     name: Смартфон Apple iPhone XS Max 512GB (золотистый)
//!     price: 110000
//!     price_rrc: 116990
//!     quantity: 14
//!     parameters:
//!       "Диагональ (дюйм)": 6.5
//!       "Цвет": золотистый
//! ```
//!
//! Parameter values are free-form scalars. They are stored as text.
use std::{collections::BTreeMap, fmt::Display};

use b2b_common::Price;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::MAX_UNIT_PRICE;

#[derive(Debug, Clone, Error)]
pub enum FeedError {
    #[error("Could not parse the price list. {0}")]
    Parse(String),
    #[error("The price list is invalid. {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFeed {
    pub shop: String,
    #[serde(default)]
    pub categories: Vec<FeedCategory>,
    #[serde(default)]
    pub goods: Vec<FeedGood>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedGood {
    /// The supplier's own identifier for the SKU.
    pub id: i64,
    pub category: i64,
    #[serde(default)]
    pub model: String,
    pub name: String,
    pub price: Price,
    pub price_rrc: Price,
    pub quantity: i64,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Integer(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Text(v) => f.write_str(v),
        }
    }
}

impl PriceFeed {
    pub fn from_yaml(s: &str) -> Result<Self, FeedError> {
        let feed: Self = serde_yaml::from_str(s).map_err(|e| FeedError::Parse(e.to_string()))?;
        feed.validate()?;
        Ok(feed)
    }

    /// Checks the constraints the catalog tables would otherwise reject halfway through an import.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.shop.trim().is_empty() {
            return Err(FeedError::Invalid("The shop name is empty".into()));
        }
        for good in &self.goods {
            if good.name.trim().is_empty() {
                return Err(FeedError::Invalid(format!("Good #{} has no name", good.id)));
            }
            if good.price.is_negative() || good.price_rrc.is_negative() || good.quantity < 0 {
                return Err(FeedError::Invalid(format!("Good #{} has a negative price or quantity", good.id)));
            }
            if good.price.value() > MAX_UNIT_PRICE || good.price_rrc.value() > MAX_UNIT_PRICE {
                return Err(FeedError::Invalid(format!("Good #{} is priced above {MAX_UNIT_PRICE}", good.id)));
            }
        }
        Ok(())
    }

    pub fn category_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.categories.iter().map(|c| c.id)
    }
}
