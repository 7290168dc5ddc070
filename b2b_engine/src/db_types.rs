//! Rows and value types stored by the database backends.
//!
//! Compound, read-side views (e.g. an order with its items and total) live in the API object modules
//! ([`crate::order_objects`], [`crate::catalog_objects`], [`crate::account_objects`]).
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

pub use b2b_common::Price;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// Field name → list of human-readable problems with that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Error)]
#[error("Invalid value for {kind}: {value}")]
pub struct ConversionError {
    kind: &'static str,
    value: String,
}

impl ConversionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

//--------------------------------------       UserType        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Places orders.
    #[default]
    Buyer,
    /// Supplier account. Owns exactly one shop and uploads price lists.
    Shop,
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Buyer => write!(f, "buyer"),
            UserType::Shop => write!(f, "shop"),
        }
    }
}

impl FromStr for UserType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buyer" => Ok(Self::Buyer),
            "shop" => Ok(Self::Shop),
            _ => Err(ConversionError::new("user type", s)),
        }
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub is_active: bool,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_shop(&self) -> bool {
        self.user_type == UserType::Shop
    }
}

/// A registration request, minus the password, which is hashed before it reaches the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub user_type: UserType,
}

/// A partial update of a user's details. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub password_hash: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() &&
            self.first_name.is_none() &&
            self.last_name.is_none() &&
            self.company.is_none() &&
            self.position.is_none() &&
            self.password_hash.is_none()
    }
}

/// What the backend needs to check a login attempt.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub user_id: i64,
    pub password_hash: String,
    pub is_active: bool,
}

//--------------------------------------        Contact        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    #[serde(skip_serializing, default)]
    pub user_id: i64,
    pub city: String,
    pub street: String,
    pub house: String,
    pub structure: String,
    pub building: String,
    pub apartment: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub city: String,
    pub street: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub apartment: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub structure: Option<String>,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.city.is_none() &&
            self.street.is_none() &&
            self.house.is_none() &&
            self.structure.is_none() &&
            self.building.is_none() &&
            self.apartment.is_none() &&
            self.phone.is_none()
    }
}

//--------------------------------------    Catalog entities   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub url: Option<String>,
    #[serde(skip_serializing, default)]
    pub user_id: Option<i64>,
    /// Whether the shop is currently accepting orders.
    pub state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// An orderable SKU: a product as sold by one shop.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: i64,
    pub product_id: i64,
    pub shop_id: i64,
    pub external_id: i64,
    pub model: String,
    pub quantity: i64,
    pub price: Price,
    pub price_rrc: Price,
}

//--------------------------------------      OrderState       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// The buyer's mutable shopping basket. At most one per user.
    #[default]
    Basket,
    /// Placed by the buyer, awaiting the supplier.
    New,
    Confirmed,
    Assembled,
    Sent,
    Delivered,
    Canceled,
}

impl OrderState {
    /// States a supplier may move a placed order into.
    pub fn is_fulfilment_state(&self) -> bool {
        !matches!(self, OrderState::Basket | OrderState::New)
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderState::Basket => "basket",
            OrderState::New => "new",
            OrderState::Confirmed => "confirmed",
            OrderState::Assembled => "assembled",
            OrderState::Sent => "sent",
            OrderState::Delivered => "delivered",
            OrderState::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderState {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basket" => Ok(Self::Basket),
            "new" => Ok(Self::New),
            "confirmed" => Ok(Self::Confirmed),
            "assembled" => Ok(Self::Assembled),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(ConversionError::new("order state", s)),
        }
    }
}

impl From<String> for OrderState {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order state: {value}. But this conversion cannot fail. Defaulting to basket");
            OrderState::Basket
        })
    }
}

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub dt: DateTime<Utc>,
    pub state: OrderState,
    pub contact_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// `None` once a catalog re-import has removed the SKU this line pointed at.
    pub product_info_id: Option<i64>,
    pub quantity: i64,
}

/// The largest quantity a single basket line may hold.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

/// The largest unit price a price list may quote. With [`MAX_ITEM_QUANTITY`], any line total fits in an `i64`.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;

/// A basket addition, as submitted by the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_info: i64,
    pub quantity: i64,
}

/// A quantity change for an existing basket line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemUpdate {
    pub id: i64,
    pub quantity: i64,
}
