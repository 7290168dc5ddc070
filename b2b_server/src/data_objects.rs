//! Request bodies.
//!
//! Bodies are deserialized leniently: every field is optional so that a missing field yields the "missing arguments"
//! response rather than a deserialization failure. Ids may be sent as JSON numbers or as strings of digits.
use b2b_common::str_to_bool;
use b2b_engine::{
    db_types::{ContactUpdate, FieldErrors, NewContact, NewOrderItem, NewUser, OrderItemUpdate, OrderState, UserType},
    helpers::{is_digits, parse_id_list},
};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServerError;

/// Reads an id sent either as a non-negative JSON integer or as a string of digits.
pub fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|n| *n >= 0),
        Value::String(s) if is_digits(s) => s.parse().ok(),
        _ => None,
    }
}

fn required<T>(value: Option<T>) -> Result<T, ServerError> {
    value.ok_or(ServerError::MissingArguments)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
}

impl RegisterRequest {
    /// Splits the request into the account details and the plain-text password.
    pub fn into_new_user(self) -> Result<(NewUser, String), ServerError> {
        let password = required(self.password)?;
        let user_type = match self.user_type.as_deref() {
            None => UserType::default(),
            Some(s) => s.parse::<UserType>().map_err(|_| {
                let mut fields = FieldErrors::new();
                fields.insert("type".into(), vec![format!("\"{s}\" is not a valid choice.")]);
                ServerError::ValidationFailed(fields)
            })?,
        };
        let user = NewUser {
            email: required(self.email)?,
            first_name: required(self.first_name)?,
            last_name: required(self.last_name)?,
            company: required(self.company)?,
            position: required(self.position)?,
            user_type,
        };
        Ok((user, password))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfirmEmailRequest {
    pub email: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordResetConfirmation {
    pub token: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    pub id: Option<Value>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub structure: Option<String>,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
}

impl ContactRequest {
    pub fn into_new_contact(self) -> Result<NewContact, ServerError> {
        Ok(NewContact {
            city: required(self.city)?,
            street: required(self.street)?,
            phone: required(self.phone)?,
            house: self.house.unwrap_or_default(),
            structure: self.structure.unwrap_or_default(),
            building: self.building.unwrap_or_default(),
            apartment: self.apartment.unwrap_or_default(),
        })
    }

    /// The contact id and the fields to change.
    pub fn into_update(self) -> Result<(i64, ContactUpdate), ServerError> {
        let id = self.id.as_ref().and_then(id_from_value).ok_or(ServerError::MissingArguments)?;
        let update = ContactUpdate {
            city: self.city,
            street: self.street,
            house: self.house,
            structure: self.structure,
            building: self.building,
            apartment: self.apartment,
            phone: self.phone,
        };
        Ok((id, update))
    }
}

/// The `{items: "..."}` body shared by the basket and contact endpoints. Depending on the endpoint, `items` holds a
/// JSON-encoded list or a comma-separated list of ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsRequest {
    pub items: Option<String>,
}

impl ItemsRequest {
    fn items(&self) -> Result<&str, ServerError> {
        self.items.as_deref().filter(|s| !s.is_empty()).ok_or(ServerError::MissingArguments)
    }

    fn json_list(&self) -> Result<Vec<Value>, ServerError> {
        serde_json::from_str::<Vec<Value>>(self.items()?).map_err(|e| {
            debug!("💻️ Could not read the items list. {e}");
            ServerError::InvalidRequestFormat
        })
    }

    /// Basket additions. Entries that are not `{product_info, quantity}` objects are skipped.
    pub fn new_order_items(&self) -> Result<Vec<NewOrderItem>, ServerError> {
        let items = self
            .json_list()?
            .into_iter()
            .filter_map(|v| {
                serde_json::from_value::<NewOrderItem>(v.clone())
                    .map_err(|e| debug!("💻️ Skipping basket entry {v}. {e}"))
                    .ok()
            })
            .collect();
        Ok(items)
    }

    /// Quantity changes. Entries whose `id` or `quantity` is not an integer are skipped.
    pub fn order_item_updates(&self) -> Result<Vec<OrderItemUpdate>, ServerError> {
        let updates = self
            .json_list()?
            .iter()
            .filter_map(|v| {
                let id = v.get("id").and_then(Value::as_i64)?;
                let quantity = v.get("quantity").and_then(Value::as_i64)?;
                Some(OrderItemUpdate { id, quantity })
            })
            .collect();
        Ok(updates)
    }

    /// A comma-separated id list. Fails with "missing arguments" unless at least one id is numeric.
    pub fn id_list(&self) -> Result<Vec<i64>, ServerError> {
        let ids = parse_id_list(self.items()?);
        if ids.is_empty() {
            return Err(ServerError::MissingArguments);
        }
        Ok(ids)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub id: Option<Value>,
    pub contact: Option<Value>,
}

impl PlaceOrderRequest {
    pub fn ids(&self) -> Result<(i64, i64), ServerError> {
        let id = required(self.id.as_ref())?;
        let contact = required(self.contact.as_ref())?;
        // A malformed order id means there is nothing to place; a malformed contact is an invalid argument
        let id = id_from_value(id).ok_or(ServerError::MissingArguments)?;
        let contact = id_from_value(contact).ok_or(ServerError::InvalidArguments)?;
        Ok((id, contact))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartnerUpdateRequest {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartnerStateRequest {
    pub state: Option<Value>,
}

impl PartnerStateRequest {
    pub fn state(&self) -> Result<bool, ServerError> {
        match self.state.as_ref() {
            None | Some(Value::Null) => Err(ServerError::MissingArguments),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.is_empty() => Err(ServerError::MissingArguments),
            Some(Value::String(s)) => str_to_bool(s).ok_or_else(|| invalid_truth_value(s)),
            Some(v) => Err(invalid_truth_value(&v.to_string())),
        }
    }
}

fn invalid_truth_value(s: &str) -> ServerError {
    let mut fields = FieldErrors::new();
    fields.insert("state".into(), vec![format!("invalid truth value '{s}'")]);
    ServerError::ValidationFailed(fields)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderStateRequest {
    pub id: Option<Value>,
    pub state: Option<String>,
}

impl OrderStateRequest {
    pub fn parts(&self) -> Result<(i64, OrderState), ServerError> {
        let id = self.id.as_ref().and_then(id_from_value).ok_or(ServerError::MissingArguments)?;
        let state = required(self.state.as_deref())?.parse::<OrderState>().map_err(|_| ServerError::InvalidArguments)?;
        Ok((id, state))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    pub shop_id: Option<i64>,
    pub category_id: Option<i64>,
}
