//! Typed inputs for ledger operations, parsed from submitted forms.

use rust_decimal::Decimal;
use serde::Deserialize;

use fyay_core::{ProductId, UnitPrice};

use crate::services::validation::{self, positive_int, require};

/// One product an event wants to reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedItem {
    pub product_id: ProductId,
    /// `None` when the submitted quantity was not a positive integer.
    pub quantity: Option<i64>,
}

/// Message for product rows that cannot be paired with a quantity.
pub const UNPAIRED_ROWS: &str = "Each listed product must have exactly one quantity field.";

/// An event creation request. Field values are untrimmed user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub items: Vec<RequestedItem>,
    /// Selected rows that could not be turned into an item.
    pub row_errors: Vec<String>,
}

impl NewEvent {
    /// Build a request from raw form pairs.
    ///
    /// Products arrive as parallel `product_id` / `quantity` fields, one pair
    /// per listed product. A row whose quantity is blank was not selected and
    /// is skipped. Unequal field counts make every pairing suspect, so no
    /// items are built and [`UNPAIRED_ROWS`] is recorded instead.
    #[must_use]
    pub fn from_form(fields: &[(String, String)]) -> Self {
        let mut request = Self::default();
        let mut product_ids = Vec::new();
        let mut quantities = Vec::new();

        for (key, value) in fields {
            match key.as_str() {
                "event_name" => request.name.clone_from(value),
                "description" => request.description.clone_from(value),
                "location" => request.location.clone_from(value),
                "event_date" => request.date.clone_from(value),
                "product_id" => product_ids.push(value.trim()),
                "quantity" => quantities.push(value.trim()),
                _ => {}
            }
        }

        if product_ids.len() != quantities.len() {
            tracing::warn!(
                product_ids = product_ids.len(),
                quantities = quantities.len(),
                "Unpaired product rows in event form"
            );
            request.row_errors.push(UNPAIRED_ROWS.to_string());
            return request;
        }

        for (raw_id, raw_quantity) in product_ids.into_iter().zip(quantities) {
            if raw_quantity.is_empty() {
                continue;
            }
            let Ok(id) = raw_id.parse::<i64>() else {
                request
                    .row_errors
                    .push(format!("Product ID {raw_id} does not exist."));
                continue;
            };
            request.items.push(RequestedItem {
                product_id: ProductId::new(id),
                quantity: positive_int(raw_quantity),
            });
        }

        request
    }

    /// Check the event's own fields, returning the parsed date when valid.
    pub(crate) fn check_fields(&self, errors: &mut Vec<String>) -> Option<chrono::NaiveDate> {
        require(&self.name, "Event Name is required.", errors);
        require(&self.description, "Description is required.", errors);
        require(&self.location, "Location is required.", errors);

        match validation::parse_date(&self.date) {
            Ok(date) => Some(date),
            Err(message) => {
                errors.push(message.to_string());
                None
            }
        }
    }
}

/// Order form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub price_per_unit: String,
    #[serde(default)]
    pub description: String,
}

/// Message for an order whose total cannot be represented.
pub const ORDER_TOO_LARGE: &str = "Order total is too large.";

/// A validated stock purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub product_name: String,
    pub quantity: i64,
    pub price_per_unit: UnitPrice,
    /// `quantity * price_per_unit`, checked at parse time.
    pub total_price: Decimal,
    pub description: String,
}

impl NewOrder {
    /// Validate an order form.
    ///
    /// # Errors
    ///
    /// Returns every validation message, in form order.
    pub fn parse(form: &OrderForm) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let product_name = form.product_name.trim();
        require(product_name, "Product Name is required.", &mut errors);

        let quantity = positive_int(&form.quantity);
        if quantity.is_none() {
            errors.push("Quantity must be a positive integer.".to_string());
        }

        let price = UnitPrice::parse(&form.price_per_unit);
        if price.is_err() {
            errors.push("Price Per Unit must be a positive number.".to_string());
        }

        let (Some(quantity), Ok(price_per_unit)) = (quantity, price) else {
            return Err(errors);
        };
        let Some(total_price) = price_per_unit.total(quantity) else {
            errors.push(ORDER_TOO_LARGE.to_string());
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            product_name: product_name.to_string(),
            quantity,
            price_per_unit,
            total_price,
            description: form.description.trim().to_string(),
        })
    }
}
