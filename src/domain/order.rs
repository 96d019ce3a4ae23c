//! Orders and their line items.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

use super::money::Price;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not a known [`OrderStatus`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// An order header.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
    pub total_amount: Price,
}

/// A stored order line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub book_id: Option<i32>,
    pub quantity: i32,
    pub price_at_purchase: Price,
}

/// A line to be written as part of a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub book_id: i32,
    pub quantity: i32,
    pub price_at_purchase: Price,
}

impl OrderLine {
    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price_at_purchase * Price::from(self.quantity)
    }
}

/// An order line joined with the purchased book's title.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDetail {
    pub book_title: Option<String>,
    pub quantity: i32,
    pub price_at_purchase: Price,
}

impl OrderItemDetail {
    #[must_use]
    pub fn title_label(&self) -> &str {
        self.book_title.as_deref().unwrap_or("Unknown")
    }
}

/// An order with its customer's name and its items.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub customer_name: Option<String>,
    pub items: Vec<OrderItemDetail>,
}

impl OrderDetails {
    #[must_use]
    pub fn customer_label(&self) -> &str {
        self.customer_name.as_deref().unwrap_or("Unknown")
    }
}

/// Id, total and status of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: i32,
    pub total_amount: Price,
    pub status: OrderStatus,
}
