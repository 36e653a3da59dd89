use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    OnSale,
    OffShelf,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::OnSale => "ON_SALE",
            ProductStatus::OffShelf => "OFF_SHELF",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "ON_SALE" => Ok(ProductStatus::OnSale),
            "OFF_SHELF" => Ok(ProductStatus::OffShelf),
            other => Err(DomainError::Internal(format!(
                "unknown product status '{other}'"
            ))),
        }
    }
}

/// Read model of a catalog product. The catalog itself is maintained
/// elsewhere; this core only reads it, and only the inventory ledger
/// writes `stock`.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub category_id: Uuid,
    pub price: BigDecimal,
    pub stock: i32,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl ProductSnapshot {
    pub fn on_sale(&self) -> bool {
        self.status == ProductStatus::OnSale
    }

    pub fn has_stock_for(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }

    pub fn purchasable(&self) -> bool {
        self.on_sale() && self.stock > 0
    }
}

/// Shipping address read model, owned by the address book collaborator.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub receiver: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail: String,
    pub is_default: bool,
}

impl Address {
    pub fn full_address(&self) -> String {
        format!(
            "{}{}{}{}",
            self.province, self.city, self.district, self.detail
        )
    }
}
