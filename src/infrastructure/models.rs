use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::catalog::{Address, ProductSnapshot, ProductStatus};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLine, PayType};
use crate::domain::status::OrderStatus;
use crate::schema::{addresses, order_lines, orders, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub order_no: String,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub pay_amount: BigDecimal,
    pub status: String,
    pub pay_type: Option<String>,
    pub pay_time: Option<DateTime<Utc>>,
    pub address_id: Uuid,
    pub logistics_no: Option<String>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_domain(self) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            order_no: self.order_no,
            user_id: self.user_id,
            total_amount: self.total_amount,
            pay_amount: self.pay_amount,
            status: OrderStatus::parse(&self.status)?,
            pay_type: self.pay_type.as_deref().map(PayType::parse).transpose()?,
            pay_time: self.pay_time,
            address_id: self.address_id,
            logistics_no: self.logistics_no,
            remark: self.remark,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub order_no: String,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub pay_amount: BigDecimal,
    pub status: String,
    pub address_id: Uuid,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for NewOrderRow {
    fn from(order: &Order) -> Self {
        NewOrderRow {
            id: order.id,
            order_no: order.order_no.clone(),
            user_id: order.user_id,
            total_amount: order.total_amount.clone(),
            pay_amount: order.pay_amount.clone(),
            status: order.status.as_str().to_string(),
            address_id: order.address_id,
            remark: order.remark.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub sku_id: Uuid,
    pub title: String,
    pub sku_title: Option<String>,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub subtotal: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl OrderLineRow {
    pub fn into_domain(self) -> OrderLine {
        OrderLine {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            sku_id: self.sku_id,
            title: self.title,
            sku_title: self.sku_title,
            unit_price: self.unit_price,
            quantity: self.quantity,
            subtotal: self.subtotal,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub sku_id: Uuid,
    pub title: String,
    pub sku_title: Option<String>,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub subtotal: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderLine> for NewOrderLineRow {
    fn from(line: &OrderLine) -> Self {
        NewOrderLineRow {
            id: line.id,
            order_id: line.order_id,
            product_id: line.product_id,
            sku_id: line.sku_id,
            title: line.title.clone(),
            sku_title: line.sku_title.clone(),
            unit_price: line.unit_price.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal.clone(),
            created_at: line.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub category_id: Uuid,
    pub price: BigDecimal,
    pub stock: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn into_domain(self) -> Result<ProductSnapshot, DomainError> {
        Ok(ProductSnapshot {
            id: self.id,
            title: self.title,
            subtitle: self.subtitle,
            category_id: self.category_id,
            price: self.price,
            stock: self.stock,
            status: ProductStatus::parse(&self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub category_id: Uuid,
    pub price: BigDecimal,
    pub stock: i32,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub receiver: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AddressRow {
    pub fn into_domain(self) -> Address {
        Address {
            id: self.id,
            user_id: self.user_id,
            receiver: self.receiver,
            phone: self.phone,
            province: self.province,
            city: self.city,
            district: self.district,
            detail: self.detail,
            is_default: self.is_default,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = addresses)]
pub struct NewAddressRow {
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
