use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::{Address, ProductSnapshot};
use super::errors::DomainError;
use super::order_no;
use super::status::{self, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayType {
    Alipay,
    Wechat,
    Other,
}

impl PayType {
    pub fn as_str(self) -> &'static str {
        match self {
            PayType::Alipay => "ALIPAY",
            PayType::Wechat => "WECHAT",
            PayType::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "ALIPAY" => Ok(PayType::Alipay),
            "WECHAT" => Ok(PayType::Wechat),
            "OTHER" => Ok(PayType::Other),
            other => Err(DomainError::InvalidInput(format!(
                "unknown pay type '{other}'"
            ))),
        }
    }
}

/// Checkout input accepted from the caller.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub product_id: Uuid,
    pub quantity: i32,
    pub address_id: Uuid,
    pub remark: Option<String>,
}

/// Immutable snapshot of a purchased product, priced at checkout time.
/// Catalog changes never rewrite persisted lines.
#[derive(Debug, Clone)]
pub struct OrderLine {
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

impl OrderLine {
    /// There is no SKU matrix yet, so the product id doubles as the SKU id.
    pub fn snapshot(
        order_id: Uuid,
        product: &ProductSnapshot,
        quantity: i32,
        at: DateTime<Utc>,
    ) -> Self {
        let subtotal = product.price.clone() * BigDecimal::from(quantity);
        OrderLine {
            id: Uuid::new_v4(),
            order_id,
            product_id: product.id,
            sku_id: product.id,
            title: product.title.clone(),
            sku_title: product.subtitle.clone(),
            unit_price: product.price.clone(),
            quantity,
            subtotal,
            created_at: at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub order_no: String,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub pay_amount: BigDecimal,
    pub status: OrderStatus,
    pub pay_type: Option<PayType>,
    pub pay_time: Option<DateTime<Utc>>,
    pub address_id: Uuid,
    pub logistics_no: Option<String>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The order aggregate as returned to callers: the order, its line
/// snapshots, and (for single-order reads) the shipping address.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub address: Option<Address>,
}

/// A caller-initiated lifecycle action on an existing order.
#[derive(Debug, Clone)]
pub enum OrderAction {
    Pay { caller: Uuid, pay_type: PayType },
    Ship { logistics_no: String },
    Confirm { caller: Uuid },
    Cancel { caller: Uuid, is_admin: bool },
}

/// Effect of a legal action. The store persists the whole effect in one
/// unit of work; `restock` returns every line's quantity to inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: OrderStatus,
    pub pay: Option<(PayType, DateTime<Utc>)>,
    pub logistics_no: Option<String>,
    pub restock: bool,
}

impl Order {
    /// A fresh `PENDING` order; `pay_amount` equals `total_amount` since
    /// there is no discount engine.
    pub fn pending(
        user_id: Uuid,
        address_id: Uuid,
        remark: Option<String>,
        total_amount: BigDecimal,
        at: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4();
        Order {
            id,
            order_no: order_no::generate(id, at),
            user_id,
            total_amount: total_amount.clone(),
            pay_amount: total_amount,
            status: OrderStatus::Pending,
            pay_type: None,
            pay_time: None,
            address_id,
            logistics_no: None,
            remark,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn ensure_owned_by(&self, caller: Uuid) -> Result<(), DomainError> {
        if self.user_id == caller {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }

    pub fn ensure_viewable_by(&self, caller: Uuid, is_admin: bool) -> Result<(), DomainError> {
        if is_admin {
            return Ok(());
        }
        self.ensure_owned_by(caller)
    }

    /// Validate an action against ownership and the transition table and
    /// return its effect. Ownership is checked before legality, so a
    /// foreign caller learns nothing about the order's state.
    pub fn apply(&self, action: &OrderAction, now: DateTime<Utc>) -> Result<Transition, DomainError> {
        match action {
            OrderAction::Pay { caller, pay_type } => {
                self.ensure_owned_by(*caller)?;
                status::ensure_transition(self.status, OrderStatus::Paid)?;
                Ok(Transition {
                    to: OrderStatus::Paid,
                    pay: Some((*pay_type, now)),
                    logistics_no: None,
                    restock: false,
                })
            }
            OrderAction::Ship { logistics_no } => {
                status::ensure_transition(self.status, OrderStatus::Shipped)?;
                Ok(Transition {
                    to: OrderStatus::Shipped,
                    pay: None,
                    logistics_no: Some(logistics_no.clone()),
                    restock: false,
                })
            }
            OrderAction::Confirm { caller } => {
                self.ensure_owned_by(*caller)?;
                status::ensure_transition(self.status, OrderStatus::Completed)?;
                Ok(Transition {
                    to: OrderStatus::Completed,
                    pay: None,
                    logistics_no: None,
                    restock: false,
                })
            }
            OrderAction::Cancel { caller, is_admin } => {
                if !is_admin {
                    self.ensure_owned_by(*caller)?;
                }
                status::ensure_transition(self.status, OrderStatus::Closed)?;
                Ok(Transition {
                    to: OrderStatus::Closed,
                    pay: None,
                    logistics_no: None,
                    restock: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ProductStatus;

    fn product(price: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: Uuid::new_v4(),
            title: "Bamboo weaving kit".to_string(),
            subtitle: Some("Beginner set".to_string()),
            category_id: Uuid::new_v4(),
            price: BigDecimal::from(price),
            stock: 10,
            status: ProductStatus::OnSale,
            created_at: Utc::now(),
        }
    }

    fn pending_order(owner: Uuid) -> Order {
        Order::pending(
            owner,
            Uuid::new_v4(),
            None,
            BigDecimal::from(360),
            Utc::now(),
        )
    }

    #[test]
    fn line_snapshot_multiplies_price_by_quantity() {
        let p = product(120);
        let line = OrderLine::snapshot(Uuid::new_v4(), &p, 3, Utc::now());
        assert_eq!(line.subtotal, BigDecimal::from(360));
        assert_eq!(line.sku_id, p.id);
        assert_eq!(line.title, p.title);
    }

    #[test]
    fn pending_order_pays_full_total() {
        let order = pending_order(Uuid::new_v4());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.pay_amount, order.total_amount);
        assert!(order.order_no.starts_with("ORD-"));
    }

    #[test]
    fn pay_records_type_and_time() {
        let owner = Uuid::new_v4();
        let order = pending_order(owner);
        let now = Utc::now();
        let t = order
            .apply(
                &OrderAction::Pay {
                    caller: owner,
                    pay_type: PayType::Alipay,
                },
                now,
            )
            .unwrap();
        assert_eq!(t.to, OrderStatus::Paid);
        assert_eq!(t.pay, Some((PayType::Alipay, now)));
        assert!(!t.restock);
    }

    #[test]
    fn pay_by_stranger_is_forbidden_before_status_is_revealed() {
        let mut order = pending_order(Uuid::new_v4());
        order.status = OrderStatus::Closed;
        let err = order
            .apply(
                &OrderAction::Pay {
                    caller: Uuid::new_v4(),
                    pay_type: PayType::Other,
                },
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
    }

    #[test]
    fn ship_requires_paid() {
        let order = pending_order(Uuid::new_v4());
        let err = order
            .apply(
                &OrderAction::Ship {
                    logistics_no: "SF123".to_string(),
                },
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped,
            }
        );
    }

    #[test]
    fn cancel_restocks_from_pending_and_paid_only() {
        let owner = Uuid::new_v4();
        let cancel = OrderAction::Cancel {
            caller: owner,
            is_admin: false,
        };
        for from in [OrderStatus::Pending, OrderStatus::Paid] {
            let mut order = pending_order(owner);
            order.status = from;
            let t = order.apply(&cancel, Utc::now()).unwrap();
            assert_eq!(t.to, OrderStatus::Closed);
            assert!(t.restock);
        }
        for from in [OrderStatus::Shipped, OrderStatus::Completed, OrderStatus::Closed] {
            let mut order = pending_order(owner);
            order.status = from;
            assert!(matches!(
                order.apply(&cancel, Utc::now()),
                Err(DomainError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn admin_may_cancel_someone_elses_order() {
        let order = pending_order(Uuid::new_v4());
        let t = order
            .apply(
                &OrderAction::Cancel {
                    caller: Uuid::new_v4(),
                    is_admin: true,
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(t.to, OrderStatus::Closed);
    }

    #[test]
    fn confirm_completes_shipped_order() {
        let owner = Uuid::new_v4();
        let mut order = pending_order(owner);
        order.status = OrderStatus::Shipped;
        let t = order
            .apply(&OrderAction::Confirm { caller: owner }, Utc::now())
            .unwrap();
        assert_eq!(t.to, OrderStatus::Completed);
        assert!(!t.restock);
    }

    #[test]
    fn detail_visibility() {
        let owner = Uuid::new_v4();
        let order = pending_order(owner);
        assert!(order.ensure_viewable_by(owner, false).is_ok());
        assert!(order.ensure_viewable_by(Uuid::new_v4(), true).is_ok());
        assert_eq!(
            order.ensure_viewable_by(Uuid::new_v4(), false),
            Err(DomainError::Forbidden)
        );
    }
}
