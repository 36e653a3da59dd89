use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::{Address, ProductSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderAction, OrderDetail, OrderLine};
use crate::domain::ports::{
    AddressBook, ListScope, OrderFilter, OrderPage, OrderStore, PageRequest, ProductCatalog,
    PurchaseRecord,
};
use crate::domain::status::COUNTED_STATUSES;

#[derive(Default)]
struct State {
    orders: HashMap<Uuid, Order>,
    lines: HashMap<Uuid, Vec<OrderLine>>,
    products: HashMap<Uuid, ProductSnapshot>,
    addresses: HashMap<Uuid, Address>,
}

/// In-memory implementation of every port, sharing one mutex so each
/// operation is a single unit of work like its Postgres counterpart.
/// Backs the service and engine tests.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_product(&self, product: ProductSnapshot) {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .products
            .insert(product.id, product);
    }

    pub fn put_address(&self, address: Address) {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .addresses
            .insert(address.id, address);
    }

    pub fn stock_of(&self, product_id: Uuid) -> Option<i32> {
        self.state
            .lock()
            .expect("store mutex poisoned")
            .products
            .get(&product_id)
            .map(|p| p.stock)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("store mutex poisoned".to_string()))
    }
}

impl OrderStore for InMemoryStore {
    fn create_pending(&self, order: &Order, line: &OrderLine) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        // Check-and-decrement happens under the same lock, so concurrent
        // reservations of the last unit cannot both succeed.
        let product = state
            .products
            .get_mut(&line.product_id)
            .ok_or(DomainError::InsufficientStock)?;
        if product.stock < line.quantity {
            return Err(DomainError::InsufficientStock);
        }
        product.stock -= line.quantity;
        state.orders.insert(order.id, order.clone());
        state.lines.insert(order.id, vec![line.clone()]);
        Ok(())
    }

    fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, DomainError> {
        let state = self.lock()?;
        let Some(order) = state.orders.get(&id).cloned() else {
            return Ok(None);
        };
        let lines = state.lines.get(&id).cloned().unwrap_or_default();
        let address = state.addresses.get(&order.address_id).cloned();
        Ok(Some(OrderDetail {
            order,
            lines,
            address,
        }))
    }

    fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<OrderPage, DomainError> {
        let state = self.lock()?;
        let mut matched: Vec<&Order> = state
            .orders
            .values()
            .filter(|order| match filter.scope {
                ListScope::Owner(owner) => order.user_id == owner,
                ListScope::Admin => true,
            })
            .filter(|order| filter.status.map_or(true, |status| order.status == status))
            .filter(|order| {
                filter
                    .order_no
                    .as_deref()
                    .map_or(true, |needle| order.order_no.contains(needle))
            })
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(page.offset().max(0) as usize)
            .take(page.per_page.max(0) as usize)
            .map(|order| OrderDetail {
                order: order.clone(),
                lines: state.lines.get(&order.id).cloned().unwrap_or_default(),
                address: None,
            })
            .collect();
        Ok(OrderPage { items, total })
    }

    fn transition(&self, order_id: Uuid, action: OrderAction) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        let order = state
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(DomainError::OrderNotFound)?;
        let now = Utc::now();
        let transition = order.apply(&action, now)?;

        if transition.restock {
            let restock: Vec<(Uuid, i32)> = state
                .lines
                .get(&order_id)
                .map(|lines| lines.iter().map(|l| (l.product_id, l.quantity)).collect())
                .unwrap_or_default();
            for (product_id, quantity) in restock {
                if let Some(product) = state.products.get_mut(&product_id) {
                    product.stock += quantity;
                }
            }
        }

        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(DomainError::OrderNotFound)?;
        order.status = transition.to;
        order.updated_at = now;
        if let Some((pay_type, pay_time)) = transition.pay {
            order.pay_type = Some(pay_type);
            order.pay_time = Some(pay_time);
        }
        if let Some(logistics_no) = transition.logistics_no {
            order.logistics_no = Some(logistics_no);
        }
        Ok(())
    }

    fn purchase_history(&self) -> Result<Vec<PurchaseRecord>, DomainError> {
        let state = self.lock()?;
        let mut records = Vec::new();
        for order in state.orders.values() {
            if !COUNTED_STATUSES.contains(&order.status) {
                continue;
            }
            if let Some(lines) = state.lines.get(&order.id) {
                records.extend(lines.iter().map(|line| PurchaseRecord {
                    user_id: order.user_id,
                    product_id: line.product_id,
                }));
            }
        }
        Ok(records)
    }
}

impl ProductCatalog for InMemoryStore {
    fn find_product(&self, id: Uuid) -> Result<Option<ProductSnapshot>, DomainError> {
        Ok(self.lock()?.products.get(&id).cloned())
    }

    fn purchasable_products(&self) -> Result<Vec<ProductSnapshot>, DomainError> {
        let state = self.lock()?;
        let mut products: Vec<ProductSnapshot> = state
            .products
            .values()
            .filter(|p| p.purchasable())
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }
}

impl AddressBook for InMemoryStore {
    fn find_address(&self, id: Uuid) -> Result<Option<Address>, DomainError> {
        Ok(self.lock()?.addresses.get(&id).cloned())
    }
}
