use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    CreateOrder, Order, OrderAction, OrderDetail, OrderLine, PayType,
};
use crate::domain::ports::{AddressBook, OrderFilter, OrderPage, OrderStore, PageRequest, ProductCatalog};

/// Order lifecycle service. Holds the persistence seam and the two
/// collaborators consulted at checkout; constructed once and shared.
pub struct OrderLifecycle<S, C, A> {
    store: S,
    catalog: C,
    addresses: A,
}

impl<S, C, A> OrderLifecycle<S, C, A>
where
    S: OrderStore,
    C: ProductCatalog,
    A: AddressBook,
{
    pub fn new(store: S, catalog: C, addresses: A) -> Self {
        Self {
            store,
            catalog,
            addresses,
        }
    }

    /// Checkout: validate product and address, snapshot the price, then
    /// reserve stock and persist the pending aggregate in one unit of
    /// work. Stock is checked again atomically at reservation time, so a
    /// concurrent buyer cannot slip past the validation read.
    pub fn create_order(&self, cmd: CreateOrder, owner: Uuid) -> Result<OrderDetail, DomainError> {
        if cmd.quantity < 1 {
            return Err(DomainError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .catalog
            .find_product(cmd.product_id)?
            .ok_or(DomainError::ProductUnavailable)?;
        if !product.on_sale() {
            return Err(DomainError::ProductUnavailable);
        }
        if !product.has_stock_for(cmd.quantity) {
            return Err(DomainError::InsufficientStock);
        }

        // A missing address and a foreign address are deliberately
        // indistinguishable to the caller.
        let address = self
            .addresses
            .find_address(cmd.address_id)?
            .filter(|a| a.user_id == owner)
            .ok_or(DomainError::AddressNotOwned)?;

        let now = Utc::now();
        let total = product.price.clone() * BigDecimal::from(cmd.quantity);
        let order = Order::pending(owner, address.id, cmd.remark, total, now);
        let line = OrderLine::snapshot(order.id, &product, cmd.quantity, now);

        self.store.create_pending(&order, &line)?;
        log::info!(
            "order {} created for user {}: {} x{}",
            order.order_no,
            owner,
            product.id,
            cmd.quantity
        );

        Ok(OrderDetail {
            order,
            lines: vec![line],
            address: Some(address),
        })
    }

    pub fn get_detail(
        &self,
        order_id: Uuid,
        caller: Uuid,
        is_admin: bool,
    ) -> Result<OrderDetail, DomainError> {
        let detail = self
            .store
            .find_detail(order_id)?
            .ok_or(DomainError::OrderNotFound)?;
        detail.order.ensure_viewable_by(caller, is_admin)?;
        Ok(detail)
    }

    pub fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<OrderPage, DomainError> {
        self.store.list(filter, page)
    }

    pub fn pay(&self, order_id: Uuid, caller: Uuid, pay_type: PayType) -> Result<(), DomainError> {
        self.store
            .transition(order_id, OrderAction::Pay { caller, pay_type })?;
        log::info!("order {} paid via {}", order_id, pay_type.as_str());
        Ok(())
    }

    pub fn ship(&self, order_id: Uuid, logistics_no: String) -> Result<(), DomainError> {
        let logged = logistics_no.clone();
        self.store
            .transition(order_id, OrderAction::Ship { logistics_no })?;
        log::info!("order {} shipped, logistics no {}", order_id, logged);
        Ok(())
    }

    pub fn confirm(&self, order_id: Uuid, caller: Uuid) -> Result<(), DomainError> {
        self.store
            .transition(order_id, OrderAction::Confirm { caller })?;
        log::info!("order {} confirmed by {}", order_id, caller);
        Ok(())
    }

    pub fn cancel(&self, order_id: Uuid, caller: Uuid, is_admin: bool) -> Result<(), DomainError> {
        self.store
            .transition(order_id, OrderAction::Cancel { caller, is_admin })?;
        log::info!("order {} cancelled", order_id);
        Ok(())
    }
}
