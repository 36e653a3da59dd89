use uuid::Uuid;

use super::catalog::{Address, ProductSnapshot};
use super::errors::DomainError;
use super::order::{Order, OrderAction, OrderDetail, OrderLine};
use super::status::OrderStatus;

/// Listing scope: users see their own orders, admins see everything.
#[derive(Debug, Clone, Copy)]
pub enum ListScope {
    Owner(Uuid),
    Admin,
}

#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub scope: ListScope,
    pub status: Option<OrderStatus>,
    /// Substring match on the order number (admin listing).
    pub order_no: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn offset(self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<OrderDetail>,
    pub total: i64,
}

/// One purchased product occurrence, keyed by the buying user.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseRecord {
    pub user_id: Uuid,
    pub product_id: Uuid,
}

/// Persistence seam for the order aggregate. Implementations own the
/// transaction boundary: each method is a single unit of work.
pub trait OrderStore: Send + Sync + 'static {
    /// Atomically reserve the line's quantity from inventory and persist
    /// the pending aggregate. Nothing is persisted when reservation fails.
    fn create_pending(&self, order: &Order, line: &OrderLine) -> Result<(), DomainError>;

    fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, DomainError>;

    fn list(&self, filter: &OrderFilter, page: PageRequest) -> Result<OrderPage, DomainError>;

    /// Load the order under a write lock, apply the action, and persist
    /// its effect (including any restock) in one unit of work.
    fn transition(&self, order_id: Uuid, action: OrderAction) -> Result<(), DomainError>;

    /// (user, product) pairs from every order in a counted status.
    fn purchase_history(&self) -> Result<Vec<PurchaseRecord>, DomainError>;
}

/// Read-only view of the product catalog.
pub trait ProductCatalog: Send + Sync + 'static {
    fn find_product(&self, id: Uuid) -> Result<Option<ProductSnapshot>, DomainError>;

    /// Products currently on sale with stock, newest first.
    fn purchasable_products(&self) -> Result<Vec<ProductSnapshot>, DomainError>;
}

/// Read-only view of the user address book.
pub trait AddressBook: Send + Sync + 'static {
    fn find_address(&self, id: Uuid) -> Result<Option<Address>, DomainError>;
}
