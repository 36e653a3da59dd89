use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{CreateOrder, OrderDetail, PayType};
use crate::domain::ports::{ListScope, OrderFilter, PageRequest};
use crate::domain::status::OrderStatus;
use crate::errors::AppError;
use crate::AppContext;

use super::identity::Caller;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: Uuid,
    /// Number of units to purchase, at least 1.
    pub quantity: i32,
    pub address_id: Uuid,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayOrderRequest {
    /// One of ALIPAY, WECHAT, OTHER.
    pub pay_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShipOrderRequest {
    pub logistics_no: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku_id: Uuid,
    pub title: String,
    pub sku_title: Option<String>,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub quantity: i32,
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub receiver: String,
    pub phone: String,
    pub full_address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_no: String,
    pub user_id: Uuid,
    pub status: String,
    pub total_amount: String,
    pub pay_amount: String,
    pub pay_type: Option<String>,
    pub pay_time: Option<String>,
    pub logistics_no: Option<String>,
    pub remark: Option<String>,
    pub created_at: String,
    pub address: Option<AddressResponse>,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderDetail> for OrderResponse {
    fn from(detail: OrderDetail) -> Self {
        let order = detail.order;
        OrderResponse {
            id: order.id,
            order_no: order.order_no,
            user_id: order.user_id,
            status: order.status.as_str().to_string(),
            total_amount: order.total_amount.to_string(),
            pay_amount: order.pay_amount.to_string(),
            pay_type: order.pay_type.map(|p| p.as_str().to_string()),
            pay_time: order.pay_time.map(|t| t.to_rfc3339()),
            logistics_no: order.logistics_no,
            remark: order.remark,
            created_at: order.created_at.to_rfc3339(),
            address: detail.address.map(|a| AddressResponse {
                receiver: a.receiver.clone(),
                phone: a.phone.clone(),
                full_address: a.full_address(),
            }),
            lines: detail
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    id: l.id,
                    product_id: l.product_id,
                    sku_id: l.sku_id,
                    title: l.title,
                    sku_title: l.sku_title,
                    unit_price: l.unit_price.to_string(),
                    quantity: l.quantity,
                    subtotal: l.subtotal.to_string(),
                })
                .collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Optional status filter, e.g. PENDING or PAID.
    pub status: Option<String>,
    /// Optional order-number substring filter (admin scope only).
    pub order_no: Option<String>,
    /// Pass `all` to list every user's orders (requires admin capability).
    pub scope: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn parse_status_filter(s: &str) -> Result<OrderStatus, AppError> {
    OrderStatus::parse(s).map_err(|_| AppError::BadRequest(format!("unknown status filter '{s}'")))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checkout: validates the product and shipping address, then reserves
/// stock and persists the order with its line inside a single database
/// transaction. Insufficient stock at commit time fails the whole request.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 403, description = "Address not owned by caller"),
        (status = 409, description = "Insufficient stock"),
        (status = 422, description = "Product not available"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    ctx: web::Data<AppContext>,
    caller: Caller,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let cmd = CreateOrder {
        product_id: body.product_id,
        quantity: body.quantity,
        address_id: body.address_id,
        remark: body.remark,
    };

    let detail = web::block(move || ctx.orders.create_order(cmd, caller.user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(detail)))
}

/// GET /orders/{id}
///
/// Returns the order with its lines and shipping address. Owners see their
/// own orders; admins see everything.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Caller does not own the order"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    ctx: web::Data<AppContext>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let detail =
        web::block(move || ctx.orders.get_detail(order_id, caller.user_id, caller.is_admin))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(detail)))
}

/// GET /orders
///
/// Paginated listing, newest first. Defaults to the caller's own orders;
/// `scope=all` lists every order and requires admin capability.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("status" = Option<String>, Query, description = "Status filter"),
        ("order_no" = Option<String>, Query, description = "Order-number substring filter"),
        ("scope" = Option<String>, Query, description = "Pass 'all' for the admin scope"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 403, description = "Admin scope requested without capability"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    ctx: web::Data<AppContext>,
    caller: Caller,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let scope = match params.scope.as_deref() {
        Some("all") => {
            caller.ensure_admin()?;
            ListScope::Admin
        }
        _ => ListScope::Owner(caller.user_id),
    };
    let status = params
        .status
        .as_deref()
        .map(parse_status_filter)
        .transpose()?;
    let filter = OrderFilter {
        scope,
        status,
        order_no: params.order_no.filter(|s| !s.trim().is_empty()),
    };

    let result = web::block(move || {
        ctx.orders.list(
            &filter,
            PageRequest {
                page,
                per_page: limit,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// POST /orders/{id}/pay
///
/// Marks a pending order as paid. Payment settlement happens outside this
/// service; this endpoint only flips the status for the order's owner.
#[utoipa::path(
    post,
    path = "/orders/{id}/pay",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = PayOrderRequest,
    responses(
        (status = 204, description = "Order paid"),
        (status = 403, description = "Caller does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not pending"),
    ),
    tag = "orders"
)]
pub async fn pay_order(
    ctx: web::Data<AppContext>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<PayOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let pay_type = PayType::parse(&body.pay_type).map_err(AppError::from)?;

    web::block(move || ctx.orders.pay(order_id, caller.user_id, pay_type))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /orders/{id}/ship
///
/// Admin action: marks a paid order as shipped and records the logistics
/// tracking number.
#[utoipa::path(
    post,
    path = "/orders/{id}/ship",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = ShipOrderRequest,
    responses(
        (status = 204, description = "Order shipped"),
        (status = 403, description = "Admin capability required"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not paid"),
    ),
    tag = "orders"
)]
pub async fn ship_order(
    ctx: web::Data<AppContext>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<ShipOrderRequest>,
) -> Result<HttpResponse, AppError> {
    caller.ensure_admin()?;
    let order_id = path.into_inner();
    let logistics_no = body.into_inner().logistics_no;

    web::block(move || ctx.orders.ship(order_id, logistics_no))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /orders/{id}/confirm
///
/// The owner confirms receipt of a shipped order, completing it.
#[utoipa::path(
    post,
    path = "/orders/{id}/confirm",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 204, description = "Order completed"),
        (status = 403, description = "Caller does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not shipped"),
    ),
    tag = "orders"
)]
pub async fn confirm_order(
    ctx: web::Data<AppContext>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || ctx.orders.confirm(order_id, caller.user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /orders/{id}/cancel
///
/// Cancels a pending or paid order and returns its reserved stock to
/// inventory. Owners may cancel their own orders; admins may cancel any.
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 204, description = "Order closed and stock restored"),
        (status = 403, description = "Caller does not own the order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already shipped or terminal"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    ctx: web::Data<AppContext>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || ctx.orders.cancel(order_id, caller.user_id, caller.is_admin))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
