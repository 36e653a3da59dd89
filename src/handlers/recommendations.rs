use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppContext;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendParams {
    /// Maximum number of recommendations. Defaults to 10, maximum 50.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendResponse {
    pub product_ids: Vec<Uuid>,
}

/// GET /products/{id}/recommendations
///
/// Products frequently bought together with the given one, ranked by
/// co-purchase similarity; padded with same-category then any-category
/// purchasable products when history is thin.
#[utoipa::path(
    get,
    path = "/products/{id}/recommendations",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
        ("limit" = Option<usize>, Query, description = "Maximum results (default 10, max 50)"),
    ),
    responses(
        (status = 200, description = "Ranked product ids", body = RecommendResponse),
    ),
    tag = "recommendations"
)]
pub async fn recommend_products(
    ctx: web::Data<AppContext>,
    path: web::Path<Uuid>,
    query: web::Query<RecommendParams>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let limit = query.limit.min(50);

    let product_ids = web::block(move || ctx.recommender.recommend(product_id, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(RecommendResponse { product_ids }))
}
