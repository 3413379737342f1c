//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sugar_plum_core::{AdminUserId, ProductId};

use crate::db::products::{ProductFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Decimal,
    pub currency: String,
    pub display_price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            price: product.price.amount,
            currency: product.price.currency_code.code().to_string(),
            display_price: product.price.display(),
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Case-insensitive title search.
    pub q: Option<String>,
    /// Restrict to one admin owner.
    pub owner: Option<i32>,
    pub page: Option<u32>,
    pub per_page: Option<i64>,
}

/// Listing response body.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductView>,
    pub page: u32,
    pub per_page: i64,
}

/// List the catalog.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(50).clamp(1, 200);

    let filter = ProductFilter {
        search: query.q,
        owner_id: query.owner.map(AdminUserId::new),
        limit: Some(per_page),
        offset: i64::from(page - 1) * per_page,
    };

    let products = ProductRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(ProductListResponse {
        products: products.iter().map(ProductView::from).collect(),
        page,
        per_page,
    }))
}

/// Product detail, served from the read cache when warm.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>> {
    let id = ProductId::new(id);

    if let Some(product) = state.product_cache().get(&id).await {
        return Ok(Json(ProductView::from(&product)));
    }

    let product = ProductRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    state.product_cache().insert(id, product.clone()).await;

    Ok(Json(ProductView::from(&product)))
}
