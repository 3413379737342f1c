//! Catalog management route handlers.
//!
//! All routes require a logged-in admin; mutations additionally require an
//! editor role and, for edits and deletes, ownership of the product.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sugar_plum_core::{AdminUserId, CurrencyCode, Price, ProductId};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, require_editor};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::state::AppState;

/// Product data returned to the client.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Decimal,
    pub currency: String,
    pub owner_id: AdminUserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
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
            owner_id: product.owner_id,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Decimal,
    pub currency: Option<String>,
}

/// Request body for editing a product. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Restrict to one admin owner.
    pub owner: Option<i32>,
}

/// Response body after a delete.
#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub deleted: ProductId,
    /// Cart lines pruned along with the product.
    pub pruned_cart_lines: u64,
}

fn parse_currency(code: Option<&str>) -> Result<CurrencyCode> {
    code.map_or(Ok(CurrencyCode::default()), |code| {
        code.parse()
            .map_err(|e: String| AppError::BadRequest(e))
    })
}

fn parse_price(amount: Decimal, currency: CurrencyCode) -> Result<Price> {
    Price::new(amount, currency).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// List the whole catalog.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.owner.map(AdminUserId::new))
        .await?;

    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Product detail.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>> {
    let id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductView::from(&product)))
}

/// Create a product owned by the current admin.
#[instrument(skip(state, admin, body), fields(title = %body.title))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductView>)> {
    require_editor(&admin.0)?;

    if body.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_string()));
    }

    let currency = parse_currency(body.currency.as_deref())?;
    let price = parse_price(body.price, currency)?;

    let product = ProductRepository::new(state.pool())
        .create(
            admin.0.id,
            &NewProduct {
                title: body.title,
                description: body.description,
                image_url: body.image_url,
                price,
            },
        )
        .await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(ProductView::from(&product))))
}

/// Edit a product's mutable fields. Owner only.
#[instrument(skip(state, admin, body))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductView>> {
    require_editor(&admin.0)?;

    let id = ProductId::new(id);
    if body.price.is_some_and(|amount| amount < Decimal::ZERO) {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    let currency = body
        .currency
        .as_deref()
        .map(|code| {
            code.parse::<CurrencyCode>()
                .map_err(AppError::BadRequest)
        })
        .transpose()?;

    let changes = ProductChanges {
        title: body.title,
        description: body.description,
        image_url: body.image_url,
        price: body.price,
        currency,
    };

    let product = ProductRepository::new(state.pool())
        .update(id, admin.0.id, &changes)
        .await?;
    tracing::info!(product_id = %product.id, "product updated");

    Ok(Json(ProductView::from(&product)))
}

/// Delete a product. Owner only; prunes the product from every cart.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<DeleteProductResponse>> {
    require_editor(&admin.0)?;

    let id = ProductId::new(id);
    let pruned_cart_lines = ProductRepository::new(state.pool())
        .delete(id, admin.0.id)
        .await?;
    tracing::info!(product_id = %id, pruned_cart_lines, "product deleted");

    Ok(Json(DeleteProductResponse {
        deleted: id,
        pruned_cart_lines,
    }))
}
