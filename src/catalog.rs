//! Catalog rows and the storefront read endpoints.
//!
//! Storefront reads are visibility-filtered and sorted the way the wizard
//! steps consume them; the admin surface reads the same tables unfiltered.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{internal_error, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Species {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FullnessVariant {
    pub id: Uuid,
    pub species_id: Uuid,
    pub fullness_type: String,
    pub image_url: String,
    pub price_per_foot: Decimal,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpeciesHeight {
    pub id: Uuid,
    pub species_id: Uuid,
    pub height_feet: Decimal,
    pub price_per_foot: Decimal,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Stand {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub fits_up_to_feet: Option<i32>,
    pub visible: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wreath {
    pub id: Uuid,
    pub size: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub visible: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeliveryOption {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub fee: Decimal,
    pub visible: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list_species(
    State(s): State<AppState>,
) -> Result<Json<Vec<Species>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, Species>(
        "SELECT * FROM species WHERE visible = TRUE ORDER BY sort_order",
    )
    .fetch_all(&s.db)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}

pub async fn list_species_variants(
    State(s): State<AppState>,
    Path(species_id): Path<Uuid>,
) -> Result<Json<Vec<FullnessVariant>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, FullnessVariant>(
        "SELECT * FROM fullness_variants WHERE species_id = $1 AND available = TRUE ORDER BY fullness_type",
    )
    .bind(species_id)
    .fetch_all(&s.db)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}

pub async fn list_species_heights(
    State(s): State<AppState>,
    Path(species_id): Path<Uuid>,
) -> Result<Json<Vec<SpeciesHeight>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, SpeciesHeight>(
        "SELECT * FROM species_heights WHERE species_id = $1 AND available = TRUE ORDER BY height_feet",
    )
    .bind(species_id)
    .fetch_all(&s.db)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}

pub async fn list_stands(
    State(s): State<AppState>,
) -> Result<Json<Vec<Stand>>, (StatusCode, String)> {
    let rows =
        sqlx::query_as::<_, Stand>("SELECT * FROM stands WHERE visible = TRUE ORDER BY sort_order")
            .fetch_all(&s.db)
            .await
            .map_err(internal_error)?;
    Ok(Json(rows))
}

pub async fn list_wreaths(
    State(s): State<AppState>,
) -> Result<Json<Vec<Wreath>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, Wreath>(
        "SELECT * FROM wreaths WHERE visible = TRUE ORDER BY sort_order",
    )
    .fetch_all(&s.db)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}

pub async fn list_delivery_options(
    State(s): State<AppState>,
) -> Result<Json<Vec<DeliveryOption>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, DeliveryOption>(
        "SELECT * FROM delivery_options WHERE visible = TRUE ORDER BY sort_order",
    )
    .fetch_all(&s.db)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}
