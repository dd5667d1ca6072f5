//! Admin catalog management.
//!
//! Listings are unfiltered (hidden rows included), creates seed the fixed
//! defaults the storefront expects, and PATCH handlers apply only the fields
//! present in the request, since the panel writes single-field updates as
//! inputs lose focus.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::{DeliveryOption, FullnessVariant, Species, SpeciesHeight, Stand, Wreath};
use crate::domain::draft::WreathSize;
use crate::{internal_error, AppState};

/// Every new species starts with these variant stubs, hidden until priced.
const SEED_FULLNESS_TYPES: [&str; 3] = ["thin", "medium", "full"];
/// Default selling heights provisioned for a new species, in feet.
const SEED_HEIGHTS_FEET: [i32; 6] = [5, 6, 7, 8, 9, 10];

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

pub async fn list_species(
    State(s): State<AppState>,
) -> Result<Json<Vec<Species>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, Species>("SELECT * FROM species ORDER BY sort_order")
        .fetch_all(&s.db)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateSpeciesRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Creates a species along with its fixed seed: three fullness-variant stubs
/// (unavailable, zero price) and the six default height tiers (available,
/// zero price). One transaction, so a species never exists half-seeded.
pub async fn create_species(
    State(s): State<AppState>,
    Json(r): Json<CreateSpeciesRequest>,
) -> Result<(StatusCode, Json<Species>), (StatusCode, String)> {
    if r.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "species name is required".to_string(),
        ));
    }

    let mut tx = s.db.begin().await.map_err(internal_error)?;

    let species = sqlx::query_as::<_, Species>(
        "INSERT INTO species (id, name, description, sort_order, visible, created_at, updated_at) VALUES ($1, $2, $3, $4, TRUE, NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(r.name.trim())
    .bind(&r.description)
    .bind(r.sort_order)
    .fetch_one(&mut *tx)
    .await
    .map_err(internal_error)?;

    for fullness in SEED_FULLNESS_TYPES {
        sqlx::query(
            "INSERT INTO fullness_variants (id, species_id, fullness_type, image_url, price_per_foot, available, created_at, updated_at) VALUES ($1, $2, $3, '', 0, FALSE, NOW(), NOW())",
        )
        .bind(Uuid::now_v7())
        .bind(species.id)
        .bind(fullness)
        .execute(&mut *tx)
        .await
        .map_err(internal_error)?;
    }

    for feet in SEED_HEIGHTS_FEET {
        sqlx::query(
            "INSERT INTO species_heights (id, species_id, height_feet, price_per_foot, available, created_at) VALUES ($1, $2, $3, 0, TRUE, NOW())",
        )
        .bind(Uuid::now_v7())
        .bind(species.id)
        .bind(Decimal::from(feet))
        .execute(&mut *tx)
        .await
        .map_err(internal_error)?;
    }

    tx.commit().await.map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(species)))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSpeciesRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub visible: Option<bool>,
}

pub async fn update_species(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateSpeciesRequest>,
) -> Result<Json<Species>, (StatusCode, String)> {
    sqlx::query_as::<_, Species>(
        "UPDATE species SET name = COALESCE($2, name), description = COALESCE($3, description), sort_order = COALESCE($4, sort_order), visible = COALESCE($5, visible), updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.name)
    .bind(r.description)
    .bind(r.sort_order)
    .bind(r.visible)
    .fetch_optional(&s.db)
    .await
    .map_err(internal_error)?
    .map(Json)
    .ok_or((StatusCode::NOT_FOUND, "species not found".to_string()))
}

// ---------------------------------------------------------------------------
// Fullness variants
// ---------------------------------------------------------------------------

pub async fn list_variants(
    State(s): State<AppState>,
    Path(species_id): Path<Uuid>,
) -> Result<Json<Vec<FullnessVariant>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, FullnessVariant>(
        "SELECT * FROM fullness_variants WHERE species_id = $1 ORDER BY fullness_type",
    )
    .bind(species_id)
    .fetch_all(&s.db)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVariantRequest {
    pub image_url: Option<String>,
    pub price_per_foot: Option<Decimal>,
    pub available: Option<bool>,
}

pub async fn update_variant(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateVariantRequest>,
) -> Result<Json<FullnessVariant>, (StatusCode, String)> {
    sqlx::query_as::<_, FullnessVariant>(
        "UPDATE fullness_variants SET image_url = COALESCE($2, image_url), price_per_foot = COALESCE($3, price_per_foot), available = COALESCE($4, available), updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.image_url)
    .bind(r.price_per_foot)
    .bind(r.available)
    .fetch_optional(&s.db)
    .await
    .map_err(internal_error)?
    .map(Json)
    .ok_or((StatusCode::NOT_FOUND, "variant not found".to_string()))
}

// ---------------------------------------------------------------------------
// Height tiers
// ---------------------------------------------------------------------------

pub async fn list_heights(
    State(s): State<AppState>,
    Path(species_id): Path<Uuid>,
) -> Result<Json<Vec<SpeciesHeight>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, SpeciesHeight>(
        "SELECT * FROM species_heights WHERE species_id = $1 ORDER BY height_feet",
    )
    .bind(species_id)
    .fetch_all(&s.db)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateHeightRequest {
    pub height_feet: Decimal,
    #[serde(default)]
    pub price_per_foot: Decimal,
}

pub async fn create_height(
    State(s): State<AppState>,
    Path(species_id): Path<Uuid>,
    Json(r): Json<CreateHeightRequest>,
) -> Result<(StatusCode, Json<SpeciesHeight>), (StatusCode, String)> {
    let exists: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM species_heights WHERE species_id = $1 AND height_feet = $2)",
    )
    .bind(species_id)
    .bind(r.height_feet)
    .fetch_one(&s.db)
    .await
    .map_err(internal_error)?;
    if exists.0 {
        return Err((
            StatusCode::CONFLICT,
            "this height already exists for this species".to_string(),
        ));
    }

    let row = sqlx::query_as::<_, SpeciesHeight>(
        "INSERT INTO species_heights (id, species_id, height_feet, price_per_foot, available, created_at) VALUES ($1, $2, $3, $4, TRUE, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(species_id)
    .bind(r.height_feet)
    .bind(r.price_per_foot)
    .fetch_one(&s.db)
    .await
    .map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHeightRequest {
    pub price_per_foot: Option<Decimal>,
    pub available: Option<bool>,
}

pub async fn update_height(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateHeightRequest>,
) -> Result<Json<SpeciesHeight>, (StatusCode, String)> {
    sqlx::query_as::<_, SpeciesHeight>(
        "UPDATE species_heights SET price_per_foot = COALESCE($2, price_per_foot), available = COALESCE($3, available) WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.price_per_foot)
    .bind(r.available)
    .fetch_optional(&s.db)
    .await
    .map_err(internal_error)?
    .map(Json)
    .ok_or((StatusCode::NOT_FOUND, "height not found".to_string()))
}

pub async fn delete_height(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let result = sqlx::query("DELETE FROM species_heights WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await
        .map_err(internal_error)?;
    if result.rows_affected() == 0 {
        return Err((StatusCode::NOT_FOUND, "height not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Stands
// ---------------------------------------------------------------------------

pub async fn list_stands(
    State(s): State<AppState>,
) -> Result<Json<Vec<Stand>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, Stand>("SELECT * FROM stands ORDER BY sort_order")
        .fetch_all(&s.db)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateStandRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    pub fits_up_to_feet: Option<i32>,
    #[serde(default)]
    pub sort_order: i32,
}

pub async fn create_stand(
    State(s): State<AppState>,
    Json(r): Json<CreateStandRequest>,
) -> Result<(StatusCode, Json<Stand>), (StatusCode, String)> {
    if r.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "stand name is required".to_string(),
        ));
    }
    let row = sqlx::query_as::<_, Stand>(
        "INSERT INTO stands (id, name, description, price, fits_up_to_feet, visible, sort_order, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, TRUE, $6, NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(r.name.trim())
    .bind(r.description)
    .bind(r.price)
    .bind(r.fits_up_to_feet)
    .bind(r.sort_order)
    .fetch_one(&s.db)
    .await
    .map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStandRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub fits_up_to_feet: Option<i32>,
    pub visible: Option<bool>,
    pub sort_order: Option<i32>,
}

pub async fn update_stand(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateStandRequest>,
) -> Result<Json<Stand>, (StatusCode, String)> {
    sqlx::query_as::<_, Stand>(
        "UPDATE stands SET name = COALESCE($2, name), description = COALESCE($3, description), price = COALESCE($4, price), fits_up_to_feet = COALESCE($5, fits_up_to_feet), visible = COALESCE($6, visible), sort_order = COALESCE($7, sort_order), updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.name)
    .bind(r.description)
    .bind(r.price)
    .bind(r.fits_up_to_feet)
    .bind(r.visible)
    .bind(r.sort_order)
    .fetch_optional(&s.db)
    .await
    .map_err(internal_error)?
    .map(Json)
    .ok_or((StatusCode::NOT_FOUND, "stand not found".to_string()))
}

// ---------------------------------------------------------------------------
// Wreaths
// ---------------------------------------------------------------------------

pub async fn list_wreaths(
    State(s): State<AppState>,
) -> Result<Json<Vec<Wreath>>, (StatusCode, String)> {
    let rows = sqlx::query_as::<_, Wreath>("SELECT * FROM wreaths ORDER BY sort_order")
        .fetch_all(&s.db)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateWreathRequest {
    pub size: WreathSize,
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub sort_order: i32,
}

pub async fn create_wreath(
    State(s): State<AppState>,
    Json(r): Json<CreateWreathRequest>,
) -> Result<(StatusCode, Json<Wreath>), (StatusCode, String)> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM wreaths WHERE size = $1)")
        .bind(r.size.as_str())
        .fetch_one(&s.db)
        .await
        .map_err(internal_error)?;
    if exists.0 {
        return Err((
            StatusCode::CONFLICT,
            "a wreath with this size already exists".to_string(),
        ));
    }

    let row = sqlx::query_as::<_, Wreath>(
        "INSERT INTO wreaths (id, size, description, price, visible, sort_order, created_at, updated_at) VALUES ($1, $2, $3, $4, TRUE, $5, NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(r.size.as_str())
    .bind(r.description)
    .bind(r.price)
    .bind(r.sort_order)
    .fetch_one(&s.db)
    .await
    .map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWreathRequest {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub visible: Option<bool>,
    pub sort_order: Option<i32>,
}

pub async fn update_wreath(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateWreathRequest>,
) -> Result<Json<Wreath>, (StatusCode, String)> {
    sqlx::query_as::<_, Wreath>(
        "UPDATE wreaths SET description = COALESCE($2, description), price = COALESCE($3, price), visible = COALESCE($4, visible), sort_order = COALESCE($5, sort_order), updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.description)
    .bind(r.price)
    .bind(r.visible)
    .bind(r.sort_order)
    .fetch_optional(&s.db)
    .await
    .map_err(internal_error)?
    .map(Json)
    .ok_or((StatusCode::NOT_FOUND, "wreath not found".to_string()))
}

// ---------------------------------------------------------------------------
// Delivery options
// ---------------------------------------------------------------------------

pub async fn list_delivery_options(
    State(s): State<AppState>,
) -> Result<Json<Vec<DeliveryOption>>, (StatusCode, String)> {
    let rows =
        sqlx::query_as::<_, DeliveryOption>("SELECT * FROM delivery_options ORDER BY sort_order")
            .fetch_all(&s.db)
            .await
            .map_err(internal_error)?;
    Ok(Json(rows))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeliveryOptionRequest {
    pub description: Option<String>,
    pub fee: Option<Decimal>,
    pub visible: Option<bool>,
}

pub async fn update_delivery_option(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateDeliveryOptionRequest>,
) -> Result<Json<DeliveryOption>, (StatusCode, String)> {
    sqlx::query_as::<_, DeliveryOption>(
        "UPDATE delivery_options SET description = COALESCE($2, description), fee = COALESCE($3, fee), visible = COALESCE($4, visible), updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.description)
    .bind(r.fee)
    .bind(r.visible)
    .fetch_optional(&s.db)
    .await
    .map_err(internal_error)?
    .map(Json)
    .ok_or((StatusCode::NOT_FOUND, "delivery option not found".to_string()))
}
