//! Order submission, quoting, and admin order management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::domain::draft::{OrderDraft, StandSelection, TreeSelection, WreathSelection};
use crate::domain::pricing::OrderTotals;
use crate::notify::OrderNotification;
use crate::{internal_error, AppState};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub order_number: String,
    pub delivery_option_id: Uuid,
    pub delivery_fee: Decimal,
    pub preferred_delivery_date: Option<NaiveDate>,
    pub preferred_delivery_time: Option<String>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_street: String,
    pub delivery_unit: Option<String>,
    pub delivery_city: String,
    pub delivery_state: String,
    pub delivery_zip: String,
    pub total_amount: Decimal,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderTreeRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub species_id: Uuid,
    pub fullness_type: String,
    pub height_feet: Decimal,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub fresh_cut: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderStandRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub stand_id: Option<Uuid>,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub is_own_stand: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderWreathRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub wreath_id: Uuid,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Order header with its line-item rows, as the admin panel consumes it.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderRow,
    pub trees: Vec<OrderTreeRow>,
    pub stands: Vec<OrderStandRow>,
    pub wreaths: Vec<OrderWreathRow>,
}

/// The only statuses an order ever takes; transitions happen exclusively
/// through the admin surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Fulfilled,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Canceled => "canceled",
        }
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// Itemized totals rounded for display. The submission handler derives its
/// persisted total from the same [`OrderTotals`], so the quoted figure is the
/// confirmed figure.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub trees: Decimal,
    pub stands: Decimal,
    pub wreaths: Decimal,
    pub delivery_fee: Decimal,
    pub grand_total: Decimal,
}

impl From<OrderTotals> for QuoteResponse {
    fn from(totals: OrderTotals) -> Self {
        Self {
            trees: totals.trees.rounded(),
            stands: totals.stands.rounded(),
            wreaths: totals.wreaths.rounded(),
            delivery_fee: totals.delivery_fee.rounded(),
            grand_total: totals.grand_total.rounded(),
        }
    }
}

pub async fn quote_order(Json(draft): Json<OrderDraft>) -> Json<QuoteResponse> {
    Json(OrderTotals::for_draft(&draft).into())
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub id: Uuid,
    pub order_number: String,
    pub total_amount: Decimal,
}

fn validate_draft(draft: &OrderDraft) -> Result<(), String> {
    if draft.trees.is_empty() {
        return Err("at least one tree is required".to_string());
    }
    if draft.delivery.is_none() {
        return Err("a delivery option is required".to_string());
    }
    draft.contact.validate().map_err(|e| e.to_string())
}

fn new_order_number() -> String {
    format!("ORD-{:08}", rand::random::<u32>())
}

/// Persists a finalized draft: header first, then the three line-item batches
/// concurrently. A failed batch rolls the header back before the error is
/// surfaced, so a pending header never outlives a failed submission. The
/// staff notification runs detached afterwards.
pub async fn submit_order(
    State(s): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<SubmitResponse>), (StatusCode, String)> {
    validate_draft(&draft).map_err(|msg| (StatusCode::UNPROCESSABLE_ENTITY, msg))?;

    let totals = OrderTotals::for_draft(&draft);
    let Some(delivery) = draft.delivery.as_ref() else {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "a delivery option is required".to_string(),
        ));
    };
    let contact = &draft.contact;
    let unit = Some(contact.unit.clone()).filter(|u| !u.is_empty());
    let notes = Some(contact.notes.clone()).filter(|n| !n.is_empty());

    let order = sqlx::query_as::<_, OrderRow>(
        "INSERT INTO orders (id, order_number, delivery_option_id, delivery_fee, preferred_delivery_date, preferred_delivery_time, customer_first_name, customer_last_name, customer_email, customer_phone, delivery_street, delivery_unit, delivery_city, delivery_state, delivery_zip, total_amount, status, notes, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, 'pending', $17, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(new_order_number())
    .bind(delivery.id)
    .bind(delivery.fee.rounded())
    .bind(draft.schedule.date)
    .bind(&draft.schedule.time)
    .bind(&contact.first_name)
    .bind(&contact.last_name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.street)
    .bind(unit)
    .bind(&contact.city)
    .bind(&contact.state)
    .bind(&contact.zip)
    .bind(totals.grand_total.rounded())
    .bind(notes)
    .fetch_one(&s.db)
    .await
    .map_err(internal_error)?;

    let (trees_res, stands_res, wreaths_res) = tokio::join!(
        insert_order_trees(&s.db, order.id, &draft.trees),
        insert_order_stands(&s.db, order.id, &draft.stands),
        insert_order_wreaths(&s.db, order.id, &draft.wreaths),
    );

    if let Err(e) = trees_res.and(stands_res).and(wreaths_res) {
        // compensating delete: the header must not survive a failed submission
        if let Err(cleanup) = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order.id)
            .execute(&s.db)
            .await
        {
            tracing::error!(order_id = %order.id, error = %cleanup, "failed to roll back order header");
        }
        return Err(internal_error(e));
    }

    let notification = OrderNotification::from_draft(&order.order_number, &draft);
    let notifier = s.notifier.clone();
    let order_number = order.order_number.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            tracing::warn!(order_number = %order_number, error = %e, "order notification failed");
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            id: order.id,
            order_number: order.order_number,
            total_amount: order.total_amount,
        }),
    ))
}

async fn insert_order_trees(
    db: &PgPool,
    order_id: Uuid,
    trees: &[TreeSelection],
) -> sqlx::Result<()> {
    for tree in trees {
        sqlx::query(
            "INSERT INTO order_trees (id, order_id, species_id, fullness_type, height_feet, unit_price, quantity, fresh_cut, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())",
        )
        .bind(Uuid::now_v7())
        .bind(order_id)
        .bind(tree.species_id)
        .bind(tree.fullness.as_str())
        .bind(tree.height_feet)
        .bind(tree.unit_price().rounded())
        .bind(tree.quantity as i32)
        .bind(tree.fresh_cut)
        .execute(db)
        .await?;
    }
    Ok(())
}

async fn insert_order_stands(
    db: &PgPool,
    order_id: Uuid,
    stands: &[StandSelection],
) -> sqlx::Result<()> {
    for stand in stands {
        sqlx::query(
            "INSERT INTO order_stands (id, order_id, stand_id, unit_price, quantity, is_own_stand, created_at) VALUES ($1, $2, $3, $4, $5, $6, NOW())",
        )
        .bind(Uuid::now_v7())
        .bind(order_id)
        .bind(stand.stand_id)
        .bind(stand.unit_price.rounded())
        .bind(stand.quantity as i32)
        .bind(stand.has_own)
        .execute(db)
        .await?;
    }
    Ok(())
}

async fn insert_order_wreaths(
    db: &PgPool,
    order_id: Uuid,
    wreaths: &[WreathSelection],
) -> sqlx::Result<()> {
    for wreath in wreaths {
        sqlx::query(
            "INSERT INTO order_wreaths (id, order_id, wreath_id, unit_price, quantity, created_at) VALUES ($1, $2, $3, $4, $5, NOW())",
        )
        .bind(Uuid::now_v7())
        .bind(order_id)
        .bind(wreath.wreath_id)
        .bind(wreath.unit_price.rounded())
        .bind(wreath.quantity as i32)
        .execute(db)
        .await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

pub async fn list_orders(
    State(s): State<AppState>,
) -> Result<Json<Vec<OrderDetail>>, (StatusCode, String)> {
    let orders = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(&s.db)
        .await
        .map_err(internal_error)?;
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

    // child tables are independent; fetch them together and join in memory
    let (trees, stands, wreaths) = tokio::join!(
        sqlx::query_as::<_, OrderTreeRow>("SELECT * FROM order_trees WHERE order_id = ANY($1)")
            .bind(&ids)
            .fetch_all(&s.db),
        sqlx::query_as::<_, OrderStandRow>("SELECT * FROM order_stands WHERE order_id = ANY($1)")
            .bind(&ids)
            .fetch_all(&s.db),
        sqlx::query_as::<_, OrderWreathRow>("SELECT * FROM order_wreaths WHERE order_id = ANY($1)")
            .bind(&ids)
            .fetch_all(&s.db),
    );
    let (trees, stands, wreaths) = (
        trees.map_err(internal_error)?,
        stands.map_err(internal_error)?,
        wreaths.map_err(internal_error)?,
    );

    let mut trees_by_order: HashMap<Uuid, Vec<OrderTreeRow>> = HashMap::new();
    for row in trees {
        trees_by_order.entry(row.order_id).or_default().push(row);
    }
    let mut stands_by_order: HashMap<Uuid, Vec<OrderStandRow>> = HashMap::new();
    for row in stands {
        stands_by_order.entry(row.order_id).or_default().push(row);
    }
    let mut wreaths_by_order: HashMap<Uuid, Vec<OrderWreathRow>> = HashMap::new();
    for row in wreaths {
        wreaths_by_order.entry(row.order_id).or_default().push(row);
    }

    let details = orders
        .into_iter()
        .map(|order| OrderDetail {
            trees: trees_by_order.remove(&order.id).unwrap_or_default(),
            stands: stands_by_order.remove(&order.id).unwrap_or_default(),
            wreaths: wreaths_by_order.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect();
    Ok(Json(details))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

pub async fn update_order_status(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateStatusRequest>,
) -> Result<Json<OrderRow>, (StatusCode, String)> {
    sqlx::query_as::<_, OrderRow>("UPDATE orders SET status = $2 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(r.status.as_str())
        .fetch_optional(&s.db)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "order not found".to_string()))
}

pub async fn delete_order(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await
        .map_err(internal_error)?;
    if result.rows_affected() == 0 {
        return Err((StatusCode::NOT_FOUND, "order not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draft::{ContactInfo, DeliveryChoice, Fullness, WreathSize};
    use crate::domain::value_objects::Dollars;
    use rust_decimal_macros::dec;

    fn complete_draft() -> OrderDraft {
        OrderDraft::new()
            .with_tree(TreeSelection {
                species_id: Uuid::new_v4(),
                species_name: "Fraser Fir".to_string(),
                fullness: Fullness::Medium,
                height_feet: dec!(7),
                price_per_foot: Dollars::new(dec!(20)),
                quantity: 1,
                fresh_cut: false,
                image_url: String::new(),
            })
            .set_wreath_quantity(Uuid::new_v4(), WreathSize::Small, Dollars::new(dec!(15)), 1)
            .with_delivery(DeliveryChoice {
                id: Uuid::new_v4(),
                name: "Standard Delivery".to_string(),
                fee: Dollars::new(dec!(25)),
            })
            .with_contact(ContactInfo {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: "jane@example.com".into(),
                phone: "555-0100".into(),
                street: "1 Pine Rd".into(),
                city: "Midvale".into(),
                state: "UT".into(),
                zip: "84047".into(),
                ..Default::default()
            })
    }

    #[test]
    fn test_validate_requires_a_tree() {
        let mut draft = complete_draft();
        draft.trees.clear();
        assert_eq!(
            validate_draft(&draft),
            Err("at least one tree is required".to_string())
        );
    }

    #[test]
    fn test_validate_requires_delivery() {
        let mut draft = complete_draft();
        draft.delivery = None;
        assert_eq!(
            validate_draft(&draft),
            Err("a delivery option is required".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut draft = complete_draft();
        draft.contact.email = "not-an-email".into();
        assert!(validate_draft(&draft).is_err());
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        assert_eq!(validate_draft(&complete_draft()), Ok(()));
    }

    #[test]
    fn test_quote_matches_submission_total() {
        let draft = complete_draft();
        let quote = QuoteResponse::from(OrderTotals::for_draft(&draft));
        let persisted_total = OrderTotals::for_draft(&draft).grand_total.rounded();
        assert_eq!(quote.grand_total, persisted_total);
        assert_eq!(quote.grand_total, dec!(180.00));
    }

    #[test]
    fn test_order_number_shape() {
        let n = new_order_number();
        assert!(n.starts_with("ORD-"));
        assert!(n.len() >= 12);
        assert!(n["ORD-".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_status_round_trip() {
        for (status, s) in [
            (OrderStatus::Pending, "pending"),
            (OrderStatus::Fulfilled, "fulfilled"),
            (OrderStatus::Canceled, "canceled"),
        ] {
            assert_eq!(status.as_str(), s);
            let parsed: OrderStatus = serde_json::from_value(serde_json::json!(s)).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(serde_json::from_value::<OrderStatus>(serde_json::json!("shipped")).is_err());
    }
}
