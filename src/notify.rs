//! Staff notification client.
//!
//! One JSON POST to the configured endpoint per confirmed order. The call is
//! best-effort: the submission path spawns it detached, logs failures, and
//! never lets them block or roll back a confirmed order.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::draft::OrderDraft;
use crate::domain::pricing::OrderTotals;

const NOT_SPECIFIED: &str = "Not specified";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLine {
    pub species_name: String,
    pub height: Decimal,
    pub fullness: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub fresh_cut: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WreathLine {
    pub size: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Payload shape the notification endpoint expects.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub delivery_date: String,
    pub delivery_time: String,
    pub trees: Vec<TreeLine>,
    pub stands: Vec<StandLine>,
    pub wreaths: Vec<WreathLine>,
    pub delivery_option: String,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderNotification {
    pub fn from_draft(order_number: &str, draft: &OrderDraft) -> Self {
        let totals = OrderTotals::for_draft(draft);
        let contact = &draft.contact;

        let city_line = format!("{}, {} {}", contact.city, contact.state, contact.zip);
        let delivery_address = [contact.street.as_str(), contact.unit.as_str(), city_line.as_str()]
            .iter()
            .filter(|line| !line.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            order_number: order_number.to_string(),
            customer_name: format!("{} {}", contact.first_name, contact.last_name),
            customer_email: contact.email.clone(),
            customer_phone: contact.phone.clone(),
            delivery_address,
            delivery_date: draft
                .schedule
                .date
                .map(|d| d.format("%m/%d/%Y").to_string())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            delivery_time: draft
                .schedule
                .time
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            trees: draft
                .trees
                .iter()
                .map(|t| TreeLine {
                    species_name: t.species_name.clone(),
                    height: t.height_feet,
                    fullness: t.fullness.as_str().to_string(),
                    quantity: t.quantity,
                    unit_price: t.unit_price().rounded(),
                    fresh_cut: t.fresh_cut,
                })
                .collect(),
            stands: draft
                .stands
                .iter()
                .map(|s| StandLine {
                    name: s.name.clone(),
                    quantity: s.quantity,
                    unit_price: s.unit_price.rounded(),
                })
                .collect(),
            wreaths: draft
                .wreaths
                .iter()
                .map(|w| WreathLine {
                    size: w.size.as_str().to_string(),
                    quantity: w.quantity,
                    unit_price: w.unit_price.rounded(),
                })
                .collect(),
            delivery_option: draft
                .delivery
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_default(),
            delivery_fee: totals.delivery_fee.rounded(),
            total_amount: totals.grand_total.rounded(),
            notes: Some(contact.notes.clone()).filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin client over the notification endpoint. With no endpoint configured it
/// is inert, so local setups run without the collaborator.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    client: Client,
    endpoint: Option<String>,
}

impl Notifier {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub async fn send(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!("notification endpoint not configured, skipping send");
            return Ok(());
        };
        let response = self.client.post(endpoint).json(notification).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draft::{ContactInfo, DeliveryChoice, Fullness, TreeSelection, WreathSize};
    use crate::domain::value_objects::Dollars;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn draft() -> OrderDraft {
        OrderDraft::new()
            .with_tree(TreeSelection {
                species_id: Uuid::new_v4(),
                species_name: "Fraser Fir".to_string(),
                fullness: Fullness::Medium,
                height_feet: dec!(7),
                price_per_foot: Dollars::new(dec!(20)),
                quantity: 1,
                fresh_cut: true,
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
                unit: "Apt 2".into(),
                city: "Midvale".into(),
                state: "UT".into(),
                zip: "84047".into(),
                notes: String::new(),
            })
    }

    #[test]
    fn test_payload_shape() {
        let mut d = draft();
        d.schedule.date = NaiveDate::from_ymd_opt(2024, 12, 6);
        let n = OrderNotification::from_draft("ORD-00001234", &d);

        assert_eq!(n.customer_name, "Jane Doe");
        assert_eq!(n.delivery_address, "1 Pine Rd\nApt 2\nMidvale, UT 84047");
        assert_eq!(n.delivery_date, "12/06/2024");
        assert_eq!(n.delivery_time, "Not specified");
        assert_eq!(n.total_amount, dec!(180.00));
        assert!(n.notes.is_none());

        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["orderNumber"], "ORD-00001234");
        assert_eq!(json["trees"][0]["speciesName"], "Fraser Fir");
        assert_eq!(json["trees"][0]["freshCut"], true);
        assert_eq!(json["deliveryOption"], "Standard Delivery");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_address_skips_blank_unit() {
        let mut d = draft();
        d.contact.unit.clear();
        let n = OrderNotification::from_draft("ORD-1", &d);
        assert_eq!(n.delivery_address, "1 Pine Rd\nMidvale, UT 84047");
    }

    #[tokio::test]
    async fn test_send_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .and(body_partial_json(serde_json::json!({"customerName": "Jane Doe"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::new(Some(format!("{}/notify", server.uri())));
        let n = OrderNotification::from_draft("ORD-00000042", &draft());
        notifier.send(&n).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_surfaces_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = Notifier::new(Some(server.uri()));
        let n = OrderNotification::from_draft("ORD-00000042", &draft());
        assert!(matches!(
            notifier.send(&n).await,
            Err(NotifyError::Status(_))
        ));
    }

    #[tokio::test]
    async fn test_send_without_endpoint_is_noop() {
        let notifier = Notifier::new(None);
        let n = OrderNotification::from_draft("ORD-00000042", &draft());
        notifier.send(&n).await.unwrap();
    }
}
