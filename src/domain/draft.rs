//! Order draft accumulated across the checkout wizard.
//!
//! The draft is session-local and never persisted before submission. Every
//! mutator consumes the draft and returns the rebuilt value, so the wizard
//! controller always re-reads from a single source of truth and no caller can
//! observe a half-updated line-item list.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::value_objects::Dollars;

/// Density grades a species is sold in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fullness {
    Thin,
    Medium,
    Full,
}

impl Fullness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fullness::Thin => "thin",
            Fullness::Medium => "medium",
            Fullness::Full => "full",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WreathSize {
    Small,
    Medium,
    Large,
}

impl WreathSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            WreathSize::Small => "small",
            WreathSize::Medium => "medium",
            WreathSize::Large => "large",
        }
    }
}

/// One configured tree. Two entries may carry identical species, height and
/// fullness; each add on the tree step is a separate configuration decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSelection {
    pub species_id: Uuid,
    pub species_name: String,
    pub fullness: Fullness,
    /// Whole or half feet.
    pub height_feet: Decimal,
    pub price_per_foot: Dollars,
    pub quantity: u32,
    pub fresh_cut: bool,
    #[serde(default)]
    pub image_url: String,
}

impl TreeSelection {
    /// Price for a single tree of this configuration.
    pub fn unit_price(&self) -> Dollars {
        self.price_per_foot.times(self.height_feet)
    }

    pub fn line_total(&self) -> Dollars {
        self.unit_price().times_qty(self.quantity)
    }
}

/// A stand line item. `stand_id` is `None` exactly when the customer brings
/// their own stand, which is free and mutually exclusive with purchased stands.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandSelection {
    pub stand_id: Option<Uuid>,
    pub name: String,
    pub unit_price: Dollars,
    pub quantity: u32,
    pub has_own: bool,
}

impl StandSelection {
    pub fn own_stand() -> Self {
        Self {
            stand_id: None,
            name: "Own Stand".to_string(),
            unit_price: Dollars::ZERO,
            quantity: 1,
            has_own: true,
        }
    }

    pub fn line_total(&self) -> Dollars {
        self.unit_price.times_qty(self.quantity)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WreathSelection {
    pub wreath_id: Uuid,
    pub size: WreathSize,
    pub unit_price: Dollars,
    pub quantity: u32,
}

impl WreathSelection {
    pub fn line_total(&self) -> Dollars {
        self.unit_price.times_qty(self.quantity)
    }
}

/// Delivery option snapshot taken when the customer picks it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryChoice {
    pub id: Uuid,
    pub name: String,
    pub fee: Dollars,
}

/// Time windows the storefront offers on the schedule step.
pub const TIME_WINDOWS: [&str; 3] = [
    "8:00 AM - 12:00 PM",
    "12:00 PM - 4:00 PM",
    "4:00 PM - 8:00 PM",
];

/// Preferred delivery slot. Both halves are optional; preferences are
/// coordinated by staff after submission, never guaranteed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "email is required"), email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "street address is required"))]
    pub street: String,
    pub unit: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "zip code is required"))]
    pub zip: String,
    pub notes: String,
}

impl ContactInfo {
    /// All eight required fields filled in. This is the wizard's gating
    /// predicate; full validation (email format) runs at submission.
    pub fn is_complete(&self) -> bool {
        !self.first_name.is_empty()
            && !self.last_name.is_empty()
            && !self.email.is_empty()
            && !self.phone.is_empty()
            && !self.street.is_empty()
            && !self.city.is_empty()
            && !self.state.is_empty()
            && !self.zip.is_empty()
    }
}

/// The in-progress order, built incrementally across wizard steps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDraft {
    pub trees: Vec<TreeSelection>,
    pub stands: Vec<StandSelection>,
    pub wreaths: Vec<WreathSelection>,
    pub delivery: Option<DeliveryChoice>,
    pub schedule: Schedule,
    pub contact: ContactInfo,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tree entry. Unlike stands and wreaths, trees never merge:
    /// two adds with identical species, height and fullness stay two entries.
    pub fn with_tree(mut self, tree: TreeSelection) -> Self {
        if tree.quantity == 0 {
            return self;
        }
        self.trees.push(tree);
        self
    }

    /// Replaces a tree's quantity by list position; `quantity <= 0` removes
    /// the entry. Out-of-range positions are ignored.
    pub fn set_tree_quantity(mut self, index: usize, quantity: i32) -> Self {
        if index >= self.trees.len() {
            return self;
        }
        if quantity <= 0 {
            self.trees.remove(index);
        } else {
            self.trees[index].quantity = quantity as u32;
        }
        self
    }

    pub fn remove_tree(mut self, index: usize) -> Self {
        if index < self.trees.len() {
            self.trees.remove(index);
        }
        self
    }

    /// Sets the quantity for a purchased stand, merging by catalog id. Any
    /// own-stand entry is dropped first: the two categories never coexist.
    pub fn set_stand_quantity(
        mut self,
        stand_id: Uuid,
        name: &str,
        unit_price: Dollars,
        quantity: i32,
    ) -> Self {
        self.stands.retain(|s| !s.has_own);
        if quantity <= 0 {
            self.stands.retain(|s| s.stand_id != Some(stand_id));
            return self;
        }
        if let Some(existing) = self.stands.iter_mut().find(|s| s.stand_id == Some(stand_id)) {
            existing.quantity = quantity as u32;
        } else {
            self.stands.push(StandSelection {
                stand_id: Some(stand_id),
                name: name.to_string(),
                unit_price,
                quantity: quantity as u32,
                has_own: false,
            });
        }
        self
    }

    /// Flips the own-stand choice. Selecting it clears every purchased stand;
    /// deselecting it leaves the stand list empty.
    pub fn toggle_own_stand(mut self) -> Self {
        if self.has_own_stand() {
            self.stands.clear();
        } else {
            self.stands = vec![StandSelection::own_stand()];
        }
        self
    }

    pub fn has_own_stand(&self) -> bool {
        self.stands.iter().any(|s| s.has_own)
    }

    /// Sets a wreath quantity, merging by catalog id; `quantity <= 0` removes.
    pub fn set_wreath_quantity(
        mut self,
        wreath_id: Uuid,
        size: WreathSize,
        unit_price: Dollars,
        quantity: i32,
    ) -> Self {
        if quantity <= 0 {
            self.wreaths.retain(|w| w.wreath_id != wreath_id);
            return self;
        }
        if let Some(existing) = self.wreaths.iter_mut().find(|w| w.wreath_id == wreath_id) {
            existing.quantity = quantity as u32;
        } else {
            self.wreaths.push(WreathSelection {
                wreath_id,
                size,
                unit_price,
                quantity: quantity as u32,
            });
        }
        self
    }

    pub fn with_delivery(mut self, delivery: DeliveryChoice) -> Self {
        self.delivery = Some(delivery);
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = contact;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fir(quantity: u32) -> TreeSelection {
        TreeSelection {
            species_id: Uuid::new_v4(),
            species_name: "Fraser Fir".to_string(),
            fullness: Fullness::Medium,
            height_feet: dec!(7),
            price_per_foot: Dollars::new(dec!(20)),
            quantity,
            fresh_cut: false,
            image_url: String::new(),
        }
    }

    #[test]
    fn test_tree_adds_never_merge() {
        let tree = fir(1);
        let draft = OrderDraft::new().with_tree(tree.clone()).with_tree(tree);
        assert_eq!(draft.trees.len(), 2);
        assert_eq!(draft.trees[0].quantity, 1);
    }

    #[test]
    fn test_tree_unit_price_is_per_foot_times_height() {
        let tree = fir(1);
        assert_eq!(tree.unit_price().amount(), dec!(140));
    }

    #[test]
    fn test_tree_quantity_zero_or_negative_removes() {
        let draft = OrderDraft::new().with_tree(fir(2)).set_tree_quantity(0, 0);
        assert!(draft.trees.is_empty());
        let draft = OrderDraft::new().with_tree(fir(2)).set_tree_quantity(0, -3);
        assert!(draft.trees.is_empty());
    }

    #[test]
    fn test_tree_quantity_out_of_range_is_noop() {
        let draft = OrderDraft::new().with_tree(fir(2)).set_tree_quantity(5, 4);
        assert_eq!(draft.trees.len(), 1);
        assert_eq!(draft.trees[0].quantity, 2);
    }

    #[test]
    fn test_stand_increments_merge() {
        let id = Uuid::new_v4();
        let price = Dollars::new(dec!(35));
        let draft = OrderDraft::new()
            .set_stand_quantity(id, "Standard Stand", price, 1)
            .set_stand_quantity(id, "Standard Stand", price, 2);
        assert_eq!(draft.stands.len(), 1);
        assert_eq!(draft.stands[0].quantity, 2);
    }

    #[test]
    fn test_own_stand_clears_purchased() {
        let id = Uuid::new_v4();
        let draft = OrderDraft::new()
            .set_stand_quantity(id, "Standard Stand", Dollars::new(dec!(35)), 2)
            .toggle_own_stand();
        assert_eq!(draft.stands.len(), 1);
        assert!(draft.stands[0].has_own);
        assert!(draft.stands[0].unit_price.is_zero());
    }

    #[test]
    fn test_purchased_stand_clears_own() {
        let id = Uuid::new_v4();
        let draft = OrderDraft::new()
            .toggle_own_stand()
            .set_stand_quantity(id, "Heavy Duty Stand", Dollars::new(dec!(50)), 1);
        assert_eq!(draft.stands.len(), 1);
        assert!(!draft.stands[0].has_own);
        assert_eq!(draft.stands[0].stand_id, Some(id));
    }

    #[test]
    fn test_toggle_own_stand_twice_empties() {
        let draft = OrderDraft::new().toggle_own_stand().toggle_own_stand();
        assert!(draft.stands.is_empty());
    }

    #[test]
    fn test_wreath_quantity_merge_and_remove() {
        let id = Uuid::new_v4();
        let price = Dollars::new(dec!(15));
        let draft = OrderDraft::new()
            .set_wreath_quantity(id, WreathSize::Small, price, 1)
            .set_wreath_quantity(id, WreathSize::Small, price, 3);
        assert_eq!(draft.wreaths.len(), 1);
        assert_eq!(draft.wreaths[0].quantity, 3);

        let draft = draft.set_wreath_quantity(id, WreathSize::Small, price, 0);
        assert!(draft.wreaths.is_empty());
    }

    #[test]
    fn test_contact_completeness_ignores_optional_fields() {
        let mut contact = ContactInfo {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
            street: "1 Pine Rd".into(),
            city: "Midvale".into(),
            state: "UT".into(),
            zip: "84047".into(),
            ..Default::default()
        };
        assert!(contact.is_complete());
        contact.zip.clear();
        assert!(!contact.is_complete());
    }
}
