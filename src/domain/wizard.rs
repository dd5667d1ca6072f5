//! Checkout wizard step sequencer.
//!
//! Navigation is a fixed linear walk; forward movement is gated by
//! [`can_advance`]. Confirmation sits outside the back/forward sequence and is
//! reached only through [`Wizard::complete`], after which the wizard accepts
//! no further transitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::draft::OrderDraft;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Tree,
    Stand,
    Delivery,
    Addons,
    Schedule,
    Contact,
    Review,
    Confirmation,
}

/// The navigable steps, in order. Confirmation is deliberately absent.
pub const STEP_SEQUENCE: [Step; 7] = [
    Step::Tree,
    Step::Stand,
    Step::Delivery,
    Step::Addons,
    Step::Schedule,
    Step::Contact,
    Step::Review,
];

fn position(step: Step) -> Option<usize> {
    STEP_SEQUENCE.iter().position(|s| *s == step)
}

/// Whether the customer may leave `step` going forward, given the draft so
/// far. Pure; the wizard and any rendering layer share it.
pub fn can_advance(step: Step, draft: &OrderDraft) -> bool {
    match step {
        Step::Tree => !draft.trees.is_empty(),
        Step::Stand => true,
        Step::Delivery => draft.delivery.is_some(),
        Step::Addons => true,
        Step::Schedule => true,
        Step::Contact => draft.contact.is_complete(),
        Step::Review => true,
        Step::Confirmation => false,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("order is already confirmed")]
    AlreadyConfirmed,
    #[error("cannot confirm from the {0:?} step")]
    NotAtReview(Step),
}

/// Owns the current step and the accumulating draft for one checkout session.
/// Position is never persisted; a new session starts over at the tree step.
#[derive(Clone, Debug, Default)]
pub struct Wizard {
    step: Step,
    draft: OrderDraft,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Replaces the draft wholesale; step editors rebuild it via the
    /// [`OrderDraft`](super::draft::OrderDraft) mutators and hand it back.
    pub fn update_draft(&mut self, draft: OrderDraft) {
        self.draft = draft;
    }

    /// Advances one position when the current step's gate passes. Returns
    /// whether the wizard moved. Review is the last sequenced step; leaving it
    /// goes through [`Wizard::complete`] instead.
    pub fn go_next(&mut self) -> bool {
        let Some(index) = position(self.step) else {
            return false;
        };
        if index + 1 >= STEP_SEQUENCE.len() || !can_advance(self.step, &self.draft) {
            return false;
        }
        self.step = STEP_SEQUENCE[index + 1];
        true
    }

    /// Retreats one position. Returns whether the wizard moved. Confirmation
    /// is non-revisitable, so backing out of it is refused.
    pub fn go_back(&mut self) -> bool {
        let Some(index) = position(self.step) else {
            return false;
        };
        if index == 0 {
            return false;
        }
        self.step = STEP_SEQUENCE[index - 1];
        true
    }

    /// Review -> Confirmation, on successful submission only. A second call
    /// fails, which is what stops a double submit at this layer.
    pub fn complete(&mut self) -> Result<(), WizardError> {
        match self.step {
            Step::Review => {
                self.step = Step::Confirmation;
                Ok(())
            }
            Step::Confirmation => Err(WizardError::AlreadyConfirmed),
            other => Err(WizardError::NotAtReview(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draft::{ContactInfo, DeliveryChoice, Fullness, TreeSelection};
    use crate::domain::value_objects::Dollars;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn tree() -> TreeSelection {
        TreeSelection {
            species_id: Uuid::new_v4(),
            species_name: "Noble Fir".to_string(),
            fullness: Fullness::Full,
            height_feet: dec!(6),
            price_per_foot: Dollars::new(dec!(18)),
            quantity: 1,
            fresh_cut: true,
            image_url: String::new(),
        }
    }

    fn delivery() -> DeliveryChoice {
        DeliveryChoice {
            id: Uuid::new_v4(),
            name: "Standard Delivery".to_string(),
            fee: Dollars::new(dec!(25)),
        }
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
            street: "1 Pine Rd".into(),
            city: "Midvale".into(),
            state: "UT".into(),
            zip: "84047".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tree_step_requires_a_tree() {
        let mut wizard = Wizard::new();
        assert!(!wizard.go_next());
        wizard.update_draft(wizard.draft().clone().with_tree(tree()));
        assert!(wizard.go_next());
        assert_eq!(wizard.step(), Step::Stand);
    }

    #[test]
    fn test_delivery_step_requires_selection() {
        let mut wizard = Wizard::new();
        wizard.update_draft(OrderDraft::new().with_tree(tree()));
        assert!(wizard.go_next()); // -> stand
        assert!(wizard.go_next()); // -> delivery
        assert!(!wizard.go_next());
        wizard.update_draft(wizard.draft().clone().with_delivery(delivery()));
        assert!(wizard.go_next());
        assert_eq!(wizard.step(), Step::Addons);
    }

    #[test]
    fn test_contact_step_blocks_on_any_empty_field() {
        let mut incomplete = contact();
        incomplete.zip.clear();
        let draft = OrderDraft::new().with_contact(incomplete);
        assert!(!can_advance(Step::Contact, &draft));
        let draft = draft.with_contact(contact());
        assert!(can_advance(Step::Contact, &draft));
    }

    #[test]
    fn test_back_stops_at_first_step() {
        let mut wizard = Wizard::new();
        assert!(!wizard.go_back());
        wizard.update_draft(OrderDraft::new().with_tree(tree()));
        wizard.go_next();
        assert!(wizard.go_back());
        assert_eq!(wizard.step(), Step::Tree);
    }

    #[test]
    fn test_full_walk_to_review_and_confirmation() {
        let mut wizard = Wizard::new();
        wizard.update_draft(
            OrderDraft::new()
                .with_tree(tree())
                .with_delivery(delivery())
                .with_contact(contact()),
        );
        for expected in [
            Step::Stand,
            Step::Delivery,
            Step::Addons,
            Step::Schedule,
            Step::Contact,
            Step::Review,
        ] {
            assert!(wizard.go_next());
            assert_eq!(wizard.step(), expected);
        }
        // review is the end of the sequence; forward navigation stops here
        assert!(!wizard.go_next());

        wizard.complete().unwrap();
        assert_eq!(wizard.step(), Step::Confirmation);
        assert_eq!(wizard.complete(), Err(WizardError::AlreadyConfirmed));
        assert!(!wizard.go_next());
        assert!(!wizard.go_back());
    }

    #[test]
    fn test_complete_rejected_before_review() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.complete(), Err(WizardError::NotAtReview(Step::Tree)));
    }
}
