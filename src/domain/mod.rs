//! Checkout domain: the order draft, wizard sequencing, and pricing.
//!
//! Everything here is pure and rendering-independent; the HTTP layer and any
//! front end consume the same types.

pub mod draft;
pub mod pricing;
pub mod value_objects;
pub mod wizard;

pub use draft::{ContactInfo, DeliveryChoice, OrderDraft, Schedule};
pub use pricing::OrderTotals;
pub use value_objects::Dollars;
pub use wizard::{can_advance, Step, Wizard, WizardError};
