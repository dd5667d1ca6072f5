//! Price aggregation over a draft.
//!
//! Review and confirmation both render figures from [`OrderTotals::for_draft`];
//! nothing is cached, so the two screens cannot drift apart. Amounts accumulate
//! at full precision and are rounded per value only when displayed.

use serde::Serialize;

use super::draft::{OrderDraft, StandSelection, TreeSelection, WreathSelection};
use super::value_objects::Dollars;

pub fn trees_subtotal(trees: &[TreeSelection]) -> Dollars {
    trees.iter().map(TreeSelection::line_total).sum()
}

pub fn stands_subtotal(stands: &[StandSelection]) -> Dollars {
    stands.iter().map(StandSelection::line_total).sum()
}

pub fn wreaths_subtotal(wreaths: &[WreathSelection]) -> Dollars {
    wreaths.iter().map(WreathSelection::line_total).sum()
}

/// Per-category subtotals plus the grand total, derived from a draft on every
/// call. An empty category contributes zero; a missing delivery choice means a
/// zero fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub trees: Dollars,
    pub stands: Dollars,
    pub wreaths: Dollars,
    pub delivery_fee: Dollars,
    pub grand_total: Dollars,
}

impl OrderTotals {
    pub fn for_draft(draft: &OrderDraft) -> Self {
        let trees = trees_subtotal(&draft.trees);
        let stands = stands_subtotal(&draft.stands);
        let wreaths = wreaths_subtotal(&draft.wreaths);
        let delivery_fee = draft
            .delivery
            .as_ref()
            .map(|d| d.fee)
            .unwrap_or(Dollars::ZERO);
        Self {
            trees,
            stands,
            wreaths,
            delivery_fee,
            grand_total: trees + stands + wreaths + delivery_fee,
        }
    }
}
