//! Statement line items and their persisted JSON shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::lenient;

/// A single amount entered against a statement slot, optionally tagged with a GL account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredLineItem")]
pub struct LineItem {
    pub amount: f64,
    #[serde(rename = "glAccount", skip_serializing_if = "Option::is_none")]
    pub gl_account: Option<String>,
}

impl LineItem {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            gl_account: None,
        }
    }

    pub fn tagged(amount: f64, gl_account: impl Into<String>) -> Self {
        Self::new(amount).with_gl_account(Some(gl_account.into()))
    }

    /// Sets the GL tag; blank numbers clear it.
    pub fn with_gl_account(mut self, gl_account: Option<String>) -> Self {
        self.gl_account = normalize_gl(gl_account);
        self
    }

    /// Zero amounts are equivalent to an absent line.
    pub fn is_zero(&self) -> bool {
        self.amount == 0.0
    }
}

/// Slot name to line item, for one statement of one month.
pub type LineItems = BTreeMap<String, LineItem>;

/// Returns the amount stored for `slot`, or `0.0` when the slot is empty.
pub fn slot_amount(items: &LineItems, slot: &str) -> f64 {
    items.get(slot).map(|item| item.amount).unwrap_or(0.0)
}

/// Sums the amounts of several slots, treating missing slots as zero.
pub fn sum_slots(items: &LineItems, slots: &[&str]) -> f64 {
    slots.iter().map(|slot| slot_amount(items, slot)).sum()
}

pub(crate) fn normalize_gl(gl_account: Option<String>) -> Option<String> {
    gl_account
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Both on-disk encodings of a line item. Early documents stored a bare number per slot;
/// later ones an object with an optional GL tag. Either form upgrades on read.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLineItem {
    Tagged {
        #[serde(default, deserialize_with = "lenient::amount")]
        amount: f64,
        #[serde(rename = "glAccount", default, deserialize_with = "lenient::text")]
        gl_account: String,
    },
    Bare(#[serde(deserialize_with = "lenient::amount")] f64),
}

impl From<StoredLineItem> for LineItem {
    fn from(stored: StoredLineItem) -> Self {
        match stored {
            StoredLineItem::Tagged { amount, gl_account } => {
                LineItem::new(amount).with_gl_account(Some(gl_account))
            }
            StoredLineItem::Bare(amount) => LineItem::new(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_numbers_upgrade_to_untagged_items() {
        let items: LineItems =
            serde_json::from_str(r#"{"cash": 1500.25, "inventory": "300"}"#).expect("parse");
        assert_eq!(items["cash"], LineItem::new(1500.25));
        assert_eq!(items["inventory"], LineItem::new(300.0));
    }

    #[test]
    fn empty_gl_tag_reads_as_untagged() {
        let items: LineItems = serde_json::from_str(
            r#"{"rent": {"amount": 900, "glAccount": ""}, "utilities": {"amount": 120, "glAccount": "6030"}}"#,
        )
        .expect("parse");
        assert_eq!(items["rent"].gl_account, None);
        assert_eq!(items["utilities"].gl_account.as_deref(), Some("6030"));
    }

    #[test]
    fn untagged_items_omit_gl_key() {
        let json = serde_json::to_string(&LineItem::new(10.0)).expect("serialize");
        assert_eq!(json, r#"{"amount":10.0}"#);
    }

    #[test]
    fn sum_slots_ignores_missing_slots() {
        let mut items = LineItems::new();
        items.insert("cash".into(), LineItem::new(100.0));
        items.insert("inventory".into(), LineItem::new(50.0));
        assert_eq!(sum_slots(&items, &["cash", "inventory", "prepaid-expenses"]), 150.0);
    }
}
