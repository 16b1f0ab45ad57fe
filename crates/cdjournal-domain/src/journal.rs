//! Check-register ("journal entries") records for one month.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{de::IgnoredAny, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

use crate::common::{finite_or_zero, lenient, parse_amount};

/// Number of GL distribution columns carried by every journal entry.
pub const MAX_DISTRIBUTIONS: usize = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One GL number / name pair used to distribute an entry across accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlDistribution {
    pub gl_number: String,
    pub gl_name: String,
}

impl GlDistribution {
    pub fn new(gl_number: impl Into<String>, gl_name: impl Into<String>) -> Self {
        Self {
            gl_number: gl_number.into(),
            gl_name: gl_name.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gl_number.is_empty() && self.gl_name.is_empty()
    }
}

/// A single check-register row: a check written and the deposits distributed against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalEntry {
    pub date: Option<NaiveDate>,
    pub payee: String,
    pub check_number: String,
    pub check_amount: f64,
    pub deposit_date: Option<NaiveDate>,
    pub other_pl_receipts: f64,
    pub ar_deposit_amount: f64,
    pub pl_deposit_explanation: String,
    pub balance_sheet_deposit: f64,
    pub bs_deposit_explanation: String,
    pub distributions: [GlDistribution; MAX_DISTRIBUTIONS],
}

impl JournalEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the three deposit columns; equals the check amount when correctly distributed.
    pub fn horizontal_proof(&self) -> f64 {
        self.other_pl_receipts + self.ar_deposit_amount + self.balance_sheet_deposit
    }

    /// `true` when no field carries data. Blank rows may exist while editing but are never
    /// persisted.
    pub fn is_blank(&self) -> bool {
        self.date.is_none()
            && self.deposit_date.is_none()
            && self.payee.is_empty()
            && self.check_number.is_empty()
            && self.pl_deposit_explanation.is_empty()
            && self.bs_deposit_explanation.is_empty()
            && self.check_amount == 0.0
            && self.other_pl_receipts == 0.0
            && self.ar_deposit_amount == 0.0
            && self.balance_sheet_deposit == 0.0
            && self.distributions.iter().all(GlDistribution::is_empty)
    }

    /// Replaces non-finite amounts with zero.
    pub fn sanitize_amounts(&mut self) {
        for amount in [
            &mut self.check_amount,
            &mut self.other_pl_receipts,
            &mut self.ar_deposit_amount,
            &mut self.balance_sheet_deposit,
        ] {
            *amount = finite_or_zero(*amount);
        }
    }

    /// Sets distribution column `slot` (0-based). Returns `false` when the slot does not exist.
    pub fn set_distribution(&mut self, slot: usize, distribution: GlDistribution) -> bool {
        match self.distributions.get_mut(slot) {
            Some(target) => {
                *target = distribution;
                true
            }
            None => false,
        }
    }

    /// Populated distribution columns with their 0-based column index.
    pub fn populated_distributions(&self) -> impl Iterator<Item = (usize, &GlDistribution)> {
        self.distributions
            .iter()
            .enumerate()
            .filter(|(_, dist)| !dist.is_empty())
    }
}

mod keys {
    pub const DATE: &str = "date";
    pub const PAYEE: &str = "payee";
    pub const CHECK_NUMBER: &str = "checkNumber";
    pub const CHECK_AMOUNT: &str = "checkAmount";
    pub const DEPOSIT_DATE: &str = "depositDate";
    pub const OTHER_PL_RECEIPTS: &str = "otherPLReceipts";
    pub const AR_DEPOSIT_AMOUNT: &str = "arDepositAmount";
    pub const PL_DEPOSIT_EXPLANATION: &str = "plDepositExplanation";
    pub const BALANCE_SHEET_DEPOSIT: &str = "balanceSheetDeposit";
    pub const BS_DEPOSIT_EXPLANATION: &str = "bsDepositExplanation";

    pub fn gl_number(slot: usize) -> String {
        format!("gl{}", slot + 1)
    }

    pub fn gl_name(slot: usize) -> String {
        format!("glName{}", slot + 1)
    }
}

// Entries are stored as flat objects with only populated fields, e.g.
// `{"date": "2025-01-04", "checkAmount": 40, "gl1": "6020", "glName1": "Rent"}`.
impl Serialize for JournalEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(date) = self.date {
            map.serialize_entry(keys::DATE, &date.format(DATE_FORMAT).to_string())?;
        }
        write_text(&mut map, keys::PAYEE, &self.payee)?;
        write_text(&mut map, keys::CHECK_NUMBER, &self.check_number)?;
        write_amount(&mut map, keys::CHECK_AMOUNT, self.check_amount)?;
        if let Some(date) = self.deposit_date {
            map.serialize_entry(keys::DEPOSIT_DATE, &date.format(DATE_FORMAT).to_string())?;
        }
        write_amount(&mut map, keys::OTHER_PL_RECEIPTS, self.other_pl_receipts)?;
        write_amount(&mut map, keys::AR_DEPOSIT_AMOUNT, self.ar_deposit_amount)?;
        write_text(&mut map, keys::PL_DEPOSIT_EXPLANATION, &self.pl_deposit_explanation)?;
        write_amount(&mut map, keys::BALANCE_SHEET_DEPOSIT, self.balance_sheet_deposit)?;
        write_text(&mut map, keys::BS_DEPOSIT_EXPLANATION, &self.bs_deposit_explanation)?;
        for (slot, dist) in self.distributions.iter().enumerate() {
            write_text(&mut map, &keys::gl_number(slot), &dist.gl_number)?;
            write_text(&mut map, &keys::gl_name(slot), &dist.gl_name)?;
        }
        map.end()
    }
}

fn write_text<M: SerializeMap>(map: &mut M, key: &str, value: &str) -> Result<(), M::Error> {
    if value.is_empty() {
        return Ok(());
    }
    map.serialize_entry(key, value)
}

fn write_amount<M: SerializeMap>(map: &mut M, key: &str, value: f64) -> Result<(), M::Error> {
    if value == 0.0 {
        return Ok(());
    }
    map.serialize_entry(key, &value)
}

/// Any scalar a form field may have been saved as.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredField {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl StoredField {
    fn amount(&self) -> f64 {
        match self {
            StoredField::Number(value) if value.is_finite() => *value,
            StoredField::Text(text) => parse_amount(text),
            _ => 0.0,
        }
    }

    fn text(&self) -> String {
        match self {
            StoredField::Text(text) => text.clone(),
            StoredField::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            StoredField::Number(value) => value.to_string(),
            StoredField::Other(_) => String::new(),
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        match self {
            StoredField::Text(text) => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok(),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for JournalEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = BTreeMap::<String, StoredField>::deserialize(deserializer)?;
        let amount = |key: &str| fields.get(key).map(StoredField::amount).unwrap_or(0.0);
        let text = |key: &str| fields.get(key).map(StoredField::text).unwrap_or_default();
        let date = |key: &str| fields.get(key).and_then(StoredField::date);

        let mut entry = JournalEntry {
            date: date(keys::DATE),
            payee: text(keys::PAYEE),
            check_number: text(keys::CHECK_NUMBER),
            check_amount: amount(keys::CHECK_AMOUNT),
            deposit_date: date(keys::DEPOSIT_DATE),
            other_pl_receipts: amount(keys::OTHER_PL_RECEIPTS),
            ar_deposit_amount: amount(keys::AR_DEPOSIT_AMOUNT),
            pl_deposit_explanation: text(keys::PL_DEPOSIT_EXPLANATION),
            balance_sheet_deposit: amount(keys::BALANCE_SHEET_DEPOSIT),
            bs_deposit_explanation: text(keys::BS_DEPOSIT_EXPLANATION),
            distributions: Default::default(),
        };
        for (slot, dist) in entry.distributions.iter_mut().enumerate() {
            dist.gl_number = text(&keys::gl_number(slot));
            dist.gl_name = text(&keys::gl_name(slot));
        }
        Ok(entry)
    }
}

/// A month's check register: opening balance, bank statement figure and ordered entries.
///
/// Entry order is significant: it drives running balances and line numbering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRecord {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub balance_brought_forward: f64,
    /// Deposit figure reported on the external bank statement.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub citizen_statement_deposit: f64,
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
}

impl JournalRecord {
    pub fn new(balance_brought_forward: f64) -> Self {
        Self {
            balance_brought_forward,
            ..Self::default()
        }
    }

    /// Appends `entry` and returns its 1-based line number.
    pub fn push(&mut self, entry: JournalEntry) -> usize {
        self.entries.push(entry);
        self.entries.len()
    }

    /// Removes the entry at 0-based `index`; later entries shift up one line.
    pub fn remove(&mut self, index: usize) -> Option<JournalEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Drops rows that carry no data. Returns how many were removed.
    pub fn retain_populated(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_blank());
        before - self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
            && self.balance_brought_forward == 0.0
            && self.citizen_statement_deposit == 0.0
    }
}

impl fmt::Display for GlDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.gl_number.is_empty(), self.gl_name.is_empty()) {
            (false, false) => write!(f, "{} {}", self.gl_number, self.gl_name),
            (false, true) => f.write_str(&self.gl_number),
            (true, _) => f.write_str(&self.gl_name),
        }
    }
}
