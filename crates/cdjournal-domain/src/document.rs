//! The persisted journal document: GL catalog plus per-year, per-month statement data.

use std::{collections::BTreeMap, fmt};

use serde::{
    de::{IgnoredAny, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    gl_account::{default_chart, GlAccountMap},
    journal::JournalRecord,
    line_item::LineItems,
    period::Period,
    slots::StatementKind,
};

const GL_ACCOUNTS_KEY: &str = "glAccounts";

/// Statement data for every month of one year, keyed by `YYYY-MM`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearData {
    #[serde(default)]
    pub balance_sheet: BTreeMap<String, LineItems>,
    #[serde(default)]
    pub profit_loss: BTreeMap<String, LineItems>,
    #[serde(default)]
    pub journal_entries: BTreeMap<String, JournalRecord>,
}

impl YearData {
    pub fn statement(&self, kind: StatementKind) -> &BTreeMap<String, LineItems> {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::ProfitLoss => &self.profit_loss,
        }
    }

    pub fn statement_mut(&mut self, kind: StatementKind) -> &mut BTreeMap<String, LineItems> {
        match kind {
            StatementKind::BalanceSheet => &mut self.balance_sheet,
            StatementKind::ProfitLoss => &mut self.profit_loss,
        }
    }
}

/// Owned snapshot of one month, the input of every statement derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthRecord {
    pub period: Option<Period>,
    pub balance_sheet: LineItems,
    pub profit_loss: LineItems,
    pub journal: JournalRecord,
}

impl MonthRecord {
    pub fn statement(&self, kind: StatementKind) -> &LineItems {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::ProfitLoss => &self.profit_loss,
        }
    }
}

/// The unit of persistence, export and import. Owns every GL account and month record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub gl_accounts: GlAccountMap,
    pub years: BTreeMap<i32, YearData>,
}

impl Document {
    /// A fresh document seeded with the default chart of accounts.
    pub fn new() -> Self {
        Self {
            gl_accounts: default_chart(),
            years: BTreeMap::new(),
        }
    }

    pub fn year(&self, year: i32) -> Option<&YearData> {
        self.years.get(&year)
    }

    /// Year data for `year`, created empty on first access.
    pub fn year_mut(&mut self, year: i32) -> &mut YearData {
        self.years.entry(year).or_default()
    }

    /// Line items of one statement for `period`, without creating anything.
    pub fn line_items(&self, period: Period, kind: StatementKind) -> Option<&LineItems> {
        self.year(period.year())?.statement(kind).get(&period.key())
    }

    /// Line items of one statement for `period`, created lazily.
    pub fn line_items_mut(&mut self, period: Period, kind: StatementKind) -> &mut LineItems {
        self.year_mut(period.year())
            .statement_mut(kind)
            .entry(period.key())
            .or_default()
    }

    pub fn journal(&self, period: Period) -> Option<&JournalRecord> {
        self.year(period.year())?.journal_entries.get(&period.key())
    }

    /// Check register for `period`, created lazily.
    pub fn journal_mut(&mut self, period: Period) -> &mut JournalRecord {
        self.year_mut(period.year())
            .journal_entries
            .entry(period.key())
            .or_default()
    }

    /// Snapshot of `period`; missing data reads as empty.
    pub fn month_record(&self, period: Period) -> MonthRecord {
        MonthRecord {
            period: Some(period),
            balance_sheet: self
                .line_items(period, StatementKind::BalanceSheet)
                .cloned()
                .unwrap_or_default(),
            profit_loss: self
                .line_items(period, StatementKind::ProfitLoss)
                .cloned()
                .unwrap_or_default(),
            journal: self.journal(period).cloned().unwrap_or_default(),
        }
    }

    /// Years that hold any data, ascending.
    pub fn years_with_data(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}

// On disk the years sit next to `glAccounts` as top-level keys:
// `{"glAccounts": {...}, "2025": {"balanceSheet": {...}, ...}}`.
impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.years.len() + 1))?;
        map.serialize_entry(GL_ACCOUNTS_KEY, &self.gl_accounts)?;
        for (year, data) in &self.years {
            map.serialize_entry(&year.to_string(), data)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a journal document object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut gl_accounts = None;
        let mut years = BTreeMap::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == GL_ACCOUNTS_KEY {
                gl_accounts = Some(map.next_value::<GlAccountMap>()?);
            } else if let Some(year) = parse_year_key(&key) {
                years.insert(year, map.next_value::<YearData>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(Document {
            // Documents saved before the GL registry existed get the starter chart.
            gl_accounts: gl_accounts.unwrap_or_else(default_chart),
            years,
        })
    }
}

fn parse_year_key(key: &str) -> Option<i32> {
    if key.len() == 4 && key.bytes().all(|b| b.is_ascii_digit()) {
        key.parse().ok()
    } else {
        None
    }
}
