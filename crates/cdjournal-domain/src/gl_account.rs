//! General-ledger accounts and the numeric bands reserved for each account type.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Number of digits in every GL account number.
pub const GL_NUMBER_LEN: usize = 4;

/// A categorized general-ledger bucket identified by a 4-digit number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlAccount {
    pub number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: GlAccountType,
    #[serde(default)]
    pub description: String,
}

impl GlAccount {
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        account_type: GlAccountType,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            account_type,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Displayable for GlAccount {
    fn display_label(&self) -> String {
        format!("{} - {}", self.number, self.name)
    }
}

/// Enumerates the five statement classes a GL account can belong to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GlAccountType {
    Assets,
    Liabilities,
    Equity,
    Revenue,
    Expenses,
}

impl GlAccountType {
    pub const ALL: [GlAccountType; 5] = [
        GlAccountType::Assets,
        GlAccountType::Liabilities,
        GlAccountType::Equity,
        GlAccountType::Revenue,
        GlAccountType::Expenses,
    ];

    /// Inclusive numeric band reserved for this account type.
    pub fn range(self) -> (u16, u16) {
        match self {
            GlAccountType::Assets => (1000, 1999),
            GlAccountType::Liabilities => (2000, 2999),
            GlAccountType::Equity => (3000, 3999),
            GlAccountType::Revenue => (4000, 4999),
            GlAccountType::Expenses => (5000, 9999),
        }
    }

    pub fn contains(self, number: u16) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&number)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlAccountType::Assets => "assets",
            GlAccountType::Liabilities => "liabilities",
            GlAccountType::Equity => "equity",
            GlAccountType::Revenue => "revenue",
            GlAccountType::Expenses => "expenses",
        }
    }
}

impl fmt::Display for GlAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when text does not name a known account type.
pub struct UnknownAccountType(pub String);

impl fmt::Display for UnknownAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown account type `{}`", self.0)
    }
}

impl std::error::Error for UnknownAccountType {}

impl FromStr for GlAccountType {
    type Err = UnknownAccountType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "assets" | "asset" => Ok(GlAccountType::Assets),
            "liabilities" | "liability" => Ok(GlAccountType::Liabilities),
            "equity" => Ok(GlAccountType::Equity),
            "revenue" => Ok(GlAccountType::Revenue),
            "expenses" | "expense" => Ok(GlAccountType::Expenses),
            _ => Err(UnknownAccountType(value.to_string())),
        }
    }
}

/// Account catalog keyed by account number.
pub type GlAccountMap = BTreeMap<String, GlAccount>;

const DEFAULT_CHART: &[(&str, &str, GlAccountType, &str)] = &[
    ("1010", "Cash - Operating", GlAccountType::Assets, "Primary operating bank account"),
    ("1020", "Cash - Savings", GlAccountType::Assets, "Savings account"),
    ("1200", "Accounts Receivable", GlAccountType::Assets, "Money owed by customers"),
    ("1300", "Inventory", GlAccountType::Assets, "Products held for sale"),
    ("1400", "Prepaid Expenses", GlAccountType::Assets, "Prepaid insurance, rent, etc."),
    ("1500", "Equipment", GlAccountType::Assets, "Office and business equipment"),
    (
        "1510",
        "Accumulated Depreciation - Equipment",
        GlAccountType::Assets,
        "Contra asset account for equipment",
    ),
    ("2010", "Accounts Payable", GlAccountType::Liabilities, "Money owed to suppliers"),
    ("2020", "Credit Card Payable", GlAccountType::Liabilities, "Credit card balances"),
    ("2100", "Short-term Loans", GlAccountType::Liabilities, "Loans due within one year"),
    ("2200", "Long-term Debt", GlAccountType::Liabilities, "Loans due after one year"),
    ("3010", "Owner's Equity", GlAccountType::Equity, "Owner's investment in business"),
    ("3020", "Retained Earnings", GlAccountType::Equity, "Accumulated profits"),
    ("4010", "Sales Revenue", GlAccountType::Revenue, "Revenue from product sales"),
    ("4020", "Service Revenue", GlAccountType::Revenue, "Revenue from services"),
    ("4030", "Other Revenue", GlAccountType::Revenue, "Miscellaneous income"),
    ("5010", "Cost of Goods Sold", GlAccountType::Expenses, "Direct cost of products sold"),
    ("6010", "Salaries & Wages", GlAccountType::Expenses, "Employee compensation"),
    ("6020", "Rent Expense", GlAccountType::Expenses, "Office/facility rent"),
    ("6030", "Utilities", GlAccountType::Expenses, "Electricity, water, gas"),
    ("6040", "Marketing & Advertising", GlAccountType::Expenses, "Promotional expenses"),
    ("6050", "Insurance", GlAccountType::Expenses, "Business insurance premiums"),
    ("6060", "Professional Services", GlAccountType::Expenses, "Legal, accounting fees"),
    ("6070", "Depreciation Expense", GlAccountType::Expenses, "Asset depreciation"),
    ("6080", "Interest Expense", GlAccountType::Expenses, "Interest on loans"),
    ("6090", "Other Operating Expenses", GlAccountType::Expenses, "Miscellaneous expenses"),
];

/// Starter chart of accounts used for new documents.
pub fn default_chart() -> GlAccountMap {
    DEFAULT_CHART
        .iter()
        .map(|(number, name, account_type, description)| {
            (
                number.to_string(),
                GlAccount::new(*number, *name, *account_type).with_description(*description),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chart_respects_type_ranges() {
        let chart = default_chart();
        assert_eq!(chart.len(), DEFAULT_CHART.len());
        for (number, account) in &chart {
            assert_eq!(number, &account.number);
            assert_eq!(account.number.len(), GL_NUMBER_LEN);
            let numeric: u16 = account.number.parse().expect("numeric");
            assert!(account.account_type.contains(numeric), "{number} misplaced");
        }
    }

    #[test]
    fn account_type_serializes_lowercase_under_type_key() {
        let account = GlAccount::new("4010", "Sales Revenue", GlAccountType::Revenue);
        let json = serde_json::to_value(&account).expect("serialize");
        assert_eq!(json["type"], "revenue");
        assert_eq!(json["number"], "4010");
    }

    #[test]
    fn account_type_parses_loose_spellings() {
        assert_eq!("Expense".parse::<GlAccountType>(), Ok(GlAccountType::Expenses));
        assert!("widgets".parse::<GlAccountType>().is_err());
    }
}
