//! Fixed slot names of the balance-sheet and profit-and-loss templates.
//!
//! Slots are semantic positions on a statement ("cash", "rent"); they are unrelated to GL
//! account numbers, which are optional tags on the amount stored in a slot.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifies which statement of a month a line item belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StatementKind {
    BalanceSheet,
    ProfitLoss,
}

impl StatementKind {
    /// Every slot name accepted on this statement.
    pub fn slots(self) -> &'static [&'static str] {
        match self {
            StatementKind::BalanceSheet => balance_sheet::ALL,
            StatementKind::ProfitLoss => profit_loss::ALL,
        }
    }

    pub fn has_slot(self, slot: &str) -> bool {
        self.slots().contains(&slot)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatementKind::BalanceSheet => "balance sheet",
            StatementKind::ProfitLoss => "profit & loss",
        };
        f.write_str(label)
    }
}

impl FromStr for StatementKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bs" | "balance-sheet" | "balancesheet" => Ok(StatementKind::BalanceSheet),
            "pl" | "profit-loss" | "profitloss" | "p&l" => Ok(StatementKind::ProfitLoss),
            other => Err(format!("unknown statement `{other}`")),
        }
    }
}

pub mod balance_sheet {
    pub const CASH: &str = "cash";
    pub const ACCOUNTS_RECEIVABLE: &str = "accounts-receivable";
    pub const INVENTORY: &str = "inventory";
    pub const PREPAID_EXPENSES: &str = "prepaid-expenses";
    pub const PPE: &str = "ppe";
    pub const ACCUMULATED_DEPRECIATION: &str = "accumulated-depreciation";
    pub const INTANGIBLE_ASSETS: &str = "intangible-assets";
    pub const ACCOUNTS_PAYABLE: &str = "accounts-payable";
    pub const SHORT_TERM_DEBT: &str = "short-term-debt";
    pub const ACCRUED_EXPENSES: &str = "accrued-expenses";
    pub const LONG_TERM_DEBT: &str = "long-term-debt";
    pub const OTHER_LT_LIABILITIES: &str = "other-lt-liabilities";
    pub const OWNERS_EQUITY: &str = "owners-equity";
    pub const RETAINED_EARNINGS: &str = "retained-earnings";

    pub const CURRENT_ASSETS: &[&str] = &[CASH, ACCOUNTS_RECEIVABLE, INVENTORY, PREPAID_EXPENSES];
    pub const CURRENT_LIABILITIES: &[&str] = &[ACCOUNTS_PAYABLE, SHORT_TERM_DEBT, ACCRUED_EXPENSES];
    pub const LONG_TERM_LIABILITIES: &[&str] = &[LONG_TERM_DEBT, OTHER_LT_LIABILITIES];
    pub const EQUITY: &[&str] = &[OWNERS_EQUITY, RETAINED_EARNINGS];

    pub const ALL: &[&str] = &[
        CASH,
        ACCOUNTS_RECEIVABLE,
        INVENTORY,
        PREPAID_EXPENSES,
        PPE,
        ACCUMULATED_DEPRECIATION,
        INTANGIBLE_ASSETS,
        ACCOUNTS_PAYABLE,
        SHORT_TERM_DEBT,
        ACCRUED_EXPENSES,
        LONG_TERM_DEBT,
        OTHER_LT_LIABILITIES,
        OWNERS_EQUITY,
        RETAINED_EARNINGS,
    ];
}

pub mod profit_loss {
    pub const SALES_REVENUE: &str = "sales-revenue";
    pub const SERVICE_REVENUE: &str = "service-revenue";
    pub const OTHER_REVENUE: &str = "other-revenue";
    pub const DIRECT_MATERIALS: &str = "direct-materials";
    pub const DIRECT_LABOR: &str = "direct-labor";
    pub const MANUFACTURING_OVERHEAD: &str = "manufacturing-overhead";
    pub const SALARIES_WAGES: &str = "salaries-wages";
    pub const RENT: &str = "rent";
    pub const UTILITIES: &str = "utilities";
    pub const MARKETING: &str = "marketing";
    pub const INSURANCE: &str = "insurance";
    pub const PROFESSIONAL_SERVICES: &str = "professional-services";
    pub const DEPRECIATION: &str = "depreciation";
    pub const OTHER_OPERATING: &str = "other-operating";
    pub const INTEREST_INCOME: &str = "interest-income";
    pub const INTEREST_EXPENSE: &str = "interest-expense";
    pub const OTHER_INCOME: &str = "other-income";

    pub const REVENUE: &[&str] = &[SALES_REVENUE, SERVICE_REVENUE, OTHER_REVENUE];
    pub const COST_OF_GOODS_SOLD: &[&str] = &[DIRECT_MATERIALS, DIRECT_LABOR, MANUFACTURING_OVERHEAD];
    pub const OPERATING_EXPENSES: &[&str] = &[
        SALARIES_WAGES,
        RENT,
        UTILITIES,
        MARKETING,
        INSURANCE,
        PROFESSIONAL_SERVICES,
        DEPRECIATION,
        OTHER_OPERATING,
    ];

    pub const ALL: &[&str] = &[
        SALES_REVENUE,
        SERVICE_REVENUE,
        OTHER_REVENUE,
        DIRECT_MATERIALS,
        DIRECT_LABOR,
        MANUFACTURING_OVERHEAD,
        SALARIES_WAGES,
        RENT,
        UTILITIES,
        MARKETING,
        INSURANCE,
        PROFESSIONAL_SERVICES,
        DEPRECIATION,
        OTHER_OPERATING,
        INTEREST_INCOME,
        INTEREST_EXPENSE,
        OTHER_INCOME,
    ];
}
