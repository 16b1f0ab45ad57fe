use cdjournal_domain::{
    amounts_match,
    slots::{balance_sheet as bs, profit_loss as pl},
    slot_amount, sum_slots, Document, LineItems, MonthRecord, Period,
};
use tracing::debug;

/// Outcome of comparing two figures that should agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalanceCheck {
    Balanced,
    /// `difference` is always reported as an absolute value.
    Unbalanced { difference: f64 },
}

impl BalanceCheck {
    pub fn compare(left: f64, right: f64) -> Self {
        if amounts_match(left, right) {
            BalanceCheck::Balanced
        } else {
            BalanceCheck::Unbalanced {
                difference: (left - right).abs(),
            }
        }
    }

    pub fn is_balanced(&self) -> bool {
        matches!(self, BalanceCheck::Balanced)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSheetTotals {
    pub current_assets: f64,
    pub fixed_assets: f64,
    pub total_assets: f64,
    pub current_liabilities: f64,
    pub long_term_liabilities: f64,
    pub total_equity: f64,
    pub total_liabilities_and_equity: f64,
    pub balance_check: BalanceCheck,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitLossTotals {
    pub total_revenue: f64,
    pub total_cogs: f64,
    pub gross_profit: f64,
    pub total_operating_expenses: f64,
    pub operating_income: f64,
    pub net_other_income: f64,
    pub net_income: f64,
}

impl ProfitLossTotals {
    /// Presentation uses this to style the net income as a loss.
    pub fn is_loss(&self) -> bool {
        self.net_income < 0.0
    }
}

/// Both statements of one month.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTotals {
    pub balance_sheet: BalanceSheetTotals,
    pub profit_loss: ProfitLossTotals,
}

/// Derives statement totals from line items. Every call is a full recompute.
pub struct StatementService;

impl StatementService {
    pub fn balance_sheet(items: &LineItems) -> BalanceSheetTotals {
        let current_assets = sum_slots(items, bs::CURRENT_ASSETS);
        let fixed_assets = slot_amount(items, bs::PPE) - slot_amount(items, bs::ACCUMULATED_DEPRECIATION)
            + slot_amount(items, bs::INTANGIBLE_ASSETS);
        let total_assets = current_assets + fixed_assets;
        let current_liabilities = sum_slots(items, bs::CURRENT_LIABILITIES);
        let long_term_liabilities = sum_slots(items, bs::LONG_TERM_LIABILITIES);
        let total_equity = sum_slots(items, bs::EQUITY);
        let total_liabilities_and_equity = current_liabilities + long_term_liabilities + total_equity;

        BalanceSheetTotals {
            current_assets,
            fixed_assets,
            total_assets,
            current_liabilities,
            long_term_liabilities,
            total_equity,
            total_liabilities_and_equity,
            balance_check: BalanceCheck::compare(total_assets, total_liabilities_and_equity),
        }
    }

    pub fn profit_loss(items: &LineItems) -> ProfitLossTotals {
        let total_revenue = sum_slots(items, pl::REVENUE);
        let total_cogs = sum_slots(items, pl::COST_OF_GOODS_SOLD);
        let gross_profit = total_revenue - total_cogs;
        let total_operating_expenses = sum_slots(items, pl::OPERATING_EXPENSES);
        let operating_income = gross_profit - total_operating_expenses;
        let net_other_income = slot_amount(items, pl::INTEREST_INCOME)
            - slot_amount(items, pl::INTEREST_EXPENSE)
            + slot_amount(items, pl::OTHER_INCOME);

        ProfitLossTotals {
            total_revenue,
            total_cogs,
            gross_profit,
            total_operating_expenses,
            operating_income,
            net_other_income,
            net_income: operating_income + net_other_income,
        }
    }

    pub fn derive(record: &MonthRecord) -> StatementTotals {
        StatementTotals {
            balance_sheet: Self::balance_sheet(&record.balance_sheet),
            profit_loss: Self::profit_loss(&record.profit_loss),
        }
    }

    /// Totals for `period`; a month without data yields all zeros.
    pub fn for_period(document: &Document, period: Period) -> StatementTotals {
        debug!(%period, "recomputing statement totals");
        Self::derive(&document.month_record(period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdjournal_domain::LineItem;

    fn items(values: &[(&str, f64)]) -> LineItems {
        values
            .iter()
            .map(|(slot, amount)| (slot.to_string(), LineItem::new(*amount)))
            .collect()
    }

    #[test]
    fn fixed_assets_net_out_depreciation() {
        let totals = StatementService::balance_sheet(&items(&[
            (bs::PPE, 10_000.0),
            (bs::ACCUMULATED_DEPRECIATION, 2_500.0),
            (bs::INTANGIBLE_ASSETS, 500.0),
        ]));
        assert_eq!(totals.fixed_assets, 8_000.0);
        assert_eq!(totals.total_assets, 8_000.0);
    }

    #[test]
    fn missing_slots_count_as_zero() {
        let totals = StatementService::balance_sheet(&LineItems::new());
        assert_eq!(totals.total_assets, 0.0);
        assert!(totals.balance_check.is_balanced());
        let pl_totals = StatementService::profit_loss(&LineItems::new());
        assert_eq!(pl_totals.net_income, 0.0);
        assert!(!pl_totals.is_loss());
    }

    #[test]
    fn interest_expense_reduces_other_income() {
        let totals = StatementService::profit_loss(&items(&[
            (pl::SALES_REVENUE, 1_000.0),
            (pl::DIRECT_MATERIALS, 300.0),
            (pl::RENT, 200.0),
            (pl::INTEREST_INCOME, 15.0),
            (pl::INTEREST_EXPENSE, 40.0),
            (pl::OTHER_INCOME, 5.0),
        ]));
        assert_eq!(totals.gross_profit, 700.0);
        assert_eq!(totals.operating_income, 500.0);
        assert_eq!(totals.net_other_income, -20.0);
        assert_eq!(totals.net_income, 480.0);
    }

    #[test]
    fn balance_check_boundary() {
        assert!(BalanceCheck::compare(100.0, 100.0 - 0.009999).is_balanced());
        match BalanceCheck::compare(100.0, 99.99) {
            BalanceCheck::Unbalanced { difference } => assert!((difference - 0.01).abs() < 1e-9),
            other => panic!("expected unbalanced, got {other:?}"),
        }
        match BalanceCheck::compare(50.0, 75.0) {
            BalanceCheck::Unbalanced { difference } => assert_eq!(difference, 25.0),
            other => panic!("expected unbalanced, got {other:?}"),
        }
    }
}
