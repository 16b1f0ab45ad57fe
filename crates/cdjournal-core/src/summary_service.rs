use cdjournal_domain::{
    slots::profit_loss as pl, slot_amount, sum_slots, Document, LineItems, Period,
    StatementKind, MONTHS_PER_YEAR,
};
use tracing::debug;

/// One calendar month of the year-to-date table.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTrend {
    pub period: Period,
    /// Short month name, `Jan` to `Dec`.
    pub label: &'static str,
    pub revenue: f64,
    pub expenses: f64,
    pub net_income: f64,
    pub cumulative_net_income: f64,
}

impl MonthTrend {
    pub fn has_data(&self) -> bool {
        self.revenue > 0.0 || self.expenses > 0.0
    }
}

/// Chart-ready series, one value per month.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub labels: Vec<&'static str>,
    pub revenue: Vec<f64>,
    pub expenses: Vec<f64>,
    pub net_income: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub ytd_revenue: f64,
    pub ytd_expenses: f64,
    pub ytd_net_income: f64,
    pub months_with_data: usize,
    pub average_monthly_revenue: f64,
    /// Always twelve rows, January first.
    pub months: Vec<MonthTrend>,
}

impl YearSummary {
    pub fn series(&self) -> TrendSeries {
        TrendSeries {
            labels: self.months.iter().map(|month| month.label).collect(),
            revenue: self.months.iter().map(|month| month.revenue).collect(),
            expenses: self.months.iter().map(|month| month.expenses).collect(),
            net_income: self.months.iter().map(|month| month.net_income).collect(),
        }
    }
}

/// Year-to-date aggregation across the months of one year.
pub struct SummaryService;

impl SummaryService {
    /// Revenue of one month's profit-and-loss items.
    pub fn month_revenue(items: &LineItems) -> f64 {
        sum_slots(items, pl::REVENUE)
    }

    /// Trend-view expenses: COGS, operating expenses and interest expense together.
    /// This basis differs from the statement's net income, which nets interest separately.
    pub fn month_expenses(items: &LineItems) -> f64 {
        sum_slots(items, pl::COST_OF_GOODS_SOLD)
            + sum_slots(items, pl::OPERATING_EXPENSES)
            + slot_amount(items, pl::INTEREST_EXPENSE)
    }

    pub fn year_to_date(document: &Document, year: i32) -> YearSummary {
        debug!(year, "recomputing year-to-date summary");
        let empty = LineItems::new();
        let mut months = Vec::with_capacity(MONTHS_PER_YEAR as usize);
        let mut ytd_revenue = 0.0;
        let mut ytd_expenses = 0.0;
        let mut months_with_data = 0;
        let mut cumulative = 0.0;

        for period in Period::months_of(year) {
            let items = document
                .line_items(period, StatementKind::ProfitLoss)
                .unwrap_or(&empty);
            let revenue = Self::month_revenue(items);
            let expenses = Self::month_expenses(items);
            let net_income = revenue - expenses;
            cumulative += net_income;
            ytd_revenue += revenue;
            ytd_expenses += expenses;

            let trend = MonthTrend {
                period,
                label: period.abbreviation(),
                revenue,
                expenses,
                net_income,
                cumulative_net_income: cumulative,
            };
            if trend.has_data() {
                months_with_data += 1;
            }
            months.push(trend);
        }

        let average_monthly_revenue = if months_with_data == 0 {
            0.0
        } else {
            ytd_revenue / months_with_data as f64
        };

        YearSummary {
            year,
            ytd_revenue,
            ytd_expenses,
            ytd_net_income: ytd_revenue - ytd_expenses,
            months_with_data,
            average_monthly_revenue,
            months,
        }
    }
}
