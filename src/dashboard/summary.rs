//! Totals derived from the expenses and categories shown on the dashboard.

use crate::{category::Category, expense::Expense};

/// The amount spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTotal {
    pub name: String,
    pub color: String,
    pub amount: f64,
}

/// Summary statistics for the expenses in the selected date range.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardSummary {
    /// The sum of every expense amount, including uncategorized expenses.
    pub total: f64,
    /// The number of expenses.
    pub transaction_count: usize,
    /// Spending per category in category name order.
    ///
    /// Categories without spending are left out.
    pub category_totals: Vec<CategoryTotal>,
}

impl DashboardSummary {
    /// Summarise `expenses`.
    ///
    /// `categories` are expected in name order. Expenses whose category is
    /// missing or unknown count towards [DashboardSummary::total] only.
    pub(super) fn new(expenses: &[Expense], categories: &[Category]) -> Self {
        let total = expenses.iter().map(|expense| expense.amount).sum();

        let category_totals = categories
            .iter()
            .map(|category| CategoryTotal {
                name: category.name.to_string(),
                color: category.color.to_string(),
                amount: expenses
                    .iter()
                    .filter(|expense| expense.category_id == Some(category.id))
                    .map(|expense| expense.amount)
                    .sum(),
            })
            .filter(|category_total| category_total.amount > 0.0)
            .collect();

        Self {
            total,
            transaction_count: expenses.len(),
            category_totals,
        }
    }

    /// The number of categories with spending in the range.
    pub(super) fn active_category_count(&self) -> usize {
        self.category_totals.len()
    }
}

#[cfg(test)]
mod dashboard_summary_tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        category::{Category, CategoryColor, CategoryName},
        expense::Expense,
    };

    use super::{CategoryTotal, DashboardSummary};

    fn category(id: i64, name: &str, color: &str) -> Category {
        Category {
            id,
            name: CategoryName::new_unchecked(name),
            color: CategoryColor::new_unchecked(color),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn expense(id: i64, amount: f64, category_id: Option<i64>) -> Expense {
        Expense {
            id,
            amount,
            description: "Thing".to_owned(),
            date: date!(2024 - 01 - 15),
            category_id,
        }
    }

    #[test]
    fn empty_summary() {
        let summary = DashboardSummary::new(&[], &[category(1, "Food", "#EF4444")]);

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.transaction_count, 0);
        assert!(summary.category_totals.is_empty());
        assert_eq!(summary.active_category_count(), 0);
    }

    #[test]
    fn total_includes_every_expense() {
        let expenses = [
            expense(1, 10.25, Some(1)),
            expense(2, 4.5, None),
            expense(3, 0.25, Some(99)),
        ];

        let summary = DashboardSummary::new(&expenses, &[category(1, "Food", "#EF4444")]);

        assert_eq!(format!("{:.2}", summary.total), "15.00");
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn groups_by_category_in_name_order_and_drops_zero_totals() {
        let categories = [
            category(2, "Food", "#EF4444"),
            category(3, "Rent", "#3B82F6"),
            category(1, "Travel", "#10B981"),
        ];
        let expenses = [
            expense(1, 5.0, Some(1)),
            expense(2, 2.5, Some(2)),
            expense(3, 7.5, Some(1)),
            expense(4, 100.0, None),
        ];

        let summary = DashboardSummary::new(&expenses, &categories);

        assert_eq!(
            summary.category_totals,
            [
                CategoryTotal {
                    name: "Food".to_owned(),
                    color: "#EF4444".to_owned(),
                    amount: 2.5,
                },
                CategoryTotal {
                    name: "Travel".to_owned(),
                    color: "#10B981".to_owned(),
                    amount: 12.5,
                },
            ]
        );
        assert_eq!(summary.active_category_count(), 2);
    }
}
