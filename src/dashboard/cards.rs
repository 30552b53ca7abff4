//! The stat cards at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    dashboard::{filter::DateFilter, summary::DashboardSummary},
    html::{CARD_STYLE, format_currency},
};

struct StatCard {
    title: &'static str,
    value: String,
    description: &'static str,
}

/// Renders the total, transaction count and active category cards.
pub(super) fn stat_cards_view(summary: &DashboardSummary, filter: &DateFilter) -> Markup {
    let cards = [
        StatCard {
            title: "Total Expenses",
            value: format_currency(summary.total),
            description: filter.description(),
        },
        StatCard {
            title: "Transactions",
            value: summary.transaction_count.to_string(),
            description: "Total recorded",
        },
        StatCard {
            title: "Active Categories",
            value: summary.active_category_count().to_string(),
            description: "Expense categories used",
        },
    ];

    html! {
        section id="stat-cards" class="grid w-full gap-4 sm:grid-cols-2 lg:grid-cols-3"
        {
            @for card in &cards {
                div class=(CARD_STYLE)
                {
                    h3 class="text-sm font-semibold text-gray-600 dark:text-gray-400"
                    {
                        (card.title)
                    }

                    p class="mt-2 text-3xl font-bold" data-stat-value { (card.value) }

                    p class="mt-1 text-xs text-gray-500 dark:text-gray-400" { (card.description) }
                }
            }
        }
    }
}
