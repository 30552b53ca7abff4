//! The spending by category pie chart.
//!
//! The chart is generated as JSON configuration for ECharts and rendered as a
//! container plus an inline script. The script sits next to the container so
//! that it runs both on a full page load and when htmx swaps in new content.

use charming::{
    Chart,
    component::Legend,
    element::{Color, JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{dashboard::summary::CategoryTotal, html::CARD_STYLE};

/// The URL of the ECharts build used by the dashboard.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the "Spending by Category" card.
///
/// Shows a prompt instead of the chart when no category has any spending.
pub(super) fn spending_by_category_view(category_totals: &[CategoryTotal]) -> Markup {
    let chart = (!category_totals.is_empty()).then(|| DashboardChart {
        id: "spending-by-category-chart",
        options: escape_for_script(&spending_by_category_chart(category_totals).to_string()),
    });

    html! {
        section class={ (CARD_STYLE) " w-full" }
        {
            h2 class="text-lg font-semibold" { "Spending by Category" }

            @match chart {
                Some(chart) => {
                    div id=(chart.id) class="w-full h-[300px] sm:h-[350px]" {}
                    (chart_script(&chart))
                }
                None => {
                    p class="py-16 text-center text-sm text-gray-500 dark:text-gray-400"
                    {
                        "No data to display. Add some expenses to see the chart!"
                    }
                }
            }
        }
    }
}

/// Escape `<` so that text such as a category name cannot close the inline
/// script. `\u003c` is only valid inside string literals, which is the only
/// place the chart options contain `<`.
fn escape_for_script(options: &str) -> String {
    options.replace('<', "\\u003c")
}

fn chart_script(chart: &DashboardChart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const existing = echarts.getInstanceByDom(chartDom);
            if (existing) {{
                existing.dispose();
            }}

            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            new ResizeObserver(() => chart.resize()).observe(chartDom);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart.id, chart.options
    );

    html! {
        script { (PreEscaped(script)) }
    }
}

pub(super) fn spending_by_category_chart(category_totals: &[CategoryTotal]) -> Chart {
    let colors: Vec<Color> = category_totals
        .iter()
        .map(|category_total| Color::from(category_total.color.as_str()))
        .collect();
    let data: Vec<(f64, &str)> = category_totals
        .iter()
        .map(|category_total| (category_total.amount, category_total.name.as_str()))
        .collect();

    Chart::new()
        .color(colors)
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0%"))
        .series(
            Pie::new()
                .name("Spending")
                .radius("70%")
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
