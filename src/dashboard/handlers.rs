//! Dashboard HTTP handlers and view rendering.
//!
//! The page is served as a shell whose content container starts out loading.
//! The container then requests the content for the selected date range, and
//! requests it again whenever an expense or category changes. The content
//! handler fetches categories and expenses concurrently and renders whatever
//! it could load.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HX_REPLACE_URL;
use maud::{Markup, html};
use rusqlite::Connection;
use serde_json::{Map, Value};
use time::Date;

use crate::{
    AppState, Error,
    alert::{ALERT_CONTAINER_ID, Alert},
    category::{CATEGORIES_CHANGED_EVENT, Category, get_all_categories},
    dashboard::{
        cards::stat_cards_view,
        charts::{ECHARTS_URL, spending_by_category_view},
        filter::{DashboardQuery, DateFilter},
        summary::DashboardSummary,
    },
    db::lock_connection,
    endpoints,
    expense::{EXPENSES_CHANGED_EVENT, Expense, expense_list_view, get_expenses},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, DIALOG_CONTAINER_ID,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
    timezone::local_today,
};

const CONTENT_ID: &str = "dashboard-content";

/// The state needed for displaying the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading expenses and categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Where the dashboard content is in its fetch lifecycle.
enum FetchState<'a> {
    /// The content has been requested but not rendered yet.
    Loading { query: &'a DashboardQuery },
    /// The expenses were fetched. Categories may be empty if their fetch failed.
    Loaded {
        filter: DateFilter,
        today: Date,
        expenses: Vec<Expense>,
        categories: Vec<Category>,
    },
    /// The expenses could not be fetched.
    Failed { filter: DateFilter, today: Date },
}

/// Display the dashboard page.
///
/// The content is loaded by a follow-up request so that the page renders
/// immediately.
pub async fn get_dashboard_page(Query(query): Query<DashboardQuery>) -> Response {
    dashboard_view(FetchState::Loading { query: &query }).into_response()
}

/// Render the dashboard content for the date range in the query.
///
/// An invalid custom range falls back to today and adds an error alert.
/// Failing to load one of categories or expenses does not stop the other from
/// rendering.
pub async fn get_dashboard_content(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let mut problems = Vec::new();

    let filter = query.date_filter().unwrap_or_else(|error| {
        tracing::debug!("invalid dashboard filter {query:?}: {error}");
        problems.push(format!("Invalid date range: {error}. Showing today instead."));
        DateFilter::Today
    });
    let range = filter.range(today);
    let (from, to) = (*range.start(), *range.end());

    let (categories, expenses) = tokio::join!(
        run_store_task(state.db_connection.clone(), get_all_categories),
        run_store_task(state.db_connection.clone(), move |connection: &Connection| {
            get_expenses(Some(from), Some(to), connection)
        }),
    );

    let categories = categories.unwrap_or_else(|error| {
        tracing::error!("Failed to fetch categories for the dashboard: {error}");
        problems.push("Could not load categories.".to_owned());
        Vec::new()
    });

    let fetch_state = match expenses {
        Ok(expenses) => FetchState::Loaded {
            filter,
            today,
            expenses,
            categories,
        },
        Err(error) => {
            tracing::error!("Failed to fetch expenses for the dashboard: {error}");
            problems.push("Could not load expenses.".to_owned());
            FetchState::Failed { filter, today }
        }
    };

    let alert = (!problems.is_empty()).then(|| Alert::Error {
        message: "Something went wrong".to_owned(),
        details: problems.join(" "),
    });

    let content = html! {
        (dashboard_content_view(&fetch_state))

        @if let Some(alert) = alert {
            (alert.into_oob_html())
        }
    };

    ([(HX_REPLACE_URL, filter.page_url())], content).into_response()
}

/// Run a store query on the blocking thread pool.
async fn run_store_task<T, F>(db_connection: Arc<Mutex<Connection>>, task: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let connection = lock_connection(&db_connection)?;
        task(&connection)
    })
    .await
    .map_err(|error| Error::TaskError(error.to_string()))?
}

fn dashboard_view(fetch_state: FetchState) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-7xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Dashboard" }

                    button
                        type="button"
                        hx-get=(endpoints::NEW_EXPENSE_DIALOG)
                        hx-target={ "#" (DIALOG_CONTAINER_ID) }
                        hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Add Expense"
                    }
                }

                (dashboard_content_view(&fetch_state))
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(ECHARTS_URL.to_owned())];

    base("Dashboard", &scripts, &content)
}

fn dashboard_content_view(fetch_state: &FetchState) -> Markup {
    let refresh_trigger = format!(
        "{EXPENSES_CHANGED_EVENT} from:body, {CATEGORIES_CHANGED_EVENT} from:body"
    );

    match fetch_state {
        FetchState::Loading { query } => {
            let values: Map<String, Value> = [
                ("filter", &query.filter),
                ("from", &query.from),
                ("to", &query.to),
            ]
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .map(|value| (key.to_owned(), Value::from(value)))
            })
            .collect();
            let values = Value::Object(values).to_string();

            html! {
                div
                    id=(CONTENT_ID)
                    hx-get=(endpoints::DASHBOARD_CONTENT)
                    hx-vals=(values)
                    hx-trigger="load"
                    hx-swap="outerHTML"
                    hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                    class="w-full py-10 text-center"
                {
                    (loading_spinner())
                    span { "Loading expenses..." }
                }
            }
        }
        FetchState::Loaded {
            filter,
            today,
            expenses,
            categories,
        } => {
            let summary = DashboardSummary::new(expenses, categories);

            html! {
                div
                    id=(CONTENT_ID)
                    hx-get=(filter.content_url())
                    hx-trigger=(refresh_trigger)
                    hx-swap="outerHTML"
                    hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                    class="w-full space-y-6"
                {
                    (filter_bar_view(filter, *today))
                    (stat_cards_view(&summary, filter))

                    @if !expenses.is_empty() {
                        (spending_by_category_view(&summary.category_totals))
                    }

                    (expense_list_view(expenses, categories))
                }
            }
        }
        FetchState::Failed { filter, today } => html! {
            div
                id=(CONTENT_ID)
                hx-get=(filter.content_url())
                hx-trigger=(refresh_trigger)
                hx-swap="outerHTML"
                hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                class="w-full space-y-6"
            {
                (filter_bar_view(filter, *today))

                div class={ (CARD_STYLE) " text-center text-gray-500 dark:text-gray-400" }
                {
                    "Expenses could not be loaded. Try again in a moment."
                }
            }
        },
    }
}

fn filter_bar_view(active: &DateFilter, today: Date) -> Markup {
    let presets = [
        (DateFilter::Today, "Today"),
        (DateFilter::Week, "This Week"),
        (DateFilter::Month, "This Month"),
    ];
    let is_custom = matches!(active, DateFilter::Custom { .. });
    let range = active.range(today);

    html! {
        nav aria-label="Date range" class="flex flex-wrap items-start gap-2"
        {
            @for (filter, label) in presets {
                @let is_active = &filter == active;

                button
                    type="button"
                    hx-get=(filter.content_url())
                    hx-target={ "#" (CONTENT_ID) }
                    hx-swap="outerHTML"
                    aria-pressed=(is_active)
                    class=(if is_active { BUTTON_PRIMARY_STYLE } else { BUTTON_SECONDARY_STYLE })
                {
                    (label)
                }
            }

            details class="relative"
            {
                summary
                    aria-pressed=(is_custom)
                    class={
                        (if is_custom { BUTTON_PRIMARY_STYLE } else { BUTTON_SECONDARY_STYLE })
                        " list-none cursor-pointer"
                    }
                {
                    (active.custom_label())
                }

                form
                    hx-get=(endpoints::DASHBOARD_CONTENT)
                    hx-target={ "#" (CONTENT_ID) }
                    hx-swap="outerHTML"
                    class={ (CARD_STYLE) " absolute z-10 mt-2 w-72 space-y-3" }
                {
                    input type="hidden" name="filter" value="custom";

                    div
                    {
                        label for="from" class=(FORM_LABEL_STYLE) { "From" }
                        input
                            id="from"
                            type="date"
                            name="from"
                            value=(range.start())
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="to" class=(FORM_LABEL_STYLE) { "To" }
                        input
                            id="to"
                            type="date"
                            name="to"
                            value=(range.end())
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class={ (BUTTON_PRIMARY_STYLE) " w-full" } { "Apply" }
                }
            }
        }
    }
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Date, Duration};

    use crate::{
        category::{CategoryColor, CategoryName, NewCategory, create_category, delete_category},
        dashboard::filter::DashboardQuery,
        db::initialize,
        endpoints,
        expense::{NewExpense, create_expense},
        test_utils::{
            assert_content_type, assert_valid_html, get_header, parse_html_document,
            parse_html_fragment,
        },
        timezone::local_today,
    };

    use super::{DashboardState, get_dashboard_content, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn today() -> Date {
        local_today("Etc/UTC").unwrap()
    }

    fn insert_expense(state: &DashboardState, amount: f64, date: Date, category_id: Option<i64>) {
        create_expense(
            NewExpense {
                amount,
                description: format!("Expense {amount}"),
                date,
                category_id,
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test expense");
    }

    fn insert_category(state: &DashboardState, name: &str) -> i64 {
        create_category(
            NewCategory {
                name: CategoryName::new_unchecked(name),
                color: CategoryColor::new_unchecked("#3B82F6"),
            },
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category")
        .id
    }

    fn query(filter: &str) -> Query<DashboardQuery> {
        Query(DashboardQuery {
            filter: Some(filter.to_owned()),
            from: None,
            to: None,
        })
    }

    fn stat_values(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("[data-stat-value]").unwrap())
            .map(|value| value.text().collect())
            .collect()
    }

    fn text(html: &Html) -> String {
        html.root_element().text().collect()
    }

    #[tokio::test]
    async fn page_starts_loading_content() {
        let response = get_dashboard_page(query("week")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let content = html
            .select(&Selector::parse("#dashboard-content").unwrap())
            .next()
            .expect("No dashboard content container found");
        assert_eq!(
            content.value().attr("hx-get"),
            Some(endpoints::DASHBOARD_CONTENT)
        );
        assert_eq!(content.value().attr("hx-trigger"), Some("load"));
        assert!(
            content
                .value()
                .attr("hx-vals")
                .is_some_and(|values| values.contains("\"week\""))
        );

        let add_button = html
            .select(&Selector::parse("button[hx-get]").unwrap())
            .find(|button| button.value().attr("hx-get") == Some(endpoints::NEW_EXPENSE_DIALOG));
        assert!(add_button.is_some(), "No Add Expense button found");
    }

    #[tokio::test]
    async fn content_sums_expenses_in_range() {
        let state = get_test_state();
        let food = insert_category(&state, "Food");
        insert_expense(&state, 10.25, today(), Some(food));
        insert_expense(&state, 4.5, today(), None);
        insert_expense(&state, 100.0, today() - Duration::days(40), Some(food));

        let response = get_dashboard_content(State(state), query("today")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-replace-url"), "/dashboard?filter=today");
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_eq!(stat_values(&html), ["₹14.75", "2", "1"]);
        assert!(text(&html).contains("2 items"));
        assert!(
            html.select(&Selector::parse("#spending-by-category-chart").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn expenses_render_when_categories_fail_to_load() {
        let state = get_test_state();
        insert_expense(&state, 7.0, today(), None);
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE category", [])
            .unwrap();

        let response = get_dashboard_content(State(state), query("today")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(stat_values(&html), ["₹7.00", "1", "0"]);
        let alert = html
            .select(&Selector::parse("[hx-swap-oob]").unwrap())
            .next()
            .expect("No error alert found");
        assert!(
            alert
                .text()
                .collect::<String>()
                .contains("Could not load categories.")
        );
    }

    #[tokio::test]
    async fn failed_expense_fetch_renders_failed_state() {
        let state = get_test_state();
        insert_category(&state, "Food");
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE expense", [])
            .unwrap();

        let response = get_dashboard_content(State(state), query("today")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let text = text(&html);
        assert!(text.contains("Expenses could not be loaded. Try again in a moment."));
        assert!(text.contains("Could not load expenses."));
        assert!(!text.contains("Could not load categories."));
        assert!(stat_values(&html).is_empty());
        assert!(
            html.select(&Selector::parse("#dashboard-content[hx-trigger]").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn content_refetches_on_changes_with_current_filter() {
        let state = get_test_state();

        let response = get_dashboard_content(State(state), query("month")).await;

        let html = parse_html_fragment(response).await;
        let content = html
            .select(&Selector::parse("#dashboard-content").unwrap())
            .next()
            .expect("No dashboard content container found");
        assert_eq!(
            content.value().attr("hx-get"),
            Some("/dashboard/content?filter=month")
        );
        let trigger = content.value().attr("hx-trigger").unwrap_or_default();
        assert!(trigger.contains("expenses-changed from:body"), "got {trigger}");
        assert!(text(&html).contains("This month"));
    }

    #[tokio::test]
    async fn empty_range_shows_no_chart() {
        let state = get_test_state();

        let response = get_dashboard_content(State(state), query("today")).await;

        let html = parse_html_fragment(response).await;
        assert!(html.select(&Selector::parse("script").unwrap()).next().is_none());
        assert!(text(&html).contains("No expenses found. Add your first expense to get started!"));
        assert_eq!(stat_values(&html), ["₹0.00", "0", "0"]);
    }

    #[tokio::test]
    async fn deleted_category_shows_as_uncategorized() {
        let state = get_test_state();
        let food = insert_category(&state, "Food");
        insert_expense(&state, 3.0, today(), Some(food));
        delete_category(food, &state.db_connection.lock().unwrap()).unwrap();

        let response = get_dashboard_content(State(state), query("today")).await;

        let html = parse_html_fragment(response).await;
        let category = html
            .select(&Selector::parse("span[data-category]").unwrap())
            .next()
            .expect("No expense category found");
        assert_eq!(category.text().collect::<String>(), "Uncategorized");
        assert_eq!(stat_values(&html), ["₹3.00", "1", "0"]);
    }

    #[tokio::test]
    async fn invalid_custom_range_falls_back_to_today() {
        let state = get_test_state();
        insert_expense(&state, 8.0, today(), None);
        let query = Query(DashboardQuery {
            filter: Some("custom".to_owned()),
            from: Some("2024-01-20".to_owned()),
            to: Some("2024-01-05".to_owned()),
        });

        let response = get_dashboard_content(State(state), query).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-replace-url"), "/dashboard?filter=today");
        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("No alert found");
        assert_eq!(alert.value().attr("hx-swap-oob"), Some("innerHTML"));
        assert!(text(&html).contains("Invalid date range"));
        assert_eq!(stat_values(&html)[0], "₹8.00");
    }

    #[tokio::test]
    async fn custom_range_is_labelled() {
        let state = get_test_state();
        let query = Query(DashboardQuery {
            filter: Some("custom".to_owned()),
            from: Some("2024-01-05".to_owned()),
            to: Some("2024-01-20".to_owned()),
        });

        let response = get_dashboard_content(State(state), query).await;

        let html = parse_html_fragment(response).await;
        let summary = html
            .select(&Selector::parse("summary").unwrap())
            .next()
            .expect("No custom range button found");
        assert_eq!(summary.text().collect::<String>().trim(), "Jan 05 - Jan 20");
        assert!(text(&html).contains("Selected period"));
    }

    #[tokio::test]
    async fn unknown_timezone_returns_error_alert() {
        let mut state = get_test_state();
        state.local_timezone = "Middle/Earth".to_owned();

        let response = get_dashboard_content(State(state), query("today")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
