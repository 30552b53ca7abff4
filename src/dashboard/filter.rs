//! Date range presets for the dashboard.

use std::ops::RangeInclusive;

use serde::Deserialize;
use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, endpoints, expense::parse_date};

const BUTTON_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day]");

/// The date range the dashboard summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DateFilter {
    Today,
    /// From the Monday of the current week to today.
    Week,
    /// From the first of the current month to today.
    Month,
    /// An explicit, inclusive range chosen by the user.
    Custom { from: Date, to: Date },
}

impl DateFilter {
    /// The inclusive range of days covered by the filter.
    ///
    /// Ranges are day-aligned, so "today end-of-day" is just `today`.
    pub(super) fn range(&self, today: Date) -> RangeInclusive<Date> {
        match *self {
            DateFilter::Today => today..=today,
            DateFilter::Week => {
                let days_since_monday = today.weekday().number_days_from_monday();
                today - Duration::days(days_since_monday.into())..=today
            }
            DateFilter::Month => today.replace_day(1).unwrap_or(today)..=today,
            DateFilter::Custom { from, to } => from..=to,
        }
    }

    /// The name used for the filter in query strings.
    pub(super) fn key(&self) -> &'static str {
        match self {
            DateFilter::Today => "today",
            DateFilter::Week => "week",
            DateFilter::Month => "month",
            DateFilter::Custom { .. } => "custom",
        }
    }

    /// The description shown under the total on the stat card.
    pub(super) fn description(&self) -> &'static str {
        match self {
            DateFilter::Today => "Today",
            DateFilter::Week => "This week",
            DateFilter::Month => "This month",
            DateFilter::Custom { .. } => "Selected period",
        }
    }

    /// The label of the custom range button, e.g. "Jan 05 - Jan 20".
    pub(super) fn custom_label(&self) -> String {
        match self {
            DateFilter::Custom { from, to } => format!(
                "{} - {}",
                from.format(BUTTON_DATE_FORMAT).unwrap_or_else(|_| from.to_string()),
                to.format(BUTTON_DATE_FORMAT).unwrap_or_else(|_| to.to_string()),
            ),
            _ => "Custom".to_owned(),
        }
    }

    /// The query string that selects this filter, without the leading `?`.
    pub(super) fn query_string(&self) -> String {
        match self {
            DateFilter::Custom { from, to } => format!("filter=custom&from={from}&to={to}"),
            filter => format!("filter={}", filter.key()),
        }
    }

    /// The URL of the dashboard page showing this filter.
    pub(super) fn page_url(&self) -> String {
        format!("{}?{}", endpoints::DASHBOARD_VIEW, self.query_string())
    }

    /// The URL of the dashboard content fragment for this filter.
    pub(super) fn content_url(&self) -> String {
        format!("{}?{}", endpoints::DASHBOARD_CONTENT, self.query_string())
    }
}

/// The query parameters accepted by the dashboard page and its content.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DashboardQuery {
    /// One of `today`, `week`, `month` or `custom`. Defaults to `today`.
    pub filter: Option<String>,
    /// The first day of a custom range, as `YYYY-MM-DD`.
    pub from: Option<String>,
    /// The last day of a custom range, as `YYYY-MM-DD`.
    pub to: Option<String>,
}

impl DashboardQuery {
    /// Work out which filter the query selects.
    ///
    /// A missing or unknown filter name selects [DateFilter::Today].
    ///
    /// # Errors
    ///
    /// A custom range that is missing a bound, has a malformed date or starts
    /// after it ends is an error. Callers should fall back to
    /// [DateFilter::Today] and tell the user.
    pub(super) fn date_filter(&self) -> Result<DateFilter, Error> {
        match self.filter.as_deref().map(str::trim) {
            Some("week") => Ok(DateFilter::Week),
            Some("month") => Ok(DateFilter::Month),
            Some("custom") => self.custom_range(),
            _ => Ok(DateFilter::Today),
        }
    }

    fn custom_range(&self) -> Result<DateFilter, Error> {
        let bound = |text: &Option<String>| match text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => parse_date(text),
            _ => Err(Error::MissingFormFields("Please choose a start and end date")),
        };

        let from = bound(&self.from)?;
        let to = bound(&self.to)?;

        if from > to {
            return Err(Error::InvalidDateRange(from, to));
        }

        Ok(DateFilter::Custom { from, to })
    }
}
