//! Search filter pipeline
//!
//! Independent predicates applied in a fixed order over the canonical
//! listing (pinned first, then newest first): keyword, category, status,
//! start date, end date. Each stage narrows the previous result and none
//! of them re-sorts, so the input ordering survives to the output.

use chrono::{DateTime, Utc};

use crate::model::{is_wildcard, ContentItem, SearchCriteria, SearchType};
use crate::status::PublicationStatus;

/// Run the filter pipeline. An all-empty criteria set returns the input
/// unchanged.
pub fn apply_filters(items: Vec<ContentItem>, criteria: &SearchCriteria) -> Vec<ContentItem> {
    let mut items = items;

    // Keyword stage: trimmed, case-sensitive substring match
    if let Some(keyword) = criteria.keyword.as_deref() {
        let keyword = keyword.trim();
        if !keyword.is_empty() {
            items.retain(|item| matches_keyword(item, criteria.search_type, keyword));
        }
    }

    // Category stage: exact match; items without a category never match
    if let Some(category) = criteria.category.as_deref() {
        if !is_wildcard(category) {
            items.retain(|item| item.category.as_deref() == Some(category));
        }
    }

    // Status stage: an unrecognized status value matches nothing
    if let Some(status) = criteria.status.as_deref() {
        if !is_wildcard(status) {
            let wanted = PublicationStatus::from_str(status);
            items.retain(|item| wanted == Some(item.status));
        }
    }

    // Date stages: inclusive bounds on created_at
    if let Some(start) = criteria.start_date {
        let cutoff = day_start(start);
        items.retain(|item| item.created_at >= cutoff);
    }
    if let Some(end) = criteria.end_date {
        let cutoff = day_end(end);
        items.retain(|item| item.created_at <= cutoff);
    }

    items
}

fn matches_keyword(item: &ContentItem, search_type: SearchType, keyword: &str) -> bool {
    match search_type {
        SearchType::Title => item.title.contains(keyword),
        SearchType::Author => item
            .author
            .as_deref()
            .map(|a| a.contains(keyword))
            .unwrap_or(false),
        SearchType::Any => {
            item.title.contains(keyword)
                || item
                    .author
                    .as_deref()
                    .map(|a| a.contains(keyword))
                    .unwrap_or(false)
        }
    }
}

fn day_start(date: chrono::NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
        .and_utc()
}

fn day_end(date: chrono::NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
        .and_utc()
}
