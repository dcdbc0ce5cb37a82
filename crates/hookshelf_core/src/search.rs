//! Search filter for the webhook list.

use crate::record::WebhookRecord;

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;

/// Records whose name or URL contains `query`, ignoring case.
///
/// A blank query matches everything. Collection order is preserved.
pub fn filter_webhooks<'a>(records: &'a [WebhookRecord], query: &str) -> Vec<&'a WebhookRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| {
            record.name.to_lowercase().contains(&needle)
                || record.url.to_lowercase().contains(&needle)
        })
        .collect()
}
