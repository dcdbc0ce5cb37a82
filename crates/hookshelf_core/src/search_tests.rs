use super::*;
use crate::record::WebhookFields;
use chrono::Utc;

fn records() -> Vec<WebhookRecord> {
    vec![
        WebhookRecord::create(WebhookFields::new("Deploy", "https://ci.test/deploy", ""), Utc::now()),
        WebhookRecord::create(WebhookFields::new("Chat", "https://chat.test/in", "zzz-token"), Utc::now()),
        WebhookRecord::create(WebhookFields::new("Alerts", "https://pager.test/DEPLOY", ""), Utc::now()),
    ]
}

#[test]
fn test_blank_query_returns_everything() {
    let all = records();
    assert_eq!(filter_webhooks(&all, "").len(), 3);
    assert_eq!(filter_webhooks(&all, "   ").len(), 3);
}

#[test]
fn test_matches_name_or_url_case_insensitively() {
    let all = records();
    let names: Vec<&str> = filter_webhooks(&all, "deploy")
        .into_iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["Deploy", "Alerts"]);
}

#[test]
fn test_does_not_match_secret() {
    let all = records();
    assert!(filter_webhooks(&all, "zzz").is_empty());
    assert_eq!(filter_webhooks(&all, "CHAT").len(), 1);
}
