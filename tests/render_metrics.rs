mod support;

use std::{collections::HashMap, sync::Arc};

use linksly::{
    application::{
        render::{RouteLinks, StaticLinks},
        subscribe::SubscriptionService,
    },
    domain::catalog::{CONTENT_PAGES, Page},
    infra::subscribers::FileSubscriberLog,
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use support::{renderer, repo_templates};

#[tokio::test]
async fn renders_and_signups_emit_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let live = renderer(&repo_templates(), Arc::new(RouteLinks));
    let exported = renderer(&repo_templates(), Arc::new(StaticLinks));
    for page in CONTENT_PAGES {
        live.render(page).expect("live render");
        exported.render(page).expect("static render");
    }
    // Live only.
    live.render(Page::NotFound).expect("404 render");

    let dir = tempfile::tempdir().expect("tempdir");
    let service = SubscriptionService::new(Arc::new(FileSubscriberLog::new(
        dir.path().join("subscribers.txt"),
    )));
    service
        .subscribe(Some("a@example.com"))
        .await
        .expect("signup recorded");
    service.subscribe(None).await.expect_err("missing email");

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| {
            let key = composite_key.key();
            let labels: Vec<String> = key
                .labels()
                .map(|label| format!("{}={}", label.key(), label.value()))
                .collect();
            let name = if labels.is_empty() {
                key.name().to_string()
            } else {
                format!("{}{{{}}}", key.name(), labels.join(","))
            };
            match value {
                DebugValue::Counter(count) => Some((name, count)),
                _ => None,
            }
        })
        .collect();

    assert_eq!(
        counters.get("linksly_pages_rendered_total{mode=live}"),
        Some(&5)
    );
    assert_eq!(
        counters.get("linksly_pages_rendered_total{mode=static}"),
        Some(&4)
    );
    assert_eq!(counters.get("linksly_subscriptions_total"), Some(&1));
    assert!(!counters.contains_key("linksly_page_render_failures_total{mode=live}"));
}
