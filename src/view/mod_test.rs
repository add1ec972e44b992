use super::*;
use crate::api::ApiError;
use crate::messages::Lang;
use crate::model::{Bubble, BubbleEnvelope, Resource};
use model::ResourceListView;
use std::collections::VecDeque;
use std::time::Duration;

// =========================================================================
// MockApi
// =========================================================================

type Reply<T> = (Duration, Result<T, ApiError>);

#[derive(Default)]
struct MockApi {
    lists: Mutex<VecDeque<Result<BubbleCollection, ApiError>>>,
    creates: Mutex<VecDeque<Result<BubbleEnvelope, ApiError>>>,
    fetches: Mutex<VecDeque<Reply<BubbleEnvelope>>>,
    calls: Mutex<Vec<String>>,
    created_with: Mutex<Vec<FormFields>>,
}

impl MockApi {
    fn push_list(&self, reply: Result<BubbleCollection, ApiError>) {
        self.lists.lock().unwrap().push_back(reply);
    }

    fn push_create(&self, reply: Result<BubbleEnvelope, ApiError>) {
        self.creates.lock().unwrap().push_back(reply);
    }

    fn push_fetch(&self, delay: Duration, reply: Result<BubbleEnvelope, ApiError>) {
        self.fetches.lock().unwrap().push_back((delay, reply));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BubbleApi for MockApi {
    async fn list_bubbles(&self) -> Result<BubbleCollection, ApiError> {
        self.calls.lock().unwrap().push("list".into());
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no reply".into())))
    }

    async fn create_bubble(&self, fields: &FormFields) -> Result<BubbleEnvelope, ApiError> {
        self.calls.lock().unwrap().push("create".into());
        self.created_with.lock().unwrap().push(fields.clone());
        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no reply".into())))
    }

    async fn fetch_resources(&self, bubble_id: i64, query: &str) -> Result<BubbleEnvelope, ApiError> {
        self.calls.lock().unwrap().push(format!("fetch {bubble_id} {query}"));
        let next = self.fetches.lock().unwrap().pop_front();
        let (delay, reply) = next.unwrap_or_else(|| (Duration::ZERO, Err(ApiError::Transport("no reply".into()))));
        tokio::time::sleep(delay).await;
        reply
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn bubble(id: i64, resources: Vec<Resource>) -> Bubble {
    Bubble {
        id,
        title: format!("title {id}"),
        idea: "idea".into(),
        created_at: "2024-01-01T00:00:00".into(),
        resources,
    }
}

fn titled(title: &str) -> Resource {
    Resource { title: Some(title.into()), snippet: None, url: None }
}

fn envelope(id: i64, resources: Vec<Resource>) -> BubbleEnvelope {
    BubbleEnvelope { bubble: bubble(id, resources), resources: None }
}

fn collection(ids: &[i64]) -> BubbleCollection {
    BubbleCollection { bubbles: ids.iter().map(|id| bubble(*id, vec![])).collect() }
}

fn view_with(api: &Arc<MockApi>) -> BubbleView {
    BubbleView::new(api.clone(), Lang::En.messages())
}

async fn loaded_view(api: &Arc<MockApi>, ids: &[i64]) -> BubbleView {
    api.push_list(Ok(collection(ids)));
    let view = view_with(api);
    assert_eq!(view.load().await, Outcome::Applied);
    view
}

fn item_titles(view: &BubbleView, id: i64) -> Vec<String> {
    match view.card(id).unwrap().resources {
        ResourceListView::Items(items) => items.into_iter().map(|i| i.title).collect(),
        ResourceListView::Placeholder(_) => Vec::new(),
    }
}

// =========================================================================
// load / render_list
// =========================================================================

#[tokio::test]
async fn load_renders_one_card_per_bubble() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[1, 2, 3]).await;
    let page = view.snapshot();
    assert_eq!(page.list.cards.len(), 3);
    assert!(!page.list.empty_visible);
}

#[tokio::test]
async fn load_empty_collection_shows_empty_state() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[]).await;
    let page = view.snapshot();
    assert!(page.list.cards.is_empty());
    assert!(page.list.empty_visible);
}

#[tokio::test]
async fn load_failure_keeps_previous_render() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[1, 2]).await;
    api.push_list(Err(ApiError::Malformed("expected value".into())));

    assert_eq!(view.load().await, Outcome::Failed);
    let page = view.snapshot();
    assert_eq!(page.list.cards.len(), 2);
    assert_eq!(page.toast.message, Lang::En.messages().load_failed);
    assert!(page.toast.visible);
}

#[tokio::test]
async fn reload_replaces_cards() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[1, 2]).await;
    api.push_list(Ok(collection(&[7])));
    view.load().await;
    let ids: Vec<i64> = view.snapshot().list.cards.iter().map(|c| c.bubble_id).collect();
    assert_eq!(ids, [7]);
}

// =========================================================================
// submit_query
// =========================================================================

#[tokio::test]
async fn whitespace_query_sends_nothing() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    assert_eq!(view.submit_query(5, "   \t ").await, Outcome::Skipped);
    assert_eq!(api.calls(), ["list"]);
    assert!(view.card(5).unwrap().query_form.submit_enabled);
}

#[tokio::test]
async fn query_for_unrendered_card_sends_nothing() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    assert_eq!(view.submit_query(6, "rust").await, Outcome::Skipped);
    assert_eq!(api.calls(), ["list"]);
}

#[tokio::test]
async fn successful_query_updates_only_that_card() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[4, 5, 6]).await;
    let before_4 = view.card(4).unwrap();
    let before_6 = view.card(6).unwrap();
    api.push_fetch(Duration::ZERO, Ok(envelope(5, vec![titled("A")])));

    assert_eq!(view.submit_query(5, "  rust  ").await, Outcome::Applied);

    assert_eq!(api.calls(), ["list", "fetch 5 rust"]);
    assert_eq!(item_titles(&view, 5), ["A"]);
    assert_eq!(view.card(4).unwrap(), before_4);
    assert_eq!(view.card(6).unwrap(), before_6);
    let page = view.snapshot();
    assert_eq!(page.toast.message, Lang::En.messages().resources_updated);
    assert!(view.card(5).unwrap().query_form.submit_enabled);
}

#[tokio::test]
async fn query_response_replaces_previous_resources() {
    let api = Arc::new(MockApi::default());
    api.push_list(Ok(BubbleCollection { bubbles: vec![bubble(5, vec![titled("old")])] }));
    let view = view_with(&api);
    view.load().await;
    api.push_fetch(Duration::ZERO, Ok(envelope(5, vec![titled("new one"), titled("new two")])));

    view.submit_query(5, "q").await;
    assert_eq!(item_titles(&view, 5), ["new one", "new two"]);
}

#[tokio::test]
async fn failed_query_toasts_server_error_and_reenables() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(
        Duration::ZERO,
        Err(ApiError::Status { status: 404, message: Some("Bubble not found".into()) }),
    );

    assert_eq!(view.submit_query(5, "q").await, Outcome::Failed);
    assert_eq!(view.snapshot().toast.message, "Bubble not found");
    assert!(view.card(5).unwrap().query_form.submit_enabled);
    assert!(matches!(view.card(5).unwrap().resources, ResourceListView::Placeholder(_)));
}

#[tokio::test]
async fn failed_query_without_message_uses_fallback() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(Duration::ZERO, Err(ApiError::Transport("connection refused".into())));

    view.submit_query(5, "q").await;
    assert_eq!(view.snapshot().toast.message, Lang::En.messages().request_failed);
}

#[tokio::test(start_paused = true)]
async fn submit_control_disabled_while_in_flight() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(Duration::from_millis(500), Ok(envelope(5, vec![titled("A")])));

    let pending = view.submit_query(5, "q");
    tokio::pin!(pending);
    tokio::select! {
        _ = &mut pending => panic!("query should still be in flight"),
        () = tokio::time::sleep(Duration::from_millis(100)) => {}
    }
    assert!(!view.card(5).unwrap().query_form.submit_enabled);

    assert_eq!(pending.await, Outcome::Applied);
    assert!(view.card(5).unwrap().query_form.submit_enabled);
}

#[tokio::test(start_paused = true)]
async fn dropped_query_reenables_submit_control() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(Duration::from_secs(60), Ok(envelope(5, vec![titled("A")])));

    let timed_out = tokio::time::timeout(Duration::from_millis(100), view.submit_query(5, "q")).await;
    assert!(timed_out.is_err());
    assert!(view.card(5).unwrap().query_form.submit_enabled);
    assert!(matches!(view.card(5).unwrap().resources, ResourceListView::Placeholder(_)));
}

#[tokio::test(start_paused = true)]
async fn stale_query_response_is_dropped() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(Duration::from_millis(300), Ok(envelope(5, vec![titled("slow")])));
    api.push_fetch(Duration::from_millis(10), Ok(envelope(5, vec![titled("fast")])));

    let (older, newer) = tokio::join!(view.submit_query(5, "first"), view.submit_query(5, "second"));

    assert_eq!(newer, Outcome::Applied);
    assert_eq!(older, Outcome::Skipped);
    assert_eq!(item_titles(&view, 5), ["fast"]);
}

#[tokio::test(start_paused = true)]
async fn stale_query_failure_is_dropped() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(
        Duration::from_millis(300),
        Err(ApiError::Status { status: 500, message: Some("old boom".into()) }),
    );
    api.push_fetch(Duration::from_millis(10), Ok(envelope(5, vec![titled("fast")])));

    let (older, newer) = tokio::join!(view.submit_query(5, "first"), view.submit_query(5, "second"));

    assert_eq!(newer, Outcome::Applied);
    assert_eq!(older, Outcome::Skipped);
    assert_eq!(view.snapshot().toast.message, Lang::En.messages().resources_updated);
    assert_eq!(item_titles(&view, 5), ["fast"]);
}

#[tokio::test(start_paused = true)]
async fn submit_stays_disabled_while_newer_query_in_flight() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(Duration::from_millis(10), Ok(envelope(5, vec![titled("old")])));
    api.push_fetch(Duration::from_millis(500), Ok(envelope(5, vec![titled("new")])));

    let older = view.submit_query(5, "a");
    let newer = view.submit_query(5, "b");
    tokio::pin!(older, newer);
    tokio::select! {
        biased;
        _ = &mut older => panic!("older query should still be in flight"),
        _ = &mut newer => panic!("newer query should still be in flight"),
        () = tokio::time::sleep(Duration::from_millis(1)) => {}
    }

    assert_eq!(older.await, Outcome::Skipped);
    assert!(!view.card(5).unwrap().query_form.submit_enabled);

    assert_eq!(newer.await, Outcome::Applied);
    assert!(view.card(5).unwrap().query_form.submit_enabled);
    assert_eq!(item_titles(&view, 5), ["new"]);
}

#[tokio::test(start_paused = true)]
async fn response_after_reload_is_dropped() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[5]).await;
    api.push_fetch(Duration::from_millis(300), Ok(envelope(5, vec![titled("late")])));
    api.push_list(Ok(collection(&[5])));

    let (query, reload) = tokio::join!(view.submit_query(5, "q"), view.load());

    assert_eq!(reload, Outcome::Applied);
    assert_eq!(query, Outcome::Skipped);
    assert!(matches!(view.card(5).unwrap().resources, ResourceListView::Placeholder(_)));
}

#[tokio::test(start_paused = true)]
async fn queries_on_different_cards_are_independent() {
    let api = Arc::new(MockApi::default());
    let view = loaded_view(&api, &[1, 2]).await;
    api.push_fetch(Duration::from_millis(200), Ok(envelope(1, vec![titled("one")])));
    api.push_fetch(Duration::from_millis(50), Ok(envelope(2, vec![titled("two")])));

    let (a, b) = tokio::join!(view.submit_query(1, "a"), view.submit_query(2, "b"));

    assert_eq!((a, b), (Outcome::Applied, Outcome::Applied));
    assert_eq!(item_titles(&view, 1), ["one"]);
    assert_eq!(item_titles(&view, 2), ["two"]);
}

// =========================================================================
// submit_create
// =========================================================================

#[tokio::test]
async fn failed_create_toasts_error_and_keeps_form() {
    let api = Arc::new(MockApi::default());
    let view = view_with(&api);
    view.set_field("title", "");
    view.set_field("idea", "something");
    api.push_create(Err(ApiError::Status { status: 400, message: Some("title required".into()) }));

    assert_eq!(view.submit_create().await, Outcome::Failed);

    let page = view.snapshot();
    assert_eq!(page.toast.message, "title required");
    assert_eq!(page.create_form.get("idea").map(String::as_str), Some("something"));
    assert_eq!(api.calls(), ["create"]);
}

#[tokio::test]
async fn failed_create_without_message_uses_fallback() {
    let api = Arc::new(MockApi::default());
    let view = view_with(&api);
    api.push_create(Err(ApiError::Malformed("eof".into())));
    view.submit_create().await;
    assert_eq!(view.snapshot().toast.message, Lang::En.messages().create_failed);
}

#[tokio::test]
async fn successful_create_resets_form_and_reloads() {
    let api = Arc::new(MockApi::default());
    let view = view_with(&api);
    view.set_field("title", "draft");
    view.set_field("title", "final");
    view.set_field("idea", "an idea");
    api.push_create(Ok(envelope(1, vec![])));
    api.push_list(Ok(collection(&[1])));

    assert_eq!(view.submit_create().await, Outcome::Applied);

    let sent = api.created_with.lock().unwrap()[0].clone();
    assert_eq!(sent.get("title").map(String::as_str), Some("final"));
    assert_eq!(sent.len(), 2);
    assert_eq!(api.calls(), ["create", "list"]);
    let page = view.snapshot();
    assert!(page.create_form.is_empty());
    assert_eq!(page.toast.message, Lang::En.messages().created);
    assert_eq!(page.list.cards.len(), 1);
}

// =========================================================================
// show_toast
// =========================================================================

#[tokio::test(start_paused = true)]
async fn show_toast_hides_after_delay() {
    let api = Arc::new(MockApi::default());
    let view = view_with(&api);
    view.show_toast("x");
    assert!(view.snapshot().toast.visible);

    tokio::time::sleep(toast::TOAST_DURATION + Duration::from_millis(10)).await;
    assert!(!view.snapshot().toast.visible);
}
