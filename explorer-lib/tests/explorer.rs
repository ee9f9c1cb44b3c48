use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use explorer_lib::Explorer;
use explorer_lib::action::DataClient;
use explorer_lib::action::LogRowsAction;
use explorer_lib::action::RowActionDispatcher;
use explorer_lib::action::RowSet;
use explorer_lib::action::action_fn;
use explorer_lib::config::ExplorerConfig;
use explorer_lib::error::ActionError;
use explorer_lib::error::ClientError;
use explorer_lib::error::Error;
use explorer_lib::error::SourceError;
use explorer_lib::error::ViewError;
use explorer_lib::model::DynRecord;
use explorer_lib::model::Record;
use explorer_lib::registry::FieldDescriptor;
use explorer_lib::registry::FieldOption;
use explorer_lib::registry::FieldRegistry;
use explorer_lib::selection::SelectionChange;
use explorer_lib::selection::SelectionState;
use explorer_lib::source::DataSource;
use explorer_lib::source::MemorySource;
use explorer_lib::toolbar::FeatureSet;
use explorer_lib::toolbar::ToolbarEvent;
use explorer_lib::toolbar::ToolbarOutcome;
use explorer_lib::view::Direction;

fn registry() -> FieldRegistry<DynRecord> {
    FieldRegistry::new([
        FieldDescriptor::field("title", "Title"),
        FieldDescriptor::field("status", "Status").with_options([
            FieldOption::from("open"),
            FieldOption::from("closed"),
        ]),
        FieldDescriptor::field("priority", "Priority")
            .with_options([FieldOption::from("high"), FieldOption::from("low")])
            .with_feature("triage"),
        FieldDescriptor::field("notes", "Notes").not_sortable().hidden(),
    ])
    .unwrap()
}

fn record(id: &str, title: &str, status: &str, priority: &str) -> DynRecord {
    DynRecord::new(id)
        .set("title", title)
        .set("status", status)
        .set("priority", priority)
        .set("notes", format!("notes for {}", title))
}

fn tickets() -> Vec<DynRecord> {
    vec![
        record("1", "Printer jam", "open", "high"),
        record("2", "Badge reader", "closed", "low"),
        record("3", "VPN drops", "open", "low"),
        record("4", "Printer toner", "closed", "high"),
    ]
}

fn mount() -> Explorer<DynRecord> {
    let config = ExplorerConfig::default().with_debounce(Duration::ZERO);
    Explorer::mount(registry(), tickets(), config)
}

fn ids(explorer: &Explorer<DynRecord>) -> Vec<String> {
    explorer
        .rows()
        .unwrap()
        .into_iter()
        .map(|r| r.id().to_string())
        .collect()
}

struct UnreachableSource;

#[async_trait]
impl DataSource<DynRecord> for UnreachableSource {
    async fn fetch_collection(&self) -> Result<Vec<DynRecord>, SourceError> {
        Err(SourceError::new("down"))
    }
}

#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<(String, serde_json::Value)>>,
}

#[async_trait]
impl DataClient for RecordingClient {
    async fn execute(
        &self,
        operation: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), payload));
        Ok(serde_json::Value::Null)
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_mount_renders_original_order() {
    let explorer = mount();
    assert_eq!(ids(&explorer), ["1", "2", "3", "4"]);
    assert!(!explorer.selection().panel_open());

    let columns: Vec<_> = explorer.visible_columns().iter().map(|f| f.key()).collect();
    assert_eq!(columns, ["title", "status", "priority"]);
}

#[test]
fn test_status_facet_scenario() {
    let records = vec![
        DynRecord::new("1").set("status", "open"),
        DynRecord::new("2").set("status", "closed"),
    ];
    let mut explorer = Explorer::mount(registry(), records, ExplorerConfig::default());

    let outcome = explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), Instant::now());
    assert!(matches!(outcome, ToolbarOutcome::Applied(_)));
    assert_eq!(ids(&explorer), ["1"]);
}

#[test]
fn test_search_facet_and_sort_compose() {
    let mut explorer = mount();
    let now = Instant::now();

    explorer.toolbar(ToolbarEvent::TextInput("  printer ".into()), now);
    assert_eq!(explorer.view().free_text(), "printer");
    assert_eq!(ids(&explorer), ["1", "4"]);

    explorer.toolbar(ToolbarEvent::sort_by("title", Some(Direction::Desc)), now);
    assert_eq!(ids(&explorer), ["4", "1"]);

    explorer.toolbar(ToolbarEvent::toggle_facet("priority", "high"), now);
    explorer.toolbar(ToolbarEvent::toggle_facet("status", "closed"), now);
    assert_eq!(ids(&explorer), ["4"]);

    explorer.toolbar(ToolbarEvent::Reset, now);
    assert_eq!(ids(&explorer), ["1", "2", "3", "4"]);
}

#[test]
fn test_search_ignores_hidden_columns() {
    let mut explorer = mount();
    explorer.toolbar(ToolbarEvent::TextInput("notes for".into()), Instant::now());
    assert!(ids(&explorer).is_empty());

    explorer.toolbar(ToolbarEvent::set_column_visible("notes", true), Instant::now());
    assert_eq!(ids(&explorer).len(), 4);
}

#[test]
fn test_facet_counts_ignore_own_selection() {
    let mut explorer = mount();
    explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), Instant::now());

    let counts = explorer.facet_counts("status").unwrap();
    let pairs: Vec<_> = counts
        .iter()
        .map(|c| (c.value.as_str(), c.count, c.selected))
        .collect();
    assert_eq!(pairs, [("open", 2, true), ("closed", 2, false)]);

    let priority = explorer.facet_counts("priority").unwrap();
    let pairs: Vec<_> = priority.iter().map(|c| (c.value.as_str(), c.count)).collect();
    assert_eq!(pairs, [("high", 1), ("low", 1)]);
}

// ============================================================================
// Toolbar edits
// ============================================================================

#[test]
fn test_facet_toggle_twice_restores_filters() {
    let mut explorer = mount();
    let before = explorer.view().clone();

    explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), Instant::now());
    explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), Instant::now());

    assert_eq!(explorer.view(), &before);
    assert!(explorer.view().facet_filters().is_empty());
}

#[test]
fn test_hiding_last_column_is_rejected() {
    let mut explorer = mount();
    let now = Instant::now();
    explorer.toolbar(ToolbarEvent::ToggleColumn("status".into()), now);
    explorer.toolbar(ToolbarEvent::ToggleColumn("priority".into()), now);
    let before = explorer.view().clone();

    let outcome = explorer.toolbar(ToolbarEvent::ToggleColumn("title".into()), now);
    assert!(matches!(
        outcome,
        ToolbarOutcome::Rejected(ViewError::InvalidStateTransition { .. })
    ));
    assert_eq!(explorer.view(), &before);
    let columns: Vec<_> = explorer.visible_columns().iter().map(|f| f.key()).collect();
    assert_eq!(columns, ["title"]);
}

#[test]
fn test_undeclared_option_is_rejected() {
    let mut explorer = mount();
    let outcome = explorer.toolbar(ToolbarEvent::toggle_facet("status", "pending"), Instant::now());
    assert!(matches!(
        outcome,
        ToolbarOutcome::Rejected(ViewError::InvalidFilterValue { .. })
    ));
    assert_eq!(ids(&explorer), ["1", "2", "3", "4"]);
}

#[test]
fn test_gated_facet_requires_entitlement() {
    let config = ExplorerConfig::default();
    let mut explorer = Explorer::mount(registry(), tickets(), config)
        .with_entitlements(FeatureSet::new(Vec::<String>::new()));

    let facets: Vec<_> = explorer.visible_facets().iter().map(|f| f.key()).collect();
    assert_eq!(facets, ["status"]);

    let outcome = explorer.toolbar(ToolbarEvent::toggle_facet("priority", "high"), Instant::now());
    assert!(matches!(
        outcome,
        ToolbarOutcome::Rejected(ViewError::FacetUnavailable { .. })
    ));

    let mut entitled = Explorer::mount(registry(), tickets(), ExplorerConfig::default())
        .with_entitlements(FeatureSet::new(["triage"]));
    assert_eq!(entitled.visible_facets().len(), 2);
    entitled.toolbar(ToolbarEvent::toggle_facet("priority", "high"), Instant::now());
    assert_eq!(ids(&entitled), ["1", "4"]);
}

#[test]
fn test_search_is_debounced() {
    let config = ExplorerConfig::default().with_debounce(Duration::from_millis(300));
    let mut explorer = Explorer::mount(registry(), tickets(), config);
    let start = Instant::now();

    let outcome = explorer.toolbar(ToolbarEvent::TextInput("vpn".into()), start);
    assert_eq!(outcome, ToolbarOutcome::Pending);
    assert_eq!(ids(&explorer).len(), 4);

    assert!(!explorer.poll(start + Duration::from_millis(100)));
    assert!(explorer.poll(start + Duration::from_millis(300)));
    assert_eq!(ids(&explorer), ["3"]);
}

#[test]
fn test_flush_commits_pending_search() {
    let mut explorer = Explorer::mount(registry(), tickets(), ExplorerConfig::default());
    explorer.toolbar(ToolbarEvent::TextInput("badge".into()), Instant::now());
    assert!(explorer.flush());
    assert_eq!(ids(&explorer), ["2"]);
    assert!(!explorer.flush());
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selected_record_removed_closes_panel() {
    let records = vec![
        DynRecord::new("1").set("status", "open"),
        DynRecord::new("2").set("status", "closed"),
    ];
    let mut explorer = Explorer::mount(registry(), records, ExplorerConfig::default());

    assert!(explorer.click_row(&"2".to_string()));
    assert_eq!(explorer.selection().selected_id(), Some("2".to_string()));

    let change = explorer.apply_collection(vec![DynRecord::new("1").set("status", "open")]);
    assert_eq!(change, SelectionChange::Evicted);
    assert_eq!(explorer.selection(), &SelectionState::Closed);
    assert_eq!(explorer.selection().selected_id(), None);
}

#[test]
fn test_selected_record_refreshed_in_place() {
    let mut explorer = mount();
    explorer.click_row(&"3".to_string());

    let mut fresh = tickets();
    fresh[2] = record("3", "VPN drops nightly", "closed", "high");
    let change = explorer.apply_collection(fresh);

    assert_eq!(change, SelectionChange::Refreshed);
    let shown = explorer.selection().record().unwrap();
    assert_eq!(shown.value("title").to_string(), "VPN drops nightly");
    assert_eq!(shown.value("status").to_string(), "closed");
}

#[test]
fn test_selection_survives_filtering() {
    let mut explorer = mount();
    explorer.click_row(&"2".to_string());
    explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), Instant::now());

    assert!(!ids(&explorer).contains(&"2".to_string()));
    assert!(explorer.selection().panel_open());
}

#[test]
fn test_unknown_row_click_keeps_state() {
    let mut explorer = mount();
    assert!(!explorer.click_row(&"99".to_string()));
    assert!(!explorer.selection().panel_open());

    explorer.click_row(&"1".to_string());
    assert!(!explorer.click_row(&"99".to_string()));
    assert_eq!(explorer.selection().selected_id(), Some("1".to_string()));
}

#[test]
fn test_close_and_unmount() {
    let config = ExplorerConfig::default();
    let mut explorer = Explorer::mount(registry(), tickets(), config);
    explorer.click_row(&"1".to_string());
    explorer.close_panel();
    assert!(!explorer.selection().panel_open());

    explorer.click_row(&"1".to_string());
    explorer.toolbar(ToolbarEvent::TextInput("vpn".into()), Instant::now());
    explorer.unmount();
    assert!(!explorer.selection().panel_open());
    assert_eq!(explorer.toolbar_controller().pending_text(), None);
}

// ============================================================================
// Refresh and row actions
// ============================================================================

#[tokio::test]
async fn test_refresh_from_source() {
    let mut explorer = mount();
    explorer.click_row(&"4".to_string());

    let source = MemorySource::new(tickets());
    source.set(tickets().into_iter().take(2).collect());

    let change = explorer.refresh(&source).await.unwrap();
    assert_eq!(change, SelectionChange::Evicted);
    assert_eq!(ids(&explorer), ["1", "2"]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_collection_and_selection() {
    let mut explorer = mount();
    explorer.click_row(&"2".to_string());

    let err = explorer.refresh(&UnreachableSource).await.unwrap_err();
    assert_eq!(err, SourceError::new("down"));
    assert_eq!(ids(&explorer), ["1", "2", "3", "4"]);
    assert_eq!(explorer.selection().selected_id(), Some("2".to_string()));
}

#[tokio::test]
async fn test_action_success_survives_failed_refresh() {
    let client = Arc::new(RecordingClient::default());
    let mut actions = RowActionDispatcher::new().with_client(client.clone());
    actions.register_action("log-rows", LogRowsAction);
    let mut explorer = mount().with_actions(actions);
    explorer.click_row(&"3".to_string());

    let run = explorer
        .run_action("log-rows", &UnreachableSource)
        .await
        .unwrap();
    assert_eq!(run.report.action, "log-rows");
    assert_eq!(run.report.rows, 4);
    assert_eq!(run.refresh, Some(Err(SourceError::new("down"))));
    assert!(!run.refreshed());

    assert_eq!(ids(&explorer), ["1", "2", "3", "4"]);
    assert_eq!(explorer.selection().selected_id(), Some("3".to_string()));
}

#[tokio::test]
async fn test_action_receives_rendered_rows_and_refreshes() {
    let client = Arc::new(RecordingClient::default());
    let mut actions = RowActionDispatcher::new().with_client(client.clone());
    actions.register_action(
        "escalate",
        action_fn(|rows: RowSet, client: Arc<dyn DataClient>| async move {
            let payload =
                serde_json::to_value(&rows).map_err(|e| ActionError::failed(e.to_string()))?;
            client.execute("escalate", payload).await?;
            Ok::<(), ActionError>(())
        }),
    );

    let mut explorer = mount().with_actions(actions);
    let now = Instant::now();
    explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), now);
    explorer.toolbar(ToolbarEvent::ToggleColumn("priority".into()), now);
    explorer.toolbar(ToolbarEvent::sort_by("title", Some(Direction::Desc)), now);

    let mut updated = tickets();
    updated[0] = record("1", "Printer jam", "closed", "high");
    let source = MemorySource::new(updated);

    let run = explorer.run_action("escalate", &source).await.unwrap();
    assert_eq!(run.report.rows, 2);
    assert!(run.report.refresh_requested);
    assert_eq!(run.refresh, Some(Ok(SelectionChange::Unchanged)));
    assert!(run.refreshed());

    {
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let payload = &calls[0].1;
        assert_eq!(payload["columns"], serde_json::json!(["title", "status"]));
        assert_eq!(payload["rows"][0]["id"], "3");
        assert_eq!(payload["rows"][1]["id"], "1");
        assert!(payload["rows"][0]["cells"].get("priority").is_none());
    }

    // The refresh after the action picked up the new status.
    assert_eq!(ids(&explorer), ["3"]);
}

#[tokio::test]
async fn test_view_edits_while_action_in_flight() {
    let client = Arc::new(RecordingClient::default());
    let mut actions = RowActionDispatcher::new().with_client(client.clone());
    actions.register_action(
        "touch",
        action_fn(|rows: RowSet, client: Arc<dyn DataClient>| async move {
            tokio::task::yield_now().await;
            let ids: Vec<_> = rows.rows.iter().map(|r| r.id.clone()).collect();
            client.execute("touch", serde_json::json!(ids)).await?;
            Ok::<(), ActionError>(())
        }),
    );

    let mut explorer = mount().with_actions(actions);
    let prepared = explorer.prepare_action("touch").unwrap();

    explorer.toolbar(ToolbarEvent::toggle_facet("status", "closed"), Instant::now());
    assert_eq!(ids(&explorer), ["2", "4"]);

    let report = prepared.run().await.unwrap();
    assert_eq!(report.rows, 4);
    assert_eq!(
        client.calls.lock().unwrap()[0].1,
        serde_json::json!(["1", "2", "3", "4"])
    );
}

#[tokio::test]
async fn test_failed_action_leaves_state_untouched() {
    let mut explorer = mount();
    explorer.click_row(&"1".to_string());
    explorer.toolbar(ToolbarEvent::toggle_facet("status", "open"), Instant::now());
    let before = explorer.view().clone();

    let source = MemorySource::<DynRecord>::new(Vec::new());
    let err = explorer.run_action("missing", &source).await.unwrap_err();
    match err {
        Error::Action(failure) => {
            assert_eq!(failure.action, "missing");
            assert_eq!(
                failure.error,
                ActionError::UnknownAction {
                    name: "missing".into()
                }
            );
        }
        other => panic!("unexpected error: {}", other),
    }

    assert_eq!(explorer.view(), &before);
    assert_eq!(ids(&explorer), ["1", "3"]);
    assert_eq!(explorer.selection().selected_id(), Some("1".to_string()));
}

#[tokio::test]
async fn test_action_without_client_fails() {
    let mut actions = RowActionDispatcher::new();
    actions.register_action(
        "touch",
        action_fn(|_rows: RowSet, _client: Arc<dyn DataClient>| async move {
            Ok::<(), ActionError>(())
        }),
    );
    let mut explorer = mount().with_actions(actions);
    let source = MemorySource::<DynRecord>::new(Vec::new());

    let err = explorer.run_action("touch", &source).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "action 'touch' failed: no data client is available"
    );
    assert_eq!(ids(&explorer).len(), 4);
}
