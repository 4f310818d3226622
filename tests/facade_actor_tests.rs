use std::sync::Arc;

use async_trait::async_trait;
use nodeprop::{
    DispatchError, DispatchFacade, DispatchRequest, FlowActor, FlowFacade, FlowParams,
    HttpResponse, RecordingTransport, RegistryKind, RepoEntry, RepositoryRegistry,
    TriggerManager, TriggerSpec,
};
use parking_lot::Mutex;

struct Fixture {
    transport: Arc<RecordingTransport>,
    manager: Arc<TriggerManager>,
    registry: Arc<RepositoryRegistry>,
    actor: FlowActor,
}

fn fixture() -> Fixture {
    let transport = Arc::new(RecordingTransport::new());
    let manager = Arc::new(TriggerManager::new(transport.clone()));
    manager.register_workflow("lint", TriggerSpec::workflow("lint.yml", "main"));
    manager.register_workflow("test", TriggerSpec::workflow("test.yml", "main"));
    manager.register_action("notify", TriggerSpec::action("notify", "main"));

    let registry = Arc::new(RepositoryRegistry::new());
    let facade = DispatchFacade::new(Arc::clone(&manager), Arc::clone(&registry));
    Fixture {
        transport,
        manager,
        registry,
        actor: FlowActor::new(Arc::new(facade)),
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn register_repo_overwrites_previous_entry() {
    let fx = fixture();
    fx.actor
        .register_repo("acme/app", names(&["notify"]), names(&["lint"]))
        .unwrap();
    fx.actor
        .register_repo("acme/app", Vec::new(), names(&["test"]))
        .unwrap();

    assert_eq!(
        fx.registry.get("acme/app"),
        Some(RepoEntry {
            actions: Vec::new(),
            workflows: names(&["test"]),
        })
    );
    assert_eq!(fx.registry.repos(), names(&["acme/app"]));
}

#[tokio::test]
async fn run_repo_flows_dispatches_workflows_in_order() {
    let fx = fixture();
    fx.actor
        .register_repo("acme/app", names(&["notify"]), names(&["lint", "test"]))
        .unwrap();

    fx.actor.run_repo_flows("acme/app", "t").await.unwrap();

    let urls: Vec<_> = fx.transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.github.com/repos/acme/app/actions/workflows/lint.yml/dispatches",
            "https://api.github.com/repos/acme/app/actions/workflows/test.yml/dispatches",
        ]
    );
}

#[tokio::test]
async fn run_repo_flows_stops_at_first_error() {
    let fx = fixture();
    fx.actor
        .register_repo("acme/app", Vec::new(), names(&["lint", "missing", "test"]))
        .unwrap();

    let err = fx.actor.run_repo_flows("acme/app", "t").await.unwrap_err();

    assert!(err.to_string().contains("`missing`"));
    assert!(matches!(
        err.root(),
        DispatchError::NotRegistered { kind: RegistryKind::Workflow, .. }
    ));
    assert_eq!(fx.transport.call_count(), 1);
}

#[tokio::test]
async fn run_repo_flows_wraps_status_errors_with_context() {
    let fx = fixture();
    fx.transport.set_response(HttpResponse::new(422));
    fx.actor
        .register_repo("acme/app", Vec::new(), names(&["lint", "test"]))
        .unwrap();

    let err = fx.actor.run_repo_flows("acme/app", "t").await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(matches!(err, DispatchError::Context { .. }));
    assert_eq!(fx.transport.call_count(), 1);
}

#[tokio::test]
async fn run_repo_flows_for_unknown_repo_is_not_registered() {
    let fx = fixture();
    let err = fx.actor.run_repo_flows("acme/ghost", "t").await.unwrap_err();
    assert!(matches!(
        err,
        DispatchError::NotRegistered { kind: RegistryKind::Repository, .. }
    ));
    assert_eq!(fx.transport.call_count(), 0);
}

#[tokio::test]
async fn run_repo_flows_without_workflows_sends_nothing() {
    let fx = fixture();
    fx.actor
        .register_repo("acme/app", names(&["notify"]), Vec::new())
        .unwrap();
    fx.actor.run_repo_flows("acme/app", "t").await.unwrap();
    assert_eq!(fx.transport.call_count(), 0);
}

#[tokio::test]
async fn custom_flow_switches_on_flow_type() {
    let fx = fixture();
    let params = FlowParams::new();

    fx.actor
        .run_custom_flow("acme/app", "action", "notify", "t", &params)
        .await
        .unwrap();
    fx.actor
        .run_custom_flow("acme/app", "workflow", "lint", "t", &params)
        .await
        .unwrap();

    let urls: Vec<_> = fx.transport.requests().into_iter().map(|r| r.url).collect();
    assert!(urls[0].ends_with("/repos/acme/app/dispatches"));
    assert!(urls[1].ends_with("/actions/workflows/lint.yml/dispatches"));
}

#[tokio::test]
async fn custom_flow_rejects_unknown_flow_types() {
    let fx = fixture();
    for flow_type in ["", "job", "Action", "workflows", "pipeline"] {
        let err = fx
            .actor
            .run_custom_flow("acme/app", flow_type, "lint", "t", &FlowParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidFlowType(ref t) if t == flow_type));
    }
    assert_eq!(fx.transport.call_count(), 0);
}

#[tokio::test]
async fn custom_flow_does_not_cross_tables() {
    let fx = fixture();
    let err = fx
        .actor
        .run_custom_flow("acme/app", "action", "lint", "t", &FlowParams::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::NotRegistered { kind: RegistryKind::Action, .. }
    ));
    assert!(fx.manager.workflow("lint").is_some());
}

#[tokio::test]
async fn dispatch_request_forwards_params() {
    let fx = fixture();
    let request = DispatchRequest::new("acme/app", "workflow", "test", "t")
        .with_param("suite", "integration");

    fx.actor.run_request(request).await.unwrap();

    let body = fx.transport.last_request().unwrap().body_json().unwrap();
    assert_eq!(body["inputs"]["suite"], "integration");
}

#[derive(Default)]
struct ScriptedFacade {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl FlowFacade for ScriptedFacade {
    fn register_repo(
        &self,
        repo: &str,
        actions: Vec<String>,
        workflows: Vec<String>,
    ) -> nodeprop::Result<()> {
        self.calls.lock().push(format!(
            "register {repo} {} {}",
            actions.len(),
            workflows.len()
        ));
        Ok(())
    }

    async fn trigger_repo_flows(&self, repo: &str, token: &str) -> nodeprop::Result<()> {
        self.calls.lock().push(format!("repo {repo} {token}"));
        Err(DispatchError::Transport("offline".to_string()))
    }

    async fn trigger_custom_flow(
        &self,
        repo: &str,
        flow_type: &str,
        name: &str,
        _token: &str,
        params: &FlowParams,
    ) -> nodeprop::Result<()> {
        self.calls
            .lock()
            .push(format!("custom {repo} {flow_type} {name} {}", params.len()));
        Ok(())
    }
}

#[tokio::test]
async fn actor_forwards_arguments_and_errors_unchanged() {
    let facade = Arc::new(ScriptedFacade::default());
    let actor = FlowActor::new(facade.clone());

    actor
        .register_repo("acme/app", names(&["a"]), names(&["b", "c"]))
        .unwrap();
    let err = actor.run_repo_flows("acme/app", "tok").await.unwrap_err();
    assert!(matches!(err, DispatchError::Transport(ref m) if m == "offline"));

    let mut params = FlowParams::new();
    params.insert("k".to_string(), "v".to_string());
    actor
        .run_custom_flow("acme/app", "anything", "x", "tok", &params)
        .await
        .unwrap();

    assert_eq!(
        *facade.calls.lock(),
        vec![
            "register acme/app 1 2".to_string(),
            "repo acme/app tok".to_string(),
            "custom acme/app anything x 1".to_string(),
        ]
    );
}
