use super::*;
use async_trait::async_trait;
use std::sync::Mutex;

/// Replays canned responses; errors once the script runs dry.
struct Script(Mutex<Vec<Message>>);

impl Script {
    fn new(mut responses: Vec<Message>) -> Arc<Self> {
        responses.reverse();
        Arc::new(Self(Mutex::new(responses)))
    }
}

#[async_trait]
impl CompletionClient for Script {
    async fn complete(&self, _req: CompletionRequest<'_>) -> anyhow::Result<Message> {
        self.0
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }

    fn model(&self) -> &str {
        "script"
    }
}

fn agent(responses: Vec<Message>) -> AgentLoop {
    AgentLoop::new(AgentLoopConfig::new(
        Script::new(responses),
        Arc::new(ToolRegistry::new()),
    ))
}

#[test]
fn test_check_response_rejects_non_assistant() {
    let conv = Conversation::new();
    let err = AgentLoop::check_response(&conv, &Message::user("hi")).unwrap_err();
    assert!(matches!(err, AgentError::Protocol(_)));
}

#[test]
fn test_check_response_rejects_empty_id() {
    let conv = Conversation::new();
    let msg = Message::assistant("", vec![ToolCallRequest::new("", "x", "{}")]);
    assert!(AgentLoop::check_response(&conv, &msg).is_err());
}

#[test]
fn test_check_response_rejects_id_reused_from_log() {
    let call = ToolCallRequest::new("c1", "x", "{}");
    let conv = Conversation::from_messages(vec![
        Message::assistant("", vec![call.clone()]),
        Message::tool_result("c1", "x", "{}", false),
    ]);
    let msg = Message::assistant("", vec![call]);
    assert!(AgentLoop::check_response(&conv, &msg).is_err());
}

#[tokio::test]
async fn test_zero_iterations_makes_no_call() {
    // An empty script would error if called.
    let agent = agent(vec![]);
    let mut conv = Conversation::new();
    conv.push_user("hi");
    let result = agent.run(&mut conv, 0).await.unwrap();
    assert_eq!(result.terminated, Termination::IterationLimitReached);
    assert_eq!(result.iterations_used, 0);
    assert_eq!(result.final_text, None);
    assert_eq!(conv.len(), 1);
}

#[tokio::test]
async fn test_answer_with_content_and_empty_calls_is_final() {
    let agent = agent(vec![Message::assistant("42", vec![])]);
    let mut conv = Conversation::new();
    conv.push_user("q");
    let result = agent.run(&mut conv, 5).await.unwrap();
    assert_eq!(result.final_text.as_deref(), Some("42"));
    assert_eq!(result.iterations_used, 1);
    assert_eq!(conv.len(), 2);
}

#[tokio::test]
async fn test_client_error_becomes_transport() {
    let agent = agent(vec![]);
    let mut conv = Conversation::new();
    conv.push_user("q");
    let err = agent.run(&mut conv, 3).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(conv.len(), 1);
}

#[tokio::test]
async fn test_pre_cancelled_token_returns_cancelled() {
    let agent = agent(vec![Message::assistant("never", vec![])]);
    let mut conv = Conversation::new();
    conv.push_user("q");
    let token = CancellationToken::new();
    token.cancel();
    let result = agent.run_with_cancel(&mut conv, 3, &token).await.unwrap();
    assert_eq!(result.terminated, Termination::Cancelled);
    assert_eq!(result.iterations_used, 0);
    assert_eq!(conv.len(), 1);
}

#[test]
fn test_from_config_retry_toggle() {
    let mut config = crate::config::Config::default();
    let client = Script::new(vec![]);
    let tools = Arc::new(ToolRegistry::new());

    let cfg = AgentLoopConfig::from_config(&config, client.clone(), tools.clone());
    assert!(cfg.retry.is_none());
    assert_eq!(cfg.completion_timeout, Duration::from_secs(120));

    config.agent.max_retries = 2;
    let cfg = AgentLoopConfig::from_config(&config, client, tools);
    assert_eq!(cfg.retry.map(|r| r.max_retries), Some(2));
}
