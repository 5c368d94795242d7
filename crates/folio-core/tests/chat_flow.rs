use std::sync::Arc;
use std::time::Duration;

use futures_util::{stream, StreamExt};
use mockito::{Matcher, Server};
use parking_lot::Mutex;

use folio_core::ai::FragmentStream;
use folio_core::error::{TRANSPORT_REPLY, UNCONFIGURED_REPLY};
use folio_core::state::CANCELLED_NOTICE;
use folio_core::{
    trigger, ChatController, ChatError, ChatRequest, ChatRole, Conversation, GeminiClient,
    ModelProvider, ReplyStatus, StreamEvent, SubmitOutcome,
};

/// Provider that replays a fixed script and records every request
#[derive(Default)]
struct Scripted {
    fragments: Vec<&'static str>,
    error: Option<ChatError>,
    delay: Duration,
    hang: bool,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl Scripted {
    fn replying(fragments: &[&'static str]) -> Self {
        Self {
            fragments: fragments.to_vec(),
            ..Default::default()
        }
    }

    fn failing_after(fragments: &[&'static str], error: ChatError) -> Self {
        Self {
            fragments: fragments.to_vec(),
            error: Some(error),
            ..Default::default()
        }
    }

    /// Emits its fragments and then never finishes
    fn hanging(fragments: &[&'static str]) -> Self {
        Self {
            fragments: fragments.to_vec(),
            hang: true,
            ..Default::default()
        }
    }
}

impl ModelProvider for Scripted {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn stream_reply(&self, request: ChatRequest) -> FragmentStream {
        self.requests.lock().push(request);

        let delay = self.delay;
        let items: Vec<Result<String, ChatError>> = self
            .fragments
            .iter()
            .map(|f| Ok(f.to_string()))
            .chain(self.error.clone().map(Err))
            .collect();

        let scripted = stream::iter(items).then(move |item| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            item
        });

        if self.hang {
            scripted.chain(stream::pending()).boxed()
        } else {
            scripted.boxed()
        }
    }
}

fn controller_with(provider: Scripted) -> (ChatController, Arc<Mutex<Vec<ChatRequest>>>) {
    let requests = Arc::clone(&provider.requests);
    let conversation = Conversation::new(Some(Arc::new(provider)));
    (ChatController::new(conversation), requests)
}

#[tokio::test]
async fn test_fragments_assemble_into_one_reply() {
    let (mut chat, _) = controller_with(Scripted::replying(&["Hel", "lo", " world"]));

    assert_eq!(chat.submit("Say hello"), SubmitOutcome::Accepted);
    assert!(chat.is_busy());
    assert_eq!(chat.run_to_completion().await, ReplyStatus::Finished);

    let messages = chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(messages[0].text, "Say hello");
    assert_eq!(messages[1].role, ChatRole::Assistant);
    assert_eq!(messages[1].text, "Hello world");
    assert!(!messages[1].pending);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn test_sequential_submits_keep_pairs_in_order() {
    let (mut chat, requests) = controller_with(Scripted::replying(&["ok"]));

    chat.submit("first");
    chat.run_to_completion().await;
    chat.submit("second");
    chat.run_to_completion().await;

    let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["first", "ok", "second", "ok"]);

    // The second request replays the first exchange
    let requests = requests.lock();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].history.is_empty());
    assert_eq!(requests[1].history.len(), 2);
    assert_eq!(requests[1].history[0].text, "first");
    assert_eq!(requests[1].history[1].role, ChatRole::Assistant);
    assert_eq!(requests[1].message, "second");
}

#[tokio::test]
async fn test_submit_while_busy_is_ignored() {
    let (mut chat, requests) = controller_with(Scripted::hanging(&["thinking"]));

    assert_eq!(chat.submit("one"), SubmitOutcome::Accepted);
    assert_eq!(chat.submit("two"), SubmitOutcome::Busy);
    assert_eq!(chat.messages().len(), 2);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(requests.lock().len(), 1);
    chat.cancel();
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let (mut chat, requests) = controller_with(Scripted::replying(&["never"]));

    assert_eq!(chat.submit(""), SubmitOutcome::EmptyInput);
    assert_eq!(chat.submit("   \n\t"), SubmitOutcome::EmptyInput);
    assert!(chat.messages().is_empty());
    assert!(!chat.is_busy());
    assert!(requests.lock().is_empty());
}

#[tokio::test]
async fn test_input_is_trimmed() {
    let (mut chat, requests) = controller_with(Scripted::replying(&["ok"]));
    chat.submit("  What did Ryan build?  ");
    chat.run_to_completion().await;
    assert_eq!(chat.messages()[0].text, "What did Ryan build?");
    assert_eq!(requests.lock()[0].message, "What did Ryan build?");
}

#[tokio::test]
async fn test_mid_stream_failure_replaces_partial_text() {
    let provider = Scripted::failing_after(
        &["Partial ", "answer"],
        ChatError::Transport("connection reset".into()),
    );
    let (mut chat, _) = controller_with(provider);

    chat.submit("question");
    let status = chat.run_to_completion().await;
    assert_eq!(status, ReplyStatus::Failed(ChatError::Transport("connection reset".into())));

    let reply = &chat.messages()[1];
    assert_eq!(reply.text, TRANSPORT_REPLY);
    assert!(!reply.pending);
    assert!(chat.conversation().history().is_empty());
}

#[tokio::test]
async fn test_missing_key_reports_unconfigured() {
    let mut chat = ChatController::new(Conversation::new(None));
    assert!(!chat.conversation().is_configured());
    assert_eq!(chat.conversation().provider_name(), "Offline");

    assert_eq!(chat.submit("hello?"), SubmitOutcome::Accepted);
    assert_eq!(
        chat.run_to_completion().await,
        ReplyStatus::Failed(ChatError::Configuration)
    );

    let messages = chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text, UNCONFIGURED_REPLY);
    assert!(!messages[1].pending);

    // Still usable afterwards
    assert_eq!(chat.submit("again"), SubmitOutcome::Accepted);
}

#[tokio::test]
async fn test_cancel_keeps_partial_text() {
    let (mut chat, _) = controller_with(Scripted::hanging(&["Hel"]));

    chat.submit("greet me");
    assert_eq!(chat.step().await, ReplyStatus::Streaming);
    assert_eq!(chat.cancel(), ReplyStatus::Cancelled);

    let reply = &chat.messages()[1];
    assert_eq!(reply.text, "Hel");
    assert!(!reply.pending);
    assert!(!chat.is_busy());
    assert_eq!(chat.cancel(), ReplyStatus::Idle);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(chat.conversation().history().is_empty());
}

#[tokio::test]
async fn test_cancel_before_any_text_shows_notice() {
    let (mut chat, _) = controller_with(Scripted::hanging(&[]));

    chat.submit("anyone there?");
    assert_eq!(chat.cancel(), ReplyStatus::Cancelled);
    assert_eq!(chat.messages()[1].text, CANCELLED_NOTICE);
    assert_eq!(chat.submit("next"), SubmitOutcome::Accepted);
}

#[tokio::test]
async fn test_history_grows_only_on_success() {
    let provider = Scripted::replying(&["first answer"]);
    let (mut chat, _) = controller_with(provider);

    chat.submit("q1");
    chat.run_to_completion().await;
    let history = chat.conversation().history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, ChatRole::User);
    assert_eq!(history[1].text, "first answer");
}

#[tokio::test]
async fn test_cancel_after_producer_drained_stays_out_of_history() {
    let (mut chat, requests) = controller_with(Scripted::replying(&["full answer"]));

    chat.submit("q");
    // Producer finishes and queues every event before the loop reads them
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(chat.cancel(), ReplyStatus::Cancelled);

    assert_eq!(chat.messages()[1].text, CANCELLED_NOTICE);
    assert!(chat.conversation().history().is_empty());

    // The next request carries no trace of the abandoned answer
    chat.submit("again");
    chat.run_to_completion().await;
    assert!(requests.lock()[1].history.is_empty());
}

#[tokio::test]
async fn test_raw_send_does_not_touch_history() {
    let conversation = Conversation::new(Some(Arc::new(Scripted::replying(&["hi"]))));
    let events: Vec<StreamEvent> = conversation.send("hello").collect().await;
    assert_eq!(events.last(), Some(&StreamEvent::Finished));
    assert!(conversation.history().is_empty());

    conversation.commit("hello", "hi");
    assert_eq!(conversation.history().len(), 2);
}

#[tokio::test]
async fn test_each_event_stream_ends_with_one_terminal() {
    let conversation = Conversation::new(Some(Arc::new(Scripted::replying(&["a", "", "b"]))));
    let events: Vec<StreamEvent> = conversation.send("x").collect().await;

    // Empty fragments are dropped
    assert_eq!(
        events,
        vec![
            StreamEvent::Fragment("a".into()),
            StreamEvent::Fragment("b".into()),
            StreamEvent::Finished,
        ]
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[tokio::test]
async fn test_greeting_is_first_message() {
    let (chat, _) = controller_with(Scripted::replying(&["ok"]));
    let chat = chat.with_greeting("Hi there");
    assert_eq!(chat.messages().len(), 1);
    assert_eq!(chat.messages()[0].id, "welcome");
    assert_eq!(chat.messages()[0].role, ChatRole::Assistant);
}

#[tokio::test]
async fn test_trigger_submits_like_manual_input() {
    let (mut manual, _) = controller_with(Scripted::replying(&["same"]));
    manual.submit("What is Ryan's background?");
    manual.run_to_completion().await;

    let (mut triggered, _) = controller_with(Scripted::replying(&["same"]));
    let (tx, rx) = trigger::channel();
    tx.fire("What is Ryan's background?");

    let message = rx.take().expect("trigger pending");
    triggered.submit(&message);
    triggered.run_to_completion().await;

    let texts = |c: &ChatController| -> Vec<String> {
        c.messages().iter().map(|m| m.text.clone()).collect()
    };
    assert_eq!(texts(&manual), texts(&triggered));
}

#[tokio::test]
async fn test_second_trigger_replaces_first() {
    let (mut chat, requests) = controller_with(Scripted::replying(&["ok"]));
    let (tx, rx) = trigger::channel();

    tx.fire("first question");
    tx.fire("second question");

    while let Some(message) = rx.take() {
        chat.submit(&message);
        chat.run_to_completion().await;
    }

    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[0].text, "second question");
    assert_eq!(requests.lock().len(), 1);
}

#[tokio::test]
async fn test_trigger_waits_while_busy() {
    let provider = Scripted {
        fragments: vec!["slow"],
        delay: Duration::from_millis(30),
        ..Default::default()
    };
    let (mut chat, _) = controller_with(provider);
    let (tx, rx) = trigger::channel();

    chat.submit("typed");
    tx.fire("from hero");

    // Only consume the trigger once the session is idle
    loop {
        if !chat.is_busy() {
            if let Some(message) = rx.take() {
                chat.submit(&message);
                continue;
            }
            break;
        }
        chat.step().await;
    }

    let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["typed", "slow", "from hero", "slow"]);
}

#[tokio::test]
async fn test_gemini_stream_end_to_end() {
    let mut server = Server::new_async().await;
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Ryan led \"}],\"role\":\"model\"}}]}\r\n\r\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Slack's AI.\"}],\"role\":\"model\"}}]}\r\n\r\n",
    );
    let mock = server
        .mock("POST", "/v1beta/models/gemini-test:streamGenerateContent")
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::Regex("\"systemInstruction\"".into()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let client = GeminiClient::new("test-key").with_base_url(&server.url());
    let conversation = Conversation::new(Some(Arc::new(client))).with_model("gemini-test");
    let mut chat = ChatController::new(conversation);

    chat.submit("What does Ryan do?");
    assert_eq!(chat.run_to_completion().await, ReplyStatus::Finished);
    assert_eq!(chat.messages()[1].text, "Ryan led Slack's AI.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_quota_error_is_provider_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/gemini-test:streamGenerateContent")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("{\"error\":{\"code\":429,\"message\":\"quota exceeded\"}}")
        .create_async()
        .await;

    let client = GeminiClient::new("test-key").with_base_url(&server.url());
    let conversation = Conversation::new(Some(Arc::new(client))).with_model("gemini-test");
    let mut chat = ChatController::new(conversation);

    chat.submit("hi");
    match chat.run_to_completion().await {
        ReplyStatus::Failed(ChatError::Provider { status, .. }) => assert_eq!(status, 429),
        other => panic!("unexpected status: {:?}", other),
    }
    assert_eq!(chat.messages()[1].text, TRANSPORT_REPLY);
}
