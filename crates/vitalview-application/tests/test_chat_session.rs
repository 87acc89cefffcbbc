use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vitalview_application::{ChatSurface, SendOutcome, SessionFactory};
use vitalview_core::chat::{ChatReply, ChatRequest, ChatTransport, DirectiveKind};
use vitalview_core::config::{AppConfig, DEFAULT_ERROR_TEXT};
use vitalview_core::conversation::{Role, Turn};
use vitalview_core::error::{Result, VitalViewError};
use vitalview_core::target::{Orbit, TargetRegistry, Vec3};
use vitalview_core::ui::{InputField, MessageLog};
use vitalview_core::viewport::{
    ExplanationOverlay, MarkerId, MarkerSpec, ModelViewer, ScreenPoint, ScreenRect,
    ViewportHandles,
};

// Mock transport replaying scripted replies, each after a delay
#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<(Duration, Result<ChatReply>)>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    fn reply(self, delay_ms: u64, reply: Result<ChatReply>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back((Duration::from_millis(delay_ms), reply));
        self
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request.clone());
        let (delay, reply) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("Unexpected request");
        tokio::time::sleep(delay).await;
        reply
    }
}

#[derive(Default)]
struct MockViewer {
    next_id: Mutex<u64>,
    live: Mutex<Vec<(MarkerId, MarkerSpec)>>,
    targets: Mutex<Vec<Vec3>>,
}

#[async_trait::async_trait]
impl ModelViewer for MockViewer {
    fn set_camera_target(&self, target: Vec3) {
        self.targets.lock().unwrap().push(target);
    }

    fn set_camera_orbit(&self, _orbit: Orbit) {}

    fn jump_camera_to_goal(&self) {}

    fn add_marker(&self, marker: &MarkerSpec) -> MarkerId {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        self.live.lock().unwrap().push((MarkerId(*next), marker.clone()));
        MarkerId(*next)
    }

    fn remove_marker(&self, id: MarkerId) {
        self.live.lock().unwrap().retain(|(live, _)| *live != id);
    }

    fn marker_bounds(&self, _id: MarkerId) -> Option<ScreenRect> {
        Some(ScreenRect {
            left: 10.0,
            top: 10.0,
            width: 8.0,
            height: 8.0,
        })
    }
}

#[derive(Default)]
struct MockOverlay {
    texts: Mutex<Vec<String>>,
}

impl ExplanationOverlay for MockOverlay {
    fn show_at(&self, _position: ScreenPoint, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }

    fn hide(&self) {}
}

#[derive(Default)]
struct MockPage {
    clears: Mutex<u32>,
    bubbles: Mutex<Vec<Turn>>,
}

impl InputField for MockPage {
    fn clear(&self) {
        *self.clears.lock().unwrap() += 1;
    }
}

impl MessageLog for MockPage {
    fn push(&self, turn: &Turn) {
        self.bubbles.lock().unwrap().push(turn.clone());
    }
}

struct Fixture {
    session: vitalview_application::ChatSession,
    transport: Arc<ScriptedTransport>,
    viewer: Arc<MockViewer>,
    overlay: Arc<MockOverlay>,
    page: Arc<MockPage>,
}

fn fixture(transport: ScriptedTransport) -> Fixture {
    let transport = Arc::new(transport);
    let viewer = Arc::new(MockViewer::default());
    let overlay = Arc::new(MockOverlay::default());
    let page = Arc::new(MockPage::default());

    let factory = SessionFactory::with_transport(AppConfig::default(), transport.clone())
        .expect("Default config should build");
    let session = factory
        .create_session(
            ViewportHandles::new(viewer.clone(), overlay.clone()),
            ChatSurface::new(page.clone(), page.clone()),
        )
        .expect("All handles provided");

    Fixture {
        session,
        transport,
        viewer,
        overlay,
        page,
    }
}

fn reply_json(json: &str) -> Result<ChatReply> {
    Ok(serde_json::from_str(json).expect("Valid reply JSON"))
}

#[tokio::test(start_paused = true)]
async fn test_send_records_user_turn_before_request() {
    let f = fixture(ScriptedTransport::default().reply(10, Ok(ChatReply::text("Hello"))));

    let outcome = f.session.send("  I have a headache  ").await;

    let requests = f.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages, vec![Turn::user("I have a headache")]);
    assert_eq!(
        outcome,
        SendOutcome::Replied {
            sequence: 1,
            directive: None
        }
    );
    assert_eq!(
        f.session.transcript().await,
        vec![Turn::user("I have a headache"), Turn::assistant("Hello")]
    );
    assert_eq!(*f.page.clears.lock().unwrap(), 1);
    assert_eq!(f.page.bubbles.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_input_is_ignored() {
    let f = fixture(ScriptedTransport::default());

    assert_eq!(f.session.send("").await, SendOutcome::Ignored);
    assert_eq!(f.session.send(" \t\n ").await, SendOutcome::Ignored);

    assert!(f.session.transcript().await.is_empty());
    assert!(f.transport.requests().is_empty());
    assert_eq!(*f.page.clears.lock().unwrap(), 0);
    assert_eq!(f.session.latest_sequence(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_highlight_reply_frames_lungs() {
    let f = fixture(ScriptedTransport::default().reply(
        50,
        reply_json(
            r#"{"reply":"Looks fine","action":"highlight","target":"Lungs","message":"Mild inflammation"}"#,
        ),
    ));

    let started = tokio::time::Instant::now();
    let outcome = f.session.send("Show me my lungs").await;

    let SendOutcome::Replied {
        directive: Some(directive),
        ..
    } = &outcome
    else {
        panic!("Expected a directive, got {outcome:?}");
    };
    assert_eq!(directive.kind, DirectiveKind::Highlight);
    assert!(started.elapsed() >= Duration::from_millis(850));

    let transcript = f.session.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].role(), Role::Assistant);
    assert_eq!(transcript[1].content(), "Looks fine");

    let lungs = TargetRegistry::builtin().resolve("lungs").clone();
    assert_eq!(
        f.viewer.targets.lock().unwrap().as_slice(),
        &[lungs.camera_target]
    );

    let hotspot = f.session.viewport().active_hotspot().await.unwrap();
    assert_eq!(hotspot.target, "lungs");
    assert!(f.session.viewport().marker_clicked(hotspot.marker).await);
    assert_eq!(
        f.overlay.texts.lock().unwrap().as_slice(),
        &["Mild inflammation".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_diagnosis_reply_uses_diagnosis_text() {
    let f = fixture(ScriptedTransport::default().reply(
        5,
        reply_json(r#"{"reply":"diagnosis ready","diagnosis":"Possible fracture","target":"Legs"}"#),
    ));

    f.session.send("My shin hurts after a fall").await;

    let hotspot = f.session.viewport().active_hotspot().await.unwrap();
    assert_eq!(hotspot.target, "legs");
    assert_eq!(hotspot.explanation, "Possible fracture");
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_records_error_text() {
    let f = fixture(ScriptedTransport::default().reply(
        5,
        Err(VitalViewError::transport(None, "connection refused")),
    ));

    let outcome = f.session.send("Hello?").await;

    assert!(matches!(outcome, SendOutcome::TransportFailed { sequence: 1, .. }));
    assert_eq!(
        f.session.transcript().await,
        vec![Turn::user("Hello?"), Turn::assistant(DEFAULT_ERROR_TEXT)]
    );
    assert!(f.viewer.targets.lock().unwrap().is_empty());
    assert!(f.session.viewport().active_hotspot().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_only_latest_reply_is_applied() {
    let f = fixture(
        ScriptedTransport::default()
            .reply(
                500,
                reply_json(r#"{"reply":"first","action":"highlight","target":"heart","message":"one"}"#),
            )
            .reply(
                100,
                reply_json(r#"{"reply":"second","action":"highlight","target":"knees","message":"two"}"#),
            ),
    );

    let (first, second) = tokio::join!(f.session.send("show heart"), f.session.send("show knees"));

    assert_eq!(first, SendOutcome::Superseded { sequence: 1 });
    assert!(matches!(second, SendOutcome::Replied { sequence: 2, .. }));

    let requests = f.transport.requests();
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[1].messages.len(), 2);

    assert_eq!(
        f.session.transcript().await,
        vec![
            Turn::user("show heart"),
            Turn::user("show knees"),
            Turn::assistant("second"),
        ]
    );

    let knees = TargetRegistry::builtin().resolve("knees").camera_target;
    assert_eq!(f.viewer.targets.lock().unwrap().as_slice(), &[knees]);
    assert_eq!(f.viewer.live.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_failure_records_no_error_text() {
    let f = fixture(
        ScriptedTransport::default()
            .reply(500, Err(VitalViewError::transport(Some(502), "bad gateway")))
            .reply(
                100,
                reply_json(r#"{"reply":"second","diagnosis":"Sprain","target":"feet"}"#),
            ),
    );

    let (first, second) = tokio::join!(f.session.send("first try"), f.session.send("second try"));

    assert_eq!(first, SendOutcome::Superseded { sequence: 1 });
    assert!(matches!(second, SendOutcome::Replied { sequence: 2, .. }));
    assert_eq!(
        f.session.transcript().await,
        vec![
            Turn::user("first try"),
            Turn::user("second try"),
            Turn::assistant("second"),
        ]
    );
    assert!(
        !f.page
            .bubbles
            .lock()
            .unwrap()
            .iter()
            .any(|turn| turn.content() == DEFAULT_ERROR_TEXT)
    );
    assert_eq!(
        f.session.viewport().active_hotspot().await.unwrap().explanation,
        "Sprain"
    );
}

#[test]
fn test_strict_session_without_overlay_fails() {
    let transport: Arc<dyn ChatTransport> = Arc::new(ScriptedTransport::default());
    let mut config = AppConfig::default();
    config.viewport.strict_handles = true;
    let factory = SessionFactory::with_transport(config, transport).unwrap();
    let page = Arc::new(MockPage::default());

    let result = factory.create_session(
        ViewportHandles {
            viewer: Some(Arc::new(MockViewer::default())),
            overlay: None,
        },
        ChatSurface::new(page.clone(), page),
    );

    assert!(matches!(
        result,
        Err(VitalViewError::MissingHandle { handle: "overlay" })
    ));
}
