//! Test helpers for composer controller tests.
//!
//! Provides a scripted AI service whose calls can be held open, plus
//! builders for a controller wired to in-memory persistence.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;

use scribe_composer::{ComposerController, MemoryStore, NoteStore, StaticDocument};
use scribe_core::{
    AiService, BrainstormRequest, BrainstormResponse, Error, EventBus, Result,
    WebSearchRequest, WebSearchResponse, WebSearchResult,
};

/// A gate holding an AI call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until a call has reached the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one held call continue.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// AI service answering from a script.
///
/// Each operation either succeeds with a fixed answer or fails; either can
/// be gated so the test observes the pending state.
pub struct ScriptedAiService {
    bullets: Mutex<Result<Vec<String>>>,
    results: Mutex<Result<Vec<WebSearchResult>>>,
    brainstorm_gate: Option<Arc<Gate>>,
    search_gate: Option<Arc<Gate>>,
    brainstorm_calls: AtomicUsize,
    search_calls: AtomicUsize,
    requests: Mutex<Vec<BrainstormRequest>>,
}

impl Default for ScriptedAiService {
    fn default() -> Self {
        Self {
            bullets: Mutex::new(Ok(Vec::new())),
            results: Mutex::new(Ok(Vec::new())),
            brainstorm_gate: None,
            search_gate: None,
            brainstorm_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedAiService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bullets(self, bullets: &[&str]) -> Self {
        *self.bullets.lock().unwrap() = Ok(bullets.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_results(self, results: Vec<WebSearchResult>) -> Self {
        *self.results.lock().unwrap() = Ok(results);
        self
    }

    pub fn failing_brainstorm(self, message: &str) -> Self {
        *self.bullets.lock().unwrap() = Err(Error::Inference(message.to_string()));
        self
    }

    pub fn failing_search(self, message: &str) -> Self {
        *self.results.lock().unwrap() = Err(Error::Request(message.to_string()));
        self
    }

    pub fn with_brainstorm_gate(mut self, gate: Arc<Gate>) -> Self {
        self.brainstorm_gate = Some(gate);
        self
    }

    pub fn with_search_gate(mut self, gate: Arc<Gate>) -> Self {
        self.search_gate = Some(gate);
        self
    }

    pub fn brainstorm_calls(&self) -> usize {
        self.brainstorm_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<BrainstormRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn replay<T: Clone>(slot: &Mutex<Result<T>>) -> Result<T> {
    match &*slot.lock().unwrap() {
        Ok(value) => Ok(value.clone()),
        Err(e) => Err(Error::Inference(e.to_string())),
    }
}

#[async_trait]
impl AiService for ScriptedAiService {
    async fn brainstorm(&self, request: &BrainstormRequest) -> Result<BrainstormResponse> {
        self.brainstorm_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(ref gate) = self.brainstorm_gate {
            gate.pass().await;
        }
        replay(&self.bullets).map(|bullet_points| BrainstormResponse { bullet_points })
    }

    async fn web_search(&self, request: &WebSearchRequest) -> Result<WebSearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(ref gate) = self.search_gate {
            gate.pass().await;
        }
        replay(&self.results).map(|web_results| WebSearchResponse { web_results })
    }
}

/// A controller over in-memory persistence and the default document.
pub struct Harness {
    pub composer: ComposerController,
    pub ai: Arc<ScriptedAiService>,
    pub persistence: Arc<MemoryStore>,
    pub events: EventBus,
}

impl Harness {
    pub fn new(ai: ScriptedAiService) -> Self {
        Self::with_document(ai, StaticDocument::default())
    }

    pub fn with_document(ai: ScriptedAiService, document: StaticDocument) -> Self {
        let ai = Arc::new(ai);
        let persistence = Arc::new(MemoryStore::new());
        let store = Arc::new(NoteStore::new(persistence.clone()));
        let events = EventBus::new(64);
        let composer = ComposerController::new(store, ai.clone(), Arc::new(document))
            .with_event_bus(events.clone());
        Self {
            composer,
            ai,
            persistence,
            events,
        }
    }
}

pub fn result(title: &str, url: &str, description: &str) -> WebSearchResult {
    WebSearchResult::new(title, url, description)
}

/// Captures formatted log output, span closes included.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Subscriber writing plain text into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
