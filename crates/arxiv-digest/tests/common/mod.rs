//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use wiremock::MockServer;

use arxiv_digest::collab::{CheckoutRedirect, LoginPrompt, Region, Surface};
use arxiv_digest::store::MemoryStore;
use arxiv_digest::{App, Config};

/// Records every region replacement and loading toggle.
#[derive(Default)]
pub struct RecordingSurface {
    pub replaced: Mutex<Vec<(Region, String)>>,
    pub loading: Mutex<Vec<bool>>,
}

impl RecordingSurface {
    /// Most recent markup written to `region`.
    pub fn last(&self, region: &Region) -> Option<String> {
        self.replaced
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(r, _)| r == region)
            .map(|(_, markup)| markup.clone())
    }

    pub fn last_loading(&self) -> Option<bool> {
        self.loading.lock().unwrap().last().copied()
    }
}

impl Surface for RecordingSurface {
    fn replace(&self, region: &Region, markup: &str) {
        self.replaced.lock().unwrap().push((region.clone(), markup.to_string()));
    }

    fn set_loading(&self, visible: bool) {
        self.loading.lock().unwrap().push(visible);
    }
}

/// Counts login prompts.
#[derive(Default)]
pub struct CountingPrompt {
    count: AtomicUsize,
}

impl CountingPrompt {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl LoginPrompt for CountingPrompt {
    fn prompt_login(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records checkout sessions; optionally refuses them.
#[derive(Default)]
pub struct RecordingCheckout {
    pub sessions: Mutex<Vec<String>>,
    pub refuse: bool,
}

#[async_trait::async_trait]
impl CheckoutRedirect for RecordingCheckout {
    async fn redirect_to_checkout(&self, session_id: &str) -> Result<(), String> {
        self.sessions.lock().unwrap().push(session_id.to_string());
        if self.refuse { Err("card declined".to_string()) } else { Ok(()) }
    }
}

pub struct Harness {
    pub app: App,
    pub surface: Arc<RecordingSurface>,
    pub prompt: Arc<CountingPrompt>,
    pub checkout: Arc<RecordingCheckout>,
}

impl Harness {
    pub async fn login(&self, token: &str) {
        self.app.context().gateway.credentials().set(token.to_string()).await;
    }
}

/// An app wired to the mock server with recording collaborators.
pub fn harness(server: &MockServer) -> Harness {
    harness_with_checkout(server, RecordingCheckout::default())
}

pub fn harness_with_checkout(server: &MockServer, checkout: RecordingCheckout) -> Harness {
    harness_at(&server.uri(), checkout)
}

/// An app wired to an arbitrary backend origin.
pub fn harness_at(base_url: &str, checkout: RecordingCheckout) -> Harness {
    let surface = Arc::new(RecordingSurface::default());
    let prompt = Arc::new(CountingPrompt::default());
    let checkout = Arc::new(checkout);
    let app = App::builder(Config::for_testing(base_url))
        .store(Arc::new(MemoryStore::new()))
        .login_prompt(prompt.clone())
        .checkout(checkout.clone())
        .surface(surface.clone())
        .build()
        .unwrap();
    Harness { app, surface, prompt, checkout }
}

/// Origin of a local port nothing listens on.
///
/// A dropped `MockServer` goes back to wiremock's pool and keeps accepting
/// connections, so it cannot stand in for a dead backend.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Paper JSON as the public listing serves it.
pub fn paper_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "authors": ["Ada Lovelace", "Alan Turing"],
        "published": "2024-03-01T12:00:00Z",
        "abstract": format!("Abstract of {title}"),
        "url": format!("https://arxiv.org/abs/{id}"),
        "pdf_url": format!("https://arxiv.org/pdf/{id}"),
    })
}

pub fn summary_json(main_idea: &str) -> Value {
    json!({
        "summary": {
            "observation": "Existing methods are slow",
            "objective": "Make them fast",
            "challenge": "Keeping accuracy",
            "main_idea": main_idea,
        }
    })
}
