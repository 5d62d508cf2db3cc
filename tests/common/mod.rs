//! Common test utilities for integration tests.
//!
//! [`TestApp`] wires a real [`AppContext`] (reqwest transport, file-backed
//! session in a temp dir) against a wiremock server, with a recording
//! navigator in place of the browser location.

#![allow(dead_code)]

use std::sync::Arc;

use portal::adapters::{FileTokenStorage, RecordingNavigator, ReqwestHttpClient};
use portal::app::AppContext;
use portal::config::ClientConfig;
use portal::traits::{TokenStorage, REFRESH_TOKEN_KEY, TOKEN_KEY};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

pub struct TestApp {
    pub app: AppContext,
    pub navigator: RecordingNavigator,
    pub storage: Arc<FileTokenStorage>,
    _dir: TempDir,
}

impl TestApp {
    /// A signed-out app pointed at `server`.
    pub fn new(server: &MockServer) -> Self {
        let dir = TempDir::new().unwrap();
        let session_file = dir.path().join("session.json");
        let config = ClientConfig::default()
            .with_api_url(server.uri())
            .with_session_file(session_file.clone());
        let storage = Arc::new(FileTokenStorage::new(session_file));
        let navigator = RecordingNavigator::new();
        let app = AppContext::with_parts(
            config,
            Arc::new(ReqwestHttpClient::new()),
            storage.clone(),
            Arc::new(navigator.clone()),
        );
        Self {
            app,
            navigator,
            storage,
            _dir: dir,
        }
    }

    /// An app whose stored session already holds tokens.
    pub fn with_tokens(server: &MockServer, access: &str, refresh: Option<&str>) -> Self {
        let test_app = Self::new(server);
        test_app.storage.set(TOKEN_KEY, access).unwrap();
        if let Some(refresh) = refresh {
            test_app.storage.set(REFRESH_TOKEN_KEY, refresh).unwrap();
        }
        test_app
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap()
    }
}

pub fn user_json(id: &str, name: &str) -> Value {
    json!({"id": id, "name": name, "email": format!("{}@uni.br", id)})
}

pub fn material_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "type": "NOTES",
        "area": "COMPUTER_SCIENCE",
        "author": "Bia",
        "authorId": "author-1",
        "likeCount": 1,
        "averageRating": 0.0,
        "totalRatings": 0,
        "userRating": false
    })
}

pub fn page_json(items: Vec<Value>, number: u32, total_pages: u32, size: u32) -> Value {
    let total = items.len();
    let empty = items.is_empty();
    json!({
        "content": items,
        "number": number,
        "totalPages": total_pages,
        "totalElements": total,
        "size": size,
        "first": number == 0,
        "last": number + 1 >= total_pages,
        "empty": empty
    })
}
