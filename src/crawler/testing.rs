//! In-memory fetcher for crawl tests

use crate::crawler::fetcher::{FetchError, PageFetcher};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One scripted response
#[derive(Debug, Clone)]
pub enum Scripted {
    Body(String),
    Empty,
    Fail,
}

/// Serves scripted responses per URL and records every request
///
/// Each URL has a queue of responses; the last one repeats once the queue is
/// down to a single entry. Unknown URLs answer with HTTP 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answers `url` with `body`
    pub fn page(self, url: &str, body: &str) -> Self {
        self.sequence(url, vec![Scripted::Body(body.to_string())])
    }

    pub fn sequence(self, url: &str, responses: Vec<Scripted>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), responses.into());
        self
    }

    /// Every requested URL, in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        let next = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match next {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::Empty) => Err(FetchError::EmptyBody {
                url: url.to_string(),
            }),
            Some(Scripted::Fail) => Err(FetchError::Transport {
                url: url.to_string(),
                message: "connection reset".to_string(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
