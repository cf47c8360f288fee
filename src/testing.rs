use crate::domain::model::{SearchResponse, SearchResult};
use crate::domain::ports::{ConfigProvider, SearchProvider, Storage};
use crate::utils::error::{PrepError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn sample_result(id: &str, url: &str, title: &str) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        url: url.to_string(),
        title: Some(title.to_string()),
        score: Some(0.9),
        published_date: None,
        author: None,
        text: None,
    }
}

/// In-memory provider: queries match the first registered key they contain.
#[derive(Default)]
pub struct StubSearchProvider {
    searches: Vec<(String, Vec<SearchResult>)>,
    similar: Vec<SearchResult>,
    contents: Vec<SearchResult>,
    fail_search_containing: Option<String>,
    fail_similar: bool,
    fail_contents: bool,
    search_latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl StubSearchProvider {
    pub fn with_search(mut self, key: &str, results: Vec<SearchResult>) -> Self {
        self.searches.push((key.to_string(), results));
        self
    }

    pub fn with_similar(mut self, results: Vec<SearchResult>) -> Self {
        self.similar = results;
        self
    }

    pub fn with_contents(mut self, results: Vec<SearchResult>) -> Self {
        self.contents = results;
        self
    }

    pub fn failing_search(mut self, key: &str) -> Self {
        self.fail_search_containing = Some(key.to_string());
        self
    }

    pub fn failing_similar(mut self) -> Self {
        self.fail_similar = true;
        self
    }

    pub fn failing_contents(mut self) -> Self {
        self.fail_contents = true;
        self
    }

    /// Each search sleeps this long so overlapping calls can be observed.
    pub fn with_search_latency(mut self, latency: Duration) -> Self {
        self.search_latency = Some(latency);
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable() -> PrepError {
        PrepError::SearchApi {
            status: 503,
            body: "unavailable".to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for StubSearchProvider {
    async fn search(&self, query: &str, num_results: usize) -> Result<SearchResponse> {
        self.record(format!("search:{}:{}", query, num_results));
        if let Some(latency) = self.search_latency {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        if let Some(key) = &self.fail_search_containing {
            if query.contains(key.as_str()) {
                return Err(Self::unavailable());
            }
        }
        let results = self
            .searches
            .iter()
            .find(|(key, _)| query.contains(key.as_str()))
            .map(|(_, results)| results.iter().take(num_results).cloned().collect())
            .unwrap_or_default();
        Ok(SearchResponse {
            results,
            autoprompt_string: None,
        })
    }

    async fn find_similar(&self, url: &str, num_results: usize) -> Result<SearchResponse> {
        self.record(format!("similar:{}:{}", url, num_results));
        if self.fail_similar {
            return Err(Self::unavailable());
        }
        Ok(SearchResponse {
            results: self.similar.iter().take(num_results).cloned().collect(),
            autoprompt_string: None,
        })
    }

    async fn get_contents(&self, ids: &[String]) -> Result<SearchResponse> {
        self.record(format!("contents:{}", ids.join(",")));
        if self.fail_contents {
            return Err(Self::unavailable());
        }
        Ok(SearchResponse {
            results: self
                .contents
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned()
                .collect(),
            autoprompt_string: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TestConfig {
    pub num_results: usize,
    pub content_chars: usize,
    pub concurrent_requests: usize,
    pub archive_dir: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            num_results: 3,
            content_chars: 1000,
            concurrent_requests: 2,
            archive_dir: None,
        }
    }
}

impl ConfigProvider for TestConfig {
    fn host(&self) -> &str {
        "127.0.0.1"
    }

    fn port(&self) -> u16 {
        0
    }

    fn exa_base_url(&self) -> &str {
        "http://127.0.0.1:1"
    }

    fn exa_api_key(&self) -> Option<&str> {
        Some("test-key")
    }

    fn num_results(&self) -> usize {
        self.num_results
    }

    fn content_chars(&self) -> usize {
        self.content_chars
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    fn retry_attempts(&self) -> u32 {
        0
    }

    fn archive_dir(&self) -> Option<&str> {
        self.archive_dir.as_deref()
    }

    fn monitoring_enabled(&self) -> bool {
        false
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<tokio::sync::Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub async fn file_names(&self) -> Vec<String> {
        let files = self.files.lock().await;
        let mut names: Vec<String> = files.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Storage for MemoryStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            PrepError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}
