use crate::domain::model::{Briefing, MeetingRequest, ResearchBundle, SearchResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn exa_base_url(&self) -> &str;
    fn exa_api_key(&self) -> Option<&str>;
    fn num_results(&self) -> usize;
    fn content_chars(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
    fn archive_dir(&self) -> Option<&str>;
    fn monitoring_enabled(&self) -> bool;

    fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}

/// 網頁搜尋服務
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> Result<SearchResponse>;
    async fn find_similar(&self, url: &str, num_results: usize) -> Result<SearchResponse>;
    async fn get_contents(&self, ids: &[String]) -> Result<SearchResponse>;

    /// 是否已設定憑證
    fn is_configured(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, request: &MeetingRequest) -> Result<ResearchBundle>;
    async fn transform(&self, request: &MeetingRequest, research: ResearchBundle) -> Result<Briefing>;
    async fn load(&self, briefing: Briefing) -> Result<String>;
}
