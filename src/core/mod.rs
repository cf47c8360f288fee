pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    Briefing, BriefingSection, MeetingRequest, ParticipantFindings, ResearchBundle, SearchResponse,
    SearchResult, Source,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SearchProvider, Storage};
pub use crate::utils::error::Result;
