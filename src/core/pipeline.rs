use crate::core::{
    Briefing, BriefingSection, ConfigProvider, MeetingRequest, ParticipantFindings, Pipeline,
    ResearchBundle, SearchProvider, SearchResult, Source, Storage,
};
use crate::domain::model::truncate_chars;
use crate::utils::error::{PrepError, Result};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

const SNIPPET_CHARS: usize = 300;
const SLUG_MAX_CHARS: usize = 40;

/// 會議準備 Pipeline：搜尋參與者與產業背景，組合成簡報
pub struct MeetingPrepPipeline<S: Storage, C: ConfigProvider> {
    provider: Arc<dyn SearchProvider>,
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> MeetingPrepPipeline<S, C> {
    pub fn new(provider: Arc<dyn SearchProvider>, storage: S, config: C) -> Self {
        Self {
            provider,
            storage,
            config,
        }
    }

    /// 並行搜尋每位參與者，結果維持參與者順序
    async fn research_participants(
        &self,
        participants: &[String],
        context: &str,
    ) -> Result<Vec<ParticipantFindings>> {
        let num_results = self.config.num_results();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_requests().max(1)));
        let mut tasks = JoinSet::new();

        for (index, participant) in participants.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let participant = participant.clone();
            let query = format!("{} {}", participant, context).trim().to_string();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PrepError::Processing {
                        message: format!("participant research aborted: {}", e),
                    })?;
                tracing::debug!("🔎 Researching participant: {}", participant);
                let response = provider.search(&query, num_results).await?;
                Ok::<_, PrepError>((
                    index,
                    ParticipantFindings {
                        participant,
                        results: response.results,
                    },
                ))
            });
        }

        let mut findings = Vec::with_capacity(participants.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, finding) = joined.map_err(|e| PrepError::Processing {
                message: format!("participant research task failed: {}", e),
            })??;
            findings.push((index, finding));
        }

        findings.sort_by_key(|(index, _)| *index);
        Ok(findings.into_iter().map(|(_, finding)| finding).collect())
    }

    async fn similar_pages(&self, industry: &[SearchResult]) -> Vec<SearchResult> {
        let Some(top) = industry.first() else {
            return Vec::new();
        };

        match self
            .provider
            .find_similar(&top.url, self.config.num_results())
            .await
        {
            Ok(response) => response
                .results
                .into_iter()
                .filter(|r| r.url != top.url)
                .collect(),
            Err(e) => {
                tracing::warn!("⚠️ Similar page lookup failed for {}: {}", top.url, e);
                Vec::new()
            }
        }
    }

    async fn page_contents(&self, industry: &[SearchResult]) -> Vec<SearchResult> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = industry
            .iter()
            .filter(|r| seen.insert(r.id.clone()))
            .map(|r| r.id.clone())
            .collect();

        if ids.is_empty() {
            return Vec::new();
        }

        let max_chars = self.config.content_chars();
        match self.provider.get_contents(&ids).await {
            Ok(response) => response
                .results
                .into_iter()
                .map(|mut page| {
                    page.text = page
                        .text
                        .map(|text| truncate_chars(&text, max_chars).to_string());
                    page
                })
                .collect(),
            Err(e) => {
                tracing::warn!("⚠️ Content lookup failed for {} pages: {}", ids.len(), e);
                Vec::new()
            }
        }
    }

    fn archive_name(briefing: &Briefing) -> String {
        format!(
            "briefing_{}_{}.md",
            briefing.generated_at.format("%Y%m%d_%H%M%S"),
            slugify(&briefing.objective)
        )
    }
}

pub fn validate_request(request: &MeetingRequest) -> Result<Vec<String>> {
    let participants = request.participant_list();
    if participants.is_empty() {
        return Err(PrepError::Validation {
            message: "at least one participant is required".to_string(),
        });
    }
    if request.context.trim().is_empty() {
        return Err(PrepError::Validation {
            message: "context cannot be empty".to_string(),
        });
    }
    if request.objective.trim().is_empty() {
        return Err(PrepError::Validation {
            message: "objective cannot be empty".to_string(),
        });
    }
    Ok(participants)
}

/// 由目標產生檔名用 slug（僅 `[a-z0-9-]`）
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    let slug: String = slug.chars().take(SLUG_MAX_CHARS).collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "meeting".to_string()
    } else {
        slug.to_string()
    }
}

fn snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let clipped = truncate_chars(&collapsed, SNIPPET_CHARS);
    if clipped.len() < collapsed.len() {
        format!("{}…", clipped)
    } else {
        clipped.to_string()
    }
}

fn render_result(result: &SearchResult, contents: &HashMap<&str, &str>) -> String {
    let mut line = format!("- **[{}]({})**", result.display_title(), result.url);
    if let Some(date) = result.published_date.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!(" ({})", date));
    }
    if let Some(author) = result.author.as_deref().filter(|a| !a.is_empty()) {
        line.push_str(&format!(" by {}", author));
    }

    let text = result
        .text
        .as_deref()
        .or_else(|| contents.get(result.id.as_str()).copied())
        .filter(|t| !t.trim().is_empty());
    if let Some(text) = text {
        line.push_str(&format!("\n  > {}", snippet(text)));
    }
    line
}

fn render_results(results: &[SearchResult], contents: &HashMap<&str, &str>, empty: &str) -> String {
    if results.is_empty() {
        return empty.to_string();
    }
    results
        .iter()
        .map(|r| render_result(r, contents))
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_sources(research: &ResearchBundle) -> Vec<Source> {
    let mut seen = HashSet::new();
    research
        .participants
        .iter()
        .flat_map(|p| p.results.iter())
        .chain(research.industry.iter())
        .chain(research.similar.iter())
        .filter(|r| seen.insert(r.url.clone()))
        .map(|r| Source {
            title: r.display_title().to_string(),
            url: r.url.clone(),
        })
        .collect()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MeetingPrepPipeline<S, C> {
    async fn extract(&self, request: &MeetingRequest) -> Result<ResearchBundle> {
        let participants = validate_request(request)?;
        let context = request.context.trim();

        tracing::info!("🔎 Researching {} participants", participants.len());
        let participant_findings = self.research_participants(&participants, context).await?;

        let industry_query = format!("{} industry trends and news", context);
        tracing::info!("🏭 Analyzing industry context: {}", context);
        let industry = self
            .provider
            .search(&industry_query, self.config.num_results())
            .await?
            .results;

        let similar = self.similar_pages(&industry).await;
        let contents = self.page_contents(&industry).await;

        Ok(ResearchBundle {
            participants: participant_findings,
            industry,
            similar,
            contents,
        })
    }

    async fn transform(&self, request: &MeetingRequest, research: ResearchBundle) -> Result<Briefing> {
        let limit = self.config.num_results();
        let contents: HashMap<&str, &str> = research
            .contents
            .iter()
            .filter_map(|page| page.text.as_deref().map(|text| (page.id.as_str(), text)))
            .collect();

        let participants_body = research
            .participants
            .iter()
            .map(|finding| {
                let results: Vec<SearchResult> =
                    finding.results.iter().take(limit).cloned().collect();
                format!(
                    "### {}\n\n{}",
                    finding.participant,
                    render_results(&results, &contents, "No public information found.")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let sections = vec![
            BriefingSection {
                heading: "Objective".to_string(),
                body: request.objective.trim().to_string(),
            },
            BriefingSection {
                heading: "Context".to_string(),
                body: request.context.trim().to_string(),
            },
            BriefingSection {
                heading: "Participants".to_string(),
                body: participants_body,
            },
            BriefingSection {
                heading: "Industry Context".to_string(),
                body: render_results(&research.industry, &contents, "No industry coverage found."),
            },
            BriefingSection {
                heading: "Related Coverage".to_string(),
                body: render_results(&research.similar, &contents, "No related coverage found."),
            },
        ];

        Ok(Briefing {
            objective: request.objective.trim().to_string(),
            context: request.context.trim().to_string(),
            sections,
            sources: collect_sources(&research),
            generated_at: Utc::now(),
        })
    }

    async fn load(&self, briefing: Briefing) -> Result<String> {
        let markdown = briefing.to_markdown();

        if self.config.archive_dir().is_some() {
            let name = Self::archive_name(&briefing);
            tracing::debug!("Writing briefing ({} bytes) to storage", markdown.len());
            self.storage.write_file(&name, markdown.as_bytes()).await?;
            tracing::info!("💾 Briefing archived as {}", name);
        }

        Ok(markdown)
    }
}
