use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 會議準備請求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub participants: String,
    pub context: String,
    pub objective: String,
}

impl MeetingRequest {
    pub fn new(
        participants: impl Into<String>,
        context: impl Into<String>,
        objective: impl Into<String>,
    ) -> Self {
        Self {
            participants: participants.into(),
            context: context.into(),
            objective: objective.into(),
        }
    }

    /// 拆分參與者清單（逗號、分號或換行），去除空白與重複（不分大小寫），保留原始順序
    pub fn participant_list(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.participants
            .split([',', ';', '\n'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl SearchResult {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.url.as_str())
    }
}

fn or_none<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "None".to_string())
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", or_none(&self.title))?;
        writeln!(f, "URL: {}", self.url)?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Score: {}", or_none(&self.score))?;
        writeln!(f, "Published Date: {}", or_none(&self.published_date))?;
        writeln!(f, "Author: {}", or_none(&self.author))?;
        writeln!(f, "Text: {}", or_none(&self.text))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub autoprompt_string: Option<String>,
}

impl fmt::Display for SearchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks: Vec<String> = self.results.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", blocks.join("\n\n"))?;
        if let Some(autoprompt) = &self.autoprompt_string {
            write!(f, "\n\nAutoprompt String: {}", autoprompt)?;
        }
        Ok(())
    }
}

/// 以字元（而非位元組）截斷字串
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantFindings {
    pub participant: String,
    pub results: Vec<SearchResult>,
}

/// extract 階段的研究結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchBundle {
    pub participants: Vec<ParticipantFindings>,
    pub industry: Vec<SearchResult>,
    pub similar: Vec<SearchResult>,
    pub contents: Vec<SearchResult>,
}

impl ResearchBundle {
    pub fn total_results(&self) -> usize {
        self.participants.iter().map(|p| p.results.len()).sum::<usize>()
            + self.industry.len()
            + self.similar.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BriefingSection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Briefing {
    pub objective: String,
    pub context: String,
    pub sections: Vec<BriefingSection>,
    pub sources: Vec<Source>,
    pub generated_at: DateTime<Utc>,
}

impl Briefing {
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Meeting Briefing\n\n");
        out.push_str(&format!(
            "_Generated at {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        for section in &self.sections {
            out.push_str(&format!("## {}\n\n", section.heading));
            out.push_str(section.body.trim_end());
            out.push_str("\n\n");
        }

        out.push_str("## Sources\n\n");
        if self.sources.is_empty() {
            out.push_str("No sources found.\n");
        } else {
            for (i, source) in self.sources.iter().enumerate() {
                out.push_str(&format!("{}. [{}]({})\n", i + 1, source.title, source.url));
            }
        }

        out
    }
}
