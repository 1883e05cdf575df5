//! E-learning hub: video search and article summaries.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::prompts;
use super::search_links::google_search_url;

/// Curated video ids the model may choose from.
pub const SAMPLE_VIDEO_IDS: &[&str] = &[
    "qAxqR5_p_vE",
    "x9yIM0he_gE",
    "3-v8-zQ_d-Q",
    "k2v_q_A-k6E",
    "yF4N2j-e6es",
    "z43_L7xQuA4",
];

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSearchInput {
    pub query: String,
}

impl VideoSearchInput {
    pub fn prompt(&self) -> String {
        prompts::render(
            prompts::VIDEO_SEARCH,
            &[
                ("video_ids", &SAMPLE_VIDEO_IDS.join(", ")),
                ("query", self.query.trim()),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// `MM:SS`.
    pub duration: String,
    pub thumbnail_url: String,
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoSearchResults {
    pub videos: Vec<Video>,
}

impl VideoSearchResults {
    pub const MAX: usize = 6;

    pub fn empty() -> Self {
        Self::default()
    }

    /// Drops videos whose id is not curated or repeats an earlier one, and
    /// caps the list at [`Self::MAX`]. Returns how many were removed.
    pub fn retain_curated(&mut self) -> usize {
        let before = self.videos.len();
        let mut seen = HashSet::new();
        self.videos.retain(|video| {
            SAMPLE_VIDEO_IDS.contains(&video.video_id.as_str()) && seen.insert(video.video_id.clone())
        });
        self.videos.truncate(Self::MAX);
        before - self.videos.len()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSummaryInput {
    pub query: String,
}

impl ArticleSummaryInput {
    pub fn prompt(&self) -> String {
        prompts::render(prompts::ARTICLE_SUMMARY, &[("query", self.query.trim())])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    Related,
    Unrelated,
}

/// Flow output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub summary: String,
    pub source_url: String,
    pub relevance: Relevance,
}

impl ArticleSummary {
    /// Payload returned when the hosted model cannot be used.
    pub fn unavailable(query: &str) -> Self {
        Self {
            title: "Summary unavailable".to_string(),
            summary: "We could not summarize an article on this topic right now. Please try again in a few moments."
                .to_string(),
            source_url: google_search_url(query.trim()),
            relevance: Relevance::Unrelated,
        }
    }
}
