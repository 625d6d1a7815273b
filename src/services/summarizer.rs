use std::collections::HashMap;
use std::sync::Arc;

use mongodb::Database;
use redis::aio::ConnectionManager;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};

use crate::modules::agents::crud::AgentCrud;
use crate::modules::meetings::crud::MeetingCrud;
use crate::modules::users::crud::UserCrud;
use crate::services::llm::{LlmError, SummaryModel};
use crate::services::transcript::{self, TranscriptDecodeError};

const SYSTEM_PROMPT: &str = r#"You are an expert summarizer. You write readable, concise, simple content. You are given a transcript of a meeting and you need to summarize it.

Use the following markdown structure for every output:

### Overview
Provide a detailed, engaging summary of the session's content. Focus on major features, user workflows, and any key takeaways. Write in a narrative style, using full sentences. Highlight unique or powerful aspects of the product, platform, or discussion.

### Notes
Break down key content into thematic sections with timestamp ranges. Each section should summarize key points, actions, or demos in bullet format.

Example:
#### Section Name
- Main point or demo shown here
- Another key insight or interaction
- Follow-up tool or explanation provided

#### Next Section
- Feature X automatically does Y
- Mention of integration with Z"#;

/// Shown to the user when the model call was rejected for quota reasons.
pub const RATE_LIMIT_FALLBACK: &str =
    "Summary generation failed due to API rate limits. Please check your API keys and try again later.";

/// Shown to the user when the model call failed for any other reason.
pub const GENERIC_FALLBACK: &str =
    "Summary generation failed due to an unexpected error. Please try again later.";

/// A generation error never fails the run; it maps to one of two fixed
/// placeholder summaries.
pub fn fallback_summary(err: &LlmError) -> &'static str {
    if err.is_rate_limit() {
        RATE_LIMIT_FALLBACK
    } else {
        GENERIC_FALLBACK
    }
}

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("transcript fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("transcript fetch returned status {0}")]
    TranscriptStatus(reqwest::StatusCode),
    #[error(transparent)]
    Decode(#[from] TranscriptDecodeError),
    #[error("speaker lookup failed: {0}")]
    Database(mongodb::error::Error),
    #[error("summary write failed: {0}")]
    Persist(mongodb::error::Error),
    #[error("meeting {0} not found")]
    MeetingNotFound(String),
}

/// The transcript summarization pipeline.
///
/// One invocation per meeting: fetch the transcript, decode it, attach
/// speaker names, ask the model for a summary, write it back. Runs for
/// different meetings share nothing and may proceed concurrently.
#[derive(Clone)]
pub struct Summarizer {
    http: Client,
    db: Database,
    redis: ConnectionManager,
    model: Arc<dyn SummaryModel>,
}

impl Summarizer {
    pub fn new(db: Database, redis: ConnectionManager, model: Arc<dyn SummaryModel>) -> Self {
        Self {
            http: Client::new(),
            db,
            redis,
            model,
        }
    }

    /// Run the pipeline to completion for one meeting.
    ///
    /// Fetch, decode, and speaker-lookup failures abort the run and leave
    /// the meeting row untouched. A model failure does not: the meeting
    /// still completes, with a placeholder summary.
    pub async fn run(&self, meeting_id: &str, transcript_url: &str) -> Result<(), SummarizeError> {
        info!(meeting_id, transcript_url, "fetching transcript");

        let response = self.http.get(transcript_url).send().await?;
        if !response.status().is_success() {
            return Err(SummarizeError::TranscriptStatus(response.status()));
        }
        let payload = response.text().await?;

        let items = transcript::parse(&payload)?;
        info!(meeting_id, utterances = items.len(), "transcript decoded");

        let names = self.resolve_speakers(&items).await?;
        let enriched = transcript::enrich(items, &names);

        let prompt = format!(
            "Summarize the following transcript:\n{}",
            serde_json::to_string(&enriched).unwrap_or_default()
        );

        let summary = match self.model.generate(SYSTEM_PROMPT, &prompt).await {
            Ok(text) => text,
            Err(err) => {
                error!(meeting_id, error = %err, "summary generation failed");
                fallback_summary(&err).to_string()
            }
        };

        let crud = MeetingCrud::new(&self.db, self.redis.clone());
        let updated = crud
            .complete_with_summary(meeting_id, &summary)
            .await
            .map_err(SummarizeError::Persist)?;

        if !updated {
            return Err(SummarizeError::MeetingNotFound(meeting_id.to_string()));
        }

        info!(meeting_id, "summary persisted");
        Ok(())
    }

    /// Union lookup across the human-user and agent stores. A user and an
    /// agent sharing an identifier is resolved in the user's favor; ids
    /// found in neither store stay unresolved and enrich to "Unknown".
    async fn resolve_speakers(
        &self,
        items: &[transcript::TranscriptItem],
    ) -> Result<HashMap<String, String>, SummarizeError> {
        let ids = transcript::speaker_ids(items);

        let users = UserCrud::new(&self.db)
            .find_by_ids(&ids)
            .await
            .map_err(SummarizeError::Database)?;
        let agents = AgentCrud::new(&self.db)
            .find_by_ids(&ids)
            .await
            .map_err(SummarizeError::Database)?;

        let mut names: HashMap<String, String> =
            users.into_iter().map(|u| (u.id, u.name)).collect();
        for agent in agents {
            names.entry(agent.id).or_insert(agent.name);
        }

        Ok(names)
    }
}
