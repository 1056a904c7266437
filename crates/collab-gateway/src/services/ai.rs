//! AI assistant operations.

use collab_protocol::{GeneratedTask, ProjectId, catalog};
use collab_transport::HttpTransport;

use super::require;
use crate::{CredentialStore, GatewayClient, GatewayError, RequestOptions};

/// How many characters of the description the local fallback keeps.
pub const SUMMARY_FALLBACK_CHARS: usize = 150;

/// Where a [`Summary`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// The service's summarizer.
    Remote,
    /// [`summary_fallback`], because the service call failed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

/// The summary shown when the service can't produce one: the trimmed
/// description if it is short enough, otherwise its first
/// [`SUMMARY_FALLBACK_CHARS`] characters followed by `...`.
///
/// ```rust
/// use collab_gateway::summary_fallback;
///
/// assert_eq!(summary_fallback("  Fix the login page  "), "Fix the login page");
///
/// let long = "a".repeat(200);
/// let summary = summary_fallback(&long);
/// assert_eq!(summary.chars().count(), 153);
/// assert!(summary.ends_with("..."));
/// ```
pub fn summary_fallback(description: &str) -> String {
    let trimmed = description.trim();
    match trimmed.char_indices().nth(SUMMARY_FALLBACK_CHARS) {
        None => trimmed.to_string(),
        Some((cut, _)) => format!("{}...", trimmed[..cut].trim_end()),
    }
}

impl<T: HttpTransport, S: CredentialStore> GatewayClient<T, S> {
    /// Summarizes a task description.
    ///
    /// Remote failures never reach the caller: the result falls back to
    /// [`summary_fallback`] and is marked [`SummarySource::Fallback`].
    ///
    /// # Errors
    /// Only `InvalidInput`, for a blank description. Nothing is sent then.
    pub async fn summarize_task(&self, description: &str) -> Result<Summary, GatewayError> {
        require(description, "task description")?;
        let outcome: Result<Option<String>, GatewayError> = self
            .execute(&catalog::summarize_task(description), RequestOptions::default())
            .await;
        match outcome {
            Ok(Some(text)) if !text.trim().is_empty() => Ok(Summary {
                text,
                source: SummarySource::Remote,
            }),
            Ok(_) => {
                tracing::warn!("summarizer returned nothing, using local fallback");
                Ok(Self::fallback_summary(description))
            }
            Err(e) => {
                tracing::warn!(kind = %e.kind(), error = %e, "summarizer unavailable, using local fallback");
                Ok(Self::fallback_summary(description))
            }
        }
    }

    fn fallback_summary(description: &str) -> Summary {
        Summary {
            text: summary_fallback(description),
            source: SummarySource::Fallback,
        }
    }

    /// Asks the service to draft tasks for a project from a free-text
    /// prompt. The tasks are created server-side.
    ///
    /// # Errors
    /// `InvalidInput` for a blank prompt or project id, otherwise any
    /// request classification.
    pub async fn generate_tasks(
        &self,
        prompt: &str,
        project_id: &ProjectId,
    ) -> Result<Vec<GeneratedTask>, GatewayError> {
        require(prompt, "prompt")?;
        require(project_id.as_str(), "project id")?;
        let tasks: Option<Vec<GeneratedTask>> = self
            .execute(
                &catalog::generate_tasks(prompt.trim(), project_id),
                RequestOptions::default(),
            )
            .await?;
        let tasks = tasks.unwrap_or_default();
        tracing::info!(project = %project_id, count = tasks.len(), "tasks generated");
        Ok(tasks)
    }
}
