use crate::entry::EntryBatch;
use crate::error::{Result, WorklogError};
use crate::model::LanguageModel;
use crate::store::WorklogStore;
use crate::vault::CredentialVault;
use chrono::NaiveDate;
use llm_gateway::{GatewayError, Prompt};
use tracing::{debug, info};

const ORGANIZE_SYSTEM_PROMPT: &str = r####"You are a journaling assistant that maintains a running worklog in Markdown.

You will receive the current worklog and a list of new work wins (tasks, accomplishments).

Update the worklog as follows:
- Keep every existing entry exactly as it is.
- Organize entries by time period: one "## <Month> <Year>" heading per month (for example "## January 2025"), newest month first.
- Within a month you may group related entries under "### <Topic>" sub-headings. Reuse an existing topic when one fits; create a new one otherwise.
- Add each new win as its own bullet, using the exact phrasing provided, followed by the given date in parentheses, like "(Jul 29, 2025)".
- Do not write summaries, commentary or sub-bullets.

Return only the complete updated Markdown document, not a diff."####;

/// Merges new entries into the document through the language model.
pub struct EntryOrganizer<'a> {
    store: &'a WorklogStore,
    vault: &'a dyn CredentialVault,
    model: &'a dyn LanguageModel,
}

impl<'a> EntryOrganizer<'a> {
    pub fn new(
        store: &'a WorklogStore,
        vault: &'a dyn CredentialVault,
        model: &'a dyn LanguageModel,
    ) -> Self {
        Self {
            store,
            vault,
            model,
        }
    }

    /// Replace the document with the model's regenerated version containing
    /// `batch`, dated `today`. On any failure the store is left untouched.
    pub async fn organize(&self, batch: &EntryBatch, today: NaiveDate) -> Result<()> {
        if batch.is_empty() {
            return Err(WorklogError::EmptyBatch);
        }
        if !self.vault.status() {
            return Err(WorklogError::MissingCredential);
        }

        // Held until commit so a concurrent undo or organize cannot interleave.
        let mut guard = self.store.lock().await;
        let prompt = build_prompt(guard.text(), batch, today);
        debug!(
            entries = batch.len(),
            document_chars = guard.text().len(),
            "requesting worklog merge"
        );

        let reply = self.model.complete(&prompt).await?;
        let updated = clean_completion(&reply)?;
        guard.commit(updated)?;
        info!(entries = batch.len(), "entries organized into worklog");
        Ok(())
    }
}

pub fn build_prompt(current: &str, batch: &EntryBatch, today: NaiveDate) -> Prompt {
    let current = if current.trim().is_empty() {
        "(the worklog is empty)"
    } else {
        current
    };
    let entries = batch
        .entries()
        .iter()
        .map(|e| format!("- {e}"))
        .collect::<Vec<_>>()
        .join("\n");
    Prompt::new(
        ORGANIZE_SYSTEM_PROMPT,
        format!("Here is the current worklog:\n\n{current}"),
        format!(
            "Today's date is {}. Here are the new work entries to add:\n\n{entries}",
            today.format("%b %-d, %Y")
        ),
    )
}

/// Unwrap a reply the model fenced as a code block. Any other reply is kept
/// byte-for-byte. Blank replies are rejected.
pub fn clean_completion(reply: &str) -> Result<String> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(empty_completion());
    }
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return Ok(reply.to_string());
    };
    let body = match inner.split_once('\n') {
        // Drop the info string ("markdown", "md", ...) on the opening line.
        Some((info, body)) if !info.trim().contains(' ') => body,
        _ => inner,
    };
    if body.trim().is_empty() {
        return Err(empty_completion());
    }
    Ok(body.to_string())
}

fn empty_completion() -> WorklogError {
    GatewayError::Provider {
        status: None,
        message: "empty completion".into(),
    }
    .into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedModel, VALID_KEY};
    use crate::vault::MemoryVault;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 29).unwrap()
    }

    fn batch(entries: &[&str]) -> EntryBatch {
        EntryBatch::new(entries, 3).unwrap()
    }

    #[tokio::test]
    async fn success_commits_reply_and_backs_up_previous() {
        let dir = TempDir::new().unwrap();
        let store = WorklogStore::open(dir.path()).unwrap();
        store.commit("## June 2025\n- Old win (Jun 2, 2025)\n".into()).await.unwrap();
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().reply("## July 2025\n- New win (Jul 29, 2025)");

        EntryOrganizer::new(&store, &vault, &model)
            .organize(&batch(&["New win"]), today())
            .await
            .unwrap();

        assert_eq!(store.read().await, "## July 2025\n- New win (Jul 29, 2025)");
        assert_eq!(
            store.backup().await.as_deref(),
            Some("## June 2025\n- Old win (Jun 2, 2025)\n")
        );
    }

    #[tokio::test]
    async fn prompt_carries_document_entries_and_date() {
        let dir = TempDir::new().unwrap();
        let store = WorklogStore::open(dir.path()).unwrap();
        store.commit("## June 2025\n- Old win\n".into()).await.unwrap();
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().reply("doc");

        EntryOrganizer::new(&store, &vault, &model)
            .organize(&batch(&["Shipped v1 API", "Fixed login bug"]), today())
            .await
            .unwrap();

        let prompt = model.last_prompt().unwrap();
        assert!(prompt.context.contains("- Old win"));
        assert!(prompt.task.contains("- Shipped v1 API\n- Fixed login bug"));
        assert!(prompt.task.contains("Jul 29, 2025"));
        assert!(prompt.system.contains("complete updated Markdown document"));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_gateway() {
        let dir = TempDir::new().unwrap();
        let store = WorklogStore::open(dir.path()).unwrap();
        let vault = MemoryVault::new();
        let model = ScriptedModel::new().reply("never used");

        let err = EntryOrganizer::new(&store, &vault, &model)
            .organize(&batch(&["x"]), today())
            .await
            .unwrap_err();
        assert!(matches!(err, WorklogError::MissingCredential));
        assert_eq!(model.calls(), 0);
        assert!(!store.has_backup().await);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let store = WorklogStore::open(dir.path()).unwrap();
        store.commit("v1".into()).await.unwrap();
        store.commit("v2".into()).await.unwrap();
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().fail(GatewayError::RateLimited {
            retry_after_secs: Some(3),
        });

        let err = EntryOrganizer::new(&store, &vault, &model)
            .organize(&batch(&["x"]), today())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorklogError::Gateway(GatewayError::RateLimited { .. })
        ));
        assert_eq!(store.read().await, "v2");
        assert_eq!(store.backup().await.as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn same_batch_twice_is_applied_twice() {
        let dir = TempDir::new().unwrap();
        let store = WorklogStore::open(dir.path()).unwrap();
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().reply("- a").reply("- a\n- a");
        let organizer = EntryOrganizer::new(&store, &vault, &model);

        organizer.organize(&batch(&["a"]), today()).await.unwrap();
        organizer.organize(&batch(&["a"]), today()).await.unwrap();

        assert_eq!(model.calls(), 2);
        assert_eq!(store.read().await, "- a\n- a");
        assert_eq!(store.backup().await.as_deref(), Some("- a"));
    }

    #[test]
    fn system_prompt_is_complete() {
        assert!(ORGANIZE_SYSTEM_PROMPT.contains("\"## <Month> <Year>\""));
        assert!(ORGANIZE_SYSTEM_PROMPT.contains("\"### <Topic>\""));
        assert!(ORGANIZE_SYSTEM_PROMPT.ends_with("not a diff."));
    }

    #[test]
    fn clean_completion_strips_fences() {
        assert_eq!(
            clean_completion("```markdown\n## July 2025\n- x\n```").unwrap(),
            "## July 2025\n- x\n"
        );
        assert_eq!(clean_completion("```\n- x\n```\n").unwrap(), "- x\n");
    }

    #[test]
    fn clean_completion_keeps_unfenced_reply_verbatim() {
        assert_eq!(clean_completion("  - plain  \n").unwrap(), "  - plain  \n");
    }

    #[test]
    fn clean_completion_rejects_empty() {
        let err = clean_completion("```markdown\n\n```").unwrap_err();
        assert!(matches!(
            err,
            WorklogError::Gateway(GatewayError::Provider { .. })
        ));
        assert!(clean_completion("   ").is_err());
    }
}
