use crate::error::{Result, WorklogError};
use crate::extract::extract_range;
use crate::model::LanguageModel;
use crate::store::WorklogStore;
use crate::vault::CredentialVault;
use chrono::NaiveDate;
use llm_gateway::Prompt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// ReportStyle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    Executive,
    Detailed,
    Chronological,
    Accomplishments,
}

impl ReportStyle {
    pub const ALL: [ReportStyle; 4] = [
        ReportStyle::Executive,
        ReportStyle::Detailed,
        ReportStyle::Chronological,
        ReportStyle::Accomplishments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportStyle::Executive => "executive",
            ReportStyle::Detailed => "detailed",
            ReportStyle::Chronological => "chronological",
            ReportStyle::Accomplishments => "accomplishments",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportStyle::Executive => "Executive Summary",
            ReportStyle::Detailed => "Detailed Report",
            ReportStyle::Chronological => "Chronological",
            ReportStyle::Accomplishments => "Major Accomplishments",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ReportStyle::Executive => "High-level achievements for leadership review",
            ReportStyle::Detailed => "Comprehensive view with technical details",
            ReportStyle::Chronological => "Month-by-month progression timeline",
            ReportStyle::Accomplishments => "Focus on significant wins and milestones",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            ReportStyle::Executive => {
                "You are writing an executive summary of a worklog. Focus on high-level \
                 achievements, major milestones and strategic outcomes. Group the work by \
                 theme or project and call out business impact. Keep it concise and \
                 professional for leadership review."
            }
            ReportStyle::Detailed => {
                "You are writing a detailed report of a worklog. Organize every entry by \
                 category or project and keep the specific details, including technical \
                 ones. Present a comprehensive view of all the work completed, improving \
                 readability while keeping the original structure."
            }
            ReportStyle::Chronological => {
                "You are writing a chronological report of a worklog. Organize the entries \
                 by month, oldest first, and group by theme or project within each month. \
                 The report should tell how the work progressed over the period."
            }
            ReportStyle::Accomplishments => {
                "You are writing an accomplishments report of a worklog. Keep only major \
                 achievements: completed projects, successful launches and significant \
                 milestones. Leave out routine tasks."
            }
        }
    }
}

impl fmt::Display for ReportStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStyle {
    type Err = WorklogError;

    fn from_str(s: &str) -> Result<Self> {
        ReportStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| WorklogError::InvalidStyle(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ReportRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub style: ReportStyle,
}

impl ReportRequest {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, style: ReportStyle) -> Result<Self> {
        let req = Self {
            start_date,
            end_date,
            style,
        };
        req.validate()?;
        Ok(req)
    }

    /// Build a request from `YYYY-MM-DD` dates and a style name.
    pub fn parse(start: &str, end: &str, style: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?, style.parse()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(WorklogError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| WorklogError::InvalidDate(s.to_string()))
}

/// Default export name, e.g. `worklog-report-2024-01-01-to-2024-01-31.md`.
pub fn report_filename(req: &ReportRequest) -> String {
    format!("worklog-report-{}-to-{}.md", req.start_date, req.end_date)
}

// ---------------------------------------------------------------------------
// ReportSynthesizer
// ---------------------------------------------------------------------------

/// Turns the slice of the worklog covering a date window into a narrative
/// report. Never writes to the store.
pub struct ReportSynthesizer<'a> {
    store: &'a WorklogStore,
    vault: &'a dyn CredentialVault,
    model: &'a dyn LanguageModel,
}

impl<'a> ReportSynthesizer<'a> {
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

    pub async fn generate(&self, req: &ReportRequest) -> Result<String> {
        req.validate()?;
        if !self.vault.status() {
            return Err(WorklogError::MissingCredential);
        }

        let document = self.store.read().await;
        let excerpt = extract_range(&document, req.start_date, req.end_date);
        debug!(
            document_chars = document.len(),
            excerpt_chars = excerpt.len(),
            "extracted report window"
        );
        if excerpt.trim().is_empty() {
            return Err(WorklogError::NoEntriesInRange {
                start: req.start_date,
                end: req.end_date,
            });
        }

        let report = self.model.complete(&build_prompt(req, &excerpt)).await?;
        info!(
            style = %req.style,
            start = %req.start_date,
            end = %req.end_date,
            report_chars = report.len(),
            "report generated"
        );
        Ok(report)
    }
}

pub fn build_prompt(req: &ReportRequest, excerpt: &str) -> Prompt {
    Prompt::new(
        req.style.system_prompt(),
        format!("Here are the worklog entries for the period:\n\n{excerpt}"),
        format!(
            "Write a {} report covering {} to {}, formatted as Markdown.",
            req.style, req.start_date, req.end_date
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedModel, VALID_KEY};
    use crate::vault::MemoryVault;
    use llm_gateway::GatewayError;
    use tempfile::TempDir;

    const DOC: &str = "\
# Daily Work Log

## February 2024
- Migrated billing database (Feb 3, 2024)

## January 2024
- Shipped v1 API (Jan 15, 2024)
";

    async fn seeded_store(dir: &TempDir) -> WorklogStore {
        let store = WorklogStore::open(dir.path()).unwrap();
        store.commit(DOC.into()).await.unwrap();
        store
    }

    fn january(style: ReportStyle) -> ReportRequest {
        ReportRequest::parse("2024-01-01", "2024-01-31", style.as_str()).unwrap()
    }

    #[test]
    fn style_parsing_is_strict() {
        assert_eq!("executive".parse::<ReportStyle>().unwrap(), ReportStyle::Executive);
        assert_eq!(
            "accomplishments".parse::<ReportStyle>().unwrap(),
            ReportStyle::Accomplishments
        );
        assert!(matches!(
            "Executive".parse::<ReportStyle>().unwrap_err(),
            WorklogError::InvalidStyle(_)
        ));
        assert!("weekly".parse::<ReportStyle>().is_err());
    }

    #[test]
    fn style_serde_uses_lowercase_names() {
        let json = serde_yaml::to_string(&ReportStyle::Chronological).unwrap();
        assert_eq!(json.trim(), "chronological");
        let style: ReportStyle = serde_yaml::from_str("detailed").unwrap();
        assert_eq!(style, ReportStyle::Detailed);
    }

    #[test]
    fn request_parsing() {
        assert!(matches!(
            ReportRequest::parse("2024-02-01", "2024-01-01", "executive").unwrap_err(),
            WorklogError::InvalidRange { .. }
        ));
        assert!(matches!(
            ReportRequest::parse("01/02/2024", "2024-01-01", "executive").unwrap_err(),
            WorklogError::InvalidDate(_)
        ));
        let same_day = ReportRequest::parse("2024-01-05", "2024-01-05", "detailed").unwrap();
        assert_eq!(
            report_filename(&same_day),
            "worklog-report-2024-01-05-to-2024-01-05.md"
        );
    }

    #[tokio::test]
    async fn excludes_content_outside_window() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().reply("# Report\nShipped the API.");

        let report = ReportSynthesizer::new(&store, &vault, &model)
            .generate(&january(ReportStyle::Executive))
            .await
            .unwrap();

        assert_eq!(report, "# Report\nShipped the API.");
        let prompt = model.last_prompt().unwrap();
        assert!(prompt.context.contains("Shipped v1 API"));
        assert!(!prompt.context.contains("Migrated billing database"));
        assert!(prompt.system.contains("executive summary"));
        assert!(prompt.task.contains("2024-01-01 to 2024-01-31"));
    }

    #[tokio::test]
    async fn generate_never_changes_document() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let backup_before = store.backup().await;
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().reply("report");

        ReportSynthesizer::new(&store, &vault, &model)
            .generate(&january(ReportStyle::Detailed))
            .await
            .unwrap();

        assert_eq!(store.read().await, DOC);
        assert_eq!(store.backup().await, backup_before);
    }

    #[tokio::test]
    async fn inverted_range_fails_without_gateway_call() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().reply("never used");
        let req = ReportRequest {
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            style: ReportStyle::Executive,
        };

        let err = ReportSynthesizer::new(&store, &vault, &model)
            .generate(&req)
            .await
            .unwrap_err();
        assert!(matches!(err, WorklogError::InvalidRange { .. }));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_without_gateway_call() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let vault = MemoryVault::new();
        let model = ScriptedModel::new().reply("never used");

        let err = ReportSynthesizer::new(&store, &vault, &model)
            .generate(&january(ReportStyle::Executive))
            .await
            .unwrap_err();
        assert!(matches!(err, WorklogError::MissingCredential));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn empty_window_fails_without_gateway_call() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().reply("never used");
        let req = ReportRequest::parse("2023-01-01", "2023-12-31", "chronological").unwrap();

        let err = ReportSynthesizer::new(&store, &vault, &model)
            .generate(&req)
            .await
            .unwrap_err();
        assert!(matches!(err, WorklogError::NoEntriesInRange { .. }));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn gateway_error_surfaces_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let vault = MemoryVault::with_key(VALID_KEY).unwrap();
        let model = ScriptedModel::new().fail(GatewayError::Network("timed out".into()));

        let err = ReportSynthesizer::new(&store, &vault, &model)
            .generate(&january(ReportStyle::Accomplishments))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, WorklogError::Gateway(GatewayError::Network(_))));
    }
}
