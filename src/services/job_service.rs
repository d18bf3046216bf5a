use crate::models::{AppliedJob, JobSections, ListedJob, RecommendEntry, RecommendedJob};
use crate::repositories::{JobStore, RepositoryError};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// What happened to one entry of a bulk recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Added,
    Duplicate,
    Malformed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub added: usize,
    pub skipped: usize,
}

impl BatchOutcome {
    fn record(mut self, outcome: EntryOutcome) -> Self {
        self.processed += 1;
        match outcome {
            EntryOutcome::Added => self.added += 1,
            EntryOutcome::Duplicate | EntryOutcome::Malformed => self.skipped += 1,
        }
        self
    }
}

impl FromIterator<EntryOutcome> for BatchOutcome {
    fn from_iter<I: IntoIterator<Item = EntryOutcome>>(iter: I) -> Self {
        iter.into_iter().fold(BatchOutcome::default(), BatchOutcome::record)
    }
}

/// Sorts catalog jobs newest first and groups them by source. With `capped`
/// each section is cut to its listing limit.
///
/// The sort is stable, so jobs sharing a timestamp keep the store's order.
pub fn partition_jobs<I>(jobs: I, capped: bool) -> JobSections
where
    I: IntoIterator<Item = ListedJob>,
{
    let mut jobs: Vec<ListedJob> = jobs.into_iter().collect();
    jobs.sort_by(|a, b| b.recommended_at.cmp(&a.recommended_at));

    let mut sections = JobSections::default();
    for job in jobs {
        sections.push(job);
    }
    if capped {
        sections.truncate_to_caps();
    }
    sections
}

pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    async fn catalog_with_applied(
        &self,
        user_id: i64,
    ) -> Result<(Vec<RecommendedJob>, HashSet<String>), JobServiceError> {
        let catalog = self.store.recommended_jobs().await?;
        let applied: HashSet<String> = self
            .store
            .applied_job_ids(user_id)
            .await?
            .into_iter()
            .collect();
        Ok((catalog, applied))
    }

    /// Every catalog job with the user's applied flag, capped per section.
    pub async fn list_jobs(&self, user_id: i64) -> Result<JobSections, JobServiceError> {
        let (catalog, applied) = self.catalog_with_applied(user_id).await?;

        let listed = catalog.into_iter().map(|job| {
            let is_applied = applied.contains(&job.job_id);
            ListedJob::new(job, is_applied)
        });

        Ok(partition_jobs(listed, true))
    }

    /// Catalog jobs the user has not applied to, without section caps.
    pub async fn list_recommended(&self, user_id: i64) -> Result<JobSections, JobServiceError> {
        let (catalog, applied) = self.catalog_with_applied(user_id).await?;

        let listed = catalog
            .into_iter()
            .filter(|job| !applied.contains(&job.job_id))
            .map(|job| ListedJob::new(job, false));

        Ok(partition_jobs(listed, false))
    }

    /// Records the application. Returns `false` when the user had already
    /// applied to this job id. The id is not checked against the catalog.
    pub async fn apply(
        &self,
        user_id: i64,
        job_id: &str,
        job_data: &Value,
    ) -> Result<bool, JobServiceError> {
        let was_new = self
            .store
            .mark_job_applied(job_id, job_data, user_id, Utc::now())
            .await?;
        tracing::debug!(user_id, job_id, was_new, "apply");
        Ok(was_new)
    }

    pub async fn applied_jobs(&self, user_id: i64) -> Result<Vec<AppliedJob>, JobServiceError> {
        Ok(self.store.applied_jobs(user_id).await?)
    }

    /// Adds a job to the shared catalog unless the id is already present.
    pub async fn recommend(&self, job_id: &str, job_data: &Value) -> Result<bool, JobServiceError> {
        Ok(self
            .store
            .add_recommended_job(job_id, job_data, Utc::now())
            .await?)
    }

    async fn recommend_entry(&self, entry: RecommendEntry) -> Result<EntryOutcome, JobServiceError> {
        let Some((job_id, job_data)) = entry.into_parts() else {
            return Ok(EntryOutcome::Malformed);
        };
        if self.recommend(&job_id, &job_data).await? {
            Ok(EntryOutcome::Added)
        } else {
            Ok(EntryOutcome::Duplicate)
        }
    }

    /// Inserts entries one after another. Malformed entries and ids already
    /// in the catalog count as skipped; a storage failure stops the batch.
    pub async fn recommend_batch(
        &self,
        entries: Vec<RecommendEntry>,
    ) -> Result<BatchOutcome, JobServiceError> {
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            outcomes.push(self.recommend_entry(entry).await?);
        }

        let outcome: BatchOutcome = outcomes.into_iter().collect();
        tracing::info!(
            processed = outcome.processed,
            added = outcome.added,
            skipped = outcome.skipped,
            "bulk recommend finished"
        );
        Ok(outcome)
    }
}
