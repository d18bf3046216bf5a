use crate::repositories::{JobStore, RepositoryResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableReport {
    pub migrated: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub recommended: TableReport,
    pub applied: TableReport,
    /// Applied rows whose owner has no account with the same username in
    /// the target store.
    pub unmapped_applied: Vec<(String, String)>,
}

/// Copies the catalog and every applied job from `source` into `target`.
///
/// Timestamps are preserved. Rows already present in the target are
/// skipped. Applied jobs are matched to target users by username since
/// numeric ids differ between stores.
pub async fn copy_store(
    source: &dyn JobStore,
    target: &dyn JobStore,
) -> RepositoryResult<MigrationReport> {
    let mut report = MigrationReport::default();

    for job in source.recommended_jobs().await? {
        if target
            .add_recommended_job(&job.job_id, &job.job_data, job.recommended_at)
            .await?
        {
            report.recommended.migrated += 1;
        } else {
            report.recommended.skipped += 1;
        }
    }

    let mut target_ids: HashMap<String, Option<i64>> = HashMap::new();
    for export in source.export_applied_jobs().await? {
        let target_id = match target_ids.get(&export.username) {
            Some(id) => *id,
            None => {
                let id = target
                    .find_user_by_username(&export.username)
                    .await?
                    .map(|user| user.id);
                target_ids.insert(export.username.clone(), id);
                id
            }
        };

        let Some(user_id) = target_id else {
            tracing::warn!(
                "No user '{}' in target, skipping applied job {}",
                export.username,
                export.job.job_id
            );
            report
                .unmapped_applied
                .push((export.username, export.job.job_id));
            continue;
        };

        let job = export.job;
        if target
            .mark_job_applied(&job.job_id, &job.job_data, user_id, job.applied_at)
            .await?
        {
            report.applied.migrated += 1;
        } else {
            report.applied.skipped += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_store, test_helpers};
    use serde_json::json;

    #[tokio::test]
    async fn copies_catalog_and_applied_jobs_once() {
        let source = create_test_store().await;
        let target = create_test_store().await;

        test_helpers::insert_catalog_job(&source, "a", "remote_other", test_helpers::at(1))
            .await
            .unwrap();
        test_helpers::insert_catalog_job(&source, "b", "side_gigs", test_helpers::at(2))
            .await
            .unwrap();
        test_helpers::insert_catalog_job(&target, "b", "side_gigs", test_helpers::at(9))
            .await
            .unwrap();

        let guest = test_helpers::user_id(&source, "guest").await;
        source
            .mark_job_applied("a", &json!({"title": "A"}), guest, test_helpers::at(5))
            .await
            .unwrap();

        let report = copy_store(&source, &target).await.unwrap();
        assert_eq!(report.recommended, TableReport { migrated: 1, skipped: 1 });
        assert_eq!(report.applied, TableReport { migrated: 1, skipped: 0 });
        assert!(report.unmapped_applied.is_empty());

        let target_guest = test_helpers::user_id(&target, "guest").await;
        let applied = target.applied_jobs(target_guest).await.unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].applied_at, test_helpers::at(5));

        let catalog = target.recommended_jobs().await.unwrap();
        let a = catalog.iter().find(|j| j.job_id == "a").unwrap();
        assert_eq!(a.recommended_at, test_helpers::at(1));

        // second run changes nothing
        let again = copy_store(&source, &target).await.unwrap();
        assert_eq!(again.recommended.migrated, 0);
        assert_eq!(again.applied, TableReport { migrated: 0, skipped: 1 });
    }
}
