use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An entry of the shared recommendation catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedJob {
    pub job_id: String,
    pub job_data: Value,
    pub recommended_at: DateTime<Utc>,
}

/// A job a user marked as applied. `job_data` is a copy taken at apply time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJob {
    pub job_id: String,
    pub job_data: Value,
    pub applied_at: DateTime<Utc>,
}

/// An applied job together with the username that owns it, used when
/// copying data between stores where numeric user ids differ.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedJobExport {
    pub username: String,
    pub job: AppliedJob,
}

/// The three fixed listing sections, keyed by the payload's `source` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobSource {
    LocalCharleston,
    RemoteOther,
    SideGigs,
}

impl JobSource {
    pub const ALL: [JobSource; 3] = [
        JobSource::LocalCharleston,
        JobSource::RemoteOther,
        JobSource::SideGigs,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "local_charleston" => Some(JobSource::LocalCharleston),
            "remote_other" => Some(JobSource::RemoteOther),
            "side_gigs" => Some(JobSource::SideGigs),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JobSource::LocalCharleston => "local_charleston",
            JobSource::RemoteOther => "remote_other",
            JobSource::SideGigs => "side_gigs",
        }
    }

    /// Maximum number of entries `GET /api/jobs` returns for this section.
    pub fn cap(self) -> usize {
        match self {
            JobSource::LocalCharleston | JobSource::RemoteOther => 10,
            JobSource::SideGigs => 5,
        }
    }
}

/// A catalog job as rendered in listings: the payload fields, flattened,
/// plus `id`, `isApplied` and `recommendedAt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedJob {
    pub id: String,
    pub is_applied: bool,
    pub recommended_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ListedJob {
    pub fn new(job: RecommendedJob, is_applied: bool) -> Self {
        let mut data = match job.job_data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        // The listing fields win over payload fields of the same name.
        for key in ["id", "isApplied", "recommendedAt"] {
            data.remove(key);
        }

        Self {
            id: job.job_id,
            is_applied,
            recommended_at: job.recommended_at,
            data,
        }
    }

    pub fn source(&self) -> Option<JobSource> {
        self.data
            .get("source")
            .and_then(Value::as_str)
            .and_then(JobSource::from_label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobSections {
    pub local_charleston: Vec<ListedJob>,
    pub remote_other: Vec<ListedJob>,
    pub side_gigs: Vec<ListedJob>,
}

impl JobSections {
    fn section_mut(&mut self, source: JobSource) -> &mut Vec<ListedJob> {
        match source {
            JobSource::LocalCharleston => &mut self.local_charleston,
            JobSource::RemoteOther => &mut self.remote_other,
            JobSource::SideGigs => &mut self.side_gigs,
        }
    }

    /// Appends the job to its section. Jobs without a known source are dropped.
    pub fn push(&mut self, job: ListedJob) {
        if let Some(source) = job.source() {
            self.section_mut(source).push(job);
        }
    }

    pub fn truncate_to_caps(&mut self) {
        for source in JobSource::ALL {
            self.section_mut(source).truncate(source.cap());
        }
    }
}

/// One element of a bulk recommendation request.
///
/// Fields are kept loose so a malformed entry can be counted as skipped
/// instead of failing the whole request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendEntry {
    #[serde(default)]
    pub job_id: Option<Value>,
    #[serde(default)]
    pub job_data: Option<Value>,
}

impl RecommendEntry {
    pub fn new(job_id: impl Into<String>, job_data: Value) -> Self {
        Self {
            job_id: Some(Value::String(job_id.into())),
            job_data: Some(job_data),
        }
    }

    /// Returns the id and payload when both are present and usable. The id
    /// must be a non-empty string; a falsy payload counts as missing.
    pub fn into_parts(self) -> Option<(String, Value)> {
        let job_id = match self.job_id? {
            Value::String(id) if !id.is_empty() => id,
            _ => return None,
        };
        let job_data = self.job_data.filter(|data| !is_falsy(data))?;
        Some((job_id, job_data))
    }
}

/// `null`, `false`, zero and the empty string.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recommended(id: &str, data: Value) -> RecommendedJob {
        RecommendedJob {
            job_id: id.to_string(),
            job_data: data,
            recommended_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn listed_job_flattens_payload_and_overrides_reserved_keys() {
        let job = ListedJob::new(
            recommended(
                "https://jobs.example/1",
                json!({"title": "Welder", "id": "stale", "isApplied": true, "source": "side_gigs"}),
            ),
            false,
        );

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["id"], "https://jobs.example/1");
        assert_eq!(value["isApplied"], false);
        assert_eq!(value["title"], "Welder");
        assert!(value.get("recommendedAt").is_some());
        assert_eq!(job.source(), Some(JobSource::SideGigs));
    }

    #[test]
    fn non_object_payload_has_no_source() {
        let job = ListedJob::new(recommended("x", json!("just a string")), false);
        assert!(job.data.is_empty());
        assert_eq!(job.source(), None);
    }

    #[test]
    fn sections_drop_unknown_sources() {
        let mut sections = JobSections::default();
        sections.push(ListedJob::new(
            recommended("a", json!({"source": "moon_base"})),
            false,
        ));
        sections.push(ListedJob::new(recommended("b", json!({})), false));
        sections.push(ListedJob::new(
            recommended("c", json!({"source": "remote_other"})),
            false,
        ));

        assert!(sections.local_charleston.is_empty());
        assert!(sections.side_gigs.is_empty());
        assert_eq!(sections.remote_other.len(), 1);
        assert_eq!(sections.remote_other[0].id, "c");
    }

    #[test]
    fn recommend_entry_rejects_missing_or_empty_fields() {
        assert!(RecommendEntry::new("a", json!({})).into_parts().is_some());
        assert!(RecommendEntry {
            job_id: Some(json!("a")),
            job_data: None,
        }
        .into_parts()
        .is_none());
        assert!(RecommendEntry {
            job_id: Some(json!("")),
            job_data: Some(json!({})),
        }
        .into_parts()
        .is_none());
        assert!(RecommendEntry {
            job_id: Some(json!(42)),
            job_data: Some(json!({})),
        }
        .into_parts()
        .is_none());
        for falsy in [Value::Null, json!(false), json!(0), json!(""), json!(0.0)] {
            assert!(RecommendEntry {
                job_id: Some(json!("a")),
                job_data: Some(falsy),
            }
            .into_parts()
            .is_none());
        }
        // Empty containers are truthy
        assert!(RecommendEntry::new("a", json!([])).into_parts().is_some());
        assert!(RecommendEntry::new("a", json!("title")).into_parts().is_some());
    }

    #[test]
    fn caps_match_section_limits() {
        assert_eq!(JobSource::LocalCharleston.cap(), 10);
        assert_eq!(JobSource::RemoteOther.cap(), 10);
        assert_eq!(JobSource::SideGigs.cap(), 5);
        for source in JobSource::ALL {
            assert_eq!(JobSource::from_label(source.label()), Some(source));
        }
    }
}
