//! Conversion of a sectioned job export into catalog entries.
//!
//! The export groups scraped jobs by section:
//!
//! ```json
//! { "local_charleston": [{"url": "...", "title": "..."}], "remote_other": [], "side_gigs": [] }
//! ```
//!
//! Each job's `url` becomes its catalog id and the section name is written
//! into the payload as `source`.

use crate::models::{JobSource, RecommendEntry};
use serde_json::Value;

pub fn entries_from_sections(export: &Value) -> Vec<RecommendEntry> {
    let mut entries = Vec::new();

    for source in JobSource::ALL {
        let Some(jobs) = export.get(source.label()).and_then(Value::as_array) else {
            continue;
        };

        for job in jobs {
            let (Some(url), Some(fields)) = (job.get("url").and_then(Value::as_str), job.as_object())
            else {
                continue;
            };

            let mut data = fields.clone();
            data.insert("source".to_string(), Value::String(source.label().to_string()));
            entries.push(RecommendEntry::new(url, Value::Object(data)));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_jobs_with_their_section() {
        let export = json!({
            "local_charleston": [
                {"url": "https://jobs.example/dock", "title": "Dock Hand", "source": "stale"}
            ],
            "side_gigs": [
                {"url": "https://jobs.example/tutor", "title": "Tutor"},
                {"title": "No link"}
            ],
            "mystery": [{"url": "https://jobs.example/ghost"}]
        });

        let entries = entries_from_sections(&export);
        assert_eq!(entries.len(), 2);

        let (id, data) = entries[0].clone().into_parts().unwrap();
        assert_eq!(id, "https://jobs.example/dock");
        assert_eq!(data["source"], "local_charleston");
        assert_eq!(data["title"], "Dock Hand");

        let (id, data) = entries[1].clone().into_parts().unwrap();
        assert_eq!(id, "https://jobs.example/tutor");
        assert_eq!(data["source"], "side_gigs");
    }

    #[test]
    fn ignores_non_object_exports() {
        assert!(entries_from_sections(&json!([1, 2, 3])).is_empty());
        assert!(entries_from_sections(&json!({"remote_other": "nope"})).is_empty());
    }
}
