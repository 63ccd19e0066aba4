use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::portal::endpoints::Endpoints;
use crate::portal::fetcher::PageFetcher;
use crate::portal::payload::{parse_first_result, parse_student_info, ParsedPayload};
use crate::types::{StudentInfo, StudentRecord};

/// Turns portal responses into student data. Per-student failures come back
/// as absent fields; only a fatal fetch error is returned as `Err`.
#[derive(Clone)]
pub struct Resolver {
    fetcher: Arc<dyn PageFetcher>,
    endpoints: Endpoints,
}

impl Resolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    pub async fn resolve_info(&self, student_id: &str) -> Result<StudentInfo, FetchError> {
        let info = StudentInfo::new(student_id);
        let url = self.endpoints.student_info(student_id);

        let Some(body) = self.fetcher.fetch(url.as_str()).await? else {
            warn!(student_id, "failed to fetch student info");
            return Ok(info);
        };

        match parse_student_info(&body) {
            ParsedPayload::Parsed(payload) => {
                if payload.student_name.is_none() {
                    debug!(student_id, "student info carries no name");
                }
                Ok(info.with_name(payload.student_name))
            }
            ParsedPayload::Malformed(reason) => {
                warn!(student_id, "failed to parse student info response: {reason}");
                Ok(info)
            }
        }
    }

    pub async fn resolve_result(
        &self,
        info: StudentInfo,
        semester_id: &str,
    ) -> Result<StudentRecord, FetchError> {
        let url = self.endpoints.student_result(semester_id, &info.id);
        let record = StudentRecord::new(info);
        let name = record.name.as_deref().unwrap_or("-");
        let student_id = record.id.as_str();

        let Some(body) = self.fetcher.fetch(url.as_str()).await? else {
            warn!(student_id, semester_id, "failed to fetch result for {name}");
            return Ok(record);
        };

        let cgpa = match parse_first_result(&body) {
            ParsedPayload::Parsed(Some(first)) => first.cgpa,
            ParsedPayload::Parsed(None) => {
                warn!(student_id, semester_id, "no result found for {name}");
                None
            }
            ParsedPayload::Malformed(reason) => {
                warn!(
                    student_id,
                    semester_id, "failed to parse result response for {name}: {reason}"
                );
                None
            }
        };
        Ok(record.with_cgpa(cgpa))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Resolver;
    use crate::config::PortalConfig;
    use crate::error::FetchError;
    use crate::portal::endpoints::Endpoints;
    use crate::portal::testing::{Scripted, ScriptedFetcher};
    use crate::types::StudentInfo;

    fn resolver(fetcher: ScriptedFetcher) -> (Resolver, Arc<ScriptedFetcher>) {
        let fetcher = Arc::new(fetcher);
        let endpoints = Endpoints::new(&PortalConfig::default()).expect("default base");
        (Resolver::new(fetcher.clone(), endpoints), fetcher)
    }

    #[tokio::test]
    async fn info_carries_name_when_present() {
        let (resolver, fetcher) = resolver(
            ScriptedFetcher::default().info("A", Scripted::body(r#"{"studentName":"Alice"}"#)),
        );
        let info = resolver.resolve_info("A").await.expect("no abort");
        assert_eq!(info, StudentInfo::new("A").with_name(Some("Alice".to_string())));
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn info_is_nameless_on_no_response_or_bad_body() {
        let (resolver, _) = resolver(
            ScriptedFetcher::default()
                .info("A", Scripted::NoResponse)
                .info("B", Scripted::body("<html>busy</html>"))
                .info("C", Scripted::body(r#"{"batch":"57"}"#)),
        );
        for id in ["A", "B", "C"] {
            let info = resolver.resolve_info(id).await.expect("no abort");
            assert_eq!(info, StudentInfo::new(id), "id {id}");
        }
    }

    #[tokio::test]
    async fn result_takes_first_entry_cgpa() {
        let (resolver, _) = resolver(ScriptedFetcher::default().result(
            "241",
            "A",
            Scripted::body(r#"[{"cgpa":3.9},{"cgpa":2.1}]"#),
        ));
        let info = StudentInfo::new("A").with_name(Some("Alice".to_string()));
        let record = resolver.resolve_result(info, "241").await.expect("no abort");
        assert_eq!(record.cgpa, Some(3.9));
        assert_eq!(record.name.as_deref(), Some("Alice"));
        assert_eq!(record.id, "A");
    }

    #[tokio::test]
    async fn result_ignores_odd_entries_after_the_first() {
        let (resolver, _) = resolver(
            ScriptedFetcher::default()
                .result("241", "A", Scripted::body(r#"[{"cgpa":3.5},null]"#))
                .result("241", "B", Scripted::body(r#"[{"cgpa":3.5},"x"]"#)),
        );
        for id in ["A", "B"] {
            let info = StudentInfo::new(id).with_name(Some(format!("Student {id}")));
            let record = resolver.resolve_result(info, "241").await.expect("no abort");
            assert_eq!(record.cgpa, Some(3.5), "id {id}");
        }
    }

    #[tokio::test]
    async fn result_is_absent_on_empty_bad_or_missing_body() {
        let (resolver, _) = resolver(
            ScriptedFetcher::default()
                .result("241", "A", Scripted::body("[]"))
                .result("241", "B", Scripted::body("not json"))
                .result("241", "C", Scripted::NoResponse)
                .result("241", "D", Scripted::body(r#"[{"sgpa":3.0}]"#)),
        );
        for id in ["A", "B", "C", "D"] {
            let info = StudentInfo::new(id).with_name(Some(format!("Student {id}")));
            let record = resolver.resolve_result(info, "241").await.expect("no abort");
            assert_eq!(record.cgpa, None, "id {id}");
        }
    }

    #[tokio::test]
    async fn fatal_fetch_error_propagates() {
        let (resolver, _) = resolver(ScriptedFetcher::default().info("A", Scripted::Status(500)));
        let err = resolver.resolve_info("A").await.expect_err("abort");
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }
}
