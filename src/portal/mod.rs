pub mod endpoints;
pub mod fetcher;
pub mod payload;
pub mod resolver;

pub use endpoints::Endpoints;
pub use fetcher::{fetch_with_retry, HttpFetcher, PageFetcher, RetryPolicy};
pub use payload::{ParsedPayload, ResultEntryPayload, StudentInfoPayload};
pub use resolver::Resolver;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::PortalConfig;
    use crate::error::FetchError;
    use crate::portal::{Endpoints, PageFetcher};

    #[derive(Debug, Clone)]
    pub(crate) enum Scripted {
        Body(String),
        NoResponse,
        Status(u16),
        Panic,
    }

    impl Scripted {
        pub(crate) fn body(body: &str) -> Self {
            Self::Body(body.to_string())
        }
    }

    /// In-memory portal keyed by URL. Unknown URLs give no response.
    pub(crate) struct ScriptedFetcher {
        endpoints: Endpoints,
        routes: HashMap<String, Scripted>,
        latency: Duration,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl Default for ScriptedFetcher {
        fn default() -> Self {
            Self {
                endpoints: Endpoints::new(&PortalConfig::default())
                    .expect("default portal base url"),
                routes: HashMap::new(),
                latency: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }
    }

    impl ScriptedFetcher {
        pub(crate) fn info(mut self, student_id: &str, reply: Scripted) -> Self {
            let url = self.endpoints.student_info(student_id).to_string();
            self.routes.insert(url, reply);
            self
        }

        pub(crate) fn result(mut self, semester_id: &str, student_id: &str, reply: Scripted) -> Self {
            let url = self
                .endpoints
                .student_result(semester_id, student_id)
                .to_string();
            self.routes.insert(url, reply);
            self
        }

        pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls mutex poisoned").clone()
        }

        pub(crate) fn peak_in_flight(&self) -> usize {
            self.peak_in_flight.load(Ordering::SeqCst)
        }

        pub(crate) fn info_url(&self, student_id: &str) -> String {
            self.endpoints.student_info(student_id).to_string()
        }

        pub(crate) fn result_url(&self, semester_id: &str, student_id: &str) -> String {
            self.endpoints
                .student_result(semester_id, student_id)
                .to_string()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
            self.calls
                .lock()
                .expect("calls mutex poisoned")
                .push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.routes.get(url) {
                Some(Scripted::Body(body)) => Ok(Some(body.clone())),
                Some(Scripted::Status(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
                Some(Scripted::Panic) => panic!("scripted panic for {url}"),
                Some(Scripted::NoResponse) | None => Ok(None),
            }
        }
    }
}
