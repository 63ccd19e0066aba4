use anyhow::{ensure, Context, Result};
use reqwest::Url;

use crate::config::PortalConfig;

/// Builds the two portal URLs from a base URL and configured paths.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    info_path: String,
    result_path: String,
}

impl Endpoints {
    pub fn new(portal: &PortalConfig) -> Result<Self> {
        let base = Url::parse(&portal.base_url)
            .with_context(|| format!("invalid portal base url: {}", portal.base_url))?;
        ensure!(
            !base.cannot_be_a_base(),
            "portal base url cannot carry a path: {}",
            portal.base_url
        );
        Ok(Self {
            base,
            info_path: portal.info_path.clone(),
            result_path: portal.result_path.clone(),
        })
    }

    pub fn student_info(&self, student_id: &str) -> Url {
        self.endpoint(&self.info_path, &[("studentId", student_id)])
    }

    pub fn student_result(&self, semester_id: &str, student_id: &str) -> Url {
        self.endpoint(
            &self.result_path,
            &[
                ("grecaptcha", ""),
                ("semesterId", semester_id),
                ("studentId", student_id),
            ],
        )
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut().clear().extend_pairs(query.iter());
        url
    }
}
