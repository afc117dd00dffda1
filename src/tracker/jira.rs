//! Jira-backed ticket tracker over sync HTTP

use crate::config::TrackerConfig;
use crate::tracker::{TicketTracker, TrackerError};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct IssueResponse {
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    issuetype: IssueType,
}

#[derive(Deserialize)]
struct IssueType {
    name: String,
}

/// Looks up issue types through the Jira REST API.
pub struct JiraTracker {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl JiraTracker {
    /// Build a tracker from config. `base_url` is the Jira root, for example
    /// `https://example.atlassian.net`.
    pub fn new(config: &TrackerConfig) -> Option<Self> {
        let base_url = config.base_url.clone()?;
        // Sync HTTP via ureq; non-2xx is handled as a lookup miss, not an
        // agent error
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Some(Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }
}

impl TicketTracker for JiraTracker {
    fn lookup_type(&self, key: &str) -> Result<String, TrackerError> {
        let url = format!(
            "{}/rest/api/2/issue/{}?fields=issuetype",
            self.base_url, key
        );
        let mut request = self.agent.get(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let response = request.call()?;
        let status = response.status();
        if !status.is_success() {
            debug!("jira returned {} for {}", status, key);
            return Err(TrackerError::NotFound {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| TrackerError::Parse(e.to_string()))?;
        let issue: IssueResponse =
            serde_json::from_str(&body).map_err(|e| TrackerError::Parse(e.to_string()))?;
        Ok(issue.fields.issuetype.name)
    }
}
