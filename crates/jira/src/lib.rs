//! Read-only Jira client.
//!
//! Fetches the project list, sprints for a board, and tickets in a sprint.
//! Tickets are owned by Jira, not this system; nothing is written back.

mod error;
mod types;

use serde_json::Value;

pub use error::JiraError;
pub use types::{JiraProject, JiraSprint, JiraTicket};

use types::{IssueSearchResponse, SprintListResponse};

/// Client for Jira Cloud REST + Agile APIs with basic auth.
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"***")
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Creates a new Jira client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: String, email: String, api_token: String) -> Result<Self, JiraError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| JiraError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url, email, api_token })
    }

    async fn get_json(&self, path: &str, context: &str) -> Result<Value, JiraError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(JiraError::HttpStatus { code: status.as_u16(), body });
        }
        serde_json::from_str(&body)
            .map_err(|e| JiraError::JsonParse { context: context.to_owned(), source: e })
    }

    /// List all projects visible to the authenticated user.
    pub async fn list_projects(&self) -> Result<Vec<JiraProject>, JiraError> {
        let value = self.get_json("/rest/api/2/project", "project list").await?;
        serde_json::from_value(value)
            .map_err(|e| JiraError::JsonParse { context: "project list".to_owned(), source: e })
    }

    /// List sprints on an agile board.
    pub async fn list_sprints(&self, board_id: i64) -> Result<Vec<JiraSprint>, JiraError> {
        let value = self
            .get_json(&format!("/rest/agile/1.0/board/{board_id}/sprint"), "sprint list")
            .await?;
        let parsed: SprintListResponse = serde_json::from_value(value)
            .map_err(|e| JiraError::JsonParse { context: "sprint list".to_owned(), source: e })?;
        Ok(parsed.values)
    }

    /// List tickets in a sprint, flattened to [`JiraTicket`].
    pub async fn sprint_tickets(&self, sprint_id: i64) -> Result<Vec<JiraTicket>, JiraError> {
        let value = self
            .get_json(&format!("/rest/agile/1.0/sprint/{sprint_id}/issue"), "sprint issues")
            .await?;
        let parsed: IssueSearchResponse = serde_json::from_value(value)
            .map_err(|e| JiraError::JsonParse { context: "sprint issues".to_owned(), source: e })?;
        Ok(parsed.issues.into_iter().map(JiraTicket::from).collect())
    }

    /// Fetch a single ticket by key.
    pub async fn get_ticket(&self, key: &str) -> Result<JiraTicket, JiraError> {
        let value = self.get_json(&format!("/rest/api/2/issue/{key}"), "issue").await?;
        let issue: types::RawIssue = serde_json::from_value(value)
            .map_err(|e| JiraError::JsonParse { context: "issue".to_owned(), source: e })?;
        Ok(issue.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn issue_json(key: &str) -> serde_json::Value {
        serde_json::json!({
            "key": key,
            "fields": {
                "summary": "Add case intake form",
                "description": "As a worker I can record a new case.",
                "status": {"name": "To Do"},
                "issuetype": {"name": "Story"},
                "priority": {"name": "High"},
                "customfield_10016": "Form validates required fields"
            }
        })
    }

    async fn client_for(server: &MockServer) -> JiraClient {
        JiraClient::new(server.uri(), "user@example.com".to_owned(), "token".to_owned()).unwrap()
    }

    #[tokio::test]
    async fn sprint_tickets_flatten_nested_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/agile/1.0/sprint/7/issue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "issues": [issue_json("JIRA-100")]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let tickets = client.sprint_tickets(7).await.unwrap();
        assert_eq!(tickets.len(), 1);
        let ticket = &tickets[0];
        assert_eq!(ticket.key, "JIRA-100");
        assert_eq!(ticket.status, "To Do");
        assert_eq!(ticket.issue_type, "Story");
        assert_eq!(ticket.priority.as_deref(), Some("High"));
        assert_eq!(
            ticket.acceptance_criteria.as_deref(),
            Some("Form validates required fields")
        );
    }

    #[tokio::test]
    async fn missing_description_becomes_empty_string() {
        let server = MockServer::start().await;
        let mut issue = issue_json("JIRA-101");
        issue["fields"]["description"] = serde_json::Value::Null;
        issue["fields"]["priority"] = serde_json::Value::Null;
        issue["fields"]["customfield_10016"] = serde_json::Value::Null;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/JIRA-101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let ticket = client.get_ticket("JIRA-101").await.unwrap();
        assert_eq!(ticket.description, "");
        assert!(ticket.priority.is_none());
    }

    #[tokio::test]
    async fn auth_failure_surfaces_provider_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/project"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Basic auth rejected"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.list_projects().await.unwrap_err();
        match err {
            JiraError::HttpStatus { code, body } => {
                assert_eq!(code, 401);
                assert!(body.contains("Basic auth rejected"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn sprint_list_unwraps_values_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/agile/1.0/board/3/sprint"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [
                    {"id": 11, "name": "Sprint 1", "state": "closed"},
                    {"id": 12, "name": "Sprint 2", "state": "active"}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let sprints = client.list_sprints(3).await.unwrap();
        assert_eq!(sprints.len(), 2);
        assert_eq!(sprints[1].state, "active");
    }
}
