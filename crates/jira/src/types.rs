use serde::{Deserialize, Serialize};

/// A Jira project, as listed by `/rest/api/2/project`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraProject {
    pub id: String,
    pub key: String,
    pub name: String,
}

/// A sprint on an agile board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraSprint {
    pub id: i64,
    pub name: String,
    /// `active`, `closed`, or `future`
    pub state: String,
}

/// A ticket as surfaced to generation: flattened from the Jira issue shape.
///
/// Read-mostly; never written back to Jira from this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTicket {
    pub key: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub issue_type: String,
    pub priority: Option<String>,
    /// Custom-field acceptance criteria, when the instance exposes one
    pub acceptance_criteria: Option<String>,
}

// Wire shapes below mirror Jira's nested `fields` envelope; they are flattened
// into the public types above at the client boundary.

#[derive(Deserialize)]
pub(crate) struct SprintListResponse {
    pub values: Vec<JiraSprint>,
}

#[derive(Deserialize)]
pub(crate) struct IssueSearchResponse {
    pub issues: Vec<RawIssue>,
}

#[derive(Deserialize)]
pub(crate) struct RawIssue {
    pub key: String,
    pub fields: RawIssueFields,
}

#[derive(Deserialize)]
pub(crate) struct RawIssueFields {
    pub summary: String,
    pub description: Option<String>,
    pub status: NamedField,
    #[serde(rename = "issuetype")]
    pub issue_type: NamedField,
    pub priority: Option<NamedField>,
    /// The most common acceptance-criteria custom field id.
    #[serde(rename = "customfield_10016")]
    pub acceptance_criteria: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct NamedField {
    pub name: String,
}

impl From<RawIssue> for JiraTicket {
    fn from(issue: RawIssue) -> Self {
        Self {
            key: issue.key,
            summary: issue.fields.summary,
            description: issue.fields.description.unwrap_or_default(),
            status: issue.fields.status.name,
            issue_type: issue.fields.issue_type.name,
            priority: issue.fields.priority.map(|p| p.name),
            acceptance_criteria: issue.fields.acceptance_criteria,
        }
    }
}
