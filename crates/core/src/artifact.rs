use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of generated engineering artifact, keyed per tracker ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    /// Low-level design document
    Design,
    /// Implementation code
    Code,
    /// Automated tests
    Tests,
    /// Manual test cases
    TestCases,
}

impl ArtifactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Code => "code",
            Self::Tests => "tests",
            Self::TestCases => "test_cases",
        }
    }

    /// Canonical storage column for this artifact's content.
    ///
    /// One scheme, everywhere: `<type>_content`. Historical call sites used
    /// three different spellings for the test-cases column; this is the fix.
    pub fn content_column(&self) -> &'static str {
        match self {
            Self::Design => "design_content",
            Self::Code => "code_content",
            Self::Tests => "tests_content",
            Self::TestCases => "test_cases_content",
        }
    }

    /// Artifacts whose existing content should be fed into the prompt when
    /// generating this one (design feeds code, code feeds tests).
    pub fn upstream(&self) -> &'static [ArtifactType] {
        match self {
            Self::Design => &[],
            Self::Code => &[Self::Design],
            Self::Tests => &[Self::Design, Self::Code],
            Self::TestCases => &[Self::Design],
        }
    }
}

impl std::str::FromStr for ArtifactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "design" => Ok(Self::Design),
            "code" => Ok(Self::Code),
            "tests" => Ok(Self::Tests),
            "test_cases" | "testcases" | "test-cases" => Ok(Self::TestCases),
            other => Err(format!("unknown artifact type: {other}")),
        }
    }
}

/// Generated content for one tracker ticket, one row per ticket.
///
/// Created on first generation, updated in place on regeneration. The ticket
/// key is a loose reference to the tracker; there is no foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryArtifact {
    pub ticket_key: String,
    pub design_content: Option<String>,
    pub code_content: Option<String>,
    pub tests_content: Option<String>,
    pub test_cases_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoryArtifact {
    /// An empty artifact row for a ticket, before any generation.
    pub fn empty(ticket_key: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            ticket_key: ticket_key.into(),
            design_content: None,
            code_content: None,
            tests_content: None,
            test_cases_content: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn content_for(&self, artifact_type: ArtifactType) -> Option<&str> {
        match artifact_type {
            ArtifactType::Design => self.design_content.as_deref(),
            ArtifactType::Code => self.code_content.as_deref(),
            ArtifactType::Tests => self.tests_content.as_deref(),
            ArtifactType::TestCases => self.test_cases_content.as_deref(),
        }
    }

    pub fn set_content(&mut self, artifact_type: ArtifactType, content: String) {
        let slot = match artifact_type {
            ArtifactType::Design => &mut self.design_content,
            ArtifactType::Code => &mut self.code_content,
            ArtifactType::Tests => &mut self.tests_content,
            ArtifactType::TestCases => &mut self.test_cases_content,
        };
        *slot = Some(content);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_type_parses_legacy_spellings() {
        assert_eq!("testcases".parse::<ArtifactType>().unwrap(), ArtifactType::TestCases);
        assert_eq!("test-cases".parse::<ArtifactType>().unwrap(), ArtifactType::TestCases);
        assert_eq!("test_cases".parse::<ArtifactType>().unwrap(), ArtifactType::TestCases);
    }

    #[test]
    fn unknown_artifact_type_is_rejected() {
        assert!("diagram".parse::<ArtifactType>().is_err());
    }

    #[test]
    fn content_slots_are_independent() {
        let mut artifact = StoryArtifact::empty("PROJ-1");
        artifact.set_content(ArtifactType::Code, "fn main() {}".to_owned());
        assert_eq!(artifact.content_for(ArtifactType::Code), Some("fn main() {}"));
        assert_eq!(artifact.content_for(ArtifactType::Tests), None);
    }

    #[test]
    fn tests_generation_pulls_design_and_code_upstream() {
        assert_eq!(ArtifactType::Tests.upstream(), &[ArtifactType::Design, ArtifactType::Code]);
        assert!(ArtifactType::Design.upstream().is_empty());
    }
}
