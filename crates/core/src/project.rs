use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain a project belongs to, used to pick prompt wording for generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    /// Child welfare / social services case management
    ChildWelfare,
    /// Clinical trial management
    ClinicalTrials,
    /// Logistics and supply chain
    Logistics,
    /// E-commerce platforms
    Ecommerce,
    /// Anything else
    General,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildWelfare => "child-welfare",
            Self::ClinicalTrials => "clinical-trials",
            Self::Logistics => "logistics",
            Self::Ecommerce => "ecommerce",
            Self::General => "general",
        }
    }
}

impl std::str::FromStr for ProjectType {
    type Err = ();

    /// Unknown domains map to `General` rather than failing; callers that
    /// need strict validation should match on the input first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "child-welfare" | "child_welfare" => Ok(Self::ChildWelfare),
            "clinical-trials" | "clinical_trials" => Ok(Self::ClinicalTrials),
            "logistics" => Ok(Self::Logistics),
            "ecommerce" | "e-commerce" => Ok(Self::Ecommerce),
            _ => Ok(Self::General),
        }
    }
}

/// A project owning zero or more documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Domain of the project
    pub project_type: ProjectType,
    /// Free-text details
    pub details: Option<String>,
    /// Source control URL
    pub source_url: Option<String>,
    /// Shared drive URL
    pub drive_url: Option<String>,
    /// Issue tracker URL
    pub tracker_url: Option<String>,
    /// When this project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    #[serde(default = "default_project_type")]
    pub project_type: ProjectType,
    pub details: Option<String>,
    pub source_url: Option<String>,
    pub drive_url: Option<String>,
    pub tracker_url: Option<String>,
}

fn default_project_type() -> ProjectType {
    ProjectType::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_type_round_trips_known_values() {
        for t in [
            ProjectType::ChildWelfare,
            ProjectType::ClinicalTrials,
            ProjectType::Logistics,
            ProjectType::Ecommerce,
            ProjectType::General,
        ] {
            assert_eq!(t.as_str().parse::<ProjectType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_project_type_defaults_to_general() {
        assert_eq!("blockchain".parse::<ProjectType>().unwrap(), ProjectType::General);
    }
}
