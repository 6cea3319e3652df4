use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Processing status of an uploaded document.
///
/// `PartialFailure` is a distinct terminal state: some chunks were embedded
/// and stored, some were not. It is never reported as `Completed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Uploaded, not yet chunked
    Pending,
    /// Chunking/embedding in progress
    Processing,
    /// Every chunk embedded and stored
    Completed,
    /// Some chunks stored, some failed
    PartialFailure,
    /// No chunks could be stored
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::PartialFailure => "partial_failure",
            Self::Failed => "failed",
        }
    }

    /// Whether processing has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::PartialFailure | Self::Failed)
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "partial_failure" => Ok(Self::PartialFailure),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// Uploaded document content, resolved once at ingestion.
///
/// Upstream sources deliver either raw text or a pre-parsed entity model.
/// The variant is fixed when the document is created and never re-sniffed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DocumentContent {
    /// Plain extracted text
    Raw(String),
    /// Structured entity model (e.g. a parsed data-model JSON)
    Structured(serde_json::Value),
}

impl DocumentContent {
    /// Render the content as text for chunking.
    ///
    /// A structured data model renders as entity/field/relation lines with
    /// normalized cardinality; any other structured value is pretty-printed so
    /// names and fields land on their own lines and survive paragraph-aware
    /// chunking.
    pub fn as_text(&self) -> String {
        match self {
            Self::Raw(text) => text.clone(),
            Self::Structured(value) => render_data_model(value).unwrap_or_else(|| {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }),
        }
    }

    /// Whether there is any text to chunk at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Raw(text) => text.trim().is_empty(),
            Self::Structured(value) => value.is_null(),
        }
    }
}

/// Render an entity-model JSON value as readable text, one line per entity,
/// field, and relation. Returns `None` when the value is not an entity model.
fn render_data_model(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    let entities = value.get("entities")?.as_array()?;
    let mut out = String::new();
    for entity in entities {
        let Some(name) = entity.get("name").and_then(Value::as_str) else { continue };
        out.push_str(&format!("Entity: {name}\n"));
        if let Some(fields) = entity.get("fields").and_then(Value::as_array) {
            for field in fields {
                if let Some(field_name) = field.as_str() {
                    out.push_str(&format!("  field: {field_name}\n"));
                } else if let Some(field_name) = field.get("name").and_then(Value::as_str) {
                    let field_type = field.get("type").and_then(Value::as_str).unwrap_or("text");
                    out.push_str(&format!("  field: {field_name} ({field_type})\n"));
                }
            }
        }
        if let Some(relations) = entity.get("relationships").and_then(Value::as_array) {
            for relation in relations {
                let Some(target) = relation.get("target").and_then(Value::as_str) else {
                    continue;
                };
                let label = relation.get("label").and_then(Value::as_str).unwrap_or("");
                let cardinality = crate::heuristics::cardinality_from_label(label);
                out.push_str(&format!(
                    "  relation: {name} {} {target}\n",
                    cardinality.as_str()
                ));
            }
        }
        out.push('\n');
    }
    if out.is_empty() { None } else { Some(out.trim_end().to_owned()) }
}

/// A document owned by a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: Uuid,
    /// Owning project
    pub project_id: Uuid,
    /// Display title
    pub title: String,
    /// Original file name
    pub file_name: String,
    /// Where the file came from (object storage URL or external link)
    pub source_url: Option<String>,
    /// MIME type as reported at upload
    pub mime_type: Option<String>,
    /// Size of the original upload in bytes
    pub size_bytes: i64,
    /// Chunking/embedding lifecycle status
    pub status: DocumentStatus,
    /// When this document was uploaded
    pub created_at: DateTime<Utc>,
    /// Last status transition
    pub updated_at: DateTime<Utc>,
}

/// A bounded segment of a document's text.
///
/// The embedding vector is stored alongside the chunk in the database but is
/// not carried on the domain type; similarity scores come back on
/// [`ScoredChunk`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    /// Owning document
    pub document_id: Uuid,
    /// Denormalized project reference for scope filtering
    pub project_id: Uuid,
    /// Zero-based position within the document; contiguous per document
    pub chunk_index: i32,
    /// Chunk text
    pub text: String,
    /// Optional provenance metadata (section heading, page, ...)
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A retrieved chunk with its similarity score and source attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub document_id: Uuid,
    /// Title of the source document, for citation
    pub document_name: String,
    pub chunk_index: i32,
    pub text: String,
    /// Cosine similarity in `[0, 1]`; `0.0` for fallback-scan results
    pub similarity: f32,
}
