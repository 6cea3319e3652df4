//! Prompt builders for the document assistant and artifact generation.
//!
//! All prompt text lives here, not in handlers, so the grounding rules
//! (cite by document name, admit absence) are applied uniformly.

use cardy_core::ArtifactType;

use crate::ai_types::Message;

/// System prompt for document-grounded chat.
///
/// The model must attribute statements to source documents and must say so
/// explicitly when the answer is not in the provided context.
const CHAT_SYSTEM_PROMPT: &str = "You are Cardy Mind, an assistant that answers questions \
about a team's project documents.\n\
Rules:\n\
- Answer ONLY from the provided document context.\n\
- Cite sources by document name, e.g. (source: requirements.docx).\n\
- If the context does not contain the requested information, say so explicitly. \
Never invent facts that are not in the context.";

/// Messages for a RAG chat turn: system prompt, prior conversation, then the
/// context block and question as the final user message.
pub fn chat_messages(
    context_block: Option<&str>,
    history: &[Message],
    question: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(CHAT_SYSTEM_PROMPT));
    messages.extend(history.iter().cloned());
    let user = match context_block {
        Some(block) if !block.is_empty() => {
            format!("Document context:\n\n{block}\n\nQuestion: {question}")
        },
        _ => format!(
            "No document context is available for this question.\n\nQuestion: {question}"
        ),
    };
    messages.push(Message::user(user));
    messages
}

/// Ticket fields fed into artifact generation.
#[derive(Debug, Clone)]
pub struct TicketFields {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: Option<String>,
    pub acceptance_criteria: Option<String>,
}

fn artifact_instruction(artifact_type: ArtifactType) -> &'static str {
    match artifact_type {
        ArtifactType::Design => {
            "Produce a low-level design document for this ticket: data model changes, \
             API surface, component interactions, and edge cases. Use markdown headings."
        },
        ArtifactType::Code => {
            "Produce production-quality implementation code for this ticket. Follow the \
             design if one is provided. Output code blocks with language annotations."
        },
        ArtifactType::Tests => {
            "Produce automated tests for this ticket's implementation. Cover the edge \
             cases named in the design and acceptance criteria."
        },
        ArtifactType::TestCases => {
            "Produce manual test cases for this ticket as a numbered list: preconditions, \
             steps, expected result."
        },
    }
}

/// Messages for generating one artifact for one ticket.
///
/// `upstream` carries previously generated artifacts that should inform this
/// one (design feeds code, code feeds tests); `context_block` is the optional
/// project document context.
pub fn artifact_messages(
    ticket: &TicketFields,
    artifact_type: ArtifactType,
    context_block: Option<&str>,
    upstream: &[(ArtifactType, String)],
) -> Vec<Message> {
    let system = format!(
        "You are a senior engineer generating a {} artifact for a tracker ticket. \
         Ground your output in the ticket fields and any provided project context. \
         Do not invent requirements that are not stated.",
        artifact_type.as_str(),
    );

    let mut body = String::new();
    body.push_str(&format!("Ticket {}: {}\n\n", ticket.key, ticket.summary));
    if let Some(issue_type) = &ticket.issue_type {
        body.push_str(&format!("Type: {issue_type}\n\n"));
    }
    body.push_str(&format!("Description:\n{}\n", ticket.description));
    if let Some(criteria) = &ticket.acceptance_criteria {
        body.push_str(&format!("\nAcceptance criteria:\n{criteria}\n"));
    }
    if let Some(block) = context_block {
        if !block.is_empty() {
            body.push_str(&format!("\nProject document context:\n\n{block}\n"));
        }
    }
    for (upstream_type, content) in upstream {
        body.push_str(&format!(
            "\nExisting {} artifact for this ticket:\n\n{content}\n",
            upstream_type.as_str(),
        ));
    }
    body.push_str(&format!("\n{}", artifact_instruction(artifact_type)));

    vec![Message::system(system), Message::user(body)]
}
