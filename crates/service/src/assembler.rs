//! Turns retrieved chunks into a prompt-ready context block.
//!
//! Chunks from the same document are grouped under one header so the model
//! sees each source as a contiguous passage, not interleaved fragments.

use cardy_core::ScoredChunk;
use uuid::Uuid;

/// A context block ready for prompt insertion, plus the documents that
/// contributed to it (in first-seen order, for the "sources used" surface).
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    pub block: String,
    pub sources: Vec<String>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }
}

/// Group chunks by document, keep chunk order inside each group, and join
/// groups with explicit `=== Document: <name> ===` boundaries.
pub fn assemble(chunks: &[ScoredChunk]) -> AssembledContext {
    let mut order: Vec<Uuid> = Vec::new();
    let mut groups: Vec<(String, Vec<&ScoredChunk>)> = Vec::new();

    for chunk in chunks {
        match order.iter().position(|id| *id == chunk.document_id) {
            Some(pos) => groups[pos].1.push(chunk),
            None => {
                order.push(chunk.document_id);
                groups.push((chunk.document_name.clone(), vec![chunk]));
            },
        }
    }

    let mut block = String::new();
    let mut sources = Vec::with_capacity(groups.len());
    for (name, mut group) in groups {
        group.sort_by_key(|c| c.chunk_index);
        if !block.is_empty() {
            block.push_str("\n\n");
        }
        block.push_str(&format!("=== Document: {name} ===\n\n"));
        block.push_str(&group.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n\n"));
        sources.push(name);
    }

    AssembledContext { block, sources }
}
