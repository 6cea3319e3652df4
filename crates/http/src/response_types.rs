//! Response types (Serialize)

use cardy_core::ScoredChunk;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredChunk>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct VersionResponse {
    pub version: &'static str,
}
