use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique document identifier assigned by the extraction stage.
pub type DocId = Uuid;

/// Identifier triple the extraction collaborator attaches to every document
/// it hands over for chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub document_id: DocId,
    pub knowledge_base_id: Uuid,
    pub agent_id: Uuid,
}

impl DocumentRef {
    pub fn new(document_id: DocId, knowledge_base_id: Uuid, agent_id: Uuid) -> Self {
        Self {
            document_id,
            knowledge_base_id,
            agent_id,
        }
    }
}
