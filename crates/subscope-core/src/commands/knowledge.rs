use serde::Serialize;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::error::{CoreError, CoreResult};
use crate::knowledge::KnowledgeBase;
use crate::model::ServiceKnowledge;

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeListData {
    pub count: usize,
    pub services: Vec<ServiceKnowledge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeLookupData {
    pub query: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceKnowledge>,
}

pub fn list() -> CoreResult<SuccessEnvelope> {
    let base = KnowledgeBase::builtin();
    let services = base.services().to_vec();
    success(
        "knowledge list",
        KnowledgeListData {
            count: services.len(),
            services,
        },
    )
}

pub fn lookup(text: &str) -> CoreResult<SuccessEnvelope> {
    if text.trim().is_empty() {
        return Err(CoreError::invalid_argument_for_command(
            "Provide merchant text to look up.",
            Some("knowledge lookup"),
        ));
    }

    let base = KnowledgeBase::builtin();
    let service = base.lookup(text).cloned();
    success(
        "knowledge lookup",
        KnowledgeLookupData {
            query: text.to_string(),
            matched: service.is_some(),
            service,
        },
    )
}
