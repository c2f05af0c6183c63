use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One named, colored field of a template message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub value: String,
    pub color: String,
}

/// The shared portion of a dispatch, merged with each recipient id.
#[derive(Debug, Clone)]
pub struct MessagePayload {
    pub template_id: String,
    pub url: String,
    pub topcolor: String,
    pub data: BTreeMap<String, FieldEntry>,
}

impl MessagePayload {
    pub fn for_recipient(&self, recipient: &str) -> TemplateMessage {
        TemplateMessage {
            touser: recipient.to_string(),
            template_id: self.template_id.clone(),
            url: self.url.clone(),
            topcolor: self.topcolor.clone(),
            data: self.data.clone(),
        }
    }
}

/// Outbound send-endpoint body, one per recipient.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateMessage {
    pub touser: String,
    pub template_id: String,
    pub url: String,
    pub topcolor: String,
    pub data: BTreeMap<String, FieldEntry>,
}

/// Send-endpoint response; only the literal errcode 0 means success.
#[derive(Debug, Deserialize)]
pub(crate) struct SendResponse {
    #[serde(default)]
    pub errcode: Option<i64>,
}
