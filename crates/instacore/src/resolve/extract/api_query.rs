//! JSON returned by the internal GraphQL API.
//!
//! Expected shape: `{"data": {"xdt_shortcode_media": {...}}}` (POST variant) or
//! `{"data": {"shortcode_media": {...}}}` (legacy GET variant). Any other
//! object under `data` that carries a `__typename` is accepted as well.

use serde_json::Value;

use super::media_node::candidate_from_node;
use super::ExtractionStrategy;
use crate::resolve::error::ResolveError;
use crate::resolve::media::MediaCandidate;

pub struct ApiQueryStrategy;

fn media_node(body: &Value) -> Option<&Value> {
    body.pointer("/data/xdt_shortcode_media")
        .or_else(|| body.pointer("/data/shortcode_media"))
        .filter(|node| node.is_object())
        .or_else(|| {
            body.get("data")
                .and_then(Value::as_object)?
                .values()
                .find(|node| node.get("__typename").is_some())
        })
}

impl ExtractionStrategy for ApiQueryStrategy {
    fn name(&self) -> &'static str {
        "api_query"
    }

    fn extract(&self, payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
        let trimmed = payload.trim_start();
        if !trimmed.starts_with('{') {
            return Ok(None);
        }

        let body: Value = serde_json::from_str(trimmed)?;

        // Error responses come back as 200 with a message and no data
        if let Some(message) = body.get("message").and_then(Value::as_str) {
            if message.contains("useragent mismatch") || message.contains("doc_id") {
                log::error!("API query: possible doc_id expiry: {}", message);
                return Err(ResolveError::ParseFailure(format!("doc_id may be expired: {}", message)));
            }
            if message.contains("checkpoint_required") || message.contains("login_required") {
                log::warn!("API query: login required: {}", message);
                return Ok(None);
            }
        }

        Ok(media_node(&body).and_then(candidate_from_node))
    }
}
