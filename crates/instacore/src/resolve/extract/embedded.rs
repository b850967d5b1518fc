//! Structured data embedded in the post page.
//!
//! Three wrappers are recognized: the `window._sharedData = {...}` assignment,
//! the `window.__additionalDataLoaded('<path>', {...})` call, and a bare JSON
//! object that is the whole body of a `<script>` element. Each located object
//! is parsed as JSON and searched for the post's media descriptor.

use lazy_regex::{lazy_regex, Lazy, Regex};
use serde_json::Value;

use super::media_node::candidate_from_node;
use super::ExtractionStrategy;
use crate::resolve::error::ResolveError;
use crate::resolve::media::MediaCandidate;

static SHARED_DATA: Lazy<Regex> = lazy_regex!(r"window\._sharedData\s*=\s*");

static ADDITIONAL_DATA: Lazy<Regex> = lazy_regex!(r"window\.__additionalDataLoaded\s*\(\s*[^,]*,\s*");

static SCRIPT_OBJECT: Lazy<Regex> = lazy_regex!(r"<script[^>]*>\s*(\{.*?\})\s*</script>"s);

/// Where the media descriptor may sit inside one page-data object.
const MEDIA_POINTERS: &[&str] = &[
    "/graphql/shortcode_media",
    "/shortcode_media",
    "/data/xdt_shortcode_media",
    "/data/shortcode_media",
];

pub struct EmbeddedDataStrategy;

/// Parses the first JSON value at the start of `text`, ignoring whatever
/// follows it (`;`, `);`, more script).
fn parse_leading_object(text: &str) -> Option<Result<Value, serde_json::Error>> {
    if !text.starts_with('{') {
        return None;
    }
    serde_json::Deserializer::from_str(text).into_iter::<Value>().next()
}

fn media_node_of(object: &Value) -> Option<&Value> {
    MEDIA_POINTERS
        .iter()
        .filter_map(|pointer| object.pointer(pointer))
        .find(|node| node.is_object())
}

/// Looks in `entry_data.<page>[*]` first, then at the object's own top level.
fn find_media_node(data: &Value) -> Option<&Value> {
    let from_entry = data
        .get("entry_data")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|entry| entry.values())
        .filter_map(Value::as_array)
        .flatten()
        .find_map(media_node_of);

    from_entry.or_else(|| media_node_of(data))
}

/// Every JSON object text that one of the wrappers points at, in page order
/// per wrapper.
fn located_objects(payload: &str) -> Vec<&str> {
    let mut objects = Vec::new();

    for wrapper in [&SHARED_DATA, &ADDITIONAL_DATA] {
        for m in wrapper.find_iter(payload) {
            objects.push(&payload[m.end()..]);
        }
    }
    for caps in SCRIPT_OBJECT.captures_iter(payload) {
        if let Some(body) = caps.get(1) {
            objects.push(body.as_str());
        }
    }

    objects
}

impl ExtractionStrategy for EmbeddedDataStrategy {
    fn name(&self) -> &'static str {
        "embedded_data"
    }

    fn extract(&self, payload: &str) -> Result<Option<MediaCandidate>, ResolveError> {
        let mut parse_error = None;

        for text in located_objects(payload) {
            let data = match parse_leading_object(text) {
                Some(Ok(data)) => data,
                Some(Err(e)) => {
                    log::debug!("Embedded page data is not valid JSON: {}", e);
                    parse_error.get_or_insert(e);
                    continue;
                }
                None => continue,
            };

            if let Some(candidate) = find_media_node(&data).and_then(candidate_from_node) {
                return Ok(Some(candidate));
            }
        }

        match parse_error {
            Some(e) => Err(e.into()),
            None => Ok(None),
        }
    }
}
