//! Typed media node rule shared by the embedded-data and API-query parsers.
//!
//! - Video: `video_url`, falling back to `display_url`
//! - Image: `display_url`
//! - Sidecar (carousel): first child edge, same Video/Image rule
//!
//! Node types come from `__typename` (`GraphVideo`, `XDTGraphVideo`, ...).
//! Nodes without one are classified by `is_video` and the fields present.

use serde_json::Value;

use crate::resolve::media::MediaCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeType {
    Video,
    Image,
    Sidecar,
    Unknown,
}

fn node_type(node: &Value) -> NodeType {
    if let Some(typename) = node.get("__typename").and_then(Value::as_str) {
        return match typename.trim_start_matches("XDT") {
            "GraphVideo" => NodeType::Video,
            "GraphImage" => NodeType::Image,
            "GraphSidecar" => NodeType::Sidecar,
            _ => NodeType::Unknown,
        };
    }

    if node.get("edge_sidecar_to_children").is_some() {
        NodeType::Sidecar
    } else if node.get("is_video").and_then(Value::as_bool).unwrap_or(false) {
        NodeType::Video
    } else if node.get("display_url").is_some() {
        NodeType::Image
    } else {
        NodeType::Unknown
    }
}

fn string_field<'a>(node: &'a Value, field: &str) -> Option<&'a str> {
    node.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn leaf_candidate(node: &Value, as_video: bool) -> Option<MediaCandidate> {
    let url = if as_video {
        string_field(node, "video_url").or_else(|| string_field(node, "display_url"))
    } else {
        string_field(node, "display_url")
    };
    url.and_then(MediaCandidate::from_extracted)
}

/// Applies the typed-node rule to a media descriptor.
pub fn candidate_from_node(node: &Value) -> Option<MediaCandidate> {
    match node_type(node) {
        NodeType::Video => leaf_candidate(node, true),
        NodeType::Image => leaf_candidate(node, false),
        NodeType::Sidecar => {
            let child = node.pointer("/edge_sidecar_to_children/edges/0/node")?;
            leaf_candidate(child, node_type(child) == NodeType::Video)
        }
        NodeType::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::media::MediaKind;
    use serde_json::json;

    #[test]
    fn test_video_prefers_video_url() {
        let node = json!({
            "__typename": "GraphVideo",
            "video_url": "https://x/v.mp4",
            "display_url": "https://x/thumb.jpg"
        });
        assert_eq!(
            candidate_from_node(&node),
            Some(MediaCandidate::new("https://x/v.mp4", MediaKind::Video))
        );
    }

    #[test]
    fn test_video_without_video_url_falls_back_to_display() {
        let node = json!({"__typename": "GraphVideo", "display_url": "https://x/thumb.jpg"});
        assert_eq!(
            candidate_from_node(&node),
            Some(MediaCandidate::new("https://x/thumb.jpg", MediaKind::Image))
        );
    }

    #[test]
    fn test_image_ignores_video_url() {
        let node = json!({
            "__typename": "GraphImage",
            "video_url": "https://x/v.mp4",
            "display_url": "https://x/i.jpg"
        });
        assert_eq!(candidate_from_node(&node).map(|c| c.url), Some("https://x/i.jpg".to_string()));
    }

    #[test]
    fn test_sidecar_uses_first_child() {
        let node = json!({
            "__typename": "GraphSidecar",
            "display_url": "https://x/cover.jpg",
            "edge_sidecar_to_children": {"edges": [
                {"node": {"__typename": "GraphVideo", "video_url": "https://x/first.mp4"}},
                {"node": {"__typename": "GraphImage", "display_url": "https://x/second.jpg"}}
            ]}
        });
        assert_eq!(
            candidate_from_node(&node),
            Some(MediaCandidate::new("https://x/first.mp4", MediaKind::Video))
        );
    }

    #[test]
    fn test_sidecar_image_child() {
        let node = json!({
            "__typename": "XDTGraphSidecar",
            "edge_sidecar_to_children": {"edges": [
                {"node": {"__typename": "XDTGraphImage", "display_url": "https://x/a.jpg"}}
            ]}
        });
        assert_eq!(candidate_from_node(&node).map(|c| c.url), Some("https://x/a.jpg".to_string()));
    }

    #[test]
    fn test_empty_sidecar_yields_nothing() {
        let node = json!({"__typename": "GraphSidecar", "edge_sidecar_to_children": {"edges": []}});
        assert_eq!(candidate_from_node(&node), None);
    }

    #[test]
    fn test_untyped_node_uses_is_video() {
        let node = json!({"is_video": true, "video_url": "https://x/v.mp4", "display_url": "https://x/t.jpg"});
        assert_eq!(candidate_from_node(&node).map(|c| c.kind), Some(MediaKind::Video));
    }

    #[test]
    fn test_unknown_typename_yields_nothing() {
        let node = json!({"__typename": "GraphStory", "display_url": "https://x/i.jpg"});
        assert_eq!(candidate_from_node(&node), None);
    }
}
