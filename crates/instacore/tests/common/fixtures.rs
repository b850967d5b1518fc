//! Payload fixtures and configs for resolver tests

#![allow(dead_code)]

use instacore::ResolverConfig;
use std::time::Duration;

/// A 200 page with no post content.
pub const LOGIN_WALL: &str = "<!DOCTYPE html><html><head><title>Login • Instagram</title></head>\
                              <body><form id=\"loginForm\"></form></body></html>";

/// Post page carrying only Open Graph tags.
pub fn meta_page(image_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head>
<meta property="og:title" content="A post">
<meta property="og:image" content="{}">
</head><body></body></html>"#,
        image_url
    )
}

/// Post page with `window._sharedData` describing one media node.
pub fn shared_data_page(typename: &str, video_url: &str, display_url: &str) -> String {
    format!(
        r#"<html><head><script type="text/javascript">window._sharedData = {{"config":{{}},"entry_data":{{"PostPage":[{{"graphql":{{"shortcode_media":{{"__typename":"{}","video_url":"{}","display_url":"{}"}}}}}}]}}}};</script></head></html>"#,
        typename, video_url, display_url
    )
}

/// Short backoff and timeouts so paused-clock tests stay readable.
pub fn fast_config() -> ResolverConfig {
    ResolverConfig::default()
        .timeouts(Duration::from_secs(5))
        .rate_limit_backoff(Duration::from_secs(2))
}
