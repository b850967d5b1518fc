//! Request profiles: header bundles that make a fetch look like a specific
//! browser. Tried most to least browser-like.
//!
//! `Accept-Encoding` is deliberately absent: the transport negotiates
//! compression itself and decodes the body.

/// One fetch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestProfile {
    pub name: &'static str,
    pub headers: Vec<(&'static str, &'static str)>,
}

impl RequestProfile {
    /// Value of a header, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    pub fn user_agent(&self) -> Option<&'static str> {
        self.header("User-Agent")
    }

    /// This profile's headers with `Accept` swapped for `application/json`,
    /// for the oEmbed and API-query endpoints.
    pub fn json_headers(&self) -> Vec<(&'static str, &'static str)> {
        self.headers
            .iter()
            .filter(|(key, _)| !key.eq_ignore_ascii_case("Accept"))
            .copied()
            .chain(std::iter::once(("Accept", "application/json")))
            .collect()
    }
}

fn desktop_chrome() -> RequestProfile {
    RequestProfile {
        name: "desktop-chrome",
        headers: vec![
            (
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
            ),
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
            ),
            ("Accept-Language", "en-US,en;q=0.9"),
            ("Upgrade-Insecure-Requests", "1"),
            ("Sec-Fetch-Dest", "document"),
            ("Sec-Fetch-Mode", "navigate"),
            ("Sec-Fetch-Site", "none"),
            ("Sec-Fetch-User", "?1"),
            ("Cache-Control", "max-age=0"),
        ],
    }
}

fn mobile_safari() -> RequestProfile {
    RequestProfile {
        name: "mobile-safari",
        headers: vec![
            (
                "User-Agent",
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
            ),
            ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
            ("Accept-Language", "en-US,en;q=0.9"),
        ],
    }
}

fn desktop_firefox() -> RequestProfile {
    RequestProfile {
        name: "desktop-firefox",
        headers: vec![
            (
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:132.0) Gecko/20100101 Firefox/132.0",
            ),
            ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
            ("Accept-Language", "en-US,en;q=0.5"),
            ("Upgrade-Insecure-Requests", "1"),
            ("DNT", "1"),
        ],
    }
}

fn desktop_chrome_mac() -> RequestProfile {
    RequestProfile {
        name: "desktop-chrome-mac",
        headers: vec![
            (
                "User-Agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
            ),
            ("Accept", "*/*"),
            ("Accept-Language", "en-US,en;q=0.9,en-GB;q=0.8,de;q=0.7"),
            ("Referer", "https://www.google.com/"),
        ],
    }
}

/// Ordered profile catalogue. Built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSet {
    profiles: Vec<RequestProfile>,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::new(vec![desktop_chrome(), mobile_safari(), desktop_firefox(), desktop_chrome_mac()])
    }
}

impl ProfileSet {
    pub fn new(profiles: Vec<RequestProfile>) -> Self {
        Self { profiles }
    }

    /// Appends a profile; it is tried after every existing one.
    pub fn push(&mut self, profile: RequestProfile) {
        self.profiles.push(profile);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestProfile> {
        self.profiles.iter()
    }

    /// Most browser-like profile, used for single-shot JSON endpoints.
    pub fn primary(&self) -> Option<&RequestProfile> {
        self.profiles.first()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.name).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProfileSet {
    type Item = &'a RequestProfile;
    type IntoIter = std::slice::Iter<'a, RequestProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}
