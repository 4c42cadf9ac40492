use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single profile link.
///
/// Starts out as whatever the user typed (`Raw`, possibly empty). Enrichment
/// replaces it with `Enriched`, keeping the original URL next to the fetched
/// public summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Link {
    Raw { url: String },
    Enriched { url: String, profile: Value },
}

impl Link {
    pub fn raw(url: impl Into<String>) -> Self {
        Link::Raw { url: url.into() }
    }

    /// The URL (or bare username) the user supplied.
    pub fn url(&self) -> &str {
        match self {
            Link::Raw { url } | Link::Enriched { url, .. } => url,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url().trim().is_empty()
    }
}

impl Default for Link {
    fn default() -> Self {
        Link::raw("")
    }
}

/// Named links per provider. Every field is optional and provided independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileLinks {
    pub linkedin: Link,
    pub github: Link,
    pub leetcode: Link,
}

/// Partial update of a candidate's links. Absent fields are left unchanged;
/// an empty string clears the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinksUpdate {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub leetcode: Option<String>,
}

impl ProfileLinks {
    pub fn apply(&mut self, update: LinksUpdate) {
        if let Some(url) = update.linkedin {
            self.linkedin = Link::raw(url.trim());
        }
        if let Some(url) = update.github {
            self.github = Link::raw(url.trim());
        }
        if let Some(url) = update.leetcode {
            self.leetcode = Link::raw(url.trim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_links_are_empty() {
        let links = ProfileLinks::default();
        assert!(links.linkedin.is_empty());
        assert!(links.github.is_empty());
        assert!(links.leetcode.is_empty());
    }

    #[test]
    fn test_enriched_link_keeps_url() {
        let link = Link::Enriched {
            url: "https://leetcode.com/alice".to_string(),
            profile: json!({"ranking": 1200}),
        };
        assert_eq!(link.url(), "https://leetcode.com/alice");
        assert!(!link.is_empty());
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut links = ProfileLinks {
            linkedin: Link::raw("https://linkedin.com/in/alice"),
            github: Link::raw("https://github.com/alice"),
            leetcode: Link::Enriched {
                url: "alice".to_string(),
                profile: json!({}),
            },
        };
        links.apply(LinksUpdate {
            github: Some("  https://github.com/alice-dev ".to_string()),
            leetcode: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(links.linkedin.url(), "https://linkedin.com/in/alice");
        assert_eq!(links.github, Link::raw("https://github.com/alice-dev"));
        assert_eq!(links.leetcode, Link::raw(""));
    }

    #[test]
    fn test_link_serializes_with_kind_tag() {
        let value = serde_json::to_value(Link::raw("x")).unwrap();
        assert_eq!(value, json!({"kind": "raw", "url": "x"}));
    }
}
