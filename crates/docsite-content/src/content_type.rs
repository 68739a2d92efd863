use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of authored content.
///
/// Each type has a source directory `content/<type>`, a static output
/// directory `static/content/<type>`, and a metadata index
/// `static/content-meta/<type>/index.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Doc,
    Blog,
    Policy,
    Dev,
}

impl ContentType {
    /// Every content type, in processing order.
    pub const ALL: [ContentType; 4] = [Self::Doc, Self::Blog, Self::Policy, Self::Dev];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Blog => "blog",
            Self::Policy => "policy",
            Self::Dev => "dev",
        }
    }

    /// URL root that every path of this type lives under.
    ///
    /// Policies are served from the site root (`/privacy`, `/terms/service`).
    #[must_use]
    pub fn url_root(self) -> Option<&'static str> {
        match self {
            Self::Doc => Some("/docs"),
            Self::Blog => Some("/blog"),
            Self::Policy => None,
            Self::Dev => Some("/dev"),
        }
    }

    /// Whether `path` is the URL root or lies beneath it.
    #[must_use]
    pub(crate) fn owns_url(self, path: &str) -> bool {
        self.url_root().is_some_and(|root| {
            path.strip_prefix(root)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Type serving a URL path. Paths outside every root are policies.
    #[must_use]
    pub fn for_url(path: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|ty| ty.owns_url(path))
            .unwrap_or(Self::Policy)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doc" | "docs" => Ok(Self::Doc),
            "blog" => Ok(Self::Blog),
            "policy" => Ok(Self::Policy),
            "dev" => Ok(Self::Dev),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owns_url_is_segment_aware() {
        assert!(ContentType::Doc.owns_url("/docs"));
        assert!(ContentType::Doc.owns_url("/docs/mirascope"));
        assert!(!ContentType::Doc.owns_url("/docsearch"));
        assert!(!ContentType::Policy.owns_url("/privacy"));
    }

    #[test]
    fn test_for_url() {
        assert_eq!(ContentType::for_url("/docs/mirascope/"), ContentType::Doc);
        assert_eq!(ContentType::for_url("/blog/launch"), ContentType::Blog);
        assert_eq!(ContentType::for_url("/dev/style-test"), ContentType::Dev);
        assert_eq!(ContentType::for_url("/terms/service"), ContentType::Policy);
        assert_eq!(ContentType::for_url("/blogroll"), ContentType::Policy);
    }

    #[test]
    fn test_parse_round_trip() {
        for ty in ContentType::ALL {
            assert_eq!(ty.as_str().parse::<ContentType>().unwrap(), ty);
        }
        assert_eq!("docs".parse::<ContentType>().unwrap(), ContentType::Doc);
        assert!("video".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ContentType::Policy).unwrap(), "\"policy\"");
    }
}
