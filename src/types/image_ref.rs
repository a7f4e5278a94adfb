// ABOUTME: Validation for the container image a service is pointed at.
// ABOUTME: Accepts registry/name:tag@digest forms and keeps the caller's spelling.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: '{0}'")]
    InvalidChar(char),

    #[error("image reference has an empty {0}")]
    EmptyComponent(&'static str),
}

/// A validated image reference.
///
/// The platform receives the reference exactly as the caller wrote it, so the
/// original text is kept alongside the parsed components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    raw: String,
    registry: Option<String>,
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || "/:.-_@".contains(*c)))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        let (rest, digest) = match raw.split_once('@') {
            Some((rest, digest)) => (rest, Some(non_empty(digest, "digest")?)),
            None => (raw, None),
        };

        // A colon after the last slash starts the tag; earlier colons belong
        // to a registry port.
        let last_slash = rest.rfind('/').map_or(0, |i| i + 1);
        let (path, tag) = match rest[last_slash..].split_once(':') {
            Some((name, tag)) => (
                &rest[..last_slash + name.len()],
                Some(non_empty(tag, "tag")?),
            ),
            None => (rest, None),
        };

        let (registry, repository) = match path.split_once('/') {
            Some((first, remainder))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (Some(first.to_string()), remainder)
            }
            _ => (None, path),
        };

        Ok(Self {
            raw: raw.to_string(),
            registry,
            repository: non_empty(repository, "repository")?,
            tag,
            digest,
        })
    }

    /// The reference as it should be sent to the platform.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// True when neither tag nor digest pins the image, so the platform
    /// resolves `latest`.
    pub fn is_floating(&self) -> bool {
        self.tag.is_none() && self.digest.is_none()
    }
}

fn non_empty(value: &str, component: &'static str) -> Result<String, ParseImageRefError> {
    if value.is_empty() {
        Err(ParseImageRefError::EmptyComponent(component))
    } else {
        Ok(value.to_string())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for ImageRef {
    type Err = ParseImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
