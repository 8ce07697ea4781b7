//! Confluent Resource Names.
//!
//! A CRN names a resource or a resource pattern:
//!
//! ```text
//! crn://<authority>/<kind1>=<id1>/<kind2>=<id2>/...
//! ```
//!
//! Audit log routes are keyed by CRN strings. [`Crn`] parses such a key into
//! its authority and an ordered list of segments so that authority rewrites and
//! cluster id substitution operate on structure instead of substrings. Any
//! parseable string is reproduced exactly by [`Crn`]'s `Display` impl.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Scheme prefix of every CRN.
pub const CRN_SCHEME: &str = "crn://";

/// Resource id matching every resource of a kind.
pub const WILDCARD: &str = "*";

/// Segment kind naming a Kafka cluster.
pub const KAFKA_KIND: &str = "kafka";

/// One `kind=id` element of a CRN path.
///
/// A segment without `=` keeps its text in `kind` and has no id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrnSegment {
    /// Resource kind (e.g. `kafka`, `topic`).
    pub kind: String,
    /// Resource id, `*` for a wildcard.
    pub id: Option<String>,
}

impl CrnSegment {
    /// Creates a `kind=id` segment.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
        }
    }

    /// Creates a `kind=*` segment.
    #[must_use]
    pub fn wildcard(kind: impl Into<String>) -> Self {
        Self::new(kind, WILDCARD)
    }

    /// Returns true if the id is the wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.id.as_deref() == Some(WILDCARD)
    }

    fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((kind, id)) => Self::new(kind, id),
            None => Self {
                kind: raw.to_string(),
                id: None,
            },
        }
    }
}

impl fmt::Display for CrnSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}={id}", self.kind),
            None => f.write_str(&self.kind),
        }
    }
}

/// A parsed Confluent Resource Name.
///
/// # Examples
///
/// ```
/// use auditlog_core::Crn;
///
/// let crn: Crn = "crn://mds1.example.com/kafka=*/topic=payments".parse().unwrap();
/// assert_eq!(crn.authority(), "mds1.example.com");
/// assert_eq!(crn.kafka_cluster(), Some("*"));
///
/// let crn = crn.with_authority("mds.example.com").substitute_wildcard("kafka", "lkc-1");
/// assert_eq!(crn.to_string(), "crn://mds.example.com/kafka=lkc-1/topic=payments");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Crn {
    authority: String,
    segments: Vec<CrnSegment>,
}

impl Crn {
    /// Creates a CRN with the given authority and no path segments.
    #[must_use]
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            segments: Vec::new(),
        }
    }

    /// Parses a CRN string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCrn`] if the string does not start with
    /// `crn://` or has no `/` terminating the authority.
    pub fn parse(raw: &str) -> Result<Self> {
        let rest = raw.strip_prefix(CRN_SCHEME).ok_or_else(|| Error::InvalidCrn {
            crn: raw.to_string(),
            reason: format!("missing '{CRN_SCHEME}' prefix"),
        })?;

        let (authority, path) = rest.split_once('/').ok_or_else(|| Error::InvalidCrn {
            crn: raw.to_string(),
            reason: "authority is not terminated by '/'".to_string(),
        })?;

        let segments = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').map(CrnSegment::parse).collect()
        };

        Ok(Self {
            authority: authority.to_string(),
            segments,
        })
    }

    /// Returns the authority of a CRN string without parsing the whole path.
    ///
    /// Returns `None` for strings that are not CRNs.
    #[must_use]
    pub fn authority_of(raw: &str) -> Option<&str> {
        raw.strip_prefix(CRN_SCHEME)
            .and_then(|rest| rest.split_once('/'))
            .map(|(authority, _)| authority)
    }

    /// Returns the authority.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns the path segments in order.
    #[must_use]
    pub fn segments(&self) -> &[CrnSegment] {
        &self.segments
    }

    /// Returns the id of the first segment of the given kind.
    #[must_use]
    pub fn segment(&self, kind: &str) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| s.kind == kind)
            .and_then(|s| s.id.as_deref())
    }

    /// Returns the Kafka cluster id, if the CRN has a `kafka=` segment.
    #[must_use]
    pub fn kafka_cluster(&self) -> Option<&str> {
        self.segment(KAFKA_KIND)
    }

    /// Replaces the authority.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Appends a `kind=id` segment.
    #[must_use]
    pub fn with_segment(mut self, kind: impl Into<String>, id: impl Into<String>) -> Self {
        self.segments.push(CrnSegment::new(kind, id));
        self
    }

    /// Appends a `kind=*` segment.
    #[must_use]
    pub fn with_wildcard(mut self, kind: impl Into<String>) -> Self {
        self.segments.push(CrnSegment::wildcard(kind));
        self
    }

    /// Replaces the id of every `kind=*` segment with `id`.
    ///
    /// Segments of that kind naming a specific id are left untouched.
    #[must_use]
    pub fn substitute_wildcard(mut self, kind: &str, id: &str) -> Self {
        for segment in &mut self.segments {
            if segment.kind == kind && segment.is_wildcard() {
                segment.id = Some(id.to_string());
            }
        }
        self
    }
}

impl fmt::Display for Crn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CRN_SCHEME}{}/", self.authority)?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Crn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
