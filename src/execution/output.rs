//! Output Resolution
//!
//! Naming of downloaded reference outputs and the per-output results
//! returned by [`Execution::get_output`](super::Execution::get_output).

use std::path::PathBuf;

use serde::Serialize;
use url::Url;

use crate::error::{Result, WpsError};

/// What happened to one output during retrieval.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum OutputResult {
    /// A reference output downloaded to disk
    File {
        identifier: String,
        path: PathBuf,
        bytes: usize,
    },
    /// An inline output, returned as-is
    Inline {
        identifier: String,
        data: String,
        mime_type: Option<String>,
    },
}

impl OutputResult {
    pub fn identifier(&self) -> &str {
        match self {
            Self::File { identifier, .. } | Self::Inline { identifier, .. } => identifier,
        }
    }
}

/// Derives a local file name from a reference URL.
///
/// Tried in order: the `id` query parameter, the first non-empty query
/// value, the last non-empty path segment.
///
/// # Example
///
/// ```
/// use wpsclient::execution::derive_file_name;
///
/// let name = derive_file_name("http://host/RetrieveResultServlet?id=1318528582026OUTPUT").unwrap();
/// assert_eq!(name, "1318528582026OUTPUT");
/// ```
///
/// # Errors
///
/// [`WpsError::InvalidUrl`] if `href` is not a URL, [`WpsError::OutputName`]
/// if nothing usable is found.
pub fn derive_file_name(href: &str) -> Result<String> {
    let url = Url::parse(href)?;

    let from_query = url
        .query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            url.query_pairs()
                .map(|(_, v)| v.into_owned())
                .find(|v| !v.is_empty())
        });

    let candidate = from_query.or_else(|| {
        url.path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
    });

    candidate
        .as_deref()
        .and_then(sanitize)
        .ok_or_else(|| WpsError::OutputName(href.to_string()))
}

/// Keeps only the final path component of a name.
fn sanitize(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
