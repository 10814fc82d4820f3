//! Absolute links into the client application, used in outgoing emails.

use url::Url;

use super::post::PostId;
use super::user::Username;

/// Error raised when the client base URL cannot carry a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("client url must be a hierarchical http(s) url: {url}")]
pub struct InvalidClientUrl {
    /// The rejected value.
    pub url: String,
}

/// Builds links to pages of the single-page client.
///
/// # Examples
/// ```
/// use proflink::domain::{AppLinks, Username};
/// use url::Url;
///
/// let links = AppLinks::new(Url::parse("https://proflink.example/app/").unwrap()).unwrap();
/// let alice = Username::new("alice").unwrap();
/// assert_eq!(
///     links.profile_url(&alice).as_str(),
///     "https://proflink.example/app/profile/alice"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLinks {
    client_url: Url,
}

impl AppLinks {
    /// Validate `client_url` as a base for deep links.
    pub fn new(client_url: Url) -> Result<Self, InvalidClientUrl> {
        if client_url.cannot_be_a_base() || !matches!(client_url.scheme(), "http" | "https") {
            return Err(InvalidClientUrl {
                url: client_url.to_string(),
            });
        }
        Ok(Self { client_url })
    }

    /// Base URL of the web client.
    pub fn client_url(&self) -> &Url {
        &self.client_url
    }

    /// Link to the public profile of `username`.
    pub fn profile_url(&self, username: &Username) -> Url {
        self.with_segments(&["profile", username.as_ref()])
    }

    /// Link to a single post.
    pub fn post_url(&self, post: &PostId) -> Url {
        self.with_segments(&["post", &post.to_string()])
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.client_url.clone();
        // Hierarchical URLs always expose mutable path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Default for AppLinks {
    fn default() -> Self {
        Self {
            client_url: localhost(),
        }
    }
}

/// Development client served by the frontend dev server.
fn localhost() -> Url {
    Url::parse("http://localhost:5173/").unwrap_or_else(|err| panic!("static url parses: {err}"))
}
