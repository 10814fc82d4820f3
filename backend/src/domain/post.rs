//! Posts, comments and the validated inputs that create them.
//!
//! Content limits are counted in characters. A post needs either non-blank
//! content or an image; images arrive as `data:image/...;base64,` URLs and are
//! decoded once here so malformed payloads never reach the media store.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use super::identifier::define_uuid_id;
use super::user::{UserId, UserSummary};

/// Maximum post content length in characters.
pub const POST_CONTENT_MAX: usize = 2_000;
/// Maximum comment length in characters.
pub const COMMENT_CONTENT_MAX: usize = 500;

define_uuid_id!(
    /// Stable post identifier.
    PostId,
    "post id"
);

define_uuid_id!(
    /// Stable comment identifier.
    CommentId,
    "comment id"
);

/// Validation failures for post and comment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Neither text nor image was supplied.
    EmptyPost,
    /// Post text exceeds `max` characters.
    ContentTooLong { max: usize },
    /// The attachment is not a usable image data URL.
    InvalidImage { reason: &'static str },
    /// Comment text is blank.
    EmptyComment,
    /// Comment text exceeds `max` characters.
    CommentTooLong { max: usize },
}

impl PostValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyPost | Self::ContentTooLong { .. } | Self::EmptyComment | Self::CommentTooLong { .. } => {
                "content"
            }
            Self::InvalidImage { .. } => "image",
        }
    }

    /// Stable machine-readable reason used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPost => "empty_post",
            Self::ContentTooLong { .. } | Self::CommentTooLong { .. } => "too_long",
            Self::InvalidImage { .. } => "invalid_image",
            Self::EmptyComment => "empty",
        }
    }
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPost => write!(f, "Post must have content or an image"),
            Self::ContentTooLong { max } => write!(f, "Content cannot exceed {max} characters"),
            Self::InvalidImage { .. } => write!(f, "Invalid image format"),
            Self::EmptyComment => write!(f, "Comment content is required"),
            Self::CommentTooLong { max } => write!(f, "Comment cannot exceed {max} characters"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Image supplied inline as a base64 data URL.
///
/// # Examples
/// ```
/// use proflink::domain::ImageDataUrl;
///
/// let image = ImageDataUrl::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
/// assert_eq!(image.media_type(), "image/png");
/// assert!(ImageDataUrl::parse("data:text/plain;base64,aGk=").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ImageDataUrl {
    raw: String,
    media_type: String,
    decoded_len: usize,
}

impl ImageDataUrl {
    /// Parse and decode-check a data URL.
    pub fn parse(raw: &str) -> Result<Self, PostValidationError> {
        let trimmed = raw.trim();
        let rest = trimmed
            .strip_prefix("data:")
            .ok_or(PostValidationError::InvalidImage { reason: "not a data URL" })?;
        let (media_type, payload) = rest
            .split_once(";base64,")
            .ok_or(PostValidationError::InvalidImage { reason: "payload is not base64" })?;
        let subtype = media_type
            .strip_prefix("image/")
            .ok_or(PostValidationError::InvalidImage { reason: "media type is not an image" })?;
        if subtype.is_empty() {
            return Err(PostValidationError::InvalidImage { reason: "media type is not an image" });
        }
        let decoded = STANDARD
            .decode(payload)
            .map_err(|_| PostValidationError::InvalidImage { reason: "payload does not decode" })?;
        if decoded.is_empty() {
            return Err(PostValidationError::InvalidImage { reason: "payload is empty" });
        }
        Ok(Self {
            raw: trimmed.to_owned(),
            media_type: media_type.to_ascii_lowercase(),
            decoded_len: decoded.len(),
        })
    }

    /// The original data URL, as accepted by the media store.
    pub fn as_data_url(&self) -> &str {
        self.raw.as_str()
    }

    /// MIME type declared by the data URL, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        self.media_type.as_str()
    }

    /// Size of the decoded image in bytes.
    pub fn decoded_len(&self) -> usize {
        self.decoded_len
    }
}

impl fmt::Debug for ImageDataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageDataUrl")
            .field("media_type", &self.media_type)
            .field("decoded_len", &self.decoded_len)
            .finish_non_exhaustive()
    }
}

/// Validated input for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    content: String,
    image: Option<ImageDataUrl>,
}

impl PostDraft {
    /// Validate raw content and an optional image data URL.
    ///
    /// Blank content counts as absent. The length limit applies to the
    /// untrimmed content.
    pub fn try_new(content: Option<&str>, image: Option<&str>) -> Result<Self, PostValidationError> {
        let raw_content = content.unwrap_or_default();
        let image = image.filter(|value| !value.trim().is_empty());
        if raw_content.trim().is_empty() && image.is_none() {
            return Err(PostValidationError::EmptyPost);
        }
        if raw_content.chars().count() > POST_CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong { max: POST_CONTENT_MAX });
        }
        let image = image.map(ImageDataUrl::parse).transpose()?;
        Ok(Self {
            content: raw_content.trim().to_owned(),
            image,
        })
    }

    /// Trimmed text; empty for image-only posts.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Attached image, if any.
    pub fn image(&self) -> Option<&ImageDataUrl> {
        self.image.as_ref()
    }
}

/// Trimmed, bounded comment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    /// Trim and validate comment text.
    pub fn new(raw: &str) -> Result<Self, PostValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyComment);
        }
        if raw.chars().count() > COMMENT_CONTENT_MAX {
            return Err(PostValidationError::CommentTooLong { max: COMMENT_CONTENT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Comment as stored on a post, with its author populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment id.
    pub id: CommentId,
    /// Who wrote it.
    pub author: UserSummary,
    /// Trimmed text.
    pub content: String,
    /// When it was posted.
    pub created_at: DateTime<Utc>,
}

/// Post with author, comments and likes populated.
///
/// ## Invariants
/// - `content` is non-empty or `image_url` is present.
/// - `comments` are ordered oldest first.
/// - `likes` holds each user at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Post id.
    pub id: PostId,
    /// Who wrote it.
    pub author: UserSummary,
    /// Trimmed text.
    pub content: String,
    /// Hosted image, if any.
    pub image_url: Option<String>,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
    /// Users who like the post, each at most once.
    pub likes: Vec<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Bumped by edits, comments and likes.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether `user` wrote the post.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author.id == *user
    }

    /// Whether `user` currently likes the post.
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }
}

/// Insert model for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Id assigned by the service.
    pub id: PostId,
    /// Author.
    pub author_id: UserId,
    /// Trimmed text.
    pub content: String,
    /// Hosted image, if any.
    pub image_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Insert model for a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Id assigned by the service.
    pub id: CommentId,
    /// Post being commented on.
    pub post_id: PostId,
    /// Commenter.
    pub author_id: UserId,
    /// Trimmed text.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    /// The user was added to the like set.
    Liked,
    /// The user was removed from the like set.
    Unliked,
    /// A concurrent toggle added the like first; the set is unchanged.
    AlreadyLiked,
}
