//! JSON request and response bodies for the REST API.
//!
//! Request bodies default missing fields so the domain constructors, not
//! serde, decide what "missing" means and produce the documented messages.
//! Response bodies are camelCase projections of domain types and never carry
//! password hashes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Comment, EducationEntry, ExperienceEntry, LoginCredentials, LoginValidationError, Post,
    ProfileDraft, Registration, RegistrationValidationError, User, UserSummary,
};

/// Body of `POST /api/v1/auth/signup`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    /// Display name.
    #[schema(example = "Alice Example")]
    pub name: String,
    /// Unique handle.
    #[schema(example = "alice")]
    pub username: String,
    /// Unique contact address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Plaintext password, at least six characters.
    #[schema(example = "secret1")]
    pub password: String,
}

impl TryFrom<SignupRequest> for Registration {
    type Error = RegistrationValidationError;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.username, &value.email, &value.password)
    }
}

/// Body of `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    /// Handle chosen at signup.
    #[schema(example = "alice")]
    pub username: String,
    /// Plaintext password.
    #[schema(example = "secret1")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Body of `POST /api/v1/posts/create`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePostRequest {
    /// Post text.
    #[schema(example = "Hello world")]
    pub content: Option<String>,
    /// Image as a `data:image/...;base64,` URL.
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub image: Option<String>,
}

/// Body of `POST /api/v1/posts/{id}/comment`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentRequest {
    /// Comment text.
    #[schema(example = "Nice!")]
    pub content: String,
}

/// Body of `PUT /api/v1/users/profile`. Only these fields may be edited.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatchRequest {
    /// New display name.
    pub name: Option<String>,
    /// New headline.
    pub headline: Option<String>,
    /// New about section.
    pub about: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New avatar URL.
    pub profile_picture: Option<String>,
    /// New banner URL.
    pub banner_img: Option<String>,
    /// Replacement skill list.
    pub skills: Option<Vec<String>>,
    /// Replacement work history.
    pub experience: Option<Vec<ExperienceEntry>>,
    /// Replacement education history.
    pub education: Option<Vec<EducationEntry>>,
}

impl From<ProfilePatchRequest> for ProfileDraft {
    fn from(value: ProfilePatchRequest) -> Self {
        Self {
            name: value.name,
            headline: value.headline,
            about: value.about,
            location: value.location,
            profile_picture: value.profile_picture,
            banner_img: value.banner_img,
            skills: value.skills,
            experience: value.experience,
            education: value.education,
        }
    }
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User id.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unique handle.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Short tagline.
    pub headline: String,
    /// Where the user is based.
    pub location: Option<String>,
    /// About section.
    pub about: Option<String>,
    /// Avatar URL.
    pub profile_picture: Option<String>,
    /// Banner URL.
    pub banner_img: Option<String>,
    /// Listed skills.
    pub skills: Vec<String>,
    /// Work history.
    pub experience: Vec<ExperienceEntry>,
    /// Education history.
    pub education: Vec<EducationEntry>,
    /// Ids of connected users.
    pub connections: Vec<String>,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            name,
            username,
            email,
            profile,
            connections,
            created_at,
        } = user;
        Self {
            id: id.to_string(),
            name: name.into(),
            username: username.into(),
            email: email.into(),
            headline: profile.headline,
            location: profile.location,
            about: profile.about,
            profile_picture: profile.profile_picture,
            banner_img: profile.banner_img,
            skills: profile.skills,
            experience: profile.experience,
            education: profile.education,
            connections: connections.iter().map(ToString::to_string).collect(),
            created_at,
        }
    }
}

/// Author projection embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    /// User id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unique handle.
    pub username: String,
    /// Avatar URL.
    pub profile_picture: Option<String>,
    /// Short tagline.
    pub headline: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            username: summary.username,
            profile_picture: summary.profile_picture,
            headline: summary.headline,
        }
    }
}

/// Comment with its author populated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    /// Comment id.
    pub id: String,
    /// Comment author.
    pub user: UserSummaryResponse,
    /// Comment text.
    pub content: String,
    /// When the comment was made.
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            user: comment.author.into(),
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// Post with author, comments and likes populated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Post id.
    pub id: String,
    /// Post author.
    pub author: UserSummaryResponse,
    /// Post text; empty for image-only posts.
    pub content: String,
    /// Hosted image URL.
    pub image: Option<String>,
    /// Comments, oldest first.
    pub comments: Vec<CommentResponse>,
    /// Ids of users who like the post.
    pub likes: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            author: post.author.into(),
            content: post.content,
            image: post.image_url,
            comments: post.comments.into_iter().map(Into::into).collect(),
            likes: post.likes.iter().map(ToString::to_string).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Signup and login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Outcome summary.
    #[schema(example = "User registered successfully")]
    pub message: String,
    /// The signed-in user.
    pub user: UserResponse,
}

/// Acknowledgement with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

impl MessageResponse {
    /// Wrap `message` for the response body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
