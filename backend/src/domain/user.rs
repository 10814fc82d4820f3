//! User aggregate and its validated building blocks.
//!
//! Names, usernames and email addresses are normalised on construction so the
//! repository only ever stores canonical forms. Profile fields are free text
//! bounded in length; the public projection never carries a password hash.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identifier::define_uuid_id;

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 30;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 320;
/// Maximum allowed length for a person's name.
pub const NAME_MAX: usize = 100;
/// Maximum allowed length for short profile fields (headline, location).
pub const SHORT_FIELD_MAX: usize = 200;
/// Maximum allowed length for the free-form "about" section.
pub const ABOUT_MAX: usize = 2_000;
/// Headline shown for accounts that have not written their own.
pub const DEFAULT_HEADLINE: &str = "Proflink User";

/// Validation errors raised by the user building blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Name is blank.
    EmptyName,
    /// Name exceeds `max` characters.
    NameTooLong { max: usize },
    /// Username is blank.
    EmptyUsername,
    /// Username is shorter than `min` characters.
    UsernameTooShort { min: usize },
    /// Username exceeds `max` characters.
    UsernameTooLong { max: usize },
    /// Username has characters outside `[A-Za-z0-9_]`.
    UsernameInvalidCharacters,
    /// Email is blank.
    EmptyEmail,
    /// Email is not of the form `local@domain`.
    InvalidEmail,
    /// A free-text field exceeds `max` characters.
    FieldTooLong { field: &'static str, max: usize },
    /// A required field is blank.
    EmptyField { field: &'static str },
}

impl UserValidationError {
    /// Name of the offending request field, used in error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyUsername
            | Self::UsernameTooShort { .. }
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters => "username",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::FieldTooLong { field, .. } | Self::EmptyField { field } => field,
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, dashes or underscores",
            ),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

define_uuid_id!(
    /// Stable user identifier.
    UserId,
    "user id"
);

/// Unique public handle, used in profile URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Trim and validate a username.
    ///
    /// # Examples
    /// ```
    /// use proflink::domain::Username;
    ///
    /// let username = Username::new("  alice_01 ").expect("valid username");
    /// assert_eq!(username.as_ref(), "alice_01");
    /// assert!(Username::new("al").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
        if !trimmed.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lower-cased email address with a single `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim, lower-case and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::FieldTooLong {
                field: "email",
                max: EMAIL_MAX,
            });
        }
        let mut parts = normalised.split('@');
        let well_formed = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !normalised.chars().any(char::is_whitespace)
            }
            _ => false,
        };
        if !well_formed {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Full name shown on profiles and posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Trim and validate a person's name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A position held by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    /// Job title.
    #[schema(example = "Staff Engineer")]
    pub title: String,
    /// Employer.
    #[schema(example = "Acme")]
    pub company: String,
    /// First day.
    #[schema(value_type = String, format = Date, example = "2021-04-01")]
    pub start_date: NaiveDate,
    /// Last day; absent while current.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    /// What the role involved.
    #[serde(default)]
    pub description: String,
    /// Whether the position is current.
    #[serde(default)]
    pub currently_working: bool,
}

/// A school attended by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    /// Institution name.
    #[schema(example = "University of Edinburgh")]
    pub school: String,
    /// Subject studied.
    #[serde(default)]
    #[schema(example = "Informatics")]
    pub field_of_study: String,
    /// Year studies began.
    #[serde(default)]
    #[schema(example = 2015)]
    pub start_year: Option<i32>,
    /// Year studies ended.
    #[serde(default)]
    pub end_year: Option<i32>,
}

/// Editable profile section of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Short tagline.
    pub headline: String,
    /// Where the user is based.
    pub location: Option<String>,
    /// Free-text biography.
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
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            headline: DEFAULT_HEADLINE.to_owned(),
            location: None,
            about: None,
            profile_picture: None,
            banner_img: None,
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
        }
    }
}

/// Application user as seen by the domain.
///
/// ## Invariants
/// - `username` and `email` are unique across all users (enforced by stores).
/// - `connections` never contains the user's own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub name: PersonName,
    /// Unique handle.
    pub username: Username,
    /// Unique contact address.
    pub email: EmailAddress,
    /// Editable profile section.
    pub profile: Profile,
    /// Users in this user's network.
    pub connections: Vec<UserId>,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Author set for the user's feed: themselves plus their connections.
    pub fn feed_authors(&self) -> Vec<UserId> {
        let mut authors = Vec::with_capacity(self.connections.len() + 1);
        authors.push(self.id);
        authors.extend(self.connections.iter().filter(|id| **id != self.id).copied());
        authors
    }

    /// Compact projection embedded in posts and comments.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.to_string(),
            username: self.username.to_string(),
            profile_picture: self.profile.profile_picture.clone(),
            headline: self.profile.headline.clone(),
        }
    }
}

/// Author projection populated into posts and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique handle.
    pub username: String,
    /// Avatar URL.
    pub profile_picture: Option<String>,
    /// Short tagline.
    pub headline: String,
}

/// Partial profile edit; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Validated display name.
    pub name: Option<PersonName>,
    /// Short tagline.
    pub headline: Option<String>,
    /// About section.
    pub about: Option<String>,
    /// Where the user is based.
    pub location: Option<String>,
    /// Avatar URL.
    pub profile_picture: Option<String>,
    /// Banner URL.
    pub banner_img: Option<String>,
    /// Replaces the whole skill list.
    pub skills: Option<Vec<String>>,
    /// Replaces the whole work history.
    pub experience: Option<Vec<ExperienceEntry>>,
    /// Replaces the whole education history.
    pub education: Option<Vec<EducationEntry>>,
}

fn bounded(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, UserValidationError> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.chars().count() > max {
                return Err(UserValidationError::FieldTooLong { field, max });
            }
            Ok(Some(trimmed.to_owned()))
        }
        None => Ok(None),
    }
}

/// Unvalidated profile edit as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Raw display name.
    pub name: Option<String>,
    /// Raw headline.
    pub headline: Option<String>,
    /// Raw about section.
    pub about: Option<String>,
    /// Raw location.
    pub location: Option<String>,
    /// Avatar URL.
    pub profile_picture: Option<String>,
    /// Banner URL.
    pub banner_img: Option<String>,
    /// Skill list.
    pub skills: Option<Vec<String>>,
    /// Work history.
    pub experience: Option<Vec<ExperienceEntry>>,
    /// Education history.
    pub education: Option<Vec<EducationEntry>>,
}

impl TryFrom<ProfileDraft> for ProfileUpdate {
    type Error = UserValidationError;

    fn try_from(draft: ProfileDraft) -> Result<Self, Self::Error> {
        let ProfileDraft {
            name,
            headline,
            about,
            location,
            profile_picture,
            banner_img,
            skills,
            experience,
            education,
        } = draft;
        let name = name.map(PersonName::new).transpose()?;
        let headline = bounded("headline", headline, SHORT_FIELD_MAX)?;
        let location = bounded("location", location, SHORT_FIELD_MAX)?;
        let about = bounded("about", about, ABOUT_MAX)?;
        let skills = skills
            .map(|list| {
                list.into_iter()
                    .map(|skill| skill.trim().to_owned())
                    .filter(|skill| !skill.is_empty())
                    .map(|skill| {
                        if skill.chars().count() > SHORT_FIELD_MAX {
                            Err(UserValidationError::FieldTooLong {
                                field: "skills",
                                max: SHORT_FIELD_MAX,
                            })
                        } else {
                            Ok(skill)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        if let Some(entries) = &experience {
            if entries
                .iter()
                .any(|entry| entry.title.trim().is_empty() || entry.company.trim().is_empty())
            {
                return Err(UserValidationError::EmptyField { field: "experience" });
            }
        }
        if let Some(entries) = &education {
            if entries.iter().any(|entry| entry.school.trim().is_empty()) {
                return Err(UserValidationError::EmptyField { field: "education" });
            }
        }
        Ok(Self {
            name,
            headline,
            about,
            location,
            profile_picture,
            banner_img,
            skills,
            experience,
            education,
        })
    }
}

impl ProfileUpdate {
    /// Apply the update to `user` in place.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        let profile = &mut user.profile;
        if let Some(headline) = &self.headline {
            profile.headline = headline.clone();
        }
        if let Some(about) = &self.about {
            profile.about = Some(about.clone());
        }
        if let Some(location) = &self.location {
            profile.location = Some(location.clone());
        }
        if let Some(picture) = &self.profile_picture {
            profile.profile_picture = Some(picture.clone());
        }
        if let Some(banner) = &self.banner_img {
            profile.banner_img = Some(banner.clone());
        }
        if let Some(skills) = &self.skills {
            profile.skills = skills.clone();
        }
        if let Some(experience) = &self.experience {
            profile.experience = experience.clone();
        }
        if let Some(education) = &self.education {
            profile.education = education.clone();
        }
    }
}

#[cfg(test)]
mod tests;
