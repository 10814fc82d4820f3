//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Uniqueness of `username` and `email` is enforced by the table's unique
//! constraints; violations come back as `UserPersistenceError::Duplicate`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{
    EducationEntry, EmailAddress, ExperienceEntry, PasswordHash, PersonName, Profile,
    ProfileUpdate, User, UserId, Username,
};

use super::error_mapping::{map_user_diesel_error, map_user_pool_error};
use super::models::{NewUserRow, ProfileChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

enum Lookup {
    Id(uuid::Uuid),
    Username(String),
    Email(String),
}

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_row(&self, by: Lookup) -> Result<Option<UserRow>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let query = users::table.select(UserRow::as_select());
        let result = match by {
            Lookup::Id(id) => query.filter(users::id.eq(id)).first(&mut conn).await,
            Lookup::Username(username) => {
                query
                    .filter(users::username.eq(username))
                    .first(&mut conn)
                    .await
            }
            Lookup::Email(email) => query.filter(users::email.eq(email)).first(&mut conn).await,
        };
        result.optional().map_err(map_user_diesel_error)
    }

    async fn find_user(&self, by: Lookup) -> Result<Option<User>, UserPersistenceError> {
        self.find_row(by)
            .await?
            .map(|row| row_to_user(row).map(|(user, _)| user))
            .transpose()
    }
}

fn json_list<T: serde::Serialize>(values: &[T]) -> Result<serde_json::Value, UserPersistenceError> {
    serde_json::to_value(values)
        .map_err(|err| UserPersistenceError::query(format!("encode profile entries: {err}")))
}

fn decode_entries<T: serde::de::DeserializeOwned>(
    user_id: uuid::Uuid,
    column: &'static str,
    value: serde_json::Value,
) -> Vec<T> {
    serde_json::from_value(value).unwrap_or_else(|err| {
        warn!(%user_id, column, %err, "discarding undecodable profile entries");
        Vec::new()
    })
}

/// Convert a database row to a domain user, returning the stored hash too.
fn row_to_user(row: UserRow) -> Result<(User, PasswordHash), UserPersistenceError> {
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let name = PersonName::new(&row.name).map_err(invalid)?;
    let username = Username::new(&row.username).map_err(invalid)?;
    let email = EmailAddress::new(&row.email).map_err(invalid)?;
    let experience: Vec<ExperienceEntry> = decode_entries(row.id, "experience", row.experience);
    let education: Vec<EducationEntry> = decode_entries(row.id, "education", row.education);
    let user = User {
        id: UserId::from_uuid(row.id),
        name,
        username,
        email,
        profile: Profile {
            headline: row.headline,
            location: row.location,
            about: row.about,
            profile_picture: row.profile_picture,
            banner_img: row.banner_img,
            skills: row.skills,
            experience,
            education,
        },
        connections: row.connections.into_iter().map(UserId::from_uuid).collect(),
        created_at: row.created_at,
    };
    Ok((user, PasswordHash::new(row.password_hash)))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let profile = &user.profile;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            name: user.name.as_ref(),
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: password_hash.as_str(),
            headline: &profile.headline,
            location: profile.location.as_deref(),
            about: profile.about.as_deref(),
            profile_picture: profile.profile_picture.as_deref(),
            banner_img: profile.banner_img.as_deref(),
            skills: &profile.skills,
            experience: json_list(&profile.experience)?,
            education: json_list(&profile.education)?,
            connections: user.connections.iter().map(|id| *id.as_uuid()).collect(),
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_user_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.find_user(Lookup::Id(*id.as_uuid())).await
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.find_user(Lookup::Username(username.to_string())).await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.find_user(Lookup::Email(email.to_string())).await
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        self.find_row(Lookup::Username(username.to_string()))
            .await?
            .map(|row| {
                row_to_user(row).map(|(user, password_hash)| StoredCredentials {
                    user,
                    password_hash,
                })
            })
            .transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let changes = ProfileChangeset {
            name: update.name.as_ref().map(AsRef::as_ref),
            headline: update.headline.as_deref(),
            about: update.about.as_deref(),
            location: update.location.as_deref(),
            profile_picture: update.profile_picture.as_deref(),
            banner_img: update.banner_img.as_deref(),
            skills: update.skills.as_deref(),
            experience: update.experience.as_deref().map(json_list).transpose()?,
            education: update.education.as_deref().map(json_list).transpose()?,
            updated_at: Utc::now(),
        };
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;
        row.map(|row| row_to_user(row).map(|(user, _)| user))
            .transpose()
    }
}
