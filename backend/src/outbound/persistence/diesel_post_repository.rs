//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Posts are read in batches: one query for the post rows, then one each for
//! their comments, likes and the users they reference. Like toggles run in a
//! transaction: delete the membership row and insert it only when nothing
//! was deleted.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{
    Comment, CommentId, LikeToggle, NewComment, NewPost, Post, PostId, UserId, UserSummary,
};

use super::error_mapping::{map_post_diesel_error, map_post_pool_error};
use super::models::{
    CommentRow, LikeRow, NewCommentRow, NewLikeRow, NewPostRow, PostRow, UserSummaryRow,
};
use super::pool::DbPool;
use super::schema::{post_comments, post_likes, posts, users};

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn summary_from_row(row: UserSummaryRow) -> UserSummary {
    UserSummary {
        id: UserId::from_uuid(row.id),
        name: row.name,
        username: row.username,
        profile_picture: row.profile_picture,
        headline: row.headline,
    }
}

/// Placeholder for users that vanished between queries.
fn missing_summary(id: Uuid) -> UserSummary {
    UserSummary {
        id: UserId::from_uuid(id),
        name: String::new(),
        username: String::new(),
        profile_picture: None,
        headline: String::new(),
    }
}

/// Attach comments, likes and author projections to post rows, keeping
/// the rows' order.
async fn populate(
    conn: &mut AsyncPgConnection,
    rows: Vec<PostRow>,
) -> Result<Vec<Post>, diesel::result::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let post_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let comment_rows: Vec<CommentRow> = post_comments::table
        .filter(post_comments::post_id.eq_any(&post_ids))
        .order((post_comments::created_at.asc(), post_comments::id.asc()))
        .select(CommentRow::as_select())
        .load(conn)
        .await?;
    let like_rows: Vec<LikeRow> = post_likes::table
        .filter(post_likes::post_id.eq_any(&post_ids))
        .order(post_likes::created_at.asc())
        .select(LikeRow::as_select())
        .load(conn)
        .await?;

    let mut user_ids: Vec<Uuid> = rows
        .iter()
        .map(|row| row.author_id)
        .chain(comment_rows.iter().map(|row| row.author_id))
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let summaries: HashMap<Uuid, UserSummary> = users::table
        .filter(users::id.eq_any(&user_ids))
        .select(UserSummaryRow::as_select())
        .load(conn)
        .await?
        .into_iter()
        .map(|row| (row.id, summary_from_row(row)))
        .collect();
    let summary = |id: Uuid| {
        summaries
            .get(&id)
            .cloned()
            .unwrap_or_else(|| missing_summary(id))
    };

    let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for row in comment_rows {
        comments.entry(row.post_id).or_default().push(Comment {
            id: CommentId::from_uuid(row.id),
            author: summary(row.author_id),
            content: row.content,
            created_at: row.created_at,
        });
    }
    let mut likes: HashMap<Uuid, Vec<UserId>> = HashMap::new();
    for row in like_rows {
        likes
            .entry(row.post_id)
            .or_default()
            .push(UserId::from_uuid(row.user_id));
    }

    Ok(rows
        .into_iter()
        .map(|row| Post {
            id: PostId::from_uuid(row.id),
            author: summary(row.author_id),
            content: row.content,
            image_url: row.image_url,
            comments: comments.remove(&row.id).unwrap_or_default(),
            likes: likes.remove(&row.id).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect())
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<(), PostPersistenceError> {
        let row = NewPostRow {
            id: *post.id.as_uuid(),
            author_id: *post.author_id.as_uuid(),
            content: &post.content,
            image_url: post.image_url.as_deref(),
            created_at: post.created_at,
            updated_at: post.created_at,
        };
        let mut conn = self.pool.get().await.map_err(map_post_pool_error)?;
        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_post_diesel_error(err, &post.id.to_string()))
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_post_pool_error)?;
        let map_err = |err| map_post_diesel_error(err, &id.to_string());
        let row: Option<PostRow> = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut populated = populate(&mut conn, vec![row]).await.map_err(map_err)?;
        Ok(populated.pop())
    }

    async fn list_by_authors(&self, authors: &[UserId]) -> Result<Vec<Post>, PostPersistenceError> {
        let author_ids: Vec<Uuid> = authors.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_post_pool_error)?;
        let map_err = |err| map_post_diesel_error(err, "");
        let rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq_any(&author_ids))
            .order((posts::created_at.desc(), posts::id.desc()))
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_err)?;
        populate(&mut conn, rows).await.map_err(map_err)
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_post_pool_error)?;
        let deleted = diesel::delete(posts::table.filter(posts::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_post_diesel_error(err, &id.to_string()))?;
        Ok(deleted > 0)
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<(), PostPersistenceError> {
        let row = NewCommentRow {
            id: *comment.id.as_uuid(),
            post_id: *comment.post_id.as_uuid(),
            author_id: *comment.author_id.as_uuid(),
            content: &comment.content,
            created_at: comment.created_at,
        };
        let post_id = *comment.post_id.as_uuid();
        let touched_at = comment.created_at;
        let mut conn = self.pool.get().await.map_err(map_post_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(post_comments::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::update(posts::table.filter(posts::id.eq(post_id)))
                    .set(posts::updated_at.eq(touched_at))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_post_diesel_error(err, &comment.post_id.to_string()))
    }

    async fn toggle_like(
        &self,
        post: &PostId,
        user: &UserId,
    ) -> Result<LikeToggle, PostPersistenceError> {
        let like = NewLikeRow {
            post_id: *post.as_uuid(),
            user_id: *user.as_uuid(),
        };
        let mut conn = self.pool.get().await.map_err(map_post_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let removed = diesel::delete(
                    post_likes::table
                        .filter(post_likes::post_id.eq(like.post_id))
                        .filter(post_likes::user_id.eq(like.user_id)),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    return Ok(LikeToggle::Unliked);
                }
                let inserted = diesel::insert_into(post_likes::table)
                    .values(&like)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                Ok(like_outcome(removed, inserted))
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_post_diesel_error(err, &post.to_string()))
    }
}

/// Classify a toggle from the rows its delete and insert touched.
fn like_outcome(removed: usize, inserted: usize) -> LikeToggle {
    match (removed, inserted) {
        (0, 0) => LikeToggle::AlreadyLiked,
        (0, _) => LikeToggle::Liked,
        _ => LikeToggle::Unliked,
    }
}
