//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate with `diesel print-schema` or
//! update by hand.

diesel::table! {
    /// Registered accounts with their public profile.
    ///
    /// `username` and `email` carry unique constraints named
    /// `users_username_key` and `users_email_key`.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        headline -> Varchar,
        location -> Nullable<Varchar>,
        about -> Nullable<Text>,
        profile_picture -> Nullable<Text>,
        banner_img -> Nullable<Text>,
        skills -> Array<Text>,
        /// JSON array of experience entries (camelCase keys).
        experience -> Jsonb,
        /// JSON array of education entries (camelCase keys).
        education -> Jsonb,
        connections -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        content -> Varchar,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments, cascaded away with their post.
    post_comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        author_id -> Uuid,
        content -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Like set membership; the composite key makes a like unique per user.
    post_likes (post_id, user_id) {
        post_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        kind -> Varchar,
        actor_id -> Uuid,
        post_id -> Nullable<Uuid>,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(post_comments -> posts (post_id));
diesel::joinable!(post_likes -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(notifications, post_comments, post_likes, posts, users);
