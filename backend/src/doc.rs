//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the request and response bodies
//! they exchange, and the session cookie security scheme. The document is
//! served by Swagger UI in debug builds and exported by
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{EducationEntry, Error, ErrorCode, ExperienceEntry};
use crate::inbound::http::dto::{
    AuthResponse, CommentRequest, CommentResponse, CreatePostRequest, LoginRequest,
    MessageResponse, PostResponse, ProfilePatchRequest, SignupRequest, UserResponse,
    UserSummaryResponse,
};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by signup and login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Proflink API",
        description = "Professional networking backend: accounts, profiles, posts, comments and likes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::posts::feed,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::user_posts,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignupRequest,
        LoginRequest,
        CreatePostRequest,
        CommentRequest,
        ProfilePatchRequest,
        UserResponse,
        UserSummaryResponse,
        CommentResponse,
        PostResponse,
        AuthResponse,
        MessageResponse,
        ExperienceEntry,
        EducationEntry,
    )),
    tags(
        (name = "auth", description = "Signup, login and session management"),
        (name = "posts", description = "Posts, comments and likes"),
        (name = "users", description = "Public profiles and self-service edits"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("UserResponse", "profilePicture")]
    #[case("PostResponse", "likes")]
    #[case("CommentResponse", "createdAt")]
    fn schemas_are_registered_in_camel_case(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/auth/signup")]
    #[case("/api/v1/posts/{id}/like")]
    #[case("/api/v1/posts/delete/{id}")]
    #[case("/api/v1/users/profile")]
    #[case("/api/v1/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn session_cookie_scheme_names_the_cookie() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("serialises");
        assert!(json.contains(SESSION_COOKIE_NAME));
    }
}
