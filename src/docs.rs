use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{JwtResponse, LoginRequest, MessageResponse, SignupRequest};
use crate::modules::sessions::model::{Session, SessionDto};
use crate::modules::teachers::model::Teacher;
use crate::modules::users::model::User;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::sessions::controller::get_sessions,
        crate::modules::sessions::controller::get_session,
        crate::modules::sessions::controller::create_session,
        crate::modules::sessions::controller::update_session,
        crate::modules::sessions::controller::delete_session,
        crate::modules::sessions::controller::participate,
        crate::modules::sessions::controller::no_longer_participate,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            JwtResponse,
            MessageResponse,
            ErrorResponse,
            Session,
            SessionDto,
            Teacher,
            User,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Sessions", description = "Yoga sessions and participation"),
        (name = "Teachers", description = "Studio teachers"),
        (name = "Users", description = "Member accounts")
    ),
    info(
        title = "Zenbook API",
        version = "0.1.0",
        description = "Booking API for a yoga studio: sessions, teachers and members, with JWT authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/auth/login",
            "/api/auth/register",
            "/api/sessions",
            "/api/sessions/{id}",
            "/api/sessions/{id}/participants/{user_id}",
            "/api/teachers",
            "/api/teachers/{id}",
            "/api/users/{id}",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
