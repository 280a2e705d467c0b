pub use zenbook_auth::Claims;
pub use zenbook_models::auth::{JwtResponse, LoginRequest, MessageResponse, SignupRequest};
