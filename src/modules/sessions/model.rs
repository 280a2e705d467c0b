pub use zenbook_models::sessions::{Session, SessionDto};
