pub use zenbook_models::users::User;
