pub use zenbook_models::teachers::Teacher;
