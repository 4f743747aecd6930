pub mod clean;
pub mod error;
pub mod preprocess;
pub mod sections;
