//! Domain definitions.

pub mod admin;
pub mod import;
pub mod location;
pub mod project;

pub use self::project::Project;
