pub mod dictionary;
pub mod error;
pub mod language;
pub mod locator;
pub mod lookup;
pub mod order;
pub mod position;
pub mod reading;
pub mod render;
pub mod segment;
pub mod selection;
pub mod session;
pub mod store;
pub mod workspace;

pub use error::AnnotateError;
pub use workspace::Workspace;
