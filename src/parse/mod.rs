pub mod path;
pub mod types;

pub use types::Document;
