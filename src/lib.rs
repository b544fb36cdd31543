pub mod codegen;
pub mod error;
pub mod model;
pub mod parse;
pub mod source;
