pub mod manifest;
pub mod output;
pub mod source;
