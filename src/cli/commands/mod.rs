//! CLI command implementations

pub mod decode;
pub mod init;
pub mod representation;
pub mod validate;
