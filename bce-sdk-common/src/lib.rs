pub mod encode;
pub mod error;
pub mod helper;

pub use error::Error;
