mod basic;
mod multipart;
mod types_rs;

pub use basic::ByteStream;
pub use multipart::{PartRange, UploadSession, plan_parts};
pub use types_rs::*;
