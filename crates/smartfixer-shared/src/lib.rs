//! # smartfixer-shared
//!
//! Types shared by every SmartFixer crate: the diagnosis wire model, service
//! categories, constants, and the image preparation utility used before a
//! photo is attached to a request.

pub mod constants;
pub mod error;
pub mod image;
pub mod protocol;
pub mod types;

pub use error::{ImageError, SharedError};
pub use self::image::{prepare_image, prepare_image_bytes, PreparedImage};
pub use protocol::{DiagnosisRequest, DiagnosisResult, ImageAttachment};
pub use types::Category;
