use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image: {0}")]
    Read(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Image has zero width or height")]
    Empty,
}
