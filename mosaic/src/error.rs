use nexrad::{NexradError, ProductKey};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("malformed tile: {0}")]
    MalformedTile(#[from] NexradError),

    #[error("{0} has no drawable extent")]
    EmptyMosaic(ProductKey),

    #[error("{key} is {width}x{height} pixels, limit is {limit}")]
    TooLarge {
        key: ProductKey,
        width: u32,
        height: u32,
        limit: u32,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Image(#[from] image::ImageError),
}
