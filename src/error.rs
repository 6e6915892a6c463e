// One error type for the whole tool.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Reading/decoding the source image failed
    #[error("Image load error ({}): {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoding/writing an output raster failed
    #[error("Image save error ({}): {source}", .path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The persisted annotation record is missing required fields or is not a record at all
    #[error("Malformed annotation record: {0}")]
    MalformedRecord(String),

    /// Turning an annotation set into JSON failed
    #[error("Record encode error: {0}")]
    RecordEncode(#[from] serde_json::Error),

    /// The config file exists but cannot be used
    #[error("Config error: {0}")]
    Config(String),

    /// stdin reached EOF while we were waiting for an answer
    #[error("Input closed while waiting for: {0}")]
    InputClosed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
