//! Mark a target region and distractor regions on an image by clicking polygon
//! vertices, then turn them into binary masks, an annotated preview and a JSON
//! record.

pub mod app;
pub mod capture;
pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod image_io;
pub mod output;
pub mod prompt;
pub mod raster;
pub mod record;
pub mod session;
pub mod types;
