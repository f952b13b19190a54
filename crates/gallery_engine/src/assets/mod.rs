//! Asset loading: OBJ geometry, MTL materials and images

pub mod image_loader;
pub mod mtl_parser;
pub mod obj_loader;

pub use image_loader::ImageData;
pub use mtl_parser::{MtlData, MtlParser};
pub use obj_loader::{MaterialGroup, ObjError, ObjLoader, ObjModel};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Malformed OBJ geometry
    #[error("OBJ error: {0}")]
    Obj(#[from] ObjError),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
