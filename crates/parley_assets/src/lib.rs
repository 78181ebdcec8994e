//! parley-assets: the collaborators behind image materialization.
//!
//! - [`AssetStore`] maps an opaque asset id to image bytes plus mime type.
//! - [`ImageResizer`] re-encodes an image under a named [`ResizeMode`].
//!
//! Both are async traits so callers can back them with a database, a remote
//! blob store or, as shipped here, memory and a plain directory.

pub mod asset;
pub mod dir_store;
pub mod error;
pub mod resize;

pub use asset::{Asset, AssetData, AssetStore, ImageMetadata, InMemoryAssetStore};
pub use dir_store::DirAssetStore;
pub use error::{AssetError, Result};
pub use resize::{ImageCrateResizer, ImageResizer, ResizeMode, ResizeRequest, ResizedImage};
