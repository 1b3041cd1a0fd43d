//! Vector paths and their identities.
//!
//! Responsibilities:
//! - path IDs: allocation, packing for ID targets, depth mapping input
//! - path geometry: builder, curve flattening, stencil-fan meshes

mod builder;
mod error;
mod flatten;
mod id;
mod mesh;

pub use builder::{Path, PathBuilder, PathEl};
pub use error::PathError;
pub use flatten::{flatten, Contour};
pub use id::{PathId, PathIdAllocator, MAX_PATH_ID};
pub(crate) use id::pack_path_index;
pub use mesh::{FillRule, PathMesh};
