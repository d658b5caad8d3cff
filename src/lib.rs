//! Reader for I-DEAS universal files (UNV), the text mesh exchange format
//! written by Salome, Gmsh, I-DEAS/NX and other pre-processors.
//!
//! A UNV file is a sequence of datasets, each opened and closed by a
//! `    -1` separator line and identified by a numeric tag. This crate reads
//! the datasets describing a mesh and skips the others:
//!
//! | Tag                  | Content                                    |
//! | -------------------- | ------------------------------------------ |
//! | 164                  | unit system                                |
//! | 2411                 | vertex coordinates                         |
//! | 2412                 | elements (connectivity and type)           |
//! | 2452, 2467, 2477     | named groups of vertices or elements       |
//! | 757                  | named groups of vertices (DOF sets)        |
//!
//! Vertices and elements are renumbered from 0 in file order; see [`id`].
//!
//! ```no_run
//! let mesh = unv::read("cylinder.unv")?;
//! println!("{} vertices", mesh.vertex_count());
//! for group in mesh.groups().unwrap_or_default() {
//!     println!("{}: {} {}", group.name(), group.len(), group.kind());
//! }
//! # Ok::<(), unv::Error>(())
//! ```

pub mod id;

mod error;
mod line;
mod mesh;
mod reader;
mod tag;
mod units;


pub use crate::error::Error;
pub use crate::error::ErrorKind;
pub use crate::error::Result;
pub use crate::id::ElementId;
pub use crate::id::FileId;
pub use crate::id::IdSpace;
pub use crate::id::VertexId;
pub use crate::mesh::Element;
pub use crate::mesh::ElementType;
pub use crate::mesh::Group;
pub use crate::mesh::GroupKind;
pub use crate::mesh::GroupMembers;
pub use crate::mesh::Mesh;
pub use crate::mesh::Vertex;
pub use crate::units::UnitsSystem;
pub use crate::units::UNIT_NAMES;

use std::path::Path;

/// Reads the UNV file at `path`.
///
/// Shorthand for [`Mesh::from_file`].
pub fn read(path: impl AsRef<Path>) -> Result<Mesh> {
    Mesh::from_file(path)
}
