//! Identifier spaces.
//!
//! UNV records carry the ids the exporting tool assigned ([`FileId`]). They
//! are arbitrary keys: neither contiguous nor ordered. Once read, vertices and
//! elements are addressed by their position in the mesh ([`VertexId`],
//! [`ElementId`]). [`IdMap`] links the two spaces.

use crate::error::ErrorKind;
use std::collections::HashMap;
use std::fmt;
use std::num;
use std::str;

/// Id of a vertex or an element as written in the file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u64);

impl FileId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl str::FromStr for FileId {
    type Err = num::ParseIntError;

    fn from_str(s: &str) -> Result<FileId, num::ParseIntError> {
        s.parse().map(FileId)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdSpace {
    Vertex,
    Element,
}

impl fmt::Display for IdSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdSpace::Vertex => "vertex",
            IdSpace::Element => "element",
        })
    }
}

/// A 0-based index into one of the mesh's entity sequences.
pub trait DenseId: Copy {
    const SPACE: IdSpace;

    fn from_index(index: usize) -> Self;

    fn index(self) -> usize;
}

macro_rules! dense_id {
    ( $(#[$attr:meta])* $name:ident, $space:expr ) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0
            }
        }

        impl DenseId for $name {
            const SPACE: IdSpace = $space;

            fn from_index(index: usize) -> Self {
                $name::new(index)
            }

            fn index(self) -> usize {
                $name::index(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

dense_id!(
    /// Position of a vertex in [`Mesh::vertices`](crate::Mesh::vertices).
    VertexId,
    IdSpace::Vertex
);

dense_id!(
    /// Position of an element in [`Mesh::elements`](crate::Mesh::elements).
    ElementId,
    IdSpace::Element
);

/// Lookup table from file-native ids to dense ids, filled in read order.
#[derive(Debug)]
pub(crate) struct IdMap<I> {
    ids: HashMap<FileId, I>,
}

impl<I> Default for IdMap<I> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
        }
    }
}

impl<I> IdMap<I>
where
    I: DenseId,
{
    /// Binds `file_id` to the entity at `index`. A repeated file id is
    /// rebound to the latest entity.
    pub fn insert(&mut self, file_id: FileId, index: usize) {
        self.ids.insert(file_id, I::from_index(index));
    }

    pub fn resolve(&self, file_id: FileId) -> Result<I, ErrorKind> {
        self.ids
            .get(&file_id)
            .copied()
            .ok_or(ErrorKind::MissingRemapKey {
                space: I::SPACE,
                id: file_id,
            })
    }

    pub fn resolve_all(&self, file_ids: &[FileId]) -> Result<Vec<I>, ErrorKind> {
        file_ids.iter().map(|id| self.resolve(*id)).collect()
    }
}
