use crate::error::Error;
use crate::error::ErrorKind;
use crate::id::ElementId;
use crate::id::VertexId;
use crate::reader::Reader;
use crate::units::UnitsSystem;
use itertools::Itertools as _;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str;

/// Coordinates of a vertex.
pub type Vertex = [f64; 3];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    Line,
    Triangle,
    Quad,
    Tetra,
    Wedge,
    Hex,
}

impl ElementType {
    /// Maps a UNV element descriptor (FE descriptor id) to its shape.
    ///
    /// Linear and parabolic variants share the same shape.
    pub fn from_descriptor(code: u32) -> Option<Self> {
        Some(match code {
            // rod, linear beam, tapered beam, parabolic beam
            11 | 21 | 22 | 24 => Self::Line,
            // plane stress and thin shell triangles
            41 | 42 | 91 | 92 => Self::Triangle,
            // plane stress and thin shell quadrilaterals, rigid element
            44 | 45 | 94 | 95 | 122 => Self::Quad,
            // solid linear and parabolic tetrahedra
            111 | 118 => Self::Tetra,
            112 => Self::Wedge,
            // solid linear and parabolic bricks
            115 | 116 => Self::Hex,
            _ => return None,
        })
    }

    pub fn dimension(self) -> usize {
        match self {
            ElementType::Line => 1,
            ElementType::Triangle | ElementType::Quad => 2,
            ElementType::Tetra | ElementType::Wedge | ElementType::Hex => 3,
        }
    }

    /// Whether records of this type carry a beam orientation record
    /// before their connectivity.
    pub(crate) fn is_beam(self) -> bool {
        self == ElementType::Line
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementType::Line => "line",
            ElementType::Triangle => "triangle",
            ElementType::Quad => "quad",
            ElementType::Tetra => "tetra",
            ElementType::Wedge => "wedge",
            ElementType::Hex => "hex",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    vertex_ids: Vec<VertexId>,
    element_type: ElementType,
}

impl Element {
    pub fn new(vertex_ids: Vec<VertexId>, element_type: ElementType) -> Self {
        Self {
            vertex_ids,
            element_type,
        }
    }

    pub fn vertex_ids(&self) -> &[VertexId] {
        &self.vertex_ids
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }
}

/// What the members of a group refer to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum GroupKind {
    #[default]
    Vertex,
    Element,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupKind::Vertex => "vertices",
            GroupKind::Element => "elements",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupMembers {
    Vertices(Vec<VertexId>),
    Elements(Vec<ElementId>),
}

/// A named set of vertices or elements, such as a boundary patch or a cell
/// zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    name: String,
    members: GroupMembers,
    element_types: BTreeSet<ElementType>,
}

impl Group {
    pub fn from_vertices(name: String, vertices: Vec<VertexId>) -> Self {
        Self {
            name,
            members: GroupMembers::Vertices(vertices),
            element_types: BTreeSet::new(),
        }
    }

    /// Builds an element group, collecting the types of its members from
    /// `mesh_elements`.
    ///
    /// # Panics
    ///
    /// This function panics if a member is out of bounds of `mesh_elements`.
    pub fn from_elements(
        name: String,
        elements: Vec<ElementId>,
        mesh_elements: &[Element],
    ) -> Self {
        let element_types = elements
            .iter()
            .map(|id| mesh_elements[id.index()].element_type())
            .collect();
        Self {
            name,
            members: GroupMembers::Elements(elements),
            element_types,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GroupKind {
        match self.members {
            GroupMembers::Vertices(_) => GroupKind::Vertex,
            GroupMembers::Elements(_) => GroupKind::Element,
        }
    }

    pub fn members(&self) -> &GroupMembers {
        &self.members
    }

    /// Dense indices of the members, into the sequence given by [`Group::kind`].
    pub fn member_indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match &self.members {
            GroupMembers::Vertices(ids) => Box::new(ids.iter().map(|id| id.index())),
            GroupMembers::Elements(ids) => Box::new(ids.iter().map(|id| id.index())),
        }
    }

    pub fn len(&self) -> usize {
        match &self.members {
            GroupMembers::Vertices(ids) => ids.len(),
            GroupMembers::Elements(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct types of the member elements. Empty for vertex groups.
    pub fn element_types(&self) -> &BTreeSet<ElementType> {
        &self.element_types
    }
}

/// Mesh read from a UNV file.
///
/// Vertices and elements are numbered in file order from 0, whatever ids the
/// file gave them.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    units: Option<UnitsSystem>,
    vertices: Vec<Vertex>,
    elements: Option<Vec<Element>>,
    groups: Option<Vec<Group>>,
}

impl Mesh {
    /// Assembles a mesh. Empty element and group lists and the "Unknown"
    /// unit system are stored as absent.
    pub fn from_parts(
        units: Option<UnitsSystem>,
        vertices: Vec<Vertex>,
        elements: Vec<Element>,
        groups: Vec<Group>,
    ) -> Self {
        Self {
            units: units.filter(UnitsSystem::is_known),
            vertices,
            elements: if elements.is_empty() {
                None
            } else {
                Some(elements)
            },
            groups: if groups.is_empty() {
                None
            } else {
                Some(groups)
            },
        }
    }

    /// Reads a UNV file.
    ///
    /// The file must exist and be a regular file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Mesh, Error> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::FileNotFound(path.to_path_buf()),
            _ => ErrorKind::Io(err),
        })?;
        if !metadata.is_file() {
            return Err(ErrorKind::NotARegularFile(path.to_path_buf()).into());
        }
        tracing::info!(path = %path.display(), "reading UNV mesh");
        let file = fs::File::open(path)?;
        Mesh::from_reader(io::BufReader::new(file))
    }

    /// Reads a UNV mesh from a buffered reader, until end of input.
    pub fn from_reader<R: io::BufRead>(input: R) -> Result<Mesh, Error> {
        Reader::new(input).read()
    }

    pub fn units(&self) -> Option<&UnitsSystem> {
        self.units.as_ref()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// # Panics
    ///
    /// This function panics if `id` is out of bounds.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    pub fn elements(&self) -> Option<&[Element]> {
        self.elements.as_deref()
    }

    /// # Panics
    ///
    /// This function panics if the mesh has no elements or if `id` is out of
    /// bounds.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements.as_deref().unwrap_or_default()[id.index()]
    }

    pub fn groups(&self) -> Option<&[Group]> {
        self.groups.as_deref()
    }

    /// Returns the first group named `name`.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|group| group.name() == name)
    }

    /// Returns the number of vertices of the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.as_ref().map_or(0, Vec::len)
    }

    pub fn element_type_counts(&self) -> HashMap<ElementType, usize> {
        self.elements
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Element::element_type)
            .counts()
    }
}

impl str::FromStr for Mesh {
    type Err = Error;

    fn from_str(s: &str) -> Result<Mesh, Error> {
        Mesh::from_reader(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors() {
        assert_eq!(ElementType::from_descriptor(21), Some(ElementType::Line));
        assert_eq!(ElementType::from_descriptor(91), Some(ElementType::Triangle));
        assert_eq!(ElementType::from_descriptor(94), Some(ElementType::Quad));
        assert_eq!(ElementType::from_descriptor(111), Some(ElementType::Tetra));
        assert_eq!(ElementType::from_descriptor(118), Some(ElementType::Tetra));
        assert_eq!(ElementType::from_descriptor(112), Some(ElementType::Wedge));
        assert_eq!(ElementType::from_descriptor(115), Some(ElementType::Hex));
        assert_eq!(ElementType::from_descriptor(0), None);
        assert_eq!(ElementType::from_descriptor(113), None);
    }

    #[test]
    fn test_from_parts_absent() {
        let mesh = Mesh::from_parts(
            Some(UnitsSystem::new(0, 1.0)),
            vec![[0.0; 3]],
            Vec::new(),
            Vec::new(),
        );
        assert!(mesh.units().is_none());
        assert!(mesh.elements().is_none());
        assert!(mesh.groups().is_none());
        assert_eq!(mesh.element_count(), 0);
        assert!(mesh.element_type_counts().is_empty());
        assert!(mesh.group("walls").is_none());
    }

    #[test]
    fn test_group_element_types() {
        let elements = vec![
            Element::new(vec![VertexId::new(0), VertexId::new(1)], ElementType::Line),
            Element::new(
                vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)],
                ElementType::Triangle,
            ),
            Element::new(
                vec![VertexId::new(1), VertexId::new(2), VertexId::new(3)],
                ElementType::Triangle,
            ),
        ];
        let group = Group::from_elements(
            String::from("faces"),
            vec![ElementId::new(1), ElementId::new(2)],
            &elements,
        );
        assert_eq!(group.kind(), GroupKind::Element);
        assert_eq!(group.len(), 2);
        assert_eq!(
            group.element_types().iter().copied().collect::<Vec<_>>(),
            [ElementType::Triangle],
        );
        assert_eq!(group.member_indices().collect::<Vec<_>>(), [1, 2]);

        let mesh = Mesh::from_parts(None, vec![[0.0; 3]; 4], elements, vec![group]);
        assert_eq!(mesh.element_type_counts()[&ElementType::Triangle], 2);
        assert_eq!(mesh.group("faces").map(Group::len), Some(2));
        assert_eq!(mesh.element(ElementId::new(0)).element_type(), ElementType::Line);
    }

    #[test]
    #[should_panic]
    fn test_element_out_of_bounds() {
        let mesh = Mesh::from_parts(None, vec![[0.0; 3]], Vec::new(), Vec::new());
        mesh.element(ElementId::new(0));
    }

    #[test]
    fn test_vertex_group() {
        let group = Group::from_vertices(String::new(), Vec::new());
        assert_eq!(group.kind(), GroupKind::Vertex);
        assert!(group.is_empty());
        assert!(group.element_types().is_empty());
    }
}
