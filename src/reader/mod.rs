//! Tag-dispatched UNV reader.
//!
//! The input is read once, front to back. Sections that reference other
//! entities (elements, groups) keep the file ids they read; those are mapped
//! to dense ids once the whole input has been consumed.

use crate::error::Error;
use crate::error::ErrorKind;
use crate::id::ElementId;
use crate::id::FileId;
use crate::id::IdMap;
use crate::id::VertexId;
use crate::line::Lines;
use crate::mesh::Element;
use crate::mesh::ElementType;
use crate::mesh::Group;
use crate::mesh::Mesh;
use crate::mesh::Vertex;
use crate::tag::Tag;
use crate::units::UnitsSystem;
use std::io;

use self::groups::RawGroup;

mod groups;

/// Upper bound on capacities taken from counts declared in the file.
const PREALLOCATION_LIMIT: usize = 1024;

/// Element as read, vertices still referenced by file ids.
#[derive(Debug)]
struct RawElement {
    vertices: Vec<FileId>,
    element_type: ElementType,
    lineno: usize,
}

impl RawElement {
    fn resolve(self, vertex_ids: &IdMap<VertexId>) -> Result<Element, Error> {
        let vertices = vertex_ids
            .resolve_all(&self.vertices)
            .map_err(|kind| Error::at(self.lineno, kind))?;
        Ok(Element::new(vertices, self.element_type))
    }
}

#[derive(Debug)]
enum PendingGroup {
    Raw(RawGroup),
    Resolved(Group),
}

pub(crate) struct Reader<R> {
    lines: Lines<R>,
    units: Option<UnitsSystem>,
    vertices: Vec<Vertex>,
    vertex_ids: IdMap<VertexId>,
    elements: Vec<RawElement>,
    element_ids: IdMap<ElementId>,
    groups: Vec<PendingGroup>,
}

impl<R> Reader<R>
where
    R: io::BufRead,
{
    pub fn new(input: R) -> Self {
        Self {
            lines: Lines::new(input),
            units: None,
            vertices: Vec::new(),
            vertex_ids: IdMap::default(),
            elements: Vec::new(),
            element_ids: IdMap::default(),
            groups: Vec::new(),
        }
    }

    pub fn read(mut self) -> Result<Mesh, Error> {
        self.read_tags()?;
        self.finish()
    }

    fn read_tags(&mut self) -> Result<(), Error> {
        loop {
            let tag = match self.lines.next_line()? {
                Some(line) => {
                    let tag = line.tag();
                    if tag == Tag::Unsupported {
                        tracing::debug!(
                            lineno = line.lineno(),
                            tag = line.text().trim(),
                            "skipping unsupported section"
                        );
                    }
                    tag
                }
                None => break,
            };
            match tag {
                Tag::Separator => {}
                Tag::Units => self.read_units()?,
                Tag::Vertices => self.read_vertices()?,
                Tag::Elements => self.read_elements()?,
                Tag::Groups => self.read_groups()?,
                Tag::Dofs => self.read_dofs()?,
                Tag::Unsupported => self.lines.skip_section()?,
            }
        }
        Ok(())
    }

    fn read_units(&mut self) -> Result<(), Error> {
        let span = tracing::info_span!("read_units");
        let _enter = span.enter();

        // The name may touch the code: `I10,20A1,I10`.
        let code: usize = self
            .lines
            .expect_line("unit system code")?
            .integer_column(0, "unit system code")?;
        let length_scale = self
            .lines
            .expect_line("length scale")?
            .float_column(0, "length scale")?;
        // force and temperature scales
        self.lines.skip_section()?;

        let units = UnitsSystem::new(code, length_scale);
        tracing::debug!(units = units.repr(), length_scale, "read unit system");
        self.units = Some(units);
        Ok(())
    }

    fn read_vertices(&mut self) -> Result<(), Error> {
        let span = tracing::info_span!("read_vertices");
        let _enter = span.enter();
        let first = self.vertices.len();

        while let Some(header) = self.lines.next_line()? {
            if header.is_separator() {
                break;
            }
            let file_id: FileId = header.integer_column(0, "vertex id")?;

            let line = self.lines.expect_line("vertex coordinates")?;
            let vertex = [
                line.float_column(0, "x coordinate")?,
                line.float_column(1, "y coordinate")?,
                line.float_column(2, "z coordinate")?,
            ];

            self.vertex_ids.insert(file_id, self.vertices.len());
            self.vertices.push(vertex);
        }

        tracing::debug!(count = self.vertices.len() - first, "read vertices");
        Ok(())
    }

    fn read_elements(&mut self) -> Result<(), Error> {
        let span = tracing::info_span!("read_elements");
        let _enter = span.enter();
        let first = self.elements.len();

        while let Some(header) = self.lines.next_line()? {
            if header.is_separator() {
                break;
            }
            let lineno = header.lineno();
            let file_id: FileId = header.field(0, "element id")?;
            let descriptor: u32 = header.field(1, "element descriptor")?;
            let vertex_count: usize = header.field(5, "element vertex count")?;
            let element_type = ElementType::from_descriptor(descriptor)
                .ok_or_else(|| header.error(ErrorKind::UnknownElementType(descriptor)))?;

            if element_type.is_beam() {
                self.lines.expect_line("beam orientation record")?;
            }

            // Long connectivity lists wrap onto several lines.
            let mut vertices = Vec::with_capacity(vertex_count.min(PREALLOCATION_LIMIT));
            while vertices.len() < vertex_count {
                let line = self.lines.expect_line("element connectivity")?;
                let read = vertices.len();
                for token in line.fields().take(vertex_count - read) {
                    vertices.push(line.parse::<FileId>(token)?);
                }
                if vertices.len() == read {
                    return Err(line.error(ErrorKind::MissingField {
                        expected: "element vertex id",
                    }));
                }
            }

            self.element_ids.insert(file_id, self.elements.len());
            self.elements.push(RawElement {
                vertices,
                element_type,
                lineno,
            });
        }

        tracing::debug!(count = self.elements.len() - first, "read elements");
        Ok(())
    }

    /// Reads a point group: header, name, then one vertex id per line.
    fn read_dofs(&mut self) -> Result<(), Error> {
        let span = tracing::info_span!("read_dofs");
        let _enter = span.enter();

        match self.lines.next_line()? {
            Some(header) if !header.is_separator() => {}
            _ => return Ok(()),
        }
        let name = self
            .lines
            .expect_line("point group name")?
            .first_token()
            .to_owned();

        let mut vertices = Vec::new();
        while let Some(line) = self.lines.next_line()? {
            if line.is_separator() {
                break;
            }
            let file_id: FileId = line.field(0, "point group vertex id")?;
            let id = self
                .vertex_ids
                .resolve(file_id)
                .map_err(|kind| line.error(kind))?;
            vertices.push(id);
        }

        tracing::debug!(%name, count = vertices.len(), "read point group");
        self.groups
            .push(PendingGroup::Resolved(Group::from_vertices(name, vertices)));
        Ok(())
    }

    /// Maps deferred file ids to dense ids and builds the mesh.
    fn finish(self) -> Result<Mesh, Error> {
        let Reader {
            units,
            vertices,
            vertex_ids,
            elements,
            element_ids,
            groups,
            ..
        } = self;

        let elements = elements
            .into_iter()
            .map(|element| element.resolve(&vertex_ids))
            .collect::<Result<Vec<_>, _>>()?;

        let groups = groups
            .into_iter()
            .map(|group| match group {
                PendingGroup::Raw(group) => group.resolve(&vertex_ids, &element_ids, &elements),
                PendingGroup::Resolved(group) => Ok(group),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mesh = Mesh::from_parts(units, vertices, elements, groups);
        tracing::info!(
            vertices = mesh.vertex_count(),
            elements = mesh.element_count(),
            groups = mesh.groups().map_or(0, <[Group]>::len),
            "assembled mesh"
        );
        Ok(mesh)
    }
}
