/// Width of the tag field at the start of a tag line.
pub const TAG_WIDTH: usize = 6;

pub mod code {
    pub const SEPARATOR: &str = "    -1";
    pub const UNITS: &str = "   164";
    pub const VERTICES: &str = "  2411";
    pub const ELEMENTS: &str = "  2412";
    pub const DOFS: &str = "   757";
    /// Exporters disagree on which dataset number holds groups.
    pub const GROUPS: [&str; 3] = ["  2452", "  2467", "  2477"];
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Separator,
    Units,
    Vertices,
    Elements,
    Groups,
    Dofs,
    Unsupported,
}

impl Tag {
    /// Classifies a line from its first [`TAG_WIDTH`] bytes.
    pub fn classify(line: &str) -> Tag {
        let prefix = match line.get(..TAG_WIDTH) {
            Some(v) => v,
            None => return Tag::Unsupported,
        };
        match prefix {
            code::SEPARATOR => Tag::Separator,
            code::UNITS => Tag::Units,
            code::VERTICES => Tag::Vertices,
            code::ELEMENTS => Tag::Elements,
            code::DOFS => Tag::Dofs,
            group if code::GROUPS.contains(&group) => Tag::Groups,
            _ => Tag::Unsupported,
        }
    }
}
