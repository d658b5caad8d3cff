//! Group sections (2452, 2467, 2477).
//!
//! A group is a header line whose last field is the member count, a name
//! line, then the member records. Members are packed two per line:
//!
//! ```text
//!   type  tag  leaf  comp  type  tag  leaf  comp
//! ```
//!
//! where `type` is [`ELEMENT_FLAG`] for elements (7 for vertices) and `tag`
//! is the file id of the member. An odd count ends with a half line.

use super::PendingGroup;
use super::PREALLOCATION_LIMIT;
use super::Reader;
use crate::error::Error;
use crate::id::ElementId;
use crate::id::FileId;
use crate::id::IdMap;
use crate::id::VertexId;
use crate::line::Line;
use crate::line::Lines;
use crate::mesh::Element;
use crate::mesh::Group;
use crate::mesh::GroupKind;
use std::io;

/// Entity type code of element members.
pub const ELEMENT_FLAG: u64 = 8;

const MEMBER_RECORD: &str = "group member record";

/// Group as read, members still referenced by file ids.
#[derive(Debug)]
pub(super) struct RawGroup {
    name: String,
    kind: GroupKind,
    members: Vec<FileId>,
    lineno: usize,
}

impl RawGroup {
    pub fn resolve(
        self,
        vertex_ids: &IdMap<VertexId>,
        element_ids: &IdMap<ElementId>,
        elements: &[Element],
    ) -> Result<Group, Error> {
        let lineno = self.lineno;
        Ok(match self.kind {
            GroupKind::Vertex => {
                let members = vertex_ids
                    .resolve_all(&self.members)
                    .map_err(|kind| Error::at(lineno, kind))?;
                Group::from_vertices(self.name, members)
            }
            GroupKind::Element => {
                let members = element_ids
                    .resolve_all(&self.members)
                    .map_err(|kind| Error::at(lineno, kind))?;
                Group::from_elements(self.name, members, elements)
            }
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DecodedMembers {
    pub ids: Vec<FileId>,
    pub kind: GroupKind,
}

fn kind_from_flag(flag: u64) -> GroupKind {
    if flag == ELEMENT_FLAG {
        GroupKind::Element
    } else {
        GroupKind::Vertex
    }
}

/// Parses the first `N` fields of a member record.
fn record<const N: usize>(line: Line<'_>) -> Result<[u64; N], Error> {
    let mut record = [0; N];
    for (i, field) in record.iter_mut().enumerate() {
        *field = line.field(i, MEMBER_RECORD)?;
    }
    Ok(record)
}

/// Decodes the member records of a group of `count` members.
///
/// The kind is taken from the last full line; the half line of an odd count
/// only decides it when it is the sole record. Mixed flags within a group
/// are not reconciled.
pub(crate) fn decode_members<R>(
    lines: &mut Lines<R>,
    count: usize,
) -> Result<DecodedMembers, Error>
where
    R: io::BufRead,
{
    let mut ids = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
    let mut kind = GroupKind::default();

    for _ in 0..count / 2 {
        let [flag, first, _, _, _, second] = record::<6>(lines.expect_line(MEMBER_RECORD)?)?;
        ids.push(FileId::new(first));
        ids.push(FileId::new(second));
        kind = kind_from_flag(flag);
    }

    if count % 2 == 1 {
        let [flag, id] = record::<2>(lines.expect_line(MEMBER_RECORD)?)?;
        ids.push(FileId::new(id));
        if count == 1 {
            kind = kind_from_flag(flag);
        }
    }

    Ok(DecodedMembers { ids, kind })
}

impl<R> Reader<R>
where
    R: io::BufRead,
{
    pub(super) fn read_groups(&mut self) -> Result<(), Error> {
        let span = tracing::info_span!("read_groups");
        let _enter = span.enter();

        while let Some(header) = self.lines.next_line()? {
            if header.is_separator() {
                break;
            }
            let lineno = header.lineno();
            let count: usize = header.last_field("group member count")?;
            let name = self
                .lines
                .expect_line("group name")?
                .first_token()
                .to_owned();

            let DecodedMembers { ids, kind } = decode_members(&mut self.lines, count)?;
            tracing::debug!(%name, %kind, count, "read group");

            self.groups.push(PendingGroup::Raw(RawGroup {
                name,
                kind,
                members: ids,
                lineno,
            }));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;
    use std::fmt::Write as _;

    fn member_lines(members: &[(u64, u64)]) -> String {
        let mut out = String::new();
        let mut pairs = members.chunks_exact(2);
        for pair in &mut pairs {
            let [(flag0, id0), (flag1, id1)] = [pair[0], pair[1]];
            writeln!(
                out,
                "{flag0:10}{id0:10}{:10}{:10}{flag1:10}{id1:10}{:10}{:10}",
                0, 0, 0, 0,
            )
            .unwrap();
        }
        if let [(flag, id)] = pairs.remainder() {
            writeln!(out, "{flag:10}{id:10}{:10}{:10}", 0, 0).unwrap();
        }
        out
    }

    fn decode(input: &str, count: usize) -> Result<DecodedMembers, Error> {
        let mut lines = Lines::new(input.as_bytes());
        decode_members(&mut lines, count)
    }

    fn file_ids(ids: &[u64]) -> Vec<FileId> {
        ids.iter().copied().map(FileId::new).collect()
    }

    #[test]
    fn test_empty() {
        let decoded = decode("    -1\n", 0).unwrap();
        assert!(decoded.ids.is_empty());
        assert_eq!(decoded.kind, GroupKind::Vertex);
    }

    #[test]
    fn test_single() {
        let input = member_lines(&[(8, 31)]);
        let decoded = decode(&input, 1).unwrap();
        assert_eq!(decoded.ids, file_ids(&[31]));
        assert_eq!(decoded.kind, GroupKind::Element);

        let input = member_lines(&[(7, 4)]);
        let decoded = decode(&input, 1).unwrap();
        assert_eq!(decoded.kind, GroupKind::Vertex);
    }

    #[test]
    fn test_even() {
        let members: Vec<(u64, u64)> = (1..=16).map(|id| (8, id * 10)).collect();
        let input = member_lines(&members);
        let decoded = decode(&input, 16).unwrap();
        assert_eq!(decoded.ids.len(), 16);
        assert_eq!(decoded.ids[0], FileId::new(10));
        assert_eq!(decoded.ids[15], FileId::new(160));
        assert_eq!(decoded.kind, GroupKind::Element);
    }

    #[test]
    fn test_odd() {
        let members: Vec<(u64, u64)> = (1..=9).map(|id| (8, id)).collect();
        let input = member_lines(&members);
        assert_eq!(input.lines().count(), 5);

        let mut lines = Lines::new(input.as_bytes());
        let decoded = decode_members(&mut lines, 9).unwrap();
        assert_eq!(decoded.ids, file_ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]));
        assert_eq!(decoded.kind, GroupKind::Element);
        assert_eq!(lines.lineno(), 5);
    }

    #[test]
    fn test_odd_trailing_flag_ignored() {
        let input = member_lines(&[(7, 1), (7, 2), (8, 3)]);
        let decoded = decode(&input, 3).unwrap();
        assert_eq!(decoded.kind, GroupKind::Vertex);
    }

    #[test]
    fn test_last_row_wins() {
        let input = member_lines(&[(7, 1), (7, 2), (8, 3), (8, 4)]);
        let decoded = decode(&input, 4).unwrap();
        assert_eq!(decoded.kind, GroupKind::Element);

        let input = member_lines(&[(8, 1), (8, 2), (7, 3), (7, 4)]);
        let decoded = decode(&input, 4).unwrap();
        assert_eq!(decoded.kind, GroupKind::Vertex);
    }

    #[test]
    fn test_truncated() {
        let input = member_lines(&[(8, 1), (8, 2)]);
        let err = decode(&input, 4).unwrap_err();
        assert_eq!(err.lineno(), Some(2));
        assert!(matches!(err.kind(), ErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn test_huge_count() {
        let input = member_lines(&[(8, 1), (8, 2)]);
        for count in [2305843009213693952, 1_000_000_000_000] {
            let err = decode(&input, count).unwrap_err();
            assert_eq!(err.lineno(), Some(2));
            assert!(matches!(err.kind(), ErrorKind::UnexpectedEof { .. }));
        }
    }

    #[test]
    fn test_short_record() {
        let err = decode("         8         1         0         0\n", 2).unwrap_err();
        assert_eq!(err.lineno(), Some(1));
        assert!(matches!(err.kind(), ErrorKind::MissingField { .. }));
    }

    #[test]
    fn test_bad_record() {
        let err = decode("         8       abc\n", 1).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::BadInteger(_)));
    }

    proptest!(
        #[test]
        fn test_decodes_declared_count(
            members in prop::collection::vec((7..=8_u64, 1..1_000_000_u64), 0..200)
        ) {
            let input = member_lines(&members);
            let decoded = decode(&input, members.len()).unwrap();

            let expected_ids: Vec<FileId> =
                members.iter().map(|(_, id)| FileId::new(*id)).collect();
            prop_assert_eq!(decoded.ids, expected_ids);

            let full_rows = members.len() / 2;
            let expected_kind = if full_rows > 0 {
                kind_from_flag(members[2 * (full_rows - 1)].0)
            } else if members.len() == 1 {
                kind_from_flag(members[0].0)
            } else {
                GroupKind::Vertex
            };
            prop_assert_eq!(decoded.kind, expected_kind);
        }
    );
}
