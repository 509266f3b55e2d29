//! Byte-range edits applied back to front over the original text.

use crate::syntax::parser::named_children;
use std::ops::Range;
use tree_sitter::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    range: Range<usize>,
    replacement: String,
}

/// Pending edits against one source string.
///
/// Overlapping deletions are merged; any other overlap is resolved in
/// favour of the edit that starts last. Identical edits are applied once.
#[derive(Debug, Default, Clone)]
pub struct TextEdits {
    edits: Vec<Edit>,
}

impl TextEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at..at, text);
    }

    pub fn delete(&mut self, range: Range<usize>) {
        self.replace(range, "");
    }

    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        let edit = Edit {
            range,
            replacement: text.into(),
        };
        if !self.edits.contains(&edit) {
            self.edits.push(edit);
        }
    }

    /// Delete an object member together with its separating comma.
    ///
    /// A member on a line of its own takes the whole line with it.
    pub fn remove_property(&mut self, source: &str, member: Node<'_>) {
        self.remove_properties(source, &[member]);
    }

    /// Delete several members of one object literal.
    ///
    /// Neighbouring members are removed as one run so their separators are
    /// resolved once: the result is the same as removing them one by one
    /// over repeated passes.
    pub fn remove_properties(&mut self, source: &str, members: &[Node<'_>]) {
        let Some(object) = members.first().and_then(|member| member.parent()) else {
            return;
        };
        let all: Vec<Node<'_>> = named_children(object)
            .into_iter()
            .filter(|node| node.kind() != "comment")
            .collect();
        let doomed = |node: &Node<'_>| members.iter().any(|member| member.id() == node.id());

        let mut i = 0;
        while i < all.len() {
            if !doomed(&all[i]) {
                i += 1;
                continue;
            }
            let first = i;
            while i < all.len() && doomed(&all[i]) {
                i += 1;
            }
            let before = first.checked_sub(1).map(|j| all[j]);
            let range = run_removal_range(source, all[first], all[i - 1], before, all.get(i).copied());
            self.delete(range);
        }
    }

    pub fn apply(self, source: &str) -> String {
        let mut edits = merge_deletions(self.edits);
        edits.sort_by(|a, b| b.range.start.cmp(&a.range.start).then(b.range.end.cmp(&a.range.end)));

        let mut out = source.to_string();
        let mut floor = source.len();
        for edit in edits {
            if edit.range.end > floor || edit.range.start > edit.range.end {
                log::debug!("Skipping overlapping edit at {:?}", edit.range);
                continue;
            }
            out.replace_range(edit.range.clone(), &edit.replacement);
            floor = edit.range.start;
        }
        out
    }
}

/// Fold overlapping deletions into their union. A deletion nested in a
/// larger one (a member inside a removed member) disappears with it, and so
/// does an insertion strictly inside a deleted range.
fn merge_deletions(edits: Vec<Edit>) -> Vec<Edit> {
    let (mut deletions, others): (Vec<Edit>, Vec<Edit>) = edits
        .into_iter()
        .partition(|edit| edit.replacement.is_empty() && !edit.range.is_empty());
    deletions.sort_by(|a, b| a.range.start.cmp(&b.range.start).then(b.range.end.cmp(&a.range.end)));

    let mut merged: Vec<Edit> = Vec::with_capacity(deletions.len());
    for edit in deletions {
        match merged.last_mut() {
            Some(last) if edit.range.start < last.range.end => {
                last.range.end = last.range.end.max(edit.range.end);
            }
            _ => merged.push(edit),
        }
    }

    let swallowed = |edit: &Edit| {
        merged
            .iter()
            .any(|d| d.range.start < edit.range.start && edit.range.end < d.range.end)
    };
    let kept: Vec<Edit> = others.into_iter().filter(|edit| !swallowed(edit)).collect();
    merged.extend(kept);
    merged
}

/// Byte range removing the consecutive members `first..=last`. `before` and
/// `after` are the surviving neighbours, if any.
fn run_removal_range(
    source: &str,
    first: Node<'_>,
    last: Node<'_>,
    before: Option<Node<'_>>,
    after: Option<Node<'_>>,
) -> Range<usize> {
    let start = first.start_byte();
    let end = last
        .next_sibling()
        .filter(|n| n.kind() == ",")
        .map_or(last.end_byte(), |comma| comma.end_byte());

    if owns_line(source, start, end) {
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[end..].find('\n').map_or(source.len(), |i| end + i + 1);
        return line_start..line_end;
    }
    match (before, after) {
        // Everything up to the next survivor, separators included.
        (_, Some(next)) => start..next.start_byte(),
        // Last members on a shared line: the comma before them goes instead.
        (Some(prev), None) => prev.end_byte()..last.end_byte(),
        (None, None) => start..end,
    }
}

/// Nothing but whitespace shares the lines of `start..end`.
fn owns_line(source: &str, start: usize, end: usize) -> bool {
    let before = &source[..start];
    let line_prefix = before.rfind('\n').map_or(before, |i| &before[i + 1..]);
    let after = &source[end..];
    let line_suffix = after.find('\n').map_or(after, |i| &after[..i]);
    before.contains('\n')
        && line_prefix.trim().is_empty()
        && line_suffix.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::object::default_export_object;
    use crate::syntax::parser::parse_source;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn remove_key(source: &str, key: &str) -> String {
        let tree = parse_source(source, Path::new("_meta.js")).unwrap();
        let obj = default_export_object(&tree).unwrap();
        let prop = obj.get(source, key).unwrap();
        let mut edits = TextEdits::new();
        edits.remove_property(source, prop.node);
        edits.apply(source)
    }

    #[test]
    fn removes_whole_line_with_comma() {
        let source = indoc! {"
            export default {
              index: 'Home',
              newWindow: true,
              about: 'About'
            }
        "};
        assert_eq!(
            remove_key(source, "newWindow"),
            indoc! {"
                export default {
                  index: 'Home',
                  about: 'About'
                }
            "}
        );
    }

    #[test]
    fn removes_last_inline_member_and_leading_comma() {
        assert_eq!(
            remove_key("export default { a: 1, b: 2 }", "b"),
            "export default { a: 1 }"
        );
    }

    #[test]
    fn removes_first_inline_member() {
        assert_eq!(
            remove_key("export default { a: 1, b: 2 }", "a"),
            "export default { b: 2 }"
        );
    }

    fn remove_keys(source: &str, keys: &[&str]) -> String {
        let tree = parse_source(source, Path::new("_meta.js")).unwrap();
        let obj = default_export_object(&tree).unwrap();
        let members: Vec<_> = keys.iter().map(|key| obj.get(source, key).unwrap().node).collect();
        let mut edits = TextEdits::new();
        edits.remove_properties(source, &members);
        edits.apply(source)
    }

    #[test]
    fn removes_two_trailing_inline_members_in_one_pass() {
        assert_eq!(
            remove_keys("export default { toc: false, layout: 'raw', topContent: X }", &["layout", "topContent"]),
            "export default { toc: false }"
        );
    }

    #[test]
    fn removes_inline_run_before_a_survivor() {
        assert_eq!(
            remove_keys("export default { a: 1, b: 2, c: 3, d: 4 }", &["b", "c"]),
            "export default { a: 1, d: 4 }"
        );
    }

    #[test]
    fn removes_every_member_on_own_lines() {
        let source = indoc! {"
            export default {
              a: 1,
              b: 2
            }
        "};
        assert_eq!(remove_keys(source, &["a", "b"]), "export default {\n}\n");
    }

    #[test]
    fn nested_deletion_merges_into_enclosing_one() {
        let mut edits = TextEdits::new();
        edits.delete(4..8);
        edits.delete(2..10);
        edits.delete(9..12);
        assert_eq!(edits.apply("0123456789abcdef"), "01cdef");
    }

    #[test]
    fn inserts_and_skips_duplicates() {
        let mut edits = TextEdits::new();
        edits.insert(0, "'use client'\n");
        edits.insert(0, "'use client'\n");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits.apply("x"), "'use client'\nx");
    }
}
