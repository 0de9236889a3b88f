//! Flow-style comment annotations.
//!
//! Writes `name /*: T */` after every annotated binding identifier. An
//! annotation comment already sitting after the identifier is replaced (or
//! dropped, if the binding is no longer annotated), so printing the output
//! of a previous run gives the same text back.

use rowan::TextSize;

/// One binding identifier and the type to print after it, if any.
pub(crate) struct Annotation {
    pub end: TextSize,
    pub ty: Option<String>,
}

const OPEN: &str = "/*:";
const CLOSE: &str = "*/";

/// Range of an existing annotation comment starting at `offset`, after
/// optional spaces and tabs.
fn existing_comment(source: &str, offset: usize) -> Option<usize> {
    let rest = source.get(offset..)?;
    let skipped = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let comment = &rest[skipped..];
    if !comment.starts_with(OPEN) {
        return None;
    }
    let close = comment.find(CLOSE)?;
    Some(offset + skipped + close + CLOSE.len())
}

pub(crate) fn annotate(source: &str, mut annotations: Vec<Annotation>) -> String {
    annotations.sort_by_key(|a| a.end);
    let mut out = String::with_capacity(source.len() + annotations.len() * 16);
    let mut cursor = 0usize;
    for annotation in annotations {
        let end = usize::from(annotation.end);
        if end < cursor || end > source.len() {
            continue;
        }
        out.push_str(&source[cursor..end]);
        cursor = end;
        if let Some(comment_end) = existing_comment(source, end) {
            cursor = comment_end;
        }
        if let Some(ty) = annotation.ty {
            out.push_str(" /*: ");
            out.push_str(&ty);
            out.push_str(" */");
        }
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(end: u32, ty: Option<&str>) -> Annotation {
        Annotation {
            end: TextSize::from(end),
            ty: ty.map(str::to_string),
        }
    }

    #[test]
    fn inserts_after_identifier() {
        let out = annotate("const a = 1;", vec![at(7, Some("number"))]);
        assert_eq!(out, "const a /*: number */ = 1;");
    }

    #[test]
    fn replaces_previous_annotation() {
        let src = "const a /*: string */ = 1;";
        let out = annotate(src, vec![at(7, Some("number"))]);
        assert_eq!(out, "const a /*: number */ = 1;");
    }

    #[test]
    fn drops_stale_annotation() {
        let src = "const a /*: string */ = f();";
        let out = annotate(src, vec![at(7, None)]);
        assert_eq!(out, "const a = f();");
    }

    #[test]
    fn leaves_other_comments_alone() {
        let src = "const a /* note */ = 1;";
        let out = annotate(src, vec![at(7, Some("number"))]);
        assert_eq!(out, "const a /*: number */ /* note */ = 1;");
    }
}
