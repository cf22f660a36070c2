//! Line-role tagging for unified-diff fragments.

/// One file's unified-diff fragment as delivered by the hosting API.
///
/// `patch` is empty for binary files and rename-only changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChange {
    pub filename: String,
    pub patch: String,
}

impl CodeChange {
    pub fn new(filename: impl Into<String>, patch: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            patch: patch.into(),
        }
    }
}

/// A [`CodeChange`] whose every line carries an explicit role tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedPatch {
    pub filename: String,
    pub annotated_text: String,
}

/// Tags each line of `patch` as `ADDED:`, `REMOVED:` or `CONTEXT:`.
///
/// The leading `+`/`-` marker is dropped; other lines (hunk headers
/// included) are kept verbatim. Every output line ends with `\n`, so the
/// output has exactly as many lines as the input. Empty input yields an
/// empty string.
pub fn annotate_patch(patch: &str) -> String {
    let mut out = String::with_capacity(patch.len() + patch.len() / 2);
    for line in patch.lines() {
        if let Some(rest) = line.strip_prefix('+') {
            out.push_str("ADDED: ");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix('-') {
            out.push_str("REMOVED: ");
            out.push_str(rest);
        } else {
            out.push_str("CONTEXT: ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Annotates one file.
pub fn annotate(change: &CodeChange) -> AnnotatedPatch {
    AnnotatedPatch {
        filename: change.filename.clone(),
        annotated_text: annotate_patch(&change.patch),
    }
}

/// Annotates every file, preserving order.
pub fn annotate_all(changes: &[CodeChange]) -> Vec<AnnotatedPatch> {
    changes.iter().map(annotate).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{Rng, seq::SliceRandom};

    use super::*;

    #[test]
    fn tags_each_role() {
        let patch = "@@ -1,2 +1,2 @@\n fn main() {\n-    old();\n+    new();\n }";
        assert_eq!(
            annotate_patch(patch),
            "CONTEXT: @@ -1,2 +1,2 @@\n\
             CONTEXT:  fn main() {\n\
             REMOVED:     old();\n\
             ADDED:     new();\n\
             CONTEXT:  }\n"
        );
    }

    #[test]
    fn single_line_roles() {
        assert!(annotate_patch("+x").contains("ADDED: x"));
        assert!(annotate_patch("-x").contains("REMOVED: x"));
        assert!(annotate_patch("x").contains("CONTEXT: x"));
    }

    #[test]
    fn empty_patch_is_empty() {
        assert_eq!(annotate_patch(""), "");
        let a = annotate(&CodeChange::new("logo.png", ""));
        assert_eq!(a.filename, "logo.png");
        assert_eq!(a.annotated_text, "");
    }

    #[test]
    fn only_first_marker_is_stripped() {
        assert_eq!(annotate_patch("++x\n--y"), "ADDED: +x\nREMOVED: -y\n");
    }

    #[test]
    fn random_patches_keep_line_count_and_one_tag_per_line() {
        let pieces = ["+", "-", " ", "@@", "a", "ö", "\t", "\n", "\r\n", "ADDED:", "}"];
        let mut rng = rand::thread_rng();

        for _ in 0..500 {
            let len = rng.gen_range(0..40);
            let input: String = (0..len)
                .map(|_| *pieces.choose(&mut rng).unwrap_or(&"a"))
                .collect();

            let out = annotate_patch(&input);
            let expected = input.lines().count();
            assert_eq!(out.lines().count(), expected, "input: {input:?}");
            assert_eq!(out.matches('\n').count(), expected, "input: {input:?}");

            for (src, tagged) in input.lines().zip(out.lines()) {
                let tag_count = ["ADDED: ", "REMOVED: ", "CONTEXT: "]
                    .iter()
                    .filter(|t| tagged.starts_with(**t))
                    .count();
                assert_eq!(tag_count, 1, "line {src:?} -> {tagged:?}");
            }
        }
    }
}
