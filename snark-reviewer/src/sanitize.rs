//! Plain-text cleanup for model output and canned text.

use std::sync::OnceLock;

use regex::Regex;

struct Patterns {
    /// Leading language tag on its own line, e.g. "kotlin\n".
    language_tag: Regex,
    /// Fenced code block, with or without a language annotation.
    fenced_block: Regex,
    inline_code: Regex,
}

static PATTERNS_CELL: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS_CELL.get_or_init(|| Patterns {
        language_tag: Regex::new(
            r"(?i)^(kotlin|javascript|typescript|python|java|cpp|csharp|go|rust|swift|php|ruby|html|css|json|bash|shell)\r?\n",
        )
        .expect("valid language tag regex"),
        fenced_block: Regex::new(r"(?s)```[A-Za-z0-9_+#.-]*[ \t]*\r?\n.*?```")
            .expect("valid fence regex"),
        inline_code: Regex::new(r"`([^`]+)`").expect("valid inline code regex"),
    })
}

/// Reduces `text` to the plain comment body.
///
/// Steps run in this order: surrounding double quotes, leading language
/// tag, fenced blocks, inline code spans, outer whitespace. Quote and tag
/// stripping come first because a model may quote an already tagged reply.
pub fn sanitize(text: &str) -> String {
    let mut s = text.trim();

    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s = &s[1..s.len() - 1];
    }

    let p = patterns();
    let s = p.language_tag.replace(s, "");
    let s = p.fenced_block.replace_all(&s, "");
    let s = p.inline_code.replace_all(&s, "$1");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{Rng, seq::SliceRandom};

    use super::*;

    #[test]
    fn strips_surrounding_quotes() {
        assert_eq!(sanitize("\"hello\""), "hello");
        assert_eq!(sanitize("  \"hello\"\n"), "hello");
        assert_eq!(sanitize("say \"hi\" now"), "say \"hi\" now");
        assert_eq!(sanitize("\""), "\"");
        assert_eq!(sanitize("\"\""), "");
    }

    #[test]
    fn strips_leading_language_tag() {
        assert_eq!(sanitize("kotlin\nYour code is bad."), "Your code is bad.");
        assert_eq!(sanitize("Rust\nStill bad."), "Still bad.");
        assert_eq!(sanitize("\"python\nquoted and tagged\""), "quoted and tagged");
        assert_eq!(sanitize("go away\nnow"), "go away\nnow");
        assert_eq!(sanitize("Kotlin is fine"), "Kotlin is fine");
    }

    #[test]
    fn removes_fenced_blocks() {
        assert_eq!(sanitize("```ts\nfoo()\n```"), "");
        assert_eq!(sanitize("```\nfoo()\n```"), "");
        assert_eq!(
            sanitize("Look at this:\n```rust\nfn a() {}\n```\nand weep. ```c++\nx\n```"),
            "Look at this:\n\nand weep."
        );
    }

    #[test]
    fn unwraps_inline_code() {
        assert_eq!(sanitize("see `foo()` here"), "see foo() here");
        assert_eq!(sanitize("`a` and `b`"), "a and b");
        assert_eq!(sanitize("lonely ` tick"), "lonely ` tick");
    }

    #[test]
    fn clean_text_is_untouched() {
        let s = "Did you even test this before committing? I'm surprised it compiles at all.";
        assert_eq!(sanitize(s), s);
    }

    #[test]
    fn sanitizing_clean_text_twice_changes_nothing() {
        let pieces = [
            "a", "Z", "0", " ", "\n", "\t", "'", "(", ")", "{", "}", "é", "🧐", ".", "go", "rust",
            "*", "#", "-",
        ];
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let len = rng.gen_range(0..30);
            // The leading word keeps a language tag from forming at the start.
            let input: String = std::iter::once("x ")
                .chain((0..len).map(|_| *pieces.choose(&mut rng).unwrap_or(&"a")))
                .collect();

            let once = sanitize(&input);
            assert_eq!(sanitize(&once), once, "input: {input:?}");
            assert_eq!(once, input.trim(), "input: {input:?}");
        }
    }
}
