//! Drops files nobody wants reviewed.

use crate::git_providers::ChangedFile;

/// Dependency lock artifacts, matched anywhere in the file path.
pub const LOCK_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "Gemfile.lock",
    "poetry.lock",
    "composer.lock",
];

/// `true` if `filename` names a dependency lock artifact.
pub fn is_lock_file(filename: &str) -> bool {
    LOCK_FILES.iter().any(|lock| filename.contains(lock))
}

/// Removes lock files, keeping the order of the rest.
pub fn filter_lock_files(files: Vec<ChangedFile>) -> Vec<ChangedFile> {
    files
        .into_iter()
        .filter(|f| !is_lock_file(&f.filename))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn file(name: &str) -> ChangedFile {
        ChangedFile {
            filename: name.into(),
            patch: Some("+x".into()),
        }
    }

    #[test]
    fn detects_lock_files_anywhere_in_the_path() {
        assert!(is_lock_file("package-lock.json"));
        assert!(is_lock_file("web/package-lock.json"));
        assert!(is_lock_file("Cargo.lock"));
        assert!(is_lock_file("backend/poetry.lock"));
        assert!(!is_lock_file("src/lock.rs"));
        assert!(!is_lock_file("package.json"));
    }

    #[test]
    fn filter_keeps_order_of_remaining_files() {
        let kept = filter_lock_files(vec![
            file("b.rs"),
            file("yarn.lock"),
            file("a.rs"),
            file("pnpm-lock.yaml"),
        ]);
        let names: Vec<_> = kept.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["b.rs", "a.rs"]);
    }
}
