//! Core of the bot: turns repository events into one snarky plain-text
//! comment.
//!
//! Data flow per comment:
//!
//! ```text
//! CodeChange ─► annotate ─► prompt ─► Composer::compose ─► Composed
//!                                       │  generate ─► sanitize
//!                                       └► fallback::select ─► sanitize
//! ```
//!
//! Nothing here is fallible from the caller's point of view: [`Composer`]
//! always returns a body, falling back to canned text on any failure.

pub mod annotate;
pub mod compose;
pub mod fallback;
pub mod prompt;
pub mod sanitize;

pub use annotate::{AnnotatedPatch, CodeChange, annotate, annotate_all, annotate_patch};
pub use compose::{CommentSource, Composed, Composer};
pub use fallback::{FallbackCategory, NO_CODE_CHANGES};
pub use prompt::ReviewSubject;
pub use sanitize::sanitize;
