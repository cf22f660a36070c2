//! Persona prompts, one builder per event category.
//!
//! Every prompt opens with the same persona line and closes with
//! [`OUTPUT_RULES`]. Builders that embed annotated code also carry
//! [`FOCUS_ON_ADDED`]; reply builders carry [`SHORT_REPLY`].

use crate::annotate::AnnotatedPatch;

/// Persona shared by every prompt.
pub const PERSONA: &str = "You are a grumpy senior developer playing as Linus Torvalds";

/// Tells the model to review what the author submits, not what they deleted.
pub const FOCUS_ON_ADDED: &str = "Focus on the ADDED code (lines starting with ADDED:), not the REMOVED code (lines starting with REMOVED:), since the added code is what the developer is submitting for review.";

/// Length cap for reply-style prompts.
pub const SHORT_REPLY: &str = "Keep your response under 3 sentences.";

/// Tone instruction for replies.
const TONE: &str = "Be witty, rude and very condescending like Linus Torvalds would.";

/// Strict output constraint appended to every prompt.
pub const OUTPUT_RULES: &str = "IMPORTANT: DO NOT use markdown code blocks or language tags like \"kotlin\" in your response. The response should be plain text without any formatting or language indicators. Do not wrap the response in quotes. Make sure to only respond with the comment text, nothing else.";

/// What a code review prompt is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSubject {
    PullRequest,
    Push,
}

impl ReviewSubject {
    fn noun(self) -> &'static str {
        match self {
            Self::PullRequest => "a pull request",
            Self::Push => "a pushed commit",
        }
    }
}

/// Prompt for a freshly opened issue.
pub fn new_issue(title: &str, body: &str) -> String {
    let mut s = String::new();
    s.push_str(PERSONA);
    s.push_str(" responding to a new issue.\n\n");
    s.push_str(&format!("Issue Title: {title}\n"));
    s.push_str(&format!("Issue Description: {body}\n\n"));
    s.push_str("Write a snarky comment Linus Torvalds would approve of that pokes fun at how the issue is described. ");
    s.push_str("Try to keep your response around a short to medium paragraph. ");
    s.push_str("Be witty, rude and very condescending and keep up the gruff personality like Linus Torvalds would.\n\n");
    s.push_str(OUTPUT_RULES);
    s
}

/// Prompt for an opened pull request or a push, over its annotated files.
///
/// Callers must not invoke this with an empty file list; they post the
/// no-changes literal instead.
pub fn code_review(subject: ReviewSubject, patches: &[AnnotatedPatch]) -> String {
    let mut s = String::new();
    s.push_str(PERSONA);
    s.push_str(&format!(" reviewing {}.\n", subject.noun()));
    s.push_str("The following code changes have been made:\n\n");
    push_files(&mut s, patches);
    s.push_str("\nWrite a snarky code review comment Linus Torvalds would approve of that pokes fun at the coding style and choices by using heavy sarcasm and insults, while still being somewhat constructive. ");
    s.push_str(FOCUS_ON_ADDED);
    s.push_str(" Be sure to mention specific parts of the code.\n\n");
    s.push_str(OUTPUT_RULES);
    s
}

/// Prompt for a reply to an inline review comment on a diff hunk.
pub fn review_comment_reply(hunk: &AnnotatedPatch, comment: &str) -> String {
    let mut s = String::new();
    s.push_str(PERSONA);
    s.push_str(" responding to a comment on code.\n\n");
    s.push_str("Code being discussed:\n");
    push_file(&mut s, hunk);
    s.push_str(&format!("\nComment: \"{comment}\"\n\n"));
    push_reply_instructions(&mut s, true);
    s
}

/// Prompt for a reply to a commit comment, with the commit's files if known.
pub fn commit_comment_reply(comment: &str, patches: &[AnnotatedPatch]) -> String {
    let mut s = String::new();
    s.push_str(PERSONA);
    s.push_str(" responding to a comment on a commit.\n\n");
    s.push_str(&format!("Commit comment: \"{comment}\"\n"));
    if !patches.is_empty() {
        s.push_str("\nFiles changed in commit:\n");
        push_files(&mut s, patches);
    }
    s.push('\n');
    push_reply_instructions(&mut s, !patches.is_empty());
    s
}

/// Prompt for a reply to a conversation comment on a pull request.
///
/// With an empty file list (or when the files could not be fetched) the
/// prompt carries no code and no code-focus instruction.
pub fn pull_request_comment_reply(comment: &str, patches: &[AnnotatedPatch]) -> String {
    let mut s = String::new();
    s.push_str(PERSONA);
    s.push_str(" responding to a comment on a pull request.\n\n");
    s.push_str(&format!("Comment: \"{comment}\"\n"));
    if !patches.is_empty() {
        s.push_str("\nFiles changed in pull request:\n");
        push_files(&mut s, patches);
    }
    s.push('\n');
    push_reply_instructions(&mut s, !patches.is_empty());
    s
}

/// Prompt for a reply to a comment on a plain issue.
///
/// The model is told to argue with the commenter rather than re-raise the
/// issue itself.
pub fn issue_comment_reply(title: &str, body: &str, comment: &str) -> String {
    let mut s = String::new();
    s.push_str(PERSONA);
    s.push_str(" responding to a comment on an issue.\n\n");
    s.push_str(&format!("Issue Title: {title}\n"));
    s.push_str(&format!("Issue Description: {body}\n"));
    s.push_str(&format!("Comment: \"{comment}\"\n\n"));
    s.push_str("Write a snarky reply to this comment that Linus Torvalds would approve of. ");
    s.push_str("Remember, this comment is not the first one so you do not need to bring up issues, only argue with the commenter. ");
    s.push_str(TONE);
    s.push(' ');
    s.push_str(SHORT_REPLY);
    s.push_str("\n\n");
    s.push_str(OUTPUT_RULES);
    s
}

fn push_file(s: &mut String, patch: &AnnotatedPatch) {
    s.push_str(&format!("File: {}\n", patch.filename));
    s.push_str(&patch.annotated_text);
}

fn push_files(s: &mut String, patches: &[AnnotatedPatch]) {
    for (i, p) in patches.iter().enumerate() {
        if i > 0 {
            s.push('\n');
        }
        push_file(s, p);
    }
}

fn push_reply_instructions(s: &mut String, with_code: bool) {
    s.push_str("Write a snarky reply to this comment that Linus Torvalds would approve of. ");
    if with_code {
        s.push_str("Reference specific code when possible. ");
        s.push_str(FOCUS_ON_ADDED);
        s.push(' ');
    }
    s.push_str(TONE);
    s.push(' ');
    s.push_str(SHORT_REPLY);
    s.push_str("\n\n");
    s.push_str(OUTPUT_RULES);
}
