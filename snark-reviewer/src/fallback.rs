//! Canned responses used when generation is unavailable or fails.

use rand::seq::SliceRandom;

/// Which pool a flow draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackCategory {
    /// Pull requests and pushes.
    CodeReview,
    /// New issues and every comment reply.
    Issues,
}

/// Posted instead of a review when a PR or push has nothing left to review.
pub const NO_CODE_CHANGES: &str =
    "No code changes detected. What exactly are you trying to accomplish here? 🧐";

const CODE_REVIEW_POOL: [&str; 10] = [
    "Oh great, another masterpiece that makes me question my career choices. Look at this code - did you just discover functions yesterday? 🤦‍♂️ At least your variable names aren't single letters this time.",
    "Wow, I see you're still allergic to comments. Bold of you to assume future developers (or even you next week) will understand what this spaghetti is supposed to do.",
    "Let me guess, you wrote this at 3AM while mainlining energy drinks? The indentation alone is giving me a migraine. Maybe try using an IDE with formatting next time?",
    "I've seen bootcamp graduates write cleaner code than this. Did you even test this before committing? I'm surprised it compiles at all.",
    "Another commit, another day of questioning why I became a code reviewer. At least you're consistent with your questionable design patterns.",
    "Ah yes, nothing says \"I know what I'm doing\" like unnecessary nested if statements. Have you heard of early returns?",
    "This code is so brittle that I'm afraid to breathe on my screen. Ever heard of error handling?",
    "Your CSS is almost as messy as my desk after a 48-hour coding binge. Have you considered using classes that actually describe what they do?",
    "Congratulations on reinventing the wheel, but with more edges. There's literally a library for this exact thing.",
    "I see you've adopted the \"throw enough code at it until it works\" approach. Bold strategy.",
];

const ISSUES_POOL: [&str; 10] = [
    "Ah, another issue. How original. I suppose I'll add it to my ever-growing list of \"things users think are urgent but really aren't.\"",
    "Thanks for the detailed bug report! Just kidding, I had to squint to understand what you're even asking for here.",
    "Let me guess, you tried turning it off and on again before creating this issue? No? Shocking.",
    "I see you've mastered the art of describing a complex problem in the vaguest way possible. Bravo.",
    "Another day, another feature request that's definitely not in the project scope. But sure, let's add a rocket ship while we're at it.",
    "Oh look, someone found a bug in the code I wrote while sleep-deprived at 3AM. What a surprise.",
    "I'm assuming this is a high priority because THE CAPS LOCK KEY GOT STUCK while you were typing?",
    "This issue reads like it was written by GPT-2. The really early version, not the good one.",
    "Interesting approach to bug reporting: providing neither steps to reproduce nor expected behavior. Very minimalist.",
    "I can tell you put almost as much effort into this bug report as I put into my morning coffee routine.",
];

const _: () = assert!(CODE_REVIEW_POOL.len() >= 10 && ISSUES_POOL.len() >= 10);

impl FallbackCategory {
    /// Every canned response of this category.
    pub fn pool(self) -> &'static [&'static str] {
        match self {
            Self::CodeReview => &CODE_REVIEW_POOL,
            Self::Issues => &ISSUES_POOL,
        }
    }

    /// Apology posted when even the fallback flow breaks.
    pub fn last_resort(self) -> &'static str {
        match self {
            Self::CodeReview => {
                "I was going to roast your code, but it seems my snark generator is broken. Consider yourself lucky... for now."
            }
            Self::Issues => {
                "I was going to make a witty comment about this issue, but my snark generator crashed. Consider yourself lucky."
            }
        }
    }
}

/// Picks a canned response of `category` uniformly at random.
pub fn select(category: FallbackCategory) -> &'static str {
    let pool = category.pool();
    pool.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_else(|| category.last_resort())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sanitize::sanitize;

    const ALL: [FallbackCategory; 2] = [FallbackCategory::CodeReview, FallbackCategory::Issues];

    #[test]
    fn selection_is_a_non_empty_pool_member() {
        for category in ALL {
            for _ in 0..200 {
                let picked = select(category);
                assert!(!picked.trim().is_empty());
                assert!(category.pool().contains(&picked));
            }
        }
    }

    #[test]
    fn selection_eventually_covers_the_pool() {
        for category in ALL {
            let seen: HashSet<&str> = (0..2000).map(|_| select(category)).collect();
            assert_eq!(seen.len(), category.pool().len());
        }
    }

    #[test]
    fn canned_text_is_already_clean() {
        for category in ALL {
            for entry in category.pool() {
                assert_eq!(sanitize(entry), *entry);
            }
            assert_eq!(sanitize(category.last_resort()), category.last_resort());
        }
        assert_eq!(sanitize(NO_CODE_CHANGES), NO_CODE_CHANGES);
    }

    #[test]
    fn pools_do_not_overlap() {
        let review: HashSet<_> = FallbackCategory::CodeReview.pool().iter().collect();
        assert!(FallbackCategory::Issues.pool().iter().all(|e| !review.contains(e)));
    }
}
