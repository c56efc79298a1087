//! Anti-bot block detection.
//!
//! A heuristic, best-effort classifier over the page title and content.
//! The marker strings below match what the blocking vendor's challenge
//! pages emit today; they are placeholders for whatever signals the live
//! site produces and should be revisited against it rather than assumed
//! stable.

/// Title phrases characteristic of a challenge or denial page.
const TITLE_SIGNALS: [&str; 3] = ["Attention Required", "Error 1005", "Access denied"];

/// Vendor name token looked for in the page body.
const PROVIDER_TOKEN: &str = "Cloudflare";

/// Trace-id token that accompanies the vendor's challenge pages.
const TRACE_TOKEN: &str = "Ray ID";

/// Classify a page as an anti-bot block.
///
/// Returns true if the title carries a known block-signal phrase, or the
/// content carries both the vendor name and a trace id. False negatives
/// are possible; a false positive fails safely upstream as a retryable
/// block rather than wrong data.
#[must_use]
pub fn is_blocked(title: &str, content: &str) -> bool {
    TITLE_SIGNALS.iter().any(|signal| title.contains(signal))
        || (content.contains(PROVIDER_TOKEN) && content.contains(TRACE_TOKEN))
}
