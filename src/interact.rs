//! Host-independent pieces of the click handlers.

/// Selector for an in-page anchor's target, or `None` when the href is not
/// a usable fragment (external link, bare `#`).
pub fn anchor_target(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(id) if !id.trim().is_empty() => Some(href),
        _ => None,
    }
}

pub fn address_text(raw: &str) -> &str {
    raw.trim()
}

/// What the copy control ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Clipboard write succeeded; the control shows the confirmation until
    /// the timer puts `original_label` back.
    Copied { original_label: String },
    /// Clipboard unavailable or refused; the address text is selected
    /// instead and the label is untouched.
    SelectedForManualCopy,
}
