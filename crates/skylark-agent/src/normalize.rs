// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment normalization.
//!
//! Shapes a turn's raw attachment list for the active provider and drops
//! messages that carry neither text nor attachments. Pure transformation,
//! no side effects.

use skylark_core::SkylarkError;
use skylark_core::types::{Attachment, AttachmentMode, ChatMessage};

/// Normalizes a message list for submission to a provider.
///
/// - Messages with empty text and no attachments are dropped. The filter is
///   idempotent: normalizing twice yields the same list.
/// - Site-relative attachment URLs are rewritten to absolute using
///   `base_url`; absolute URLs pass through unchanged.
/// - Inline references pass through for an inline-accepting provider and
///   fail with [`SkylarkError::UnsupportedAttachmentShape`] for a
///   URL-reference provider -- the blob store must have resolved them first.
pub fn normalize_messages(
    messages: Vec<ChatMessage>,
    mode: AttachmentMode,
    base_url: &str,
) -> Result<Vec<ChatMessage>, SkylarkError> {
    messages
        .into_iter()
        .filter(|message| !message.is_empty())
        .map(|mut message| {
            message.attachments = message
                .attachments
                .into_iter()
                .map(|attachment| normalize_attachment(attachment, mode, base_url))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(message)
        })
        .collect()
}

fn normalize_attachment(
    attachment: Attachment,
    mode: AttachmentMode,
    base_url: &str,
) -> Result<Attachment, SkylarkError> {
    match (attachment, mode) {
        (inline @ Attachment::Inline { .. }, AttachmentMode::InlineReference) => Ok(inline),
        (Attachment::Inline { file_id, .. }, AttachmentMode::UrlReference) => {
            Err(SkylarkError::UnsupportedAttachmentShape(format!(
                "inline reference {file_id} requires resolution to a URL before submission"
            )))
        }
        (Attachment::Url { url }, _) => Ok(Attachment::Url {
            url: to_absolute_url(base_url, &url),
        }),
    }
}

/// Rewrites a site-relative URL to absolute with exactly one separating
/// slash, regardless of whether `base_url` has a trailing slash. Absolute
/// URLs are returned as-is.
pub fn to_absolute_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}
