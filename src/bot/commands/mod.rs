//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Parent management commands
pub mod parent;

/// Payment commands
pub mod payment;

/// Statistics dashboard
pub mod stats;

/// Student management and linking commands
pub mod student;

/// Teacher management commands
pub mod teacher;

// Export commands
pub use general::*;
pub use parent::*;
pub use payment::*;
pub use stats::*;
pub use student::*;
pub use teacher::*;

use crate::core::listing::Page;

/// Discord's limit on message content, in characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

const TRUNCATION_MARKER: &str = "\n…";

/// Header line for one page of a list reply, e.g. `👪 **Parents** (31 found, page 2/3)`.
#[must_use]
pub fn page_header<T>(title: &str, page: &Page<T>) -> String {
    format!(
        "{title} ({} found, page {}/{})\n\n",
        page.total_items, page.page, page.total_pages
    )
}

/// Cuts a reply down to [`DISCORD_MESSAGE_LIMIT`] characters at a line break.
#[must_use]
pub fn fit_message(response: String) -> String {
    if response.chars().count() <= DISCORD_MESSAGE_LIMIT {
        return response;
    }

    let budget = DISCORD_MESSAGE_LIMIT - TRUNCATION_MARKER.chars().count();
    let cut = response
        .char_indices()
        .nth(budget)
        .map_or(response.len(), |(index, _)| index);
    let kept = &response[..cut];
    let kept = kept.rfind('\n').map_or(kept, |line_end| &kept[..line_end]);
    format!("{kept}{TRUNCATION_MARKER}")
}
