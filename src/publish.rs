//! Public link and iframe embed code for published pages.

use crate::error::{DesignerError, DesignerResult};
use crate::page::Page;
use crate::richtext::escape_html;

fn ensure_published(page: &Page) -> DesignerResult<()> {
    if page.is_published() {
        Ok(())
    } else {
        Err(DesignerError::NotPublished {
            slug: page.slug.clone(),
        })
    }
}

/// Link URL regardless of status, used for the editor's preview frame
pub fn activity_url(host: &str, slug: &str) -> String {
    format!("{}/activities/{}", host.trim_end_matches('/'), slug)
}

/// `<host>/activities/<slug>` for a published page
pub fn public_link(host: &str, page: &Page) -> DesignerResult<String> {
    ensure_published(page)?;
    Ok(activity_url(host, &page.slug))
}

/// iframe snippet for embedding a published page in another site
pub fn embed_snippet(host: &str, page: &Page, height: u32) -> DesignerResult<String> {
    let link = public_link(host, page)?;
    Ok(format!(
        "<iframe src=\"{}\" width=\"100%\" height=\"{}\" frameborder=\"0\" allowfullscreen></iframe>",
        escape_html(&link),
        height
    ))
}
