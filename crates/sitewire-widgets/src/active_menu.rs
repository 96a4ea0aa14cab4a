//! Marks the nav link for the current page.

use sitewire_core::settings::NavigationSettings;
use sitewire_core::SiteResult;
use sitewire_dom::{Document, Selector};

/// Whether a link to `href` points at the page served at `pathname`.
///
/// `/` and `/index.html` both mean the home page. Other absolute paths match
/// exactly or as a suffix of `pathname`. Relative and fragment links never
/// match.
pub fn is_current_page(href: &str, pathname: &str) -> bool {
    match href {
        "/" | "/index.html" => pathname == "/" || pathname.ends_with("/index.html"),
        _ if href.starts_with('/') => pathname == href || pathname.ends_with(href),
        _ => false,
    }
}

/// Sets `active` and `aria-current="page"` on nav links to the current page and
/// clears them elsewhere. Links without an `href` are left alone.
///
/// Returns the number of links marked active.
pub fn mark_active_links(document: &Document, settings: &NavigationSettings) -> SiteResult<usize> {
    let pathname = document.pathname();
    let mut marked = 0;
    for link in document.query_selector_all(&Selector::parse(&settings.link_selector)?) {
        let Some(href) = document.get_attribute(link, "href") else {
            continue;
        };
        if is_current_page(&href, &pathname) {
            document.set_attribute(link, "aria-current", "page");
            document.add_class(link, "active");
            marked += 1;
        } else {
            document.remove_attribute(link, "aria-current");
            document.remove_class(link, "active");
        }
    }
    tracing::debug!(path = %pathname, marked, "active menu links");
    Ok(marked)
}
