//! Responsive images, lazy loading, and a placeholder for broken sources.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use sitewire_core::SiteResult;
use sitewire_dom::{Document, EventKind, ListenerOptions, ListenerSet, NodeId, Selector};

const FLUID_CLASS: &str = "img-fluid";
const CRITICAL_CLASS: &str = "c-logo__img";
const CRITICAL_ATTRIBUTE: &str = "data-critical";

const PLACEHOLDER_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">"##,
    r##"<rect fill="#f0f0f0" width="100" height="100"/>"##,
    r##"<text x="50" y="50" font-family="sans-serif" font-size="14" fill="#999" "##,
    r##"text-anchor="middle" dominant-baseline="middle">Image</text></svg>"##,
);

/// Characters escaped in an unencoded `data:image/svg+xml` URI.
const SVG_URI_ESCAPES: &AsciiSet = &CONTROLS.add(b'<').add(b'>').add(b'#').add(b'%');

/// The grey "Image" placeholder shown when a source fails to load.
pub static PLACEHOLDER_URI: Lazy<String> = Lazy::new(|| {
    format!(
        "data:image/svg+xml,{}",
        utf8_percent_encode(PLACEHOLDER_SVG, SVG_URI_ESCAPES)
    )
});

/// Whether an image must load eagerly.
fn is_critical(doc: &Document, img: NodeId) -> bool {
    doc.has_class(img, CRITICAL_CLASS) || doc.has_attribute(img, CRITICAL_ATTRIBUTE)
}

/// Listeners installed by [`enhance_images`].
#[derive(Debug)]
pub struct ImageEnhancements {
    images: Vec<NodeId>,
    _listeners: ListenerSet,
}

impl ImageEnhancements {
    /// The images that were enhanced, in document order.
    pub fn images(&self) -> &[NodeId] {
        &self.images
    }
}

/// Enhances every `img` in the document.
///
/// Each image gets `img-fluid`, `loading="lazy"` unless it already declares a
/// loading mode or is critical, and a one-shot error handler that swaps its
/// source for [`PLACEHOLDER_URI`].
pub fn enhance_images(document: &Document) -> SiteResult<ImageEnhancements> {
    let images = document.query_selector_all(&Selector::parse("img")?);
    let mut listeners = ListenerSet::new(document);
    for &img in &images {
        document.add_class(img, FLUID_CLASS);
        if !document.has_attribute(img, "loading") && !is_critical(document, img) {
            document.set_attribute(img, "loading", "lazy");
        }
        listeners.push(document.add_event_listener_with(
            img,
            EventKind::Error,
            ListenerOptions::once(),
            |doc, event| {
                if let Some(img) = event.target_node() {
                    tracing::debug!(src = ?doc.get_attribute(img, "src"), "image failed, using placeholder");
                    doc.set_attribute(img, "src", &PLACEHOLDER_URI);
                }
            },
        ));
    }
    Ok(ImageEnhancements {
        images,
        _listeners: listeners,
    })
}
