//! Binding every page behaviour to a document once.
//!
//! A [`Page`] claims its document for as long as it lives. Bootstrapping the
//! same document again fails with [`SiteError::AlreadyInitialized`]; dropping
//! the page removes every listener it installed and releases the claim.

use std::sync::Arc;

use sitewire_core::logging::page_span;
use sitewire_core::{SiteError, SiteResult, Settings};
use sitewire_dom::Document;
use sitewire_forms::{FormBindings, FormEngine, Submitter};
use sitewire_widgets::{
    enhance_images, mark_active_links, AnalyticsConsent, BurgerMenu, ConsentBanner,
    HeaderNavToggle, HeaderScroll, ImageEnhancements, ScrollSpy, ScrollToTop, SmoothScroll,
};

/// Optional collaborators for [`Page::bootstrap`].
#[derive(Clone, Default)]
pub struct PageOptions {
    /// Receives form payloads. Defaults to a simulated submitter with the
    /// configured latency.
    pub submitter: Option<Arc<dyn Submitter>>,
    /// Receives consent updates. Without one the banner runs in demo mode.
    pub analytics: Option<Arc<dyn AnalyticsConsent>>,
}

impl PageOptions {
    #[must_use]
    pub fn with_submitter(mut self, submitter: Arc<dyn Submitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsConsent>) -> Self {
        self.analytics = Some(analytics);
        self
    }
}

impl std::fmt::Debug for PageOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageOptions")
            .field("submitter", &self.submitter.is_some())
            .field("analytics", &self.analytics.is_some())
            .finish()
    }
}

/// Releases the document claim when dropped.
#[derive(Debug)]
struct PageClaim(Document);

impl PageClaim {
    fn acquire(document: &Document) -> SiteResult<Self> {
        if document.try_claim_page() {
            Ok(Self(document.clone()))
        } else {
            Err(SiteError::AlreadyInitialized)
        }
    }
}

impl Drop for PageClaim {
    fn drop(&mut self) {
        self.0.release_page();
    }
}

/// Every behaviour bound to one document.
///
/// Features whose markup is missing are `None`.
#[derive(Debug)]
pub struct Page {
    forms: FormBindings,
    menu: Option<BurgerMenu>,
    header_nav: Option<HeaderNavToggle>,
    scroll_spy: Option<ScrollSpy>,
    smooth_scroll: SmoothScroll,
    images: ImageEnhancements,
    scroll_to_top: ScrollToTop,
    header_scroll: Option<HeaderScroll>,
    consent: Option<ConsentBanner>,
    active_links: usize,
    span: tracing::Span,
    // Dropped last so listeners are gone before the document is released.
    claim: PageClaim,
}

impl Page {
    /// Claims `document` and binds all behaviours.
    ///
    /// Fails with [`SiteError::AlreadyInitialized`] while another `Page` holds
    /// the document, or with a configuration error when a selector in
    /// `settings` does not parse. On failure nothing stays bound.
    pub fn bootstrap(
        document: &Document,
        settings: &Settings,
        options: PageOptions,
    ) -> SiteResult<Self> {
        let span = page_span(&document.pathname());
        let entered = span.enter();
        let claim = PageClaim::acquire(document)?;

        let nav = &settings.navigation;
        let menu = BurgerMenu::bind(document, nav)?;
        let scroll_spy = ScrollSpy::bind(document, nav)?;
        let smooth_scroll = SmoothScroll::bind(document, nav)?;
        let active_links = mark_active_links(document, nav)?;
        let images = enhance_images(document)?;

        let engine = match options.submitter {
            Some(submitter) => FormEngine::new(settings, submitter)?,
            None => FormEngine::simulated(settings)?,
        };
        let forms = engine.bind(document);

        let scroll_to_top = ScrollToTop::bind(document, &settings.scroll)?;
        let header_scroll = HeaderScroll::bind(document, nav, &settings.scroll)?;
        let header_nav = HeaderNavToggle::bind(document, nav)?;
        let consent = ConsentBanner::show(document, &settings.consent, options.analytics)?;

        tracing::info!(
            forms = forms.len(),
            menu = menu.is_some(),
            scroll_spy = scroll_spy.is_some(),
            consent = consent.is_some(),
            "page bootstrapped"
        );
        drop(entered);

        Ok(Self {
            forms,
            menu,
            header_nav,
            scroll_spy,
            smooth_scroll,
            images,
            scroll_to_top,
            header_scroll,
            consent,
            active_links,
            span,
            claim,
        })
    }

    pub fn document(&self) -> &Document {
        &self.claim.0
    }

    pub fn forms(&self) -> &FormBindings {
        &self.forms
    }

    pub fn menu(&self) -> Option<&BurgerMenu> {
        self.menu.as_ref()
    }

    pub fn header_nav(&self) -> Option<&HeaderNavToggle> {
        self.header_nav.as_ref()
    }

    pub fn scroll_spy(&self) -> Option<&ScrollSpy> {
        self.scroll_spy.as_ref()
    }

    pub fn smooth_scroll(&self) -> &SmoothScroll {
        &self.smooth_scroll
    }

    pub fn images(&self) -> &ImageEnhancements {
        &self.images
    }

    pub fn scroll_to_top(&self) -> &ScrollToTop {
        &self.scroll_to_top
    }

    pub fn header_scroll(&self) -> Option<&HeaderScroll> {
        self.header_scroll.as_ref()
    }

    /// The consent banner, when one was shown.
    pub fn consent(&self) -> Option<&ConsentBanner> {
        self.consent.as_ref()
    }

    /// Number of nav links marked as the current page.
    pub const fn active_links(&self) -> usize {
        self.active_links
    }

    /// The span covering this page's log records.
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}
