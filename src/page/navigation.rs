// Site navigation: mobile menu, active-link tracking, in-page scroll targets

use tracing::debug;

/// A section counts as current once the viewport is this close to its top.
pub const ACTIVE_SECTION_LEAD: f64 = 200.0;

/// Height of the fixed header that in-page scrolling must clear.
pub const HEADER_OFFSET: f64 = 80.0;

/// Where a document click landed, relative to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOrigin {
    Toggle,
    Menu,
    Outside,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        debug!(open = self.open, "Mobile menu toggled");
        self.open
    }

    /// Following a link always collapses the menu.
    pub fn on_link_click(&mut self) {
        self.open = false;
    }

    /// Document-level click handler. The toggle's own click is handled by
    /// [`toggle`](Self::toggle); only clicks outside both toggle and menu close it.
    pub fn on_document_click(&mut self, origin: ClickOrigin) {
        if origin == ClickOrigin::Outside && self.open {
            self.open = false;
            debug!("Mobile menu closed by outside click");
        }
    }
}

/// Vertical placement of a page section, in document coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Last section (in document order) whose top, less the lead, is at or above
/// the scroll offset.
pub fn active_section(sections: &[Section], scroll_offset: f64) -> Option<&Section> {
    sections
        .iter()
        .rev()
        .find(|section| scroll_offset >= section.top - ACTIVE_SECTION_LEAD)
}

#[derive(Debug, Clone)]
pub struct Navigation {
    sections: Vec<Section>,
    links: Vec<String>,
    active: Option<String>,
    menu: MobileMenu,
}

impl Navigation {
    /// `links` are the hrefs of the nav bar entries, e.g. `#programs`.
    pub fn new(sections: Vec<Section>, links: Vec<String>) -> Self {
        Self {
            sections,
            links,
            active: None,
            menu: MobileMenu::new(),
        }
    }

    pub fn menu(&self) -> &MobileMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut MobileMenu {
        &mut self.menu
    }

    /// Href of the highlighted link, if any link matches the current section
    pub fn active_link(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Recompute the highlighted link for a new scroll offset.
    pub fn on_scroll(&mut self, scroll_offset: f64) -> Option<&str> {
        let current = active_section(&self.sections, scroll_offset).map(|s| format!("#{}", s.id));
        let active = current.filter(|href| self.links.iter().any(|link| link == href));

        if active != self.active {
            debug!(
                scroll_offset,
                from = ?self.active,
                to = ?active,
                "Active nav link changed"
            );
            self.active = active;
        }
        self.active.as_deref()
    }

    /// Scroll position for an in-page link, clearing the fixed header.
    /// Returns `None` for external links and unknown anchors.
    pub fn scroll_target(&self, href: &str) -> Option<f64> {
        let id = href.strip_prefix('#')?;
        self.sections
            .iter()
            .find(|section| section.id == id)
            .map(|section| section.top - HEADER_OFFSET)
    }

    /// Handle a click on a nav link: collapse the menu and resolve where to scroll.
    pub fn follow_link(&mut self, href: &str) -> Option<f64> {
        self.menu.on_link_click();
        self.scroll_target(href)
    }
}
