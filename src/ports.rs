//! Effects the host browser performs on our behalf.

use crate::page::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// Window-level effects: dialogs, navigation, scrolling.
pub trait Browser: Send + Sync {
    /// Blocking `alert()`.
    fn alert(&self, message: &str);
    fn navigate(&self, url: &str);
    fn scroll_into_view(&self, target: &Element, options: ScrollOptions);
}

/// Widget library hooks (tooltips, popovers, dismissible alerts).
pub trait Toolkit: Send + Sync {
    fn tooltip(&self, trigger: &Element);
    fn popover(&self, trigger: &Element);
    fn close_alert(&self, alert: &Element);
}

/// [`Toolkit`] acting on the page model alone: widgets are flagged with a
/// `data-bs-widget` attribute, closed alerts are detached.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessToolkit;

impl Toolkit for HeadlessToolkit {
    fn tooltip(&self, trigger: &Element) {
        trigger.set_attr("data-bs-widget", "tooltip");
    }

    fn popover(&self, trigger: &Element) {
        trigger.set_attr("data-bs-widget", "popover");
    }

    fn close_alert(&self, alert: &Element) {
        alert.remove();
    }
}
