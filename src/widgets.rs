//! Small page behaviours: widgets, validation, previews, scrolling, busy buttons.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::task::JoinHandle;

use crate::page::{DomEvent, Element, Page, SelectedFile};
use crate::ports::{Browser, ScrollBehavior, ScrollBlock, ScrollOptions, Toolkit};

pub const PROCESSING_HTML: &str = r#"<span class="loading"></span> Processing..."#;

/// Initialises a tooltip on every `[data-bs-toggle="tooltip"]`.
pub fn init_tooltips(page: &Page, toolkit: &dyn Toolkit) -> Vec<Element> {
    let triggers = page.by_attr("data-bs-toggle", "tooltip");
    for trigger in &triggers {
        toolkit.tooltip(trigger);
    }
    triggers
}

/// Initialises a popover on every `[data-bs-toggle="popover"]`.
pub fn init_popovers(page: &Page, toolkit: &dyn Toolkit) -> Vec<Element> {
    let triggers = page.by_attr("data-bs-toggle", "popover");
    for trigger in &triggers {
        toolkit.popover(trigger);
    }
    triggers
}

/// Closes every `.alert` on the page once `delay` has passed.
///
/// Alerts are collected when the timer fires, not when it is set.
pub fn schedule_alert_dismissal(
    page: &Page,
    toolkit: Arc<dyn Toolkit>,
    delay: Duration,
) -> JoinHandle<()> {
    let page = page.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        for alert in page.by_class("alert") {
            toolkit.close_alert(&alert);
        }
    })
}

/// Submit guard for a `.needs-validation` form.
#[derive(Debug, Clone)]
pub struct FormValidation {
    form: Element,
}

impl FormValidation {
    pub fn new(form: Element) -> Self {
        Self { form }
    }

    /// Blocks invalid submissions; always marks the form `was-validated`.
    pub fn on_submit(&self, event: &mut DomEvent) -> bool {
        let valid = self.form.check_validity();
        if !valid {
            event.prevent_default();
            event.stop_propagation();
        }
        self.form.add_class("was-validated");
        valid
    }
}

fn data_url(file: &SelectedFile) -> String {
    let mime = if file.mime.is_empty() {
        "application/octet-stream"
    } else {
        &file.mime
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(&file.bytes))
}

/// Shows the picked image of a file input in its `preview-<id>` element.
#[derive(Debug, Clone)]
pub struct FilePreview {
    input: Element,
    preview: Option<Element>,
}

impl FilePreview {
    pub fn new(input: Element, preview: Option<Element>) -> Self {
        Self { input, preview }
    }

    /// Change handler. Returns whether a preview was rendered.
    pub fn on_change(&self) -> bool {
        let files = self.input.files();
        let (Some(file), Some(preview)) = (files.first(), &self.preview) else {
            return false;
        };
        preview.set_attr("src", &data_url(file));
        preview.set_style("display", "block");
        true
    }
}

/// Smooth scrolling for an in-page `a[href^="#"]`.
#[derive(Clone)]
pub struct SmoothScroll {
    page: Page,
    anchor: Element,
    browser: Arc<dyn Browser>,
}

impl SmoothScroll {
    pub fn new(page: Page, anchor: Element, browser: Arc<dyn Browser>) -> Self {
        Self {
            page,
            anchor,
            browser,
        }
    }

    /// Click handler; the target is resolved at click time.
    pub fn on_click(&self, event: &mut DomEvent) {
        event.prevent_default();
        let href = self.anchor.attr("href").unwrap_or_default();
        if let Some(target) = self.page.fragment_target(&href) {
            self.browser.scroll_into_view(
                &target,
                ScrollOptions {
                    behavior: ScrollBehavior::Smooth,
                    block: ScrollBlock::Start,
                },
            );
        }
    }
}

/// Busy state for a submit button whose form is about to go out.
#[derive(Debug, Clone)]
pub struct LoadingButton {
    button: Element,
}

impl LoadingButton {
    pub fn new(button: Element) -> Self {
        Self { button }
    }

    pub fn on_click(&self) {
        let Some(form) = self.button.closest("form") else {
            return;
        };
        if form.check_validity() {
            self.button.set_inner_html(PROCESSING_HTML);
            self.button.set_disabled(true);
        }
    }
}
