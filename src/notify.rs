//! Transient dismissible banners.

use std::fmt;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::page::{Element, Page};

const BANNER_STYLE: &str = "top: 20px; right: 20px; z-index: 9999; min-width: 300px;";

/// Contextual colour of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    #[default]
    Info,
    Light,
    Dark,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Primary => "primary",
            Severity::Secondary => "secondary",
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Light => "light",
            Severity::Dark => "dark",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A banner on the page and the task that will take it down.
#[derive(Debug)]
pub struct Notification {
    pub element: Element,
    pub removal: JoinHandle<()>,
}

impl Notification {
    /// User dismissal. Harmless if the banner is already gone.
    pub fn dismiss(&self) {
        self.element.remove();
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    page: Page,
    default_duration: Duration,
}

impl Notifier {
    pub fn new(page: Page, default_duration: Duration) -> Self {
        Self {
            page,
            default_duration,
        }
    }

    /// Appends a banner to the body and removes it after `duration`
    /// (the notifier default when `None`).
    ///
    /// Must be called from within a tokio runtime.
    pub fn notify(
        &self,
        message: &str,
        severity: Severity,
        duration: Option<Duration>,
    ) -> Notification {
        let element = Element::new("div")
            .with_class(&format!(
                "alert alert-{severity} alert-dismissible fade show position-fixed"
            ))
            .with_attr("style", BANNER_STYLE)
            .with_html(&format!(
                "\n        {message}\n        <button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\"></button>\n    "
            ));
        self.page.body().append_child(&element);

        let duration = duration.unwrap_or(self.default_duration);

        #[cfg(feature = "tracing")]
        tracing::debug!(%severity, duration_ms = duration.as_millis() as u64, "notification shown");

        let banner = element.clone();
        let removal = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            banner.remove();
        });

        Notification { element, removal }
    }
}
