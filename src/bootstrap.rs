//! Page-ready wiring: finds what the page offers and binds a handler to it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::checkout::{CheckoutFlow, CheckoutPort};
use crate::config::{
    PASSWORD_ID, PASSWORD_STRENGTH_ID, PAYMENT_FORM_ID, PREVIEW_PREFIX, SEARCH_ID,
    SEARCH_RESULTS_ID, UiConfig,
};
use crate::evaluator::PasswordStrengthMeter;
use crate::page::Page;
use crate::ports::{Browser, Toolkit};
use crate::search::{SearchBinding, SearchBox};
use crate::widgets::{
    FilePreview, FormValidation, LoadingButton, SmoothScroll, init_popovers, init_tooltips,
    schedule_alert_dismissal,
};

/// Host services handed to the bootstrap routine.
#[derive(Clone)]
pub struct Ports {
    pub browser: Arc<dyn Browser>,
    pub toolkit: Arc<dyn Toolkit>,
    pub checkout: Arc<dyn CheckoutPort>,
}

/// Every handler bound by [`attach`]; the host routes DOM events to them.
///
/// Features whose elements are missing are simply absent here.
pub struct AttachedUi {
    pub tooltips: usize,
    pub popovers: usize,
    pub alert_dismissal: JoinHandle<()>,
    pub forms: Vec<FormValidation>,
    pub password: Option<PasswordStrengthMeter>,
    pub search: Option<SearchBinding>,
    pub checkout: Option<CheckoutFlow>,
    pub file_previews: Vec<FilePreview>,
    pub anchors: Vec<SmoothScroll>,
    pub loading_buttons: Vec<LoadingButton>,
}

/// Binds every page behaviour. Call once, when the page is ready, from
/// within a tokio runtime.
pub fn attach(page: &Page, ports: &Ports, config: &UiConfig) -> AttachedUi {
    let tooltips = init_tooltips(page, ports.toolkit.as_ref()).len();
    let popovers = init_popovers(page, ports.toolkit.as_ref()).len();
    let alert_dismissal =
        schedule_alert_dismissal(page, Arc::clone(&ports.toolkit), config.alert_dismiss_after());

    let forms = page
        .by_class("needs-validation")
        .into_iter()
        .map(FormValidation::new)
        .collect();

    let password = page.get_element_by_id(PASSWORD_ID).map(|input| {
        PasswordStrengthMeter::new(input, page.get_element_by_id(PASSWORD_STRENGTH_ID))
    });

    let search = page.get_element_by_id(SEARCH_ID).map(|_| {
        SearchBinding::new(
            SearchBox::new(page.get_element_by_id(SEARCH_RESULTS_ID), config),
            config.search_debounce(),
        )
    });

    let payment_form = page.get_element_by_id(PAYMENT_FORM_ID);
    let checkout = payment_form.clone().map(|form| {
        CheckoutFlow::new(
            page.clone(),
            form,
            Arc::clone(&ports.checkout),
            Arc::clone(&ports.browser),
            config,
        )
    });

    let file_previews = page
        .query_all(|e| e.is_typed("input", "file"))
        .into_iter()
        .map(|input| {
            let preview = page.get_element_by_id(&format!("{PREVIEW_PREFIX}{}", input.id()));
            FilePreview::new(input, preview)
        })
        .collect();

    let anchors = page
        .query_all(|e| {
            e.tag() == "a" && e.attr("href").is_some_and(|href| href.starts_with('#'))
        })
        .into_iter()
        .map(|anchor| SmoothScroll::new(page.clone(), anchor, Arc::clone(&ports.browser)))
        .collect();

    // The checkout flow owns the payment form's control
    let loading_buttons = page
        .query_all(|e| e.is_typed("button", "submit"))
        .into_iter()
        .filter(|button| {
            !matches!(
                (&payment_form, button.closest("form")),
                (Some(payment), Some(owner)) if owner.ptr_eq(payment)
            )
        })
        .map(LoadingButton::new)
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        tooltips,
        popovers,
        password = password.is_some(),
        search = search.is_some(),
        checkout = checkout.is_some(),
        "page behaviours attached"
    );

    AttachedUi {
        tooltips,
        popovers,
        alert_dismissal,
        forms,
        password,
        search,
        checkout,
        file_previews,
        anchors,
        loading_buttons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PUBLISHABLE_KEY_META;
    use crate::page::{DomEvent, Element};
    use crate::search::LOADING_HTML;
    use crate::testing::{FakeCheckout, RecordingBrowser, RecordingToolkit};
    use std::time::Duration;
    use tokio::time::sleep;

    fn ports() -> (Ports, Arc<RecordingBrowser>, Arc<RecordingToolkit>) {
        let browser = Arc::new(RecordingBrowser::default());
        let toolkit = Arc::new(RecordingToolkit::default());
        let checkout = Arc::new(FakeCheckout::new(Ok("pi_1_secret_x".to_string()), Ok(())));
        (
            Ports {
                browser: browser.clone(),
                toolkit: toolkit.clone(),
                checkout,
            },
            browser,
            toolkit,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_page_binds_nothing() {
        let (ports, _, _) = ports();
        let ui = attach(&Page::new(), &ports, &UiConfig::default());

        assert_eq!(ui.tooltips, 0);
        assert!(ui.forms.is_empty());
        assert!(ui.password.is_none());
        assert!(ui.search.is_none());
        assert!(ui.checkout.is_none());
        assert!(ui.file_previews.is_empty());
        assert!(ui.anchors.is_empty());
        assert!(ui.loading_buttons.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_page_wiring() {
        let page = Page::new();
        page.head().append_child(
            &Element::new("meta")
                .with_attr("name", PUBLISHABLE_KEY_META)
                .with_attr("content", "pk_test_42"),
        );
        let body = page.body();
        body.append_child(&Element::new("div").with_class("alert").with_html("Welcome back"));
        body.append_child(&Element::new("i").with_attr("data-bs-toggle", "tooltip"));

        let password = Element::new("input").with_id("password");
        let strength = Element::new("span").with_id("password-strength");
        let register_button = Element::new("button").with_attr("type", "submit");
        body.append_child(
            &Element::new("form")
                .with_class("needs-validation")
                .with_child(password.clone())
                .with_child(strength.clone())
                .with_child(register_button.clone()),
        );

        let search = Element::new("input").with_id("search");
        let results = Element::new("div").with_id("search-results");
        body.append_child(&search);
        body.append_child(&results);

        let pay_button = Element::new("button").with_attr("type", "submit").with_html("Pay");
        body.append_child(
            &Element::new("form")
                .with_id("payment-form")
                .with_child(pay_button.clone()),
        );

        let photo = Element::new("input").with_attr("type", "file").with_id("photo");
        body.append_child(&photo);
        body.append_child(&Element::new("img").with_id("preview-photo"));
        body.append_child(&Element::new("a").with_attr("href", "#top"));
        body.append_child(&Element::new("a").with_attr("href", "/events/"));

        let (ports, _browser, toolkit) = ports();
        let ui = attach(&page, &ports, &UiConfig::default());

        assert_eq!(ui.tooltips, 1);
        assert_eq!(ui.forms.len(), 1);
        assert_eq!(ui.file_previews.len(), 1);
        assert_eq!(ui.anchors.len(), 1);
        assert_eq!(ui.loading_buttons.len(), 1);
        assert!(ui.checkout.as_ref().unwrap().form().id() == "payment-form");

        password.set_value("Abcdef1!");
        ui.password.as_ref().unwrap().on_input();
        assert_eq!(strength.inner_html(), "Strong");

        ui.search.as_ref().unwrap().on_input("events");
        sleep(Duration::from_millis(301)).await;
        assert_eq!(results.inner_html(), LOADING_HTML);

        let mut event = DomEvent::new();
        ui.forms[0].on_submit(&mut event);
        assert!(!event.default_prevented());

        sleep(Duration::from_millis(5000)).await;
        assert_eq!(toolkit.closed.lock().unwrap().len(), 1);
    }
}
