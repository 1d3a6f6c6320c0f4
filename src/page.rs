//! Headless page model.
//!
//! A [`Page`] owns a `head` and a `body`; every node is an [`Element`], a cheap
//! clonable handle onto shared state. Handles are what components receive,
//! so nothing below the bootstrap routine ever searches the page.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// A file picked in an `input[type=file]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type as reported by the browser, empty when unknown.
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    inner_html: String,
    value: String,
    disabled: bool,
    invalid: bool,
    styles: BTreeMap<String, String>,
    files: Vec<SelectedFile>,
    children: Vec<Element>,
    parent: Option<Weak<RwLock<Node>>>,
}

/// Handle onto one node of the page tree.
#[derive(Clone)]
pub struct Element(Arc<RwLock<Node>>);

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.read();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("attributes", &node.attributes)
            .field("children", &node.children.len())
            .finish()
    }
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self(Arc::new(RwLock::new(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        })))
    }

    fn read(&self) -> RwLockReadGuard<'_, Node> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Node> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_html(self, html: &str) -> Self {
        self.set_inner_html(html);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(&child);
        self
    }

    pub fn tag(&self) -> String {
        self.read().tag.clone()
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // Attributes

    pub fn attr(&self, name: &str) -> Option<String> {
        self.read().attributes.get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.write()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&self, name: &str) {
        self.write().attributes.remove(name);
    }

    /// The `id` attribute, or an empty string.
    pub fn id(&self) -> String {
        self.attr("id").unwrap_or_default()
    }

    /// Reads a `data-*` attribute, e.g. `dataset("amount")` for `data-amount`.
    pub fn dataset(&self, key: &str) -> Option<String> {
        self.attr(&format!("data-{key}"))
    }

    pub fn class_name(&self) -> String {
        self.attr("class").unwrap_or_default()
    }

    pub fn set_class_name(&self, class_name: &str) {
        self.set_attr("class", class_name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name().split_whitespace().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let current = self.class_name();
        if current.trim().is_empty() {
            self.set_class_name(class);
        } else {
            self.set_class_name(&format!("{} {}", current.trim_end(), class));
        }
    }

    // Content and state

    pub fn inner_html(&self) -> String {
        self.read().inner_html.clone()
    }

    pub fn set_inner_html(&self, html: &str) {
        self.write().inner_html = html.to_string();
    }

    /// Replaces the content with escaped text.
    pub fn set_text_content(&self, text: &str) {
        self.set_inner_html(&escape_html(text));
    }

    pub fn value(&self) -> String {
        self.read().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        self.write().value = value.to_string();
    }

    pub fn is_disabled(&self) -> bool {
        self.read().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.write().disabled = disabled;
    }

    /// Marks this control as failing (or passing) its constraints.
    pub fn set_valid(&self, valid: bool) {
        self.write().invalid = !valid;
    }

    /// `checkValidity()`: this element and every descendant satisfy their constraints.
    pub fn check_validity(&self) -> bool {
        let invalid = self.read().invalid;
        !invalid && self.descendants().iter().all(|e| !e.read().invalid)
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.read().styles.get(property).cloned()
    }

    pub fn set_style(&self, property: &str, value: &str) {
        self.write()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    pub fn files(&self) -> Vec<SelectedFile> {
        self.read().files.clone()
    }

    pub fn set_files(&self, files: Vec<SelectedFile>) {
        self.write().files = files;
    }

    // Tree

    /// Appends `child`, detaching it from its previous parent first.
    pub fn append_child(&self, child: &Element) {
        if child.ptr_eq(self) {
            return;
        }
        child.remove();
        self.write().children.push(child.clone());
        child.write().parent = Some(Arc::downgrade(&self.0));
    }

    /// Detaches this element from its parent. Returns `false` if it was not attached.
    pub fn remove(&self) -> bool {
        let parent = self.write().parent.take();
        match parent.and_then(|weak| weak.upgrade()) {
            Some(parent) => {
                parent
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .children
                    .retain(|c| !c.ptr_eq(self));
                true
            }
            None => false,
        }
    }

    pub fn parent(&self) -> Option<Element> {
        self.read()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Element)
    }

    pub fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    pub fn children(&self) -> Vec<Element> {
        self.read().children.clone()
    }

    /// All descendants in document order.
    pub fn descendants(&self) -> Vec<Element> {
        let mut out = Vec::new();
        for child in self.children() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }

    /// First descendant matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<Element> {
        self.descendants().into_iter().find(|e| predicate(e))
    }

    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        self.find(|e| e.attr("id").as_deref() == Some(id))
    }

    /// Nearest ancestor with the given tag.
    pub fn closest(&self, tag: &str) -> Option<Element> {
        let mut current = self.parent();
        while let Some(element) = current {
            if element.tag() == tag {
                return Some(element);
            }
            current = element.parent();
        }
        None
    }

    /// Matches `<tag type="...">`.
    pub fn is_typed(&self, tag: &str, kind: &str) -> bool {
        self.tag() == tag && self.attr("type").as_deref() == Some(kind)
    }
}

/// An event handed to a handler by the host.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DomEvent {
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// The document: a `head` for metadata and a `body` for content.
#[derive(Debug, Clone)]
pub struct Page {
    head: Element,
    body: Element,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            head: Element::new("head"),
            body: Element::new("body"),
        }
    }

    pub fn head(&self) -> &Element {
        &self.head
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Every element of the document, head first, in document order.
    pub fn elements(&self) -> Vec<Element> {
        let mut all = self.head.descendants();
        all.extend(self.body.descendants());
        all
    }

    pub fn query_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<Element> {
        self.elements().into_iter().filter(|e| predicate(e)).collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.elements()
            .into_iter()
            .find(|e| e.attr("id").as_deref() == Some(id))
    }

    pub fn by_class(&self, class: &str) -> Vec<Element> {
        self.query_all(|e| e.has_class(class))
    }

    pub fn by_attr(&self, name: &str, value: &str) -> Vec<Element> {
        self.query_all(|e| e.attr(name).as_deref() == Some(value))
    }

    /// `content` of `<meta name="...">`.
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.elements()
            .into_iter()
            .find(|e| e.tag() == "meta" && e.attr("name").as_deref() == Some(name))
            .and_then(|meta| meta.attr("content"))
    }

    /// Value of the first element carrying `name="..."`.
    pub fn field_value(&self, name: &str) -> Option<String> {
        self.elements()
            .into_iter()
            .find(|e| e.attr("name").as_deref() == Some(name))
            .map(|field| field.value())
    }

    /// Resolves an in-page `#fragment` to its target element.
    pub fn fragment_target(&self, href: &str) -> Option<Element> {
        let id = href.strip_prefix('#')?;
        if id.is_empty() {
            return None;
        }
        self.get_element_by_id(id)
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
