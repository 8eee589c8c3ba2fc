//! Headless view tree.
//!
//! A small retained element model that components render into and that the
//! state-change listener mutates. Elements are shared handles: cloning an
//! [`Element`] yields another handle to the *same* node, the way a DOM
//! reference would. Event handlers are bound per node, so two fragments
//! rendered from one component never share handlers or mutable state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

/// Background work started by an event handler or a fetch (usually a
/// network call). Awaiting it waits for the outcome to be applied.
pub type Pending = JoinHandle<()>;

type ChangeHandler = Arc<dyn Fn(&str) -> Option<Pending> + Send + Sync>;
type ClickHandler = Arc<dyn Fn() -> Option<Pending> + Send + Sync>;

#[derive(Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    children: Vec<Element>,
    on_change: Option<ChangeHandler>,
    on_click: Option<ClickHandler>,
}

/// Handle to a node of the view tree.
#[derive(Clone)]
pub struct Element {
    node: Arc<Mutex<Node>>,
}

impl Element {
    /// Create a detached element with the given tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            node: Arc::new(Mutex::new(Node {
                tag: tag.into(),
                ..Node::default()
            })),
        }
    }

    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.lock().id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_attribute(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.lock().attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    #[must_use]
    pub fn with_value(self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    #[must_use]
    pub fn with_child(self, child: Element) -> Self {
        self.append(child);
        self
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.lock().tag.clone()
    }

    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.lock().id.clone()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.lock().value.clone()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.lock().attributes.get(name).cloned()
    }

    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.lock().classes.clone()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.lock().classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn children(&self) -> Vec<Element> {
        self.lock().children.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().text = text.into();
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.lock().value = Some(value.into());
    }

    /// Add a CSS class; adding a class twice is a no-op.
    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        let mut node = self.lock();
        if !node.classes.contains(&class) {
            node.classes.push(class);
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.lock().classes.retain(|c| c != class);
    }

    /// Append `child` as the last child of this element.
    pub fn append(&self, child: Element) {
        self.lock().children.push(child);
    }

    /// Bind the handler run when the element's value is changed by the user.
    ///
    /// Replaces any previously bound change handler.
    pub fn on_change(&self, handler: impl Fn(&str) -> Option<Pending> + Send + Sync + 'static) {
        self.lock().on_change = Some(Arc::new(handler));
    }

    /// Bind the handler run when the element is clicked.
    ///
    /// Replaces any previously bound click handler.
    pub fn on_click(&self, handler: impl Fn() -> Option<Pending> + Send + Sync + 'static) {
        self.lock().on_click = Some(Arc::new(handler));
    }

    #[must_use]
    pub fn has_change_handler(&self) -> bool {
        self.lock().on_change.is_some()
    }

    #[must_use]
    pub fn has_click_handler(&self) -> bool {
        self.lock().on_click.is_some()
    }

    /// Simulate the user entering `value` and committing it.
    ///
    /// The element's value is updated first, then the change handler runs.
    /// Returns whatever background work the handler started.
    pub fn dispatch_change(&self, value: &str) -> Option<Pending> {
        let handler = {
            let mut node = self.lock();
            node.value = Some(value.to_string());
            node.on_change.clone()
        };
        handler.and_then(|handler| handler(value))
    }

    /// Simulate a click. Returns whatever background work the handler started.
    pub fn dispatch_click(&self) -> Option<Pending> {
        let handler = self.lock().on_click.clone();
        handler.and_then(|handler| handler())
    }

    /// First element with `id` in depth-first order, this element included.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        let children = {
            let node = self.lock();
            if node.id.as_deref() == Some(id) {
                return Some(self.clone());
            }
            node.children.clone()
        };
        children.iter().find_map(|child| child.find_by_id(id))
    }

    /// Every element with `id` in depth-first order, this element included.
    #[must_use]
    pub fn find_all_by_id(&self, id: &str) -> Vec<Element> {
        let mut found = Vec::new();
        self.collect_by_id(id, &mut found);
        found
    }

    fn collect_by_id(&self, id: &str, found: &mut Vec<Element>) {
        let children = {
            let node = self.lock();
            if node.id.as_deref() == Some(id) {
                found.push(self.clone());
            }
            node.children.clone()
        };
        for child in &children {
            child.collect_by_id(id, found);
        }
    }

    /// First descendant carrying `class`, this element excluded.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<Element> {
        self.children().iter().find_map(|child| {
            if child.has_class(class) {
                Some(child.clone())
            } else {
                child.find_by_class(class)
            }
        })
    }

    /// Whether both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Serialize this element and its subtree as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let (tag, children) = {
            let node = self.lock();
            out.push('<');
            out.push_str(&node.tag);
            if let Some(id) = &node.id {
                push_attribute(out, "id", id);
            }
            if !node.classes.is_empty() {
                push_attribute(out, "class", &node.classes.join(" "));
            }
            for (name, value) in &node.attributes {
                push_attribute(out, name, value);
            }
            if let Some(value) = &node.value {
                push_attribute(out, "value", value);
            }
            out.push('>');
            if is_void(&node.tag) {
                return;
            }
            out.push_str(&escape(&node.text));
            (node.tag.clone(), node.children.clone())
        };
        for child in &children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }

    fn lock(&self) -> MutexGuard<'_, Node> {
        self.node.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.lock();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("id", &node.id)
            .field("classes", &node.classes)
            .field("children", &node.children.len())
            .finish_non_exhaustive()
    }
}

/// The set of root containers a dashboard renders into.
///
/// The state-change listener searches every mounted root when it looks up
/// a component's fragment.
#[derive(Clone, Default)]
pub struct Document {
    roots: Arc<Mutex<Vec<Element>>>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `root` and its subtree reachable from lookups.
    pub fn mount(&self, root: Element) {
        self.lock().push(root);
    }

    #[must_use]
    pub fn roots(&self) -> Vec<Element> {
        self.lock().clone()
    }

    /// Every element with `id` across all mounted roots.
    #[must_use]
    pub fn find_all_by_id(&self, id: &str) -> Vec<Element> {
        self.roots()
            .iter()
            .flat_map(|root| root.find_all_by_id(id))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Element>> {
        self.roots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "meta" | "link")
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn should_share_node_between_clones() {
        let a = Element::new("span");
        let b = a.clone();
        b.set_text("hello");
        assert_eq!(a.text(), "hello");
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn should_not_duplicate_classes() {
        let el = Element::new("div").with_class("compo");
        el.add_class("compo");
        assert_eq!(el.classes(), vec!["compo".to_string()]);
    }

    #[test]
    fn should_remove_class() {
        let el = Element::new("div").with_class("compo").with_class("off");
        el.remove_class("off");
        assert!(el.has_class("compo"));
        assert!(!el.has_class("off"));
    }

    #[test]
    fn should_find_nested_element_by_id() {
        let inner = Element::new("div").with_id("heating_div");
        let root = Element::new("div")
            .with_id("panel")
            .with_child(Element::new("section").with_child(inner.clone()));

        assert!(root.find_by_id("heating_div").unwrap().ptr_eq(&inner));
        assert!(root.find_by_id("panel").unwrap().ptr_eq(&root));
        assert!(root.find_by_id("missing").is_none());
    }

    #[test]
    fn should_find_every_element_sharing_an_id() {
        let root = Element::new("div")
            .with_child(Element::new("div").with_id("x"))
            .with_child(Element::new("div").with_id("x"));
        assert_eq!(root.find_all_by_id("x").len(), 2);
    }

    #[test]
    fn should_find_descendant_by_class_only() {
        let button = Element::new("button").with_class("toggle");
        let root = Element::new("div").with_class("toggle").with_child(button.clone());
        assert!(root.find_by_class("toggle").unwrap().ptr_eq(&button));
    }

    #[test]
    fn should_update_value_before_running_change_handler() {
        let input = Element::new("input");
        let seen = Arc::new(Mutex::new(None));
        let probe = input.clone();
        let sink = Arc::clone(&seen);
        input.on_change(move |raw| {
            *sink.lock().unwrap() = Some((raw.to_string(), probe.value()));
            None
        });

        assert!(input.dispatch_change("21").is_none());
        assert_eq!(
            *seen.lock().unwrap(),
            Some(("21".to_string(), Some("21".to_string())))
        );
    }

    #[test]
    fn should_run_click_handler_once_per_click() {
        let button = Element::new("button");
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);
        button.on_click(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });

        let _ = button.dispatch_click();
        let _ = button.dispatch_click();
        assert_eq!(clicks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn should_ignore_events_without_handler() {
        let button = Element::new("button");
        assert!(button.dispatch_click().is_none());
        assert!(button.dispatch_change("x").is_none());
    }

    #[test]
    fn should_allow_handler_to_mutate_its_own_element() {
        let button = Element::new("button").with_text("OFF");
        let target = button.clone();
        button.on_click(move || {
            target.set_text("ON");
            None
        });
        let _ = button.dispatch_click();
        assert_eq!(button.text(), "ON");
    }

    #[test]
    fn should_render_html() {
        let el = Element::new("div")
            .with_id("heating_div")
            .with_class("compo")
            .with_child(Element::new("span").with_text("heating"))
            .with_child(
                Element::new("input")
                    .with_class("temperature")
                    .with_attribute("type", "number")
                    .with_attribute("min", "10")
                    .with_attribute("max", "25")
                    .with_value("20"),
            );
        assert_eq!(
            el.to_html(),
            "<div id=\"heating_div\" class=\"compo\"><span>heating</span>\
             <input class=\"temperature\" max=\"25\" min=\"10\" type=\"number\" value=\"20\"></div>"
        );
    }

    #[test]
    fn should_escape_text_and_attributes() {
        let el = Element::new("span")
            .with_attribute("title", "a\"b")
            .with_text("<b>&</b>");
        assert_eq!(
            el.to_html(),
            "<span title=\"a&quot;b\">&lt;b&gt;&amp;&lt;/b&gt;</span>"
        );
    }

    #[test]
    fn should_search_every_mounted_root() {
        let doc = Document::new();
        doc.mount(Element::new("div").with_child(Element::new("p").with_id("x")));
        doc.mount(Element::new("div").with_child(Element::new("p").with_id("x")));
        assert_eq!(doc.find_all_by_id("x").len(), 2);
        assert_eq!(doc.roots().len(), 2);
    }
}
