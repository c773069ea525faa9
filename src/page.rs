//! Page Model
//!
//! Minimal page/component tree: components nest by id, carry a render body,
//! and register event handlers. Pages are loaded once and looked up by name
//! through a [`PageSource`].

use crate::error::ResolutionError;
use crate::heartbeat::Heartbeat;
use crate::render::RenderCommand;
use crate::session::SessionAccessor;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// What an event handler asks the framework to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Redirect to another page's render link
    Redirect { page: String, context: Vec<String> },
    /// Literal response content
    Content { content_type: String, body: String },
    /// Re-render the named component subtree of the current page
    Zone(String),
}

/// Everything a handler can see while processing one event.
pub struct EventContext<'a> {
    pub page: &'a Page,
    /// Nested id of the component whose handler is running
    pub component_id: &'a str,
    pub event_type: &'a str,
    pub context: &'a [String],
    pub heartbeat: &'a Heartbeat,
    pub sessions: &'a SessionAccessor,
}

impl EventContext<'_> {
    /// Context argument by position
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.context.get(index).map(String::as_str)
    }
}

/// Returns `Ok(None)` to let the event keep bubbling to the container.
pub type EventHandler =
    Arc<dyn Fn(&EventContext<'_>) -> anyhow::Result<Option<EventResult>> + Send + Sync>;

/// Render body of a component.
#[derive(Clone, Default)]
pub enum Body {
    /// Renders only its children
    #[default]
    Empty,
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Custom(Arc<dyn RenderCommand>),
}

#[derive(Clone)]
pub struct Component {
    id: String,
    body: Body,
    children: Vec<Arc<Component>>,
    handlers: HashMap<String, EventHandler>,
}

impl Component {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: Body::Empty,
            children: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    pub fn element(mut self, name: impl Into<String>) -> Self {
        self.body = Body::Element {
            name: name.into(),
            attributes: Vec::new(),
        };
        self
    }

    /// Add an attribute; ignored unless the body is an element.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Body::Element { attributes, .. } = &mut self.body {
            attributes.push((name.into(), value.into()));
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Body::Text(text.into());
        self
    }

    pub fn custom(mut self, command: Arc<dyn RenderCommand>) -> Self {
        self.body = Body::Custom(command);
        self
    }

    pub fn child(mut self, child: Component) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Register a handler; event types match case-insensitively.
    pub fn on<F>(mut self, event_type: &str, handler: F) -> Self
    where
        F: Fn(&EventContext<'_>) -> anyhow::Result<Option<EventResult>> + Send + Sync + 'static,
    {
        self.handlers
            .insert(event_type.to_ascii_lowercase(), Arc::new(handler));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn children(&self) -> &[Arc<Component>] {
        &self.children
    }

    pub fn handler(&self, event_type: &str) -> Option<&EventHandler> {
        self.handlers.get(&event_type.to_ascii_lowercase())
    }

    fn find_child(&self, id: &str) -> Option<&Arc<Component>> {
        self.children.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut events: Vec<&String> = self.handlers.keys().collect();
        events.sort();
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("children", &self.children.len())
            .field("events", &events)
            .finish()
    }
}

/// A loaded page: its name, component tree, and mutable page properties.
pub struct Page {
    name: String,
    root: Arc<Component>,
    properties: Mutex<HashMap<String, Value>>,
}

impl Page {
    pub fn new(name: impl Into<String>, root: Component) -> Self {
        Self {
            name: name.into(),
            root: Arc::new(root),
            properties: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Arc<Component> {
        &self.root
    }

    /// Components from the root down to `nested_id` (dot separated, empty = root).
    pub fn component_chain(&self, nested_id: &str) -> Result<Vec<Arc<Component>>, ResolutionError> {
        let mut chain = vec![self.root.clone()];
        if nested_id.is_empty() {
            return Ok(chain);
        }
        for segment in nested_id.split('.') {
            let next = chain
                .last()
                .and_then(|current| current.find_child(segment))
                .cloned()
                .ok_or_else(|| ResolutionError::ComponentNotFound {
                    page: self.name.clone(),
                    component: nested_id.to_string(),
                })?;
            chain.push(next);
        }
        Ok(chain)
    }

    /// Component by nested id.
    pub fn component(&self, nested_id: &str) -> Result<Arc<Component>, ResolutionError> {
        let mut chain = self.component_chain(nested_id)?;
        // component_chain always yields at least the root
        Ok(chain.pop().unwrap_or_else(|| self.root.clone()))
    }

    pub fn property(&self, name: &str) -> Option<Value> {
        self.properties.lock().get(name).cloned()
    }

    pub fn set_property(&self, name: impl Into<String>, value: Value) {
        self.properties.lock().insert(name.into(), value);
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("name", &self.name).finish()
    }
}

/// Loads pages by logical name.
pub trait PageSource: Send + Sync {
    fn get_page(&self, name: &str) -> Option<Arc<Page>>;
}

/// Case-insensitive in-memory page registry.
#[derive(Default)]
pub struct PageRegistry {
    pages: HashMap<String, Arc<Page>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, page: Page) -> Arc<Page> {
        let page = Arc::new(page);
        self.pages
            .insert(page.name().to_ascii_lowercase(), page.clone());
        page
    }

    /// Registered page names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pages.values().map(|p| p.name().to_string()).collect();
        names.sort();
        names
    }
}

impl PageSource for PageRegistry {
    fn get_page(&self, name: &str) -> Option<Arc<Page>> {
        self.pages.get(&name.to_ascii_lowercase()).cloned()
    }
}
