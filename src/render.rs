//! Markup Rendering
//!
//! Rendering drains a [`RenderQueue`] of [`RenderCommand`]s into a
//! [`MarkupWriter`]. Partial rendering (Ajax zone updates) renders a single
//! component subtree with no pipeline stages around the queue.

use crate::error::RenderError;
use crate::page::{Body, Component, Page};
use std::sync::Arc;
use tracing::debug;

mod environment;
mod queue;
mod writer;

pub use environment::Environment;
pub use queue::RenderQueue;
pub use writer::{HtmlWriter, MarkupWriter};

/// One step of a render pass. Commands may queue further commands.
pub trait RenderCommand: Send + Sync {
    fn render(
        &self,
        writer: &mut dyn MarkupWriter,
        queue: &mut RenderQueue,
        environment: &mut Environment,
    ) -> Result<(), RenderError>;
}

/// Renders a component body, then its children in order.
pub struct ComponentRenderCommand {
    component: Arc<Component>,
}

impl ComponentRenderCommand {
    pub fn new(component: Arc<Component>) -> Arc<dyn RenderCommand> {
        Arc::new(Self { component })
    }
}

impl RenderCommand for ComponentRenderCommand {
    fn render(
        &self,
        writer: &mut dyn MarkupWriter,
        queue: &mut RenderQueue,
        environment: &mut Environment,
    ) -> Result<(), RenderError> {
        match self.component.body() {
            Body::Empty => {}
            Body::Text(text) => writer.write(text),
            Body::Element { name, attributes } => {
                writer.element(name, attributes);
                queue.push(Arc::new(EndElement));
            }
            Body::Custom(command) => command.render(writer, queue, environment)?,
        }
        // Reversed so the first child is popped first.
        for child in self.component.children().iter().rev() {
            queue.push(ComponentRenderCommand::new(child.clone()));
        }
        Ok(())
    }
}

/// Closes the element opened by a component.
struct EndElement;

impl RenderCommand for EndElement {
    fn render(
        &self,
        writer: &mut dyn MarkupWriter,
        _queue: &mut RenderQueue,
        _environment: &mut Environment,
    ) -> Result<(), RenderError> {
        writer.end()
    }
}

/// Renders a page subtree into a response fragment.
pub trait PartialMarkupRenderer {
    fn render_partial_page_markup(
        &mut self,
        page: Arc<Page>,
        root: Arc<dyn RenderCommand>,
        writer: &mut dyn MarkupWriter,
    ) -> Result<(), RenderError>;
}

/// Request-scoped renderer owning the render environment and queue.
#[derive(Debug, Default)]
pub struct PageRenderer {
    environment: Environment,
    queue: RenderQueue,
}

impl PageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Full-page pass from the page's root component.
    pub fn render_page_markup(
        &mut self,
        page: Arc<Page>,
        writer: &mut dyn MarkupWriter,
    ) -> Result<(), RenderError> {
        self.environment.clear();
        let root = ComponentRenderCommand::new(page.root().clone());
        debug!(page = page.name(), "Rendering page markup");
        self.queue.initialize(page, root);
        self.queue.run(writer, &mut self.environment)
    }

    /// Partial pass rooted at the component with `nested_id`.
    pub fn render_component_markup(
        &mut self,
        page: Arc<Page>,
        nested_id: &str,
        writer: &mut dyn MarkupWriter,
    ) -> Result<(), RenderError> {
        let component = page.component(nested_id)?;
        self.render_partial_page_markup(page, ComponentRenderCommand::new(component), writer)
    }
}

impl PartialMarkupRenderer for PageRenderer {
    fn render_partial_page_markup(
        &mut self,
        page: Arc<Page>,
        root: Arc<dyn RenderCommand>,
        writer: &mut dyn MarkupWriter,
    ) -> Result<(), RenderError> {
        // Left cleared (not restored) if the pass fails.
        self.environment.clear();
        debug!(page = page.name(), "Rendering partial page markup");
        self.queue.initialize_partial(page, root);
        self.queue.run(writer, &mut self.environment)
    }
}
