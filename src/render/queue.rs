//! Render queue: a LIFO stack of render commands drained into a writer.

use super::environment::Environment;
use super::writer::MarkupWriter;
use super::RenderCommand;
use crate::error::RenderError;
use crate::page::Page;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct RenderQueue {
    stack: Vec<Arc<dyn RenderCommand>>,
    page: Option<Arc<Page>>,
    partial: bool,
    executed: usize,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the queue for a full-page pass.
    pub fn initialize(&mut self, page: Arc<Page>, root: Arc<dyn RenderCommand>) {
        self.reset(page, root, false);
    }

    /// Seed the queue for a partial (subtree) pass.
    pub fn initialize_partial(&mut self, page: Arc<Page>, root: Arc<dyn RenderCommand>) {
        self.reset(page, root, true);
    }

    fn reset(&mut self, page: Arc<Page>, root: Arc<dyn RenderCommand>, partial: bool) {
        self.stack.clear();
        self.stack.push(root);
        self.page = Some(page);
        self.partial = partial;
        self.executed = 0;
    }

    /// Queue a command; the most recently pushed runs next.
    pub fn push(&mut self, command: Arc<dyn RenderCommand>) {
        self.stack.push(command);
    }

    /// Page being rendered
    pub fn page(&self) -> Option<&Arc<Page>> {
        self.page.as_ref()
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Commands executed by the last `run`
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Pop and execute commands until the stack is empty. The first error aborts the pass.
    pub fn run(
        &mut self,
        writer: &mut dyn MarkupWriter,
        environment: &mut Environment,
    ) -> Result<(), RenderError> {
        while let Some(command) = self.stack.pop() {
            command.render(writer, self, environment)?;
            self.executed += 1;
        }
        debug!(
            page = self.page.as_ref().map(|p| p.name()).unwrap_or("<none>"),
            partial = self.partial,
            commands = self.executed,
            "Render queue drained"
        );
        Ok(())
    }
}

impl std::fmt::Debug for RenderQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderQueue")
            .field("pending", &self.stack.len())
            .field("partial", &self.partial)
            .field("executed", &self.executed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Component;
    use crate::render::HtmlWriter;

    struct Emit(&'static str);

    impl RenderCommand for Emit {
        fn render(
            &self,
            writer: &mut dyn MarkupWriter,
            _queue: &mut RenderQueue,
            _environment: &mut Environment,
        ) -> Result<(), RenderError> {
            writer.write(self.0);
            Ok(())
        }
    }

    /// Pushes two commands; the later push runs first.
    struct Fork;

    impl RenderCommand for Fork {
        fn render(
            &self,
            _writer: &mut dyn MarkupWriter,
            queue: &mut RenderQueue,
            _environment: &mut Environment,
        ) -> Result<(), RenderError> {
            queue.push(Arc::new(Emit("b")));
            queue.push(Arc::new(Emit("a")));
            Ok(())
        }
    }

    #[test]
    fn test_queue_is_lifo_and_debug_reports_state() {
        let page = Arc::new(Page::new("Index", Component::new("")));
        let mut queue = RenderQueue::new();
        queue.initialize_partial(page, Arc::new(Fork));
        assert_eq!(
            format!("{:?}", queue),
            "RenderQueue { pending: 1, partial: true, executed: 0 }"
        );

        let mut writer = HtmlWriter::new();
        queue.run(&mut writer, &mut Environment::new()).unwrap();
        assert_eq!(writer.as_str(), "ab");
        assert!(queue.is_empty());
        assert_eq!(queue.executed(), 3);
        assert_eq!(queue.page().map(|p| p.name()), Some("Index"));
    }
}
