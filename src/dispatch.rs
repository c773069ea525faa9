//! Action Link Dispatch
//!
//! Resolves an inbound action request (page, nested component, event type,
//! context) to a [`ResponseGenerator`]. The event is triggered on the target
//! component and bubbles up through its containers until a handler returns a
//! result. Event processing runs inside a heartbeat scope, so work deferred by
//! handlers runs before the response is produced.

use crate::error::{DispatchError, ResolutionError};
use crate::heartbeat::Heartbeat;
use crate::page::{EventContext, EventResult, Page, PageSource};
use crate::session::SessionAccessor;
use std::sync::Arc;
use tracing::{debug, warn};

mod invocation;
mod response;

pub use invocation::ComponentInvocation;
pub use response::{decode_context, encode_context, page_link, Response, ResponseGenerator};

/// Handles component action requests.
pub trait ActionLinkHandler {
    fn handle(
        &self,
        invocation: &ComponentInvocation,
        sessions: &SessionAccessor,
    ) -> Result<ResponseGenerator, DispatchError>;

    /// Build the invocation from its parts, then [`handle`](Self::handle) it.
    fn handle_link(
        &self,
        page_name: &str,
        component_id: &str,
        event_type: &str,
        context: &[String],
        sessions: &SessionAccessor,
    ) -> Result<ResponseGenerator, DispatchError> {
        let invocation =
            ComponentInvocation::new(page_name, component_id, event_type, context.to_vec())?;
        self.handle(&invocation, sessions)
    }
}

/// Dispatches action requests against pages from a [`PageSource`].
pub struct ActionDispatcher {
    pages: Arc<dyn PageSource>,
}

impl ActionDispatcher {
    pub fn new(pages: Arc<dyn PageSource>) -> Self {
        Self { pages }
    }

    fn to_response(
        &self,
        page: &Arc<Page>,
        result: Option<EventResult>,
    ) -> Result<ResponseGenerator, DispatchError> {
        match result {
            None => Ok(ResponseGenerator::page_link(page.name(), &[])),
            Some(EventResult::Redirect {
                page: target,
                context,
            }) => {
                let target_page = self
                    .pages
                    .get_page(&target)
                    .ok_or_else(|| ResolutionError::PageNotFound(target.clone()))?;
                Ok(ResponseGenerator::page_link(target_page.name(), &context))
            }
            Some(EventResult::Content { content_type, body }) => {
                Ok(ResponseGenerator::Content { content_type, body })
            }
            Some(EventResult::Zone(component_id)) => {
                page.component(&component_id)?;
                Ok(ResponseGenerator::PartialMarkup {
                    page: page.clone(),
                    component_id,
                })
            }
        }
    }
}

impl ActionLinkHandler for ActionDispatcher {
    fn handle(
        &self,
        invocation: &ComponentInvocation,
        sessions: &SessionAccessor,
    ) -> Result<ResponseGenerator, DispatchError> {
        debug!(invocation = %invocation, "Dispatching component event");

        let page = self
            .pages
            .get_page(invocation.page_name())
            .ok_or_else(|| ResolutionError::PageNotFound(invocation.page_name().to_string()))?;
        let chain = page.component_chain(invocation.nested_id())?;
        let segments: Vec<&str> = if invocation.nested_id().is_empty() {
            Vec::new()
        } else {
            invocation.nested_id().split('.').collect()
        };

        let heartbeat = Heartbeat::new();
        let base_depth = heartbeat.depth();
        heartbeat.begin();

        // Innermost component first, then each container up to the page root.
        let mut outcome = Ok(None);
        let mut handled = false;
        for (depth, component) in chain.iter().enumerate().rev() {
            let Some(handler) = component.handler(invocation.event_type()) else {
                continue;
            };
            handled = true;
            let component_id = segments[..depth].join(".");
            let ctx = EventContext {
                page: &page,
                component_id: &component_id,
                event_type: invocation.event_type(),
                context: invocation.context(),
                heartbeat: &heartbeat,
                sessions,
            };
            match handler(&ctx) {
                Ok(None) => continue,
                Ok(Some(result)) => {
                    debug!(component_id = %component_id, ?result, "Event aborted with result");
                    outcome = Ok(Some(result));
                    break;
                }
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        // Deferred work runs even when a handler failed. Scopes a handler left
        // open are closed too, innermost first, so nothing queued is dropped.
        let unclosed = heartbeat.depth().saturating_sub(base_depth + 1);
        if unclosed > 0 {
            warn!(invocation = %invocation, unclosed, "Handler left heartbeat scopes open");
        }
        while heartbeat.depth() > base_depth {
            heartbeat.end()?;
        }

        if !handled {
            warn!(invocation = %invocation, "No handler for component event");
        }
        let result = outcome.map_err(DispatchError::Handler)?;
        self.to_response(&page, result)
    }
}
