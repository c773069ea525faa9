//! Component invocations: the parsed target of an inbound action request.

use crate::error::DispatchError;
use std::fmt;

/// Page, nested component, event type, and context of one action request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInvocation {
    page_name: String,
    nested_id: String,
    event_type: String,
    context: Vec<String>,
}

impl ComponentInvocation {
    /// `page_name` and `event_type` must be non-empty; `nested_id` may be
    /// empty to target the page itself.
    pub fn new(
        page_name: impl Into<String>,
        nested_id: impl Into<String>,
        event_type: impl Into<String>,
        context: Vec<String>,
    ) -> Result<Self, DispatchError> {
        let page_name = page_name.into();
        let event_type = event_type.into();
        if page_name.trim().is_empty() {
            return Err(DispatchError::InvalidInvocation(
                "page name must not be empty".to_string(),
            ));
        }
        if event_type.trim().is_empty() {
            return Err(DispatchError::InvalidInvocation(
                "event type must not be empty".to_string(),
            ));
        }
        Ok(Self {
            page_name,
            nested_id: nested_id.into(),
            event_type,
            context,
        })
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub fn nested_id(&self) -> &str {
        &self.nested_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }
}

impl fmt::Display for ComponentInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.page_name)?;
        if !self.nested_id.is_empty() {
            write!(f, ":{}", self.nested_id)?;
        }
        write!(f, ".{}", self.event_type)?;
        for value in &self.context {
            write!(f, "/{}", value)?;
        }
        Ok(())
    }
}
