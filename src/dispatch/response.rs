//! Response generators: what dispatch hands back to the transport layer.

use crate::error::RenderError;
use crate::page::Page;
use crate::render::{ComponentRenderCommand, HtmlWriter, PartialMarkupRenderer};
use serde_json::json;
use std::sync::Arc;

/// Produced by dispatch, consumed once by the transport layer.
#[derive(Debug, Clone)]
pub enum ResponseGenerator {
    Redirect { location: String },
    Content { content_type: String, body: String },
    PartialMarkup { page: Arc<Page>, component_id: String },
}

/// Transport-neutral response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub location: Option<String>,
    pub body: String,
}

impl ResponseGenerator {
    /// Redirect to the render link of `page` with `context`.
    pub fn page_link(page: &str, context: &[String]) -> Self {
        ResponseGenerator::Redirect {
            location: page_link(page, context),
        }
    }

    /// Write out the response. Partial markup is wrapped as `{"content": "<markup>"}`.
    pub fn generate(&self, renderer: &mut dyn PartialMarkupRenderer) -> Result<Response, RenderError> {
        match self {
            ResponseGenerator::Redirect { location } => Ok(Response {
                status: 302,
                content_type: String::new(),
                location: Some(location.clone()),
                body: String::new(),
            }),
            ResponseGenerator::Content { content_type, body } => Ok(Response {
                status: 200,
                content_type: content_type.clone(),
                location: None,
                body: body.clone(),
            }),
            ResponseGenerator::PartialMarkup { page, component_id } => {
                let component = page.component(component_id)?;
                let mut writer = HtmlWriter::new();
                renderer.render_partial_page_markup(
                    page.clone(),
                    ComponentRenderCommand::new(component),
                    &mut writer,
                )?;
                let markup = writer.into_markup()?;
                Ok(Response {
                    status: 200,
                    content_type: "application/json".to_string(),
                    location: None,
                    body: json!({ "content": markup }).to_string(),
                })
            }
        }
    }
}

/// `/<page>/<ctx>...`, page name lowercased, context segments encoded.
pub fn page_link(page: &str, context: &[String]) -> String {
    let mut link = format!("/{}", page.to_ascii_lowercase());
    for value in context {
        link.push('/');
        link.push_str(&encode_context(value));
    }
    link
}

/// Path-safe encoding of one context value: `[A-Za-z0-9._:-]` pass through,
/// anything else becomes `$` plus four hex digits, and `$B` marks the empty string.
pub fn encode_context(value: &str) -> String {
    if value.is_empty() {
        return "$B".to_string();
    }
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-') {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("${:04x}", unit));
            }
        }
    }
    out
}

/// Inverse of [`encode_context`]; `None` on malformed input.
pub fn decode_context(encoded: &str) -> Option<String> {
    if encoded == "$B" {
        return Some(String::new());
    }
    let mut units = Vec::with_capacity(encoded.len());
    let mut chars = encoded.chars();
    while let Some(c) = chars.next() {
        if c == '$' {
            let hex: String = chars.by_ref().take(4).collect();
            if hex.len() != 4 {
                return None;
            }
            units.push(u16::from_str_radix(&hex, 16).ok()?);
        } else {
            let mut buf = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
        }
    }
    String::from_utf16(&units).ok()
}
