//! Markup output sinks.

use crate::error::RenderError;

/// Output sink for rendered markup.
pub trait MarkupWriter {
    /// Open an element; it stays open until the matching [`end`](Self::end).
    fn element(&mut self, name: &str, attributes: &[(String, String)]);

    /// Write escaped text
    fn write(&mut self, text: &str);

    /// Write pre-formed markup verbatim
    fn write_raw(&mut self, markup: &str);

    /// Close the most recently opened element.
    fn end(&mut self) -> Result<(), RenderError>;

    /// Elements opened but not yet closed
    fn open_elements(&self) -> usize;
}

/// Buffers HTML in memory.
#[derive(Debug, Default)]
pub struct HtmlWriter {
    buffer: String,
    open: Vec<String>,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Finished markup; fails if elements are still open.
    pub fn into_markup(self) -> Result<String, RenderError> {
        if let Some(unclosed) = self.open.last() {
            return Err(RenderError::UnbalancedMarkup(format!(
                "element <{}> was never closed",
                unclosed
            )));
        }
        Ok(self.buffer)
    }
}

impl MarkupWriter for HtmlWriter {
    fn element(&mut self, name: &str, attributes: &[(String, String)]) {
        self.buffer.push('<');
        self.buffer.push_str(name);
        for (attr, value) in attributes {
            self.buffer.push(' ');
            self.buffer.push_str(attr);
            self.buffer.push_str("=\"");
            escape_into(&mut self.buffer, value);
            self.buffer.push('"');
        }
        self.buffer.push('>');
        self.open.push(name.to_string());
    }

    fn write(&mut self, text: &str) {
        escape_into(&mut self.buffer, text);
    }

    fn write_raw(&mut self, markup: &str) {
        self.buffer.push_str(markup);
    }

    fn end(&mut self) -> Result<(), RenderError> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| RenderError::UnbalancedMarkup("end() with no open element".to_string()))?;
        self.buffer.push_str("</");
        self.buffer.push_str(&name);
        self.buffer.push('>');
        Ok(())
    }

    fn open_elements(&self) -> usize {
        self.open.len()
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}
