use std::fmt::Display;

/// A complete server message: one header line followed by the body lines.
/// The terminating blank line is not part of the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledMessage {
    pub header: String,
    pub body: Vec<String>,
}

impl AssembledMessage {
    pub fn new(header: &str, body: &[&str]) -> Self {
        Self {
            header: header.to_string(),
            body: body.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Display for AssembledMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header)?;
        for line in self.body.iter() {
            write!(f, " / {}", line)?;
        }
        Ok(())
    }
}

/// Collects incoming lines until a blank line closes the message.
#[derive(Debug, Default)]
pub struct MessageAssembler {
    buffer: Vec<String>,
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self { buffer: vec![] }
    }

    /// Returns the message once `raw` is the blank terminator line, `None`
    /// while more input is needed.
    pub fn feed_line(&mut self, raw: &str) -> Option<AssembledMessage> {
        self.buffer.push(raw.trim_end().to_string());
        if !raw.trim_end_matches(|c: char| c == '\n' || c == '\r').is_empty() {
            return None;
        }

        let mut lines = std::mem::take(&mut self.buffer);
        // drop the terminator
        lines.pop();
        let mut lines = lines.into_iter();
        let header = lines.next().unwrap_or_default();
        Some(AssembledMessage {
            header,
            body: lines.collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
