use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stdout" => Some(Self::Stdout),
            "stderr" => Some(Self::Stderr),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded stream fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub stream: StreamKind,
    pub text: String,
}

impl OutputChunk {
    pub fn stdout(&self) -> Option<&str> {
        (self.stream == StreamKind::Stdout).then_some(self.text.as_str())
    }

    pub fn stderr(&self) -> Option<&str> {
        (self.stream == StreamKind::Stderr).then_some(self.text.as_str())
    }
}

/// Command output in the order the server delivered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    chunks: Vec<OutputChunk>,
    exit_code: Option<i32>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: OutputChunk) {
        self.chunks.push(chunk);
    }

    pub fn chunks(&self) -> &[OutputChunk] {
        &self.chunks
    }

    pub fn stdout(&self) -> String {
        self.collect(StreamKind::Stdout)
    }

    pub fn stderr(&self) -> String {
        self.collect(StreamKind::Stderr)
    }

    /// Set once the command reached Done.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub(crate) fn set_exit_code(&mut self, code: i32) {
        self.exit_code = Some(code);
    }

    fn collect(&self, stream: StreamKind) -> String {
        self.chunks
            .iter()
            .filter(|c| c.stream == stream)
            .map(|c| c.text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(stream: StreamKind, text: &str) -> OutputChunk {
        OutputChunk {
            stream,
            text: text.to_owned(),
        }
    }

    #[test]
    fn streams_are_concatenated_in_order() {
        let mut output = Output::new();
        output.push(chunk(StreamKind::Stdout, "a"));
        output.push(chunk(StreamKind::Stderr, "x"));
        output.push(chunk(StreamKind::Stdout, "b"));

        assert_eq!(output.stdout(), "ab");
        assert_eq!(output.stderr(), "x");
        assert_eq!(output.chunks()[1].stderr(), Some("x"));
        assert_eq!(output.chunks()[1].stdout(), None);
        assert_eq!(output.exit_code(), None);
    }
}
