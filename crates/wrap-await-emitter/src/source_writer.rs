//! Output buffer for the printer.

/// Accumulates printed text.
#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
}

impl SourceWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        SourceWriter {
            output: String::with_capacity(capacity),
        }
    }

    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        self.output.push(ch);
    }

    pub fn write_space(&mut self) {
        self.output.push(' ');
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn finish(self) -> String {
        self.output
    }
}
