/// Two append-only buffers: declarations hoisted above `main`, and the body.
#[derive(Debug, Default)]
pub struct Emitter {
    header: String,
    body: String,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter::default()
    }

    pub fn emit(&mut self, code: &str) {
        self.body.push_str(code);
    }

    pub fn emit_line(&mut self, code: &str) {
        self.body.push_str(code);
        self.body.push('\n');
    }

    pub fn header_line(&mut self, code: &str) {
        self.header.push_str(code);
        self.header.push('\n');
    }

    pub fn finalize(self) -> String {
        let mut output = self.header;
        output.push_str(&self.body);
        output
    }
}
