/// Diagnostic printer for the check flow.
///
/// Informational progress goes to stdout in text mode. In `--json` mode
/// stdout must stay a single JSON document, so progress moves to stderr.
/// Warnings and failure detail always go to stderr.
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn info(&self, msg: &str) {
        if self.json {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("Warning: {}", msg);
    }

    pub fn fail(&self, msg: &str) {
        eprintln!("{}", msg);
    }
}
