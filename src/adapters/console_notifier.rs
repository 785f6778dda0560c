//! Notifier that prints messages instead of sending them.

use crate::domain::error::ScanError;
use crate::ports::notify_port::NotifyPort;
use std::cell::RefCell;
use std::io::{self, Stdout, Write};

const SEPARATOR: &str = "----------------------------------------";

pub struct ConsoleNotifier<W: Write = Stdout> {
    out: RefCell<W>,
}

impl ConsoleNotifier<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> NotifyPort for ConsoleNotifier<W> {
    fn send(&self, text: &str) -> Result<(), ScanError> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}\n{}\n{}", SEPARATOR, text, SEPARATOR)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_framed_message() {
        let notifier = ConsoleNotifier::with_writer(Vec::new());
        notifier.send("hello").unwrap();
        notifier.send("again").unwrap();

        let text = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(text.matches(SEPARATOR).count(), 4);
        assert!(text.contains("\nhello\n"));
        assert!(text.ends_with("again\n----------------------------------------\n"));
    }
}
