//! Stderr shared between log events and the progress bar.
//!
//! Each event is buffered by its writer and emitted as one write on drop.
//! While a bar is attached the write happens inside [`ProgressBar::suspend`],
//! so the bar is cleared, the line printed, and the bar redrawn below it.
use std::{
    io::{self, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone)]
enum Sink {
    Stderr,
    #[cfg(test)]
    Memory(Arc<Mutex<Vec<u8>>>),
}

/// Cloneable handle; clones share the attached bar.
#[derive(Debug, Clone)]
pub struct Console {
    bar: Arc<Mutex<Option<ProgressBar>>>,
    sink: Sink,
}

impl Console {
    pub fn stderr() -> Self {
        Self {
            bar: Arc::default(),
            sink: Sink::Stderr,
        }
    }

    /// Console that collects output in memory; returns the shared buffer.
    #[cfg(test)]
    pub(crate) fn memory() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let console = Self {
            bar: Arc::default(),
            sink: Sink::Memory(Arc::clone(&buf)),
        };
        (console, buf)
    }

    /// Route subsequent events around `bar` until [`Console::detach`].
    pub fn attach(&self, bar: ProgressBar) {
        *lock(&self.bar) = Some(bar);
    }

    pub fn detach(&self) -> Option<ProgressBar> {
        lock(&self.bar).take()
    }

    fn emit(&self, line: &[u8]) {
        let bar = lock(&self.bar).clone();
        let write = || match &self.sink {
            // Nowhere left to report a failed diagnostic write.
            Sink::Stderr => {
                let _ = io::stderr().lock().write_all(line);
            }
            #[cfg(test)]
            Sink::Memory(buf) => lock(buf).extend_from_slice(line),
        };
        match bar {
            Some(bar) if !bar.is_hidden() => bar.suspend(write),
            _ => write(),
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Collects one formatted event.
pub struct EventWriter {
    console: Console,
    buf: Vec<u8>,
}

impl Write for EventWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        if !self.buf.is_empty() {
            self.console.emit(&self.buf);
        }
    }
}

impl<'a> MakeWriter<'a> for Console {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter {
            console: self.clone(),
            buf: Vec::with_capacity(256),
        }
    }
}
