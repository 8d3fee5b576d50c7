use crate::error::{CliConfError, CliConfResult};
use log::warn;
use std::io::{self, Write};
use time::macros::format_description;
use time::OffsetDateTime;

/// Append-only session log, one `<YYYY-MM-DD HH:MM:SS>: <message>` line per
/// event. With `echo` set every line is printed to stdout as well.
pub struct EventLog {
    sink: Option<Box<dyn Write + Send>>,
    echo: Option<Box<dyn Write + Send>>,
}

impl EventLog {
    pub fn new<W>(sink: W, echo: bool) -> EventLog
    where
        W: Write + Send + 'static,
    {
        EventLog {
            sink: Some(Box::new(sink)),
            echo: echo.then(|| Box::new(io::stdout()) as Box<dyn Write + Send>),
        }
    }

    /// Like [`EventLog::new`], echoing every line to `echo` instead of stdout.
    pub fn with_echo<W, E>(sink: W, echo: E) -> EventLog
    where
        W: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        EventLog {
            sink: Some(Box::new(sink)),
            echo: Some(Box::new(echo)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    pub fn record(&mut self, msg: &str) -> CliConfResult<()> {
        let line = format!("{}: {}\n", timestamp(), msg);
        if let Some(echo) = self.echo.as_mut() {
            // a closed console must not cost the log file its entry
            if let Err(err) = echo.write_all(line.as_bytes()).and_then(|_| echo.flush()) {
                warn!("Error echoing log entry: {}", err);
            }
        }
        let sink = self.sink.as_mut().ok_or_else(|| {
            CliConfError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "log file is closed",
            ))
        })?;
        sink.write_all(line.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Flushes and releases the log handle. Closing twice is a no-op.
    pub fn close(&mut self) -> CliConfResult<()> {
        match self.sink.take() {
            Some(mut sink) => Ok(sink.flush()?),
            None => Ok(()),
        }
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_record_format() {
        let buffer = Shared::default();
        let mut log = EventLog::new(buffer.clone(), false);
        log.record("RPC Commit Error: broken pipe").unwrap();
        log.record("second").unwrap();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);

        let (stamp, msg) = lines[0].split_once(": ").unwrap();
        assert_eq!(msg, "RPC Commit Error: broken pipe");
        assert_eq!(stamp.len(), "2024-01-31 23:59:59".len());
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[13..14], ":");
        assert!(lines[1].ends_with(": second"));
    }

    #[test]
    fn test_record_after_close() {
        let mut log = EventLog::new(Shared::default(), false);
        log.close().unwrap();
        assert!(!log.is_open());
        assert!(log.record("late").is_err());
        assert!(log.close().is_ok());
    }

    struct ClosedConsole;

    impl Write for ClosedConsole {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }
    }

    #[test]
    fn test_record_echo() {
        let buffer = Shared::default();
        let console = Shared::default();
        let mut log = EventLog::with_echo(buffer.clone(), console.clone());
        log.record("installing package").unwrap();

        let written = buffer.0.lock().unwrap().clone();
        assert_eq!(console.0.lock().unwrap().clone(), written);
    }

    #[test]
    fn test_record_survives_closed_echo() {
        let buffer = Shared::default();
        let mut log = EventLog::with_echo(buffer.clone(), ClosedConsole);
        log.record("first").unwrap();
        log.record("second").unwrap();
        assert!(log.close().is_ok());

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.ends_with(": second\n"));
    }
}
