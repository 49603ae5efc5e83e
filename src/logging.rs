use chrono::{DateTime, SecondsFormat, Utc};
use env_logger::{Env, Target};
use log::Level;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Installs the process logger: `info` unless `RUST_LOG` says otherwise,
/// written to stderr and, when it can be opened, appended to `log_file`.
pub fn init(log_file: Option<&Path>) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(buf, "{}", format_line(Utc::now(), record.level(), record.args()))
    });

    let mut file_error = None;
    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(TeeWriter {
                    console: io::stderr(),
                    file,
                })));
            }
            Err(err) => file_error = Some((path.to_path_buf(), err)),
        }
    }

    // Already initialised is fine (tests, embedding hosts).
    let _ = builder.try_init();

    if let Some((path, err)) = file_error {
        log::warn!("[log] cannot open {}: {}", path.display(), err);
    }
}

fn format_line(now: DateTime<Utc>, level: Level, message: &fmt::Arguments<'_>) -> String {
    format!(
        "{} [{}]: {}",
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
        level,
        message
    )
}

/// Copies every record to the console and the log file. The file still gets
/// the record when the console write fails.
struct TeeWriter<C, F> {
    console: C,
    file: F,
}

impl<C: Write, F: Write> Write for TeeWriter<C, F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let console = self.console.write_all(buf);
        self.file.write_all(buf)?;
        console.map(|_| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let console = self.console.flush();
        self.file.flush()?;
        console
    }
}
