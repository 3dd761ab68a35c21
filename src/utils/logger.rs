use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bank_etl=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bank_etl=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Append-only error log backing `parser_errors.log`.
///
/// Constructed once in `main` and handed to the fallible stages, so the
/// flattening core stays free of logging side effects and globals.
#[derive(Debug)]
pub struct ErrorLog {
    file: Mutex<File>,
}

impl ErrorLog {
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// One line per event: timestamp, level, message. Write failures on the
    /// log itself are swallowed; the console copy still goes out via tracing.
    pub fn error(&self, message: &str) {
        tracing::error!("{}", message);
        if let Ok(mut file) = self.file.lock() {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "{} - ERROR - {}", stamp, message);
        }
    }
}
