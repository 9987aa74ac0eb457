use colored::{Color, Colorize};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use utils::error::{Error, Result};

/// 事件类别，决定控制台输出的颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Creation,
    Copy,
    Removal,
    Error,
    NewItem,
}

impl Category {
    pub fn color(self) -> Color {
        match self {
            Category::Creation => Color::Green,
            Category::Copy => Color::Blue,
            Category::Removal | Category::Error => Color::BrightRed,
            Category::NewItem => Color::Yellow,
        }
    }
}

/// Append-only record of every synchronization event.
///
/// Each line goes to the log file in plain text and to the console wrapped in
/// the color of its [`Category`]. The file is opened, appended to and closed
/// on every call so no handle outlives a single write.
pub struct EventLog {
    path: PathBuf,
    existed: bool,
    console: Box<dyn Write + Send>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("path", &self.path)
            .field("existed", &self.existed)
            .finish()
    }
}

impl EventLog {
    /// Create the log file, echoing events to stdout.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_console(path, Box::new(io::stdout()))
    }

    /// Create the log file in exclusive mode.
    ///
    /// An already existing file is reported on the console and then appended
    /// to; any other failure is returned.
    pub fn with_console(path: impl AsRef<Path>, console: Box<dyn Write + Send>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut log = Self {
            path,
            existed: false,
            console,
        };

        match OpenOptions::new().write(true).create_new(true).open(&log.path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log.existed = true;
                let warning = format!("Error: File \"{}\" already exists", log.path.display());
                log.echo(&warning, Category::Error);
            }
            Err(e) => {
                return Err(Error::with_source(
                    &format!("Failed to create log file {}", log.path.display()),
                    Box::new(e),
                ));
            }
        }

        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the log file was already present when this log was created.
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Append `message` to the log file and echo it to the console.
    pub fn log(&mut self, message: &str, category: Category) -> Result<()> {
        self.append(message).map_err(|e| {
            Error::with_source(
                &format!("Failed to write to log file {}", self.path.display()),
                Box::new(e),
            )
        })?;
        self.echo(message, category);
        Ok(())
    }

    fn append(&self, message: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", message)?;
        file.flush()
    }

    // Console output is best effort.
    fn echo(&mut self, message: &str, category: Category) {
        let _ = writeln!(self.console, "{}", message.color(category.color()));
        let _ = self.console.flush();
    }
}
