//! Log entries, the result record and output shaping.

use indexmap::IndexMap;

use super::environment::Environment;
use super::error::JustcError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    Specified,
    #[default]
    Everything,
    Disabled,
}

impl OutputMode {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "SPECIFIED" => Some(OutputMode::Specified),
            "EVERYTHING" => Some(OutputMode::Everything),
            "DISABLED" => Some(OutputMode::Disabled),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            OutputMode::Specified => "SPECIFIED",
            OutputMode::Everything => "EVERYTHING",
            OutputMode::Disabled => "DISABLED",
        }
    }
}

pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub kind: String,
    pub message: String,
    pub offset: usize,
    pub timestamp: String,
}

impl LogEntry {
    pub fn new(kind: impl Into<String>, message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            offset,
            timestamp: timestamp(),
        }
    }
}

/// Append-only log plus the registered log-file transcript.
#[derive(Debug, Clone, Default)]
pub struct LogBook {
    entries: Vec<LogEntry>,
    file_path: Option<String>,
    file_content: String,
}

impl LogBook {
    pub fn push(&mut self, kind: impl Into<String>, message: impl Into<String>, offset: usize) {
        self.entries.push(LogEntry::new(kind, message, offset));
    }

    pub fn register_file(&mut self, path: impl Into<String>) {
        self.file_path = Some(path.into());
    }

    /// Adds a transcript line. Ignored until a log file is registered.
    pub fn append_to_file(&mut self, message: &str) {
        if self.file_path.is_some() {
            self.file_content
                .push_str(&format!("[{}] {}\n", timestamp(), message));
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn into_parts(self) -> (Vec<LogEntry>, String, String) {
        (self.entries, self.file_path.unwrap_or_default(), self.file_content)
    }
}

/// Everything a run produces. `error` is set when the run aborted; the
/// other fields then hold whatever was collected up to that point.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub outputs: IndexMap<String, Value>,
    pub logs: Vec<LogEntry>,
    pub log_file_path: String,
    pub log_file_content: String,
    pub error: Option<JustcError>,
    pub allow_javascript: bool,
}

impl ParseResult {
    pub fn failed(error: JustcError) -> Self {
        let mut logbook = LogBook::default();
        logbook.push("ERROR", error.to_string(), error.offset().unwrap_or(0));
        Self::from_logbook(logbook, IndexMap::new(), Some(error))
    }

    pub fn from_logbook(logbook: LogBook, outputs: IndexMap<String, Value>, error: Option<JustcError>) -> Self {
        let (logs, log_file_path, log_file_content) = logbook.into_parts();
        Self {
            outputs,
            logs,
            log_file_path,
            log_file_content,
            error,
            allow_javascript: false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

/// Output mode plus the RETURN list and its aliases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputPlan {
    pub mode: OutputMode,
    pub returns: Vec<String>,
    pub aliases: Vec<String>,
}

impl OutputPlan {
    pub fn validate(&self) -> Result<(), JustcError> {
        match self.mode {
            OutputMode::Specified if self.returns.is_empty() => Err(JustcError::MissingReturn),
            OutputMode::Everything | OutputMode::Disabled if !self.returns.is_empty() => {
                Err(JustcError::ConflictingOutputDirective {
                    mode: self.mode.keyword().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn shape(&self, table: &Environment) -> Result<IndexMap<String, Value>, JustcError> {
        self.validate()?;

        let mut outputs = IndexMap::new();
        match self.mode {
            OutputMode::Disabled => {}
            OutputMode::Everything => {
                for (name, value) in table.iter() {
                    outputs.insert(name.clone(), value.to_decimal());
                }
            }
            OutputMode::Specified => {
                for (i, name) in self.returns.iter().enumerate() {
                    let value = table
                        .get(name)
                        .ok_or_else(|| JustcError::MissingOutputVariable { name: name.clone() })?;
                    let key = match self.aliases.get(i) {
                        Some(alias) if alias != "_" => alias.clone(),
                        _ => name.clone(),
                    };
                    outputs.insert(key, value.to_decimal());
                }
            }
        }
        Ok(outputs)
    }
}
