use owo_colors::OwoColorize;
use std::fmt;

/// Byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span, used for errors that point at a position only.
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_text(source: &str, line: usize) -> &str {
    source.lines().nth(line.saturating_sub(1)).unwrap_or("")
}

pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    /// Render as `error[E0201]: message`, a `-->` location line, the source
    /// line and a caret underline for each label.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let severity = match diagnostic.severity {
            Severity::Error => self.paint_error("error"),
            Severity::Warning => self.paint_warning("warning"),
        };
        let message = self.paint_bold(&diagnostic.message);
        match &diagnostic.code {
            Some(code) => output.push_str(&format!("{}[{}]: {}\n", severity, code, message)),
            None => output.push_str(&format!("{}: {}\n", severity, message)),
        }

        for label in &diagnostic.labels {
            let (line, col) = line_col(self.source, label.span.start);
            let gutter_width = line.to_string().len();
            let gutter = " ".repeat(gutter_width + 1);
            let bar = self.paint_accent("|");

            output.push_str(&format!(
                "{}{} {}:{}:{}\n",
                " ".repeat(gutter_width),
                self.paint_accent("-->"),
                self.file_name,
                line,
                col
            ));
            output.push_str(&format!("{}{}\n", gutter, bar));
            output.push_str(&format!(
                "{} {} {}\n",
                self.paint_accent(&line.to_string()),
                bar,
                line_text(self.source, line)
            ));

            let width = label.span.end.saturating_sub(label.span.start).max(1);
            let underline = format!("{}{}", " ".repeat(col - 1), "^".repeat(width));
            if label.message.is_empty() {
                output.push_str(&format!("{}{} {}\n", gutter, bar, self.paint_error(&underline)));
            } else {
                output.push_str(&format!(
                    "{}{} {} {}\n",
                    gutter,
                    bar,
                    self.paint_error(&underline),
                    self.paint_error(&label.message)
                ));
            }
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.paint_accent("="), note));
        }

        output
    }

    fn paint_error(&self, s: &str) -> String {
        if self.use_color {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_warning(&self, s: &str) -> String {
        if self.use_color {
            s.yellow().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_accent(&self, s: &str) -> String {
        if self.use_color {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_bold(&self, s: &str) -> String {
        if self.use_color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}

pub fn render_diagnostics(source: &str, file_name: &str, diagnostics: &[Diagnostic], use_color: bool) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }

    output
}
