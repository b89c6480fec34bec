use crate::diagnostic::{Diagnostic, Label, Span};
use crate::lexer::LexError;

#[derive(Debug, Clone, PartialEq)]
pub enum JustcError {
    Lex { message: String, offset: usize },
    Parse { message: String, offset: usize },
    CircularDependency { cycle: Vec<String> },
    SelfReference { name: String, offset: usize },
    UnresolvedDependency { passes: usize },
    UndefinedVariable { name: String, offset: usize },
    DuplicateDeclaration { name: String, offset: usize },
    MissingReturn,
    MissingOutputVariable { name: String },
    ConflictingOutputDirective { mode: String },
    UnknownFunction { name: String, offset: usize },
    InvalidArgument { message: String, offset: usize },
    CapabilityDisabled { capability: String },
    NestingLimit { depth: usize },
}

impl JustcError {
    pub fn parse_at(message: impl Into<String>, offset: usize) -> Self {
        Self::Parse {
            message: message.into(),
            offset,
        }
    }

    pub fn invalid_argument_at(message: impl Into<String>, offset: usize) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            offset,
        }
    }

    pub fn capability_disabled(capability: impl Into<String>) -> Self {
        Self::CapabilityDisabled {
            capability: capability.into(),
        }
    }

    /// Source position of the error, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Lex { offset, .. }
            | Self::Parse { offset, .. }
            | Self::SelfReference { offset, .. }
            | Self::UndefinedVariable { offset, .. }
            | Self::DuplicateDeclaration { offset, .. }
            | Self::UnknownFunction { offset, .. }
            | Self::InvalidArgument { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Lex { .. } => "E0001",
            Self::Parse { .. } => "E0101",
            Self::CircularDependency { .. } => "E0201",
            Self::SelfReference { .. } => "E0202",
            Self::UnresolvedDependency { .. } => "E0203",
            Self::UndefinedVariable { .. } => "E0204",
            Self::DuplicateDeclaration { .. } => "E0205",
            Self::MissingReturn => "E0301",
            Self::MissingOutputVariable { .. } => "E0302",
            Self::ConflictingOutputDirective { .. } => "E0303",
            Self::UnknownFunction { .. } => "E0401",
            Self::InvalidArgument { .. } => "E0402",
            Self::CapabilityDisabled { .. } => "E0403",
            Self::NestingLimit { .. } => "E0404",
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diagnostic = Diagnostic::error(self.to_string()).with_code(self.code());
        if let Some(offset) = self.offset() {
            diagnostic = diagnostic.with_label(Label::primary(Span::new(offset, offset + 1), ""));
        }

        match self {
            Self::CircularDependency { .. } => {
                diagnostic.with_help("break the cycle by giving one of these variables a literal value")
            }
            Self::UnresolvedDependency { .. } => diagnostic.with_note("raise the pass budget with --max-passes"),
            Self::MissingReturn => diagnostic.with_help("add `RETURN [name, ...]`"),
            Self::DuplicateDeclaration { .. } => diagnostic.with_note("`TYPE STRICT` forbids redeclaring a variable"),
            _ => diagnostic,
        }
    }
}

impl std::fmt::Display for JustcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JustcError::Lex { message, .. } | JustcError::Parse { message, .. } => f.write_str(message),
            JustcError::CircularDependency { cycle } => {
                write!(f, "Circular dependency detected: {}", cycle.join(" -> "))
            }
            JustcError::SelfReference { name, .. } => {
                write!(f, "Variable '{}' references itself", name)
            }
            JustcError::UnresolvedDependency { passes } => write!(
                f,
                "Could not resolve all variables after {} passes (possible circular dependency)",
                passes
            ),
            JustcError::UndefinedVariable { name, offset } => {
                write!(f, "Undefined variable: {} at position {}", name, offset)
            }
            JustcError::DuplicateDeclaration { name, offset } => write!(
                f,
                "Variable '{}' is already declared (at position {})",
                name, offset
            ),
            JustcError::MissingReturn => {
                f.write_str("OUTPUT SPECIFIED requires RETURN command with variables")
            }
            JustcError::MissingOutputVariable { name } => {
                write!(f, "RETURN names undeclared variable '{}'", name)
            }
            JustcError::ConflictingOutputDirective { mode } => {
                write!(f, "RETURN command not allowed with OUTPUT {}", mode)
            }
            JustcError::UnknownFunction { name, offset } => {
                write!(f, "Unknown function: {} at position {}", name, offset)
            }
            JustcError::InvalidArgument { message, .. } => f.write_str(message),
            JustcError::CapabilityDisabled { capability } => write!(f, "{} is disabled", capability),
            JustcError::NestingLimit { depth } => {
                write!(f, "JUSTC nesting limit of {} reached", depth)
            }
        }
    }
}

impl std::error::Error for JustcError {}

impl From<LexError> for JustcError {
    fn from(err: LexError) -> Self {
        JustcError::Lex {
            message: err.message,
            offset: err.offset,
        }
    }
}
