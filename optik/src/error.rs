use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Location details for a rule-table document that failed to parse
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigErrorDetails {
    pub message: String,
    pub source_id: String,
    pub source_text: Arc<str>,
    /// 1-based line, as reported by the JSON parser
    pub line: usize,
    /// 1-based column, as reported by the JSON parser
    pub column: usize,
    /// Byte offset of `line`/`column` inside `source_text`
    pub offset: usize,
}

/// Error types for the Optik engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptikError {
    /// A caller-supplied value is missing, NaN or outside its allowed range
    #[error("Invalid input: {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// Rule-table document is not valid JSON or does not match the schema
    #[error(
        "Config parse error: {} at {}:{}:{}",
        .0.message,
        .0.source_id,
        .0.line,
        .0.column
    )]
    ConfigParse(Box<ConfigErrorDetails>),

    /// Rule tables parsed but contain a defect (gap, negative price, ...)
    #[error("Config error: {0}")]
    Config(String),

    /// Engine error without a specific input field
    #[error("Engine error: {0}")]
    Engine(String),

    /// Multiple errors collected together
    #[error("{}", MultipleErrorsDisplay(.0))]
    MultipleErrors(Vec<OptikError>),
}

impl OptikError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a parse error from a serde_json failure, resolving the byte offset
    pub fn config_parse(err: &serde_json::Error, source_id: &str, source_text: &str) -> Self {
        let line = err.line().max(1);
        let column = err.column().max(1);
        Self::ConfigParse(Box::new(ConfigErrorDetails {
            message: strip_position(&err.to_string()),
            source_id: source_id.to_string(),
            source_text: Arc::from(source_text),
            line,
            column,
            offset: byte_offset(source_text, line, column),
        }))
    }

    /// Collapse a list of errors: none, a single bare error, or `MultipleErrors`
    pub fn collect(mut errors: Vec<OptikError>) -> Option<OptikError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(OptikError::MultipleErrors(errors)),
        }
    }
}

struct MultipleErrorsDisplay<'a>(&'a [OptikError]);

impl fmt::Display for MultipleErrorsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Multiple errors:")?;
        for (i, error) in self.0.iter().enumerate() {
            write!(f, "  {}. {}", i + 1, error)?;
            if i < self.0.len() - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl From<std::fmt::Error> for OptikError {
    fn from(err: std::fmt::Error) -> Self {
        OptikError::Engine(format!("Format error: {}", err))
    }
}

/// serde_json appends " at line X column Y"; the details carry that separately
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(pos) => message[..pos].to_string(),
        None => message.to_string(),
    }
}

fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, l) in text.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            // The parser counts columns in bytes
            let mut col_bytes = column.saturating_sub(1).min(l.len());
            while !l.is_char_boundary(col_bytes) {
                col_bytes -= 1;
            }
            return offset + col_bytes;
        }
        offset += l.len();
    }
    text.len()
}
