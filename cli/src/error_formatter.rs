use ariadne::{Color, Label, Report, ReportKind, Source};
use optik::OptikError;

/// Format an OptikError for the terminal, pointing into rule-table documents with Ariadne
pub fn format_error(error: &OptikError) -> String {
    match error {
        OptikError::ConfigParse(details) => {
            let mut output = Vec::new();

            let message = format!(
                "Config parse error: {} (file {}:{}:{})",
                details.message, details.source_id, details.line, details.column
            );
            // Ariadne spans count chars, the parser reports bytes
            let text: &str = &details.source_text;
            let chars = text.chars().count();
            let offset = text
                .get(..details.offset)
                .map_or(chars, |prefix| prefix.chars().count());
            let start = offset.min(chars.saturating_sub(1));
            let end = (start + 1).min(chars);

            let report = Report::build(ReportKind::Error, &details.source_id, start)
                .with_message(message)
                .with_label(
                    Label::new((&details.source_id, start..end))
                        .with_message(&details.message)
                        .with_color(Color::Red),
                )
                .with_help("Sections left out of the document keep their built-in defaults");

            match report.finish().write(
                (
                    &details.source_id,
                    Source::from(details.source_text.as_ref()),
                ),
                &mut output,
            ) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => format!("{}", error),
            }
        }
        OptikError::InvalidInput { field, message } => {
            format!("Invalid input: {}\n  {}", field, message)
        }
        OptikError::Config(message) => format!("Config error: {}", message),
        OptikError::Engine(message) => format!("Engine error: {}", message),
        OptikError::MultipleErrors(errors) => {
            let mut result = String::from("Multiple errors occurred:\n\n");
            for error in errors {
                result.push_str(&format_error(error));
                result.push_str("\n\n");
            }
            result
        }
    }
}
