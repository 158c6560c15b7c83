//! Streaming `.editorconfig` parser.
//!
//! [`parse`] reads a resource once and reports its structure as [`Event`]s
//! to a [`ParseHandler`]. Problems go to an [`ErrorHandler`] together with
//! their [`Location`]; the handler decides whether parsing goes on.

mod error;
mod event;
mod tokenizer;

pub use error::{CollectingErrorHandler, ErrorEvent, ErrorHandler, ErrorKind, ErrorPolicy, ParseError};
pub use event::{Event, Location, ParseContext, ParseHandler, Span};

use std::io::Read;

use crate::resource::Resource;
use tokenizer::Tokenizer;

/// Parse the text of `resource`, sending events to `handler`.
pub fn parse(
    resource: &dyn Resource,
    handler: &mut dyn ParseHandler,
    error_handler: &mut dyn ErrorHandler,
) -> Result<(), ParseError> {
    let mut text = String::new();
    resource
        .open_reader()
        .and_then(|mut reader| reader.read_to_string(&mut text))
        .map_err(|source| ParseError::Io {
            resource: resource.path().to_string(),
            source,
        })?;

    parse_str(resource.path(), &text, handler, error_handler)
}

/// Parse `text`; `resource` only names the source in error events.
pub fn parse_str(
    resource: &str,
    text: &str,
    handler: &mut dyn ParseHandler,
    error_handler: &mut dyn ErrorHandler,
) -> Result<(), ParseError> {
    let ctx = ParseContext::new(resource, error_handler);
    Tokenizer::new(text, handler, ctx).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records events as readable strings
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        spans: Vec<Span>,
    }

    impl ParseHandler for Recorder {
        fn handle(
            &mut self,
            event: Event<'_>,
            span: Span,
            _ctx: &mut ParseContext<'_>,
        ) -> Result<(), ParseError> {
            let text = match event {
                Event::StartDocument => "start_document".to_string(),
                Event::BlankLine => "blank".to_string(),
                Event::Comment { text } => format!("comment({text})"),
                Event::StartSection => "start_section".to_string(),
                Event::Glob { text, closed } => format!("glob({text},{closed})"),
                Event::Property { name, value } => format!("property({name}={value})"),
                Event::EndSection => "end_section".to_string(),
                Event::EndDocument => "end_document".to_string(),
            };
            self.events.push(text);
            self.spans.push(span);
            Ok(())
        }
    }

    fn run(text: &str) -> (Vec<String>, Vec<ErrorEvent>) {
        let mut recorder = Recorder::default();
        let mut errors = CollectingErrorHandler::new();
        parse_str("test", text, &mut recorder, &mut errors).unwrap();
        (recorder.events, errors.into_events())
    }

    fn events(text: &str) -> Vec<String> {
        let (events, errors) = run(text);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        events
    }

    // ===========================================
    // Document structure
    // ===========================================

    #[test]
    fn test_empty_document() {
        assert_eq!(events(""), vec!["start_document", "end_document"]);
    }

    #[test]
    fn test_sections_and_properties() {
        let text = "root = true\n\n[*.c]\nindent_style = tab\n[*.md]\nkey:value\n";
        assert_eq!(
            events(text),
            vec![
                "start_document",
                "start_section",
                "property(root=true)",
                "blank",
                "end_section",
                "start_section",
                "glob(*.c,true)",
                "property(indent_style=tab)",
                "end_section",
                "start_section",
                "glob(*.md,true)",
                "property(key=value)",
                "end_section",
                "end_document",
            ]
        );
    }

    #[test]
    fn test_comments_are_verbatim() {
        assert_eq!(
            events("# one \n  ; two"),
            vec!["start_document", "comment( one )", "comment( two)", "end_document"]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            events("[*]\r\na = b\r\n\r\n"),
            vec![
                "start_document",
                "start_section",
                "glob(*,true)",
                "property(a=b)",
                "blank",
                "end_section",
                "end_document",
            ]
        );
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        assert_eq!(
            events("\u{FEFF}[*]\n"),
            vec!["start_document", "start_section", "glob(*,true)", "end_section", "end_document"]
        );
    }

    // ===========================================
    // Section headers
    // ===========================================

    #[test]
    fn test_header_with_inline_comment() {
        let evs = events("[*.c] ; c files\nk=v\n");
        assert_eq!(evs[2], "glob(*.c,true)");
        assert_eq!(evs[3], "comment( c files)");
        assert_eq!(evs[4], "property(k=v)");
    }

    #[test]
    fn test_header_with_brackets_in_glob() {
        let evs = events("[[abc]].c]\n");
        assert_eq!(evs[2], "glob([abc]].c,true)");
    }

    #[test]
    fn test_unclosed_header_reports_location() {
        let (evs, errors) = run("a=b\n\n  [foo\nk=v\n");
        assert_eq!(errors.len(), 1);
        let error = &errors[0];
        assert_eq!(error.kind, ErrorKind::GlobNotClosed);
        assert_eq!(
            error.span.start,
            Location {
                offset: 7,
                line: 3,
                column: 3
            }
        );
        assert_eq!(error.span.end.column, 7);
        assert!(evs.contains(&"glob(foo,false)".to_string()));
        assert!(evs.contains(&"property(k=v)".to_string()));
    }

    // ===========================================
    // Properties
    // ===========================================

    #[test]
    fn test_property_name_is_lowercased() {
        let evs = events("Indent_Style = Tab\n");
        assert_eq!(evs[2], "property(indent_style=Tab)");
    }

    #[test]
    fn test_property_value_keeps_inner_whitespace() {
        let evs = events("key =  a  b  \n");
        assert_eq!(evs[2], "property(key=a  b)");
    }

    #[test]
    fn test_inline_comment_needs_whitespace() {
        let evs = events("a = value;inline\nb = value ;comment\nc = value #x\n");
        assert_eq!(evs[2], "property(a=value;inline)");
        assert_eq!(evs[3], "property(b=value)");
        assert_eq!(evs[4], "comment(comment)");
        assert_eq!(evs[5], "property(c=value)");
        assert_eq!(evs[6], "comment(x)");
    }

    #[test]
    fn test_escaped_comment_marker_stays_in_value() {
        let evs = events("key = a \\; b\n");
        assert_eq!(evs[2], "property(key=a \\; b)");
    }

    #[test]
    fn test_missing_assignment_skips_line() {
        let (evs, errors) = run("[*]\njust_a_name\nk=v\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::PropertyAssignmentMissing);
        assert_eq!(errors[0].span.start.line, 2);
        assert_eq!(evs[3], "property(k=v)");
    }

    #[test]
    fn test_missing_value_is_not_fatal() {
        let (evs, errors) = run("[*]\nk =\nk2 = ; comment\nk3=v\n");
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::PropertyValueMissing; 2]);
        assert!(evs.contains(&"property(k3=v)".to_string()));
        assert!(!evs.iter().any(|e| e.starts_with("property(k=")));
    }

    #[test]
    fn test_missing_name() {
        let (_, errors) = run("= value\n");
        assert_eq!(errors[0].kind, ErrorKind::PropertyNameMissing);
    }

    #[test]
    fn test_control_character_in_value() {
        let (evs, errors) = run("k = a\u{7}b\nk2 = ok\n");
        assert_eq!(errors[0].kind, ErrorKind::InvalidCharacter);
        assert_eq!(errors[0].span.start.column, 6);
        assert!(evs.contains(&"property(k2=ok)".to_string()));
    }

    #[test]
    fn test_property_without_trailing_newline() {
        let evs = events("[*]\nk = v");
        assert_eq!(evs[3], "property(k=v)");
        assert_eq!(evs.last().unwrap(), "end_document");
    }

    // ===========================================
    // Error handler policy
    // ===========================================

    #[test]
    fn test_strict_policy_aborts() {
        let mut recorder = Recorder::default();
        let mut policy = ErrorPolicy::StrictSyntax;
        let result = parse_str("test", "[foo\nk=v\n", &mut recorder, &mut policy);

        assert!(matches!(
            result,
            Err(ParseError::Rejected(ErrorEvent {
                kind: ErrorKind::GlobNotClosed,
                ..
            }))
        ));
        assert!(!recorder.events.contains(&"property(k=v)".to_string()));
    }

    #[test]
    fn test_property_span() {
        let mut recorder = Recorder::default();
        let mut errors = CollectingErrorHandler::new();
        parse_str("test", "[*]\n  key = val  \n", &mut recorder, &mut errors).unwrap();

        let span = recorder.spans[3];
        assert_eq!(span.start.line, 2);
        assert_eq!(span.start.column, 3);
        assert_eq!(span.end.column, 12);
    }
}
