use crate::event::{Event, EventKind, Span};
use crate::LexerError;

/// Lexical mode of the scanner. Exactly one buffer is live per mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Outside any name or value; characters are dropped.
    #[default]
    Neutral,
    /// Accumulating a tag name after `<` or `</`.
    TagName,
    /// Accumulating an attribute name after a space.
    AttributeName,
    /// Inside a double-quoted attribute value.
    AttributeValue,
}

/// Per-line scanner state.
///
/// All flags and buffers of the state machine live here so every transition is
/// an explicit mutation of one value. A fresh state is used for every line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    mode: Mode,
    in_tag: bool,
    closing: bool,
    self_closing: bool,
    after_equals: bool,
    tag_started: bool,
    tag_column: usize,
    value_column: usize,
    tag_name: String,
    attribute: String,
    value: String,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lexical mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Tag name accumulated so far on this line.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Feed one character, appending any completed events to `out`.
    pub fn step(
        &mut self,
        ch: char,
        span: Span,
        out: &mut Vec<Event>,
    ) -> Result<(), LexerError> {
        // Quoted values are verbatim; only the closing quote is structural.
        if self.mode == Mode::AttributeValue && ch != '"' {
            self.value.push(ch);
            return Ok(());
        }

        match ch {
            '<' => {
                self.tag_name.clear();
                self.attribute.clear();
                self.mode = Mode::TagName;
                self.in_tag = true;
                self.closing = false;
                self.self_closing = false;
                self.after_equals = false;
                self.tag_started = false;
                self.tag_column = span.column;
            }
            '/' if self.in_tag => {
                if self.closing {
                    return Err(error(span, "Unexpected '/' in closing tag"));
                }
                if self.mode == Mode::TagName && self.tag_name.is_empty() {
                    self.closing = true;
                } else {
                    // `<a/>` or `<a x="1"/>`
                    match self.mode {
                        Mode::TagName => self.start_tag(span, out)?,
                        Mode::AttributeName if !self.attribute.is_empty() => {
                            self.end_attribute_name(span, out)
                        }
                        _ => {}
                    }
                    self.self_closing = true;
                    self.mode = Mode::Neutral;
                }
            }
            '>' if self.in_tag => self.end_tag(span, out)?,
            '"' => match self.mode {
                Mode::AttributeValue => {
                    self.after_equals = false;
                    self.mode = Mode::Neutral;
                    // A value binds to one name only; a stray second value
                    // lands under the empty name.
                    let name = std::mem::take(&mut self.attribute);
                    let value = std::mem::take(&mut self.value);
                    out.push(Event::new(
                        EventKind::AttributeValue {
                            tag: self.tag_name.clone(),
                            name,
                            value,
                        },
                        Span::new(span.line, self.value_column),
                    ));
                }
                Mode::Neutral | Mode::AttributeName if self.in_tag && !self.closing => {
                    if self.mode == Mode::AttributeName {
                        self.end_attribute_name(span, out);
                    }
                    self.value.clear();
                    self.value_column = span.column;
                    self.mode = Mode::AttributeValue;
                }
                _ => return Err(error(span, "Unexpected '\"' outside of an attribute")),
            },
            '=' => {
                if self.mode == Mode::AttributeName {
                    self.end_attribute_name(span, out);
                }
                self.after_equals = true;
            }
            ' ' => {
                if self.mode == Mode::TagName {
                    if !self.closing {
                        self.start_tag(span, out)?;
                    }
                    self.mode = Mode::Neutral;
                }

                if self.mode == Mode::AttributeName {
                    if !self.attribute.is_empty() {
                        self.end_attribute_name(span, out);
                    }
                } else if self.in_tag && !self.closing && !self.after_equals {
                    self.attribute.clear();
                    self.mode = Mode::AttributeName;
                }
            }
            c => match self.mode {
                Mode::TagName => self.tag_name.push(c),
                Mode::AttributeName => self.attribute.push(c),
                Mode::AttributeValue => self.value.push(c),
                Mode::Neutral => {}
            },
        }

        Ok(())
    }

    /// Validate the state at the end of a line.
    pub fn finish(&self, line: usize, column: usize) -> Result<(), LexerError> {
        if self.mode == Mode::AttributeValue {
            return Err(error(
                Span::new(line, self.value_column),
                "Unterminated attribute value",
            ));
        }
        if self.in_tag {
            return Err(error(
                Span::new(line, column),
                format!("Unterminated tag '{}'", self.tag_name),
            ));
        }
        Ok(())
    }

    fn start_tag(&mut self, span: Span, out: &mut Vec<Event>) -> Result<(), LexerError> {
        if self.tag_name.is_empty() {
            return Err(error(span, "Empty tag name"));
        }
        self.tag_started = true;
        out.push(Event::new(
            EventKind::TagStart(self.tag_name.clone()),
            Span::new(span.line, self.tag_column),
        ));
        Ok(())
    }

    fn end_attribute_name(&mut self, span: Span, out: &mut Vec<Event>) {
        self.mode = Mode::Neutral;
        out.push(Event::new(
            EventKind::AttributeNameEnd {
                tag: self.tag_name.clone(),
                name: self.attribute.clone(),
            },
            span,
        ));
    }

    fn end_tag(&mut self, span: Span, out: &mut Vec<Event>) -> Result<(), LexerError> {
        let tag_span = Span::new(span.line, self.tag_column);

        if self.closing {
            if self.tag_name.is_empty() {
                return Err(error(span, "Empty tag name"));
            }
            out.push(Event::new(EventKind::TagClose(self.tag_name.clone()), tag_span));
        } else {
            if !self.tag_started {
                self.start_tag(span, out)?;
            }
            if self.mode == Mode::AttributeName && !self.attribute.is_empty() {
                self.end_attribute_name(span, out);
            }
            out.push(Event::new(EventKind::TagOpen(self.tag_name.clone()), tag_span));
            if self.self_closing {
                out.push(Event::new(EventKind::TagClose(self.tag_name.clone()), tag_span));
            }
        }

        self.in_tag = false;
        self.mode = Mode::Neutral;
        Ok(())
    }
}

fn error(span: Span, message: impl Into<String>) -> LexerError {
    LexerError {
        message: message.into(),
        line: span.line,
        column: span.column,
    }
}

/// HRML line scanner.
///
/// Turns markup lines into structural events. Lines are numbered from 1 in
/// the order they are fed; scanner state never crosses a line boundary.
#[derive(Debug, Default)]
pub struct Scanner {
    line: usize,
    state: ScanState,
}

impl Scanner {
    /// Create a new scanner positioned before the first line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a multi-line source into a vector of events.
    pub fn tokenize(source: &str) -> Result<Vec<Event>, LexerError> {
        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        for line in source.lines() {
            events.extend(scanner.scan_line(line)?);
        }
        Ok(events)
    }

    /// Number of the last line scanned (0 before the first).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scan one line of markup.
    pub fn scan_line(&mut self, line: &str) -> Result<Vec<Event>, LexerError> {
        self.line += 1;
        self.state = ScanState::new();

        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut events = Vec::new();
        let mut column = 0;

        for (i, ch) in line.chars().enumerate() {
            column = i + 1;
            self.state.step(ch, Span::new(self.line, column), &mut events)?;
        }
        self.state.finish(self.line, column + 1)?;

        tracing::trace!(line = self.line, events = events.len(), "scanned line");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: scan and return event kinds (ignoring spans).
    fn kinds(source: &str) -> Vec<EventKind> {
        Scanner::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    fn value(tag: &str, name: &str, value: &str) -> EventKind {
        EventKind::AttributeValue {
            tag: tag.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    fn name_end(tag: &str, name: &str) -> EventKind {
        EventKind::AttributeNameEnd {
            tag: tag.into(),
            name: name.into(),
        }
    }

    // =========================================================================
    // Tags
    // =========================================================================

    #[test]
    fn test_empty_source() {
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_bare_open_tag() {
        assert_eq!(
            kinds("<a>"),
            vec![EventKind::TagStart("a".into()), EventKind::TagOpen("a".into())]
        );
    }

    #[test]
    fn test_close_tag() {
        assert_eq!(kinds("</tag1>"), vec![EventKind::TagClose("tag1".into())]);
    }

    #[test]
    fn test_close_tag_with_trailing_space() {
        assert_eq!(kinds("</a >"), vec![EventKind::TagClose("a".into())]);
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            kinds("<br/>"),
            vec![
                EventKind::TagStart("br".into()),
                EventKind::TagOpen("br".into()),
                EventKind::TagClose("br".into()),
            ]
        );
    }

    #[test]
    fn test_self_closing_with_attribute() {
        assert_eq!(
            kinds("<img src=\"x\" />"),
            vec![
                EventKind::TagStart("img".into()),
                name_end("img", "src"),
                value("img", "src", "x"),
                EventKind::TagOpen("img".into()),
                EventKind::TagClose("img".into()),
            ]
        );
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[test]
    fn test_spaced_attribute() {
        assert_eq!(
            kinds("<tag1 value = \"HelloWorld\">"),
            vec![
                EventKind::TagStart("tag1".into()),
                name_end("tag1", "value"),
                value("tag1", "value", "HelloWorld"),
                EventKind::TagOpen("tag1".into()),
            ]
        );
    }

    #[test]
    fn test_compact_attributes() {
        assert_eq!(
            kinds("<a x=\"1\" y=\"2\">"),
            vec![
                EventKind::TagStart("a".into()),
                name_end("a", "x"),
                value("a", "x", "1"),
                name_end("a", "y"),
                value("a", "y", "2"),
                EventKind::TagOpen("a".into()),
            ]
        );
    }

    #[test]
    fn test_spaced_attributes_in_sequence() {
        let k = kinds("<tag3 another = \"another\" final = \"final\">");
        let values: Vec<_> = k
            .into_iter()
            .filter(|e| matches!(e, EventKind::AttributeValue { .. }))
            .collect();
        assert_eq!(
            values,
            vec![
                value("tag3", "another", "another"),
                value("tag3", "final", "final"),
            ]
        );
    }

    #[test]
    fn test_value_is_verbatim() {
        assert_eq!(
            kinds("<a href = \"/x y=<z>\">")[2],
            value("a", "href", "/x y=<z>")
        );
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(kinds("<a x=\"\">")[2], value("a", "x", ""));
    }

    #[test]
    fn test_extra_spaces_between_attributes() {
        assert_eq!(
            kinds("<a   x=\"1\">"),
            vec![
                EventKind::TagStart("a".into()),
                name_end("a", "x"),
                value("a", "x", "1"),
                EventKind::TagOpen("a".into()),
            ]
        );
    }

    #[test]
    fn test_valueless_attribute_name_only() {
        assert_eq!(
            kinds("<input disabled>"),
            vec![
                EventKind::TagStart("input".into()),
                name_end("input", "disabled"),
                EventKind::TagOpen("input".into()),
            ]
        );
    }

    #[test]
    fn test_self_closing_valueless_attribute() {
        assert_eq!(
            kinds("<input disabled/>"),
            vec![
                EventKind::TagStart("input".into()),
                name_end("input", "disabled"),
                EventKind::TagOpen("input".into()),
                EventKind::TagClose("input".into()),
            ]
        );
    }

    #[test]
    fn test_value_without_separating_space_does_not_overwrite() {
        assert_eq!(
            kinds("<a x=\"1\"y=\"2\">"),
            vec![
                EventKind::TagStart("a".into()),
                name_end("a", "x"),
                value("a", "x", "1"),
                value("a", "", "2"),
                EventKind::TagOpen("a".into()),
            ]
        );
    }

    // =========================================================================
    // State machine
    // =========================================================================

    #[test]
    fn test_modes_follow_delimiters() {
        let mut state = ScanState::new();
        let mut out = Vec::new();
        let mut modes = Vec::new();
        for (i, ch) in "<a x=\"v\">".chars().enumerate() {
            state.step(ch, Span::new(1, i + 1), &mut out).unwrap();
            modes.push(state.mode());
        }
        assert_eq!(
            modes,
            vec![
                Mode::TagName,
                Mode::TagName,
                Mode::AttributeName,
                Mode::AttributeName,
                Mode::Neutral,
                Mode::AttributeValue,
                Mode::AttributeValue,
                Mode::Neutral,
                Mode::Neutral,
            ]
        );
        assert_eq!(state.tag_name(), "a");
    }

    #[test]
    fn test_state_does_not_cross_lines() {
        let mut scanner = Scanner::new();
        scanner.scan_line("<a x=\"1\">").unwrap();
        let events = scanner.scan_line("</a>").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(scanner.line(), 2);
    }

    #[test]
    fn test_windows_line_ending() {
        assert_eq!(kinds("</a>\r\n"), vec![EventKind::TagClose("a".into())]);
    }

    #[test]
    fn test_spans_point_at_tag_and_value() {
        let events = Scanner::tokenize("\n  <a x=\"1\">").unwrap();
        assert_eq!(events[0].span, Span::new(2, 3));
        assert_eq!(events[2].span, Span::new(2, 8));
        assert_eq!(events[2].tag(), "a");
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_unterminated_value() {
        let err = Scanner::tokenize("<a x=\"1>").unwrap_err();
        assert!(err.message.contains("Unterminated attribute value"));
        assert_eq!((err.line, err.column), (1, 6));
    }

    #[test]
    fn test_unterminated_tag() {
        let err = Scanner::tokenize("<a x=\"1\"").unwrap_err();
        assert!(err.message.contains("Unterminated tag"));
    }

    #[test]
    fn test_empty_tag_name() {
        assert!(Scanner::tokenize("<>").unwrap_err().message.contains("Empty"));
        assert!(Scanner::tokenize("</>").unwrap_err().message.contains("Empty"));
    }

    #[test]
    fn test_quote_outside_tag() {
        let err = Scanner::tokenize("\"x\"").unwrap_err();
        assert_eq!(err.column, 1);
    }

    #[test]
    fn test_second_slash_in_closing_tag() {
        let err = Scanner::tokenize("</a/>").unwrap_err();
        assert!(err.message.contains("Unexpected '/' in closing tag"));
        assert_eq!((err.line, err.column), (1, 4));
    }

    #[test]
    fn test_text_outside_tags_ignored() {
        assert_eq!(
            kinds("hello <a> world"),
            vec![EventKind::TagStart("a".into()), EventKind::TagOpen("a".into())]
        );
    }
}
