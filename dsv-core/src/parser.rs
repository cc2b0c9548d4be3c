use std::borrow::Cow;
use std::fmt;
use std::mem;

use memchr::{memchr, memchr2};

use crate::error::{Error, Result};
use crate::format::Format;
use crate::row::{Row, RowBuffer};

/// The states of the parser.
///
/// Every state but `AwaitNextRow` and `Failed` describes where the parser
/// is within the fields of the current row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    AtFieldStart,
    InField,
    InQuotedField,
    Escaping,
    ExpectingDelimiter,
    /// A quote was seen in a quoted field whose escape is the quote itself.
    /// The next character tells a doubled quote from a closing one.
    QuoteQuote,
    /// The last line completed a row.
    AwaitNextRow,
    /// A line was rejected with an error. Nothing more may be parsed.
    Failed,
}

/// Builds a parser with various configuration knobs.
///
/// This builder can be used to tweak the delimiter, quote, escape and
/// newline before building a [`Parser`](struct.Parser.html). Once built, a
/// parser's configuration cannot be changed.
#[derive(Clone, Debug, Default)]
pub struct ParserBuilder {
    format: Format,
}

impl ParserBuilder {
    /// Create a new builder for the CSV format.
    pub fn new() -> ParserBuilder {
        ParserBuilder::default()
    }

    /// Build a parser from this configuration.
    pub fn build(&self) -> Parser {
        Parser::new(self.format.clone())
    }

    /// Build a parser from this configuration that skips every line for
    /// which `filter` returns `true`.
    ///
    /// The filter is only ever asked about lines that start a row. It never
    /// sees a line that continues a quoted field.
    pub fn build_with_filter<F>(&self, filter: F) -> Parser<F>
    where
        F: FnMut(&str) -> bool,
    {
        Parser::with_filter(self.format.clone(), filter)
    }

    /// Replace the whole format.
    pub fn format(&mut self, format: Format) -> &mut ParserBuilder {
        self.format = format;
        self
    }

    /// The field delimiter to use.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut ParserBuilder {
        self.update(|format| format.with_delimiter(delimiter))
    }

    /// The quote character to use, or `None` to disable quoting.
    ///
    /// The default is `Some('"')`.
    pub fn quote(&mut self, quote: Option<char>) -> &mut ParserBuilder {
        self.update(|format| format.with_quote(quote))
    }

    /// The escape character to use.
    ///
    /// The default is `"`, which escapes a quote by doubling it.
    pub fn escape(&mut self, escape: char) -> &mut ParserBuilder {
        self.update(|format| format.with_escape(escape))
    }

    /// The newline to reinsert into a quoted field that spans lines.
    ///
    /// The default is `"\n"`.
    pub fn newline<S>(&mut self, newline: S) -> &mut ParserBuilder
    where
        S: Into<Cow<'static, str>>,
    {
        self.update(|format| format.with_newline(newline))
    }

    /// Reject quoted fields that span lines.
    pub fn no_newline(&mut self) -> &mut ParserBuilder {
        self.update(Format::without_newline)
    }

    /// Disable quoting and use `\` to escape characters in unquoted fields.
    pub fn unquoted(&mut self) -> &mut ParserBuilder {
        self.update(Format::unquoted)
    }

    fn update<U>(&mut self, update: U) -> &mut ParserBuilder
    where
        U: FnOnce(Format) -> Format,
    {
        self.format = update(mem::take(&mut self.format));
        self
    }
}

/// A line driven parser of delimiter-separated values.
///
/// A parser is fed one line at a time with
/// [`receive_line`](#method.receive_line). Lines must not contain their
/// terminator. Each call completes at most one row: none when the line was
/// absorbed into a quoted field that continues on the next line (or when the
/// line filter rejected it), and exactly one otherwise. Once the input is
/// exhausted, [`terminate`](#method.terminate) reports whether a quoted
/// field was left open.
///
/// The parser knows nothing of where lines come from. The `dsv` crate
/// builds iterators, push sinks and streams on top of it.
///
/// # Errors
///
/// Two conditions are errors:
///
/// * A closing quote followed by something other than the delimiter, a
///   space or a tab.
/// * A quoted field still open when the input ends, or when a line ends
///   and the format has no newline to continue the field with.
///
/// After `receive_line` returns an error the parser is unusable, and
/// feeding it again panics.
///
/// An escape as the last character of a line, inside a quoted field or
/// with quoting disabled, applies to the line break itself: the format's
/// newline is appended to the field and the row continues on the next
/// line.
///
/// # Example
///
/// ```
/// use dsv_core::{Format, Parser};
///
/// let mut parser = Parser::new(Format::csv());
/// let row = parser.receive_line(r#"a,"b""c",d"#).unwrap().unwrap();
/// assert_eq!(row, ["a", "b\"c", "d"]);
/// assert!(parser.terminate().is_ok());
/// ```
#[derive(Clone)]
pub struct Parser<F = fn(&str) -> bool> {
    format: Format,
    /// Lines for which this returns true are skipped, unless they continue
    /// an open row.
    filter: Option<F>,
    state: State,
    /// The row being assembled, including the field being built.
    buf: RowBuffer,
    /// The number of physical lines received.
    line: u64,
    /// The line on which the row being assembled began.
    row_line: u64,
    /// The number of characters of the current line consumed.
    column: u64,
    /// Whether the row being assembled continues from a previous line.
    continued: bool,
}

impl Parser {
    /// Create a parser for the given format that accepts every line.
    pub fn new(format: Format) -> Parser {
        Parser::from_parts(format, None)
    }
}

impl<F: FnMut(&str) -> bool> Parser<F> {
    /// Create a parser for the given format that skips every line for which
    /// `filter` returns `true`.
    ///
    /// This is useful to drop comment or blank lines. The filter is never
    /// consulted for a line that continues an open quoted field, so a row
    /// spanning lines is always parsed whole.
    pub fn with_filter(format: Format, filter: F) -> Parser<F> {
        Parser::from_parts(format, Some(filter))
    }

    fn from_parts(format: Format, filter: Option<F>) -> Parser<F> {
        Parser {
            format,
            filter,
            state: State::AtFieldStart,
            buf: RowBuffer::default(),
            line: 0,
            row_line: 0,
            column: 0,
            continued: false,
        }
    }

    /// The format this parser was built with.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// The number of physical lines received so far, including the lines
    /// rejected by the filter.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns true if and only if a row is open across lines, i.e., the
    /// last line received ended inside a quoted field.
    pub fn is_in_row(&self) -> bool {
        self.continued
    }

    /// Feed the next line to this parser.
    ///
    /// This returns the row completed by the line, if any. `None` means
    /// the line either ended inside a quoted field (the row continues on
    /// the next line) or was rejected by the line filter.
    ///
    /// # Panics
    ///
    /// This panics when called after a previous call returned an error.
    pub fn receive_line(&mut self, line: &str) -> Result<Option<Row>> {
        match self.state {
            State::Failed => {
                panic!("line received by a parser that already failed")
            }
            State::AwaitNextRow => self.state = State::AtFieldStart,
            _ => {}
        }
        self.line += 1;
        if !self.continued {
            self.row_line = self.line;
            if let Some(ref mut filter) = self.filter {
                if filter(line) {
                    return Ok(None);
                }
            }
        }
        self.column = 0;
        match self.parse_line(line).and_then(|()| self.end_line()) {
            Ok(row) => Ok(row),
            Err(err) => {
                self.state = State::Failed;
                Err(err)
            }
        }
    }

    /// Signal the end of input.
    ///
    /// This returns an error if a quoted field is still open. The parser is
    /// consumed, since nothing may be fed to it afterwards.
    ///
    /// # Panics
    ///
    /// This panics if `receive_line` previously returned an error.
    pub fn terminate(self) -> Result<()> {
        if self.state == State::Failed {
            panic!("parser terminated after it already failed");
        }
        if self.continued {
            return Err(Error::unclosed_quoted_field(self.line, self.column));
        }
        debug_assert!(self.buf.is_empty());
        Ok(())
    }

    fn parse_line(&mut self, line: &str) -> Result<()> {
        let mut rest = line;
        while let Some(ch) = rest.chars().next() {
            let run = self.literal_run(rest);
            if run > 0 {
                let (literal, tail) = rest.split_at(run);
                self.buf.push_str(literal);
                self.column += literal.chars().count() as u64;
                rest = tail;
                continue;
            }
            rest = &rest[ch.len_utf8()..];
            self.column += 1;
            self.step(ch)?;
        }
        Ok(())
    }

    /// Returns the length in bytes of the prefix of `s` that the current
    /// state would append to the field one character at a time.
    ///
    /// This only looks for runs when every character that could end the
    /// run is ASCII, so that `memchr` can find them.
    fn literal_run(&self, s: &str) -> usize {
        let (a, b) = match self.state {
            State::InField => match self.format.quote() {
                Some(_) => (self.format.delimiter(), None),
                None => (self.format.delimiter(), Some(self.format.escape())),
            },
            State::InQuotedField => match self.format.quote() {
                Some(quote) => (quote, Some(self.format.escape())),
                None => return 0,
            },
            _ => return 0,
        };
        let haystack = s.as_bytes();
        let found = match (ascii(a), b.map(ascii)) {
            (Some(a), None) => memchr(a, haystack),
            (Some(a), Some(Some(b))) => memchr2(a, b, haystack),
            _ => return 0,
        };
        found.unwrap_or_else(|| haystack.len())
    }

    fn step(&mut self, ch: char) -> Result<()> {
        let delimiter = self.format.delimiter();
        let escape = self.format.escape();
        let quoting = self.format.quote().is_some();
        let is_quote = self.format.quote() == Some(ch);
        loop {
            match self.state {
                State::AtFieldStart => {
                    if is_quote {
                        self.state = State::InQuotedField;
                    } else if !quoting && ch == escape {
                        self.state = State::Escaping;
                    } else if ch == delimiter {
                        self.buf.commit();
                    } else {
                        self.buf.push(ch);
                        self.state = State::InField;
                    }
                }
                State::InField => {
                    if ch == delimiter {
                        self.buf.commit();
                        self.state = State::AtFieldStart;
                    } else if !quoting && ch == escape {
                        self.state = State::Escaping;
                    } else {
                        self.buf.push(ch);
                    }
                }
                State::InQuotedField => {
                    if is_quote {
                        if self.format.is_double_quote() {
                            self.state = State::QuoteQuote;
                        } else {
                            self.buf.commit();
                            self.state = State::ExpectingDelimiter;
                        }
                    } else if ch == escape {
                        self.state = State::Escaping;
                    } else {
                        self.buf.push(ch);
                    }
                }
                State::Escaping => {
                    self.buf.push(ch);
                    self.state = self.unescaped_state();
                }
                State::QuoteQuote => {
                    if is_quote {
                        self.buf.push(ch);
                        self.state = State::InQuotedField;
                    } else {
                        // The quote closed the field. Whatever follows it
                        // must be looked at again as a potential delimiter.
                        self.buf.commit();
                        self.state = State::ExpectingDelimiter;
                        continue;
                    }
                }
                State::ExpectingDelimiter => {
                    if ch == delimiter {
                        self.state = State::AtFieldStart;
                    } else if ch != ' ' && ch != '\t' {
                        return Err(Error::missing_delimiter(
                            self.line,
                            self.column,
                        ));
                    }
                }
                State::AwaitNextRow | State::Failed => {
                    unreachable!("character parsed in state {:?}", self.state)
                }
            }
            return Ok(());
        }
    }

    fn end_line(&mut self) -> Result<Option<Row>> {
        match self.state {
            State::InQuotedField | State::Escaping => {
                match self.format.newline() {
                    Some(newline) => self.buf.push_str(newline),
                    None => {
                        return Err(Error::unclosed_quoted_field(
                            self.line,
                            self.column + 1,
                        ));
                    }
                }
                // A pending escape applies to the line break itself.
                if self.state == State::Escaping {
                    self.state = self.unescaped_state();
                }
                self.continued = true;
                Ok(None)
            }
            State::AtFieldStart | State::InField | State::QuoteQuote => {
                self.buf.commit();
                Ok(Some(self.complete_row()))
            }
            State::ExpectingDelimiter => Ok(Some(self.complete_row())),
            State::AwaitNextRow | State::Failed => {
                unreachable!("line ended in state {:?}", self.state)
            }
        }
    }

    fn complete_row(&mut self) -> Row {
        self.state = State::AwaitNextRow;
        self.continued = false;
        self.buf.freeze(self.row_line)
    }

    /// The state to return to once an escaped character was appended.
    fn unescaped_state(&self) -> State {
        if self.format.quote().is_some() {
            State::InQuotedField
        } else {
            State::InField
        }
    }
}

impl<F> fmt::Debug for Parser<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Parser")
            .field("format", &self.format)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("state", &self.state)
            .field("line", &self.line)
            .field("row_line", &self.row_line)
            .field("column", &self.column)
            .field("continued", &self.continued)
            .finish()
    }
}

fn ascii(ch: char) -> Option<u8> {
    if ch.is_ascii() {
        Some(ch as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{Error, ErrorKind};
    use crate::format::Format;
    use crate::row::Row;

    use super::{Parser, ParserBuilder};

    type Csv = Vec<Vec<String>>;

    macro_rules! csv {
        ($([$($field:expr),*]),*) => {{
            #[allow(unused_mut)]
            fn x() -> Csv {
                let mut csv = Csv::new();
                $(
                    let mut row = vec![];
                    $(
                        row.push(String::from($field));
                    )*
                    csv.push(row);
                )*
                csv
            }
            x()
        }}
    }

    macro_rules! parses_to {
        ($name:ident, $data:expr, $expected:expr) => {
            parses_to!($name, $data, $expected, Format::csv());
        };
        ($name:ident, $data:expr, $expected:expr, $format:expr) => {
            #[test]
            fn $name() {
                let got = parse(Parser::new($format), $data).unwrap();
                let got: Csv = got.iter().map(Row::to_vec).collect();
                assert_eq!($expected, got);
            }
        };
    }

    macro_rules! fails_with {
        ($name:ident, $data:expr, $kind:ident, $line:expr, $col:expr) => {
            fails_with!($name, $data, $kind, $line, $col, Format::csv());
        };
        (
            $name:ident, $data:expr, $kind:ident,
            $line:expr, $col:expr, $format:expr
        ) => {
            #[test]
            fn $name() {
                let err = parse(Parser::new($format), $data).unwrap_err();
                assert_eq!(ErrorKind::$kind, err.kind());
                assert_eq!(($line, $col), (err.line(), err.column()));
            }
        };
    }

    /// Feed each of the given lines and terminate.
    fn parse<F>(
        mut parser: Parser<F>,
        lines: &[&str],
    ) -> Result<Vec<Row>, Error>
    where
        F: FnMut(&str) -> bool,
    {
        let mut rows = vec![];
        for line in lines {
            if let Some(row) = parser.receive_line(line)? {
                rows.push(row);
            }
        }
        parser.terminate()?;
        Ok(rows)
    }

    parses_to!(empty, &[], csv![]);
    parses_to!(empty_line, &[""], csv![[""]]);
    parses_to!(only_delimiter, &[","], csv![["", ""]]);
    parses_to!(one_row_one_field, &["a"], csv![["a"]]);
    parses_to!(one_row_many_fields, &["a,b,c"], csv![["a", "b", "c"]]);
    parses_to!(one_row_trailing_comma, &["a,b,"], csv![["a", "b", ""]]);
    parses_to!(one_row_leading_comma, &[",a,b"], csv![["", "a", "b"]]);
    parses_to!(
        many_rows_many_fields,
        &["a,b,c", "x,y,z"],
        csv![["a", "b", "c"], ["x", "y", "z"]]
    );
    parses_to!(
        empty_lines_interspersed,
        &["a,b", "", "x,y"],
        csv![["a", "b"], [""], ["x", "y"]]
    );
    parses_to!(spaces_kept, &[" a , b "], csv![[" a ", " b "]]);
    parses_to!(non_ascii, &["é,ü,日本"], csv![["é", "ü", "日本"]]);

    parses_to!(quote_empty, &["\"\""], csv![[""]]);
    parses_to!(quote_space, &["\" \""], csv![[" "]]);
    parses_to!(quote_delimiter_inside, &["\"a,b\",c"], csv![["a,b", "c"]]);
    parses_to!(quote_doubled, &[r#"a,"b""c",d"#], csv![["a", "b\"c", "d"]]);
    parses_to!(quote_only_doubled, &[r#""""""#], csv![["\""]]);
    parses_to!(quote_then_empty, &[r#""a","#], csv![["a", ""]]);
    parses_to!(quote_trailing_space, &["\"a\" \t,b"], csv![["a", "b"]]);
    parses_to!(quote_trailing_space_eol, &["\"a\"  "], csv![["a"]]);
    parses_to!(quote_mid_field_literal, &["a\"b,c"], csv![["a\"b", "c"]]);
    parses_to!(
        quote_multi_line,
        &["a,\"b", "c\",d"],
        csv![["a", "b\nc", "d"]]
    );
    parses_to!(
        quote_multi_line_empty_lines,
        &["\"", "", "\""],
        csv![["\n\n"]]
    );
    parses_to!(
        quote_multi_line_crlf,
        &["\"a", "b\""],
        csv![["a\r\nb"]],
        Format::csv().with_newline("\r\n")
    );
    parses_to!(
        quote_doubled_across_lines,
        &["\"a\"\"", "\"\"b\""],
        csv![["a\"\n\"b"]]
    );

    parses_to!(
        quote_change,
        &["'a,b',c"],
        csv![["a,b", "c"]],
        Format::csv().with_quote(Some('\'')).with_escape('\'')
    );
    parses_to!(
        quote_escapes,
        &[r#""a\"b",c"#],
        csv![["a\"b", "c"]],
        Format::csv().with_escape('\\')
    );
    parses_to!(
        quote_escapes_escape,
        &[r#""a\\b""#],
        csv![["a\\b"]],
        Format::csv().with_escape('\\')
    );
    parses_to!(
        quote_escaped_newline,
        &[r#""a\"#, "b\""],
        csv![["a\nb"]],
        Format::csv().with_escape('\\')
    );

    parses_to!(
        delimiter_tabs,
        &["a\tb"],
        csv![["a", "b"]],
        Format::new('\t')
    );
    parses_to!(
        delimiter_weird,
        &["azb"],
        csv![["a", "b"]],
        Format::new('z')
    );
    parses_to!(
        delimiter_non_ascii,
        &["a→\"b→c\"→d"],
        csv![["a", "b→c", "d"]],
        Format::new('→')
    );
    parses_to!(
        quote_non_ascii,
        &["«a,b«,c"],
        csv![["a,b", "c"]],
        Format::csv().with_quote(Some('«')).with_escape('«')
    );
    // A quote equal to the delimiter always wins at the start of a field.
    parses_to!(
        quote_delimiter_same,
        &[",a,"],
        csv![["a"]],
        Format::csv().with_quote(Some(',')).with_escape(',')
    );

    parses_to!(
        unquoted_quotes_literal,
        &["\"a\",b"],
        csv![["\"a\"", "b"]],
        Format::unquoted_csv()
    );
    parses_to!(
        unquoted_escaped_delimiter,
        &[r"a\,b,c"],
        csv![["a,b", "c"]],
        Format::unquoted_csv()
    );
    parses_to!(
        unquoted_escaped_at_start,
        &[r"\,a,\\"],
        csv![[",a", "\\"]],
        Format::unquoted_csv()
    );
    parses_to!(
        unquoted_escaped_newline,
        &[r"a,b\", "c", "d"],
        csv![["a", "b\nc"], ["d"]],
        Format::unquoted_csv()
    );

    fails_with!(missing_delimiter, &[r#""a"b,c"#], MissingDelimiter, 1, 4);
    fails_with!(
        missing_delimiter_after_space,
        &["x", r#"a,"b"  c"#],
        MissingDelimiter,
        2,
        8
    );
    fails_with!(
        missing_delimiter_distinct_escape,
        &[r#""a""b""#],
        MissingDelimiter,
        1,
        4,
        Format::csv().with_escape('\\')
    );
    fails_with!(unclosed_single_line, &["\"abc"], UnclosedQuotedField, 1, 4);
    fails_with!(
        unclosed_multi_line,
        &["a,b", "c,\"d", "ef"],
        UnclosedQuotedField,
        3,
        2
    );
    fails_with!(
        unclosed_no_newline,
        &["a,\"b", "c\""],
        UnclosedQuotedField,
        1,
        5,
        Format::csv().without_newline()
    );
    fails_with!(
        unclosed_unquoted_escape,
        &[r"a\"],
        UnclosedQuotedField,
        1,
        2,
        Format::unquoted_csv()
    );

    #[test]
    fn unclosed_reported_on_terminate_only() {
        let mut parser = Parser::new(Format::csv());
        assert_eq!(parser.receive_line("\"abc"), Ok(None));
        assert!(parser.is_in_row());
        let err = parser.terminate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unclosed quoted field (line #1, col #4)."
        );
    }

    #[test]
    fn missing_delimiter_message() {
        let mut parser = Parser::new(Format::csv());
        let err = parser.receive_line(r#""a"b,c"#).unwrap_err();
        assert_eq!(err.to_string(), "Missing delimiter (line #1, col #4).");
    }

    #[test]
    #[should_panic(expected = "already failed")]
    fn poisoned_after_error() {
        let mut parser = Parser::new(Format::csv());
        assert!(parser.receive_line(r#""a"b"#).is_err());
        let _ = parser.receive_line("c");
    }

    #[test]
    fn line_numbers() {
        let rows = parse(
            Parser::new(Format::csv()),
            &["a", "b,\"c", "d", "e\",f", "g"],
        )
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line(), 1);
        assert_eq!(rows[1].line(), 2);
        assert_eq!(rows[1], ["b", "c\nd\ne", "f"]);
        assert_eq!(rows[2].line(), 5);
    }

    #[test]
    fn physical_line_count() {
        let mut parser = Parser::new(Format::csv());
        assert_eq!(parser.line(), 0);
        parser.receive_line("\"a").unwrap();
        parser.receive_line("b\"").unwrap();
        assert_eq!(parser.line(), 2);
        assert!(!parser.is_in_row());
    }

    #[test]
    fn filter_skips_lines() {
        let parser = Parser::with_filter(Format::csv(), |line: &str| {
            line.starts_with('#')
        });
        let rows = parse(parser, &["# comment", "a,b", "#", "c,d"]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["a", "b"]);
        assert_eq!(rows[0].line(), 2);
        assert_eq!(rows[1], ["c", "d"]);
        assert_eq!(rows[1].line(), 4);
    }

    #[test]
    fn filter_not_consulted_inside_quotes() {
        let mut asked = vec![];
        let parser = Parser::with_filter(Format::csv(), |line: &str| {
            asked.push(line.to_string());
            line.starts_with('#')
        });
        let rows =
            parse(parser, &["x", "a,\"b", "# not a comment", "c\"", "y"])
                .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], ["a", "b\n# not a comment\nc"]);
        assert_eq!(rows[1].line(), 2);
        assert_eq!(asked, vec!["x", "a,\"b", "y"]);
    }

    #[test]
    fn builder() {
        let mut parser = ParserBuilder::new()
            .delimiter(';')
            .quote(Some('\''))
            .escape('\'')
            .newline("\r\n")
            .build();
        assert_eq!(parser.format().delimiter(), ';');
        assert_eq!(parser.receive_line("'a"), Ok(None));
        let row = parser.receive_line("b''c';d").unwrap().unwrap();
        assert_eq!(row, ["a\r\nb'c", "d"]);
    }

    #[test]
    fn builder_with_filter() {
        let mut builder = ParserBuilder::new();
        builder.unquoted();
        let mut parser = builder.build_with_filter(str::is_empty);
        assert_eq!(parser.format(), &Format::unquoted_csv());
        assert_eq!(parser.receive_line(""), Ok(None));
        let row = parser.receive_line("\"a\",b").unwrap().unwrap();
        assert_eq!(row, ["\"a\"", "b"]);
        assert_eq!(row.line(), 2);
    }

    #[test]
    fn builder_no_newline() {
        let mut parser = ParserBuilder::new().no_newline().build();
        let err = parser.receive_line("\"ab").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnclosedQuotedField);
        assert_eq!((err.line(), err.column()), (1, 4));
    }

    #[test]
    fn many_fields_grow() {
        let line = (0..100).map(|i| i.to_string()).collect::<Vec<_>>();
        let mut parser = Parser::new(Format::csv());
        let row = parser.receive_line(&line.join(",")).unwrap().unwrap();
        assert_eq!(row.len(), 100);
        assert_eq!(row, line);
        let row = parser.receive_line("a,b").unwrap().unwrap();
        assert_eq!(row.len(), 2);
    }
}
