use log::{debug, trace};

use dsv_core::{Error, Format, Parser, Result, Row};

/// A sink that parses lines as they are pushed into it and hands every
/// completed row to a callback.
///
/// This suits input that arrives on someone else's schedule, such as lines
/// read off a socket or produced by an event loop. Rows are delivered in
/// order, each as soon as its last line is pushed.
///
/// Errors are terminal. Once `push` has returned an error, the sink drops
/// every later line and keeps returning that same error, including from
/// `finish`.
///
/// # Example
///
/// ```
/// use dsv::{Format, Push};
///
/// let mut rows = vec![];
/// let mut sink = Push::new(Format::csv(), |row| rows.push(row));
/// sink.push("a,\"b")?;
/// sink.push("c\"")?;
/// sink.finish()?;
/// assert_eq!(rows[0], ["a", "b\nc"]);
/// # Ok::<(), dsv::Error>(())
/// ```
pub struct Push<S, F = fn(&str) -> bool> {
    parser: Parser<F>,
    sink: S,
    failed: Option<Error>,
}

impl<S: FnMut(Row)> Push<S> {
    /// Create a sink that parses lines in the given format.
    pub fn new(format: Format, sink: S) -> Push<S> {
        Push::from_parser(Parser::new(format), sink)
    }
}

impl Push<fn(Row)> {
    /// Create a sink that binds every row to a header.
    ///
    /// The first row completed by `parser` is given to `head_selector`, and
    /// the value it returns is then given by reference to `row_selector`
    /// along with each later row. If no row is ever completed,
    /// `head_selector` is never called. Errors are returned from `push` and
    /// `finish` as with any other sink and never reach the selectors.
    ///
    /// # Example
    ///
    /// ```
    /// use dsv::{Format, Parser, Push};
    ///
    /// let mut names = vec![];
    /// let mut sink = Push::with_header(
    ///     Parser::new(Format::csv()),
    ///     |head| head.position("name"),
    ///     |col: &Option<usize>, row| {
    ///         names.push(col.and_then(|i| row.get(i)).map(String::from))
    ///     },
    /// );
    /// sink.push("id,name")?;
    /// sink.push("1,alice")?;
    /// sink.finish()?;
    /// assert_eq!(names, vec![Some("alice".to_string())]);
    /// # Ok::<(), dsv::Error>(())
    /// ```
    pub fn with_header<F, H, HS, RS>(
        parser: Parser<F>,
        head_selector: HS,
        mut row_selector: RS,
    ) -> Push<impl FnMut(Row), F>
    where
        F: FnMut(&str) -> bool,
        HS: FnOnce(Row) -> H,
        RS: FnMut(&H, Row),
    {
        let mut head_selector = Some(head_selector);
        let mut header: Option<H> = None;
        Push::from_parser(parser, move |row: Row| match header {
            Some(ref header) => row_selector(header, row),
            None => {
                if let Some(select) = head_selector.take() {
                    header = Some(select(row));
                }
            }
        })
    }
}

impl<S, F> Push<S, F>
where
    S: FnMut(Row),
    F: FnMut(&str) -> bool,
{
    /// Create a sink that parses lines in the given format and skips every
    /// line that starts a row and for which `filter` returns `true`.
    pub fn with_filter(format: Format, filter: F, sink: S) -> Push<S, F> {
        Push::from_parser(Parser::with_filter(format, filter), sink)
    }

    /// Create a sink around an existing parser.
    pub fn from_parser(parser: Parser<F>, sink: S) -> Push<S, F> {
        Push { parser, sink, failed: None }
    }

    /// Parse the next line, handing the row it completes (if any) to the
    /// callback.
    pub fn push(&mut self, line: &str) -> Result<()> {
        if let Some(ref err) = self.failed {
            return Err(err.clone());
        }
        match self.parser.receive_line(line) {
            Ok(Some(row)) => {
                trace!("row at line {} has {} fields", row.line(), row.len());
                (self.sink)(row);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                debug!("parse failed: {}", err);
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Signal that no more lines will be pushed.
    ///
    /// This returns an error if the last line pushed left a quoted field
    /// open, or if an earlier push failed.
    pub fn finish(self) -> Result<()> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        self.parser.terminate().map_err(|err| {
            debug!("input ended inside a quoted field: {}", err);
            err
        })
    }
}

impl<S, F> std::fmt::Debug for Push<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Push")
            .field("parser", &self.parser)
            .field("failed", &self.failed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use dsv_core::{ErrorKind, Format, Parser, Row};

    use super::Push;

    #[test]
    fn rows_delivered_in_order() {
        let mut got = vec![];
        let mut sink =
            Push::new(Format::csv(), |row: Row| got.push(row.to_vec()));
        for line in &["a,b", "\"c", "d\",e", "f"] {
            sink.push(line).unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(
            got,
            vec![vec!["a", "b"], vec!["c\nd", "e"], vec!["f"]]
        );
    }

    #[test]
    fn row_delivered_on_its_last_line() {
        let mut count = 0;
        let mut sink = Push::new(Format::csv(), |_| count += 1);
        sink.push("\"a").unwrap();
        sink.push("b\"").unwrap();
        sink.finish().unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn filter() {
        let mut lines = vec![];
        let mut sink = Push::with_filter(
            Format::new('\t'),
            |line: &str| line.starts_with("--"),
            |row: Row| lines.push(row.line()),
        );
        for line in &["-- comment", "a\tb", "-- comment", "c"] {
            sink.push(line).unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn error_is_sticky() {
        let mut count = 0;
        let mut sink = Push::new(Format::csv(), |_| count += 1);
        sink.push("a").unwrap();
        let err = sink.push("\"b\"c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDelimiter);
        assert_eq!(sink.push("d"), Err(err.clone()));
        assert_eq!(sink.finish(), Err(err));
        assert_eq!(count, 1);
    }

    #[test]
    fn unclosed_on_finish() {
        let mut sink = Push::from_parser(Parser::new(Format::csv()), |_| {});
        sink.push("\"abc").unwrap();
        let err = sink.finish().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnclosedQuotedField);
        assert_eq!((err.line(), err.column()), (1, 4));
    }

    #[test]
    fn header_binding() {
        let mut got = vec![];
        let mut sink = Push::with_header(
            Parser::new(Format::new(';')),
            |head: Row| head.to_vec(),
            |head: &Vec<String>, row: Row| {
                got.push((head[1].clone(), row[1].to_string()))
            },
        );
        for line in &["k;v", "a;\"1", "2\"", "b;3"] {
            sink.push(line).unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(
            got,
            vec![
                ("v".to_string(), "1\n2".to_string()),
                ("v".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn header_on_empty_input() {
        let mut called = false;
        let mut count = 0;
        let sink = Push::with_header(
            Parser::new(Format::csv()),
            |_: Row| called = true,
            |_: &(), _: Row| count += 1,
        );
        sink.finish().unwrap();
        assert!(!called);
        assert_eq!(count, 0);
    }

    #[test]
    fn header_passes_errors() {
        let mut count = 0;
        let mut sink = Push::with_header(
            Parser::new(Format::csv()),
            |head: Row| head,
            |_: &Row, _: Row| count += 1,
        );
        sink.push("a").unwrap();
        let err = sink.push("\"b\"c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDelimiter);
        assert_eq!(sink.push("d"), Err(err.clone()));
        assert_eq!(sink.finish(), Err(err));
        assert_eq!(count, 0);
    }
}
