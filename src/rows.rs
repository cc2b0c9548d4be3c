use log::{debug, trace};

use dsv_core::{Format, Parser, Result, Row};

/// An extension trait that parses any sequence of lines into rows.
///
/// This is implemented for every `IntoIterator` whose items can be viewed
/// as a `&str`. Lines must not contain their terminators, which is exactly
/// what `str::lines` and `BufRead::lines` produce.
///
/// # Example
///
/// ```
/// use dsv::ParseLines;
///
/// let data = "city,pop\n\"Boston, MA\",4628910\n";
/// let rows = data.lines().parse_csv().collect::<dsv::Result<Vec<_>>>()?;
/// assert_eq!(rows[1], ["Boston, MA", "4628910"]);
/// # Ok::<(), dsv::Error>(())
/// ```
pub trait ParseLines: IntoIterator + Sized
where
    Self::Item: AsRef<str>,
{
    /// Parse these lines as CSV.
    fn parse_csv(self) -> Rows<Self::IntoIter> {
        self.parse_dsv(Format::csv())
    }

    /// Parse these lines in the given format.
    fn parse_dsv(self, format: Format) -> Rows<Self::IntoIter> {
        Rows::new(self.into_iter(), Parser::new(format))
    }

    /// Parse these lines in the given format, skipping every line that
    /// starts a row and for which `filter` returns `true`.
    fn parse_dsv_with_filter<F>(
        self,
        format: Format,
        filter: F,
    ) -> Rows<Self::IntoIter, F>
    where
        F: FnMut(&str) -> bool,
    {
        Rows::new(self.into_iter(), Parser::with_filter(format, filter))
    }
}

impl<T> ParseLines for T
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
}

/// An iterator of the rows parsed from an iterator of lines.
///
/// Lines are pulled from the underlying iterator only as fast as rows are
/// pulled from this one. Once the lines run out, an error is yielded if a
/// quoted field was left open.
///
/// The first error ends the iteration: every call to `next` after an
/// error returns `None`.
///
/// The `I` type parameter is the iterator of lines and `F` is the type of
/// the line filter.
pub struct Rows<I, F = fn(&str) -> bool> {
    lines: I,
    /// `None` once the parse is over, successfully or not.
    parser: Option<Parser<F>>,
}

impl<I, F> Rows<I, F>
where
    I: Iterator,
    I::Item: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    /// Parse the given lines with the given parser.
    ///
    /// The parser should be fresh, since lines fed to it beforehand count
    /// towards the line numbers of the rows produced.
    pub fn new(lines: I, parser: Parser<F>) -> Rows<I, F> {
        Rows { lines, parser: Some(parser) }
    }

    /// The number of physical lines parsed so far, or `None` once the
    /// parse is over.
    pub fn line(&self) -> Option<u64> {
        self.parser.as_ref().map(Parser::line)
    }

    /// Bind every row to a header built from the first row.
    ///
    /// The first row produced is given to `head_selector`, and the value it
    /// returns is then given by reference to `row_selector` along with each
    /// of the rows that follow. Only those are yielded. Input with no rows
    /// yields nothing, and `head_selector` is never called.
    ///
    /// # Example
    ///
    /// ```
    /// use dsv::{ParseLines, Row};
    ///
    /// let data = "name,age\nalice,31\nbob,27";
    /// let ages = data
    ///     .lines()
    ///     .parse_csv()
    ///     .with_header(
    ///         |head: Row| head.position("age"),
    ///         |age: &Option<usize>, row: Row| {
    ///             age.and_then(|i| row.get(i)?.parse::<u32>().ok())
    ///         },
    ///     )
    ///     .collect::<dsv::Result<Vec<_>>>()?;
    /// assert_eq!(ages, vec![Some(31), Some(27)]);
    /// # Ok::<(), dsv::Error>(())
    /// ```
    pub fn with_header<H, T, HS, RS>(
        self,
        head_selector: HS,
        row_selector: RS,
    ) -> Headed<I, F, H, HS, RS>
    where
        HS: FnOnce(Row) -> H,
        RS: FnMut(&H, Row) -> T,
    {
        Headed {
            rows: self,
            head_selector: Some(head_selector),
            row_selector,
            header: None,
        }
    }
}

impl<I, F> Iterator for Rows<I, F>
where
    I: Iterator,
    I::Item: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        loop {
            if self.parser.is_none() {
                return None;
            }
            let line = self.lines.next();
            let end = line.is_none();
            let got =
                advance(&mut self.parser, line.as_ref().map(|l| l.as_ref()));
            if got.is_some() || end {
                return got;
            }
        }
    }
}

impl<I, F> std::fmt::Debug for Rows<I, F>
where
    I: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("lines", &self.lines)
            .field("parser", &self.parser)
            .finish()
    }
}

/// An iterator of rows bound to a header, built by
/// [`Rows::with_header`](struct.Rows.html#method.with_header).
///
/// `H` is the type of the header value, `HS` builds it from the first row
/// and `RS` maps each later row.
pub struct Headed<I, F, H, HS, RS> {
    rows: Rows<I, F>,
    head_selector: Option<HS>,
    row_selector: RS,
    header: Option<H>,
}

impl<I, F, H, HS, RS> Headed<I, F, H, HS, RS> {
    /// The header value, once the first row has been read.
    pub fn header(&self) -> Option<&H> {
        self.header.as_ref()
    }
}

impl<I, F, H, T, HS, RS> Iterator for Headed<I, F, H, HS, RS>
where
    I: Iterator,
    I::Item: AsRef<str>,
    F: FnMut(&str) -> bool,
    HS: FnOnce(Row) -> H,
    RS: FnMut(&H, Row) -> T,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(err) => return Some(Err(err)),
            };
            match self.header {
                Some(ref header) => {
                    return Some(Ok((self.row_selector)(header, row)));
                }
                None => {
                    if let Some(select) = self.head_selector.take() {
                        self.header = Some(select(row));
                    }
                }
            }
        }
    }
}

/// Feed the next line to the parser in `slot`, or signal the end of input
/// when `line` is `None`.
///
/// The slot is emptied once the parse is over: at the end of input, or
/// after an error. Nothing is done on an empty slot.
///
/// This returns `None` when there is nothing to yield, either because the
/// line did not complete a row or because the input ended cleanly.
pub(crate) fn advance<F>(
    slot: &mut Option<Parser<F>>,
    line: Option<&str>,
) -> Option<Result<Row>>
where
    F: FnMut(&str) -> bool,
{
    let line = match line {
        Some(line) => line,
        None => {
            let parser = slot.take()?;
            let lines = parser.line();
            return match parser.terminate() {
                Ok(()) => {
                    trace!("input ended after {} lines", lines);
                    None
                }
                Err(err) => {
                    debug!("input ended inside a quoted field: {}", err);
                    Some(Err(err))
                }
            };
        }
    };
    let parser = slot.as_mut()?;
    match parser.receive_line(line) {
        Ok(Some(row)) => {
            trace!("row at line {} has {} fields", row.line(), row.len());
            Some(Ok(row))
        }
        Ok(None) => None,
        Err(err) => {
            debug!("parse failed: {}", err);
            *slot = None;
            Some(Err(err))
        }
    }
}
