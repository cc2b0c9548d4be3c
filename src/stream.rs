use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use dsv_core::{Format, Parser, Result, Row};

use crate::rows::advance;

/// A stream of the rows parsed from a stream of lines.
///
/// This is the asynchronous counterpart of [`Rows`](struct.Rows.html) and
/// follows the same rules: lines are polled only as rows are demanded, an
/// open quoted field at the end of the lines is yielded as an error, and
/// the stream ends after its first error.
///
/// It is runtime agnostic, since it only relies on `futures-core`.
///
/// # Example
///
/// ```
/// use futures::{executor::block_on, stream, StreamExt};
/// use dsv::{Format, RowStream};
///
/// let lines = stream::iter(vec!["a,\"b", "c\"", "d"]);
/// let rows = RowStream::new(lines, Format::csv()).collect::<Vec<_>>();
/// let rows = block_on(rows);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].as_ref().unwrap(), &["a", "b\nc"]);
/// ```
pub struct RowStream<S, F = fn(&str) -> bool> {
    lines: S,
    parser: Option<Parser<F>>,
}

impl<S> RowStream<S>
where
    S: Stream,
    S::Item: AsRef<str>,
{
    /// Parse the given lines in the given format.
    pub fn new(lines: S, format: Format) -> RowStream<S> {
        RowStream::from_parser(lines, Parser::new(format))
    }
}

impl<S, F> RowStream<S, F>
where
    S: Stream,
    S::Item: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    /// Parse the given lines in the given format, skipping every line that
    /// starts a row and for which `filter` returns `true`.
    pub fn with_filter(
        lines: S,
        format: Format,
        filter: F,
    ) -> RowStream<S, F> {
        RowStream::from_parser(lines, Parser::with_filter(format, filter))
    }

    /// Parse the given lines with an existing parser.
    pub fn from_parser(lines: S, parser: Parser<F>) -> RowStream<S, F> {
        RowStream { lines, parser: Some(parser) }
    }

    /// Bind every row to a header.
    ///
    /// This works like
    /// [`Rows::with_header`](struct.Rows.html#method.with_header): the
    /// first row is given to `head_selector`, and each later row is
    /// given to `row_selector` along with the header value. Errors are
    /// yielded as they are and never reach the selectors.
    pub fn with_header<H, T, HS, RS>(
        self,
        head_selector: HS,
        row_selector: RS,
    ) -> HeadedStream<S, F, H, HS, RS>
    where
        HS: FnOnce(Row) -> H,
        RS: FnMut(&H, Row) -> T,
    {
        HeadedStream {
            rows: self,
            head_selector: Some(head_selector),
            row_selector,
            header: None,
        }
    }
}

impl<S, F> Stream for RowStream<S, F>
where
    S: Stream + Unpin,
    S::Item: AsRef<str>,
    F: FnMut(&str) -> bool + Unpin,
{
    type Item = Result<Row>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.parser.is_none() {
                return Poll::Ready(None);
            }
            match Pin::new(&mut this.lines).poll_next(cx) {
                Poll::Ready(Some(line)) => {
                    let got = advance(&mut this.parser, Some(line.as_ref()));
                    if got.is_some() {
                        return Poll::Ready(got);
                    }
                }
                Poll::Ready(None) => {
                    return Poll::Ready(advance(&mut this.parser, None));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.parser {
            None => (0, Some(0)),
            // Every line yields at most one item. An error at the end of
            // input stands in for the row its last line did not complete.
            Some(_) => (0, self.lines.size_hint().1),
        }
    }
}

impl<S, F> std::fmt::Debug for RowStream<S, F>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("RowStream")
            .field("lines", &self.lines)
            .field("parser", &self.parser)
            .finish()
    }
}

/// A stream of rows bound to the header row that precedes them.
///
/// This is created by
/// [`RowStream::with_header`](struct.RowStream.html#method.with_header).
pub struct HeadedStream<S, F, H, HS, RS> {
    rows: RowStream<S, F>,
    head_selector: Option<HS>,
    row_selector: RS,
    header: Option<H>,
}

impl<S, F, H, HS, RS> HeadedStream<S, F, H, HS, RS> {
    /// The header value, once the first row has been read.
    pub fn header(&self) -> Option<&H> {
        self.header.as_ref()
    }
}

impl<S, F, H, T, HS, RS> Stream for HeadedStream<S, F, H, HS, RS>
where
    S: Stream + Unpin,
    S::Item: AsRef<str>,
    F: FnMut(&str) -> bool + Unpin,
    H: Unpin,
    HS: FnOnce(Row) -> H + Unpin,
    RS: FnMut(&H, Row) -> T + Unpin,
{
    type Item = Result<T>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let row = match Pin::new(&mut this.rows).poll_next(cx) {
                Poll::Ready(Some(Ok(row))) => row,
                Poll::Ready(Some(Err(err))) => {
                    return Poll::Ready(Some(Err(err)))
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            };
            match this.header {
                Some(ref header) => {
                    return Poll::Ready(Some(Ok((this.row_selector)(
                        header, row,
                    ))));
                }
                None => {
                    if let Some(select) = this.head_selector.take() {
                        this.header = Some(select(row));
                    }
                }
            }
        }
    }
}

impl<S, F, H, HS, RS> std::fmt::Debug for HeadedStream<S, F, H, HS, RS>
where
    S: std::fmt::Debug,
    H: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("HeadedStream")
            .field("rows", &self.rows)
            .field("header", &self.header)
            .finish()
    }
}
