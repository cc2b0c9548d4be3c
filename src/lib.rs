/*!
The `dsv` crate parses CSV and other delimiter-separated values one line at
a time.

Input is consumed as a sequence of lines with their terminators already
removed, wherever those lines come from: a string, a file read with
`BufRead::lines`, a channel, or an asynchronous stream. Quoted fields may
span lines, in which case the lines are joined back with the newline of
the format in use. Every row remembers the line on which it started.

The parsing itself is done by the line-driven state machine of the
[`dsv-core`](https://docs.rs/dsv-core) crate, which this crate re-exports.
On top of it, this crate provides:

* [`ParseLines`](trait.ParseLines.html), which turns any iterator of lines
  into an iterator of rows, optionally bound to a header row.
* [`Push`](struct.Push.html), a sink to push lines into as they arrive,
  optionally bound to a header row.
* `RowStream`, an asynchronous stream of rows, with the `stream` feature.
  It can be bound to a header row too.
* [`Writer`](struct.Writer.html), which renders rows back into lines that
  parse to the same fields.

# Example

```
use dsv::{Format, ParseLines};

let data = "\
name;note
alice;\"likes
semicolons; a lot\"
bob;
";
let rows = data
    .lines()
    .parse_dsv(Format::new(';'))
    .collect::<dsv::Result<Vec<_>>>()?;
assert_eq!(rows.len(), 3);
assert_eq!(rows[1], ["alice", "likes\nsemicolons; a lot"]);
assert_eq!(rows[2], ["bob", ""]);
assert_eq!(rows[2].line(), 4);
# Ok::<(), dsv::Error>(())
```

# Errors

Parsing fails in only two ways, both reported with the line and column at
which they were detected:

* a closing quote followed by something other than the delimiter or
  whitespace (`Missing delimiter (line #1, col #4).`), and
* a quoted field left open when the input ends
  (`Unclosed quoted field (line #3, col #7).`).

An error ends the parse. The drivers in this crate yield or return it and
then stop.

# Logging

The drivers log through the [`log`](https://docs.rs/log) facade: every row
produced at the `trace` level and every failure at the `debug` level.
Install any `log` implementation to see them.

# Crate features

* `serde` (default): `Row` serializes as a sequence of strings and `Format`
  implements `Serialize` and `Deserialize`.
* `stream`: enables `RowStream`, built on `futures-core`.
*/

#![deny(missing_docs)]

pub use dsv_core::{
    Error, ErrorKind, Format, Parser, ParserBuilder, Result, Row, RowIter,
};

pub use crate::push::Push;
pub use crate::rows::{Headed, ParseLines, Rows};
#[cfg(feature = "stream")]
pub use crate::stream::{HeadedStream, RowStream};
pub use crate::writer::{QuoteStyle, Writer, WriterBuilder};

mod push;
mod rows;
#[cfg(feature = "stream")]
mod stream;
mod writer;
