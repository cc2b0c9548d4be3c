/*!
`dsv-core` provides the line-driven state machine behind the `dsv` crate.

The parser in this crate never touches I/O. Callers feed it one line at a
time (with the line terminator already stripped) and it hands back a
[`Row`](struct.Row.html) whenever a line completes one. Quoted fields may
span several lines, in which case the configured newline is reinserted into
the field and the row reports the line on which it began.

# Example

```
use dsv_core::{Format, Parser};

let mut parser = Parser::new(Format::csv());
let mut rows = vec![];
for line in "a,\"b\nc\",d\ne,f,g".lines() {
    if let Some(row) = parser.receive_line(line).unwrap() {
        rows.push(row);
    }
}
parser.terminate().unwrap();

assert_eq!(rows.len(), 2);
assert_eq!(rows[0], vec!["a", "b\nc", "d"]);
assert_eq!(rows[0].line(), 1);
assert_eq!(rows[1].line(), 3);
```
*/

#![deny(missing_docs)]

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::format::Format;
pub use crate::parser::{Parser, ParserBuilder};
pub use crate::row::{Row, RowIter};

mod error;
mod format;
mod parser;
mod row;
