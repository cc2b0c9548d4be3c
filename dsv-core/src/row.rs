use std::fmt;
use std::mem;
use std::ops::{self, Range};

/// A single row of fields, along with the line on which it began.
///
/// A row is produced by a [`Parser`](struct.Parser.html) and is never
/// mutated afterwards. All of its fields are stored contiguously in one
/// allocation, next to the end offset of each field. The number of offsets
/// is exactly the number of fields.
///
/// Indexing a row with a field index that is out of range panics. Use
/// [`get`](#method.get) for a checked lookup.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Row {
    /// All fields in this row, stored contiguously.
    text: Box<str>,
    /// The ending offset of each field. Guaranteed to fall on UTF-8
    /// boundaries.
    ends: Box<[usize]>,
    /// The 1-based line on which the first physical line of the row was
    /// found.
    line: u64,
}

impl Row {
    /// The 1-based line number on which this row began.
    ///
    /// When a quoted field spans several lines, this is the line of the
    /// opening quote's row, not the line on which the row ended.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns the number of fields in this row.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// Returns true if and only if this row has no fields.
    ///
    /// The parser never produces such a row for a line it parses, since
    /// even an empty line yields one empty field.
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Return the field at index `i`.
    ///
    /// If no field at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.bounds(i).map(|range| &self.text[range])
    }

    /// Returns an iterator over all fields in this row.
    pub fn iter(&self) -> RowIter<'_> {
        RowIter { row: self, start: 0, i: 0 }
    }

    /// Copy the fields of this row into a vector of owned strings.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(String::from).collect()
    }

    /// Returns the index of the first field equal to `sought`.
    pub fn position(&self, sought: &str) -> Option<usize> {
        self.position_by(|field| field == sought)
    }

    /// Returns the index of the first field equal to `sought` when ASCII
    /// case is ignored.
    pub fn position_ignore_ascii_case(&self, sought: &str) -> Option<usize> {
        self.position_by(|field| field.eq_ignore_ascii_case(sought))
    }

    /// Returns the index of the first field for which `predicate` holds.
    pub fn position_by<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        self.iter().position(predicate)
    }

    /// Returns the indices of every field for which `predicate` holds, in
    /// ascending order.
    pub fn positions_by<'r, P>(
        &'r self,
        mut predicate: P,
    ) -> impl Iterator<Item = usize> + 'r
    where
        P: FnMut(&str) -> bool + 'r,
    {
        self.iter().enumerate().filter_map(move |(i, field)| {
            if predicate(field) {
                Some(i)
            } else {
                None
            }
        })
    }

    /// Returns the first field, and its index, for which `predicate` holds.
    pub fn find_by<P>(&self, mut predicate: P) -> Option<(usize, &str)>
    where
        P: FnMut(&str) -> bool,
    {
        self.iter().enumerate().find(|&(_, field)| predicate(field))
    }

    /// Returns true if and only if some field is equal to `sought`.
    pub fn contains(&self, sought: &str) -> bool {
        self.position(sought).is_some()
    }

    /// Returns the bounds of field `i`.
    fn bounds(&self, i: usize) -> Option<Range<usize>> {
        let end = match self.ends.get(i) {
            None => return None,
            Some(&end) => end,
        };
        let start = match i.checked_sub(1).and_then(|i| self.ends.get(i)) {
            None => 0,
            Some(&start) => start,
        };
        Some(Range { start, end })
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Row")
            .field("line", &self.line)
            .field("fields", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl ops::Index<usize> for Row {
    type Output = str;

    fn index(&self, i: usize) -> &str {
        match self.get(i) {
            Some(field) => field,
            None => panic!(
                "field index out of bounds: the len is {} but the index is {}",
                self.len(),
                i
            ),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type IntoIter = RowIter<'a>;
    type Item = &'a str;

    fn into_iter(self) -> RowIter<'a> {
        self.iter()
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Row {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<'a, T: AsRef<str>> PartialEq<&'a [T]> for Row {
    fn eq(&self, other: &&'a [T]) -> bool {
        *self == **other
    }
}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Row {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == **other
    }
}

impl<T: AsRef<str>, const N: usize> PartialEq<[T; N]> for Row {
    fn eq(&self, other: &[T; N]) -> bool {
        *self == other[..]
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Row {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// An iterator over the fields in a row.
#[derive(Clone, Debug)]
pub struct RowIter<'a> {
    row: &'a Row,
    start: usize,
    i: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match self.row.ends.get(self.i) {
            None => None,
            Some(&end) => {
                let field = &self.row.text[self.start..end];
                self.start = end;
                self.i += 1;
                Some(field)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.row.len() - self.i;
        (n, Some(n))
    }
}

impl<'a> ExactSizeIterator for RowIter<'a> {}

/// The storage of a row that is still being assembled.
///
/// Field text is appended to one growing string. Committing a field records
/// where it ends. The field currently being built is whatever follows the
/// last recorded end.
#[derive(Clone, Debug, Default)]
pub(crate) struct RowBuffer {
    text: String,
    bounds: Bounds,
}

impl RowBuffer {
    /// Append a character to the field being built.
    #[inline]
    pub(crate) fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Append a run of characters to the field being built.
    #[inline]
    pub(crate) fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Finish the field being built, which may be empty.
    #[inline]
    pub(crate) fn commit(&mut self) {
        self.bounds.add(self.text.len());
    }

    /// Returns true if and only if no field has been committed and no text
    /// is pending.
    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty() && self.bounds.len == 0
    }

    /// Freeze everything committed so far into a row, leaving this buffer
    /// empty and ready for the next one.
    ///
    /// The new buffers are sized after the row just frozen, so that a
    /// stream of similar rows does not keep regrowing them.
    pub(crate) fn freeze(&mut self, line: u64) -> Row {
        let cap = self.text.len();
        let text = mem::replace(&mut self.text, String::with_capacity(cap));
        let ends = self.bounds.take();
        Row { text: text.into_boxed_str(), ends, line }
    }
}

/// The end offsets of the fields committed to a row buffer.
#[derive(Clone, Debug, Default)]
struct Bounds {
    /// The ending index of each field. Only the first `len` are in use.
    ends: Vec<usize>,
    /// The number of fields committed.
    len: usize,
}

impl Bounds {
    /// Expand the capacity for storing field ending positions.
    fn expand(&mut self) {
        let new_len = self.ends.len().saturating_mul(2);
        self.ends.resize(new_len.max(4), 0);
    }

    /// Add a new field with the given ending position.
    fn add(&mut self, pos: usize) {
        if self.len >= self.ends.len() {
            self.expand();
        }
        self.ends[self.len] = pos;
        self.len += 1;
    }

    /// Take the ends in use, trimmed to exactly their number.
    fn take(&mut self) -> Box<[usize]> {
        let len = self.len;
        let mut ends = mem::replace(&mut self.ends, vec![0; len]);
        ends.truncate(len);
        self.len = 0;
        ends.into_boxed_slice()
    }
}
