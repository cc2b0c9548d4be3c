use std::borrow::Cow;

/// The dialect used to split lines into fields.
///
/// A format is an immutable description of the delimiter, the optional
/// quote character, the escape character and the newline that is put back
/// into a quoted field when it continues onto the next line.
///
/// Derived formats are built with the `with_*` methods. Each takes the
/// format by value, so a derivation that doesn't change anything hands back
/// the very same value without copying or allocating. In particular, the
/// default newline is a borrowed `&'static str` and is only replaced when
/// `with_newline` is given a different one.
///
/// No validation is done on the characters chosen. For example, using the
/// same character as delimiter and quote is permitted.
///
/// # Example
///
/// ```
/// use dsv_core::Format;
///
/// let tsv = Format::csv().with_delimiter('\t');
/// assert_eq!(tsv.delimiter(), '\t');
/// assert_eq!(tsv.quote(), Some('"'));
/// assert_eq!(tsv.escape(), '"');
/// assert_eq!(tsv.newline(), Some("\n"));
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Format {
    delimiter: char,
    quote: Option<char>,
    escape: char,
    newline: Option<Cow<'static, str>>,
}

impl Default for Format {
    fn default() -> Format {
        Format::csv()
    }
}

impl Format {
    /// Create a format with the given delimiter.
    ///
    /// The quote and escape characters are both `"`, which means a quote
    /// inside a quoted field is written by doubling it. The newline is
    /// `"\n"`.
    pub const fn new(delimiter: char) -> Format {
        Format {
            delimiter,
            quote: Some('"'),
            escape: '"',
            newline: Some(Cow::Borrowed("\n")),
        }
    }

    /// The comma separated values format.
    pub const fn csv() -> Format {
        Format::new(',')
    }

    /// The comma separated values format with quoting disabled.
    ///
    /// This is equivalent to `Format::csv().unquoted()`.
    pub const fn unquoted_csv() -> Format {
        Format {
            delimiter: ',',
            quote: None,
            escape: '\\',
            newline: Some(Cow::Borrowed("\n")),
        }
    }

    /// The field delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The quote character, or `None` when quoting is disabled.
    pub fn quote(&self) -> Option<char> {
        self.quote
    }

    /// The escape character.
    ///
    /// When this equals the quote character, a doubled quote inside a
    /// quoted field stands for one literal quote. When quoting is disabled,
    /// it makes the character that follows it literal inside an unquoted
    /// field.
    pub fn escape(&self) -> char {
        self.escape
    }

    /// The newline reinserted into a field that spans lines, or `None` when
    /// fields may not span lines.
    pub fn newline(&self) -> Option<&str> {
        self.newline.as_deref()
    }

    /// Returns true if and only if quote and escape are the same character.
    pub fn is_double_quote(&self) -> bool {
        self.quote == Some(self.escape)
    }

    /// Derive a format with the given delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Format {
        self.delimiter = delimiter;
        self
    }

    /// Derive a format with the given quote character. `None` disables
    /// quoting.
    pub fn with_quote(mut self, quote: Option<char>) -> Format {
        self.quote = quote;
        self
    }

    /// Derive a format with the given escape character.
    pub fn with_escape(mut self, escape: char) -> Format {
        self.escape = escape;
        self
    }

    /// Derive a format with the given newline.
    ///
    /// The existing newline is kept (and nothing is allocated) when it is
    /// equal to the one given.
    pub fn with_newline<S>(mut self, newline: S) -> Format
    where
        S: Into<Cow<'static, str>>,
    {
        let newline = newline.into();
        if self.newline() != Some(&*newline) {
            self.newline = Some(newline);
        }
        self
    }

    /// Derive a format in which fields may not span lines.
    ///
    /// A line that ends inside a quoted field is then an error.
    pub fn without_newline(mut self) -> Format {
        self.newline = None;
        self
    }

    /// Derive a format with quoting disabled.
    ///
    /// The escape character becomes `\`, which makes the next character
    /// literal inside an unquoted field. This is how a delimiter is written
    /// as part of a field when there are no quotes to protect it.
    pub fn unquoted(self) -> Format {
        self.with_quote(None).with_escape('\\')
    }
}
