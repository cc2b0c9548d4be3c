use std::fmt;

use dsv_core::Format;

/// The quoting style to use when writing rows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuoteStyle {
    /// This puts quotes around every field. Always.
    ///
    /// A format with quoting disabled falls back to escaping.
    Always,
    /// This puts quotes around fields only when necessary.
    ///
    /// They are necessary when fields contain a quote, a delimiter or a
    /// line break.
    ///
    /// This is the default.
    Necessary,
}

impl Default for QuoteStyle {
    fn default() -> QuoteStyle {
        QuoteStyle::Necessary
    }
}

/// Builds a writer with various configuration knobs.
#[derive(Clone, Debug, Default)]
pub struct WriterBuilder {
    wtr: Writer,
}

impl WriterBuilder {
    /// Create a new builder for writing CSV.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a writer from this configuration.
    pub fn build(&self) -> Writer {
        self.wtr.clone()
    }

    /// The format to write in.
    ///
    /// The default is `Format::csv()`.
    pub fn format(&mut self, format: Format) -> &mut WriterBuilder {
        self.wtr.format = format;
        self
    }

    /// The quoting style to use when writing.
    ///
    /// By default, this is set to `QuoteStyle::Necessary`, which will only
    /// use quotes when they are necessary to preserve the integrity of data.
    pub fn quote_style(&mut self, style: QuoteStyle) -> &mut WriterBuilder {
        self.wtr.style = style;
        self
    }
}

/// Renders rows as lines of delimiter-separated values.
///
/// The output of a writer reads back to the same fields through a parser
/// in the same format, as long as the lines it writes are split on the
/// format's newline. Fields that contain a line break come out spanning
/// several lines.
///
/// A writer never writes line terminators after a row. Note that a row
/// without fields can't be written, since an empty line reads back as one
/// empty field.
///
/// # Example
///
/// ```
/// use dsv::Writer;
///
/// let wtr = Writer::default();
/// let row = wtr.row_to_string(&["a", "b,c", "say \"hi\""]);
/// assert_eq!(row, r#"a,"b,c","say ""hi""""#);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Writer {
    format: Format,
    style: QuoteStyle,
}

impl Writer {
    /// Create a writer for the given format that quotes only where needed.
    pub fn new(format: Format) -> Writer {
        Writer { format, style: QuoteStyle::default() }
    }

    /// The format this writer writes in.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Write a single field.
    pub fn write_field<W: fmt::Write>(
        &self,
        mut wtr: W,
        field: &str,
    ) -> fmt::Result {
        let quote = match self.format.quote() {
            None => return self.write_escaped(wtr, field),
            Some(quote) => quote,
        };
        if !self.should_quote(field) {
            return wtr.write_str(field);
        }
        let escape = self.format.escape();
        wtr.write_char(quote)?;
        let mut rest = field;
        while let Some(i) = rest.find(|c: char| c == quote || c == escape) {
            let (literal, tail) = rest.split_at(i);
            wtr.write_str(literal)?;
            let mut chars = tail.chars();
            // Both quote and escape are written as escape + character. For
            // a doubling format that is the quote twice.
            if let Some(ch) = chars.next() {
                wtr.write_char(escape)?;
                wtr.write_char(ch)?;
            }
            rest = chars.as_str();
        }
        wtr.write_str(rest)?;
        wtr.write_char(quote)
    }

    /// Write the given fields as one row, separated by the delimiter.
    pub fn write_row<W, I, T>(&self, mut wtr: W, fields: I) -> fmt::Result
    where
        W: fmt::Write,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                wtr.write_char(self.format.delimiter())?;
            }
            self.write_field(&mut wtr, field.as_ref())?;
        }
        Ok(())
    }

    /// Render the given fields as one row.
    pub fn row_to_string<I, T>(&self, fields: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut out = String::new();
        // Writing to a `String` never fails.
        let _ = self.write_row(&mut out, fields);
        out
    }

    fn should_quote(&self, field: &str) -> bool {
        match self.style {
            QuoteStyle::Always => true,
            QuoteStyle::Necessary => {
                field.chars().any(|c| self.needs_quotes(c))
            }
        }
    }

    fn needs_quotes(&self, c: char) -> bool {
        c == self.format.delimiter()
            || Some(c) == self.format.quote()
            || c == '\r'
            || c == '\n'
            || self.format.newline().map_or(false, |nl| nl.contains(c))
    }

    /// Write a field for a format with quoting disabled, prefixing every
    /// character that would otherwise end the field with the escape.
    fn write_escaped<W: fmt::Write>(
        &self,
        mut wtr: W,
        field: &str,
    ) -> fmt::Result {
        let delimiter = self.format.delimiter();
        let escape = self.format.escape();
        let newline = self.format.newline().unwrap_or("");
        for ch in field.chars() {
            if ch == delimiter
                || ch == escape
                || ch == '\r'
                || ch == '\n'
                || newline.contains(ch)
            {
                wtr.write_char(escape)?;
            }
            wtr.write_char(ch)?;
        }
        Ok(())
    }
}
