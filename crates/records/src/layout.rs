use crate::error::{Error, Result};
use crate::number::{float_field, integer_field, split_column};

/// Kind of value expected in a fixed-width column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Real number, Fortran `G`/`E` style
    Float,
    /// Whole number, Fortran `I` style
    Integer,
}

/// A single decoded field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    /// Value from a [FieldKind::Float] column
    Float(f64),
    /// Value from a [FieldKind::Integer] column
    Integer(i64),
}

impl Field {
    /// Numeric value as a float, whatever the column kind
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Float(v) => *v,
            Self::Integer(v) => *v as f64,
        }
    }

    /// Numeric value as an integer, truncating real values
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Float(v) => *v as i64,
            Self::Integer(v) => *v,
        }
    }
}

/// Column layout of a fixed-width record
///
/// Columns are read left to right with no delimiters. Anything past the total
/// width of the layout is ignored.
///
/// | Layout      | Columns                                   | Width |
/// | ----------- | ----------------------------------------- | ----- |
/// | [CONTROL]   | `2F11, 4I11, I4, I2, I3, I5`              | 80    |
/// | [VALUES]    | `6F11`                                    | 66    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    columns: &'static [(usize, FieldKind)],
}

/// Header layout shared by section and spectrum control records
pub const CONTROL: Layout = Layout::new(&[
    (11, FieldKind::Float),
    (11, FieldKind::Float),
    (11, FieldKind::Integer),
    (11, FieldKind::Integer),
    (11, FieldKind::Integer),
    (11, FieldKind::Integer),
    (4, FieldKind::Integer),
    (2, FieldKind::Integer),
    (3, FieldKind::Integer),
    (5, FieldKind::Integer),
]);

/// Six real values per line, used for every data block
pub const VALUES: Layout = Layout::new(&[(11, FieldKind::Float); 6]);

impl Layout {
    /// Declare a layout from `(width, kind)` pairs
    pub const fn new(columns: &'static [(usize, FieldKind)]) -> Self {
        Self { columns }
    }

    /// Total number of columns a line needs to satisfy the layout
    pub const fn width(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.columns.len() {
            total += self.columns[i].0;
            i += 1;
        }
        total
    }

    /// Number of fields produced per line
    pub(crate) const fn len(&self) -> usize {
        self.columns.len()
    }

    /// Decode one physical line into its fields
    ///
    /// ```rust
    /// # use nucov_records::{Field, VALUES};
    /// let line = " 1.390000-4 1.000000+0 2.000000+1 1.000000+3 1.000000+6 1.700000+7";
    /// let fields = VALUES.decode(line).unwrap();
    /// assert_eq!(fields[0], Field::Float(1.39e-4));
    /// assert_eq!(fields[5], Field::Float(1.7e7));
    /// ```
    pub fn decode(&self, line: &str) -> Result<Vec<Field>> {
        let required = self.width();
        if line.len() < required {
            return Err(Error::LineTooShort {
                line: line.to_string(),
                length: line.len(),
                required,
            });
        }

        let mut rest = line;
        let mut fields = Vec::with_capacity(self.len());

        for (index, (width, kind)) in self.columns.iter().enumerate() {
            let invalid = |content: &str| Error::InvalidField {
                line: line.to_string(),
                field: index,
                content: content.to_string(),
            };

            let (remainder, column) = split_column(rest, *width).map_err(|_| invalid(rest))?;
            rest = remainder;

            let field = match kind {
                FieldKind::Float => float_field(column).map(Field::Float),
                FieldKind::Integer => integer_field(column).map(Field::Integer),
            };
            fields.push(field.ok_or_else(|| invalid(column))?);
        }

        Ok(fields)
    }

    /// Decode one physical line, keeping every field as a float
    pub fn decode_f64(&self, line: &str) -> Result<Vec<f64>> {
        Ok(self.decode(line)?.iter().map(Field::as_f64).collect())
    }
}
