use tracing::Level;

/// Shape of the rows returned by [`execute`](crate::execute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFormat {
    /// One [`Record`](crate::Record) per row (column name → value).
    #[default]
    Rows,
    /// A header of column names plus one value array per row. Smaller, and good for exports.
    Columns,
}

/// Options for one statement execution.
///
/// By default nothing is logged and rows come back as records.
///
/// ```ignore
/// let opts = ExecOptions::new().verbose(true).format(RowFormat::Columns);
/// ```
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Emit the SQL as a tracing event (target `qx.sql`) before executing it.
    pub verbose: bool,
    /// Row shape of the result.
    pub format: RowFormat,
    /// Tracing event level for verbose output.
    pub log_level: Level,
    /// Truncate logged SQL longer than this many bytes. `None` logs it whole.
    pub max_sql_length: Option<usize>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            format: RowFormat::Rows,
            log_level: Level::INFO,
            max_sql_length: None,
        }
    }
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the SQL before executing it.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn format(mut self, format: RowFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the tracing level used for verbose output.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set the maximum logged SQL length.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}
