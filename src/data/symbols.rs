//! Stock symbol reference table and the interactive symbol prompt

use serde::Deserialize;
use std::io::{BufRead, Read, Write};
use std::path::Path;

use crate::error::{AdvisorError, Result};

/// One (ticker, company name) pair from the reference table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymbolRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Read-only table of known symbols
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: Vec<SymbolRecord>,
}

impl SymbolTable {
    /// Load the table from a CSV file with `Symbol` and `Name` columns
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            AdvisorError::SymbolTable(format!("cannot open {}: {}", path.as_ref().display(), e))
        })?;
        let table = Self::from_reader(file)?;
        log::info!(
            "Loaded {} symbols from {}",
            table.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    /// Parse the table from any CSV source; extra columns are ignored
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let records = csv_reader
            .deserialize::<SymbolRecord>()
            .enumerate()
            .map(|(i, row)| {
                row.map_err(|e| AdvisorError::SymbolTable(format!("row {}: {}", i + 1, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records })
    }

    /// Build a table from records already in memory
    pub fn from_records(records: Vec<SymbolRecord>) -> Self {
        Self { records }
    }

    /// Find the record for a user-entered symbol
    ///
    /// Input is trimmed and uppercased, then matched exactly.
    pub fn lookup(&self, input: &str) -> Option<&SymbolRecord> {
        let wanted = input.trim().to_uppercase();
        if wanted.is_empty() {
            return None;
        }
        self.records.iter().find(|r| r.symbol == wanted)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Prompts for a symbol until it matches the table
pub struct SymbolResolver<'a> {
    table: &'a SymbolTable,
    max_attempts: u32,
}

impl<'a> SymbolResolver<'a> {
    pub const PROMPT: &'static str = "Enter a stock symbol to retrieve data from: ";

    pub fn new(table: &'a SymbolTable, max_attempts: u32) -> Self {
        Self {
            table,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Resolve a symbol given up front, without prompting
    pub fn resolve_symbol(&self, symbol: &str) -> Result<SymbolRecord> {
        self.table
            .lookup(symbol)
            .cloned()
            .ok_or(AdvisorError::SymbolNotFound { attempts: 1 })
    }

    /// Prompt on `output` and read answers from `input`
    ///
    /// End of input or `q`/`quit` cancels. Each unknown symbol, blank line
    /// included, uses up one attempt.
    pub fn resolve<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<SymbolRecord> {
        let mut line = String::new();

        for attempt in 1..=self.max_attempts {
            write!(output, "{}", Self::PROMPT)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Err(AdvisorError::Cancelled);
            }

            let answer = line.trim();
            if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
                return Err(AdvisorError::Cancelled);
            }

            if let Some(record) = self.table.lookup(answer) {
                log::debug!("Resolved {} to {} on attempt {}", record.symbol, record.name, attempt);
                return Ok(record.clone());
            }

            if attempt < self.max_attempts {
                writeln!(
                    output,
                    "Unknown symbol '{}' ({} attempt(s) left, 'q' to quit)",
                    answer.to_uppercase(),
                    self.max_attempts - attempt
                )?;
            }
        }

        Err(AdvisorError::SymbolNotFound {
            attempts: self.max_attempts,
        })
    }
}
