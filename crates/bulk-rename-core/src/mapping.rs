//! Name mapping tables (old name -> new name)

use crate::error::MappingError;
use crate::sanitize::sanitize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Ordered (old_name, new_name) pairs as they appear in the source table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    entries: Vec<(String, String)>,
}

impl NameMapping {
    /// Create an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from in-memory pairs, keeping their order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }

    /// Load a headerless two-column CSV file
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, a row is malformed,
    /// or the table has no rows
    pub fn from_csv_path(path: &Path) -> Result<Self, MappingError> {
        let file = File::open(path).map_err(|source| MappingError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load a headerless two-column CSV table from any reader
    ///
    /// # Errors
    /// Returns an error if a row is malformed or the table has no rows
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MappingError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut mapping = Self::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);

            if record.len() != 2 {
                return Err(MappingError::ColumnCount {
                    line,
                    found: record.len(),
                });
            }

            check_new_name(line, &record[0], &record[1])?;
            mapping.push(&record[0], &record[1]);
        }

        if mapping.is_empty() {
            return Err(MappingError::Empty);
        }

        Ok(mapping)
    }

    /// Check that the table has rows and every new name stays a plain name
    ///
    /// Rows are numbered from 1 in source order.
    ///
    /// # Errors
    /// Returns the first problem found
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.entries.is_empty() {
            return Err(MappingError::Empty);
        }
        for (row, (old_name, new_name)) in (1u64..).zip(&self.entries) {
            check_new_name(row, old_name, new_name)?;
        }
        Ok(())
    }

    /// Append a pair
    pub fn push(&mut self, old_name: impl Into<String>, new_name: impl Into<String>) {
        self.entries.push((old_name.into(), new_name.into()));
    }

    /// Pairs in source order
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the lookup used during traversal
    ///
    /// New names are sanitized. When an old name appears more than once the
    /// last row wins.
    #[must_use]
    pub fn lookup(&self) -> MappingLookup {
        let mut map = HashMap::with_capacity(self.entries.len());
        for (old_name, new_name) in &self.entries {
            map.insert(old_name.clone(), sanitize(new_name));
        }
        MappingLookup { map }
    }
}

/// Reject new names that would not name an entry inside the same parent
fn check_new_name(line: u64, old_name: &str, new_name: &str) -> Result<(), MappingError> {
    if matches!(new_name, "" | "." | "..") {
        return Err(MappingError::InvalidNewName {
            line,
            old_name: old_name.to_string(),
            name: new_name.to_string(),
        });
    }
    Ok(())
}

/// Exact-match lookup from old name to sanitized new name
#[derive(Debug, Clone, Default)]
pub struct MappingLookup {
    map: HashMap<String, String>,
}

impl MappingLookup {
    /// Sanitized replacement for `old_name`, if mapped
    #[must_use]
    pub fn get(&self, old_name: &str) -> Option<&str> {
        self.map.get(old_name).map(String::as_str)
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mapping = NameMapping::from_pairs([("A", "B"), ("X", "Y"), ("A", "C")]);
        let lookup = mapping.lookup();
        assert_eq!(lookup.get("A"), Some("C"));
        assert_eq!(lookup.get("X"), Some("Y"));
        assert_eq!(lookup.len(), 2);
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_lookup_sanitizes_new_names() {
        let mapping = NameMapping::from_pairs([("draft", "Q1/Q2: plan?")]);
        assert_eq!(mapping.lookup().get("draft"), Some("Q1_Q2_ plan_"));
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let lookup = NameMapping::from_pairs([("Report", "Summary")]).lookup();
        assert_eq!(lookup.get("report"), None);
        assert_eq!(lookup.get("Report "), None);
        assert_eq!(lookup.get("Report"), Some("Summary"));
    }

    #[test]
    fn test_from_reader_parses_rows_in_order() {
        let data = "old1,new1\nold2,new2\n\n\"with,comma\",quoted\n";
        let mapping = NameMapping::from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            mapping.entries(),
            &[
                ("old1".to_string(), "new1".to_string()),
                ("old2".to_string(), "new2".to_string()),
                ("with,comma".to_string(), "quoted".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_reader_keeps_first_row() {
        // No header row: the first line is data.
        let mapping = NameMapping::from_reader("old_name,new_name\n".as_bytes()).unwrap();
        assert_eq!(mapping.lookup().get("old_name"), Some("new_name"));
    }

    #[test]
    fn test_from_reader_rejects_empty_table() {
        let result = NameMapping::from_reader("".as_bytes());
        assert!(matches!(result, Err(MappingError::Empty)));
    }

    #[test]
    fn test_from_reader_rejects_wrong_column_count() {
        let result = NameMapping::from_reader("a,b\nc\n".as_bytes());
        match result {
            Err(MappingError::ColumnCount { line, found }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let result = NameMapping::from_reader("a,b,c\n".as_bytes());
        assert!(matches!(
            result,
            Err(MappingError::ColumnCount { found: 3, .. })
        ));
    }

    #[test]
    fn test_from_reader_rejects_unusable_new_names() {
        for bad in ["a,\n", "a,.\n", "a,..\n"] {
            let result = NameMapping::from_reader(bad.as_bytes());
            assert!(
                matches!(result, Err(MappingError::InvalidNewName { line: 1, .. })),
                "input: {bad:?}"
            );
        }
    }

    #[test]
    fn test_validate_catches_in_memory_pairs() {
        for bad in ["", ".", ".."] {
            let mapping = NameMapping::from_pairs([("ok", "fine"), ("x", bad)]);
            match mapping.validate() {
                Err(MappingError::InvalidNewName { line, old_name, name }) => {
                    assert_eq!(line, 2);
                    assert_eq!(old_name, "x");
                    assert_eq!(name, bad);
                }
                other => panic!("unexpected result for {bad:?}: {other:?}"),
            }
        }

        let mut mapping = NameMapping::new();
        assert!(matches!(mapping.validate(), Err(MappingError::Empty)));
        mapping.push("draft", "final");
        assert!(mapping.validate().is_ok());
    }

    #[test]
    fn test_from_csv_path_missing_file() {
        let result = NameMapping::from_csv_path(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(MappingError::Open { .. })));
    }
}
