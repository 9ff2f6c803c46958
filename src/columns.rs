//! Column selection: which fields to keep, in which order.

use csv::StringRecord;

use crate::error::ExtractError;

/// A requested column, by position or by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    Index(usize),
    Name(String),
}

impl ColumnSpec {
    /// Interpret raw command-line columns as names (`named`) or indices.
    pub fn parse_all<S: AsRef<str>>(raw: &[S], named: bool) -> Result<Vec<Self>, ExtractError> {
        raw.iter()
            .map(|s| {
                let s = s.as_ref();
                if named {
                    Ok(ColumnSpec::Name(s.to_string()))
                } else {
                    s.trim()
                        .parse()
                        .map(ColumnSpec::Index)
                        .map_err(|_| ExtractError::NotAnIndex(s.to_string()))
                }
            })
            .collect()
    }
}

/// A column resolved against the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub index: usize,
}

/// The ordered list of columns to copy from each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    columns: Vec<Column>,
    max_index: usize,
}

impl Projection {
    /// Resolve `specs` against `header`.
    ///
    /// Every unknown name is reported at once; a name that appears more than
    /// once in the header resolves to its first occurrence.
    pub fn resolve(specs: &[ColumnSpec], header: &StringRecord) -> Result<Self, ExtractError> {
        if specs.is_empty() {
            return Err(ExtractError::NoColumns);
        }

        let mut columns = Vec::with_capacity(specs.len());
        let mut missing = Vec::new();

        for spec in specs {
            match spec {
                ColumnSpec::Name(name) => match header.iter().position(|h| h == name) {
                    Some(index) => columns.push(Column {
                        name: name.clone(),
                        index,
                    }),
                    None => missing.push(name.clone()),
                },
                ColumnSpec::Index(index) => {
                    let name = header.get(*index).ok_or(ExtractError::ColumnOutOfRange {
                        index: *index,
                        width: header.len(),
                    })?;
                    columns.push(Column {
                        name: name.to_string(),
                        index: *index,
                    });
                }
            }
        }

        if !missing.is_empty() {
            return Err(ExtractError::MissingColumns {
                requested: specs.len(),
                missing,
            });
        }

        let max_index = columns.iter().map(|c| c.index).max().unwrap_or(0);
        Ok(Self { columns, max_index })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Highest field index any column reads.
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// The selected fields of `record`, or `None` if it is too short.
    pub fn project<'r>(&self, record: &'r StringRecord) -> Option<Vec<&'r str>> {
        self.columns.iter().map(|c| record.get(c.index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> StringRecord {
        StringRecord::from(vec!["id", "name", "dept", "salary"])
    }

    #[test]
    fn test_parse_indices() {
        let specs = ColumnSpec::parse_all(&["3", " 0"], false).unwrap();
        assert_eq!(specs, vec![ColumnSpec::Index(3), ColumnSpec::Index(0)]);
    }

    #[test]
    fn test_parse_rejects_non_index() {
        let err = ColumnSpec::parse_all(&["1", "name"], false).unwrap_err();
        assert!(matches!(err, ExtractError::NotAnIndex(ref s) if s == "name"));
    }

    #[test]
    fn test_parse_names() {
        let specs = ColumnSpec::parse_all(&["7"], true).unwrap();
        assert_eq!(specs, vec![ColumnSpec::Name("7".to_string())]);
    }

    #[test]
    fn test_resolve_by_index_reorders() {
        let projection =
            Projection::resolve(&[ColumnSpec::Index(3), ColumnSpec::Index(1)], &header()).unwrap();
        assert_eq!(projection.names().collect::<Vec<_>>(), vec!["salary", "name"]);
        assert_eq!(projection.max_index(), 3);
    }

    #[test]
    fn test_resolve_by_name() {
        let specs = ColumnSpec::parse_all(&["dept", "id"], true).unwrap();
        let projection = Projection::resolve(&specs, &header()).unwrap();
        assert_eq!(
            projection.columns(),
            &[
                Column {
                    name: "dept".to_string(),
                    index: 2
                },
                Column {
                    name: "id".to_string(),
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn test_resolve_reports_all_missing_names() {
        let specs = ColumnSpec::parse_all(&["dept", "age", "email"], true).unwrap();
        match Projection::resolve(&specs, &header()) {
            Err(ExtractError::MissingColumns { requested, missing }) => {
                assert_eq!(requested, 3);
                assert_eq!(missing, vec!["age", "email"]);
            }
            other => panic!("Expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_index_out_of_range() {
        let err = Projection::resolve(&[ColumnSpec::Index(4)], &header()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::ColumnOutOfRange { index: 4, width: 4 }
        ));
    }

    #[test]
    fn test_resolve_requires_columns() {
        let err = Projection::resolve(&[], &header()).unwrap_err();
        assert!(matches!(err, ExtractError::NoColumns));
    }

    #[test]
    fn test_project() {
        let projection =
            Projection::resolve(&[ColumnSpec::Index(2), ColumnSpec::Index(0)], &header()).unwrap();
        let row = StringRecord::from(vec!["1", "Smith", "Sales", "500"]);
        assert_eq!(projection.project(&row), Some(vec!["Sales", "1"]));
        let short = StringRecord::from(vec!["1", "Smith"]);
        assert_eq!(projection.project(&short), None);
    }
}
