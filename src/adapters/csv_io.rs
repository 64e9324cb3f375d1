use crate::config::schema::{ResolvedColumns, SourceSchema};
use crate::domain::model::{MatchOn, Record};
use crate::utils::error::{DedupError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Header handling is done by [`CsvSource`], so the raw reader never consumes one.
pub fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

pub fn writer<W: Write>(output: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(output)
}

pub fn open<P: AsRef<Path>>(path: P) -> Result<csv::Reader<File>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DedupError::unreadable(path.display().to_string(), e))?;
    Ok(reader(file))
}

/// Record stream of one source with its header split off and columns resolved.
pub struct CsvSource<R: Read> {
    pub header: Option<Record>,
    /// `None` for a source with no rows at all.
    pub columns: Option<ResolvedColumns>,
    first: Option<Record>,
    records: csv::StringRecordsIntoIter<R>,
}

impl<R: Read> CsvSource<R> {
    pub fn open(
        reader: csv::Reader<R>,
        schema: &SourceSchema,
        source_name: &str,
        match_on: MatchOn,
    ) -> Result<Self> {
        let mut records = reader.into_records();
        let first = records.next().transpose()?.map(|row| Record::from_csv(&row));

        let (header, first) = match first {
            Some(row) if schema.is_header(&row) => (Some(row), None),
            other => (None, other),
        };

        let columns = if header.is_none() && first.is_none() {
            tracing::debug!("{} source is empty", source_name);
            None
        } else {
            Some(schema.resolve(source_name, header.as_ref(), match_on)?)
        };

        Ok(Self {
            header,
            columns,
            first,
            records,
        })
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.first.take() {
            return Some(Ok(record));
        }
        self.records
            .next()
            .map(|row| row.map(|row| Record::from_csv(&row)).map_err(DedupError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source<'a>(data: &'a str, schema: &SourceSchema) -> CsvSource<&'a [u8]> {
        CsvSource::open(
            reader(data.as_bytes()),
            schema,
            "test",
            MatchOn::DomainUserPassword,
        )
        .unwrap()
    }

    #[test]
    fn header_is_split_off() {
        let mut src = source(
            "name,url,username,password,note\nA,https://x.com,u,p,\n",
            &SourceSchema::target_default(),
        );
        assert_eq!(src.header.as_ref().unwrap().get(1), Some("url"));
        assert_eq!(src.next().unwrap().unwrap().get(0), Some("A"));
        assert!(src.next().is_none());
    }

    #[test]
    fn headerless_first_row_is_data() {
        let src = source("A,https://x.com,u,p,\nB,y.com,v", &SourceSchema::target_default());
        assert!(src.header.is_none());
        let rows: Vec<Record> = src.map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn empty_source_has_no_columns() {
        let mut src = source("", &SourceSchema::reference_default());
        assert!(src.header.is_none());
        assert!(src.columns.is_none());
        assert!(src.next().is_none());
    }

    #[test]
    fn quoted_fields_survive() {
        let mut src = source(
            "\"Acme, Inc\",\"https://x.com\",\"u\",\"p\"\"q\",\"line1\nline2\"\n",
            &SourceSchema::positional(),
        );
        let record = src.next().unwrap().unwrap();
        assert_eq!(record.get(0), Some("Acme, Inc"));
        assert_eq!(record.get(3), Some("p\"q"));
        assert_eq!(record.get(4), Some("line1\nline2"));
    }

    #[test]
    fn writer_uses_newline_terminator() {
        let mut bytes = Vec::new();
        {
            let mut out = writer(&mut bytes);
            out.write_record(["a", "b,c"]).unwrap();
            out.write_record(["d"]).unwrap();
            out.flush().unwrap();
        }
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,\"b,c\"\nd\n");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = open("/nonexistent/export.csv").err().unwrap();
        assert!(matches!(err, DedupError::UnreadableFile { .. }));
    }
}
