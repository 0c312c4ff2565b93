use crate::record::CanonicalRecord;
use anyhow::{Result, anyhow};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const COLUMNS: [&str; 9] = [
    "deviceID",
    "deviceType",
    "timestamp",
    "country",
    "city",
    "area",
    "factory",
    "section",
    "data",
];

pub enum Writer {
    Stdout(Box<dyn Write + Send>),
    JsonFile(BufWriter<File>, bool), // bool tracks if we've written the opening bracket
    JsonlFile(BufWriter<File>),
    CsvFile(BufWriter<File>, bool), // bool tracks if we've written headers
    TsvFile(BufWriter<File>, bool),
}

impl Writer {
    pub fn write_batch(&mut self, records: &[CanonicalRecord]) -> Result<()> {
        match self {
            Writer::Stdout(writer) => {
                for record in records {
                    writeln!(writer, "{}", serde_json::to_string_pretty(record)?)?;
                }
            }
            Writer::JsonFile(writer, is_first) => {
                for record in records {
                    if *is_first {
                        write!(writer, "[")?;
                        *is_first = false;
                    } else {
                        write!(writer, ",")?;
                    }
                    let serialized = serde_json::to_string_pretty(record)?;
                    write!(writer, "\n{}", serialized)?;
                }
            }
            Writer::JsonlFile(writer) => {
                for record in records {
                    let serialized = serde_json::to_string(record)?;
                    writeln!(writer, "{}", serialized)?;
                }
            }
            Writer::CsvFile(writer, headers_written) => {
                if !*headers_written {
                    writeln!(writer, "{}", COLUMNS.join(","))?;
                    *headers_written = true;
                }
                for record in records {
                    let row: Vec<String> = row_fields(record)?
                        .iter()
                        .map(|f| escape_csv_field(f))
                        .collect();
                    writeln!(writer, "{}", row.join(","))?;
                }
            }
            Writer::TsvFile(writer, headers_written) => {
                if !*headers_written {
                    writeln!(writer, "{}", COLUMNS.join("\t"))?;
                    *headers_written = true;
                }
                for record in records {
                    let row: Vec<String> = row_fields(record)?
                        .iter()
                        .map(|f| escape_tsv_field(f))
                        .collect();
                    writeln!(writer, "{}", row.join("\t"))?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        match self {
            Writer::JsonFile(ref mut writer, is_first) => {
                // an empty run still produces a valid array
                if is_first {
                    write!(writer, "[")?;
                }
                writeln!(writer, "\n]")?;
                writer.flush()?;
            }
            Writer::JsonlFile(ref mut writer)
            | Writer::CsvFile(ref mut writer, _)
            | Writer::TsvFile(ref mut writer, _) => {
                writer.flush()?;
            }
            Writer::Stdout(ref mut writer) => {
                writer.flush()?;
            }
        }
        Ok(())
    }
}

pub fn create_writer(output_arg: &str) -> Result<Writer> {
    match output_arg {
        "stdout" | "json" => Ok(Writer::Stdout(Box::new(io::stdout()))),
        path if path.ends_with(".json") => Ok(Writer::JsonFile(open(path)?, true)),
        path if path.ends_with(".jsonl") || path.ends_with(".ndjson") => {
            Ok(Writer::JsonlFile(open(path)?))
        }
        path if path.ends_with(".csv") => Ok(Writer::CsvFile(open(path)?, false)),
        path if path.ends_with(".tsv") => Ok(Writer::TsvFile(open(path)?, false)),
        path => {
            // Default to JSON file if it looks like a path
            if path.contains('/') || path.contains('\\') || path.contains('.') {
                Ok(Writer::JsonFile(open(path)?, true))
            } else {
                Err(anyhow!(
                    "Unknown output format: {}. Use 'stdout', 'json', or a file path",
                    output_arg
                ))
            }
        }
    }
}

fn open(path: &str) -> Result<BufWriter<File>> {
    create_parent_dirs(path)?;
    Ok(BufWriter::new(File::create(path)?))
}

fn create_parent_dirs(file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn row_fields(record: &CanonicalRecord) -> Result<Vec<String>> {
    let mut fields = Vec::with_capacity(COLUMNS.len());
    fields.push(record.device_id.clone());
    fields.push(record.device_type.clone());
    fields.push(record.timestamp.to_string());
    fields.extend(record.location.parts().iter().map(|p| p.to_string()));
    fields.push(serde_json::to_string(&record.data)?);
    Ok(fields)
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn escape_tsv_field(field: &str) -> String {
    field
        .replace('\t', " ")
        .replace('\n', " ")
        .replace('\r', " ")
}
