//! Chat log as a two-column CSV (`Role,Message`)

use super::{ChatLogStore, StorageError, StorageResult};
use crate::state_machine::{ExportedMessage, Message, Role};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CHAT_CSV_HEADER: &str = "Role,Message";

/// Chat log stored at a fixed path
#[derive(Debug, Clone)]
pub struct CsvChatLog {
    path: PathBuf,
}

impl CsvChatLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChatLogStore for CsvChatLog {
    async fn save(&self, messages: &[Message]) -> StorageResult<()> {
        let rows: Vec<ExportedMessage> = messages.iter().map(ExportedMessage::from).collect();
        let body = encode_chat_csv(&rows);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Write beside the target and rename so readers never see half a file
        let tmp = self.path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn load(&self) -> StorageResult<Vec<(Role, String)>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(body) => decode_chat_csv(&body),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self) -> StorageResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Quote a field when it holds a delimiter, quote or line break
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render messages as the downloadable CSV
pub fn encode_chat_csv(rows: &[ExportedMessage]) -> String {
    let mut out = String::from(CHAT_CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(row.role.as_str());
        out.push(',');
        out.push_str(&escape_csv_field(&row.text));
        out.push('\n');
    }
    out
}

/// Split CSV text into records, honouring quoted fields that span lines
fn parse_records(body: &str) -> StorageResult<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut record)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(StorageError::MalformedCsv {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push((record_line, record));
    }
    Ok(records)
}

/// Parse a stored chat log back into (role, text) pairs
pub fn decode_chat_csv(body: &str) -> StorageResult<Vec<(Role, String)>> {
    let mut records = parse_records(body)?.into_iter();

    match records.next() {
        None => return Ok(Vec::new()),
        Some((_, header)) if header.len() == 2 && header[0] == "Role" && header[1] == "Message" => {}
        Some((line, header)) => {
            return Err(StorageError::MalformedCsv {
                line,
                reason: format!("unexpected header {header:?}"),
            })
        }
    }

    records
        .filter(|(_, fields)| !(fields.len() == 1 && fields[0].is_empty()))
        .map(|(line, fields)| {
            let [role, text]: [String; 2] =
                fields.try_into().map_err(|fields: Vec<String>| StorageError::MalformedCsv {
                    line,
                    reason: format!("expected 2 fields, found {}", fields.len()),
                })?;
            let role = Role::from_label(&role).ok_or_else(|| StorageError::MalformedCsv {
                line,
                reason: format!("unknown role {role:?}"),
            })?;
            Ok((role, text))
        })
        .collect()
}
