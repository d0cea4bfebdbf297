//! Flat text persistence: one comma-separated record per line, no header.
//!
//! Books: `id,title,author,category,issued`.
//! Members: `id,name,email,issued_books` with the held ids joined by `;`.
//!
//! Fields are quoted only when they contain a delimiter, quote or newline, so
//! plain records look exactly like the layouts above.

use crate::core::catalog::Catalog;
use crate::core::membership::Membership;
use crate::domain::model::{Book, BookId, Member, MemberId, Snapshot};
use crate::domain::ports::{ConfigProvider, Repository};
use crate::utils::error::{LibraryError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const BOOK_FIELDS: usize = 5;
const ISSUED_SEPARATOR: char = ';';

#[derive(Debug, Clone)]
pub struct FlatFileRepository {
    books_path: PathBuf,
    members_path: PathBuf,
}

#[derive(Serialize)]
struct MemberRow<'a> {
    id: MemberId,
    name: &'a str,
    email: &'a str,
    issued_books: String,
}

impl FlatFileRepository {
    pub fn new(books_path: impl Into<PathBuf>, members_path: impl Into<PathBuf>) -> Self {
        Self {
            books_path: books_path.into(),
            members_path: members_path.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.books_path(), config.members_path())
    }

    pub fn books_path(&self) -> &Path {
        &self.books_path
    }

    pub fn members_path(&self) -> &Path {
        &self.members_path
    }

    fn read_books(&self) -> Result<Vec<Book>> {
        read_records(&self.books_path, |record| {
            if record.len() != BOOK_FIELDS {
                return Err(format!(
                    "expected {} fields, found {}",
                    BOOK_FIELDS,
                    record.len()
                ));
            }
            record
                .deserialize::<Book>(None)
                .map_err(|e| e.to_string())
        })
    }

    fn read_members(&self) -> Result<Vec<Member>> {
        read_records(&self.members_path, parse_member)
    }

    fn write_books(&self, catalog: &Catalog) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(create_file(&self.books_path)?);
        for book in catalog.iter() {
            writer.serialize(book)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_members(&self, membership: &Membership) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(create_file(&self.members_path)?);
        for member in membership.iter() {
            writer.serialize(MemberRow {
                id: member.id,
                name: &member.name,
                email: &member.email,
                issued_books: encode_issued_books(&member.issued_books),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Repository for FlatFileRepository {
    fn load(&self) -> Result<Snapshot> {
        let books = self.read_books()?;
        let members = self.read_members()?;
        tracing::info!(
            "Loaded {} books from {} and {} members from {}",
            books.len(),
            self.books_path.display(),
            members.len(),
            self.members_path.display()
        );
        Ok(Snapshot { books, members })
    }

    fn save(&self, catalog: &Catalog, membership: &Membership) -> Result<()> {
        self.write_books(catalog)?;
        self.write_members(membership)?;
        tracing::debug!(
            "Saved {} books and {} members",
            catalog.len(),
            membership.len()
        );
        Ok(())
    }
}

/// Reads every record of `path`. A missing file reads as empty.
fn read_records<T, F>(path: &Path, mut parse: F) -> Result<Vec<T>>
where
    F: FnMut(&StringRecord) -> std::result::Result<T, String>,
{
    if !path.exists() {
        tracing::info!("{} does not exist yet, starting empty", path.display());
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let item = parse(&record).map_err(|reason| {
            LibraryError::parse(format!("{} line {}: {}", path.display(), line, reason))
        })?;
        items.push(item);
    }
    Ok(items)
}

fn create_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(fs::File::create(path)?)
}

fn parse_member(record: &StringRecord) -> std::result::Result<Member, String> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    if record.len() < 3 {
        return Err(format!("expected 4 fields, found {}", record.len()));
    }

    let id: MemberId = field(0)
        .parse()
        .map_err(|e| format!("invalid member id '{}': {}", field(0), e))?;

    let issued = match record.len() {
        3 => String::new(),
        4 => field(3).to_string(),
        // the older bracketed list was split on its own commas
        _ if field(3).trim_start().starts_with('[') => {
            record.iter().skip(3).collect::<Vec<_>>().join(",")
        }
        n => return Err(format!("expected 4 fields, found {}", n)),
    };

    let mut member = Member::new(id, field(1), field(2));
    member.issued_books = decode_issued_books(&issued)?;
    Ok(member)
}

pub fn encode_issued_books(ids: &[BookId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(&ISSUED_SEPARATOR.to_string())
}

/// Accepts `;`-joined ids, an empty field, or the legacy `[101, 102]` form.
pub fn decode_issued_books(field: &str) -> std::result::Result<Vec<BookId>, String> {
    let trimmed = field.trim();
    let (body, separator) = match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => (inner, ','),
        None => (trimmed, ISSUED_SEPARATOR),
    };

    body.split(separator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            piece
                .parse::<BookId>()
                .map_err(|e| format!("invalid book id '{}' in issued list: {}", piece, e))
        })
        .collect()
}
