//! JSON serialization of the crawl results
//!
//! Documents are pretty-printed with two-space indentation, fields in
//! declaration order, and a trailing newline. Empty sequences are written as
//! `[]`.

use crate::catalog::{Book, Catalog, Person};
use crate::config::OutputConfig;
use crate::CrawlerError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output files, created before the crawl starts
///
/// Creating them up front means an unwritable path aborts the run before any
/// network traffic happens.
#[derive(Debug)]
pub struct JsonOutput {
    people_path: PathBuf,
    people: File,
    books_path: PathBuf,
    books: File,
}

impl JsonOutput {
    /// Creates (truncates) both output files
    pub fn create(config: &OutputConfig) -> Result<Self, CrawlerError> {
        let people_path = PathBuf::from(&config.people_path);
        let books_path = PathBuf::from(&config.books_path);

        Ok(Self {
            people: create_file(&people_path)?,
            people_path,
            books: create_file(&books_path)?,
            books_path,
        })
    }

    /// Writes the catalog and closes both files
    pub fn write(self, catalog: &Catalog) -> Result<(), CrawlerError> {
        write_json(BufWriter::new(self.people), catalog.people())?;
        tracing::info!(
            "Wrote {} people to {}",
            catalog.people().len(),
            self.people_path.display()
        );

        write_json(BufWriter::new(self.books), catalog.books().as_map())?;
        tracing::info!(
            "Wrote {} books to {}",
            catalog.books().len(),
            self.books_path.display()
        );

        Ok(())
    }
}

fn create_file(path: &Path) -> Result<File, CrawlerError> {
    let create_error = |source| CrawlerError::CreateOutput {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(create_error)?;
    }

    File::create(path).map_err(create_error)
}

/// Writes `value` as two-space indented JSON followed by a newline
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
) -> Result<(), CrawlerError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads previously written `people.json` / `books.json` back into a catalog
pub fn read_catalog(people_path: &Path, books_path: &Path) -> Result<Catalog, CrawlerError> {
    let people: Vec<Person> = serde_json::from_reader(BufReader::new(File::open(people_path)?))?;
    let books: BTreeMap<String, Book> =
        serde_json::from_reader(BufReader::new(File::open(books_path)?))?;

    Ok(Catalog::from_parts(people, books))
}
