use std::{
    fs::File,
    io::{
        self,
        BufRead,
        BufReader,
        BufWriter,
        Write,
    },
    path::Path,
};

use zip::{
    write::FileOptions,
    CompressionMethod,
    DateTime,
    ZipWriter,
};

use crate::error::{
    PathContext,
    Result,
};

/// Name ListenBrainz expects for the listens file inside the upload
pub const ARCHIVE_ENTRY: &str = "listens.jsonl";


/// Fixed entry metadata so the same listens always produce the same archive
fn entry_options() -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

/// Packs the file at `listens` into a new zip at `archive` as [`ARCHIVE_ENTRY`]
///
/// # Errors
///
/// Fails if `listens` can't be read or `archive` can't be written.
pub fn package(listens: &Path, archive: &Path) -> Result<()> {
    let mut src = File::open(listens).map(BufReader::new).at(listens)?;
    let out = File::create(archive).map(BufWriter::new).at(archive)?;

    let mut zip = ZipWriter::new(out);
    zip.start_file(ARCHIVE_ENTRY, entry_options()).at(archive)?;
    loop {
        let chunk = src.fill_buf().at(listens)?;
        if chunk.is_empty() {
            break;
        }
        zip.write_all(chunk).at(archive)?;
        let len = chunk.len();
        src.consume(len);
    }
    zip.finish().at(archive)?.into_inner().map_err(io::IntoInnerError::into_error).at(archive)?;
    Ok(())
}
