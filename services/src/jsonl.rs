use std::{
    fs::File,
    io::{
        self,
        BufWriter,
        Write,
    },
    path::Path,
};

use lb_convert_core::{
    Listen,
    ListenData,
};
use serde::Serialize;
use serde_json::ser::{
    Formatter,
    Serializer,
};

use crate::error::{
    Error,
    PathContext,
    Result,
};


/// Single line output with a space after `,` and `:`, e.g. `{"a": 1, "b": [1, 2]}`
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    #[inline]
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    #[inline]
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    #[inline]
    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}


/// Serializes one listen as a newline terminated line
pub fn write_line<W, L>(writer: &mut W, listen: &L) -> io::Result<()>
where
    W: Write,
    L: ListenData + ?Sized,
{
    let mut ser = Serializer::with_formatter(&mut *writer, SpacedFormatter);
    Listen::from(listen).serialize(&mut ser).map_err(io::Error::from)?;
    writer.write_all(b"\n")
}

/// Writes every listen to `path` in order, replacing any existing file
///
/// # Errors
///
/// Fails if the file can't be created or written to.
pub fn write_listens<'l, L, I>(path: &Path, listens: I) -> Result<usize>
where
    L: ListenData + 'l,
    I: IntoIterator<Item = &'l L>,
{
    let mut out = File::create(path).map(BufWriter::new).at(path)?;
    let mut written = 0usize;
    for listen in listens {
        write_line(&mut out, listen).at(path)?;
        written += 1;
    }
    out.into_inner().map_err(|e| Error::Io {
        path: path.to_owned(),
        source: e.into_error(),
    })?;
    Ok(written)
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Play(i64, &'static str, &'static str, Option<&'static str>);

    impl ListenData for Play {
        fn listened_at(&self) -> i64 { self.0 }

        fn track_name(&self) -> &str { self.1 }

        fn artist_name(&self) -> &str { self.2 }

        fn release_name(&self) -> Option<&str> { self.3 }
    }

    fn line(play: &Play) -> String {
        let mut buf = Vec::new();
        write_line(&mut buf, play).expect("Failed to write line");
        String::from_utf8(buf).expect("Output is not utf-8")
    }

    #[test]
    fn test_line_layout() {
        assert_eq!(
            line(&Play(1000, "Song A", "Artist A", None)),
            "{\"listened_at\": 1000, \"track_metadata\": {\"track_name\": \"Song A\", \"artist_name\": \"Artist A\"}}\n"
        );
        assert_eq!(
            line(&Play(1000, "Song A", "Artist A", Some("Album A"))),
            "{\"listened_at\": 1000, \"track_metadata\": {\"track_name\": \"Song A\", \"artist_name\": \"Artist A\", \"release_name\": \"Album A\"}}\n"
        );
    }

    #[test]
    fn test_line_escaping() {
        let out = line(&Play(7, "Line\nBreak \"Quoted\"", "Sigur Rós", None));
        assert_eq!(out.matches('\n').count(), 1);
        assert!(out.ends_with('\n'));
        assert!(out.contains(r#""track_name": "Line\nBreak \"Quoted\"""#), "{out}");
        assert!(out.contains("Sigur Rós"), "{out}");

        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).expect("Line is not valid json");
        assert_eq!(parsed["track_metadata"]["track_name"], "Line\nBreak \"Quoted\"");
    }

    #[test]
    fn test_write_listens_replaces_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("listens.jsonl");
        std::fs::write(&path, "stale contents\nfrom a previous run\n").expect("Failed to seed file");

        let plays = [Play(1, "A", "A", None), Play(2, "B", "B", Some("B"))];
        let written = write_listens(&path, &plays).expect("Failed to write listens");
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).expect("Failed to read listens");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("{\"listened_at\": 1,"));
        assert!(lines[1].starts_with("{\"listened_at\": 2,"));
    }

    #[test]
    fn test_write_listens_empty() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("listens.jsonl");

        let written = write_listens::<Play, _>(&path, []).expect("Failed to write listens");
        assert_eq!(written, 0);
        assert_eq!(std::fs::read(&path).expect("Failed to read listens"), b"");
    }
}
