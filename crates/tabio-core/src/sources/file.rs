//! File sources.
//!
//! Files are opened only for the duration of a read or write and closed on
//! every exit path.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tabio_codecs::{Action, CodecOptions, Codecs, Parser, Renderer};
use tabio_stream::BookStream;

use crate::adapter::{file_type_of, wrong_kind, Context, DataReader, DataWriter, SourceAdapter};
use crate::capability::{Capability, SourceKind, Target};
use crate::error::Result;
use crate::request::{Destination, RequestInfo, Source, WriteOutput};

/// Reads files through the parser for their type
pub struct FileSource;

const FILE_SOURCE: Capability = Capability {
    targets: &[Target::Input],
    actions: &[Action::Read],
    kinds: &[SourceKind::File],
    attributes: &[],
};

impl SourceAdapter for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn capability(&self) -> &Capability {
        &FILE_SOURCE
    }

    fn check_eligible(&self, info: &RequestInfo<'_>, action: Action, codecs: &Codecs) -> Result<()> {
        file_type_of(info, action, codecs).map(|_| ())
    }

    fn reader<'a>(&self, source: Source<'a>, ctx: &Context<'_>) -> Result<Box<dyn DataReader + 'a>> {
        let token = file_type_of(&source.info(), Action::Read, ctx.codecs)?;
        match source {
            Source::File { name, .. } => Ok(Box::new(FileReader {
                path: name,
                parser: ctx.codecs.get_parser(&token)?,
                options: ctx.options.clone(),
            })),
            other => Err(wrong_kind(self.name(), other.kind())),
        }
    }
}

struct FileReader {
    path: PathBuf,
    parser: Box<dyn Parser>,
    options: CodecOptions,
}

impl DataReader for FileReader {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        file_info(&self.path)
    }

    fn get_data(self: Box<Self>) -> Result<BookStream> {
        log::debug!(
            "Reading {} as {}",
            self.path.display(),
            self.parser.file_type()
        );
        Ok(self.parser.parse_file(&self.path, &self.options)?)
    }
}

/// Writes files through the renderer for their type
///
/// A single-sheet format given a multi-sheet book writes one file per
/// sheet, named `{stem}__{sheet}__{index}.{ext}` next to the requested path.
pub struct FileSink;

const FILE_SINK: Capability = Capability {
    targets: &[Target::Sheet, Target::Book],
    actions: &[Action::Write],
    kinds: &[SourceKind::File],
    attributes: &[],
};

impl SourceAdapter for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn capability(&self) -> &Capability {
        &FILE_SINK
    }

    fn check_eligible(&self, info: &RequestInfo<'_>, action: Action, codecs: &Codecs) -> Result<()> {
        file_type_of(info, action, codecs).map(|_| ())
    }

    fn writer<'a>(
        &self,
        destination: Destination<'a>,
        ctx: &Context<'_>,
    ) -> Result<Box<dyn DataWriter + 'a>> {
        let token = file_type_of(&destination.info(), Action::Write, ctx.codecs)?;
        match destination {
            Destination::File { name, .. } => Ok(Box::new(FileWriter {
                path: name,
                renderer: ctx.codecs.get_renderer(&token)?,
                options: ctx.options.clone(),
            })),
            other => Err(wrong_kind(self.name(), other.kind())),
        }
    }
}

struct FileWriter {
    path: PathBuf,
    renderer: Box<dyn Renderer>,
    options: CodecOptions,
}

impl FileWriter {
    fn write_file(&self, path: &Path, book: BookStream) -> Result<()> {
        log::debug!("Writing {} as {}", path.display(), self.renderer.file_type());
        let mut output = BufWriter::new(File::create(path)?);
        self.renderer.render(book, &mut output, &self.options)?;
        output.flush()?;
        Ok(())
    }
}

impl DataWriter for FileWriter {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        file_info(&self.path)
    }

    fn write_data(self: Box<Self>, book: BookStream) -> Result<Option<WriteOutput>> {
        if self.renderer.is_single_sheet() && book.number_of_sheets() > 1 {
            let token = self.renderer.file_type().to_string();
            for (index, sheet) in book.into_iter().enumerate() {
                let path = split_sheet_path(&self.path, &token, sheet.name(), index);
                self.write_file(&path, BookStream::from(sheet))?;
            }
        } else {
            self.write_file(&self.path, book)?;
        }
        Ok(None)
    }
}

fn file_info(path: &Path) -> (String, Option<PathBuf>) {
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    (label, Some(path.to_path_buf()))
}

/// Path of the per-sheet file for sheet `index` of a split write
fn split_sheet_path(path: &Path, token: &str, sheet: &str, index: usize) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix_len = token.len() + 1;
    let cut = file_name.len().saturating_sub(suffix_len);
    let has_suffix = file_name.len() > suffix_len
        && file_name.is_char_boundary(cut)
        && file_name[cut..].eq_ignore_ascii_case(&format!(".{}", token));

    let (stem, ext) = if has_suffix {
        (&file_name[..cut], &file_name[cut + 1..])
    } else {
        (file_name.as_str(), token)
    };
    path.with_file_name(format!("{}__{}__{}.{}", stem, sheet, index, ext))
}
