//! In-memory sources: byte buffers and caller-supplied streams.

use std::io::{Read, Write};
use std::path::PathBuf;

use tabio_codecs::{Action, CodecOptions, Codecs, Parser, Renderer};
use tabio_stream::BookStream;

use crate::adapter::{file_type_of, wrong_kind, Context, DataReader, DataWriter, SourceAdapter};
use crate::capability::{Capability, SourceKind, Target};
use crate::error::Result;
use crate::request::{Destination, RequestInfo, Source, WriteOutput};

/// Reads encoded bytes from a buffer or a stream
pub struct MemorySource;

const MEMORY_SOURCE: Capability = Capability {
    targets: &[Target::Input],
    actions: &[Action::Read],
    kinds: &[SourceKind::Content, SourceKind::Stream],
    attributes: &[],
};

impl SourceAdapter for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn capability(&self) -> &Capability {
        &MEMORY_SOURCE
    }

    fn check_eligible(&self, info: &RequestInfo<'_>, action: Action, codecs: &Codecs) -> Result<()> {
        file_type_of(info, action, codecs).map(|_| ())
    }

    fn reader<'a>(&self, source: Source<'a>, ctx: &Context<'_>) -> Result<Box<dyn DataReader + 'a>> {
        let token = file_type_of(&source.info(), Action::Read, ctx.codecs)?;
        let input = match source {
            Source::Content { content, .. } => Input::Content(content),
            Source::Stream { reader, .. } => Input::Stream(reader),
            other => return Err(wrong_kind(self.name(), other.kind())),
        };
        Ok(Box::new(MemoryReader {
            input,
            parser: ctx.codecs.get_parser(&token)?,
            options: ctx.options.clone(),
        }))
    }
}

enum Input {
    Content(Vec<u8>),
    Stream(Box<dyn Read + Send>),
}

struct MemoryReader {
    input: Input,
    parser: Box<dyn Parser>,
    options: CodecOptions,
}

impl DataReader for MemoryReader {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        let kind = match self.input {
            Input::Content(_) => "content",
            Input::Stream(_) => "stream",
        };
        (format!("<{} {}>", self.parser.file_type(), kind), None)
    }

    fn get_data(self: Box<Self>) -> Result<BookStream> {
        let book = match self.input {
            Input::Content(content) => self.parser.parse_bytes(content, &self.options)?,
            Input::Stream(reader) => self.parser.parse(reader, &self.options)?,
        };
        Ok(book)
    }
}

/// Renders into a fresh buffer or a caller-owned writer
pub struct MemorySink;

const MEMORY_SINK: Capability = Capability {
    targets: &[Target::Sheet, Target::Book],
    actions: &[Action::Write],
    kinds: &[SourceKind::Content, SourceKind::Stream],
    attributes: &[],
};

impl SourceAdapter for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn capability(&self) -> &Capability {
        &MEMORY_SINK
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
        let output = match destination {
            Destination::Content { .. } => None,
            Destination::Stream { writer, .. } => Some(writer),
            other => return Err(wrong_kind(self.name(), other.kind())),
        };
        Ok(Box::new(MemoryWriter {
            output,
            renderer: ctx.codecs.get_renderer(&token)?,
            options: ctx.options.clone(),
        }))
    }
}

struct MemoryWriter<'a> {
    /// `None` renders into a returned buffer
    output: Option<&'a mut dyn Write>,
    renderer: Box<dyn Renderer>,
    options: CodecOptions,
}

impl DataWriter for MemoryWriter<'_> {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        let kind = if self.output.is_some() { "stream" } else { "content" };
        (format!("<{} {}>", self.renderer.file_type(), kind), None)
    }

    fn write_data(self: Box<Self>, book: BookStream) -> Result<Option<WriteOutput>> {
        let MemoryWriter {
            output,
            renderer,
            options,
        } = *self;
        match output {
            Some(writer) => {
                renderer.render(book, &mut *writer, &options)?;
                writer.flush()?;
                Ok(None)
            }
            None => Ok(Some(WriteOutput::Buffer(
                renderer.render_to_vec(book, &options)?,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::io::Cursor;
    use tabio_codecs::CodecError;
    use tabio_stream::{row, SheetStream};

    fn context<'e>(codecs: &'e Codecs, settings: &'e Settings) -> Context<'e> {
        Context {
            codecs,
            settings,
            options: settings.codec_defaults(),
        }
    }

    fn numbers() -> BookStream {
        BookStream::from(SheetStream::from_rows("n", vec![row![1, 2], row![3, 4]]))
    }

    #[test]
    fn test_stream_write_leaves_cursor_at_end() {
        let codecs = Codecs::builtin();
        let settings = Settings::default();
        let mut cursor = Cursor::new(Vec::new());
        {
            let writer = MemorySink
                .writer(
                    Destination::Stream {
                        file_type: "csv".to_string(),
                        writer: &mut cursor,
                    },
                    &context(&codecs, &settings),
                )
                .unwrap();
            assert!(writer.write_data(numbers()).unwrap().is_none());
        }
        assert_eq!(cursor.position(), 10);
        assert_eq!(cursor.get_ref().as_slice(), b"1,2\r\n3,4\r\n");
    }

    #[test]
    fn test_content_write_returns_buffer() {
        let codecs = Codecs::builtin();
        let settings = Settings::default();
        let mut ctx = context(&codecs, &settings);
        ctx.options.set("lineterminator", "\n");
        let writer = MemorySink
            .writer(
                Destination::Content {
                    file_type: "csv".to_string(),
                },
                &ctx,
            )
            .unwrap();
        let output = writer.write_data(numbers()).unwrap();
        assert_eq!(output, Some(WriteOutput::Buffer(b"1,2\n3,4\n".to_vec())));
    }

    #[test]
    fn test_multi_sheet_content_is_rejected() {
        let codecs = Codecs::builtin();
        let settings = Settings::default();
        let writer = MemorySink
            .writer(
                Destination::Content {
                    file_type: "csv".to_string(),
                },
                &context(&codecs, &settings),
            )
            .unwrap();
        let book = BookStream::from_ordered(vec![("a", vec![row![1]]), ("b", vec![row![2]])]);
        assert!(matches!(
            writer.write_data(book),
            Err(crate::TabioError::Codec(CodecError::SingleSheetOnly { .. }))
        ));
    }

    #[test]
    fn test_read_content() {
        let codecs = Codecs::builtin();
        let settings = Settings::default();
        let reader = MemorySource
            .reader(
                Source::Content {
                    file_type: "tsv".to_string(),
                    content: b"a\tb\n1\t2\n".to_vec(),
                },
                &context(&codecs, &settings),
            )
            .unwrap();
        assert_eq!(reader.source_info().0, "<tsv content>");
        let mut book = reader.get_data().unwrap();
        assert_eq!(
            book.sheet_at_mut(0).unwrap().collect_rows().unwrap(),
            vec![row!["a", "b"], row![1, 2]]
        );
    }
}
