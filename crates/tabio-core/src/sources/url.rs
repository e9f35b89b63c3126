//! URL source over a blocking HTTP client.
//!
//! The codec token comes from an explicit type, else the response's
//! `Content-Type`, else the suffix of the URL path.

use std::path::PathBuf;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use tabio_codecs::{Action, CodecOptions, Codecs, Parser};
use tabio_stream::BookStream;

use crate::adapter::{wrong_kind, Context, DataReader, SourceAdapter};
use crate::capability::{Capability, SourceKind, Target};
use crate::error::{Result, TabioError};
use crate::request::{RequestInfo, Source};

/// Reads remote resources
pub struct UrlSource;

const URL_SOURCE: Capability = Capability {
    targets: &[Target::Input],
    actions: &[Action::Read],
    kinds: &[SourceKind::Url],
    attributes: &["http", "https"],
};

impl SourceAdapter for UrlSource {
    fn name(&self) -> &'static str {
        "url"
    }

    fn capability(&self) -> &Capability {
        &URL_SOURCE
    }

    /// Only an explicit type can be checked before the request is made
    fn check_eligible(&self, info: &RequestInfo<'_>, action: Action, codecs: &Codecs) -> Result<()> {
        if let Some(hint) = info.file_type {
            codecs.check_type(hint, action)?;
        }
        Ok(())
    }

    /// Sends the request; the body is parsed by `get_data`
    fn reader<'a>(&self, source: Source<'a>, ctx: &Context<'_>) -> Result<Box<dyn DataReader + 'a>> {
        let (url, hint) = match source {
            Source::Url { url, file_type } => (url, file_type),
            other => return Err(wrong_kind(self.name(), other.kind())),
        };

        let http = &ctx.settings.http;
        let client = Client::builder()
            .timeout(http.timeout())
            .user_agent(http.user_agent.as_str())
            .build()?;

        log::debug!("Fetching {}", url);
        let response = client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TabioError::ServerError {
                status: status.as_u16(),
                url,
            });
        }

        let token = match hint {
            Some(hint) => ctx.codecs.check_type(&hint, Action::Read)?,
            None => response_type(&response, &url, ctx.codecs)?,
        };
        Ok(Box::new(UrlReader {
            parser: ctx.codecs.get_parser(&token)?,
            url,
            response,
            options: ctx.options.clone(),
        }))
    }
}

struct UrlReader {
    url: String,
    response: Response,
    parser: Box<dyn Parser>,
    options: CodecOptions,
}

impl DataReader for UrlReader {
    fn source_info(&self) -> (String, Option<PathBuf>) {
        (self.url.clone(), None)
    }

    fn get_data(self: Box<Self>) -> Result<BookStream> {
        Ok(self.parser.parse(Box::new(self.response), &self.options)?)
    }
}

fn response_type(response: &Response, url: &str, codecs: &Codecs) -> Result<String> {
    let known = codecs.known_tokens(Action::Read);
    let from_header = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_for_content_type)
        .filter(|token| known.contains(token));
    match from_header {
        Some(token) => Ok(token.to_string()),
        None => Ok(codecs.infer_type(url_path(url), Action::Read)?),
    }
}

/// Map a MIME type to a codec token
pub fn token_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match mime.as_str() {
        "text/csv" => Some("csv"),
        "text/tab-separated-values" => Some("tsv"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some("xlsx"),
        "application/vnd.ms-excel.sheet.macroenabled.12" => Some("xlsm"),
        "application/vnd.ms-excel.sheet.binary.macroenabled.12" => Some("xlsb"),
        "application/vnd.ms-excel" => Some("xls"),
        "application/vnd.oasis.opendocument.spreadsheet" => Some("ods"),
        _ => None,
    }
}

/// The URL without query and fragment
fn url_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use tabio_stream::row;

    /// Serve one canned HTTP response on a local port
    fn serve(status: &'static str, content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                content_type,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetch(url: String, file_type: Option<&str>) -> Result<Vec<tabio_stream::Row>> {
        let codecs = Codecs::builtin();
        let settings = Settings::default();
        let ctx = Context {
            codecs: &codecs,
            settings: &settings,
            options: settings.codec_defaults(),
        };
        let source = Source::Url {
            url,
            file_type: file_type.map(str::to_string),
        };
        let reader = UrlSource.reader(source, &ctx)?;
        let mut book = reader.get_data()?;
        let sheet = book.sheet_at_mut(0).unwrap();
        Ok(sheet.collect_rows()?)
    }

    #[test]
    fn test_content_type_wins_over_suffix() {
        let base = serve("200 OK", "text/tab-separated-values", "a\tb\n");
        let rows = fetch(format!("{}/data.csv", base), None).unwrap();
        assert_eq!(rows, vec![row!["a", "b"]]);
    }

    #[test]
    fn test_suffix_used_for_unknown_content_type() {
        let base = serve("200 OK", "text/html", "1,2\n");
        let rows = fetch(format!("{}/data.csv?x=1#top", base), None).unwrap();
        assert_eq!(rows, vec![row![1, 2]]);
    }

    #[test]
    fn test_hint_wins_over_content_type() {
        let base = serve("200 OK", "text/csv", "a\tb\n");
        let rows = fetch(format!("{}/data", base), Some("tsv")).unwrap();
        assert_eq!(rows, vec![row!["a", "b"]]);
    }

    #[test]
    fn test_error_status_is_server_error() {
        let base = serve("404 Not Found", "text/plain", "gone");
        let url = format!("{}/data.csv", base);
        match fetch(url.clone(), None) {
            Err(TabioError::ServerError { status, url: failed }) => {
                assert_eq!(status, 404);
                assert_eq!(failed, url);
            }
            other => panic!("expected ServerError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_everywhere() {
        let base = serve("200 OK", "text/html", "<html></html>");
        assert!(matches!(
            fetch(format!("{}/page", base), None),
            Err(TabioError::Codec(tabio_codecs::CodecError::UnsupportedFileType { .. }))
        ));
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(token_for_content_type("text/csv; charset=utf-8"), Some("csv"));
        assert_eq!(
            token_for_content_type("application/vnd.oasis.opendocument.spreadsheet"),
            Some("ods")
        );
        assert_eq!(token_for_content_type("Text/Tab-Separated-Values"), Some("tsv"));
        assert_eq!(token_for_content_type("text/html"), None);
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("http://x/data.csv?raw=1#top"), "http://x/data.csv");
        assert_eq!(url_path("http://x/data.tsv"), "http://x/data.tsv");
    }

    #[test]
    fn test_bad_hint_not_eligible() {
        let codecs = Codecs::builtin();
        let source = Source::Url {
            url: "http://localhost/data".to_string(),
            file_type: Some("doc".to_string()),
        };
        assert!(UrlSource
            .check_eligible(&source.info(), Action::Read, &codecs)
            .is_err());
    }

    #[test]
    fn test_unhinted_url_is_eligible() {
        let codecs = Codecs::builtin();
        let source = Source::Url {
            url: "http://localhost/data".to_string(),
            file_type: None,
        };
        assert!(UrlSource
            .check_eligible(&source.info(), Action::Read, &codecs)
            .is_ok());
    }
}
