use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{DocumentSynthesizer, SynthesisError};

/// Namespace carried by the root element.
pub const SCHEMA_NAMESPACE: &str = "http://www.example.org/pdf-xml-schema";

/// Number of leading input bytes embedded as the base64 content sample.
pub const SAMPLE_LEN: usize = 100;

const DOCUMENT_VERSION: &str = "1.0";
const SOURCE_FORMAT: &str = "application/pdf";

type Attr = (&'static str, &'static str);

enum Inline {
    Text(&'static str),
    Span(&'static [Attr], &'static str),
}

struct Paragraph {
    style: &'static [Attr],
    content: &'static [Inline],
}

struct Section {
    attrs: &'static [Attr],
    paragraphs: &'static [Paragraph],
    table: Option<&'static [[&'static str; 2]]>,
}

const SECTIONS: &[Section] = &[
    Section {
        attrs: &[("id", "header"), ("type", "heading"), ("level", "1")],
        paragraphs: &[
            Paragraph {
                style: &[
                    ("font-family", "Times"),
                    ("font-size", "16"),
                    ("font-weight", "bold"),
                ],
                content: &[Inline::Text(
                    "This is a PDF document converted to XML format.",
                )],
            },
            Paragraph {
                style: &[("font-family", "Arial"), ("font-size", "12")],
                content: &[Inline::Text(
                    "The actual text content with preserved formatting would be extracted here.",
                )],
            },
        ],
        table: None,
    },
    Section {
        attrs: &[("id", "body"), ("type", "content")],
        paragraphs: &[
            Paragraph {
                style: &[
                    ("font-family", "Arial"),
                    ("font-size", "12"),
                    ("margin-top", "10"),
                    ("margin-bottom", "10"),
                ],
                content: &[Inline::Text(
                    "PDF text content is organized into paragraphs with preserved styling.",
                )],
            },
            Paragraph {
                style: &[
                    ("font-family", "Arial"),
                    ("font-size", "12"),
                    ("font-style", "italic"),
                ],
                content: &[
                    Inline::Text("Text formatting like "),
                    Inline::Span(&[("font-weight", "bold")], "bold"),
                    Inline::Text(" and "),
                    Inline::Span(&[("font-style", "italic")], "italic"),
                    Inline::Text(" is preserved."),
                ],
            },
        ],
        table: Some(&[["Sample", "Table"], ["Data", "Content"]]),
    },
    Section {
        attrs: &[("id", "footer"), ("type", "footer")],
        paragraphs: &[Paragraph {
            style: &[
                ("font-family", "Arial"),
                ("font-size", "10"),
                ("text-align", "center"),
            ],
            content: &[Inline::Text(
                "PDF document metadata and additional information is preserved here.",
            )],
        }],
        table: None,
    },
];

/// Wraps input metadata in a fixed document template.
///
/// Only the length and the first [`SAMPLE_LEN`] bytes of the input are
/// inspected; the section content is static.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSynthesizer;

impl DocumentSynthesizer for TemplateSynthesizer {
    fn synthesize(&self, input: &[u8], now: DateTime<Utc>) -> Result<String, SynthesisError> {
        let created = now.to_rfc3339_opts(SecondsFormat::Micros, true);
        let size = input.len().to_string();
        let sample = STANDARD.encode(&input[..input.len().min(SAMPLE_LEN)]);

        tracing::debug!(size = input.len(), "Synthesizing XML document");

        let mut out = XmlOut::new();
        out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        out.open(
            "pdf-document",
            &[("xmlns", SCHEMA_NAMESPACE), ("version", DOCUMENT_VERSION)],
        )?;

        out.open("metadata", &[("created", created.as_str())])?;
        out.leaf("file-size", &[("unit", "bytes")], &size)?;
        out.leaf("file-format", &[], SOURCE_FORMAT)?;
        out.leaf("content-sample", &[("encoding", "base64")], &sample)?;
        out.close("metadata")?;

        out.open("document-content", &[])?;
        for section in SECTIONS {
            write_section(&mut out, section)?;
        }
        out.close("document-content")?;

        out.close("pdf-document")?;
        out.finish()
    }
}

fn write_section(out: &mut XmlOut, section: &Section) -> Result<(), SynthesisError> {
    out.open("section", section.attrs)?;
    for paragraph in section.paragraphs {
        out.open("paragraph", paragraph.style)?;
        for inline in paragraph.content {
            match inline {
                Inline::Text(text) => out.text(text)?,
                Inline::Span(style, text) => out.leaf("span", style, text)?,
            }
        }
        out.close("paragraph")?;
    }
    if let Some(rows) = section.table {
        let row_count = rows.len().to_string();
        out.open(
            "table",
            &[
                ("id", "sample-table"),
                ("rows", row_count.as_str()),
                ("columns", "2"),
            ],
        )?;
        for row in rows {
            out.open("tr", &[])?;
            for cell in row {
                out.leaf("td", &[], cell)?;
            }
            out.close("tr")?;
        }
        out.close("table")?;
    }
    out.close("section")
}

/// Thin wrapper over the XML writer. Text and attribute values are escaped by
/// the writer.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), SynthesisError> {
        self.writer
            .write_event(event)
            .map_err(SynthesisError::write)
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SynthesisError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> Result<(), SynthesisError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<(), SynthesisError> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<(), SynthesisError> {
        self.open(name, attrs)?;
        self.text(text)?;
        self.close(name)
    }

    fn finish(self) -> Result<String, SynthesisError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}
