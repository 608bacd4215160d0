//! Streaming parser for the WordprocessingML main part (`word/document.xml`).
//!
//! Only the body-level structure is collected: direct `w:p` children of
//! `w:body` become paragraphs, direct `w:tbl` children become tables.
//! Paragraph text is the content of `w:r` runs that sit directly in the
//! paragraph or in a `w:hyperlink` directly in the paragraph. Anything else
//! (text boxes, nested tables, tracked deletions, field codes) is skipped.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Vertical merge state of a table cell (`w:vMerge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VMerge {
    #[default]
    None,
    Restart,
    Continue,
}

/// A table cell before merge resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    /// Number of grid columns covered (`w:gridSpan`), at least 1.
    pub grid_span: usize,
    pub v_merge: VMerge,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<RawCell>>,
}

/// Body paragraphs and tables in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBody {
    pub paragraphs: Vec<String>,
    pub tables: Vec<RawTable>,
}

/// Malformed or truncated XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError {
    pub position: u64,
    pub message: String,
}

impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.position)
    }
}

/// What an open element means to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Root,
    Other,
    Body,
    BodyParagraph,
    Table,
    Row,
    Cell,
    CellProps,
    CellParagraph,
    Hyperlink,
    Run,
    Text,
}

#[derive(Default)]
struct Collector {
    body: ParsedBody,
    paragraph: String,
    table: RawTable,
    row: Vec<RawCell>,
    cell_paragraphs: Vec<String>,
    cell_span: usize,
    cell_merge: VMerge,
}

impl Collector {
    /// Decide the role of a newly opened element and update state.
    fn open(&mut self, parent: Role, e: &BytesStart<'_>) -> Role {
        let local = e.local_name();
        let name = local.as_ref();

        match (parent, name) {
            (Role::Root, b"body") => Role::Body,
            (Role::Body, b"p") => {
                self.paragraph.clear();
                Role::BodyParagraph
            }
            (Role::Body, b"tbl") => {
                self.table = RawTable::default();
                Role::Table
            }
            (Role::Table, b"tr") => {
                self.row.clear();
                Role::Row
            }
            (Role::Row, b"tc") => {
                self.cell_paragraphs.clear();
                self.cell_span = 1;
                self.cell_merge = VMerge::None;
                Role::Cell
            }
            (Role::Cell, b"tcPr") => Role::CellProps,
            (Role::Cell, b"p") => {
                self.paragraph.clear();
                Role::CellParagraph
            }
            (Role::CellProps, b"gridSpan") => {
                self.cell_span = attr_value(e, b"val")
                    .and_then(|v| v.parse::<usize>().ok())
                    .filter(|&n| n > 0)
                    .unwrap_or(1);
                Role::Other
            }
            (Role::CellProps, b"vMerge") => {
                self.cell_merge = match attr_value(e, b"val").as_deref() {
                    Some("restart") => VMerge::Restart,
                    _ => VMerge::Continue,
                };
                Role::Other
            }
            (Role::BodyParagraph | Role::CellParagraph, b"r") => Role::Run,
            (Role::BodyParagraph | Role::CellParagraph, b"hyperlink") => Role::Hyperlink,
            (Role::Hyperlink, b"r") => Role::Run,
            (Role::Run, b"t") => Role::Text,
            (Role::Run, b"tab" | b"ptab") => {
                self.paragraph.push('\t');
                Role::Other
            }
            (Role::Run, b"br") => {
                let line_break = attr_value(e, b"type")
                    .map(|t| t == "textWrapping")
                    .unwrap_or(true);
                if line_break {
                    self.paragraph.push('\n');
                }
                Role::Other
            }
            (Role::Run, b"cr") => {
                self.paragraph.push('\n');
                Role::Other
            }
            (Role::Run, b"noBreakHyphen") => {
                self.paragraph.push('-');
                Role::Other
            }
            _ => Role::Other,
        }
    }

    fn close(&mut self, role: Role) {
        match role {
            Role::BodyParagraph => {
                self.body.paragraphs.push(std::mem::take(&mut self.paragraph));
            }
            Role::CellParagraph => {
                self.cell_paragraphs.push(std::mem::take(&mut self.paragraph));
            }
            Role::Cell => {
                self.row.push(RawCell {
                    text: self.cell_paragraphs.join("\n"),
                    grid_span: self.cell_span,
                    v_merge: self.cell_merge,
                });
            }
            Role::Row => {
                self.table.rows.push(std::mem::take(&mut self.row));
            }
            Role::Table => {
                self.body.tables.push(std::mem::take(&mut self.table));
            }
            _ => {}
        }
    }
}

fn attr_value(e: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Parse `word/document.xml`, collecting body paragraphs and tables.
///
/// Unlike a lenient scan, malformed XML is reported: a document whose
/// structure cannot be read must not silently yield partial text.
pub fn parse_document<R: BufRead>(reader: R) -> Result<ParsedBody, XmlError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut stack: Vec<Role> = Vec::new();
    let mut collector = Collector::default();
    let mut saw_body = false;

    loop {
        let event = xml.read_event_into(&mut buf).map_err(|e| XmlError {
            position: xml.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                let role = match stack.last() {
                    Some(&parent) => collector.open(parent, e),
                    None => Role::Root,
                };
                saw_body |= role == Role::Body;
                stack.push(role);
            }
            Event::Empty(ref e) => {
                if let Some(&parent) = stack.last() {
                    let role = collector.open(parent, e);
                    saw_body |= role == Role::Body;
                    collector.close(role);
                }
            }
            Event::Text(ref e) => {
                if stack.last() == Some(&Role::Text) {
                    let text = e.unescape().map_err(|err| XmlError {
                        position: xml.buffer_position() as u64,
                        message: err.to_string(),
                    })?;
                    collector.paragraph.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if stack.last() == Some(&Role::Text) {
                    collector
                        .paragraph
                        .push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::End(_) => {
                if let Some(role) = stack.pop() {
                    collector.close(role);
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XmlError {
            position: xml.buffer_position() as u64,
            message: "unexpected end of document".into(),
        });
    }
    if !saw_body {
        return Err(XmlError {
            position: xml.buffer_position() as u64,
            message: "no w:body element found".into(),
        });
    }

    Ok(collector.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn doc(body: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {NS}><w:body>{body}</w:body></w:document>"#)
    }

    #[test]
    fn test_parse_paragraphs() {
        let xml = doc(
            "<w:p><w:r><w:t>Hello</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Wor</w:t></w:r><w:r><w:t>ld</w:t></w:r></w:p>",
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.paragraphs, vec!["Hello", "World"]);
        assert!(body.tables.is_empty());
    }

    #[test]
    fn test_empty_paragraph_is_kept() {
        let xml = doc("<w:p/><w:p><w:r><w:t>x</w:t></w:r></w:p>");
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.paragraphs, vec!["", "x"]);
    }

    #[test]
    fn test_preserved_spaces_and_entities() {
        let xml = doc(
            r#"<w:p><w:r><w:t xml:space="preserve">Tom &amp; </w:t></w:r><w:r><w:t>Jerry</w:t></w:r></w:p>"#,
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.paragraphs, vec!["Tom & Jerry"]);
    }

    #[test]
    fn test_run_children_tab_break_hyphen() {
        let xml = doc(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:noBreakHyphen/><w:t>d</w:t><w:br w:type="page"/></w:r></w:p>"#,
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.paragraphs, vec!["a\tb\nc-d"]);
    }

    #[test]
    fn test_hyperlink_runs_included_deleted_text_skipped() {
        let xml = doc(
            r#"<w:p><w:r><w:t>see </w:t></w:r><w:hyperlink r:id="rId4" xmlns:r="urn:r"><w:r><w:t>here</w:t></w:r></w:hyperlink><w:del><w:r><w:delText>gone</w:delText></w:r></w:del></w:p>"#,
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.paragraphs, vec!["see here"]);
    }

    #[test]
    fn test_table_cells_and_paragraph_order() {
        let xml = doc(
            "<w:p><w:r><w:t>before</w:t></w:r></w:p>\
             <w:tbl><w:tblPr/><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>\
             <w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>B1</w:t></w:r></w:p><w:p><w:r><w:t>B2</w:t></w:r></w:p></w:tc></w:tr>\
             </w:tbl>\
             <w:p><w:r><w:t>after</w:t></w:r></w:p>",
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.paragraphs, vec!["before", "after"]);
        assert_eq!(body.tables.len(), 1);
        let row = &body.tables[0].rows[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].text, "A");
        assert_eq!(row[1].text, "B1\nB2");
    }

    #[test]
    fn test_nested_table_not_collected() {
        let xml = doc(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>outer</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p/></w:tc></w:tr></w:tbl>",
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.tables.len(), 1);
        assert_eq!(body.tables[0].rows.len(), 1);
        assert_eq!(body.tables[0].rows[0][0].text, "outer\n");
    }

    #[test]
    fn test_cell_properties() {
        let xml = doc(
            r#"<w:tbl><w:tr><w:tc><w:tcPr><w:gridSpan w:val="2"/><w:vMerge w:val="restart"/></w:tcPr><w:p/></w:tc></w:tr>
               <w:tr><w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        let rows = &body.tables[0].rows;
        assert_eq!(rows[0][0].grid_span, 2);
        assert_eq!(rows[0][0].v_merge, VMerge::Restart);
        assert_eq!(rows[1][0].grid_span, 1);
        assert_eq!(rows[1][0].v_merge, VMerge::Continue);
    }

    #[test]
    fn test_textbox_content_skipped() {
        let xml = doc(
            "<w:p><w:r><w:t>main</w:t></w:r><w:r><w:drawing><wps:txbx xmlns:wps=\"urn:wps\"><w:txbxContent>\
             <w:p><w:r><w:t>boxed</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></w:r></w:p>",
        );
        let body = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(body.paragraphs, vec!["main"]);
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let xml = format!(r#"<w:document {NS}><w:body><w:p><w:r><w:t>x</w:r></w:p></w:body></w:document>"#);
        assert!(parse_document(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_truncated_xml_is_error() {
        let xml = format!(r#"<w:document {NS}><w:body><w:p><w:r><w:t>x</w:t>"#);
        assert!(parse_document(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_body_is_error() {
        let xml = format!(r#"<w:document {NS}></w:document>"#);
        assert!(parse_document(xml.as_bytes()).is_err());
    }
}
