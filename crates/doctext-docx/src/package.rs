//! OOXML package access: locating and reading the main document part.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;
use zip::result::ZipError;

use doctext_core::BackendError;

/// Main part location used when the package has no usable `_rels/.rels`.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

const PACKAGE_RELS: &str = "_rels/.rels";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Open a DOCX file and return the raw bytes of its main document part.
///
/// `max_size` caps the uncompressed size of the part; larger parts are
/// rejected before and during decompression.
pub fn read_main_part(path: &Path, max_size: u64) -> Result<Vec<u8>, BackendError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| BackendError::Open(format!("not a DOCX package: {}", e)))?;

    let part_name = main_part_name(&mut archive);
    read_part(&mut archive, &part_name, max_size)
}

/// Resolve the main part from the package relationships, falling back to
/// [`DEFAULT_MAIN_PART`].
fn main_part_name<R: Read + Seek>(archive: &mut ZipArchive<R>) -> String {
    let rels = match archive.by_name(PACKAGE_RELS) {
        Ok(mut entry) => {
            let mut content = Vec::new();
            if entry.read_to_end(&mut content).is_err() {
                return DEFAULT_MAIN_PART.to_string();
            }
            content
        }
        Err(_) => return DEFAULT_MAIN_PART.to_string(),
    };

    office_document_target(&rels)
        .map(|target| target.trim_start_matches('/').to_string())
        .filter(|target| !target.is_empty())
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string())
}

/// Find the `Target` of the officeDocument relationship in `_rels/.rels`.
fn office_document_target(rels: &[u8]) -> Option<String> {
    let mut xml = Reader::from_reader(rels);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = Some(String::from_utf8_lossy(&attr.value).into_owned()),
                        b"Target" => target = Some(String::from_utf8_lossy(&attr.value).into_owned()),
                        _ => {}
                    }
                }
                if rel_type.as_deref() == Some(OFFICE_DOCUMENT_REL) {
                    return target;
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    max_size: u64,
) -> Result<Vec<u8>, BackendError> {
    let entry = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => BackendError::Open(format!("missing {} part", name)),
        other => BackendError::Open(format!("failed to read {}: {}", name, other)),
    })?;

    if entry.size() > max_size {
        return Err(BackendError::Open(format!(
            "{} is {} bytes, exceeding the {} byte limit",
            name,
            entry.size(),
            max_size
        )));
    }

    let mut data = Vec::with_capacity(entry.size() as usize);
    // Declared sizes can lie; cap the actual read as well.
    entry
        .take(max_size + 1)
        .read_to_end(&mut data)
        .map_err(|e| BackendError::Parse(format!("failed to decompress {}: {}", name, e)))?;
    if data.len() as u64 > max_size {
        return Err(BackendError::Open(format!(
            "{} exceeds the {} byte limit",
            name, max_size
        )));
    }

    Ok(data)
}
