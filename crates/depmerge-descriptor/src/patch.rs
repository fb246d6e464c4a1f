use std::fs;
use std::io::{Cursor, Write as _};
use std::ops::Range;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::error::{PatchError, Result};
use crate::locator::PropertyLocator;

/// Patches one property value inside a build descriptor.
///
/// The patcher is pure and synchronous: it reads the descriptor, rewrites
/// the single matching property element, and persists the result
/// atomically. Nothing on disk changes on any failure path; the write in
/// the final step either replaces the whole file or leaves it untouched.
#[derive(Clone, Debug)]
pub struct DescriptorPatcher {
    descriptor_file: String,
    locator: PropertyLocator,
}

/// Where the replacement text goes in the event sequence.
enum PatchSite {
    /// `<p>…</p>`: drop the events in `content` and write the new text
    /// just before the closing tag at `end`.
    Element { content: Range<usize>, end: usize },
    /// `<p/>`: expand the self-closing element at `at` into
    /// start / text / end.
    SelfClosing { at: usize },
}

impl DescriptorPatcher {
    /// Create a patcher for the given descriptor file name and property.
    pub fn new(descriptor_file: impl Into<String>, property: &str) -> Result<Self> {
        Ok(Self {
            descriptor_file: descriptor_file.into(),
            locator: PropertyLocator::for_property(property)?,
        })
    }

    /// The configured descriptor file name.
    pub fn descriptor_file(&self) -> &str {
        &self.descriptor_file
    }

    /// The locator this patcher targets.
    pub fn locator(&self) -> &PropertyLocator {
        &self.locator
    }

    /// Replace the targeted property's text content with `new_value`.
    ///
    /// The descriptor is resolved as `directory/descriptor_file`. On
    /// success the file on disk holds the rewritten document; on any error
    /// it is byte-identical to what it was before the call.
    pub fn patch(&self, directory: &Path, new_value: &str) -> Result<()> {
        let path = directory.join(&self.descriptor_file);
        debug!(path = %path.display(), locator = %self.locator, "patching descriptor");

        let content = fs::read_to_string(&path).map_err(|source| PatchError::Open {
            path: path.clone(),
            source,
        })?;

        let events = read_events(&content).map_err(|source| PatchError::Parse {
            path: path.clone(),
            source,
        })?;

        let site = self.locate(&events)?;
        let patched = render(&events, &site, new_value).map_err(|detail| PatchError::Write {
            path: path.clone(),
            detail,
        })?;

        // Atomic replace: the original survives any partial write.
        write_atomic(directory, &path, &patched).map_err(|detail| PatchError::Write {
            path: path.clone(),
            detail,
        })?;

        debug!(path = %path.display(), "descriptor patched");
        Ok(())
    }

    /// Find the single element matching the locator and classify its
    /// content shape.
    fn locate(&self, events: &[Event<'static>]) -> Result<PatchSite> {
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut sites: Vec<PatchSite> = Vec::new();
        let mut open_match: Option<usize> = None;

        for (i, event) in events.iter().enumerate() {
            match event {
                Event::Start(e) => {
                    stack.push(e.name().as_ref().to_vec());
                    if self.locator.matches(&stack) {
                        open_match = Some(i);
                    }
                }
                Event::End(_) => {
                    if self.locator.matches(&stack) {
                        if let Some(start) = open_match.take() {
                            sites.push(PatchSite::Element {
                                content: start + 1..i,
                                end: i,
                            });
                        }
                    }
                    stack.pop();
                }
                Event::Empty(e) => {
                    stack.push(e.name().as_ref().to_vec());
                    if self.locator.matches(&stack) {
                        sites.push(PatchSite::SelfClosing { at: i });
                    }
                    stack.pop();
                }
                _ => {}
            }
        }

        if sites.len() != 1 {
            return Err(PatchError::Cardinality {
                matched: sites.len(),
            });
        }
        let site = sites.remove(0); // length checked above

        // The matched element may hold only character data (text and
        // entity references) or nothing at all. Markup inside it means the
        // document does not look like we assume, so fail instead of
        // guessing.
        if let PatchSite::Element { content, .. } = &site {
            for event in &events[content.clone()] {
                match event {
                    Event::Start(e) | Event::Empty(e) => {
                        return Err(self.shape_error(format!(
                            "child element <{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                    Event::Comment(_) => return Err(self.shape_error("comment")),
                    Event::CData(_) => return Err(self.shape_error("CDATA section")),
                    Event::PI(_) => return Err(self.shape_error("processing instruction")),
                    _ => {}
                }
            }
        }
        Ok(site)
    }

    fn shape_error(&self, detail: impl Into<String>) -> PatchError {
        PatchError::PropertyShape {
            property: self.locator.property().to_string(),
            detail: detail.into(),
        }
    }
}

/// Parse the whole document into owned events, preserving all whitespace.
fn read_events(content: &str) -> std::result::Result<Vec<Event<'static>>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    let mut events = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => events.push(event.into_owned()),
        }
    }
    Ok(events)
}

/// Re-serialize the event stream with the property content replaced.
///
/// Untouched events round-trip byte-identically; only the new value is
/// freshly escaped.
fn render(
    events: &[Event<'static>],
    site: &PatchSite,
    new_value: &str,
) -> std::result::Result<Vec<u8>, String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for (i, event) in events.iter().enumerate() {
        match site {
            PatchSite::Element { content, end } => {
                if content.contains(&i) {
                    continue;
                }
                if i == *end {
                    writer
                        .write_event(Event::Text(BytesText::new(new_value)))
                        .map_err(|e| e.to_string())?;
                }
            }
            PatchSite::SelfClosing { at } => {
                if i == *at {
                    if let Event::Empty(empty) = event {
                        let name =
                            String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                        writer
                            .write_event(Event::Start(empty.clone()))
                            .map_err(|e| e.to_string())?;
                        writer
                            .write_event(Event::Text(BytesText::new(new_value)))
                            .map_err(|e| e.to_string())?;
                        writer
                            .write_event(Event::End(BytesEnd::new(name)))
                            .map_err(|e| e.to_string())?;
                    }
                    continue;
                }
            }
        }
        writer.write_event(event.clone()).map_err(|e| e.to_string())?;
    }
    Ok(writer.into_inner().into_inner())
}

/// Write `bytes` to `path` via a temp file in the same directory, so the
/// replacement is all-or-nothing.
fn write_atomic(
    directory: &Path,
    path: &Path,
    bytes: &[u8],
) -> std::result::Result<(), String> {
    let mut tmp = tempfile::NamedTempFile::new_in(directory).map_err(|e| e.to_string())?;
    tmp.write_all(bytes).map_err(|e| e.to_string())?;
    tmp.persist(path).map_err(|e| e.to_string())?;
    Ok(())
}
