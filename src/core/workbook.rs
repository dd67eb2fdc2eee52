use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::utils::error::{Result, VerifyError};

/// An opened `.xlsx` package: a zip archive of OPC parts.
pub struct XlsxPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl XlsxPackage<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VerifyError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxPackage<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut part = self.archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => VerifyError::InvalidWorkbook {
                message: format!("missing part '{}'", name),
            },
            other => VerifyError::Zip(other),
        })?;
        let mut data = Vec::new();
        part.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Resolve a worksheet part path from the sheet's display name.
    pub fn sheet_part(&mut self, sheet_name: &str) -> Result<String> {
        let workbook_xml = self.read_part("xl/workbook.xml")?;
        let rid = sheet_relationship_id(&workbook_xml, sheet_name)?.ok_or_else(|| {
            VerifyError::SheetNotFound {
                name: sheet_name.to_string(),
            }
        })?;

        let rels = parse_relationships(&self.read_part("xl/_rels/workbook.xml.rels")?)?;
        let target = rels.get(&rid).ok_or_else(|| VerifyError::InvalidWorkbook {
            message: format!("workbook relationship '{}' not found", rid),
        })?;

        let part = resolve_target("xl", target);
        tracing::debug!("Sheet '{}' resolved to part '{}'", sheet_name, part);
        Ok(part)
    }

    /// Resolve the drawing part referenced by a worksheet, if it has one.
    pub fn drawing_part(&mut self, sheet_part: &str) -> Result<Option<String>> {
        let sheet_xml = self.read_part(sheet_part)?;
        let Some(rid) = drawing_relationship_id(&sheet_xml)? else {
            return Ok(None);
        };

        let rels = parse_relationships(&self.read_part(&rels_part_for(sheet_part))?)?;
        let target = rels.get(&rid).ok_or_else(|| VerifyError::InvalidWorkbook {
            message: format!("worksheet relationship '{}' not found", rid),
        })?;

        let part = resolve_target(parent_dir(sheet_part), target);
        tracing::debug!("Worksheet '{}' references drawing '{}'", sheet_part, part);
        Ok(Some(part))
    }

    /// Resolve the media part behind a drawing's `r:embed` relationship.
    pub fn media_part(&mut self, drawing_part: &str, embed_rid: &str) -> Result<String> {
        let rels = parse_relationships(&self.read_part(&rels_part_for(drawing_part))?)?;
        let target = rels.get(embed_rid).ok_or_else(|| VerifyError::InvalidWorkbook {
            message: format!("drawing relationship '{}' not found", embed_rid),
        })?;
        Ok(resolve_target(parent_dir(drawing_part), target))
    }
}

fn attr_value(attr: &Attribute) -> String {
    attr.unescape_value().map_or_else(
        |_| String::from_utf8_lossy(&attr.value).into_owned(),
        std::borrow::Cow::into_owned,
    )
}

/// Find the `r:id` of the `<sheet>` whose `name` matches.
fn sheet_relationship_id(workbook_xml: &[u8], sheet_name: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(workbook_xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rid = None;
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"name" => name = Some(attr_value(&attr)),
                        b"id" => rid = Some(attr_value(&attr)),
                        _ => {}
                    }
                }
                if name.as_deref() == Some(sheet_name) {
                    return match rid {
                        Some(rid) => Ok(Some(rid)),
                        None => Err(VerifyError::InvalidWorkbook {
                            message: format!("sheet '{}' has no relationship id", sheet_name),
                        }),
                    };
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Find the `r:id` of the worksheet's `<drawing>` element, if present.
fn drawing_relationship_id(sheet_xml: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(sheet_xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().local_name().as_ref() == b"drawing" => {
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"id" {
                        return Ok(Some(attr_value(&attr)));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Parse an OPC `.rels` part into an Id → Target map.
fn parse_relationships(rels_xml: &[u8]) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_reader(rels_xml);
    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e)
                if e.name().local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"Id" => id = Some(attr_value(&attr)),
                        b"Target" => target = Some(attr_value(&attr)),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    rels.insert(id, target);
                }
            }
            Event::Eof => return Ok(rels),
            _ => {}
        }
        buf.clear();
    }
}

/// The `.rels` part describing a given part.
fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

fn parent_dir(part: &str) -> &str {
    part.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolve a relationship target against the referencing part's directory.
/// Targets may be relative (`../drawings/drawing1.xml`) or package-absolute
/// (`/xl/media/image1.png`).
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                parts.pop();
            }
            "" | "." => {}
            other => parts.push(other),
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("xl", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_target("xl/worksheets", "../drawings/drawing1.xml"),
            "xl/drawings/drawing1.xml"
        );
        assert_eq!(
            resolve_target("xl/drawings", "/xl/media/image1.png"),
            "xl/media/image1.png"
        );
    }

    #[test]
    fn test_rels_part_for() {
        assert_eq!(rels_part_for("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(
            rels_part_for("xl/worksheets/sheet1.xml"),
            "xl/worksheets/_rels/sheet1.xml.rels"
        );
    }

    #[test]
    fn test_parse_relationships() {
        let xml = br#"<?xml version="1.0"?>
            <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
                <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
                <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
            </Relationships>"#;

        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels["rId1"], "worksheets/sheet1.xml");
        assert_eq!(rels["rId2"], "styles.xml");
    }

    #[test]
    fn test_sheet_relationship_id() {
        let xml = br#"<?xml version="1.0"?>
            <workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
                      xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
                <sheets>
                    <sheet name="Summary" sheetId="1" r:id="rId1"/>
                    <sheet name="KULT MEDIA PLAN" sheetId="2" r:id="rId2"/>
                </sheets>
            </workbook>"#;

        assert_eq!(
            sheet_relationship_id(xml, "KULT MEDIA PLAN").unwrap(),
            Some("rId2".to_string())
        );
        assert_eq!(sheet_relationship_id(xml, "Missing").unwrap(), None);
    }

    #[test]
    fn test_drawing_relationship_id() {
        let xml = br#"<?xml version="1.0"?>
            <worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
                       xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
                <sheetData/>
                <drawing r:id="rId1"/>
            </worksheet>"#;

        assert_eq!(
            drawing_relationship_id(xml).unwrap(),
            Some("rId1".to_string())
        );

        let without = br#"<?xml version="1.0"?>
            <worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
                <sheetData/>
            </worksheet>"#;
        assert_eq!(drawing_relationship_id(without).unwrap(), None);
    }
}
