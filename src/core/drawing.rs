use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::utils::error::Result;

/// EMU per pixel at the 96 DPI screen resolution Excel assumes.
pub const EMU_PER_PIXEL: i64 = 9525;

pub fn emu_to_pixels(emu: i64) -> u32 {
    (emu as f64 / EMU_PER_PIXEL as f64).round() as u32
}

/// The first picture found in a DrawingML part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPicture {
    pub name: Option<String>,
    /// Displayed extent in EMU, from the picture's `a:ext` or the
    /// enclosing anchor's `xdr:ext`.
    pub extent_emu: Option<(i64, i64)>,
    /// Relationship id of the backing media part (`r:embed`).
    pub embed_rid: Option<String>,
}

/// Scan a drawing part for its first `xdr:pic`.
pub fn first_picture(drawing_xml: &[u8]) -> Result<Option<EmbeddedPicture>> {
    let mut reader = Reader::from_reader(drawing_xml);
    let mut buf = Vec::new();

    // Extent set on the anchor itself (oneCellAnchor layouts); used when
    // the picture carries no xfrm extent of its own.
    let mut anchor_extent: Option<(i64, i64)> = None;
    let mut in_pic = false;
    let mut picture = EmbeddedPicture {
        name: None,
        extent_emu: None,
        embed_rid: None,
    };

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.name().local_name().as_ref() {
                b"oneCellAnchor" | b"twoCellAnchor" | b"absoluteAnchor" => {
                    anchor_extent = None;
                }
                b"pic" => {
                    in_pic = true;
                }
                b"ext" => {
                    let extent = parse_extent(&e);
                    if in_pic {
                        if picture.extent_emu.is_none() {
                            picture.extent_emu = extent;
                        }
                    } else if anchor_extent.is_none() {
                        anchor_extent = extent;
                    }
                }
                b"blip" if in_pic => {
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"embed" {
                            picture.embed_rid =
                                Some(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
                b"cNvPr" if in_pic && picture.name.is_none() => {
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"name" {
                            picture.name =
                                Some(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().local_name().as_ref() == b"pic" => {
                if picture.extent_emu.is_none() {
                    picture.extent_emu = anchor_extent;
                }
                tracing::debug!(
                    "Found picture {:?} with extent {:?} EMU",
                    picture.name,
                    picture.extent_emu
                );
                return Ok(Some(picture));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_extent(e: &BytesStart) -> Option<(i64, i64)> {
    let mut cx = None;
    let mut cy = None;
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value);
        match attr.key.local_name().as_ref() {
            b"cx" => cx = value.parse::<i64>().ok(),
            b"cy" => cy = value.parse::<i64>().ok(),
            _ => {}
        }
    }
    Some((cx?, cy?))
}
