use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::types::track::GeoPoint;

/// Raw content pulled out of a GPX document, before any metric is derived.
#[derive(Debug, Default)]
pub struct GpxDocument {
    pub name: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub points: Vec<GeoPoint>,
}

/// Text sink fed by an open element.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Capture {
    Skip,
    Name,
    Time,
    Elevation,
    PointTime,
}

#[derive(Default)]
struct Collector {
    name: Option<String>,
    time: Option<String>,
    // The first <time> of the document may sit inside a trackpoint.
    time_from_point: bool,
    point: Option<GeoPoint>,
    ele_seen: bool,
    point_time_seen: bool,
    text: String,
    points: Vec<GeoPoint>,
}

/// Streams `raw` once, keeping the first `<name>`, the first `<time>` and
/// every `<trkpt>` in document order.
pub fn read_document(raw: &str) -> Result<GpxDocument, ParseError> {
    let mut reader = Reader::from_str(raw);
    reader.trim_text(true);

    let mut c = Collector::default();
    let mut stack: Vec<Capture> = Vec::new();
    let mut saw_element = false;
    let mut root_closed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if root_closed {
                    return Err(second_root());
                }
                saw_element = true;
                let capture = c.open(&e)?;
                stack.push(capture);
            }
            Ok(Event::Empty(e)) => {
                if root_closed {
                    return Err(second_root());
                }
                saw_element = true;
                let capture = c.open(&e)?;
                c.close(capture, e.local_name().as_ref());
                root_closed = stack.is_empty();
            }
            Ok(Event::Text(e)) => {
                if stack.is_empty() && !is_blank(&e) {
                    return Err(ParseError::InvalidGpx(
                        "text outside the root element".to_string(),
                    ));
                }
                if active_sink(&stack).is_some() {
                    let text = e
                        .unescape()
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    c.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if active_sink(&stack).is_some() {
                    c.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                let capture = stack.pop().ok_or_else(|| {
                    ParseError::InvalidGpx("closing tag without matching opening tag".to_string())
                })?;
                c.close(capture, e.local_name().as_ref());
                root_closed = stack.is_empty();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
            _ => {}
        }
    }

    if !saw_element {
        return Err(ParseError::InvalidGpx("document has no root element".to_string()));
    }
    if !stack.is_empty() {
        return Err(ParseError::InvalidGpx(format!(
            "unexpected end of document with {} unclosed element(s)",
            stack.len()
        )));
    }

    Ok(GpxDocument {
        name: c.name.filter(|n| !n.is_empty()),
        time: c.time.as_deref().and_then(parse_time),
        points: c.points,
    })
}

fn second_root() -> ParseError {
    ParseError::InvalidGpx("element after the root element".to_string())
}

fn is_blank(text: &[u8]) -> bool {
    String::from_utf8_lossy(text)
        .chars()
        .all(|ch| ch.is_whitespace() || ch == '\u{feff}')
}

fn active_sink(stack: &[Capture]) -> Option<Capture> {
    stack.iter().rev().copied().find(|s| *s != Capture::Skip)
}

impl Collector {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<Capture, ParseError> {
        let in_point = self.point.is_some();

        let capture = match e.local_name().as_ref() {
            b"trkpt" => {
                self.point = Some(read_point_attributes(e)?);
                self.ele_seen = false;
                self.point_time_seen = false;
                Capture::Skip
            }
            b"name" if self.name.is_none() => Capture::Name,
            b"ele" if in_point && !self.ele_seen => {
                self.ele_seen = true;
                Capture::Elevation
            }
            b"time" if in_point && !self.point_time_seen => {
                self.point_time_seen = true;
                if self.time.is_none() && !self.time_from_point {
                    self.time_from_point = true;
                }
                Capture::PointTime
            }
            b"time" if self.time.is_none() && !self.time_from_point => Capture::Time,
            _ => Capture::Skip,
        };

        if capture != Capture::Skip {
            self.text.clear();
        }
        Ok(capture)
    }

    fn close(&mut self, capture: Capture, local_name: &[u8]) {
        match capture {
            Capture::Name => self.name = Some(self.text.trim().to_string()),
            Capture::Time => self.time = Some(self.text.trim().to_string()),
            Capture::Elevation => {
                if let Some(point) = self.point.as_mut() {
                    let text = self.text.trim();
                    // `<ele/>` reads as sea level; other junk reads as nothing.
                    point.elevation = if text.is_empty() {
                        Some(0.0)
                    } else {
                        text.parse().ok()
                    };
                }
            }
            Capture::PointTime => {
                let text = self.text.trim();
                if self.time_from_point && self.time.is_none() {
                    self.time = Some(text.to_string());
                }
                if let Some(point) = self.point.as_mut() {
                    point.time = parse_time(text);
                }
            }
            Capture::Skip => {}
        }

        if capture != Capture::Skip {
            self.text.clear();
        }

        if local_name == b"trkpt" {
            if let Some(point) = self.point.take() {
                self.points.push(point);
            }
        }
    }
}

fn read_point_attributes(e: &BytesStart<'_>) -> Result<GeoPoint, ParseError> {
    let mut point = GeoPoint::new(0.0, 0.0);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        // Missing or unreadable coordinates stay at 0.
        match attr.key.local_name().as_ref() {
            b"lat" => point.lat = value.trim().parse().unwrap_or(0.0),
            b"lon" => point.lon = value.trim().parse().unwrap_or(0.0),
            _ => {}
        }
    }

    Ok(point)
}

/// RFC 3339 first; a timestamp without an offset is taken as UTC.
fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    text.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| text.parse::<NaiveDateTime>().ok().map(|t| t.and_utc()))
}
