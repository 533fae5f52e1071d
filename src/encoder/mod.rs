pub mod flight_plan;
pub mod gpx;
pub mod kml;
pub mod xlsx;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::ConvertError;
use crate::options::{CoordinateFormat, OutputFormat};
use crate::waypoint_types::Waypoint;

type Result<T> = std::result::Result<T, ConvertError>;

/// A serialized output document.
#[derive(Debug, Clone)]
pub struct EncodedDocument {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
}

/// Encode one chunk of waypoints in the requested format.
///
/// `created` is only written by the flight-plan format and
/// `coordinate_format` only affects spreadsheet output.
pub fn encode_chunk(
    format: OutputFormat,
    waypoints: &[Waypoint],
    route_name: &str,
    coordinate_format: CoordinateFormat,
    created: DateTime<Utc>,
) -> Result<EncodedDocument> {
    let bytes = match format {
        OutputFormat::FlightPlan => flight_plan::encode(waypoints, route_name, created)?,
        OutputFormat::Kml => kml::encode(waypoints, route_name)?,
        OutputFormat::Gpx => gpx::encode(waypoints, route_name)?,
        OutputFormat::Spreadsheet => xlsx::encode(waypoints, route_name, coordinate_format)?,
    };

    Ok(EncodedDocument {
        bytes,
        mime_type: format.mime_type(),
        extension: format.extension(),
    })
}

/// An XML document under construction, starting with its declaration.
pub(crate) struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    /// Indented with two spaces per level.
    pub(crate) fn pretty(standalone: Option<&str>) -> Result<Self> {
        Self::with_writer(Writer::new_with_indent(Vec::new(), b' ', 2), standalone)
    }

    /// No whitespace between elements.
    pub(crate) fn compact(standalone: Option<&str>) -> Result<Self> {
        Self::with_writer(Writer::new(Vec::new()), standalone)
    }

    fn with_writer(mut writer: Writer<Vec<u8>>, standalone: Option<&str>) -> Result<Self> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), standalone)))?;
        Ok(Self { writer })
    }

    pub(crate) fn open(&mut self, start: BytesStart<'_>) -> Result<()> {
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    pub(crate) fn open_tag(&mut self, name: &str) -> Result<()> {
        self.open(BytesStart::new(name))
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn empty(&mut self, start: BytesStart<'_>) -> Result<()> {
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// `<name>text</name>` on a single line.
    pub(crate) fn leaf(&mut self, name: &str, text: &str) -> Result<()> {
        self.open_tag(name)?;
        self.text(text)?;
        self.close(name)
    }

    /// Document bytes, terminated by a newline.
    pub(crate) fn finish(self) -> Vec<u8> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_written_once() {
        let mut doc = XmlDocument::pretty(Some("no")).unwrap();
        doc.open_tag("root").unwrap();
        doc.leaf("child", "a & b").unwrap();
        doc.close("root").unwrap();
        let xml = String::from_utf8(doc.finish()).unwrap();

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
             <root>\n  <child>a &amp; b</child>\n</root>\n"
        );
        assert_eq!(xml.matches("<?xml").count(), 1);
    }

    #[test]
    fn test_declaration_without_standalone() {
        let mut doc = XmlDocument::compact(None).unwrap();
        doc.empty(BytesStart::new("root")).unwrap();
        let xml = String::from_utf8(doc.finish()).unwrap();
        assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><root/>\n");
    }

    #[test]
    fn test_encode_chunk_metadata() {
        let waypoints = vec![Waypoint::new(1.0, 2.0, "A")];
        let created = DateTime::<Utc>::UNIX_EPOCH;
        for format in [
            OutputFormat::FlightPlan,
            OutputFormat::Kml,
            OutputFormat::Gpx,
            OutputFormat::Spreadsheet,
        ] {
            let doc =
                encode_chunk(format, &waypoints, "R", CoordinateFormat::Decimal, created).unwrap();
            assert_eq!(doc.mime_type, format.mime_type());
            assert_eq!(doc.extension, format.extension());
            assert!(!doc.bytes.is_empty());
        }
    }
}
