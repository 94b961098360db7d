use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{GpxError, TourError};
use crate::gpx_types::*;
use crate::tour::Tour;

type Result<T> = std::result::Result<T, GpxError>;

/// Parse a GPX document into a [`Tour`] with its statistics attached.
pub fn parse_tour(xml: &str, source_id: &str) -> std::result::Result<Tour, TourError> {
    let doc = parse_gpx(xml).map_err(|e| TourError::malformed(source_id, e))?;
    Ok(Tour::from_document(doc, source_id))
}

/// Parse a GPX XML string into its raw document model.
pub fn parse_gpx(xml: &str) -> Result<GpxDocument> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    let mut data: Option<GpxDocument> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if data.is_some() {
                    return Err(GpxError::ContentOutsideRoot);
                }
                check_root(&e)?;
                data = Some(parse_root(&mut reader)?);
            }
            Ok(Event::Empty(e)) => {
                if data.is_some() {
                    return Err(GpxError::ContentOutsideRoot);
                }
                check_root(&e)?;
                data = Some(GpxDocument::default());
            }
            Ok(Event::Text(e)) => {
                if !e.as_ref().iter().all(u8::is_ascii_whitespace) {
                    return Err(GpxError::ContentOutsideRoot);
                }
            }
            Ok(Event::CData(_) | Event::GeneralRef(_) | Event::End(_)) => {
                return Err(GpxError::ContentOutsideRoot);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    data.ok_or(GpxError::MissingRoot)
}

fn check_root(e: &BytesStart<'_>) -> Result<()> {
    if e.local_name().as_ref() == b"gpx" {
        Ok(())
    } else {
        Err(GpxError::InvalidRoot(element_name(e)))
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Parse the children of <gpx>. Called after the root start tag.
fn parse_root<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxDocument> {
    let mut data = GpxDocument::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"metadata" => data.metadata = parse_metadata(reader)?,
                b"wpt" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        data.waypoints.push(pt);
                    }
                }
                b"rte" => data.routes.push(parse_route(reader)?),
                b"trk" => data.tracks.push(parse_track(reader)?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"wpt" {
                    if let Some(pt) = parse_empty_point(&e)? {
                        data.waypoints.push(pt);
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"gpx" => break,
            Ok(Event::Eof) => return Err(GpxError::UnclosedElement("gpx".into())),
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(data)
}

/// Parse the <metadata> block. Only its direct <name> and <desc> are kept;
/// <author><name> and friends are skipped.
fn parse_metadata<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxMetadata> {
    let mut metadata = GpxMetadata::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => metadata.name = Some(read_text_owned(reader, &e)?),
                b"desc" => metadata.desc = Some(read_text_owned(reader, &e)?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"metadata" => break,
            Ok(Event::Eof) => return Err(GpxError::UnclosedElement("metadata".into())),
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(metadata)
}

/// Parse a coordinate attribute. Anything that is not a finite number is rejected.
fn parse_coordinate(raw: &[u8]) -> Option<f64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(parse_number)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse lat/lon attributes from a point element's start tag.
///
/// Returns `Ok(None)` when either coordinate is missing or unusable; only a
/// syntactically broken attribute list is an error.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<Option<(f64, f64)>> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result?;
        match attr.key.local_name().as_ref() {
            b"lat" => lat = parse_coordinate(&attr.value),
            b"lon" => lon = parse_coordinate(&attr.value),
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some((lat, lon))),
        _ => {
            debug!("dropping <{}> without valid lat/lon", element_name(e));
            Ok(None)
        }
    }
}

/// Parse a self-closing point element (`<trkpt lat=".." lon=".."/>`).
fn parse_empty_point(e: &BytesStart<'_>) -> Result<Option<GpxPoint>> {
    Ok(parse_lat_lon(e)?.map(|(lat, lon)| GpxPoint::new(lat, lon)))
}

/// Parse a point element (wpt, rtept, trkpt) and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<GpxPoint>> {
    let Some((lat, lon)) = parse_lat_lon(start)? else {
        reader.read_to_end(start.name())?;
        return Ok(None);
    };

    let mut point = GpxPoint::new(lat, lon);
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = read_text_owned(reader, &e)?;
                    point.point.elevation = parse_number(&text);
                }
                b"time" => {
                    let text = read_text_owned(reader, &e)?;
                    point.point.timestamp = parse_timestamp(&text);
                }
                b"name" => point.name = Some(read_text_owned(reader, &e)?),
                b"desc" => point.desc = Some(read_text_owned(reader, &e)?),
                _ => {
                    // cmt, sym, link, extensions, GPX 1.0 speed/course...
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => {
                return Err(GpxError::UnclosedElement(element_name(start)));
            }
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(Some(point))
}

/// Parse a GPX timestamp. Zone-less values are taken as UTC.
pub(crate) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc()),
    }
}

/// Parse a <rte> element.
fn parse_route<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxRoute> {
    let mut route = GpxRoute::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => route.name = Some(read_text_owned(reader, &e)?),
                b"desc" => route.desc = Some(read_text_owned(reader, &e)?),
                b"rtept" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        route.points.push(pt);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"rtept" {
                    if let Some(pt) = parse_empty_point(&e)? {
                        route.points.push(pt);
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rte" => break,
            Ok(Event::Eof) => return Err(GpxError::UnclosedElement("rte".into())),
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(route)
}

/// Parse a <trk> element.
fn parse_track<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxTrack> {
    let mut track = GpxTrack::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => track.name = Some(read_text_owned(reader, &e)?),
                b"desc" => track.desc = Some(read_text_owned(reader, &e)?),
                b"trkseg" => {
                    let seg = parse_segment(reader)?;
                    if !seg.points.is_empty() {
                        track.segments.push(seg);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => return Err(GpxError::UnclosedElement("trk".into())),
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a <trkseg> element.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxSegment> {
    let mut segment = GpxSegment::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        segment.points.push(pt.point);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    if let Some(pt) = parse_empty_point(&e)? {
                        segment.points.push(pt.point);
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => return Err(GpxError::UnclosedElement("trkseg".into())),
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(segment)
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let raw = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(raw);
            }
            Ok(Event::CData(e)) => {
                let s = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(s);
            }
            Ok(Event::GeneralRef(e)) => {
                // Character references (&#60; &#x3C;) and predefined entities
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    let name = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                    match name {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => debug!("ignoring unknown entity &{name};"),
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => return Err(GpxError::UnclosedElement(element_name(start))),
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_waypoint() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.6762" lon="139.6503"/>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints.len(), 1);
        assert!((data.waypoints[0].point.latitude - 35.6762).abs() < 1e-10);
        assert!((data.waypoints[0].point.longitude - 139.6503).abs() < 1e-10);
        assert!(data.waypoints[0].point.elevation.is_none());
    }

    #[test]
    fn test_waypoint_with_children() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.6762" lon="139.6503">
    <ele>40.5</ele>
    <time>2025-01-01T00:00:00Z</time>
    <name>Tokyo Tower</name>
    <desc>A famous landmark</desc>
    <cmt>Comment</cmt>
    <sym>Flag</sym>
  </wpt>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        let pt = &data.waypoints[0];
        assert_eq!(pt.point.elevation, Some(40.5));
        assert_eq!(
            pt.point.timestamp.map(|t| t.to_rfc3339()),
            Some("2025-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(pt.name.as_deref(), Some("Tokyo Tower"));
        assert_eq!(pt.desc.as_deref(), Some("A famous landmark"));
    }

    #[test]
    fn test_simple_route() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <rte>
    <name>Test Route</name>
    <rtept lat="35.0" lon="139.0"><name>Start</name></rtept>
    <rtept lat="36.0" lon="140.0"/>
    <rtept lat="37.0" lon="141.0"/>
  </rte>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.routes.len(), 1);
        assert_eq!(data.routes[0].name.as_deref(), Some("Test Route"));
        assert_eq!(data.routes[0].points.len(), 3);
        assert_eq!(data.routes[0].points[0].name.as_deref(), Some("Start"));
    }

    #[test]
    fn test_simple_track() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <name>Morning Run</name>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"><ele>10.0</ele></trkpt>
      <trkpt lat="35.001" lon="139.001"><ele>11.0</ele></trkpt>
      <trkpt lat="35.002" lon="139.002"><ele>12.0</ele></trkpt>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.tracks.len(), 1);
        assert_eq!(data.tracks[0].name.as_deref(), Some("Morning Run"));
        assert_eq!(data.tracks[0].segments.len(), 1);
        assert_eq!(data.tracks[0].segments[0].points.len(), 3);
        assert_eq!(data.tracks[0].segments[0].points[2].elevation, Some(12.0));
    }

    #[test]
    fn test_multi_segment_track() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"/>
      <trkpt lat="35.001" lon="139.001"/>
    </trkseg>
    <trkseg>
      <trkpt lat="36.0" lon="140.0"/>
      <trkpt lat="36.001" lon="140.001"/>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.tracks[0].segments.len(), 2);
        assert_eq!(data.tracks[0].segments[0].points.len(), 2);
        assert_eq!(data.tracks[0].segments[1].points.len(), 2);
    }

    #[test]
    fn test_empty_gpx() {
        let xml = r#"<?xml version="1.0"?><gpx version="1.1"></gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert!(data.waypoints.is_empty());
        assert!(data.routes.is_empty());
        assert!(data.tracks.is_empty());
    }

    #[test]
    fn test_self_closing_root() {
        let data = parse_gpx(r#"<gpx version="1.1"/>"#).unwrap();
        assert!(data.tracks.is_empty());
    }

    #[test]
    fn test_empty_segment_skipped() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg></trkseg>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"/>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.tracks[0].segments.len(), 1);
        assert_eq!(data.tracks[0].segments[0].points.len(), 1);
    }

    #[test]
    fn test_extensions_skipped() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0">
        <extensions>
          <gpxtpx:TrackPointExtension xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
            <gpxtpx:hr>150</gpxtpx:hr>
          </gpxtpx:TrackPointExtension>
        </extensions>
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.tracks[0].segments[0].points.len(), 1);
    }

    #[test]
    fn test_with_namespace() {
        let xml = r#"<?xml version="1.0"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1">
  <wpt lat="35.0" lon="139.0"><name>Test</name></wpt>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints.len(), 1);
        assert_eq!(data.waypoints[0].name.as_deref(), Some("Test"));
    }

    #[test]
    fn test_cdata() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.0" lon="139.0">
    <name><![CDATA[Test & Name]]></name>
  </wpt>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints[0].name.as_deref(), Some("Test & Name"));
    }

    #[test]
    fn test_xml_entities() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.0" lon="139.0">
    <name>Caf&#233; &amp; Bar &lt;Tokyo&gt;</name>
  </wpt>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints[0].name.as_deref(), Some("Café & Bar <Tokyo>"));
    }

    #[test]
    fn test_metadata_direct_children_only() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <metadata>
    <author><name>Somebody</name></author>
    <desc>Weekend trip</desc>
  </metadata>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert!(data.metadata.name.is_none());
        assert_eq!(data.metadata.desc.as_deref(), Some("Weekend trip"));
    }

    #[test]
    fn test_point_name_does_not_name_track() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0"><name>pt</name></trkpt>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert!(data.tracks[0].name.is_none());
    }

    #[test]
    fn test_missing_lat_lon_skipped() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="35.0" lon="139.0"><name>Good</name></wpt>
  <wpt><name>Bad - no coords</name></wpt>
  <wpt lat="36.0" lon="140.0"><name>Also Good</name></wpt>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.waypoints.len(), 2);
        assert_eq!(data.waypoints[0].name.as_deref(), Some("Good"));
        assert_eq!(data.waypoints[1].name.as_deref(), Some("Also Good"));
    }

    #[test]
    fn test_non_numeric_and_non_finite_coordinates_dropped() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="abc" lon="13.0"><ele>5</ele></trkpt>
      <trkpt lat="52.0" lon="13.0"/>
      <trkpt lat="inf" lon="13.0"/>
      <trkpt lat="52.0" lon="NaN"/>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.tracks[0].segments[0].points.len(), 1);
    }

    #[test]
    fn test_invalid_elevation_and_time_are_absent() {
        let xml = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="52.0" lon="13.0"><ele>high</ele><time>yesterday</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        let pt = &data.tracks[0].segments[0].points[0];
        assert!(pt.elevation.is_none());
        assert!(pt.timestamp.is_none());
    }

    #[test]
    fn test_timestamp_formats() {
        let utc = parse_timestamp("2024-05-01T10:00:00Z").unwrap();
        let offset = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        let naive = parse_timestamp(" 2024-05-01T10:00:00 ").unwrap();
        let fractional = parse_timestamp("2024-05-01T10:00:00.500").unwrap();
        assert_eq!(utc, offset);
        assert_eq!(utc, naive);
        assert_eq!((fractional - utc).num_milliseconds(), 500);
        assert!(parse_timestamp("01/05/2024").is_none());
    }

    #[test]
    fn test_gpx10_elements_ignored() {
        let xml = r#"<?xml version="1.0"?>
<gpx xmlns="http://www.topografix.com/GPX/1/0" version="1.0">
  <trk>
    <trkseg>
      <trkpt lat="35.0" lon="139.0">
        <speed>5.5</speed>
        <course>180.0</course>
      </trkpt>
      <trkpt lat="35.001" lon="139.001"/>
    </trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(data.tracks[0].segments[0].points.len(), 2);
    }

    #[test]
    fn test_byte_order_mark() {
        let xml = "\u{feff}<?xml version=\"1.0\"?><gpx version=\"1.1\"></gpx>";
        assert!(parse_gpx(xml).is_ok());
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(parse_gpx(""), Err(GpxError::MissingRoot)));
        assert!(matches!(
            parse_gpx(r#"<?xml version="1.0"?><!-- nothing -->"#),
            Err(GpxError::MissingRoot)
        ));
    }

    #[test]
    fn test_wrong_root() {
        let err = parse_gpx("<kml><Document/></kml>").unwrap_err();
        assert!(matches!(err, GpxError::InvalidRoot(ref name) if name == "kml"));
    }

    #[test]
    fn test_plain_text_rejected() {
        assert!(matches!(
            parse_gpx("this is not xml"),
            Err(GpxError::ContentOutsideRoot)
        ));
    }

    #[test]
    fn test_unclosed_elements_rejected() {
        for xml in ["<gpx>", "<gpx><trk><trkseg>", "<gpx><wpt lat=\"1\" lon=\"2\"><name>x"] {
            assert!(
                matches!(
                    parse_gpx(xml),
                    Err(GpxError::UnclosedElement(_) | GpxError::Xml(_))
                ),
                "{xml} should be rejected"
            );
        }
    }

    #[test]
    fn test_mismatched_end_tag_rejected() {
        assert!(matches!(
            parse_gpx("<gpx><trk></rte></gpx>"),
            Err(GpxError::Xml(_))
        ));
    }

    #[test]
    fn test_second_root_rejected() {
        assert!(matches!(
            parse_gpx("<gpx></gpx><gpx></gpx>"),
            Err(GpxError::ContentOutsideRoot)
        ));
    }

    #[test]
    fn test_parse_tour_wraps_error_with_source_id() {
        let err = parse_tour("<gpx>", "broken.gpx").unwrap_err();
        assert_eq!(err.source_id(), "broken.gpx");
        assert!(err.to_string().starts_with("broken.gpx: "));
    }
}
