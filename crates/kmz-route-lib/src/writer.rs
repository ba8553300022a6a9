//! Styled KML rendering
//!
//! Every route becomes one `Placemark` holding a `Polygon` whose outer boundary is the
//! route's closed ring. The document model sits behind [`DocumentBuilder`] so the pipeline
//! does not depend on how a document is laid out or stored.

use crate::{Report, Reporter, Result, RouteCollection, RouteError};
use geo::LineString;
use std::fmt;
use std::path::Path;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

/// Namespace of KML 2.2 documents
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Hot pink (#FF69B4), fully opaque
pub const HOT_PINK: KmlColor = KmlColor::rgb(0xFF, 0x69, 0xB4);

/// Alpha of the highlight fill (out of 255)
pub const HIGHLIGHT_FILL_ALPHA: u8 = 100;

/// Outline width of the highlight style
pub const HIGHLIGHT_OUTLINE_WIDTH: f64 = 2.0;

/// Color with alpha, rendered in KML's `aabbggrr` hex order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmlColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl KmlColor {
    /// Opaque color from its RGB components
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: u8::MAX,
        }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }
}

impl fmt::Display for KmlColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}",
            self.alpha, self.blue, self.green, self.red
        )
    }
}

/// Fill and outline style of a polygon
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub fill_color: KmlColor,
    pub fill: bool,
    pub outline_color: KmlColor,
    pub outline_width: f64,
}

impl PolygonStyle {
    /// Highlighter look: semi-transparent hot pink fill with an opaque hot pink outline
    pub fn highlight() -> Self {
        Self {
            fill_color: HOT_PINK.with_alpha(HIGHLIGHT_FILL_ALPHA),
            fill: true,
            outline_color: HOT_PINK,
            outline_width: HIGHLIGHT_OUTLINE_WIDTH,
        }
    }
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self::highlight()
    }
}

/// Minimal capability needed to produce the output document
pub trait DocumentBuilder {
    /// Append one labelled polygon; `boundary` is expected to be a closed ring
    fn add_polygon(&mut self, boundary: &LineString<f64>, label: &str, style: &PolygonStyle);

    /// Persist the document at `path`, replacing any existing file
    fn save(&self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
struct Placemark {
    label: String,
    style_index: usize,
    boundary: LineString<f64>,
}

/// In-memory KML document
///
/// Identical styles are emitted once as a shared `<Style>` and referenced by id.
#[derive(Debug, Clone, Default)]
pub struct KmlDocument {
    name: Option<String>,
    styles: Vec<PolygonStyle>,
    placemarks: Vec<Placemark>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl KmlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with a `<name>` shown by viewers as the layer title
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Number of polygons added so far
    #[inline]
    pub fn len(&self) -> usize {
        self.placemarks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placemarks.is_empty()
    }

    /// Render the document to KML bytes
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .create_writer(Vec::new());

        writer.write(XmlEvent::start_element("kml").default_ns(KML_NAMESPACE))?;
        writer.write(XmlEvent::start_element("Document"))?;
        if let Some(name) = &self.name {
            write_text_element(&mut writer, "name", name)?;
        }

        for (index, style) in self.styles.iter().enumerate() {
            let id = style_id(index);
            writer.write(XmlEvent::start_element("Style").attr("id", &id))?;

            writer.write(XmlEvent::start_element("LineStyle"))?;
            write_text_element(&mut writer, "color", &style.outline_color.to_string())?;
            write_text_element(&mut writer, "width", &style.outline_width.to_string())?;
            writer.write(XmlEvent::end_element())?;

            writer.write(XmlEvent::start_element("PolyStyle"))?;
            write_text_element(&mut writer, "color", &style.fill_color.to_string())?;
            write_text_element(&mut writer, "fill", if style.fill { "1" } else { "0" })?;
            writer.write(XmlEvent::end_element())?;

            writer.write(XmlEvent::end_element())?;
        }

        for placemark in &self.placemarks {
            writer.write(XmlEvent::start_element("Placemark"))?;
            write_text_element(&mut writer, "name", &placemark.label)?;
            write_text_element(
                &mut writer,
                "styleUrl",
                &format!("#{}", style_id(placemark.style_index)),
            )?;
            writer.write(XmlEvent::start_element("Polygon"))?;
            writer.write(XmlEvent::start_element("outerBoundaryIs"))?;
            writer.write(XmlEvent::start_element("LinearRing"))?;
            write_text_element(&mut writer, "coordinates", &format_coordinates(&placemark.boundary))?;
            writer.write(XmlEvent::end_element())?; // LinearRing
            writer.write(XmlEvent::end_element())?; // outerBoundaryIs
            writer.write(XmlEvent::end_element())?; // Polygon
            writer.write(XmlEvent::end_element())?; // Placemark
        }

        writer.write(XmlEvent::end_element())?; // Document
        writer.write(XmlEvent::end_element())?; // kml
        Ok(writer.into_inner())
    }
}

impl DocumentBuilder for KmlDocument {
    fn add_polygon(&mut self, boundary: &LineString<f64>, label: &str, style: &PolygonStyle) {
        let style_index = match self.styles.iter().position(|s| s == style) {
            Some(index) => index,
            None => {
                self.styles.push(style.clone());
                self.styles.len() - 1
            }
        };
        self.placemarks.push(Placemark {
            label: label.to_string(),
            style_index,
            boundary: boundary.clone(),
        });
    }

    fn save(&self, path: &Path) -> Result<()> {
        // Rendered fully before touching the file, so a failure never leaves a partial document
        let data = self.render()?;
        std::fs::write(path, data).map_err(|source| RouteError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn style_id(index: usize) -> String {
    format!("highlight-{index}")
}

fn write_text_element<W: std::io::Write>(
    writer: &mut EventWriter<W>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer.write(XmlEvent::start_element(name))?;
    writer.write(XmlEvent::characters(text))?;
    writer.write(XmlEvent::end_element())?;
    Ok(())
}

/// KML `lon,lat,alt` tuples, altitude pinned to ground level
fn format_coordinates(line: &LineString<f64>) -> String {
    line.0
        .iter()
        .map(|c| format!("{},{},0", c.x, c.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Add every route of the collection to `builder`, in order, then save it
///
/// Each polygon's boundary is the route's closed ring and its label is [`crate::Route::label`].
pub fn write_collection<B: DocumentBuilder + ?Sized>(
    collection: &RouteCollection,
    builder: &mut B,
    style: &PolygonStyle,
    path: &Path,
) -> Result<()> {
    #[cfg(feature = "profiling")]
    profiling::scope!("writer::write_collection");

    for route in collection {
        builder.add_polygon(&route.boundary(), &route.label(), style);
    }
    builder.save(path)
}

/// Write the collection as a highlight KML document at `path`
///
/// The document is named after the output file. Any existing file at `path` is replaced.
pub fn write_kml(collection: &RouteCollection, path: &Path, reporter: &dyn Reporter) -> Result<()> {
    let mut document = match path.file_stem() {
        Some(stem) => KmlDocument::with_name(stem.to_string_lossy()),
        None => KmlDocument::new(),
    };
    write_collection(collection, &mut document, &PolygonStyle::highlight(), path)?;
    reporter.report(Report::Saved {
        path,
        polygons: document.len(),
    });
    Ok(())
}
