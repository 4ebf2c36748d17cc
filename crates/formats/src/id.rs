use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for every format the engine knows about.
///
/// The catalogue mirrors the original engine's format constants: vector
/// formats, raster formats and palette formats. Knowing about a format
/// is independent of shipping a codec for it; the registry reports the
/// actual load/save capability per format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatId {
    // Native
    Qvd,
    // Vector
    Sk2,
    Sk1,
    Sk,
    Svg,
    Svgz,
    Pdf,
    Ps,
    Cdr,
    Cdt,
    Cmx,
    Ccx,
    Xar,
    Wmf,
    Plt,
    Fig,
    Cgm,
    Dst,
    Pes,
    // Raster
    Png,
    Jpeg,
    Psd,
    Xcf,
    Tiff,
    Gif,
    Bmp,
    Pcx,
    Ppm,
    Xbm,
    Xpm,
    Webp,
    // Palette
    Skp,
    Gpl,
    Ase,
    Aco,
    Soc,
    Cpl,
    Jcw,
}

impl FormatId {
    /// Human-readable format name.
    pub fn name(&self) -> &'static str {
        match self {
            FormatId::Qvd => "Quiver document",
            FormatId::Sk2 => "sK1 2.x document",
            FormatId::Sk1 => "sK1 1.x document",
            FormatId::Sk => "Sketch document",
            FormatId::Svg => "Scalable Vector Graphics",
            FormatId::Svgz => "Compressed SVG",
            FormatId::Pdf => "Portable Document Format",
            FormatId::Ps => "PostScript",
            FormatId::Cdr => "CorelDRAW drawing",
            FormatId::Cdt => "CorelDRAW template",
            FormatId::Cmx => "Corel Presentation Exchange",
            FormatId::Ccx => "Corel Compressed Exchange",
            FormatId::Xar => "Xara drawing",
            FormatId::Wmf => "Windows Metafile",
            FormatId::Plt => "HPGL plotter file",
            FormatId::Fig => "Xfig drawing",
            FormatId::Cgm => "Computer Graphics Metafile",
            FormatId::Dst => "Tajima embroidery",
            FormatId::Pes => "Brother embroidery",
            FormatId::Png => "Portable Network Graphics",
            FormatId::Jpeg => "JPEG image",
            FormatId::Psd => "Photoshop document",
            FormatId::Xcf => "GIMP image",
            FormatId::Tiff => "Tagged Image File Format",
            FormatId::Gif => "Graphics Interchange Format",
            FormatId::Bmp => "Windows bitmap",
            FormatId::Pcx => "PCX image",
            FormatId::Ppm => "Portable pixmap",
            FormatId::Xbm => "X bitmap",
            FormatId::Xpm => "X pixmap",
            FormatId::Webp => "WebP image",
            FormatId::Skp => "sK1 palette",
            FormatId::Gpl => "GIMP palette",
            FormatId::Ase => "Adobe Swatch Exchange",
            FormatId::Aco => "Adobe color swatch",
            FormatId::Soc => "OpenOffice color palette",
            FormatId::Cpl => "CorelDRAW palette",
            FormatId::Jcw => "Xara color palette",
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
