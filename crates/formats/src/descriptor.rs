use crate::id::FormatId;
use quiver_types::Colorspace;

/// A magic byte pattern at a fixed offset in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magic {
    pub offset: usize,
    pub bytes: &'static [u8],
}

impl Magic {
    pub const fn at_start(bytes: &'static [u8]) -> Self {
        Self { offset: 0, bytes }
    }

    pub fn matches(&self, prefix: &[u8]) -> bool {
        prefix.len() >= self.offset + self.bytes.len()
            && &prefix[self.offset..self.offset + self.bytes.len()] == self.bytes
    }
}

/// Static description of one supported format.
///
/// The `can_load`/`can_save` flags reflect codecs actually registered;
/// catalogued formats without an in-core codec carry `false` for both
/// until an external plugin registers one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub id: FormatId,
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub magics: &'static [Magic],
    pub can_load: bool,
    pub can_save: bool,
    /// Whether a round-trip through this format is expected to lose
    /// document features.
    pub lossy: bool,
    /// A colorspace the format mandates; the pipeline normalizes the
    /// document to it before saving.
    pub mandated_colorspace: Option<Colorspace>,
}

impl FormatDescriptor {
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn matches_magic(&self, prefix: &[u8]) -> bool {
        self.magics.iter().any(|m| m.matches(prefix))
    }
}

/// The full format catalogue, in stable registration order. Detection
/// ties are broken by position in this list.
pub fn catalogue() -> Vec<FormatDescriptor> {
    use FormatId::*;

    // Codec-backed formats first; the native format leads so detection
    // prefers it on ambiguous input. Magic arrays sit in inline `const`
    // blocks: `Magic::at_start` calls are not rvalue-promoted, so a plain
    // `&[...]` would borrow a temporary where `'static` is required.
    let mut formats = vec![
        entry(
            Qvd,
            &["qvd"],
            const { &[Magic::at_start(b"QVD1\n")] },
            true,
            true,
            false,
            None,
        ),
        entry(
            Svg,
            &["svg"],
            const { &[Magic::at_start(b"<svg"), Magic::at_start(b"<?xml")] },
            true,
            true,
            true,
            Some(Colorspace::Rgb),
        ),
        entry(
            Svgz,
            &["svgz"],
            const { &[Magic::at_start(&[0x1f, 0x8b])] },
            true,
            true,
            true,
            Some(Colorspace::Rgb),
        ),
        entry(
            Gpl,
            &["gpl"],
            const { &[Magic::at_start(b"GIMP Palette")] },
            true,
            true,
            true,
            Some(Colorspace::Rgb),
        ),
    ];

    // Catalogued foreign formats: recognizable, codec supplied by
    // out-of-core plugins.
    let foreign: &[(FormatId, &'static [&'static str], &'static [Magic])] = &[
        (Sk2, &["sk2"], const { &[Magic::at_start(b"sK1 2")] }),
        (Sk1, &["sk1"], const { &[Magic::at_start(b"sK1 1")] }),
        (Sk, &["sk"], const { &[Magic::at_start(b"##Sketch")] }),
        (Pdf, &["pdf"], const { &[Magic::at_start(b"%PDF")] }),
        (Ps, &["ps", "eps"], const { &[Magic::at_start(b"%!PS")] }),
        (Cdr, &["cdr"], const { &[Magic::at_start(b"RIFF")] }),
        (Cdt, &["cdt"], &[]),
        (Cmx, &["cmx"], &[]),
        (Ccx, &["ccx"], &[]),
        (Xar, &["xar"], const { &[Magic::at_start(b"XARA")] }),
        (Wmf, &["wmf"], const { &[Magic::at_start(&[0xd7, 0xcd, 0xc6, 0x9a])] }),
        (Plt, &["plt", "hgl"], &[]),
        (Fig, &["fig"], const { &[Magic::at_start(b"#FIG")] }),
        (Cgm, &["cgm"], &[]),
        (Dst, &["dst"], &[]),
        (Pes, &["pes"], const { &[Magic::at_start(b"#PES")] }),
        (Png, &["png"], const { &[Magic::at_start(&[0x89, b'P', b'N', b'G'])] }),
        (Jpeg, &["jpg", "jpeg"], const { &[Magic::at_start(&[0xff, 0xd8, 0xff])] }),
        (Psd, &["psd"], const { &[Magic::at_start(b"8BPS")] }),
        (Xcf, &["xcf"], const { &[Magic::at_start(b"gimp xcf")] }),
        (
            Tiff,
            &["tif", "tiff"],
            const { &[Magic::at_start(b"II*\0"), Magic::at_start(b"MM\0*")] },
        ),
        (
            Gif,
            &["gif"],
            const { &[Magic::at_start(b"GIF87a"), Magic::at_start(b"GIF89a")] },
        ),
        (Bmp, &["bmp"], const { &[Magic::at_start(b"BM")] }),
        (Pcx, &["pcx"], const { &[Magic::at_start(&[0x0a])] }),
        (
            Ppm,
            &["ppm", "pbm", "pgm"],
            const { &[Magic::at_start(b"P6"), Magic::at_start(b"P3")] },
        ),
        (Xbm, &["xbm"], const { &[Magic::at_start(b"#define")] }),
        (Xpm, &["xpm"], const { &[Magic::at_start(b"/* XPM */")] }),
        (Webp, &["webp"], const { &[Magic { offset: 8, bytes: b"WEBP" }] }),
        (Skp, &["skp"], &[]),
        (Ase, &["ase"], const { &[Magic::at_start(b"ASEF")] }),
        (Aco, &["aco"], &[]),
        (Soc, &["soc"], &[]),
        (Cpl, &["cpl"], &[]),
        (Jcw, &["jcw"], &[]),
    ];

    for (id, extensions, magics) in foreign {
        formats.push(entry(*id, extensions, magics, false, false, true, None));
    }
    formats
}

fn entry(
    id: FormatId,
    extensions: &'static [&'static str],
    magics: &'static [Magic],
    can_load: bool,
    can_save: bool,
    lossy: bool,
    mandated_colorspace: Option<Colorspace>,
) -> FormatDescriptor {
    FormatDescriptor {
        id,
        name: id.name(),
        extensions,
        magics,
        can_load,
        can_save,
        lossy,
        mandated_colorspace,
    }
}
