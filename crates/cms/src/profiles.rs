//! Built-in device profiles.
//!
//! The original engine synthesizes sRGB/CMYK/Gray/Lab profiles on demand
//! so a document without embedded profiles still color-manages. The
//! blobs here carry a minimal valid ICC header (size + `acsp` signature)
//! and no tag table; the built-in engine only checks the header, and a
//! real ICC binding would substitute its own synthesized profiles.

use quiver_doc::ColorProfile;
use quiver_types::Colorspace;

/// Offset of the `acsp` profile-file signature in an ICC header.
const SIGNATURE_OFFSET: usize = 36;
const HEADER_LEN: usize = 128;

/// Minimal sanity check for an ICC blob: full header present and the
/// mandatory `acsp` signature in place.
pub fn looks_like_icc(data: &[u8]) -> bool {
    data.len() >= HEADER_LEN && &data[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 4] == b"acsp"
}

fn synthesize_header(space: &[u8; 4]) -> Vec<u8> {
    let mut header = vec![0u8; HEADER_LEN];
    header[0..4].copy_from_slice(&(HEADER_LEN as u32).to_be_bytes());
    // Data colorspace field at offset 16.
    header[16..20].copy_from_slice(space);
    header[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 4].copy_from_slice(b"acsp");
    header
}

/// The built-in profile for a device colorspace. Spot colors have no
/// profile of their own; they are managed through their fallbacks.
pub fn builtin_profile(space: Colorspace) -> ColorProfile {
    match space {
        Colorspace::Rgb | Colorspace::Spot => {
            ColorProfile::new("builtin-srgb", "Built-in sRGB profile", synthesize_header(b"RGB "))
        }
        Colorspace::Cmyk => ColorProfile::new(
            "builtin-cmyk",
            "Built-in CMYK profile",
            synthesize_header(b"CMYK"),
        ),
        Colorspace::Gray => ColorProfile::new(
            "builtin-gray",
            "Built-in grayscale profile",
            synthesize_header(b"GRAY"),
        ),
        Colorspace::Lab => ColorProfile::new(
            "builtin-lab",
            "Built-in L*a*b* profile",
            synthesize_header(b"Lab "),
        ),
    }
}
