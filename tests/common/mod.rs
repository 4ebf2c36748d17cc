pub mod fixtures;

use quiver::{Conversion, ConversionRequest, Converter, FormatId};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Runs a conversion on a fresh default converter.
pub fn convert(data: Vec<u8>, target: FormatId) -> Result<Conversion, quiver::ConversionError> {
    Converter::default().convert(ConversionRequest::new(data, target))
}

/// Serializes a document to native QVD bytes.
pub fn qvd_bytes(doc: &quiver::Document) -> Vec<u8> {
    use quiver_formats::Saver;
    quiver_formats::qvd::QvdSaver
        .save(doc)
        .expect("QVD save is lossless")
        .bytes
}
