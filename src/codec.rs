//! Import key encoding
//!
//! A composition is written as a versioned JSON record list, compressed with
//! raw DEFLATE and rendered as unpadded URL-safe base64 (`[A-Za-z0-9_-]`).
//! Only each shape's type, name, parameters and manipulate flag are stored;
//! points are regenerated on decode.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use serde::{Deserialize, Serialize};

use crate::composition::{Composition, ShapeSpec};
use crate::errors::CodecError;
use crate::shape::{Generator, Parameters, Shape, ShapeRegistry};

/// Format version written by [`encode`] and accepted by [`decode`]
pub const FORMAT_VERSION: u32 = 1;

/// Decompressed payloads larger than this are rejected
const MAX_PAYLOAD_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    v: u32,
    shapes: Vec<ShapeRecord>,
}

/// Just the version, read before committing to a payload layout
#[derive(Deserialize)]
struct Envelope {
    v: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ShapeRecord {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    params: Parameters,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    manipulate: bool,
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        Self {
            tag: shape.kind().tag().to_string(),
            name: Some(shape.name().to_string()),
            params: shape.parameters().clone(),
            manipulate: shape.is_manipulate(),
        }
    }
}

impl ShapeRecord {
    fn into_spec(self, index: usize, registry: &ShapeRegistry) -> Result<ShapeSpec, CodecError> {
        let kind = registry.get(&self.tag).ok_or_else(|| CodecError::UnknownShapeType {
            index,
            tag: self.tag.clone(),
        })?;
        let mut spec = ShapeSpec::new(kind)
            .with_parameters(self.params)
            .manipulate(self.manipulate);
        spec.name = self.name;
        Ok(spec)
    }
}

fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Encode a composition's shapes into an import key
pub fn encode(composition: &Composition) -> String {
    let payload = Payload {
        v: FORMAT_VERSION,
        shapes: composition.shapes().iter().map(ShapeRecord::from).collect(),
    };
    // Records hold only strings, finite numbers and bools.
    let json = serde_json::to_vec(&payload).expect("shape records always serialize");
    let packed = compress(&json).expect("compressing into memory cannot fail");
    let token = URL_SAFE_NO_PAD.encode(packed);
    crate::log::debug!(shapes = payload.shapes.len(), json = json.len(), token = token.len(), "encoded import key");
    token
}

/// Undo base64 and DEFLATE, then parse the versioned record list
fn read_records(token: &str) -> Result<Vec<ShapeRecord>, CodecError> {
    let packed = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| CodecError::CorruptToken { reason: e.to_string() })?;

    let mut json = Vec::new();
    DeflateDecoder::new(packed.as_slice())
        .take(MAX_PAYLOAD_BYTES + 1)
        .read_to_end(&mut json)
        .map_err(|e| CodecError::CorruptToken { reason: e.to_string() })?;
    if json.len() as u64 > MAX_PAYLOAD_BYTES {
        return Err(CodecError::MalformedPayload {
            reason: format!("payload exceeds {} bytes", MAX_PAYLOAD_BYTES),
        });
    }

    let envelope: Envelope = serde_json::from_slice(&json)
        .map_err(|e| CodecError::MalformedPayload { reason: e.to_string() })?;
    if envelope.v != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            version: envelope.v,
            supported: FORMAT_VERSION,
        });
    }

    let payload: Payload = serde_json::from_slice(&json)
        .map_err(|e| CodecError::MalformedPayload { reason: e.to_string() })?;
    Ok(payload.shapes)
}

/// Decode an import key into a fresh composition.
///
/// The first unknown or invalid shape record aborts the whole decode.
pub fn decode(token: &str, registry: &ShapeRegistry) -> Result<Composition, CodecError> {
    let mut composition = Composition::new();
    for (index, record) in read_records(token)?.into_iter().enumerate() {
        let tag = record.tag.clone();
        let spec = record.into_spec(index, registry)?;
        composition
            .add(spec)
            .map_err(|source| CodecError::InvalidShape { index, tag, source })?;
    }
    crate::log::debug!(shapes = composition.len(), "decoded import key");
    Ok(composition)
}

/// Decode an import key, skipping shape records that cannot be built.
///
/// Fails only when the token itself is unreadable; skipped records are
/// returned alongside the composition.
pub fn decode_lenient(
    token: &str,
    registry: &ShapeRegistry,
) -> Result<(Composition, Vec<CodecError>), CodecError> {
    let mut composition = Composition::new();
    let mut skipped = Vec::new();
    for (index, record) in read_records(token)?.into_iter().enumerate() {
        let tag = record.tag.clone();
        let result = record.into_spec(index, registry).and_then(|spec| {
            composition
                .add(spec)
                .map(|_| ())
                .map_err(|source| CodecError::InvalidShape { index, tag, source })
        });
        if let Err(err) = result {
            crate::log::warn!(index, error = %err, "skipping shape record");
            skipped.push(err);
        }
    }
    if !skipped.is_empty() {
        crate::log::info!(kept = composition.len(), skipped = skipped.len(), "partial import");
    }
    Ok((composition, skipped))
}
