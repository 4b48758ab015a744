//! Structured, recursively serializable message values.
//!
//! Every announcement, challenge and response has a canonical byte encoding
//! produced by its [`SigmaProtocol`](crate::traits::SigmaProtocol). When messages
//! of different protocols have to travel together (e.g. one round of the
//! [`two_party`](crate::two_party) runtime), they are wrapped in a
//! [`Representation`]: a byte string, a list, or a string-keyed map.
//!
//! The module also provides the length-prefixed framing used by composite
//! protocols to concatenate the encodings of their branches unambiguously.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// A structured value: scalar bytes, ordered list, or object keyed by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    Bytes(Vec<u8>),
    List(Vec<Representation>),
    Map(BTreeMap<String, Representation>),
}

impl Representation {
    /// An empty object.
    pub fn empty_map() -> Self {
        Representation::Map(BTreeMap::new())
    }

    pub fn as_bytes(&self) -> Result<&[u8], Error> {
        match self {
            Representation::Bytes(bytes) => Ok(bytes),
            _ => Err(Error::UnexpectedRepresentation { expected: "bytes" }),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self {
            Representation::Bytes(bytes) => Ok(bytes),
            _ => Err(Error::UnexpectedRepresentation { expected: "bytes" }),
        }
    }

    pub fn into_list(self) -> Result<Vec<Representation>, Error> {
        match self {
            Representation::List(items) => Ok(items),
            _ => Err(Error::UnexpectedRepresentation { expected: "list" }),
        }
    }

    pub fn into_map(self) -> Result<BTreeMap<String, Representation>, Error> {
        match self {
            Representation::Map(entries) => Ok(entries),
            _ => Err(Error::UnexpectedRepresentation { expected: "map" }),
        }
    }
}

impl From<Vec<u8>> for Representation {
    fn from(bytes: Vec<u8>) -> Self {
        Representation::Bytes(bytes)
    }
}

impl From<&[u8]> for Representation {
    fn from(bytes: &[u8]) -> Self {
        Representation::Bytes(bytes.to_vec())
    }
}

/// Largest payload a single frame can carry.
pub const MAX_FRAME_LEN: usize = u32::MAX as usize;

/// Appends `data` to `out`, prefixed with its length as a big-endian `u32`.
///
/// `data` must not exceed [`MAX_FRAME_LEN`] bytes. Every message in this crate is
/// a fixed number of group elements, scalars or nested frames, far below the limit.
pub fn write_frame(out: &mut Vec<u8>, data: &[u8]) {
    debug_assert!(data.len() <= MAX_FRAME_LEN, "frame of {} bytes", data.len());
    let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(data);
}

/// Concatenates several frames.
pub fn frames<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        write_frame(&mut out, part);
    }
    out
}

/// Cursor over a byte string made of [`write_frame`] frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameReader<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Reads the next frame, failing with [`Error::InvalidEncoding`] if truncated.
    pub fn next_frame(&mut self, what: &'static str) -> Result<&'a [u8], Error> {
        if self.bytes.len() < 4 {
            return Err(Error::InvalidEncoding(what));
        }
        let (len, rest) = self.bytes.split_at(4);
        let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize;
        if rest.len() < len {
            return Err(Error::InvalidEncoding(what));
        }
        let (frame, rest) = rest.split_at(len);
        self.bytes = rest;
        Ok(frame)
    }

    /// Succeeds only if every byte has been consumed.
    pub fn finish(self, what: &'static str) -> Result<(), Error> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidEncoding(what))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_read_back_in_order() {
        let encoded = frames([&b"abc"[..], &[][..], &[7u8; 300][..]]);
        let mut reader = FrameReader::new(&encoded);
        assert_eq!(reader.next_frame("a").unwrap(), b"abc");
        assert!(reader.next_frame("b").unwrap().is_empty());
        assert_eq!(reader.next_frame("c").unwrap().len(), 300);
        reader.finish("all").unwrap();
    }

    #[test]
    fn frame_layout_is_big_endian_length_prefixed() {
        let encoded = frames([&b"ab"[..], &[][..]]);
        assert_eq!(hex::encode(encoded), "00000002616200000000");
    }

    #[test]
    fn frames_longer_than_u16_keep_their_length() {
        let payload = vec![0xab; 70_000];
        let encoded = frames([payload.as_slice()]);
        assert_eq!(&encoded[..4], &70_000u32.to_be_bytes());
        let mut reader = FrameReader::new(&encoded);
        assert_eq!(reader.next_frame("large").unwrap(), payload.as_slice());
        reader.finish("large").unwrap();
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let mut encoded = frames([&b"abcdef"[..]]);
        encoded.pop();
        let mut reader = FrameReader::new(&encoded);
        assert!(matches!(
            reader.next_frame("frame"),
            Err(Error::InvalidEncoding("frame"))
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut encoded = frames([&b"x"[..]]);
        encoded.push(0);
        let mut reader = FrameReader::new(&encoded);
        reader.next_frame("x").unwrap();
        assert!(reader.finish("trailer").is_err());
    }

    #[test]
    fn wrong_shape_is_a_configuration_error() {
        let value = Representation::List(vec![]);
        assert!(matches!(
            value.as_bytes(),
            Err(Error::UnexpectedRepresentation { expected: "bytes" })
        ));
    }

    #[test]
    fn representation_roundtrips_through_json() {
        let mut map = BTreeMap::new();
        map.insert("pok".to_string(), Representation::from(vec![1u8, 2, 3]));
        map.insert(
            "list".to_string(),
            Representation::List(vec![Representation::empty_map()]),
        );
        let value = Representation::Map(map);
        let json = serde_json::to_string(&value).unwrap();
        let back: Representation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
