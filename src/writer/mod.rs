#![doc = r#"
Encoding into Standard MIDI File bytes.

[`TrackWriter`] turns events into the body of a track chunk, applying running
status. [`MidiWriter`] owns a set of track writers and joins them behind a
header chunk. Values that the format cannot hold are rejected with a
[`WriteError`] before anything is written.
"#]

mod error;
pub use error::*;

mod file;
pub use file::*;

mod track;
pub use track::*;

use alloc::vec::Vec;

use crate::ChunkTag;

/// Prefixes `body` with a chunk tag and its big-endian length.
pub fn write_chunk(tag: ChunkTag, body: &[u8]) -> WriteResult<Vec<u8>> {
    let len = u32::try_from(body.len()).map_err(|_| WriteError::ChunkTooLarge(body.len()))?;
    let mut chunk = Vec::with_capacity(8 + body.len());
    chunk.extend_from_slice(&tag.0);
    chunk.extend_from_slice(&len.to_be_bytes());
    chunk.extend_from_slice(body);
    Ok(chunk)
}

#[test]
fn chunk_length_counts_only_the_body() {
    use pretty_assertions::assert_eq;
    let chunk = write_chunk(ChunkTag::TRACK, &[1, 2, 3]).unwrap();
    assert_eq!(chunk, [b'M', b'T', b'r', b'k', 0, 0, 0, 3, 1, 2, 3]);
}
