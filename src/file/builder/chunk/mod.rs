#![doc = r#"
Contains types for MIDI file chunks

# Overview

A MIDI file is a sequence of chunks, each a 4-character ASCII tag, a 32-bit
big-endian length, and that many bytes of data.

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
...
[Track Chunk N: "MTrk"]
```

The header chunk is read directly into a [`Header`](crate::file::Header).
Track chunks are first split off as [`RawTrackChunk`]s, which only know
where their bytes are, and then parsed into [`Track`](crate::file::Track)s.
Since every chunk is delimited by its length, the second step can happen
for all tracks at once.
"#]

mod track;
pub use track::*;
