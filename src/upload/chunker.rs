//! Fixed-size byte-range planning for chunked uploads

/// Default chunk size: 5 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// One planned byte range of a file.
///
/// `index_number` is 1-based, matching the sequence convention of the rest of
/// the data model. The range is `[start_size, end_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    pub index_number: u32,
    pub start_size: u64,
    pub end_size: u64,
}

impl ChunkSpec {
    pub fn len(&self) -> u64 {
        self.end_size - self.start_size
    }

    pub fn is_empty(&self) -> bool {
        self.end_size == self.start_size
    }
}

/// Plan the chunk list for `file_size` bytes.
///
/// The returned ranges exactly partition `[0, file_size)`: no gaps, no
/// overlaps, indices contiguous from 1. An empty file yields no chunks.
pub fn plan_chunks(file_size: u64, chunk_size: u64) -> Vec<ChunkSpec> {
    assert!(chunk_size > 0, "chunk size must be positive");
    let mut chunks = Vec::new();
    let mut start = 0u64;
    let mut index = 1u32;
    while start < file_size {
        let end = (start + chunk_size).min(file_size);
        chunks.push(ChunkSpec {
            index_number: index,
            start_size: start,
            end_size: end,
        });
        start = end;
        index += 1;
    }
    chunks
}
