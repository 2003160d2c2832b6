//! Chunk planning covers `[0, S)` exactly, for any size.

use classore_admin::upload::{plan_chunks, DEFAULT_CHUNK_SIZE};

#[test]
fn chunks_partition_the_file_exactly() {
    for file_size in [1u64, 5, 9, 10, 11, 19, 20, 21, 97, 1000, 1001] {
        for chunk_size in [1u64, 3, 10, 64] {
            let chunks = plan_chunks(file_size, chunk_size);

            let mut cursor = 0u64;
            for (i, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index_number, i as u32 + 1, "indices are contiguous from 1");
                assert_eq!(chunk.start_size, cursor, "no gap or overlap at {cursor}");
                assert!(chunk.end_size > chunk.start_size, "chunks are non-empty");
                assert!(chunk.len() <= chunk_size);
                cursor = chunk.end_size;
            }
            assert_eq!(cursor, file_size, "union covers the whole file");
        }
    }
}

#[test]
fn default_chunk_size_splits_large_files() {
    let file_size = 3 * DEFAULT_CHUNK_SIZE + 1;
    let chunks = plan_chunks(file_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[3].len(), 1);
}

#[test]
fn empty_file_has_no_chunks() {
    assert!(plan_chunks(0, DEFAULT_CHUNK_SIZE).is_empty());
}
