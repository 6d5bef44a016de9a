use std::ops::Range;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::TransferError;
use crate::types::{Chunk, FileSource, UploadFile};

// ---------------------------------------------------------------------------
// Splitter
// ---------------------------------------------------------------------------

/// Half-open byte range `[start, end)` for one chunk of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// 0-based chunk index.
    pub index: u32,
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    /// Length of the range in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<u64> {
        self.start..self.end
    }
}

/// Number of chunks needed for `size` bytes: `ceil(size / chunk_size)`.
pub fn total_chunks(size: u64, chunk_size: usize) -> Result<u32, TransferError> {
    if chunk_size == 0 {
        return Err(TransferError::InvalidChunkSize);
    }
    let chunk = chunk_size as u64;
    Ok(size.div_ceil(chunk) as u32)
}

/// Partitions `[0, size)` into contiguous ranges of `chunk_size` bytes.
///
/// The last range holds the remainder (`size % chunk_size`, or a full chunk
/// when `size` is an exact multiple). A zero-byte file yields no ranges.
pub fn split_ranges(size: u64, chunk_size: usize) -> Result<Vec<ChunkRange>, TransferError> {
    let count = total_chunks(size, chunk_size)?;
    let chunk = chunk_size as u64;
    Ok((0..count)
        .map(|index| {
            let start = index as u64 * chunk;
            ChunkRange {
                index,
                start,
                end: (start + chunk).min(size),
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

enum ReaderSource {
    File(tokio::fs::File),
    Memory(Arc<Vec<u8>>),
}

/// Reads an [`UploadFile`] chunk by chunk, in index order.
///
/// Only the current chunk's bytes are held in memory.
pub struct ChunkReader {
    source: ReaderSource,
    ranges: Vec<ChunkRange>,
    next: usize,
}

impl ChunkReader {
    /// Opens `file` for chunked reading.
    ///
    /// An empty file still produces a single empty chunk so the server sees
    /// one request for it.
    pub async fn open(file: &UploadFile, chunk_size: usize) -> Result<Self, TransferError> {
        let mut ranges = split_ranges(file.size, chunk_size)?;
        if ranges.is_empty() {
            ranges.push(ChunkRange {
                index: 0,
                start: 0,
                end: 0,
            });
        }

        let source = match &file.source {
            FileSource::Path(path) => ReaderSource::File(tokio::fs::File::open(path).await?),
            FileSource::Memory(data) => ReaderSource::Memory(Arc::clone(data)),
        };

        Ok(Self {
            source,
            ranges,
            next: 0,
        })
    }

    /// Number of chunks that will be sent for this file (at least 1).
    pub fn total_chunks(&self) -> u32 {
        self.ranges.len() as u32
    }

    /// Reads the next chunk. Returns `None` after the last one.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        let Some(range) = self.ranges.get(self.next).copied() else {
            return Ok(None);
        };

        let data = match &mut self.source {
            ReaderSource::File(file) => {
                let mut buf = vec![0u8; range.len() as usize];
                file.seek(std::io::SeekFrom::Start(range.start)).await?;
                file.read_exact(&mut buf).await?;
                buf
            }
            ReaderSource::Memory(bytes) => {
                let end = (range.end as usize).min(bytes.len());
                let start = (range.start as usize).min(end);
                if end - start != range.len() as usize {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "file is shorter than its declared size",
                    )
                    .into());
                }
                bytes[start..end].to_vec()
            }
        };

        self.next += 1;
        Ok(Some(Chunk {
            index: range.index,
            total: self.total_chunks(),
            range,
            data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MIB2: usize = 2 * 1024 * 1024;

    #[test]
    fn five_million_bytes_split_into_three() {
        let ranges = split_ranges(5_000_000, MIB2).unwrap();
        let lens: Vec<u64> = ranges.iter().map(|r| r.len()).collect();
        assert_eq!(lens, vec![2_097_152, 2_097_152, 805_696]);
    }

    #[test]
    fn ranges_are_contiguous_and_cover_file() {
        for size in [1u64, 10, 2_097_151, 2_097_152, 2_097_153, 9_999_999] {
            let ranges = split_ranges(size, MIB2).unwrap();
            assert_eq!(ranges.len() as u64, size.div_ceil(MIB2 as u64));
            assert_eq!(ranges[0].start, 0);
            assert_eq!(ranges.last().unwrap().end, size);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert_eq!(pair[0].index + 1, pair[1].index);
            }
            let total: u64 = ranges.iter().map(|r| r.len()).sum();
            assert_eq!(total, size);
        }
    }

    #[test]
    fn exact_multiple_has_full_last_chunk() {
        let ranges = split_ranges(4 * 1024 * 1024, MIB2).unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].len(), MIB2 as u64);
    }

    #[test]
    fn zero_size_yields_no_ranges() {
        assert!(split_ranges(0, MIB2).unwrap().is_empty());
        assert_eq!(total_chunks(0, MIB2).unwrap(), 0);
    }

    #[test]
    fn zero_chunk_size_rejected() {
        assert!(matches!(
            split_ranges(10, 0),
            Err(TransferError::InvalidChunkSize)
        ));
    }

    #[tokio::test]
    async fn reader_yields_memory_chunks_in_order() {
        let file = UploadFile::from_bytes("a.pdf", "application/pdf", b"AABBCCDDEE".to_vec());
        let mut reader = ChunkReader::open(&file, 4).await.unwrap();
        assert_eq!(reader.total_chunks(), 3);

        let c0 = reader.next_chunk().await.unwrap().unwrap();
        assert_eq!((c0.index, c0.total), (0, 3));
        assert_eq!(c0.data, b"AABB");

        let c1 = reader.next_chunk().await.unwrap().unwrap();
        assert_eq!(c1.data, b"CCDD");

        let c2 = reader.next_chunk().await.unwrap().unwrap();
        assert_eq!(c2.index, 2);
        assert_eq!(c2.range.start, 8);
        assert_eq!(c2.data, b"EE");

        assert!(reader.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reader_reads_ranges_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"0123456789").unwrap();
        drop(f);

        let file = UploadFile::from_path(&path).unwrap();
        let mut reader = ChunkReader::open(&file, 6).await.unwrap();

        let mut collected = Vec::new();
        while let Some(chunk) = reader.next_chunk().await.unwrap() {
            collected.extend_from_slice(&chunk.data);
        }
        assert_eq!(collected, b"0123456789");
    }

    #[tokio::test]
    async fn reader_sends_single_empty_chunk_for_empty_file() {
        let file = UploadFile::from_bytes("empty.pdf", "application/pdf", Vec::new());
        let mut reader = ChunkReader::open(&file, MIB2).await.unwrap();
        assert_eq!(reader.total_chunks(), 1);
        let c = reader.next_chunk().await.unwrap().unwrap();
        assert!(c.data.is_empty());
        assert!(reader.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reader_detects_truncated_source() {
        let mut file = UploadFile::from_bytes("short.pdf", "application/pdf", b"abc".to_vec());
        file.size = 8;
        let mut reader = ChunkReader::open(&file, 4).await.unwrap();
        assert!(reader.next_chunk().await.is_err());
    }
}
