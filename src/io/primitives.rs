//! Timed I/O primitives
//!
//! Each operation runs against a caller-supplied scratch file and returns the
//! measured throughput in MB/s. Errors are returned to the caller, which
//! decides how a failed phase is recorded.

use crate::util::units::calculate_throughput_mbps;
use crate::BLOCK_SIZE;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// The four timed operations the engine runs every iteration
pub trait IoPrimitives: Send + Sync {
    /// Write `size_bytes` contiguously, replacing the file contents
    fn sequential_write(&self, size_bytes: u64, path: &Path) -> io::Result<f64>;

    /// Read the whole file; throughput uses the on-disk size
    fn sequential_read(&self, path: &Path) -> io::Result<f64>;

    /// `size_bytes / 4096` block writes at random offsets in `[0, size_bytes)`;
    /// throughput uses the configured size
    fn random_write(&self, size_bytes: u64, path: &Path) -> io::Result<f64>;

    /// `file_size / 4096` block reads at random offsets in `[0, file_size)`;
    /// throughput uses the on-disk size
    fn random_read(&self, path: &Path) -> io::Result<f64>;
}

/// Buffered file I/O against the OS page cache
#[derive(Debug, Clone, Copy, Default)]
pub struct FileIo;

impl FileIo {
    pub fn new() -> Self {
        Self
    }
}

impl IoPrimitives for FileIo {
    fn sequential_write(&self, size_bytes: u64, path: &Path) -> io::Result<f64> {
        let payload = zeroed_buffer(size_bytes)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let start = Instant::now();
        file.write_all(&payload)?;
        let elapsed = start.elapsed();

        debug!(bytes = size_bytes, ?elapsed, "sequential write finished");
        Ok(calculate_throughput_mbps(size_bytes, elapsed))
    }

    fn sequential_read(&self, path: &Path) -> io::Result<f64> {
        let file_size = fs::metadata(path)?.len();
        let mut file = File::open(path)?;
        let mut buffer = reserve_buffer(file_size)?;

        let start = Instant::now();
        file.read_to_end(&mut buffer)?;
        let elapsed = start.elapsed();

        debug!(bytes = file_size, read = buffer.len(), ?elapsed, "sequential read finished");
        Ok(calculate_throughput_mbps(file_size, elapsed))
    }

    fn random_write(&self, size_bytes: u64, path: &Path) -> io::Result<f64> {
        let mut file = OpenOptions::new().write(true).open(path)?;
        let block = [0u8; BLOCK_SIZE as usize];
        let blocks = size_bytes / BLOCK_SIZE;
        let mut rng = SmallRng::from_entropy();

        let start = Instant::now();
        for _ in 0..blocks {
            let offset = rng.gen_range(0..size_bytes);
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&block)?;
        }
        let elapsed = start.elapsed();

        debug!(blocks, ?elapsed, "random write finished");
        Ok(calculate_throughput_mbps(size_bytes, elapsed))
    }

    fn random_read(&self, path: &Path) -> io::Result<f64> {
        let file_size = fs::metadata(path)?.len();
        let mut file = File::open(path)?;
        let mut block = [0u8; BLOCK_SIZE as usize];
        let blocks = file_size / BLOCK_SIZE;
        let mut rng = SmallRng::from_entropy();
        let mut bytes_read = 0u64;

        let start = Instant::now();
        for _ in 0..blocks {
            let offset = rng.gen_range(0..file_size);
            file.seek(SeekFrom::Start(offset))?;
            // Offsets near EOF return short reads.
            bytes_read += file.read(&mut block)? as u64;
        }
        let elapsed = start.elapsed();

        debug!(blocks, bytes_read, ?elapsed, "random read finished");
        Ok(calculate_throughput_mbps(file_size, elapsed))
    }
}

/// Empty buffer able to hold `bytes`; allocation failure is an error, not an abort
fn reserve_buffer(bytes: u64) -> io::Result<Vec<u8>> {
    let len = usize_len(bytes)?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        io::Error::new(
            io::ErrorKind::OutOfMemory,
            format!("cannot allocate {} byte buffer: {}", bytes, e),
        )
    })?;
    Ok(buffer)
}

fn zeroed_buffer(bytes: u64) -> io::Result<Vec<u8>> {
    let mut buffer = reserve_buffer(bytes)?;
    buffer.resize(usize_len(bytes)?, 0);
    Ok(buffer)
}

fn usize_len(bytes: u64) -> io::Result<usize> {
    usize::try_from(bytes).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} bytes does not fit in memory on this platform", bytes),
        )
    })
}
