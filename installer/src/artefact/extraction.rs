//! Streaming payload extraction from zip-format archives.
//!
//! Local entries are read one at a time straight off the download stream;
//! the central directory is never consulted, so nothing is buffered to disk
//! before the wanted entry is reached. Entries that record their sizes after
//! the data (general-purpose flag bit 3) are inflated until the deflate
//! stream ends, then their data descriptor is consumed. The scan stops at
//! the first central directory or end-of-central-directory signature and
//! cannot be restarted.

use camino::Utf8Path;
use flate2::CrcWriter;
use flate2::bufread::DeflateDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};

/// Name of the library payload inside an `aar` archive.
pub const PAYLOAD_ENTRY: &str = "classes.jar";

const LOCAL_FILE_HEADER: u32 = 0x0403_4b50;
const CENTRAL_DIRECTORY_HEADER: u32 = 0x0201_4b50;
const ZIP64_END_OF_CENTRAL_DIRECTORY: u32 = 0x0606_4b50;
const END_OF_CENTRAL_DIRECTORY: u32 = 0x0605_4b50;
const DATA_DESCRIPTOR: u32 = 0x0807_4b50;

const FLAG_ENCRYPTED: u16 = 1;
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATED: u16 = 8;

const ZIP64_EXTRA_FIELD: u16 = 0x0001;
const ZIP64_SIZE_MARKER: u32 = 0xFFFF_FFFF;

/// Result of scanning an archive stream for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The entry was found and its bytes were written to the output.
    Copied {
        /// Number of bytes written.
        bytes: u64,
    },
    /// The archive ended without a matching file entry.
    EntryMissing,
}

/// Errors arising while reading the archive or writing the payload.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The stream is not a zip archive.
    #[error("malformed archive: {reason}")]
    Malformed {
        /// What was found instead of a zip record.
        reason: String,
    },

    /// An entry uses a feature the sequential reader cannot decode.
    #[error("unsupported archive entry {entry}: {reason}")]
    Unsupported {
        /// The entry name.
        entry: String,
        /// The unsupported feature.
        reason: &'static str,
    },

    /// Entry data disagrees with its recorded sizes or checksum.
    #[error("corrupt archive entry {entry}: {reason}")]
    Corrupt {
        /// The entry name.
        entry: String,
        /// The failed check.
        reason: &'static str,
    },

    /// Reading the stream or writing the output failed.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Scan `reader` for the first file entry named exactly `entry_name` and
/// copy its decoded bytes to `output`.
///
/// Directory entries never match. The output file is only created once the
/// entry is found; on error the caller owns cleanup of a partial file.
///
/// # Errors
///
/// Returns [`ExtractionError::Malformed`] when the stream is not a zip
/// archive, [`ExtractionError::Unsupported`] for encrypted entries, unknown
/// compression methods, or stored entries with a data descriptor,
/// [`ExtractionError::Corrupt`] when sizes or the checksum do not match, and
/// [`ExtractionError::Io`] on truncated streams or write failures.
pub fn extract_entry<R: Read>(
    reader: &mut R,
    entry_name: &str,
    output: &Utf8Path,
) -> Result<ScanOutcome, ExtractionError> {
    let mut stream = BufReader::new(reader);
    while let Some(entry) = LocalEntry::next(&mut stream)? {
        if entry.is_dir() || entry.name != entry_name {
            entry.skip(&mut stream)?;
            continue;
        }
        entry.check_readable()?;
        let mut writer = BufWriter::new(File::create(output)?);
        let bytes = entry.copy_to(&mut stream, &mut writer)?;
        writer.flush()?;
        return Ok(ScanOutcome::Copied { bytes });
    }
    Ok(ScanOutcome::EntryMissing)
}

/// A parsed local file header.
#[derive(Debug)]
struct LocalEntry {
    name: String,
    flags: u16,
    method: u16,
    crc: u32,
    compressed_size: u64,
    size: u64,
    zip64: bool,
}

/// Checksum and sizes an entry's data must match.
struct Trailer {
    crc: u32,
    compressed_size: u64,
    size: u64,
}

impl LocalEntry {
    /// Read the next local header, or `None` once the entries end.
    fn next<B: Read>(reader: &mut B) -> Result<Option<Self>, ExtractionError> {
        match read_u32(reader)? {
            LOCAL_FILE_HEADER => Self::read(reader).map(Some),
            CENTRAL_DIRECTORY_HEADER | ZIP64_END_OF_CENTRAL_DIRECTORY | END_OF_CENTRAL_DIRECTORY => {
                Ok(None)
            }
            other => Err(ExtractionError::Malformed {
                reason: format!("unexpected signature {other:#010x}"),
            }),
        }
    }

    fn read<B: Read>(reader: &mut B) -> Result<Self, ExtractionError> {
        let mut fixed = [0_u8; 26];
        reader.read_exact(&mut fixed)?;
        let mut header = fixed.as_slice();
        // version needed to extract
        read_u16(&mut header)?;
        let flags = read_u16(&mut header)?;
        let method = read_u16(&mut header)?;
        // modification time and date
        read_u32(&mut header)?;
        let crc = read_u32(&mut header)?;
        let compressed_size = read_u32(&mut header)?;
        let size = read_u32(&mut header)?;
        let name_len = read_u16(&mut header)?;
        let extra_len = read_u16(&mut header)?;

        let mut name = vec![0_u8; usize::from(name_len)];
        reader.read_exact(&mut name)?;
        let mut extra = vec![0_u8; usize::from(extra_len)];
        reader.read_exact(&mut extra)?;

        let zip64 = extra_field(&extra, ZIP64_EXTRA_FIELD);
        let mut zip64_sizes = zip64.unwrap_or_default();
        Ok(Self {
            name: String::from_utf8_lossy(&name).into_owned(),
            flags,
            method,
            crc,
            // The zip64 field lists the original size before the compressed size.
            size: widen(size, &mut zip64_sizes)?,
            compressed_size: widen(compressed_size, &mut zip64_sizes)?,
            zip64: zip64.is_some(),
        })
    }

    fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }

    fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    /// Reject entries whose data this reader cannot decode.
    fn check_readable(&self) -> Result<(), ExtractionError> {
        if self.flags & FLAG_ENCRYPTED != 0 {
            return Err(self.unsupported("encrypted"));
        }
        match self.method {
            METHOD_STORED if self.has_data_descriptor() => {
                Err(self.unsupported("stored with a data descriptor"))
            }
            METHOD_STORED | METHOD_DEFLATED => Ok(()),
            _ => Err(self.unsupported("compression method")),
        }
    }

    /// Move past this entry's data.
    fn skip<B: BufRead>(&self, reader: &mut B) -> Result<(), ExtractionError> {
        if self.has_data_descriptor() {
            self.check_readable()?;
            let (compressed, _) = self.decode(reader, &mut io::sink())?;
            let trailer = read_data_descriptor(reader, self.zip64)?;
            if compressed != trailer.compressed_size {
                return Err(self.corrupt("compressed size mismatch"));
            }
            return Ok(());
        }
        let skipped = io::copy(
            &mut reader.by_ref().take(self.compressed_size),
            &mut io::sink(),
        )?;
        if skipped != self.compressed_size {
            return Err(self.corrupt("data ends early"));
        }
        Ok(())
    }

    /// Decode this entry into `output` and verify it. Callers run
    /// [`Self::check_readable`] first.
    fn copy_to<B: BufRead, W: Write>(
        &self,
        reader: &mut B,
        output: W,
    ) -> Result<u64, ExtractionError> {
        let mut output = CrcWriter::new(output);
        let (compressed, written) = self.decode(reader, &mut output)?;
        let trailer = if self.has_data_descriptor() {
            read_data_descriptor(reader, self.zip64)?
        } else {
            Trailer {
                crc: self.crc,
                compressed_size: self.compressed_size,
                size: self.size,
            }
        };
        if compressed != trailer.compressed_size || written != trailer.size {
            return Err(self.corrupt("size mismatch"));
        }
        if output.crc().sum() != trailer.crc {
            return Err(self.corrupt("checksum mismatch"));
        }
        Ok(written)
    }

    /// Returns the compressed bytes consumed and the bytes written.
    fn decode<B: BufRead, W: Write>(&self, reader: &mut B, output: &mut W) -> io::Result<(u64, u64)> {
        if self.method == METHOD_STORED {
            let copied = io::copy(&mut reader.by_ref().take(self.compressed_size), output)?;
            return Ok((copied, copied));
        }
        if self.has_data_descriptor() {
            inflate(reader, output)
        } else {
            inflate(reader.by_ref().take(self.compressed_size), output)
        }
    }

    fn unsupported(&self, reason: &'static str) -> ExtractionError {
        ExtractionError::Unsupported {
            entry: self.name.clone(),
            reason,
        }
    }

    fn corrupt(&self, reason: &'static str) -> ExtractionError {
        ExtractionError::Corrupt {
            entry: self.name.clone(),
            reason,
        }
    }
}

/// Inflate a raw deflate stream. The decoder stops at the end-of-stream
/// block and leaves any following bytes unread in `compressed`.
fn inflate<B: BufRead, W: Write>(compressed: B, output: &mut W) -> io::Result<(u64, u64)> {
    let mut decoder = DeflateDecoder::new(compressed);
    let written = io::copy(&mut decoder, output)?;
    Ok((decoder.total_in(), written))
}

/// Read a data descriptor, with or without its optional signature.
fn read_data_descriptor<B: Read>(reader: &mut B, zip64: bool) -> io::Result<Trailer> {
    let mut crc = read_u32(reader)?;
    if crc == DATA_DESCRIPTOR {
        crc = read_u32(reader)?;
    }
    let (compressed_size, size) = if zip64 {
        (read_u64(reader)?, read_u64(reader)?)
    } else {
        (u64::from(read_u32(reader)?), u64::from(read_u32(reader)?))
    };
    Ok(Trailer {
        crc,
        compressed_size,
        size,
    })
}

/// Find the payload of extra field `wanted`.
fn extra_field(extra: &[u8], wanted: u16) -> Option<&[u8]> {
    let mut rest = extra;
    while let Some((&[id_lo, id_hi, len_lo, len_hi], tail)) = rest.split_first_chunk::<4>() {
        let (data, next) = tail.split_at_checked(usize::from(u16::from_le_bytes([len_lo, len_hi])))?;
        if u16::from_le_bytes([id_lo, id_hi]) == wanted {
            return Some(data);
        }
        rest = next;
    }
    None
}

fn widen(value: u32, zip64: &mut &[u8]) -> io::Result<u64> {
    if value == ZIP64_SIZE_MARKER {
        read_u64(zip64)
    } else {
        Ok(u64::from(value))
    }
}

fn read_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut bytes = [0_u8; 2];
    reader.read_exact(&mut bytes)?;
    Ok(u16::from_le_bytes(bytes))
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut bytes = [0_u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut bytes = [0_u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;
