//! Shared test utilities for the unaar crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour suites under `tests/`.

use crate::artefact::download::{ArtefactSource, DownloadError};
use crate::install::{InstallError, InstallRequest, InstallSink};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build an in-memory zip archive with stored (uncompressed) entries.
///
/// Names ending in `/` become directory entries and their content is
/// ignored.
///
/// # Errors
///
/// Propagates any error from the zip writer.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> ZipResult<Vec<u8>> {
    zip_archive_with(CompressionMethod::Stored, entries)
}

/// Build an in-memory zip archive whose file entries use `method`.
///
/// The writer is seekable, so sizes and checksums land in the local
/// headers.
///
/// # Errors
///
/// Propagates any error from the zip writer.
pub fn zip_archive_with(
    method: CompressionMethod,
    entries: &[(&str, &[u8])],
) -> ZipResult<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(method);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options)?;
        } else {
            writer.start_file(*name, options)?;
            writer.write_all(content)?;
        }
    }
    Ok(writer.finish()?.into_inner())
}

/// Build a zip archive the way a writer on a non-seekable stream does:
/// every entry is deflated with general-purpose flag bit 3 set, zero sizes
/// in its local header, and a signed data descriptor after its data. A
/// central directory and end record follow the entries.
///
/// # Errors
///
/// Returns an error if compression fails or a field overflows its zip
/// width.
pub fn streamed_archive(entries: &[(&str, &[u8])]) -> io::Result<Vec<u8>> {
    let mut archive = Vec::new();
    let mut central = Vec::new();
    for (name, content) in entries {
        let offset = narrow_u32(archive.len())?;
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content)?;
        let compressed = encoder.finish()?;
        let mut crc = Crc::new();
        crc.update(content);
        let crc = crc.sum();
        let compressed_size = narrow_u32(compressed.len())?;
        let size = narrow_u32(content.len())?;
        let name_len = u16::try_from(name.len()).map_err(io::Error::other)?;

        put_u32(&mut archive, 0x0403_4b50);
        put_u16(&mut archive, 20);
        put_u16(&mut archive, STREAMED_FLAGS);
        put_u16(&mut archive, STREAMED_METHOD);
        put_u32(&mut archive, STREAMED_TIMESTAMP);
        put_u32(&mut archive, 0);
        put_u32(&mut archive, 0);
        put_u32(&mut archive, 0);
        put_u16(&mut archive, name_len);
        put_u16(&mut archive, 0);
        archive.extend_from_slice(name.as_bytes());
        archive.extend_from_slice(&compressed);
        put_u32(&mut archive, 0x0807_4b50);
        put_u32(&mut archive, crc);
        put_u32(&mut archive, compressed_size);
        put_u32(&mut archive, size);

        put_u32(&mut central, 0x0201_4b50);
        put_u16(&mut central, 20);
        put_u16(&mut central, 20);
        put_u16(&mut central, STREAMED_FLAGS);
        put_u16(&mut central, STREAMED_METHOD);
        put_u32(&mut central, STREAMED_TIMESTAMP);
        put_u32(&mut central, crc);
        put_u32(&mut central, compressed_size);
        put_u32(&mut central, size);
        put_u16(&mut central, name_len);
        // extra, comment, disk, internal attributes
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u16(&mut central, 0);
        put_u32(&mut central, 0);
        put_u32(&mut central, offset);
        central.extend_from_slice(name.as_bytes());
    }

    let entry_count = u16::try_from(entries.len()).map_err(io::Error::other)?;
    let central_offset = narrow_u32(archive.len())?;
    let central_size = narrow_u32(central.len())?;
    archive.extend_from_slice(&central);
    put_u32(&mut archive, 0x0605_4b50);
    put_u16(&mut archive, 0);
    put_u16(&mut archive, 0);
    put_u16(&mut archive, entry_count);
    put_u16(&mut archive, entry_count);
    put_u32(&mut archive, central_size);
    put_u32(&mut archive, central_offset);
    put_u16(&mut archive, 0);
    Ok(archive)
}

const STREAMED_FLAGS: u16 = 1 << 3;
const STREAMED_METHOD: u16 = 8;
// 1980-01-01 00:00
const STREAMED_TIMESTAMP: u32 = 0x0021_0000;

fn narrow_u32(value: usize) -> io::Result<u32> {
    u32::try_from(value).map_err(io::Error::other)
}

fn put_u16(buffer: &mut Vec<u8>, value: u16) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

/// Build a minimal Android library archive whose `classes.jar` holds
/// `classes`.
///
/// # Errors
///
/// Propagates any error from the zip writer.
pub fn aar_archive(classes: &[u8]) -> ZipResult<Vec<u8>> {
    zip_archive(&[
        ("AndroidManifest.xml", b"<manifest package=\"com.example\"/>".as_slice()),
        ("res/", b"".as_slice()),
        ("res/values/values.xml", b"<resources/>".as_slice()),
        ("R.txt", b"".as_slice()),
        ("classes.jar", classes),
    ])
}

/// Like [`aar_archive`], but written with data descriptors as by
/// [`streamed_archive`].
///
/// # Errors
///
/// Returns an error if compression fails.
pub fn streamed_aar_archive(classes: &[u8]) -> io::Result<Vec<u8>> {
    streamed_archive(&[
        ("AndroidManifest.xml", b"<manifest package=\"com.example\"/>".as_slice()),
        ("res/values/values.xml", b"<resources/>".as_slice()),
        ("classes.jar", classes),
    ])
}

/// An [`ArtefactSource`] serving fixed bodies by URL and recording every
/// request. Unknown URLs answer with [`DownloadError::NotFound`].
#[derive(Debug, Default)]
pub struct ScriptedSource {
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedSource {
    /// Create a source that serves nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`.
    #[must_use]
    pub fn serve(mut self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.bodies.insert(url.into(), body);
        self
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ArtefactSource for ScriptedSource {
    fn open(&self, url: &str) -> Result<Box<dyn Read>, DownloadError> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.bodies.get(url) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone()))),
            None => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}

/// What a [`RecordingSink`] saw for one install.
#[derive(Debug, Clone)]
pub struct RecordedInstall {
    /// The request as received.
    pub request: InstallRequest,
    /// Archive contents at install time.
    pub archive: Vec<u8>,
    /// Descriptor contents at install time.
    pub descriptor: String,
}

/// An [`InstallSink`] that snapshots staged files instead of installing.
#[derive(Debug, Default)]
pub struct RecordingSink {
    installs: RefCell<Vec<RecordedInstall>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs recorded so far, in order.
    #[must_use]
    pub fn installs(&self) -> Vec<RecordedInstall> {
        self.installs.borrow().clone()
    }
}

impl InstallSink for RecordingSink {
    fn install(&self, request: &InstallRequest) -> Result<(), InstallError> {
        let archive =
            std::fs::read(&request.archive).map_err(|_| InstallError::MissingStagedFile {
                path: request.archive.clone(),
            })?;
        let descriptor = std::fs::read_to_string(&request.descriptor).map_err(|_| {
            InstallError::MissingStagedFile {
                path: request.descriptor.clone(),
            }
        })?;
        self.installs.borrow_mut().push(RecordedInstall {
            request: request.clone(),
            archive,
            descriptor,
        });
        Ok(())
    }
}
