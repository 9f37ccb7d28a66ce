// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::hash::{hex_sha256, hex_sha256_reader, EMPTY_STRING_SHA256};
use crate::{Error, Result};
use log::{debug, warn};
use std::fmt::{Debug, Formatter};
use std::io::{Read, Seek, SeekFrom};

/// Chunk size used when hashing seekable bodies: 1 MiB.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// ReadSeek is a readable and seekable source, typically a file.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// SignableBody describes where the request payload comes from.
///
/// The variant decides how the payload checksum is computed:
///
/// - `Empty` and `Bytes` are hashed directly.
/// - `Seekable` is hashed in [`CHUNK_SIZE`] pieces from its current position to
///   EOF, then seeked back to where it started so the transport can still send
///   it. The whole source is never buffered.
/// - `Stream` is drained to EOF and no digest is produced. It cannot be
///   rewound, so hashing it leaves the caller with an exhausted stream and fails
///   with [`ErrorKind::StreamExhausted`](crate::ErrorKind::StreamExhausted).
///   Supply a precomputed `X-Amz-Content-Sha256` header to sign such bodies.
#[derive(Default)]
pub enum SignableBody<'a> {
    /// No payload.
    #[default]
    Empty,
    /// In-memory payload.
    Bytes(&'a [u8]),
    /// File-like payload that supports seeking.
    Seekable(&'a mut dyn ReadSeek),
    /// Forward-only payload.
    Stream(&'a mut (dyn Read + Send)),
}

impl Debug for SignableBody<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SignableBody::Empty => f.write_str("Empty"),
            SignableBody::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            SignableBody::Seekable(_) => f.write_str("Seekable"),
            SignableBody::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl<'a> From<&'a [u8]> for SignableBody<'a> {
    fn from(value: &'a [u8]) -> Self {
        SignableBody::Bytes(value)
    }
}

impl<'a> From<&'a str> for SignableBody<'a> {
    fn from(value: &'a str) -> Self {
        SignableBody::Bytes(value.as_bytes())
    }
}

impl SignableBody<'_> {
    /// Hex encoded SHA256 digest of the payload.
    ///
    /// A `Seekable` body is left at the position it had before the call, on
    /// success and on failure alike.
    pub fn sha256_hex(&mut self) -> Result<String> {
        match self {
            SignableBody::Empty => Ok(EMPTY_STRING_SHA256.to_string()),
            SignableBody::Bytes(b) => Ok(hex_sha256(b)),
            SignableBody::Seekable(r) => {
                let mut guard = PositionGuard::new(&mut **r).map_err(|e| {
                    Error::unexpected("failed to read body position").with_source(e)
                })?;
                debug!("hashing seekable body from offset {}", guard.start);

                let digest = hex_sha256_reader(&mut guard, CHUNK_SIZE);
                let restored = guard.restore();

                let digest = digest
                    .map_err(|e| Error::unexpected("failed to hash seekable body").with_source(e))?;
                restored.map_err(|e| {
                    Error::unexpected("failed to restore body position").with_source(e)
                })?;
                Ok(digest)
            }
            SignableBody::Stream(r) => {
                let mut buf = Vec::new();
                r.read_to_end(&mut buf)
                    .map_err(|e| Error::unexpected("failed to read body stream").with_source(e))?;
                debug!("read {} bytes from a forward-only body", buf.len());

                Err(Error::stream_exhausted(format!(
                    "body stream was consumed ({} bytes) while computing its checksum and cannot be rewound",
                    buf.len()
                )))
            }
        }
    }
}

/// PositionGuard seeks the wrapped source back to its starting offset when
/// dropped, unless [`PositionGuard::restore`] already did.
struct PositionGuard<'a, R: Seek + ?Sized> {
    inner: &'a mut R,
    start: u64,
    restored: bool,
}

impl<'a, R: Seek + ?Sized> PositionGuard<'a, R> {
    fn new(inner: &'a mut R) -> std::io::Result<Self> {
        let start = inner.stream_position()?;
        Ok(Self {
            inner,
            start,
            restored: false,
        })
    }

    fn restore(mut self) -> std::io::Result<()> {
        self.restored = true;
        self.inner.seek(SeekFrom::Start(self.start)).map(|_| ())
    }
}

impl<R: Read + Seek + ?Sized> Read for PositionGuard<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek + ?Sized> Drop for PositionGuard<'_, R> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.inner.seek(SeekFrom::Start(self.start)) {
            warn!("failed to restore body position to {}: {e}", self.start);
        }
    }
}
