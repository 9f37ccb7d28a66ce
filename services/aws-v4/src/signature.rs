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

use http::header::AUTHORIZATION;
use http::request::Parts;
use http::HeaderMap;

/// Signature is the result of signing one request.
///
/// It carries only the headers the signer adds or overrides (`host`,
/// `x-amz-date`, `x-amz-content-sha256`, `x-amz-security-token` and
/// `authorization`); the caller's headers are never touched. The canonical
/// request and string to sign are kept for diagnostics.
#[derive(Debug, Clone)]
pub struct Signature {
    pub(crate) headers: HeaderMap,
    pub(crate) canonical_request: String,
    pub(crate) string_to_sign: String,
    pub(crate) content_sha256: String,
}

impl Signature {
    /// Headers to merge into the outgoing request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Consume the signature and return the headers.
    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }

    /// The `Authorization` header value.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// The canonical request that was hashed.
    pub fn canonical_request(&self) -> &str {
        &self.canonical_request
    }

    /// The string that was signed.
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// Hex encoded SHA256 of the payload used in the canonical request.
    pub fn content_sha256(&self) -> &str {
        &self.content_sha256
    }

    /// Merge the signature headers into `parts`, replacing same-named headers.
    pub fn apply(&self, parts: &mut Parts) {
        for (name, value) in &self.headers {
            parts.headers.insert(name.clone(), value.clone());
        }
    }
}
