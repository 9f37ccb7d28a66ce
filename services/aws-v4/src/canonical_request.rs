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

use crate::constants::AWS_URI_ENCODE_SET;
use http::header::AUTHORIZATION;
use http::{HeaderMap, Method};
use percent_encoding::{percent_decode_str, percent_encode};
use sigv4_core::hash::hex_sha256;
use sigv4_core::{Error, Result};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// CanonicalRequest is the normalized form of a request that gets hashed into
/// the string to sign.
///
/// ```text
/// <METHOD>
/// <canonical path>
/// <canonical query>
/// <name>:<value>          (one line per signed header, sorted by name)
///
/// <signed header names joined by ';'>
/// <payload hash>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    path: String,
    query: String,
    headers: Vec<(String, String)>,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// `headers` must already contain the synthesized `host` and `x-amz-*`
    /// headers. `authorization` and every name in `unsigned_headers` (expected
    /// lower-cased) are left out. Values of a repeated header are folded into
    /// one line in encounter order, separated by `,`.
    pub fn build(
        method: &Method,
        path: &str,
        query: &str,
        headers: &HeaderMap,
        unsigned_headers: &HashSet<String>,
        payload_hash: &str,
        uri_escape_path: bool,
    ) -> Result<Self> {
        let mut canonical_headers = Vec::with_capacity(headers.keys_len());
        for name in headers.keys() {
            if *name == AUTHORIZATION || unsigned_headers.contains(name.as_str()) {
                continue;
            }

            let mut values = Vec::new();
            for value in headers.get_all(name) {
                let value = std::str::from_utf8(value.as_bytes()).map_err(|e| {
                    Error::request_invalid(format!("header {name} is not valid utf-8"))
                        .with_source(e)
                })?;
                values.push(canonicalize_header_value(value));
            }
            canonical_headers.push((name.as_str().to_string(), values.join(",")));
        }
        // Names from HeaderMap are unique and lower-cased already.
        canonical_headers.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self {
            method: method.as_str().to_ascii_uppercase(),
            path: canonicalize_path(path, uri_escape_path),
            query: canonicalize_query(query),
            headers: canonical_headers,
            payload_hash: payload_hash.to_string(),
        })
    }

    /// Signed header names joined by `;`, e.g. `host;x-amz-date`.
    pub fn signed_headers(&self) -> String {
        let mut s = String::new();
        for (i, (name, _)) in self.headers.iter().enumerate() {
            if i > 0 {
                s.push(';');
            }
            s.push_str(name);
        }
        s
    }

    /// Hex encoded SHA256 of the canonical request string.
    pub fn hashed(&self) -> String {
        hex_sha256(self.to_string().as_bytes())
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        f.write_str(&self.payload_hash)
    }
}

/// Canonicalize the request path.
///
/// An empty path becomes `/`. With `uri_escape` every segment is decoded once
/// and re-encoded with [`AWS_URI_ENCODE_SET`], so already-encoded sequences
/// are not encoded a second time. Without it the path is kept verbatim.
pub fn canonicalize_path(path: &str, uri_escape: bool) -> String {
    let path = if path.is_empty() { "/" } else { path };
    if !uri_escape {
        return path.to_string();
    }

    let mut s = String::with_capacity(path.len());
    for (i, segment) in path.split('/').enumerate() {
        if i > 0 {
            s.push('/');
        }
        s.push_str(&uri_encode(segment));
    }
    s
}

/// Canonicalize the raw query string.
///
/// - A parameter without `=` gets an empty value: `test` becomes `test=`.
/// - Names and values are decoded once and re-encoded with [`AWS_URI_ENCODE_SET`].
/// - Parameters are sorted by encoded name only. The sort is stable, so
///   repeated names keep their original relative order.
pub fn canonicalize_query(query: &str) -> String {
    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (k, v) = p.split_once('=').unwrap_or((p, ""));
            (uri_encode(k), uri_encode(v))
        })
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0));

    let mut s = String::with_capacity(query.len() + params.len());
    for (i, (k, v)) in params.iter().enumerate() {
        if i > 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

/// Canonicalize a header value.
///
/// Leading and trailing ASCII whitespace is trimmed, and every run of ASCII
/// whitespace outside double quotes collapses into one space. Quoted text is kept as is.
pub fn canonicalize_header_value(value: &str) -> String {
    let mut s = String::with_capacity(value.len());
    let mut in_quotes = false;
    let mut pending_space = false;

    for c in value.trim_matches(|c: char| c.is_ascii_whitespace()).chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c.is_ascii_whitespace() && !in_quotes {
            pending_space = true;
            continue;
        }

        if pending_space {
            s.push(' ');
            pending_space = false;
        }
        s.push(c);
    }
    s
}

fn uri_encode(s: &str) -> String {
    let decoded: Vec<u8> = percent_decode_str(s).collect();
    percent_encode(&decoded, &AWS_URI_ENCODE_SET).to_string()
}
