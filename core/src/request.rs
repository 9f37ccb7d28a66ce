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

use crate::{Error, Result, SignableBody};
use http::request::Parts;
use http::{HeaderMap, Method, Uri};

/// SignableRequest is a read-only view of the request being signed.
///
/// Method, URI and headers are borrowed from the caller; signers never mutate
/// them and return their additions separately. Header names are
/// case-insensitive and duplicate names keep their encounter order, as
/// [`HeaderMap`] guarantees.
///
/// The request parts and the body carry separate lifetimes: a body holding a
/// `&mut` reader is invariant over its lifetime, and must not pin the borrows
/// of method, URI and headers to it.
#[derive(Debug)]
pub struct SignableRequest<'a, 'b> {
    /// HTTP method.
    pub method: &'a Method,
    /// Absolute request URI.
    pub uri: &'a Uri,
    /// HTTP headers.
    pub headers: &'a HeaderMap,
    /// Request payload.
    pub body: SignableBody<'b>,
}

impl<'a, 'b> SignableRequest<'a, 'b> {
    /// Create a new signable request.
    pub fn new(
        method: &'a Method,
        uri: &'a Uri,
        headers: &'a HeaderMap,
        body: SignableBody<'b>,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Borrow method, URI and headers from `http::request::Parts`.
    pub fn from_parts(parts: &'a Parts, body: SignableBody<'b>) -> Self {
        Self::new(&parts.method, &parts.uri, &parts.headers, body)
    }

    /// Request path, `/` if the URI has none.
    pub fn path(&self) -> &str {
        match self.uri.path() {
            "" => "/",
            v => v,
        }
    }

    /// Raw query string without the leading `?`, empty if absent.
    pub fn query(&self) -> &str {
        self.uri.query().unwrap_or_default()
    }

    /// Value for the `Host` header derived from the URI.
    ///
    /// The port is appended only when it differs from the scheme default
    /// (80 for `http`, 443 for `https`).
    pub fn host_header(&self) -> Result<String> {
        let host = self
            .uri
            .host()
            .ok_or_else(|| Error::request_invalid("request without host is invalid for signing"))?;

        let default_port = match self.uri.scheme_str() {
            Some("http") => Some(80),
            Some("https") => Some(443),
            _ => None,
        };

        match self.uri.port_u16() {
            Some(port) if Some(port) != default_port => Ok(format!("{host}:{port}")),
            _ => Ok(host.to_string()),
        }
    }
}
