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

//! Core components for signing AWS API requests.
//!
//! This crate provides the foundational types and traits shared by the signing
//! crates in this workspace. It knows nothing about a particular signature
//! algorithm; it only defines the plumbing every signer needs.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for environment access and the clock
//! - **Traits**: Abstract interface for credential loading ([`ProvideCredential`]) and
//!   credential validation ([`SigningCredential`])
//! - **Request view**: [`SignableRequest`] borrows the parts of an HTTP request that a
//!   signer reads, and [`SignableBody`] describes where the payload comes from
//!
//! ## Example
//!
//! ```
//! use sigv4_core::{Context, SignableBody, SignableRequest, StaticClock};
//! use sigv4_core::time::parse_iso8601;
//!
//! # fn example() -> sigv4_core::Result<()> {
//! let now = parse_iso8601("20120101T112233Z")?;
//! let ctx = Context::new().with_clock(StaticClock::new(now));
//! assert_eq!(ctx.now(), now);
//!
//! let parts = http::Request::put("https://domain.com/path?a=b")
//!     .header("Foo", "foo")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! let req = SignableRequest::from_parts(&parts, SignableBody::Bytes(b"http-body"));
//! assert_eq!(req.host_header()?, "domain.com");
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Clock, Context, Env, NoopEnv, OsEnv, StaticClock, StaticEnv, SystemClock};

mod api;
pub use api::{ProvideCredential, SigningCredential};

mod body;
pub use body::{ReadSeek, SignableBody, CHUNK_SIZE};

mod request;
pub use request::SignableRequest;
