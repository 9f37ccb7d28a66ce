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

//! AWS SigV4 request signer.
//!
//! Computes the `Authorization` header for an HTTP request following the
//! [Signature Version 4](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
//! header based scheme. Presigned URLs are not supported.
//!
//! # Example
//!
//! ```
//! use http::{Method, Request};
//! use sigv4_aws::Signer;
//! use sigv4_core::{SignableBody, SignableRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let signer = Signer::builder()
//!         .service("s3")
//!         .region("us-east-1")
//!         .access_key_id("AKIDEXAMPLE")
//!         .secret_access_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
//!         .build()?;
//!
//!     let (mut parts, body) = Request::builder()
//!         .method(Method::PUT)
//!         .uri("https://examplebucket.s3.amazonaws.com/test.txt")
//!         .body("Welcome to Amazon S3.")?
//!         .into_parts();
//!
//!     let signature = signer
//!         .sign_request(SignableRequest::from_parts(&parts, SignableBody::from(body)))
//!         .await?;
//!     signature.apply(&mut parts);
//!
//!     assert!(parts.headers.contains_key("authorization"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod constants;

mod canonical_request;
pub use canonical_request::{
    canonicalize_header_value, canonicalize_path, canonicalize_query, CanonicalRequest,
};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod signature;
pub use signature::Signature;

mod sign_request;
pub use sign_request::{Builder, Signer};

mod signing_key;
pub use signing_key::{credential_scope, generate_signing_key};
