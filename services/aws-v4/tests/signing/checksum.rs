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

use super::{fixed_context, sign, test_signer};
use anyhow::Result;
use http::{HeaderMap, HeaderValue, Method, Uri};
use pretty_assertions::assert_eq;
use sha2::{Digest, Sha256};
use sigv4_aws::Signer;
use sigv4_core::hash::EMPTY_STRING_SHA256;
use sigv4_core::{ErrorKind, SignableBody, SignableRequest, CHUNK_SIZE};
use std::io::{Cursor, Seek, SeekFrom, Write};

#[tokio::test]
async fn test_empty_body() {
    let signature = sign(
        &test_signer(),
        Method::GET,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    assert_eq!(
        signature.content_sha256(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(signature.content_sha256(), EMPTY_STRING_SHA256);
    assert_eq!(signature.headers()["x-amz-content-sha256"], EMPTY_STRING_SHA256);
}

#[tokio::test]
async fn test_file_body_is_hashed_and_rewound() -> Result<()> {
    let content: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
    let mut file = tempfile::tempfile()?;
    file.write_all(&content)?;
    file.seek(SeekFrom::Start(0))?;

    let signature = sign(
        &test_signer(),
        Method::PUT,
        "https://domain.com/large",
        &HeaderMap::new(),
        SignableBody::Seekable(&mut file),
    )
    .await;

    assert_eq!(
        signature.content_sha256(),
        hex::encode(Sha256::digest(&content))
    );
    assert_eq!(file.stream_position()?, 0);
    Ok(())
}

#[tokio::test]
async fn test_seekable_body_hashes_from_current_position() -> Result<()> {
    let mut body = Cursor::new(b"skip:payload".to_vec());
    body.seek(SeekFrom::Start(5))?;

    let signature = sign(
        &test_signer(),
        Method::PUT,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::Seekable(&mut body),
    )
    .await;
    assert_eq!(
        signature.content_sha256(),
        hex::encode(Sha256::digest(b"payload"))
    );
    assert_eq!(body.position(), 5);
    Ok(())
}

#[tokio::test]
async fn test_stream_body_is_rejected() {
    let uri: Uri = "https://domain.com".parse().expect("uri must be valid");
    let headers = HeaderMap::new();
    let mut stream = Cursor::new(b"forward only".to_vec());

    let err = test_signer()
        .sign_request(SignableRequest::new(
            &Method::PUT,
            &uri,
            &headers,
            SignableBody::Stream(&mut stream),
        ))
        .await
        .expect_err("stream body must not be signed");
    assert_eq!(err.kind(), ErrorKind::StreamExhausted);
}

#[tokio::test]
async fn test_precomputed_checksum_skips_body() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-amz-content-sha256",
        HeaderValue::from_static("STREAMING-AWS4-HMAC-SHA256-PAYLOAD"),
    );
    let mut stream = Cursor::new(b"forward only".to_vec());

    let signature = sign(
        &test_signer(),
        Method::PUT,
        "https://domain.com",
        &headers,
        SignableBody::Stream(&mut stream),
    )
    .await;
    assert_eq!(
        signature.content_sha256(),
        "STREAMING-AWS4-HMAC-SHA256-PAYLOAD"
    );
    assert!(signature
        .canonical_request()
        .ends_with("\nSTREAMING-AWS4-HMAC-SHA256-PAYLOAD"));
    assert_eq!(stream.position(), 0);
}

#[tokio::test]
async fn test_checksum_header_disabled() -> Result<()> {
    let signer = Signer::builder()
        .service("SERVICE")
        .region("REGION")
        .access_key_id("akid")
        .secret_access_key("secret")
        .apply_checksum_header(false)
        .context(fixed_context())
        .build()?;

    let signature = sign(
        &signer,
        Method::PUT,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::from("http-body"),
    )
    .await;

    assert!(signature.headers().get("x-amz-content-sha256").is_none());
    assert!(signature
        .authorization()
        .is_some_and(|v| v.contains("SignedHeaders=host;x-amz-date,")));
    assert!(signature
        .canonical_request()
        .ends_with(&format!("\n{}", hex::encode(Sha256::digest(b"http-body")))));
    Ok(())
}
