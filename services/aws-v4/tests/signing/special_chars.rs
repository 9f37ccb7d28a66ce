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
use http::{HeaderMap, Method};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pretty_assertions::assert_eq;
use sigv4_aws::Signer;
use sigv4_core::SignableBody;
use test_case::test_case;

/// Second and third lines of the canonical request.
fn path_and_query(canonical_request: &str) -> (String, String) {
    let mut lines = canonical_request.lines().skip(1);
    let path = lines.next().unwrap_or_default().to_string();
    let query = lines.next().unwrap_or_default().to_string();
    (path, query)
}

#[tokio::test]
async fn test_path_with_special_characters() {
    let name = utf8_percent_encode("!@#$%^&*()_+-=;:'><,/?.txt", NON_ALPHANUMERIC).to_string();
    let url = format!("https://domain.com/bucket/{name}");

    let signature = sign(
        &test_signer(),
        Method::HEAD,
        &url,
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    let (path, query) = path_and_query(signature.canonical_request());
    assert_eq!(
        path,
        "/bucket/%21%40%23%24%25%5E%26%2A%28%29_%2B-%3D%3B%3A%27%3E%3C%2C%2F%3F.txt"
    );
    assert_eq!(query, "");
}

#[tokio::test]
async fn test_path_with_utf8() {
    let name = utf8_percent_encode("你好 世界.txt", NON_ALPHANUMERIC).to_string();
    let url = format!("https://domain.com/{name}");

    let signature = sign(
        &test_signer(),
        Method::GET,
        &url,
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    let (path, _) = path_and_query(signature.canonical_request());
    assert_eq!(path, "/%E4%BD%A0%E5%A5%BD%20%E4%B8%96%E7%95%8C.txt");
}

#[tokio::test]
async fn test_path_without_escaping() -> Result<()> {
    let signer = Signer::builder()
        .service("SERVICE")
        .region("REGION")
        .access_key_id("akid")
        .secret_access_key("secret")
        .uri_escape_path(false)
        .context(fixed_context())
        .build()?;

    let signature = sign(
        &signer,
        Method::GET,
        "https://domain.com/a%20b/c:d",
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    let (path, _) = path_and_query(signature.canonical_request());
    assert_eq!(path, "/a%20b/c:d");
    Ok(())
}

#[test_case("other=&test&x-amz-header=foo", "other=&test=&x-amz-header=foo"; "valueless parameter")]
#[test_case("q.options=abc&q=xyz&q=mno", "q=xyz&q=mno&q.options=abc"; "stable order for equal names")]
#[test_case("list-type=2&delimiter=/&encoding-type=url", "delimiter=%2F&encoding-type=url&list-type=2"; "list objects")]
#[test_case("prefix=a%2Fb&marker=x%20y", "marker=x%20y&prefix=a%2Fb"; "already encoded")]
#[tokio::test]
async fn test_query_canonicalization(query: &str, expected: &str) {
    let url = format!("https://domain.com/?{query}");
    let signature = sign(
        &test_signer(),
        Method::GET,
        &url,
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    let (path, canonical_query) = path_and_query(signature.canonical_request());
    assert_eq!(path, "/");
    assert_eq!(canonical_query, expected);
}
