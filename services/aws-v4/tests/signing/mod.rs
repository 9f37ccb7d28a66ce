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

mod checksum;
mod credentials;
mod special_chars;

use http::{HeaderMap, Method, Uri};
use sigv4_aws::{Signature, Signer};
use sigv4_core::time::parse_iso8601;
use sigv4_core::{Context, SignableBody, SignableRequest, StaticClock};

/// Timestamp every test signs at unless the request carries `X-Amz-Date`.
pub const SIGNING_TIME: &str = "20120101T112233Z";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Context with a clock frozen at [`SIGNING_TIME`].
pub fn fixed_context() -> Context {
    init_logger();
    Context::new().with_clock(StaticClock::new(
        parse_iso8601(SIGNING_TIME).expect("signing time must be valid"),
    ))
}

/// Signer for `SERVICE` in `REGION` with the `akid/secret` key pair.
pub fn test_signer() -> Signer {
    Signer::builder()
        .service("SERVICE")
        .region("REGION")
        .access_key_id("akid")
        .secret_access_key("secret")
        .context(fixed_context())
        .build()
        .expect("signer must build")
}

pub async fn sign(
    signer: &Signer,
    method: Method,
    url: &str,
    headers: &HeaderMap,
    body: SignableBody<'_>,
) -> Signature {
    let uri: Uri = url.parse().expect("url must be valid");
    signer
        .sign_request(SignableRequest::new(&method, &uri, headers, body))
        .await
        .expect("sign request must succeed")
}
