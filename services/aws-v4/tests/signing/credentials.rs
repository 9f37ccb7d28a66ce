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

use super::{fixed_context, sign};
use anyhow::Result;
use async_trait::async_trait;
use http::{HeaderMap, Method};
use pretty_assertions::assert_eq;
use sigv4_aws::{Config, Credential, EnvCredentialProvider, Signer, StaticCredentialProvider};
use sigv4_core::{Context, ErrorKind, ProvideCredential, SignableBody, StaticEnv};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out a new access key on every call.
#[derive(Debug, Default)]
struct RotatingCredentialProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl ProvideCredential for RotatingCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> sigv4_core::Result<Option<Credential>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Credential::new(&format!("akid-{n}"), "secret")))
    }
}

fn env_context(envs: &[(&str, &str)]) -> Context {
    fixed_context().with_env(StaticEnv {
        envs: envs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    })
}

#[tokio::test]
async fn test_session_token_is_signed() -> Result<()> {
    let signer = Signer::builder()
        .service("SERVICE")
        .region("REGION")
        .credential_provider(
            StaticCredentialProvider::new("akid", "secret").with_session_token("token"),
        )
        .context(fixed_context())
        .build()?;

    let signature = sign(
        &signer,
        Method::GET,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;

    let token = &signature.headers()["x-amz-security-token"];
    assert_eq!(token, "token");
    assert!(token.is_sensitive());
    assert!(signature.authorization().is_some_and(|v| v.contains(
        "SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-security-token,"
    )));
    Ok(())
}

#[tokio::test]
async fn test_no_session_token_header_without_token() {
    let signature = sign(
        &super::test_signer(),
        Method::GET,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    assert!(signature.headers().get("x-amz-security-token").is_none());
}

#[tokio::test]
async fn test_empty_session_token_from_env_is_not_sent() -> Result<()> {
    let signer = Signer::builder()
        .service("SERVICE")
        .region("REGION")
        .credential_provider(EnvCredentialProvider::new())
        .context(env_context(&[
            ("AWS_ACCESS_KEY_ID", "akid"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_SESSION_TOKEN", ""),
        ]))
        .build()?;

    let signature = sign(
        &signer,
        Method::GET,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    assert!(signature.headers().get("x-amz-security-token").is_none());
    assert!(!signature
        .canonical_request()
        .contains("x-amz-security-token:"));
    let without_token = sign(
        &super::test_signer(),
        Method::GET,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    assert_eq!(signature.authorization(), without_token.authorization());
    Ok(())
}

#[tokio::test]
async fn test_credentials_from_env() -> Result<()> {
    let ctx = env_context(&[
        ("AWS_ACCESS_KEY_ID", "env-akid"),
        ("AWS_SECRET_ACCESS_KEY", "env-secret"),
        ("AWS_REGION", "eu-central-1"),
    ]);

    let config = Config {
        service: Some("s3".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);
    let signer = Signer::builder().config(config).context(ctx).build()?;
    assert_eq!(signer.region(), "eu-central-1");

    let signature = sign(
        &signer,
        Method::GET,
        "https://domain.com",
        &HeaderMap::new(),
        SignableBody::Empty,
    )
    .await;
    assert!(signature
        .authorization()
        .is_some_and(|v| v.contains("Credential=env-akid/20120101/eu-central-1/s3/aws4_request")));
    Ok(())
}

#[tokio::test]
async fn test_env_provider_without_credentials() -> Result<()> {
    let signer = Signer::builder()
        .service("SERVICE")
        .region("REGION")
        .credential_provider(EnvCredentialProvider::new())
        .context(env_context(&[("AWS_ACCESS_KEY_ID", "env-akid")]))
        .build()?;

    let err = signer.credential().await.expect_err("credential must be missing");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.to_string().contains("missing credentials"));
    Ok(())
}

#[tokio::test]
async fn test_credentials_are_resolved_per_request() -> Result<()> {
    let signer = Signer::builder()
        .service("SERVICE")
        .region("REGION")
        .credential_provider(RotatingCredentialProvider::default())
        .context(fixed_context())
        .build()?;

    for expected in ["Credential=akid-0/", "Credential=akid-1/"] {
        let signature = sign(
            &signer,
            Method::GET,
            "https://domain.com",
            &HeaderMap::new(),
            SignableBody::Empty,
        )
        .await;
        assert!(signature
            .authorization()
            .is_some_and(|v| v.contains(expected)));
    }
    Ok(())
}

#[tokio::test]
async fn test_signer_shared_across_tasks() -> Result<()> {
    let signer = std::sync::Arc::new(super::test_signer());

    let mut handles = Vec::new();
    for _ in 0..4 {
        let signer = signer.clone();
        handles.push(tokio::spawn(async move {
            let headers = HeaderMap::new();
            let signature = sign(
                &signer,
                Method::GET,
                "https://domain.com",
                &headers,
                SignableBody::Empty,
            )
            .await;
            signature.authorization().map(str::to_string)
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await?);
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    Ok(())
}
