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

use crate::canonical_request::CanonicalRequest;
use crate::constants::{AWS4_HMAC_SHA256, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};
use crate::provide_credential::{ConfigCredentialProvider, StaticCredentialProvider};
use crate::signing_key::{credential_scope, generate_signing_key};
use crate::{Config, Credential, Signature};
use http::header::{AUTHORIZATION, HOST};
use http::{HeaderMap, HeaderName, HeaderValue};
use log::debug;
use sigv4_core::hash::hex_hmac_sha256;
use sigv4_core::time::{format_date, format_iso8601, parse_iso8601};
use sigv4_core::{Context, Error, ProvideCredential, Result, SignableRequest, SigningCredential};
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

/// Signer that implements AWS SigV4 header based signing.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// A `Signer` is immutable once built and can be shared across tasks.
/// Credentials are asked from the provider on every call so rotated
/// credentials are picked up without rebuilding.
#[derive(Debug, Clone)]
pub struct Signer {
    ctx: Context,
    service: String,
    region: String,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    unsigned_headers: HashSet<String>,
    apply_checksum_header: bool,
    uri_escape_path: bool,
}

impl Signer {
    /// Create a new builder for the signer.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Signing name of the service.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region used in the credential scope.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Provider the signer resolves credentials from.
    pub fn credential_provider(&self) -> &dyn ProvideCredential<Credential = Credential> {
        self.provider.as_ref()
    }

    /// Resolve a usable credential from the provider.
    ///
    /// Provider errors are returned as is. A provider that has nothing is a
    /// configuration error.
    pub async fn credential(&self) -> Result<Credential> {
        match self.provider.provide_credential(&self.ctx).await? {
            Some(cred) if cred.is_valid() => Ok(cred),
            Some(_) => Err(Error::credential_invalid(
                "resolved credential is empty or expired",
            )),
            None => Err(Error::config_invalid("missing credentials")),
        }
    }

    /// Sign the request and return the headers to add.
    ///
    /// Headers supplied by the caller win over computed ones: `Host`,
    /// `X-Amz-Date` and `X-Amz-Content-Sha256` are used verbatim when present.
    /// A caller `X-Amz-Date` must still be a well formed `YYYYMMDDTHHMMSSZ`
    /// timestamp, otherwise [`ErrorKind::RequestInvalid`] is returned.
    ///
    /// The session token header always reflects the resolved credential and
    /// is left out when the token is absent or empty.
    ///
    /// [`ErrorKind::RequestInvalid`]: sigv4_core::ErrorKind::RequestInvalid
    pub async fn sign_request(&self, mut req: SignableRequest<'_, '_>) -> Result<Signature> {
        let cred = self.credential().await?;
        let now = self.ctx.now();

        let mut additions = HeaderMap::new();

        let host = match req.headers.get(HOST) {
            Some(v) => v.clone(),
            None => HeaderValue::try_from(req.host_header()?)?,
        };
        additions.insert(HOST, host);

        let (timestamp, date) = match req.headers.get(X_AMZ_DATE) {
            Some(v) => {
                let timestamp = v.to_str()?.to_string();
                let date = format_date(parse_iso8601(&timestamp)?);
                (timestamp, date)
            }
            None => (format_iso8601(now), format_date(now)),
        };
        additions.insert(
            HeaderName::from_static(X_AMZ_DATE),
            HeaderValue::try_from(timestamp.as_str())?,
        );

        if let Some(token) = cred.session_token.as_deref().filter(|v| !v.is_empty()) {
            let mut value = HeaderValue::try_from(token)?;
            value.set_sensitive(true);
            additions.insert(HeaderName::from_static(X_AMZ_SECURITY_TOKEN), value);
        }

        // A caller supplied checksum is trusted and the body is left untouched.
        let content_sha256 = match req.headers.get(X_AMZ_CONTENT_SHA_256) {
            Some(v) => v.to_str()?.to_string(),
            None => req.body.sha256_hex()?,
        };
        if self.apply_checksum_header {
            additions.insert(
                HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
                HeaderValue::try_from(content_sha256.as_str())?,
            );
        }

        let mut headers = req.headers.clone();
        for (name, value) in &additions {
            headers.insert(name.clone(), value.clone());
        }

        let creq = CanonicalRequest::build(
            req.method,
            req.path(),
            req.query(),
            &headers,
            &self.unsigned_headers,
            &content_sha256,
            self.uri_escape_path,
        )?;
        let canonical_request = creq.to_string();
        debug!("calculated canonical request: {canonical_request}");

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = credential_scope(&date, &self.region, &self.service);
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{AWS4_HMAC_SHA256}")?;
            writeln!(f, "{timestamp}")?;
            writeln!(f, "{scope}")?;
            write!(f, "{}", creq.hashed())?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, &date, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{AWS4_HMAC_SHA256} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            cred.access_key_id,
            creq.signed_headers(),
        ))?;
        authorization.set_sensitive(true);
        additions.insert(AUTHORIZATION, authorization);

        Ok(Signature {
            headers: additions,
            canonical_request,
            string_to_sign,
            content_sha256,
        })
    }
}

/// Builder for [`Signer`].
///
/// Credentials are taken from the first source that is set, in this order:
/// [`Builder::credential_provider`], [`Builder::credential`], then the
/// access key fields.
#[derive(Debug, Default)]
pub struct Builder {
    ctx: Option<Context>,
    config: Config,
    credential: Option<Credential>,
    provider: Option<Arc<dyn ProvideCredential<Credential = Credential>>>,
}

impl Builder {
    /// Start from an existing config. Replaces anything set before.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the context used for the clock and environment.
    pub fn context(mut self, ctx: Context) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Set the signing name of the service.
    pub fn service(mut self, service: &str) -> Self {
        self.config.service = Some(service.to_string());
        self
    }

    /// Set the region.
    pub fn region(mut self, region: &str) -> Self {
        self.config.region = Some(region.to_string());
        self
    }

    /// Set the access key id.
    pub fn access_key_id(mut self, access_key_id: &str) -> Self {
        self.config.access_key_id = Some(access_key_id.to_string());
        self
    }

    /// Set the secret access key.
    pub fn secret_access_key(mut self, secret_access_key: &str) -> Self {
        self.config.secret_access_key = Some(secret_access_key.to_string());
        self
    }

    /// Set the session token.
    pub fn session_token(mut self, session_token: &str) -> Self {
        self.config.session_token = Some(session_token.to_string());
        self
    }

    /// Use a fixed credential.
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Resolve credentials from `provider` on every signing call.
    pub fn credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Leave these headers out of the signature. Matching is case-insensitive.
    pub fn unsigned_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.unsigned_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Whether to add and sign `X-Amz-Content-Sha256`.
    pub fn apply_checksum_header(mut self, apply: bool) -> Self {
        self.config.apply_checksum_header = apply;
        self
    }

    /// Whether to URI-encode path segments in the canonical request.
    pub fn uri_escape_path(mut self, escape: bool) -> Self {
        self.config.uri_escape_path = escape;
        self
    }

    /// Validate the settings and build the signer.
    pub fn build(self) -> Result<Signer> {
        let Builder {
            ctx,
            config,
            credential,
            provider,
        } = self;

        let service = required(&config.service, "service")?;
        let region = required(&config.region, "region")?;

        let provider: Arc<dyn ProvideCredential<Credential = Credential>> =
            match (provider, credential) {
                (Some(provider), _) => provider,
                (None, Some(cred)) => {
                    if !cred.is_valid() {
                        return Err(Error::config_invalid("missing credentials"));
                    }
                    Arc::new(StaticCredentialProvider::from(cred))
                }
                (None, None) => {
                    let has_keys = [&config.access_key_id, &config.secret_access_key]
                        .iter()
                        .all(|v| v.as_deref().is_some_and(|v| !v.is_empty()));
                    if !has_keys {
                        return Err(Error::config_invalid("missing credentials"));
                    }
                    Arc::new(ConfigCredentialProvider::new(Arc::new(config.clone())))
                }
            };

        let mut unsigned_headers: HashSet<String> = config
            .unsigned_headers
            .iter()
            .map(|v| v.to_ascii_lowercase())
            .collect();
        unsigned_headers.insert(AUTHORIZATION.as_str().to_string());

        Ok(Signer {
            ctx: ctx.unwrap_or_default(),
            service,
            region,
            provider,
            unsigned_headers,
            apply_checksum_header: config.apply_checksum_header,
            uri_escape_path: config.uri_escape_path,
        })
    }
}

fn required(value: &Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.clone()),
        _ => Err(Error::config_invalid(format!(
            "missing required option: {field}"
        ))),
    }
}
