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

use crate::constants::*;
use crate::Credential;
use log::debug;
use sigv4_core::utils::Redact;
use sigv4_core::Context;
use std::fmt::{Debug, Formatter};

/// Config for the SigV4 signer.
#[derive(Clone)]
pub struct Config {
    /// Signing name of the service, for example `s3` or `ec2`. Required.
    pub service: Option<String>,
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_REGION`
    /// - env value: `AWS_DEFAULT_REGION`
    pub region: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ACCESS_KEY_ID`
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SESSION_TOKEN`
    pub session_token: Option<String>,
    /// Headers left out of the signature, matched case-insensitively.
    ///
    /// `authorization` is never signed regardless of this list.
    pub unsigned_headers: Vec<String>,
    /// Whether to send and sign `X-Amz-Content-Sha256`. Default to `true`.
    pub apply_checksum_header: bool,
    /// Whether to URI-encode path segments. Default to `true`.
    pub uri_escape_path: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            unsigned_headers: Vec::new(),
            apply_checksum_header: true,
            uri_escape_path: true,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("service", &self.service)
            .field("region", &self.region)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("unsigned_headers", &self.unsigned_headers)
            .field("apply_checksum_header", &self.apply_checksum_header)
            .field("uri_escape_path", &self.uri_escape_path)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Values already set on `self` are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.region.is_none() {
            self.region = non_empty(envs.get(AWS_REGION))
                .or_else(|| non_empty(envs.get(AWS_DEFAULT_REGION)));
        }
        if self.access_key_id.is_none() {
            self.access_key_id = non_empty(envs.get(AWS_ACCESS_KEY_ID));
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = non_empty(envs.get(AWS_SECRET_ACCESS_KEY));
        }
        if self.session_token.is_none() {
            self.session_token = non_empty(envs.get(AWS_SESSION_TOKEN));
        }

        debug!("config loaded from env: {self:?}");
        self
    }

    /// Credential built from the key fields.
    ///
    /// Returns `None` unless both keys are non-empty. An empty session token
    /// is dropped so it never reaches the signed headers.
    pub fn credential(&self) -> Option<Credential> {
        let access_key_id = self.access_key_id.as_deref().filter(|v| !v.is_empty())?;
        let secret_access_key = self.secret_access_key.as_deref().filter(|v| !v.is_empty())?;

        let mut cred = Credential::new(access_key_id, secret_access_key);
        cred.session_token = self.session_token.clone().filter(|v| !v.is_empty());
        Some(cred)
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}
