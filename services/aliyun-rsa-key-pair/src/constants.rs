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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Env values used by the rsa key pair provider.
pub const ALIBABA_CLOUD_PUBLIC_KEY_ID: &str = "ALIBABA_CLOUD_PUBLIC_KEY_ID";
pub const ALIBABA_CLOUD_PRIVATE_KEY: &str = "ALIBABA_CLOUD_PRIVATE_KEY";
pub const ALIBABA_CLOUD_PRIVATE_KEY_FILE: &str = "ALIBABA_CLOUD_PRIVATE_KEY_FILE";
pub const ALIBABA_CLOUD_SESSION_EXPIRATION: &str = "ALIBABA_CLOUD_SESSION_EXPIRATION";
pub const ALIBABA_CLOUD_STS_ENDPOINT: &str = "ALIBABA_CLOUD_STS_ENDPOINT";

pub const DEFAULT_STS_HOST: &str = "sts.aliyuncs.com";

// Session duration bounds, in seconds.
pub const DEFAULT_DURATION_SECONDS: u64 = 3600;
pub const MIN_DURATION_SECONDS: u64 = 900;
pub const MAX_DURATION_SECONDS: u64 = 3600;

// Fixed values of the GenerateSessionAccessKey call.
pub const ACTION: &str = "GenerateSessionAccessKey";
pub const API_VERSION: &str = "2015-04-01";
pub const FORMAT: &str = "JSON";
pub const SIGNATURE_METHOD: &str = "SHA256withRSA";
pub const SIGNATURE_TYPE: &str = "PRIVATEKEY";
pub const SIGNATURE_VERSION: &str = "1.0";

// Query parameter names.
pub const PARAM_ACCESS_KEY_ID: &str = "AccessKeyId";
pub const PARAM_ACTION: &str = "Action";
pub const PARAM_DURATION_SECONDS: &str = "DurationSeconds";
pub const PARAM_FORMAT: &str = "Format";
pub const PARAM_SIGNATURE: &str = "Signature";
pub const PARAM_SIGNATURE_METHOD: &str = "SignatureMethod";
pub const PARAM_SIGNATURE_NONCE: &str = "SignatureNonce";
pub const PARAM_SIGNATURE_TYPE: &str = "SignatureType";
pub const PARAM_SIGNATURE_VERSION: &str = "SignatureVersion";
pub const PARAM_TIMESTAMP: &str = "Timestamp";
pub const PARAM_VERSION: &str = "Version";

/// AsciiSet for the STS RPC percent encoding.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static STS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
