//! Tencent Cloud API v3 client for the SSL and CDN certificate calls

use super::types::*;
use super::CdnCertificateApi;
use crate::config::ProviderConfig;
use crate::deployer::TencentAccess;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";
const ALGORITHM: &str = "TC3-HMAC-SHA256";

/// One of the two API products the deployer talks to
#[derive(Debug, Clone, Copy)]
struct Service {
    name: &'static str,
    version: &'static str,
}

const SSL_SERVICE: Service = Service { name: "ssl", version: "2019-12-05" };
const CDN_SERVICE: Service = Service { name: "cdn", version: "2018-06-06" };

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], msg: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| anyhow!("Invalid HMAC key: {}", e))?;
    mac.update(msg.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Build the `Authorization` header value for a TC3-HMAC-SHA256 signed request
pub fn tc3_authorization(
    secret_id: &str,
    secret_key: &str,
    service: &str,
    host: &str,
    action: &str,
    payload: &str,
    timestamp: i64,
) -> Result<String> {
    let date = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| anyhow!("Invalid request timestamp: {}", timestamp))?
        .format("%Y-%m-%d")
        .to_string();

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\nx-tc-action:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host,
        action.to_lowercase(),
        SIGNED_HEADERS,
        sha256_hex(payload.as_bytes())
    );

    let credential_scope = format!("{}/{}/tc3_request", date, service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        credential_scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, service)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign)?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, secret_id, credential_scope, SIGNED_HEADERS, signature
    ))
}

/// Unwrap the `Response` envelope, turning provider errors into `Err`
pub fn parse_response<T: DeserializeOwned>(action: &str, body: serde_json::Value) -> Result<T> {
    let response = body
        .get("Response")
        .cloned()
        .ok_or_else(|| anyhow!("{} returned no Response object", action))?;

    if let Some(error) = response.get("Error") {
        let code = error["Code"].as_str().unwrap_or("Unknown");
        let message = error["Message"].as_str().unwrap_or_default();
        let request_id = response["RequestId"].as_str().unwrap_or_default();
        return Err(anyhow!(
            "{} failed: [{}] {} (request id: {})",
            action,
            code,
            message,
            request_id
        ));
    }

    serde_json::from_value(response).with_context(|| format!("Failed to decode {} response", action))
}

/// Tencent Cloud SSL/CDN API client
#[derive(Clone)]
pub struct TencentCloudClient {
    secret_id: String,
    secret_key: String,
    config: ProviderConfig,
    client: Client,
}

impl std::fmt::Debug for TencentCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TencentCloudClient")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<REDACTED>")
            .field("ssl_endpoint", &self.config.ssl_endpoint)
            .field("cdn_endpoint", &self.config.cdn_endpoint)
            .finish()
    }
}

impl TencentCloudClient {
    pub fn new(access: &TencentAccess, config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            secret_id: access.secret_id.clone(),
            secret_key: access.secret_key.clone(),
            config: config.clone(),
            client,
        })
    }

    fn endpoint(&self, service: Service) -> &str {
        match service.name {
            "cdn" => &self.config.cdn_endpoint,
            _ => &self.config.ssl_endpoint,
        }
    }

    /// Make a signed API request and decode the response body
    async fn make_request<Req, Resp>(&self, service: Service, action: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let host = self.endpoint(service);
        let payload = serde_json::to_string(request)
            .with_context(|| format!("Failed to encode {} request", action))?;
        let timestamp = Utc::now().timestamp();
        let authorization = tc3_authorization(
            &self.secret_id,
            &self.secret_key,
            service.name,
            host,
            action,
            &payload,
            timestamp,
        )?;

        debug!("Calling Tencent Cloud {} {} on {}", service.name, action, host);

        let mut builder = self
            .client
            .post(format!("{}://{}/", self.config.scheme, host))
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", host)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", service.version);
        if let Some(region) = &self.config.region {
            builder = builder.header("X-TC-Region", region);
        }

        let response = builder
            .body(payload)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to Tencent Cloud", action))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Tencent Cloud API returned error {}: {}", status, body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", action))?;

        parse_response(action, json)
    }
}

#[async_trait]
impl CdnCertificateApi for TencentCloudClient {
    async fn upload_certificate(
        &self,
        request: UploadCertificateRequest,
    ) -> Result<UploadCertificateResponse> {
        self.make_request(SSL_SERVICE, "UploadCertificate", &request).await
    }

    async fn deploy_certificate_instance(
        &self,
        request: DeployCertificateInstanceRequest,
    ) -> Result<DeployCertificateInstanceResponse> {
        self.make_request(SSL_SERVICE, "DeployCertificateInstance", &request).await
    }

    async fn describe_cert_domains(
        &self,
        request: DescribeCertDomainsRequest,
    ) -> Result<DescribeCertDomainsResponse> {
        self.make_request(CDN_SERVICE, "DescribeCertDomains", &request).await
    }

    async fn describe_deployed_resources(
        &self,
        request: DescribeDeployedResourcesRequest,
    ) -> Result<DescribeDeployedResourcesResponse> {
        self.make_request(SSL_SERVICE, "DescribeDeployedResources", &request).await
    }

    fn provider_name(&self) -> &str {
        "Tencent Cloud"
    }
}
