//! Typed requests and responses for the SSL and CDN certificate APIs.
//!
//! Field names follow the provider's PascalCase wire format. Every response
//! field may be absent on the wire and is modelled as an `Option`.

use serde::{Deserialize, Serialize};

/// Resource type used for CDN distribution instances
pub const RESOURCE_TYPE_CDN: &str = "cdn";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UploadCertificateRequest {
    pub certificate_public_key: String,
    pub certificate_private_key: String,
    pub alias: String,
    /// `false` makes every upload create a new certificate object
    pub repeatable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UploadCertificateResponse {
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub repeat_cert_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeployCertificateInstanceRequest {
    pub certificate_id: String,
    pub instance_id_list: Vec<String>,
    pub resource_type: String,
    /// 1 enables HTTPS on the instances, 0 disables it
    pub status: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeployCertificateInstanceResponse {
    #[serde(default)]
    pub deploy_record_id: Option<u64>,
    #[serde(default)]
    pub deploy_status: Option<i64>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeCertDomainsRequest {
    pub cert_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeCertDomainsResponse {
    /// CDN domains covered by the certificate
    #[serde(default)]
    pub domains: Option<Vec<String>>,
    /// Covered domains that already use a certificate
    #[serde(default)]
    pub certified_domains: Option<Vec<String>>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDeployedResourcesRequest {
    pub certificate_ids: Vec<String>,
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeployedResources {
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default, rename = "Type")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
    #[serde(default)]
    pub instance_id_list: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDeployedResourcesResponse {
    #[serde(default)]
    pub deployed_resources: Option<Vec<DeployedResources>>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_names() {
        let request = DeployCertificateInstanceRequest {
            certificate_id: "cert-1".to_string(),
            instance_id_list: vec!["a.example.com".to_string()],
            resource_type: RESOURCE_TYPE_CDN.to_string(),
            status: 1,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "CertificateId": "cert-1",
                "InstanceIdList": ["a.example.com"],
                "ResourceType": "cdn",
                "Status": 1
            })
        );
    }

    #[test]
    fn test_missing_response_fields_are_none() {
        let response: DescribeDeployedResourcesResponse =
            serde_json::from_str(r#"{"RequestId":"req-1"}"#).unwrap();
        assert_eq!(response.deployed_resources, None);
        assert_eq!(response.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_deployed_resources_parse() {
        let response: DescribeDeployedResourcesResponse = serde_json::from_str(
            r#"{
                "DeployedResources": [
                    {"CertificateId": "cert-1", "Count": 1, "Type": "cdn", "Resources": ["a.example.com"]}
                ],
                "RequestId": "req-2"
            }"#,
        )
        .unwrap();

        let groups = response.deployed_resources.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].resource_type.as_deref(), Some("cdn"));
        assert_eq!(groups[0].resources, Some(vec!["a.example.com".to_string()]));
    }
}
