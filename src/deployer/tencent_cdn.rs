//! Deploys a certificate to Tencent Cloud CDN

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use super::executor::execute;
use super::option::{DeployerOption, TencentAccess};
use super::resolver::{resolve, DomainSpec, Resolution};
use super::upload::upload_certificate;
use super::{format_info, Deployer};
use crate::config::ProviderConfig;
use crate::error::DeployError;
use crate::provider::{CdnCertificateApi, TencentCloudClient};

/// Progress of one deployment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    Init,
    Uploading,
    Resolving,
    Skipped,
    Deploying,
    Done,
    Failed,
}

impl DeployState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployState::Done | DeployState::Failed)
    }
}

/// Uploads a certificate and attaches it to the CDN instances that lack it.
///
/// Single use: one `deploy` call per instance.
pub struct TencentCdnDeployer {
    option: DeployerOption,
    api: Arc<dyn CdnCertificateApi>,
    infos: Vec<String>,
    state: DeployState,
}

impl std::fmt::Debug for TencentCdnDeployer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TencentCdnDeployer")
            .field("id", &self.id())
            .field("provider", &self.api.provider_name())
            .field("state", &self.state)
            .finish()
    }
}

impl TencentCdnDeployer {
    /// Decode the credential in `option` and build the API client
    pub fn new(option: DeployerOption, provider: &ProviderConfig) -> Result<Self, DeployError> {
        let access = TencentAccess::from_json(&option.access).map_err(DeployError::Config)?;
        let client = TencentCloudClient::new(&access, provider).map_err(DeployError::Config)?;
        Ok(Self::with_api(option, Arc::new(client)))
    }

    /// Use an already constructed API client
    pub fn with_api(option: DeployerOption, api: Arc<dyn CdnCertificateApi>) -> Self {
        Self {
            option,
            api,
            infos: Vec::new(),
            state: DeployState::Init,
        }
    }

    pub fn state(&self) -> DeployState {
        self.state
    }

    async fn run(&mut self) -> Result<(), DeployError> {
        let spec = DomainSpec::parse(&self.option.get_deploy_string("domain"))?;

        self.state = DeployState::Uploading;
        let certificate_id = upload_certificate(
            self.api.as_ref(),
            &self.option.certificate.certificate,
            &self.option.certificate.private_key,
            &self.option.domain,
        )
        .await?;
        self.infos.push(format_info("uploaded certificate", &certificate_id));
        info!("Uploaded certificate {} for {}", certificate_id, self.option.domain);

        self.state = DeployState::Resolving;
        let targets = match resolve(self.api.as_ref(), &spec, &certificate_id).await? {
            Resolution::Deploy(targets) => targets,
            Resolution::AlreadyDeployed => {
                self.state = DeployState::Skipped;
                self.infos.push("domain already deployed".to_string());
                return Ok(());
            }
            Resolution::NothingToDeploy => {
                self.state = DeployState::Skipped;
                self.infos.push("no instances to deploy".to_string());
                return Ok(());
            }
        };

        self.state = DeployState::Deploying;
        let response = execute(self.api.as_ref(), &certificate_id, &targets).await?;
        self.infos.push(format_info("deployed certificate", &response));

        Ok(())
    }
}

#[async_trait]
impl Deployer for TencentCdnDeployer {
    fn id(&self) -> String {
        format!("{}-{}", self.option.access_record.name, self.option.access_record.id)
    }

    fn info(&self) -> &[String] {
        &self.infos
    }

    async fn deploy(&mut self) -> Result<(), DeployError> {
        if self.state != DeployState::Init {
            return Err(DeployError::AlreadyUsed);
        }

        info!("Starting CDN certificate deployment {}", self.id());

        match self.run().await {
            Ok(()) => {
                self.state = DeployState::Done;
                info!("Deployment {} finished", self.id());
                Ok(())
            }
            Err(e) => {
                error!("Deployment {} failed in state {:?}: {:?}", self.id(), self.state, e);
                self.state = DeployState::Failed;
                Err(e)
            }
        }
    }
}
