use super::{ProviderAdapter, ProviderKind};
use async_trait::async_trait;
use foodtruck_application::{GatewayError, LlmGateway, LlmSession};
use foodtruck_domain::Model;
use std::sync::Arc;
use tracing::debug;

/// Gateway that forwards each session to the adapter for the model's provider
pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    default_kind: Option<ProviderKind>,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>, default_kind: Option<ProviderKind>) -> Self {
        Self {
            providers,
            default_kind,
        }
    }

    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Routing priority:
    ///  1. the provider the model family (or configured default) points at
    ///  2. the configured default provider
    ///  3. the first registered provider
    fn resolve_provider(&self, model: &Model) -> Result<&dyn ProviderAdapter, GatewayError> {
        let preferred = ProviderKind::for_model(model, self.default_kind);
        if let Some(p) = self.find(preferred) {
            return Ok(p);
        }

        if let Some(kind) = self.default_kind
            && let Some(p) = self.find(kind)
        {
            return Ok(p);
        }

        self.providers
            .first()
            .map(|p| p.as_ref())
            .ok_or_else(|| GatewayError::ModelNotFound(format!("no provider available for {}", model)))
    }

    fn find(&self, kind: ProviderKind) -> Option<&dyn ProviderAdapter> {
        self.providers
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| p.as_ref())
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let provider = self.resolve_provider(model)?;
        debug!("Routing {} to {}", model, provider.kind());
        provider
            .create_session_with_system_prompt(model, system_prompt)
            .await
    }
}
