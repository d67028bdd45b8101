//! Provider auto-discovery.
//!
//! Providers are registered in priority order. `resolve` returns the first
//! registered provider that claims a model name, mirroring a
//! prefix-based inference rule (`gpt-*` -> openai, `claude-*` -> anthropic,
//! and so on) rather than requiring callers to specify a provider
//! explicitly.

use std::sync::Arc;

use artist_pipeline_core::traits::ProviderAdapter;

use crate::LlmError;

#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Appends a provider. Providers registered earlier win ties when more
    /// than one claims the same model name.
    pub fn register(&mut self, provider: Arc<dyn ProviderAdapter>) {
        self.providers.push(provider);
    }

    pub fn resolve(&self, model: &str) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
        self.providers
            .iter()
            .find(|p| p.supports_model(model))
            .cloned()
            .ok_or_else(|| LlmError::ModelNotFound(model.to_string()))
    }

    /// Providers in registration order, used by the orchestrator's
    /// fallback chain when the resolved provider is exhausted.
    pub fn ordered(&self) -> &[Arc<dyn ProviderAdapter>] {
        &self.providers
    }

    /// The provider chain starting at the one that claims `model`,
    /// followed by every other registered provider that ALSO claims
    /// `model`, in registration order. A provider that can't serve this
    /// model is never a valid fallback target for it, so it's excluded
    /// rather than tried and guaranteed to fail.
    pub fn fallback_chain(&self, model: &str) -> Vec<Arc<dyn ProviderAdapter>> {
        let Ok(primary) = self.resolve(model) else {
            return Vec::new();
        };
        let mut chain = Vec::with_capacity(self.providers.len());
        chain.push(primary.clone());
        chain.extend(
            self.providers
                .iter()
                .filter(|p| !Arc::ptr_eq(p, &primary) && p.supports_model(model))
                .cloned(),
        );
        chain
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artist_pipeline_core::traits::{ProviderRequest, ProviderResponse};
    use async_trait::async_trait;

    struct Fake(&'static str, &'static str);

    #[async_trait]
    impl ProviderAdapter for Fake {
        async fn call(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, artist_pipeline_core::traits::ProviderCallError> {
            Ok(ProviderResponse {
                text: request.prompt,
                model: request.model,
                finish_reason: "stop".to_string(),
            })
        }

        fn name(&self) -> &str {
            self.0
        }

        fn supports_model(&self, model: &str) -> bool {
            model.starts_with(self.1)
        }
    }

    #[test]
    fn resolves_by_registration_order_priority() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(Fake("openai", "gpt-")));
        registry.register(Arc::new(Fake("anthropic", "claude-")));

        assert_eq!(registry.resolve("gpt-4o").unwrap().name(), "openai");
        assert_eq!(registry.resolve("claude-3-opus").unwrap().name(), "anthropic");
        assert!(registry.resolve("unknown-model").is_err());
    }

    #[test]
    fn fallback_chain_puts_resolved_provider_first_among_compatible_providers() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(Fake("anthropic-secondary", "claude-")));
        registry.register(Arc::new(Fake("openai", "gpt-")));
        registry.register(Arc::new(Fake("anthropic-primary", "claude-")));

        let chain = registry.fallback_chain("claude-3-opus");
        let names: Vec<&str> = chain.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["anthropic-secondary", "anthropic-primary"]);
    }

    #[test]
    fn fallback_chain_excludes_providers_that_cannot_serve_the_model() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(Fake("openai", "gpt-")));
        registry.register(Arc::new(Fake("anthropic", "claude-")));

        let chain = registry.fallback_chain("claude-3-opus");
        let names: Vec<&str> = chain.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["anthropic"]);
    }

    #[test]
    fn fallback_chain_empty_when_no_provider_claims_the_model() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(Fake("openai", "gpt-")));

        assert!(registry.fallback_chain("unknown-model").is_empty());
    }
}
