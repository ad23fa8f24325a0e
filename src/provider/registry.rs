//! Provider registry.

use std::sync::Arc;

use tracing::debug;

use super::SubtitleProvider;

/// Registry of available subtitle providers.
///
/// Registration order is the default preference order used when the
/// configuration does not name providers explicitly.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SubtitleProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Last registration wins on duplicate names.
    pub fn register(&mut self, provider: Arc<dyn SubtitleProvider>) {
        debug!(provider = provider.name(), "registered subtitle provider");
        self.providers.retain(|p| p.name() != provider.name());
        self.providers.push(provider);
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SubtitleProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Whether a provider with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.providers.iter().any(|p| p.name() == name)
    }

    /// Registered provider names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use subscout_common::{LanguageCode, Result};

    use super::*;
    use crate::provider::{ProviderConfig, ProviderScratch};
    use crate::subtitle::Subtitle;
    use crate::video::Video;

    struct StubProvider {
        name: &'static str,
    }

    #[async_trait]
    impl SubtitleProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn available_languages(&self) -> HashSet<LanguageCode> {
            HashSet::new()
        }

        fn is_valid_video(&self, _video: &Video) -> bool {
            true
        }

        async fn list(
            &self,
            _video: &Video,
            _languages: &[LanguageCode],
            _config: &ProviderConfig,
            _scratch: &mut ProviderScratch,
        ) -> Result<Vec<Subtitle>> {
            Ok(Vec::new())
        }

        async fn download(&self, subtitle: &Subtitle) -> Result<Subtitle> {
            Ok(subtitle.clone())
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(StubProvider { name: "stub" }));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("stub"));
        assert!(registry.get("stub").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_names_keep_registration_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider { name: "first" }));
        registry.register(Arc::new(StubProvider { name: "second" }));
        assert_eq!(registry.names(), vec!["first", "second"]);
    }

    #[test]
    fn test_duplicate_registration_replaces() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider { name: "stub" }));
        registry.register(Arc::new(StubProvider { name: "stub" }));
        assert_eq!(registry.len(), 1);
    }
}
