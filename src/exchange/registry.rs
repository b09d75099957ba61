//! Registry resolving (service, data type) pairs to exchangers.

use std::collections::HashMap;
use std::sync::Arc;

use super::{CredentialExchanger, TokenEndpointExchanger};
use crate::config::CallbackConfig;
use crate::error::CallbackError;
use crate::types::PortableDataType;

/// Registry mapping a service name and data type to its exchanger.
///
/// Service names are matched case-insensitively and ignoring surrounding
/// whitespace.
pub struct ExchangerRegistry {
    exchangers: HashMap<(String, PortableDataType), Arc<dyn CredentialExchanger>>,
}

impl ExchangerRegistry {
    pub fn new() -> Self {
        Self {
            exchangers: HashMap::new(),
        }
    }

    /// Build token-endpoint exchangers for every configured service.
    pub fn from_config(config: &CallbackConfig) -> Result<Self, CallbackError> {
        let mut registry = Self::new();
        for service in &config.services {
            let exchanger = TokenEndpointExchanger::from_service_config(service)?;
            registry.register(&service.name, &service.data_types, Arc::new(exchanger));
        }
        Ok(registry)
    }

    /// Register `exchanger` for `service` and each of `data_types`.
    pub fn register(
        &mut self,
        service: &str,
        data_types: &[PortableDataType],
        exchanger: Arc<dyn CredentialExchanger>,
    ) {
        let key = service_key(service);
        for data_type in data_types {
            self.exchangers
                .insert((key.clone(), *data_type), exchanger.clone());
        }
    }

    /// Look up the exchanger for a service and data type.
    pub fn resolve(
        &self,
        service: &str,
        data_type: PortableDataType,
    ) -> Result<Arc<dyn CredentialExchanger>, CallbackError> {
        self.exchangers
            .get(&(service_key(service), data_type))
            .cloned()
            .ok_or_else(|| CallbackError::NoExchanger {
                service: service.to_string(),
                data_type,
            })
    }

    pub fn has_exchanger(&self, service: &str, data_type: PortableDataType) -> bool {
        self.exchangers
            .contains_key(&(service_key(service), data_type))
    }

    /// Registered service names, sorted and deduplicated.
    pub fn services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exchangers.keys().map(|(s, _)| s.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Default for ExchangerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn service_key(service: &str) -> String {
    service.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::exchange::ExchangeError;
    use crate::types::AuthData;
    use async_trait::async_trait;

    struct StubExchanger(&'static str);

    #[async_trait]
    impl CredentialExchanger for StubExchanger {
        async fn exchange(
            &self,
            _code: &str,
            _correlation_token: &str,
        ) -> Result<AuthData, ExchangeError> {
            Ok(AuthData::token(self.0))
        }
    }

    #[tokio::test]
    async fn register_and_resolve() {
        let mut registry = ExchangerRegistry::new();
        registry.register(
            "google",
            &[PortableDataType::Photos, PortableDataType::Calendar],
            Arc::new(StubExchanger("g")),
        );

        assert!(registry.has_exchanger("google", PortableDataType::Photos));
        assert!(registry.has_exchanger("google", PortableDataType::Calendar));
        assert!(!registry.has_exchanger("google", PortableDataType::Mail));

        let exchanger = registry.resolve("google", PortableDataType::Photos).unwrap();
        let data = exchanger.exchange("code", "token").await.unwrap();
        assert_eq!(data, AuthData::token("g"));
    }

    #[test]
    fn service_names_are_normalized() {
        let mut registry = ExchangerRegistry::new();
        registry.register(" Google ", &[PortableDataType::Photos], Arc::new(StubExchanger("g")));
        assert!(registry.resolve("GOOGLE", PortableDataType::Photos).is_ok());
        assert_eq!(registry.services(), vec!["google"]);
    }

    #[test]
    fn resolve_unregistered_fails() {
        let registry = ExchangerRegistry::new();
        match registry.resolve("flickr", PortableDataType::Photos) {
            Err(CallbackError::NoExchanger { service, data_type }) => {
                assert_eq!(service, "flickr");
                assert_eq!(data_type, PortableDataType::Photos);
            }
            Err(e) => panic!("expected NoExchanger, got error: {e}"),
            Ok(_) => panic!("expected NoExchanger, got Ok"),
        }
    }

    #[test]
    fn from_config_registers_every_service() {
        let config = CallbackConfig {
            services: vec![
                ServiceConfig {
                    name: "google".to_string(),
                    data_types: vec![PortableDataType::Photos, PortableDataType::Contacts],
                    token_url: "https://oauth2.example/token".to_string(),
                    client_id: "client".to_string(),
                    client_secret: None,
                    redirect_uri: None,
                },
                ServiceConfig {
                    name: "microsoft".to_string(),
                    data_types: vec![PortableDataType::Calendar],
                    token_url: "https://login.example/token".to_string(),
                    client_id: "client".to_string(),
                    client_secret: None,
                    redirect_uri: None,
                },
            ],
            ..CallbackConfig::default()
        };
        let registry = ExchangerRegistry::from_config(&config).unwrap();
        assert_eq!(registry.services(), vec!["google", "microsoft"]);
        assert!(registry.has_exchanger("google", PortableDataType::Contacts));
        assert!(!registry.has_exchanger("microsoft", PortableDataType::Photos));
    }
}
