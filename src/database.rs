use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::client::Client;
use crate::config::Properties;
use crate::rkv::{self, RkvClient};

pub type CreateFn = fn(&Properties) -> Result<Arc<dyn Client>>;

/// Named database factories, populated explicitly by the composition root.
#[derive(Clone)]
pub struct Registry {
    creators: BTreeMap<&'static str, CreateFn>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(rkv::NAME, create_rkv);
        registry
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            creators: BTreeMap::new(),
        }
    }

    /// Registers `create` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, create: CreateFn) -> &mut Self {
        self.creators.insert(name, create);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.creators.keys().copied()
    }

    pub fn create(&self, name: &str, props: &Properties) -> Result<Arc<dyn Client>> {
        let create = self.creators.get(name).ok_or_else(|| {
            anyhow!(
                "unknown database {name:?}, expected one of: {}",
                self.names().collect::<Vec<_>>().join(", ")
            )
        })?;
        create(props)
    }
}

fn create_rkv(props: &Properties) -> Result<Arc<dyn Client>> {
    Ok(Arc::new(RkvClient::from_properties(props)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENDPOINT_ADDRESS;
    use crate::context::ThreadContext;
    use crate::error::RkvError;

    #[test]
    fn default_registry_knows_rkv() {
        assert_eq!(Registry::default().names().collect::<Vec<_>>(), vec!["rkv"]);
    }

    #[tokio::test]
    async fn creates_rkv_from_properties() {
        let props: Properties = [(ENDPOINT_ADDRESS, "127.0.0.1:1")].into_iter().collect();
        let client = Registry::default().create("rkv", &props).unwrap();

        let err = client
            .scan(&ThreadContext::new(), "usertable", "k", 1, &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RkvError>(),
            Some(RkvError::Unsupported { .. })
        ));
        client.close().await.unwrap();
    }

    #[test]
    fn unknown_name_lists_known_databases() {
        let err = Registry::default()
            .create("mongodb", &Properties::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("rkv"));
    }

    #[test]
    fn invalid_properties_fail_creation() {
        let props: Properties = [(ENDPOINT_ADDRESS, "")].into_iter().collect();
        let err = Registry::default().create("rkv", &props).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<RkvError>(),
            Some(RkvError::Config { .. })
        ));
    }

    #[test]
    fn empty_registry_accepts_custom_factories() {
        fn fake(props: &Properties) -> Result<Arc<dyn Client>> {
            Ok(Arc::new(RkvClient::from_properties(props)?))
        }
        let mut registry = Registry::empty();
        registry.register("custom", fake);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["custom"]);
        assert!(registry.create("rkv", &Properties::new()).is_err());
    }
}
