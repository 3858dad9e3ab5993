use std::{collections::BTreeMap, sync::Arc};

use crate::config::{Config, ProviderCfg};
use crate::error::{CoreResult, SubscribeError};
use crate::http_client::{HttpClient, Transport};
use crate::provider::{ProviderKind, SubscriberProvider};
use crate::providers::{Klaviyo, Mailchimp};

/// Registry of configured provider instances by name ("mailchimp", "klaviyo").
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn SubscriberProvider>>,
}

impl ProviderRegistry {
    /// Build every configured provider over one shared `HttpClient`, reading
    /// API keys from the process environment.
    pub fn from_config(cfg: &Config) -> CoreResult<Self> {
        let http = Arc::new(HttpClient::from_cfg(&cfg.http)?);
        Self::from_config_with(cfg, http, |var| std::env::var(var).ok())
    }

    /// Same as `from_config` with the transport and env lookup injected.
    pub fn from_config_with<F>(
        cfg: &Config,
        transport: Arc<dyn Transport>,
        env: F,
    ) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut providers: BTreeMap<String, Arc<dyn SubscriberProvider>> = BTreeMap::new();

        if let Some(pc) = &cfg.providers.mailchimp {
            let api_key = api_key(ProviderKind::Mailchimp, pc, &env)?;
            let mut mc = Mailchimp::new(transport.clone(), api_key, pc.list_id.clone())?;
            if let Some(base) = &pc.base_url {
                mc = mc.with_base_url(base.clone());
            }
            providers.insert(ProviderKind::Mailchimp.to_string(), Arc::new(mc));
        }

        if let Some(pc) = &cfg.providers.klaviyo {
            let api_key = api_key(ProviderKind::Klaviyo, pc, &env)?;
            let mut kl = Klaviyo::new(transport.clone(), api_key, pc.list_id.clone());
            if let Some(base) = &pc.base_url {
                kl = kl.with_base_url(base.clone());
            }
            providers.insert(ProviderKind::Klaviyo.to_string(), Arc::new(kl));
        }

        Ok(Self { providers })
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SubscriberProvider>> {
        self.providers.get(name).cloned()
    }

    /// Look up by kind, failing with a configuration error when it was not configured.
    pub fn require(&self, kind: ProviderKind) -> CoreResult<Arc<dyn SubscriberProvider>> {
        self.get(kind.as_str()).ok_or_else(|| {
            SubscribeError::Configuration(format!("provider '{kind}' is not configured"))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

fn api_key<F>(kind: ProviderKind, pc: &ProviderCfg, env: &F) -> CoreResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(&pc.api_key_env).ok_or_else(|| {
        SubscribeError::Configuration(format!(
            "{kind}: environment variable {} is not set",
            pc.api_key_env
        ))
    })
}
