use std::fmt;
use std::str::FromStr;

use displaydoc::Display;
use thiserror::Error;
use url::Url;

/// Represents errors that can occur while selecting a network.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Unknown network `{0}`, expected one of local, mainnet, testnet, devnet
    UnknownNetwork(String),
    /// Failed to parse the endpoint URL: {0}
    InvalidUrl(#[from] url::ParseError),
}

/// Known Klever networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// A node running on this machine.
    Local,
    MainNet,
    #[default]
    TestNet,
    DevNet,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Local,
        Network::MainNet,
        Network::TestNet,
        Network::DevNet,
    ];

    fn node_url(self) -> &'static str {
        match self {
            Network::Local => "http://localhost:8701",
            Network::MainNet => "https://node.mainnet.klever.finance",
            Network::TestNet => "https://node.testnet.klever.finance",
            Network::DevNet => "https://node.devnet.klever.finance",
        }
    }

    fn api_url(self) -> &'static str {
        match self {
            Network::Local => "http://localhost:8701",
            Network::MainNet => "https://api.mainnet.klever.finance",
            Network::TestNet => "https://api.testnet.klever.finance",
            Network::DevNet => "https://api.devnet.klever.finance",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Local => "local",
            Network::MainNet => "mainnet",
            Network::TestNet => "testnet",
            Network::DevNet => "devnet",
        })
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownNetwork(s.to_string()))
    }
}

/// Node and API endpoints used by [`KleverClient`](crate::KleverClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// `None` for custom endpoints.
    pub network: Option<Network>,
    /// Base URL of the node, which serves the `/vm/*` routes.
    pub node_url: Url,
    /// Base URL of the indexer API.
    pub api_url: Url,
}

impl NetworkConfig {
    pub fn new(network: Network) -> Result<Self, Error> {
        Ok(Self {
            network: Some(network),
            node_url: Url::parse(network.node_url())?,
            api_url: Url::parse(network.api_url())?,
        })
    }

    /// Points the client at arbitrary endpoints.
    pub fn custom(node_url: &str, api_url: &str) -> Result<Self, Error> {
        Ok(Self {
            network: None,
            node_url: Url::parse(node_url)?,
            api_url: Url::parse(api_url)?,
        })
    }

    /// Joins `path` onto the node base URL, keeping any base path.
    pub fn node_endpoint(&self, path: &str) -> Result<Url, Error> {
        let mut base = self.node_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}
