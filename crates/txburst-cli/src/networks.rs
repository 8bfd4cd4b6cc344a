//! Built-in network catalog: default RPC endpoints and explorer links.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub explorer_url: Option<&'static str>,

    /// Base for transaction links when the explorer does not use `<root>/tx`.
    pub tx_url: Option<&'static str>,
    pub is_default: bool,
}

pub const NETWORKS: &[Network] = &[
    Network {
        chain_id: 1,
        name: "Ethereum",
        rpc_url: "https://nodes.sequence.app/mainnet",
        explorer_url: Some("https://etherscan.io/"),
        tx_url: None,
        is_default: false,
    },
    Network {
        chain_id: 137,
        name: "Polygon",
        rpc_url: "https://nodes.sequence.app/polygon",
        explorer_url: Some("https://polygonscan.com/"),
        tx_url: None,
        is_default: false,
    },
    Network {
        chain_id: 42161,
        name: "Arbitrum One",
        rpc_url: "https://nodes.sequence.app/arbitrum",
        explorer_url: Some("https://arbiscan.io/"),
        tx_url: None,
        is_default: false,
    },
    Network {
        chain_id: 8453,
        name: "Base",
        rpc_url: "https://nodes.sequence.app/base",
        explorer_url: Some("https://basescan.org/"),
        tx_url: None,
        is_default: false,
    },
    Network {
        chain_id: 11155111,
        name: "Sepolia",
        rpc_url: "https://nodes.sequence.app/sepolia",
        explorer_url: Some("https://sepolia.etherscan.io/"),
        tx_url: None,
        is_default: true,
    },
    Network {
        chain_id: 31337,
        name: "Local devnet",
        rpc_url: "http://127.0.0.1:8545",
        explorer_url: None,
        tx_url: None,
        is_default: false,
    },
];

impl Network {
    /// `None` when the network has no explorer or there is no hash.
    pub fn explorer_link(&self, hash: Option<&str>) -> Option<String> {
        let hash = hash.filter(|h| !h.is_empty())?;
        let base = match (self.tx_url, self.explorer_url) {
            (Some(tx_url), _) => tx_url.trim_end_matches('/').to_string(),
            (None, Some(root)) => format!("{}/tx", root.trim_end_matches('/')),
            (None, None) => return None,
        };
        Some(format!("{base}/{hash}"))
    }
}

/// One line per catalog entry, for `--list-networks`.
pub fn render_catalog() -> String {
    let mut out = String::new();
    for network in NETWORKS {
        let marker = if network.is_default { " (default)" } else { "" };
        out.push_str(&format!(
            "{:>10}  {}{}  {}\n",
            network.chain_id, network.name, marker, network.rpc_url
        ));
    }
    out
}

pub fn find(chain_id: u64) -> Option<&'static Network> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

pub fn default_network() -> &'static Network {
    NETWORKS.iter().find(|n| n.is_default).unwrap_or(&NETWORKS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_link_strips_trailing_slash() {
        let net = find(1).unwrap();
        assert_eq!(
            net.explorer_link(Some("0xabc")).as_deref(),
            Some("https://etherscan.io/tx/0xabc")
        );
    }

    #[test]
    fn no_link_without_hash_or_explorer() {
        assert_eq!(find(1).unwrap().explorer_link(None), None);
        assert_eq!(find(1).unwrap().explorer_link(Some("")), None);
        assert_eq!(find(31337).unwrap().explorer_link(Some("0xabc")), None);
    }

    #[test]
    fn tx_url_overrides_explorer_root() {
        let net = Network {
            chain_id: 1,
            name: "Custom",
            rpc_url: "http://127.0.0.1:8545",
            explorer_url: Some("https://explorer.example.org/"),
            tx_url: Some("https://explorer.example.org/transaction/"),
            is_default: false,
        };
        assert_eq!(
            net.explorer_link(Some("0xabc")).as_deref(),
            Some("https://explorer.example.org/transaction/0xabc")
        );

        let tx_only = Network {
            explorer_url: None,
            ..net
        };
        assert_eq!(
            tx_only.explorer_link(Some("0xabc")).as_deref(),
            Some("https://explorer.example.org/transaction/0xabc")
        );
    }

    #[test]
    fn catalog_lists_every_network_once() {
        let catalog = render_catalog();
        assert_eq!(catalog.lines().count(), NETWORKS.len());
        let default_line = catalog.lines().find(|l| l.contains("(default)")).unwrap();
        assert!(default_line.contains("11155111"));
        assert!(default_line.contains("Sepolia"));
    }

    #[test]
    fn exactly_one_default() {
        assert_eq!(NETWORKS.iter().filter(|n| n.is_default).count(), 1);
        assert_eq!(default_network().chain_id, 11155111);
    }
}
