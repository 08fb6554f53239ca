use std::path::Path;

use anyhow::Context;
use utoipa::{
    Modify, OpenApi,
    openapi::{Server, ServerBuilder},
};
use utoipauto::utoipauto;

const SERVERS: [(&str, &str); 2] = [
    ("https://api.optivault.finance/v1", "Mainnet"),
    ("https://testnet-api.optivault.finance/v1", "Testnet"),
];

pub struct ServerAddon;

impl Modify for ServerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let servers: Vec<Server> = SERVERS
            .iter()
            .map(|(url, description)| {
                ServerBuilder::new()
                    .url(*url)
                    .description(Some(*description))
                    .build()
            })
            .collect();
        openapi.servers = Some(servers);
    }
}

#[utoipauto(paths = "./crates/optivault-api/src/")]
#[derive(OpenApi)]
#[openapi(
    modifiers(&ServerAddon),
    tags(
        (name = "User", description = "Vault metrics, options and transactions of a wallet"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Write the OpenAPI document to `<dir>/openapi.json`.
    pub fn generate_openapi_json(dir: &Path) -> anyhow::Result<()> {
        let file_path = dir.join("openapi.json");
        let json = Self::openapi()
            .to_pretty_json()
            .context("Could not serialize OpenAPI specs")?;

        std::fs::write(&file_path, json)
            .with_context(|| format!("Could not write {}", file_path.display()))?;
        tracing::info!("📖 OpenAPI specs saved to {}", file_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_routes_are_documented() {
        let openapi = ApiDoc::openapi();
        let paths: Vec<_> = openapi.paths.paths.keys().cloned().collect();

        for expected in [
            "/users/{address}/metrics",
            "/users/{address}/metrics/latest",
            "/users/{address}/options",
            "/users/{address}/transactions",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
        assert_eq!(openapi.servers.map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_metrics_routes_take_a_session() {
        let openapi = ApiDoc::openapi();
        for path in ["/users/{address}/metrics", "/users/{address}/metrics/latest"] {
            let params = openapi.paths.paths[path]
                .get
                .as_ref()
                .and_then(|op| op.parameters.clone())
                .unwrap_or_default();
            assert!(params.iter().any(|p| p.name == "session"), "{path} has no session");
        }
    }
}
