use contact_gateway::config::{
    CommonConfig, DeploymentMode, GatewayConfig, GatewayVariant, OriginConfig, PushoverConfig,
};
use contact_gateway::services::{MockPushProvider, PushProvider};
use contact_gateway::startup::Application;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    /// Handle onto the provider the app delivers through, for asserting on
    /// attempts and payloads.
    pub push: Arc<MockPushProvider>,
}

pub struct TestAppOptions {
    pub variant: GatewayVariant,
    pub deployment: DeploymentMode,
    pub allowed_origins: Vec<String>,
    pub provider: MockPushProvider,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            variant: GatewayVariant::Permissive,
            deployment: DeploymentMode::Server,
            allowed_origins: Vec::new(),
            provider: MockPushProvider::new(true),
        }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestAppOptions::default()).await
    }

    pub async fn spawn_strict() -> Self {
        Self::spawn_with(TestAppOptions {
            variant: GatewayVariant::Strict,
            ..TestAppOptions::default()
        })
        .await
    }

    pub async fn spawn_with(options: TestAppOptions) -> Self {
        // Use random port for testing (port 0)
        let config = GatewayConfig {
            common: CommonConfig {
                port: 0,
                environment: "test".to_string(),
            },
            pushover: PushoverConfig {
                user_key: "test-user".to_string(),
                api_token: "test-token".to_string(),
                enabled: false, // Provider is supplied below
            },
            origin: OriginConfig {
                allowed_origins: options.allowed_origins,
            },
            variant: options.variant,
            deployment: options.deployment,
        };

        let push = Arc::new(options.provider);
        let provider: Arc<dyn PushProvider> = push.clone();
        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept requests by polling the root route.
        let client = reqwest::Client::new();
        let root_url = format!("{}/", address);
        for _ in 0..50 {
            if client.get(&root_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            push,
        }
    }

    pub fn contact_url(&self) -> String {
        format!("{}/api/contact", self.address)
    }
}
