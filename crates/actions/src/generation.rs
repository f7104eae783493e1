use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use trigon_core::{ActionSpec, TenantId};

use crate::error::ActionError;
use crate::handler::{ActionHandler, Invocation};

/// A content-generation request forwarded to the external collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub tenant: TenantId,
    /// Which prompt-template agent to use (e.g. `"copywriter"`).
    pub agent: String,
    pub prompt: String,
    pub output_type: String,
}

/// Boundary to the text-generation collaborator. The engine only carries
/// the request across and returns the collaborator's descriptor verbatim;
/// the generation mechanism itself lives elsewhere.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce content for the request.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, ActionError>;
}

/// Handler for the `ai_generation` action type.
pub struct GenerationHandler {
    generator: Arc<dyn ContentGenerator>,
}

impl GenerationHandler {
    /// Create a handler delegating to the given generator.
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ActionHandler for GenerationHandler {
    fn kind(&self) -> &str {
        "ai_generation"
    }

    #[instrument(skip(self, invocation), fields(tenant = %invocation.tenant))]
    async fn execute(
        &self,
        invocation: &Invocation<'_>,
    ) -> Result<serde_json::Value, ActionError> {
        let ActionSpec::AiGeneration {
            agent,
            prompt,
            output_type,
        } = invocation.spec
        else {
            return Err(ActionError::InvalidConfig(format!(
                "generation handler received {} config",
                invocation.spec.kind()
            )));
        };

        let request = GenerationRequest {
            tenant: invocation.tenant.clone(),
            agent: agent.clone(),
            prompt: prompt.clone(),
            output_type: output_type.clone(),
        };
        let descriptor = self.generator.generate(&request).await?;

        debug!(agent = %agent, "content generated");
        Ok(descriptor)
    }
}
