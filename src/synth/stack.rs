//! Deployment context and the resource ledger synthesis writes into.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::fmt;

use crate::models::error::SynthError;

/// Deployment stage. Anything other than `prod` is treated as a development
/// stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Dev,
    Prod,
}

impl Stage {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("prod") {
            Self::Prod
        } else {
            Self::Dev
        }
    }

    #[must_use]
    pub const fn is_prod(self) -> bool {
        matches!(self, Self::Prod)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the synthesizer needs to know about the target environment.
#[derive(Debug, Clone)]
pub struct DeployContext {
    pub stage: Stage,
    pub region: String,
    pub account: String,
    pub user_pool_arn: String,
}

impl DeployContext {
    #[must_use]
    pub fn new(
        stage: Stage,
        region: impl Into<String>,
        account: impl Into<String>,
        user_pool_arn: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            region: region.into(),
            account: account.into(),
            user_pool_arn: user_pool_arn.into(),
        }
    }

    /// Reads the context from the environment. Every variable is required;
    /// synthesis never guesses an account or a region.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::MissingConfig`] naming the first unset variable.
    pub fn from_env() -> Result<Self, SynthError> {
        let stage = require_var("STAGE")?;
        let region = require_var("AWS_REGION")?;
        let account = require_var("AWS_ACCOUNT_ID")?;
        let user_pool_arn = require_var("USER_POOL_ARN")?;
        Ok(Self {
            stage: Stage::parse(&stage),
            region,
            account,
            user_pool_arn,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, SynthError> {
    env::var(name).map_err(|_| SynthError::MissingConfig { name })
}

/// Handle to a function recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRef {
    pub name: String,
    pub arn: String,
}

impl FunctionRef {
    /// Invocation URI the gateway uses to call this function.
    #[must_use]
    pub fn invocation_uri(&self, region: &str) -> String {
        format!(
            "arn:aws:apigateway:{region}:lambda:path/2015-03-31/functions/{}/invocations",
            self.arn
        )
    }
}

/// One resource the deployment declares.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Resource {
    #[serde(rename_all = "camelCase")]
    Function {
        name: String,
        handler: String,
        arn: String,
    },
    #[serde(rename_all = "camelCase")]
    Permission { function: String, principal: String },
    #[serde(rename_all = "camelCase")]
    RestApi {
        name: String,
        deploy: bool,
        definition: Value,
    },
}

/// Ordered ledger of resources produced by one synthesis run. Appending the
/// same inputs in the same order always renders the same document.
#[derive(Debug, Default, Serialize)]
pub struct Stack {
    resources: Vec<Resource>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    outputs: IndexMap<String, String>,
}

impl Stack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a function and returns a handle for wiring permissions and
    /// integrations to it.
    pub fn add_function(
        &mut self,
        name: impl Into<String>,
        handler: impl Into<String>,
        context: &DeployContext,
    ) -> FunctionRef {
        let name = name.into();
        let arn = format!(
            "arn:aws:lambda:{}:{}:function:{name}",
            context.region, context.account
        );
        self.resources.push(Resource::Function {
            name: name.clone(),
            handler: handler.into(),
            arn: arn.clone(),
        });
        FunctionRef { name, arn }
    }

    /// Grants a service principal permission to invoke a function.
    pub fn add_permission(&mut self, function: &FunctionRef, principal: impl Into<String>) {
        self.resources.push(Resource::Permission {
            function: function.name.clone(),
            principal: principal.into(),
        });
    }

    /// Records the gateway itself with its inline definition. The API is
    /// always deployed in the same change set as the definition so the two
    /// cannot drift apart.
    pub fn add_rest_api(&mut self, name: impl Into<String>, definition: Value) {
        self.resources.push(Resource::RestApi {
            name: name.into(),
            deploy: true,
            definition,
        });
    }

    pub fn add_output(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.outputs.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    #[must_use]
    pub const fn outputs(&self) -> &IndexMap<String, String> {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parse_is_case_insensitive() {
        assert_eq!(Stage::parse("prod"), Stage::Prod);
        assert_eq!(Stage::parse("PROD"), Stage::Prod);
        assert_eq!(Stage::parse("dev"), Stage::Dev);
        assert_eq!(Stage::parse("staging"), Stage::Dev);
    }

    #[test]
    fn test_invocation_uri_embeds_region_and_arn() {
        let function = FunctionRef {
            name: String::from("Org-Fetch"),
            arn: String::from("arn:aws:lambda:eu-west-1:111122223333:function:Org-Fetch"),
        };
        assert_eq!(
            function.invocation_uri("eu-west-1"),
            "arn:aws:apigateway:eu-west-1:lambda:path/2015-03-31/functions/\
             arn:aws:lambda:eu-west-1:111122223333:function:Org-Fetch/invocations"
        );
    }
}
