// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and registry.
//!
//! The [`Tool`] trait defines the interface every workflow tool implements.
//! The [`ToolRegistry`] manages tool lookup by name, compiles each tool's
//! parameter schema at registration, and validates arguments against it
//! before any handler runs -- a failed validation never reaches the handler.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use skylark_core::types::{ToolCall, ToolResult, ToolSchema};
use skylark_core::{ReservationStore, SkylarkError};
use tracing::debug;

use crate::payments::PaymentLedger;

/// Output from a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The content returned by the tool, JSON-encoded for the model.
    pub content: String,
    /// Whether the invocation resulted in an error.
    pub is_error: bool,
}

impl ToolOutput {
    /// A successful output carrying a JSON payload.
    pub fn json(value: &serde_json::Value) -> Self {
        Self {
            content: value.to_string(),
            is_error: false,
        }
    }

    /// An error output. The message is fed back to the model so the
    /// conversation can recover.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: serde_json::json!({ "error": message.into() }).to_string(),
            is_error: true,
        }
    }
}

/// Request-scoped context threaded into every tool handler.
///
/// Carries the caller identity and the persistence handles a handler may
/// touch. Never ambient global state.
#[derive(Clone)]
pub struct ToolContext {
    /// Authenticated user id, when the session provider supplied one.
    pub user_id: Option<String>,
    pub reservations: Arc<dyn ReservationStore>,
    pub payments: Arc<PaymentLedger>,
}

/// Interface implemented by every workflow tool.
///
/// Each tool declares a name, a description (forwarded to the model for tool
/// selection), and a JSON Schema for its parameters. The registry validates
/// arguments against the schema before calling `invoke`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (used for lookup and API serialization).
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Invokes the tool with validated JSON input.
    async fn invoke(
        &self,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError>;
}

/// Registry of available tools, indexed by name.
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

struct RegisteredTool {
    tool: Arc<dyn Tool>,
    validator: Validator,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool, compiling its parameter schema.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), SkylarkError> {
        let schema = tool.parameters_schema();
        let validator = jsonschema::validator_for(&schema).map_err(|e| {
            SkylarkError::Config(format!(
                "invalid parameter schema for tool {}: {e}",
                tool.name()
            ))
        })?;
        self.tools.insert(
            tool.name().to_string(),
            RegisteredTool { tool, validator },
        );
        Ok(())
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| entry.tool.clone())
    }

    /// Returns declared schemas for all registered tools, sorted by name.
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .map(|entry| ToolSchema {
                name: entry.tool.name().to_string(),
                description: entry.tool.description().to_string(),
                parameters: entry.tool.parameters_schema(),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Executes a model-issued tool call, producing exactly one result.
    ///
    /// Unknown tools, schema violations, and handler failures all come back
    /// as error results for the model to recover from conversationally --
    /// never as turn-ending errors.
    pub async fn dispatch(&self, call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        let Some(entry) = self.tools.get(&call.name) else {
            return ToolResult {
                call_id: call.id.clone(),
                content: ToolOutput::error(format!("unknown tool: {}", call.name)).content,
                is_error: true,
            };
        };

        let violations: Vec<String> = entry
            .validator
            .iter_errors(&call.arguments)
            .map(|e| e.to_string())
            .collect();
        if !violations.is_empty() {
            debug!(tool = %call.name, "tool arguments failed schema validation");
            return ToolResult {
                call_id: call.id.clone(),
                content: ToolOutput::error(format!(
                    "invalid arguments: {}",
                    violations.join("; ")
                ))
                .content,
                is_error: true,
            };
        }

        let output = match entry.tool.invoke(call.arguments.clone(), ctx).await {
            Ok(output) => output,
            Err(e) => ToolOutput::error(e.to_string()),
        };
        ToolResult {
            call_id: call.id.clone(),
            content: output.content,
            is_error: output.is_error,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
