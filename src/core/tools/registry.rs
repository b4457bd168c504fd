//! Name -> tool lookup, built once at startup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use super::availability::DummyAvailabilityTool;
use super::base::{Tool, ToolDescription, ToolError, ToolResult};
use super::calendar::{BookingMatcher, CalClient, CancelBookingTool, CreateBookingTool};
use super::staff::CreateCallBackTool;
use super::{CANCEL_BOOKING, CREATE_BOOKING, CREATE_CALL_BACK, GET_DUMMY_AVAILABILITY};
use crate::config::ServerConfig;
use crate::prompts::Prompts;

/// Timeout for every outbound tool request.
const TOOL_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Registered tools, kept in declaration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        match self.index.get(name) {
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&pos| self.tools[pos].clone())
    }

    pub fn descriptions(&self) -> Vec<ToolDescription> {
        self.tools.iter().map(|t| t.description()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Build the tools listed in `config.enabled_tools`, in that order.
    pub fn from_config(config: &ServerConfig, prompts: &Prompts) -> ToolResult<Self> {
        let http = Client::builder()
            .timeout(TOOL_HTTP_TIMEOUT)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| ToolError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        let mut cal_client: Option<Arc<CalClient>> = None;
        let mut calendar = || -> ToolResult<Arc<CalClient>> {
            if let Some(ref client) = cal_client {
                return Ok(client.clone());
            }
            let client = Arc::new(CalClient::from_config(http.clone(), config)?);
            cal_client = Some(client.clone());
            Ok(client)
        };

        let mut tools: Vec<Arc<dyn Tool>> = Vec::with_capacity(config.enabled_tools.len());
        for name in &config.enabled_tools {
            let tool: Arc<dyn Tool> = match name.as_str() {
                CREATE_BOOKING => Arc::new(CreateBookingTool::new(calendar()?)),
                CANCEL_BOOKING => Arc::new(CancelBookingTool::new(
                    calendar()?,
                    BookingMatcher::from_config(http.clone(), config),
                    prompts.find_calendar_entries.clone(),
                )),
                CREATE_CALL_BACK => Arc::new(CreateCallBackTool::new(
                    http.clone(),
                    config.staff_webhook_url.clone(),
                )),
                GET_DUMMY_AVAILABILITY => Arc::new(DummyAvailabilityTool),
                other => {
                    return Err(ToolError::Configuration(format!("unknown tool '{other}'")));
                }
            };
            tools.push(tool);
        }

        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool);
        }

        info!(tools = ?registry.names(), "Tool registry initialized");
        Ok(registry)
    }
}
