use serde::{Deserialize, Serialize};

/// Which external optimizer a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OptimizerMode {
    #[default]
    #[serde(rename = "standard_optimizer", alias = "standard")]
    Standard,
    #[serde(rename = "dynamic_optimizer", alias = "dynamic")]
    Dynamic,
}

impl OptimizerMode {
    /// Wire tag used by the chat API and conversation history.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard_optimizer",
            Self::Dynamic => "dynamic_optimizer",
        }
    }

    /// Name used in result sentences.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Standard => "Traffic Optimizer",
            Self::Dynamic => "Dynamic Traffic Optimizer",
        }
    }
}

impl std::fmt::Display for OptimizerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// KPI names the dynamic optimizer reports as flat values.
pub const DYNAMIC_KPIS: [&str; 4] = ["Income", "Congestion inside", "Congestion (Delay)", "Emissions"];

/// Reachability of both optimizer services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OptimizerHealth {
    pub standard_optimizer: bool,
    pub dynamic_optimizer: bool,
}

impl OptimizerHealth {
    pub fn all_healthy(&self) -> bool {
        self.standard_optimizer && self.dynamic_optimizer
    }
}
