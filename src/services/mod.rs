pub mod config_store;
pub mod memory_monitor;
pub mod metrics_hub;
pub mod sampler;

pub use config_store::*;
pub use memory_monitor::{AlertDecision, MemoryMonitor, MemorySample, ProcessSample};
pub use metrics_hub::{MetricsHub, Subscription};
pub use sampler::{build_snapshot, run_sampler, terminate_process, SysinfoSampler};
