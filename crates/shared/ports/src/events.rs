use std::sync::Arc;

use nonstop_core::{SourceId, Tick};

use crate::config::{PluginIdentity, ServerCategory};
use crate::error::HostResult;

/// Handle returned by a subscription, used to cancel it
pub type SubscriptionId = u64;

/// Called for every tick entering the price stream
pub type TickHandler = Arc<dyn Fn(SourceId, &Tick) + Send + Sync>;

/// Called whenever any plugin's configuration changes
pub type PluginConfigHandler = Arc<dyn Fn(&PluginIdentity) + Send + Sync>;

/// Called whenever a server's configuration changes
pub type ServerConfigHandler = Arc<dyn Fn(ServerCategory) + Send + Sync>;

/// Port for registering host-to-engine callbacks
///
/// Each event type has its own registration; handlers may be invoked from
/// several host threads at once.
pub trait EventHub: Send + Sync {
    fn subscribe_ticks(&self, handler: TickHandler) -> HostResult<SubscriptionId>;

    fn subscribe_plugin_config(&self, handler: PluginConfigHandler)
    -> HostResult<SubscriptionId>;

    fn subscribe_server_config(&self, handler: ServerConfigHandler)
    -> HostResult<SubscriptionId>;

    /// Cancel a subscription; unknown ids are ignored
    fn unsubscribe(&self, id: SubscriptionId);
}
