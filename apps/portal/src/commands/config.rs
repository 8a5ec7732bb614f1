//! # Config Commands

use tracing::debug;

use crate::state::PortalConfig;

/// Gets the current portal configuration.
///
/// ## When Used
/// - App startup (display precision, currency symbol)
/// - Populating the DIFAL state selector from the aliquot table
pub fn get_config(config: &PortalConfig) -> PortalConfig {
    debug!("get_config command");
    config.clone()
}
