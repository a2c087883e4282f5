pub mod category;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod entry;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(category::definitions())
        .chain(entry::definitions())
        .chain(dashboard::definitions())
        .chain(data::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
}
