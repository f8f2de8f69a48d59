mod config;
mod info;
mod link;
mod list;
mod run;
mod source;

pub use config::{cmd_config_get, cmd_config_list, cmd_config_set, cmd_config_unset};
pub use info::cmd_info;
pub use link::cmd_link;
pub use list::cmd_list;
pub use run::cmd_run;
pub use source::{cmd_source_delete, cmd_source_list, cmd_source_update};
