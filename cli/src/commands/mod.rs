mod helpers;
mod log;
mod profile;
mod settings;
mod summary;
mod weight;

use portion_core::service::PortionService;

/// The service as the CLI runs it: `SQLite` on disk, system clock.
pub(crate) type Service = PortionService;

pub(crate) use log::{cmd_exercise, cmd_log, cmd_unlog, cmd_water};
pub(crate) use profile::{cmd_setup, cmd_targets_recalculate, cmd_targets_set, cmd_targets_show};
pub(crate) use settings::{cmd_reminder, cmd_wipe};
pub(crate) use summary::{cmd_adherence, cmd_history, cmd_today};
pub(crate) use weight::{cmd_weight_delete, cmd_weight_history, cmd_weight_log, cmd_weight_stats};
