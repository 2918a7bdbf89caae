use anyhow::{Result, bail};

use super::Service;

pub(crate) fn cmd_reminder(svc: &Service, enabled: Option<bool>, json: bool) -> Result<()> {
    if let Some(enabled) = enabled {
        svc.set_reminder(enabled)?;
    }
    let enabled = svc.reminder()?;

    if json {
        println!("{}", serde_json::json!({ "reminder_enabled": enabled }));
    } else {
        println!("Daily reminder: {}", if enabled { "on" } else { "off" });
    }
    Ok(())
}

pub(crate) fn cmd_wipe(svc: &Service, yes: bool, json: bool) -> Result<()> {
    if !yes {
        bail!("This deletes your profile, every logged day and all weight entries. Re-run with --yes to confirm");
    }
    let removed = svc.wipe()?;

    if json {
        println!("{}", serde_json::json!({ "removed_keys": removed }));
    } else {
        println!("All data deleted ({removed} records)");
    }
    Ok(())
}
