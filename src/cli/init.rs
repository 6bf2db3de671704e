//! devboard init command implementation
//!
//! Writes a default `.devboard.toml` so the board columns, backend URL and
//! heatmap scale can be edited in one place.

use std::path::PathBuf;

use crate::cli::Context;
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

#[derive(serde::Serialize)]
struct InitReport {
    config: PathBuf,
    created: bool,
}

pub(crate) fn run(context: &Context, force: bool) -> Result<()> {
    let path = context.config_path.clone();
    let created = force || !path.exists();
    if created {
        let config = if force {
            Config::default()
        } else {
            context.config.clone()
        };
        config.save(&path)?;
    }

    let header = if created {
        "devboard init: wrote config"
    } else {
        "devboard init: config already present"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("config", path.display().to_string());
    if !created {
        human.push_next_step("devboard init --force");
    }

    emit_success(
        context.output,
        "init",
        &InitReport {
            config: path,
            created,
        },
        Some(&human),
    )
}
