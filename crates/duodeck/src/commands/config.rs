use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::presenter::timer::format_clock;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let thresholds = config.timer_thresholds();
    let [width, height] = config.presenter_size();
    let rows = [
        ("defaults.theme", config.theme_name().unwrap_or("light").to_string()),
        (
            "defaults.start_slide",
            config
                .start_slide()
                .map_or_else(|| "1".to_string(), |s| s.to_string()),
        ),
        (
            "timer.warning_after_secs",
            format!(
                "{} ({})",
                thresholds.warning_after.as_secs(),
                format_clock(thresholds.warning_after)
            ),
        ),
        (
            "timer.critical_after_secs",
            format!(
                "{} ({})",
                thresholds.critical_after.as_secs(),
                format_clock(thresholds.critical_after)
            ),
        ),
        ("presenter.width", width.to_string()),
        ("presenter.height", height.to_string()),
    ];
    for (key, value) in rows {
        println!("  {:<28} {}", key.cyan(), value);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    tracing::debug!(path = %path.display(), key, "config saved");
    println!("{} {} = {}", "Set".green().bold(), key.cyan(), value);
    Ok(())
}
