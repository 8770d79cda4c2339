use anyhow::Result;
use chills_core::ChillsConfig;
use owo_colors::OwoColorize;

pub fn run(config: &ChillsConfig, json: bool) -> Result<()> {
    let config_path = ChillsConfig::config_path()?;

    if json {
        let mut value = serde_json::to_value(config)?;
        value["config_path"] = serde_json::Value::String(config_path.display().to_string());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!(
        "  Roster:     {}",
        config
            .roster_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".dimmed().to_string())
    );

    println!();
    println!("{}", "Settings".bold());
    println!("  Timezone:       {}", config.reference_timezone);
    println!("  Overlap scope:  {}", config.overlap_scope);
    println!("  Default sort:   {}", config.default_sort);
    println!("  Import window:  {} days", config.import_window_days);

    Ok(())
}
