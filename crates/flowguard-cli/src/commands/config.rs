use clap::Subcommand;
use flowguard_core::AnalyzerConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file if none exists
    Init,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = AnalyzerConfig::load_or_default();
            let toml = toml::to_string_pretty(&config)?;
            print!("{toml}");
            if config.api_key().is_some() {
                println!("# api key: configured");
            } else {
                println!("# api key: not set (deterministic narrative)");
            }
        }
        ConfigAction::Init => {
            let config = AnalyzerConfig::load()?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::Reset => {
            let config = AnalyzerConfig::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
