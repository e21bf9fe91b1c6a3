use anyhow::Result;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(
    name = "llm-mealplan-rust",
    version,
    about = "Culturally tailored low-residue meal plans for procedure prep"
)]
struct Cli {
    /// Patient's cultural background (e.g. Korean, "Middle Eastern")
    #[arg(short = 'c', long = "culture")]
    culture: Option<String>,

    /// Additional dietary restrictions, appended to the request verbatim
    #[arg(short = 'r', long = "restrictions")]
    restrictions: Option<String>,

    /// Also translate the plan into this language (e.g. Cantonese)
    #[arg(short = 't', long = "translate-to")]
    translate_to: Option<String>,

    /// Model name or provider:model (e.g. openai:gpt-4)
    #[arg(short = 'm', long = "model")]
    model: Option<String>,

    /// API key (overrides environment variables)
    #[arg(short = 'k', long = "key")]
    key: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(long = "read-settings")]
    read_settings: Option<String>,

    /// Show known cultures with their dialects/language codes and exit
    #[arg(long = "show-cultures")]
    show_cultures: bool,

    /// Show the low-residue diet rules and exit
    #[arg(long = "show-diet-rules")]
    show_diet_rules: bool,

    /// Run the HTTP server instead of one-shot mode
    #[arg(long = "serve")]
    serve: bool,

    /// Server bind address (overrides settings)
    #[arg(long = "addr")]
    addr: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    llm_mealplan_rust::logging::init(cli.verbose)?;

    if cli.serve {
        let settings_path = cli.read_settings.as_deref().map(Path::new);
        let settings = llm_mealplan_rust::settings::load_settings(settings_path)?;
        let addr = cli.addr.unwrap_or_else(|| settings.server_addr.clone());
        return llm_mealplan_rust::server::run_server(settings, addr).await;
    }

    let output = llm_mealplan_rust::run(llm_mealplan_rust::Config {
        culture: cli.culture,
        restrictions: cli.restrictions,
        translate_to: cli.translate_to,
        model: cli.model,
        key: cli.key,
        settings_path: cli.read_settings,
        show_cultures: cli.show_cultures,
        show_diet_rules: cli.show_diet_rules,
    })
    .await?;

    println!("{}", output);
    Ok(())
}
