mod display;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use taxroute_ai::config::{API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL, DEFAULT_MODEL, MODEL_VAR};
use taxroute_ai::{GeminiClient, MatcherConfig, Resolver};
use taxroute_core::reference::ExcerptSource;
use taxroute_core::{
    AgencyReference, DirectoryIndex, RegionTable, TreasuryLookup, format_currency, normalize,
    to_words,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taxroute", version, about = "Resolve Vietnamese addresses to tax and treasury authorities")]
struct Cli {
    /// Treasury directory CSV replacing the embedded one.
    #[arg(long, global = true, env = "TAXROUTE_TREASURY_FILE")]
    treasury_file: Option<PathBuf>,

    /// Province-to-region CSV replacing the embedded one.
    #[arg(long, global = true, env = "TAXROUTE_REGION_FILE")]
    region_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an address to collecting agency, treasury and agency code.
    Resolve {
        address: String,
        #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, env = MODEL_VAR, default_value = DEFAULT_MODEL)]
        model: String,
        #[arg(long, env = BASE_URL_VAR, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Look up the treasury for a district and province.
    Treasury {
        #[arg(long)]
        district: String,
        #[arg(long)]
        province: String,
    },
    /// Show the treasury region of a province.
    Region { province: String },
    /// Print the agency reference excerpt sent for an address.
    Excerpt { address: String },
    /// Spell out an amount in Vietnamese words.
    Words { amount: String },
    /// Group an amount's digits with dots.
    Format { amount: String },
    /// Print the normalised matching key of a place name.
    Normalize { text: String },
    /// Summarise the treasury directory and region table.
    Stats,
}

/// Reference data: overrides from disk, else the embedded tables.
struct Datasets {
    index: Option<DirectoryIndex>,
    regions: Option<RegionTable>,
}

impl Datasets {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let index = cli
            .treasury_file
            .as_deref()
            .map(DirectoryIndex::load)
            .transpose()
            .context("loading treasury directory")?;
        let regions = cli
            .region_file
            .as_deref()
            .map(RegionTable::load)
            .transpose()
            .context("loading region table")?;
        Ok(Self { index, regions })
    }

    fn index(&self) -> &DirectoryIndex {
        self.index.as_ref().unwrap_or_else(|| DirectoryIndex::embedded())
    }

    fn regions(&self) -> &RegionTable {
        self.regions.as_ref().unwrap_or_else(|| RegionTable::embedded())
    }

    fn treasury(&self) -> TreasuryLookup<'_> {
        TreasuryLookup::new(self.index(), self.regions())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data = Datasets::load(&cli)?;

    match cli.command {
        Command::Resolve {
            address,
            api_key,
            model,
            base_url,
        } => {
            let config = MatcherConfig {
                api_key,
                model,
                base_url,
                ..MatcherConfig::default()
            };
            let client = GeminiClient::new(config).context("configuring Gemini client")?;
            let resolver = Resolver::new(client, AgencyReference::embedded(), data.treasury());
            let resolved = resolver.resolve(&address).await;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Command::Treasury { district, province } => {
            let Some(m) = data.treasury().lookup(&district, &province) else {
                bail!("province {province:?} is not in the region table");
            };
            info!(provenance = %display::match_summary(&m), "treasury resolved");
            println!("{}", m.display_name());
        }
        Command::Region { province } => {
            let Some(code) = data.regions().region_for(&province) else {
                bail!("province {province:?} is not in the region table");
            };
            println!("{}", display::region_line(code));
        }
        Command::Excerpt { address } => {
            let (excerpt, source) = AgencyReference::embedded().select_with_source(&address);
            match source {
                ExcerptSource::Province(key) => info!(province = key, "selected province block"),
                ExcerptSource::Default => info!("no province recognised; using default blocks"),
            }
            println!("{excerpt}");
        }
        Command::Words { amount } => {
            let words = to_words(&amount);
            if words.is_empty() {
                bail!("{amount:?} is not a non-negative whole amount below 10^18");
            }
            println!("{words}");
        }
        Command::Format { amount } => println!("{}", format_currency(&amount)),
        Command::Normalize { text } => println!("{}", normalize(&text)),
        Command::Stats => print!("{}", display::stats_table(data.index(), data.regions())),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_embedded_data() {
        let data = Datasets {
            index: None,
            regions: None,
        };
        assert_eq!(
            data.treasury().resolve_treasury("Quận 10", "Hồ Chí Minh").as_deref(),
            Some("Phòng Giao dịch số 3 - Kho bạc Nhà nước khu vực II")
        );
    }

    #[test]
    fn overrides_replace_embedded_data() {
        let data = Datasets {
            index: Some(DirectoryIndex::build("KHU VỰC 2\n,PGD Override,Quận 10\n")),
            regions: Some(RegionTable::from_csv("Hồ Chí Minh,II\n").unwrap()),
        };
        assert_eq!(
            data.treasury().resolve_treasury("Quận 10", "Hồ Chí Minh").as_deref(),
            Some("PGD Override - Kho bạc Nhà nước khu vực II")
        );
        assert!(data.regions().region_for("Hà Nội").is_none());
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "taxroute",
            "--region-file",
            "/nonexistent/taxroute/regions.csv",
            "stats",
        ])
        .unwrap();
        let err = Datasets::load(&cli).err().unwrap();
        assert!(format!("{err:#}").contains("loading region table"));
    }
}
