use anyhow::Result;
use clap::{Parser, Subcommand};
use snaplink::app::open_storage;
use snaplink::codegen::RandomCodeGenerator;
use snaplink::config::Config;
use snaplink::service::LinkService;
use snaplink::LinkError;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "snaplink-admin")]
#[command(about = "Snaplink link management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Create {
        /// Destination URL
        url: String,
        /// Explicit short code (6-8 alphanumeric characters)
        #[arg(long)]
        code: Option<String>,
    },
    /// Show a single link
    Show {
        /// Short code
        code: String,
    },
    /// List all links, newest first
    List,
    /// Delete a link
    Delete {
        /// Short code
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage = open_storage(&config).await?;
    let service = LinkService::with_generator(
        storage,
        Arc::new(RandomCodeGenerator),
        config.codegen_max_attempts,
    );

    match cli.command {
        Commands::Create { url, code } => {
            let link = service.create_link(&url, code.as_deref()).await?;
            println!("✓ Created '{}' -> {}", link.short_code, link.original_url);
        }
        Commands::Show { code } => match service.get_link(&code).await {
            Ok(link) => {
                println!("Short code:   {}", link.short_code);
                println!("URL:          {}", link.original_url);
                println!("Clicks:       {}", link.clicks);
                println!(
                    "Last clicked: {}",
                    link.last_clicked_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string())
                );
                println!("Created:      {}", link.created_at.to_rfc3339());
            }
            Err(LinkError::NotFound) => println!("⚠ Link '{}' not found", code),
            Err(e) => return Err(e.into()),
        },
        Commands::List => {
            let links = service.list_links().await?;
            if links.is_empty() {
                println!("No links found.");
            } else {
                println!("{:<10} {:>8} {}", "Code", "Clicks", "URL");
                println!("{}", "-".repeat(80));
                for link in links {
                    println!("{:<10} {:>8} {}", link.short_code, link.clicks, link.original_url);
                }
            }
        }
        Commands::Delete { code } => match service.delete_link(&code).await {
            Ok(()) => println!("✓ Deleted link '{}'", code),
            Err(LinkError::NotFound) => println!("⚠ Link '{}' not found", code),
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}
