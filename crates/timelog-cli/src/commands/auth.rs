use clap::Subcommand;
use serde_json::json;
use timelog_core::{credentials, Config, NotionClient, RecordStore};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a Notion integration token in the OS keyring
    Notion {
        /// Internal integration token
        #[arg(long)]
        token: String,
        /// Database the records are written to
        #[arg(long)]
        database_id: Option<String>,
        /// Store the token without checking it against the database
        #[arg(long)]
        no_verify: bool,
    },
    /// Remove the stored Notion token
    Disconnect,
    /// Check whether a token is available
    Status,
}

pub async fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Notion {
            token,
            database_id,
            no_verify,
        } => {
            let mut config = Config::load()?;
            if let Some(id) = database_id {
                config.set("notion.database_id", &id)?;
            }
            if !no_verify {
                let client =
                    NotionClient::new(&config.notion.base_url, &token, config.database_id()?);
                client.query_records(&json!({ "page_size": 1 })).await?;
            }
            credentials::set_notion_token(&token)?;
            println!("Notion authenticated");
        }
        AuthAction::Disconnect => {
            credentials::delete_notion_token()?;
            println!("Notion disconnected");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if credentials::has_notion_token() {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }
    }
    Ok(())
}
