//! Command handlers.

use anyhow::Context;
use colored::Colorize;
use nlsearch_client::SearchClient;
use nlsearch_core::SearchBackendConfig;
use nlsearch_parser::NlqParser;
use std::io::{self, BufRead, Write};

/// Connection overrides collected from flags and environment.
pub struct Connection {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
}

impl Connection {
    /// Build a client: env-based configuration first, flags win.
    fn client(&self) -> anyhow::Result<SearchClient> {
        let config = SearchBackendConfig::load().context("loading backend configuration")?;

        let mut builder = SearchClient::builder()
            .base_url(self.url.clone().unwrap_or_else(|| config.base_url()))
            .timeout(config.timeout())
            .accept_invalid_certs(self.insecure || !config.verify_certs);

        let username = self.username.clone().or(config.username);
        let password = self.password.clone().or(config.password);
        if let (Some(user), Some(pass)) = (username, password) {
            builder = builder.basic_auth(user, pass);
        }

        builder.build().context("building backend client")
    }
}

pub fn parse(sentence: &str, pretty: bool) -> anyhow::Result<()> {
    let parser = NlqParser::new();
    let doc = parser.parse(sentence);
    let json = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    println!("{json}");
    Ok(())
}

pub async fn query(
    connection: &Connection,
    sentence: &str,
    index: &str,
    dry_run: bool,
) -> anyhow::Result<()> {
    let parser = NlqParser::new();
    let doc = parser.try_parse(sentence)?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let client = connection.client()?;
    let result = client.execute(&doc, index).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn health(connection: &Connection) -> anyhow::Result<()> {
    let client = connection.client()?;
    let health = client.cluster_health().await?;
    let status = health["status"].as_str().unwrap_or("unknown");
    let colored_status = match status {
        "green" => status.green(),
        "yellow" => status.yellow(),
        _ => status.red(),
    };
    println!("cluster status: {colored_status}");
    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}

pub fn repl() -> anyhow::Result<()> {
    let parser = NlqParser::new();
    let stdin = io::stdin();

    println!("{}", "NLSearch interactive mode".bold());
    println!("Type a sentence; 'quit' or 'exit' to stop.\n");

    loop {
        print!("nlq> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit" | "q") {
            break;
        }

        println!("{}\n", parser.parse_to_json(line));
    }

    println!("bye");
    Ok(())
}
