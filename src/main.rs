use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ragchat::application::{ChatService, IndexingService};
use ragchat::domain::{Chunker, Conversation};
use ragchat::infrastructure::config::Config;
use ragchat::infrastructure::{DocumentLoader, IndexTrust, OllamaChat, OllamaEmbedding, VectorIndex};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragchat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let embedding = Arc::new(OllamaEmbedding::from_config(&config.embedding));
    let chat_model = Arc::new(OllamaChat::from_config(&config.llm));
    let loader = DocumentLoader::new(&config.user_agent)?;
    let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

    let indexing = IndexingService::new(loader, chunker, embedding.clone());
    let chat = ChatService::new(chat_model, config.top_k);

    let locations: Vec<String> = std::env::args().skip(1).collect();
    let index = if locations.is_empty() {
        match &config.index_dir {
            Some(dir) => {
                let trust = if config.trust_saved_index {
                    IndexTrust::Trusted
                } else {
                    IndexTrust::Unverified
                };
                match VectorIndex::load(dir, embedding.clone(), trust).await {
                    Ok(index) => {
                        info!(entries = index.len(), dir = %dir.display(), "loaded saved index");
                        Some(index)
                    }
                    Err(err) => {
                        eprintln!("Could not load saved index: {err}");
                        None
                    }
                }
            }
            None => None,
        }
    } else {
        let (status, index) = indexing.build_index(&locations).await;
        println!("{status}");
        if let (Some(index), Some(dir)) = (&index, &config.index_dir) {
            index.save(dir).await?;
            info!(dir = %dir.display(), "index saved");
        }
        index
    };

    let mut conversation = Conversation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(b"> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        let mut stream = chat
            .answer(question, conversation.messages(), index.as_ref())
            .await;
        conversation.push_user(question);

        let mut reply = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(delta) => {
                    stdout.write_all(delta.as_bytes()).await?;
                    stdout.flush().await?;
                    reply.push_str(&delta);
                }
                Err(err) => {
                    eprintln!("\nAnswer failed: {err}");
                    break;
                }
            }
        }
        conversation.push_assistant(reply);

        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
