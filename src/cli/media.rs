use crate::cli::MediaCommand;
use crate::client::MediaClient;
use crate::models::{CreateMediaRequest, MediaItem, MediaType};
use anyhow::{anyhow, Result};

pub async fn run(server: &str, command: MediaCommand) -> Result<()> {
    let client = MediaClient::new(server)?;

    match command {
        MediaCommand::List { media_type } => {
            let query = client.list_query();
            let items: Vec<MediaItem> = match media_type {
                Some(raw) => {
                    let media_type = raw
                        .parse::<MediaType>()
                        .map_err(|_| anyhow!("unknown media type '{}'", raw))?;
                    query.of_type(media_type).await?
                }
                None => query.fetch().await?.to_vec(),
            };

            if items.is_empty() {
                println!("The vault is empty.");
            }
            for item in &items {
                println!(
                    "{:>6}  {:<5}  {:<32}  {}",
                    item.id,
                    item.media_type,
                    item.title,
                    item.preview_url()
                );
            }
        }
        MediaCommand::Add {
            media_type,
            title,
            url,
            thumbnail,
        } => {
            // Validate locally so obvious mistakes never reach the server.
            let input = CreateMediaRequest {
                media_type: Some(media_type),
                title: Some(title),
                url: Some(url),
                thumbnail_url: thumbnail,
            }
            .validate()?;

            let item = client.create_mutation().mutate(&input).await?;
            println!("Added {} {} ({})", item.media_type, item.id, item.title);
        }
        MediaCommand::Remove { id } => {
            client.delete_mutation().mutate(id).await?;
            println!("Requested removal of {}", id);
        }
        MediaCommand::RemoveMany { ids } => {
            client.delete_many_mutation().mutate(&ids).await?;
            println!("{}", remove_many_summary(&ids));
        }
    }

    Ok(())
}

/// The server skips unknown ids and does not report how many rows went away,
/// so only the request itself can be described.
fn remove_many_summary(ids: &[i64]) -> String {
    format!("Requested removal of {} id(s)", ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_many_summary_counts_requested_ids() {
        assert_eq!(
            remove_many_summary(&[1, 2, 999]),
            "Requested removal of 3 id(s)"
        );
    }
}
