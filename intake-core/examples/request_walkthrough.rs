use std::sync::Arc;

use anyhow::Context;
use intake_core::models::Priority;
use intake_core::requests::WorkRequests;
use intake_core::session::{IntakeSession, Upload};
use intake_store::config::StoreConfig;
use intake_store::quickbase::QuickbaseClient;

/// Walk a work request end to end: create it, answer every question on
/// its form (attaching a file to the first one), and report progress.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = StoreConfig::load().context("realm configuration")?;
    let store = Arc::new(QuickbaseClient::new(config)?);

    let request = WorkRequests::new(store.clone())
        .create("Walkthrough request", Priority::Medium)
        .await?;
    println!("work request {} on form {}", request.id, request.form_id);

    let session = IntakeSession::for_request(store, &request);
    let board = session.question_board().await?;
    println!("{} questions on the form", board.entries.len());

    for (index, entry) in board.entries.iter().enumerate() {
        let upload = (index == 0).then(|| Upload {
            file_name: "site-photo.jpg".to_string(),
            content: vec![0xFF, 0xD8, 0xFF, 0xE0],
        });
        let answer_id = session
            .submit_answer(
                &entry.question.id.to_string(),
                &format!("answer to: {}", entry.question.text),
                upload,
            )
            .await?;
        println!("answered question {} -> answer {}", entry.question.id, answer_id);
    }

    let progress = session.progress().await?;
    println!(
        "progress: {}/{} ({:.0}%)",
        progress.completed, progress.total, progress.percentage
    );

    Ok(())
}
