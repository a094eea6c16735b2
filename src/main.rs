use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    completion_context::cli::run().await
}
