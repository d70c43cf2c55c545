// Scrumpy Build - CLI entry point

use scrumpy_build::cli::CliHandler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let handler = CliHandler::new();

    handler
        .run()
        .await
        .map_err(|e| anyhow::anyhow!(e.format_detailed()))
}
