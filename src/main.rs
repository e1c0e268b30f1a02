#[tokio::main]
async fn main() -> std::io::Result<()> {
    singularity_server::run_with_config().await
}
