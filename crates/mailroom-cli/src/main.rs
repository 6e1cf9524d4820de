//! Thin entrypoint for the `mailroom` binary.

#[tokio::main]
async fn main() {
    let code = mailroom_cli::run().await;
    std::process::exit(code);
}
