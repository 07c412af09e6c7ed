use std::env;

use sales_analyzer::app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Bind address is the only knob; everything else is fixed per session.
    let addr =
        env::var("SALES_ANALYZER_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    app::run(&addr).await
}
