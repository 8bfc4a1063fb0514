use std::io;

use barhop::config::Config;
use barhop::engine::Engine;
use barhop::error::Error;
use barhop::prompt;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Err(err);
        }
    };

    let engine = Engine::new(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();

    prompt::run(&engine, &mut stdin.lock(), &mut stdout.lock()).await?;

    Ok(())
}
