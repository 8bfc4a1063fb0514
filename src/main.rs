use barhop::config::Config;
use barhop::engine::Engine;
use barhop::error::Error;
use barhop::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().map_err(|err| {
        tracing::error!("{}", err);
        err
    })?;

    let engine = Engine::new(&config)?;

    serve(engine, &config.server).await
}
