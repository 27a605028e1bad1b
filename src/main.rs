use restaurant_orders::config::Config;
use restaurant_orders::console::Console;
use restaurant_orders::error::AppError;
use restaurant_orders::seed::Seed;
use restaurant_orders::state::AppState;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.compact().init();
    }

    let seed = match &config.seed_file {
        Some(path) => Seed::load(path).await?,
        None => Seed::builtin(),
    };
    let (menu, inventory) = seed.into_parts()?;

    tracing::info!(
        menu_items = menu.len(),
        ingredients = inventory.len(),
        sales_log = %config.sales_log_path.display(),
        prep_delay = ?config.prep_delay,
        "restaurant opened"
    );

    let mut state = AppState::from_config(menu, inventory, &config);
    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    console.run(&mut state).await?;

    match state.metrics.encode() {
        Ok(snapshot) => tracing::debug!(%snapshot, "final metrics"),
        Err(err) => tracing::warn!(error = %err, "failed to encode metrics"),
    }

    Ok(())
}
