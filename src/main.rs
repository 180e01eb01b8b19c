mod app;

use env_logger::Env;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout only carries the banner or the confirmation.
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    app::run()
}
