mod app;
mod session;

pub use app::App;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stimrig_app=info".parse()?)
                .add_directive("stimrig_sequencer=info".parse()?)
                .add_directive("stimrig_spawn=warn".parse()?)
                .add_directive("stimrig_daq=info".parse()?),
        )
        .init();

    let session_path = std::env::args().nth(1);
    let app = App::new(session_path.as_deref())?;
    app.run()
}
