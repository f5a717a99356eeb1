use chrono::{SecondsFormat, Utc};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spyglass::config::Config;
use spyglass::http::{Delegate, HttpServer};
use spyglass::observer::{self, Palette, Renderer};

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so they never interleave with the request
    // log on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spyglass=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::parse();
    let palette = Palette::colored();

    // One renderer task for the lifetime of the process. It runs on its own
    // task: if it ever dies, logging stops but serving continues.
    let (observer, records) = observer::channel();
    let renderer = Renderer::stdout(records, palette.clone(), !config.quiet);
    tokio::spawn(renderer.run());

    let delegate = Delegate::from_config(&config);
    let serving = match &delegate {
        Delegate::None => String::new(),
        Delegate::Files(_) => format!("files from {} ", config.directory.display()),
        Delegate::Uploads(..) => format!(
            "files from {} (with upload support) ",
            config.directory.display()
        ),
    };

    let addr = config.bind_address();
    println!(
        "This is {} serving {}on {}\n",
        palette.banner.paint("spyglass"),
        serving,
        addr
    );

    let server = HttpServer::new(observer, delegate);
    let outcome = match TcpListener::bind(addr).await {
        Ok(listener) => server.run(listener).await,
        Err(error) => Err(error),
    };

    if let Err(error) = outcome {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        eprintln!("{} {} - {}", palette.error.paint("ERROR"), timestamp, error);
        std::process::exit(1);
    }
}
