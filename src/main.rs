use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tokio::net::TcpListener;

use funhttp::{
    cheer, complain,
    config::{GithubBaseUrl, ServerConfig},
    message::Message,
    oops,
    router::Router,
    say, server, VERSION,
};

#[derive(Parser)]
#[command(name = "funhttp")]
#[command(version = VERSION)]
#[command(about = "Serve static files, a GitHub proxy and a password generator over raw TCP")]
struct Cli {
    /// Port to listen on [env: FUNHTTP_PORT, default: 9000]
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Address to bind [env: FUNHTTP_BIND, default: 0.0.0.0]
    #[arg(short = 'b', long)]
    bind: Option<IpAddr>,

    /// Directory holding root.html and index.html [env: FUNHTTP_WWW]
    #[arg(short = 'w', long)]
    www: Option<PathBuf>,

    /// Base directory for file/<name> requests [env: FUNHTTP_FILE_ROOT]
    #[arg(short = 'f', long)]
    file_root: Option<PathBuf>,

    /// GitHub API base URL [env: FUNHTTP_GITHUB_API]
    #[arg(long)]
    github_api: Option<String>,

    /// Refuse file/<name> paths that escape the file root [env: FUNHTTP_STRICT_PATHS]
    #[arg(long)]
    strict_paths: bool,

    /// Print the route table and exit
    #[arg(long)]
    routes: bool,
}

impl Cli {
    /// environment first, then anything given on the command line
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = ServerConfig::default();

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(www) = self.www {
            config.www_dir = www;
        }
        if let Some(file_root) = self.file_root {
            config.file_root = file_root;
        }
        if let Some(url) = self.github_api {
            config.github_api = GithubBaseUrl::parse(&url).map_err(|e| eyre!("{}", e))?;
        }
        if self.strict_paths {
            config.strict_path_containment = true;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();

    if cli.routes {
        Message::print_routes();
        return Ok(());
    }

    let config = cli.into_config()?;
    log::info!("starting with {}", config);
    Message::print_banner(&config);

    if !config.www_dir.is_dir() {
        complain!(
            "content directory '{}' does not exist, index and random pages will 404",
            config.www_dir.display()
        );
    }

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            oops!("could not bind {}: {}", addr, err);
            return Err(eyre!("failed to bind {}: {}", addr, err));
        }
    };

    cheer!("listening on http://{}", addr);
    say!("set RUST_LOG=info for access logs");

    let router = Arc::new(Router::from_config(&config));
    server::serve(listener, router, config.client_timeout).await;

    Ok(())
}
