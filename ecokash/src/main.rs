use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ecokashlib::{
    formats::{csv::Csv, json::Json},
    http,
    model::{UserId, UserProfile},
    rpc::{StatusClient, DEVNET_RPC_URL},
    service::RewardService,
    session::{read_script, Action, Session},
    signature::{explorer_url, generate_signature, is_signature, Cluster, MockAttestor},
    store::{MemoryStore, Seed},
    traits::WriteFormat,
};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ecokash", version, about = "Кошелёк наград за вторсырьё: сервер и утилиты")]
struct Cli {
    /// Подробный лог (debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// HTTP-сервер /api/deposits и /api/transfers
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,

        /// JSON с профилями и токенами сессий
        #[arg(long)]
        seed: Option<String>,
    },

    /// Сгенерировать подписи-заглушки
    Signature {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Прогнать сценарий действий и выгрузить историю кошелька
    Replay {
        /// Файл сценария (по умолчанию stdin)
        #[arg(short = 'i', long = "input")]
        input: Option<String>,

        /// Выходной файл (по умолчанию stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<String>,

        #[arg(long, default_value = "0")]
        opening_balance: Decimal,

        #[arg(long, value_enum, default_value = "csv")]
        format: Fmt,
    },

    /// Статус подписи в сети (только чтение)
    Status {
        signature: String,

        #[arg(long, default_value = DEVNET_RPC_URL)]
        rpc_url: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Serve { addr, seed } => serve(addr, seed).await,
        Command::Signature { count } => {
            let mut out = io::stdout().lock();
            for _ in 0..count {
                writeln!(out, "{}", generate_signature())?;
            }
            Ok(())
        }
        Command::Replay { input, output, opening_balance, format } => replay(input, output, opening_balance, format),
        Command::Status { signature, rpc_url } => {
            anyhow::ensure!(is_signature(&signature), "not a base58 signature of length 88");
            let cluster = if rpc_url.contains("mainnet") { Cluster::MainnetBeta } else { Cluster::Devnet };
            let confirmed = StatusClient::new(rpc_url).is_confirmed(&signature).await;
            println!("{}\t{}", if confirmed { "confirmed" } else { "unconfirmed" }, explorer_url(&signature, cluster));
            Ok(())
        }
    }
}

async fn serve(addr: SocketAddr, seed: Option<String>) -> anyhow::Result<()> {
    let seed = match seed {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("open seed {path}"))?;
            Seed::read(BufReader::new(file))?
        }
        None => Seed::default(),
    };
    tracing::info!(profiles = seed.profiles.len(), sessions = seed.sessions.len(), "store seeded");

    let service = Arc::new(RewardService::new(MemoryStore::from_seed(seed), MockAttestor));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let service = service.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let service = service.clone();
                async move { Ok::<_, Infallible>(http::route(service.as_ref(), req).await) }
            });
            if let Err(e) = http1::Builder::new().serve_connection(io, svc).await {
                tracing::warn!(%peer, error = %e, "connection error");
            }
        });
    }
}

fn replay(input: Option<String>, output: Option<String>, opening_balance: Decimal, format: Fmt) -> anyhow::Result<()> {
    let reader: Box<dyn io::Read> = match input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let actions: Vec<Action> = read_script(BufReader::new(reader)).context("parse replay script")?;

    let mut session = Session::new(MockAttestor);
    session.sign_up(UserProfile {
        id: UserId::new("local"),
        full_name: "Local User".into(),
        email: "local@ecokash.invalid".into(),
        phone: None,
        address: None,
        wallet_balance: opening_balance,
    });

    for (i, action) in actions.iter().enumerate() {
        match session.apply(action) {
            Ok(Some(entry)) => tracing::info!(step = i, kind = %entry.kind, amount = %entry.display_amount(), "applied"),
            Ok(None) => {}
            // как на экране: ошибка проверки блокирует только это действие
            Err(e) => tracing::warn!(step = i, error = %e, "action rejected"),
        }
    }
    tracing::info!(balance = %session.balance(), entries = session.wallet().entries().len(), "replay finished");

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let entries = session.wallet().entries();
    match format {
        Fmt::Csv => Csv::write(&mut writer, entries),
        Fmt::Json => Json::write(&mut writer, entries),
    }?;
    writer.flush()?;
    Ok(())
}
