use {
    anyhow::{Context, Result, anyhow, bail},
    com::{Connectivity, ConnectivitySignal, InferenceClient, spawn_probe},
    queue::{FileStore, OfflineQueue},
    screening::{
        Orchestrator, ScreeningConfig, render_capture, render_drain, spawn_reconnect_handler,
    },
    std::{path::PathBuf, sync::Arc},
    video::{CaptureSession, UploadSurface},
};

const USAGE: &str = "Usage: screen [--config <file>] [--endpoint <url>] [--timeout-ms <ms>] \
[--upload multipart|raw] [--queue-dir <dir>] [--enhance] [--log-dir <dir>] <command>\n\n\
Commands:\n  \
submit <image>...  classify images, queueing them if the classifier is unreachable\n  \
list               show queued captures\n  \
drain              resend queued captures once\n  \
watch              resend queued captures whenever the classifier comes back";

#[derive(Debug, PartialEq)]
enum Command {
    Submit(Vec<PathBuf>),
    List,
    Drain,
    Watch,
}

#[derive(Debug, PartialEq)]
struct Cli {
    config: Option<PathBuf>,
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
    upload: Option<String>,
    queue_dir: Option<PathBuf>,
    enhance: bool,
    log_dir: Option<PathBuf>,
    command: Command,
}

impl Cli {
    fn from_args(args: &[String]) -> Result<Self> {
        let mut config = None;
        let mut endpoint = None;
        let mut timeout_ms = None;
        let mut upload = None;
        let mut queue_dir = None;
        let mut enhance = false;
        let mut log_dir = None;
        let mut positional = Vec::new();

        let mut idx = 1;
        while idx < args.len() {
            let arg = args[idx].as_str();
            let mut value = || {
                idx += 1;
                args.get(idx)
                    .cloned()
                    .ok_or_else(|| anyhow!("{arg} requires a value"))
            };
            match arg {
                "--config" => config = Some(PathBuf::from(value()?)),
                "--endpoint" => endpoint = Some(value()?),
                "--timeout-ms" => {
                    timeout_ms = Some(
                        value()?
                            .parse::<u64>()
                            .with_context(|| "--timeout-ms must be an integer".to_string())?,
                    )
                }
                "--upload" => upload = Some(value()?),
                "--queue-dir" => queue_dir = Some(PathBuf::from(value()?)),
                "--log-dir" => log_dir = Some(PathBuf::from(value()?)),
                "--enhance" => enhance = true,
                "-h" | "--help" => bail!(USAGE),
                flag if flag.starts_with("--") => bail!("unknown flag {flag}\n\n{USAGE}"),
                _ => positional.push(args[idx].clone()),
            }
            idx += 1;
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            Some("submit") => {
                let images: Vec<PathBuf> = positional.by_ref().map(PathBuf::from).collect();
                if images.is_empty() {
                    bail!("submit needs at least one image\n\n{USAGE}");
                }
                Command::Submit(images)
            }
            Some("list") => Command::List,
            Some("drain") => Command::Drain,
            Some("watch") => Command::Watch,
            Some(other) => bail!("unknown command {other}\n\n{USAGE}"),
            None => bail!(USAGE),
        };
        if let Some(extra) = positional.next() {
            bail!("unexpected argument {extra}\n\n{USAGE}");
        }

        Ok(Self {
            config,
            endpoint,
            timeout_ms,
            upload,
            queue_dir,
            enhance,
            log_dir,
            command,
        })
    }

    fn apply(&self, config: &mut ScreeningConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(upload) = &self.upload {
            config.upload = upload.clone();
        }
        if let Some(dir) = &self.queue_dir {
            config.queue_dir = Some(dir.clone());
        }
        if self.enhance {
            config.enhance = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = Cli::from_args(&args)?;

    match &cli.log_dir {
        Some(dir) => base::init_file_logger(dir)
            .with_context(|| format!("cannot log to {}", dir.display()))?,
        None => base::init_stdout_logger(),
    }

    let mut config = ScreeningConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let client = Arc::new(InferenceClient::new(config.inference_config()?)?);
    let queue_dir = config.queue_dir();
    let store = FileStore::open(&queue_dir)
        .with_context(|| format!("cannot open queue at {}", queue_dir.display()))?;
    let queue = Arc::new(OfflineQueue::new(store).with_capacity(config.queue_capacity));
    log::info!(
        "classifier {} ({} ms budget), queue {}",
        client.endpoint(),
        config.timeout_ms,
        queue_dir.display()
    );

    match cli.command {
        Command::Submit(images) => {
            let session = CaptureSession::new(UploadSurface::new());
            let mut orchestrator = Orchestrator::new(session, client, queue)
                .with_normalize(config.normalize_config());
            for image in images {
                println!("{}", image.display());
                let report = orchestrator.capture_upload(&image).await;
                print!("{}", render_capture(&report));
                println!();
            }
        }
        Command::List => {
            let items = queue.list().await?;
            if items.is_empty() {
                println!("No captures waiting.");
            }
            for item in items {
                println!(
                    "{}  {}  {} bytes",
                    item.key,
                    base::format_millis(item.created_at),
                    item.payload.len()
                );
            }
        }
        Command::Drain => {
            let report = queue.drain_on_reconnect(&client).await?;
            print!("{}", render_drain(&report));
        }
        Command::Watch => {
            let signal = ConnectivitySignal::new(Connectivity::Offline);
            let probe = spawn_probe(
                signal.clone(),
                client.endpoint().clone(),
                config.probe_interval(),
            );
            let (handler, mut reports) =
                spawn_reconnect_handler(&signal, queue.clone(), client.clone());
            println!("Watching {} (ctrl-c to stop)", client.endpoint());
            loop {
                tokio::select! {
                    report = reports.recv() => match report {
                        Some(Ok(report)) => print!("{}", render_drain(&report)),
                        Some(Err(err)) => eprintln!("Offline queue could not be drained: {err}"),
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            probe.abort();
            handler.abort();
        }
    }

    Ok(())
}
