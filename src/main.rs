use clap::{Parser, Subcommand};
use gardens::app::App;
use gardens::config::{ClientConfig, ConfigError, parse_base_url};
use gardens::error::GardenError;
use gardens::garden::{CommentId, FlowerColor, GardenId};
use gardens::remote::{NewUser, RemoteError};
use gardens::render::{Canvas, DisplayList};
use gardens::state::GardenEvent;
use gardens::sync::SyncEvent;
use gardens::viewport::Point;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Garden(#[from] GardenError),
    #[error("login rejected for {0}")]
    LoginRejected(String),
    #[error("{0} is already registered")]
    AlreadyRegistered(String),
    #[error("--email and --password are required")]
    MissingCredentials,
    #[error("garden {0} has no comment {1}")]
    UnknownComment(GardenId, CommentId),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "gardens", about = "Community gardens client")]
struct Cli {
    #[arg(long, env = "GARDENS_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "GARDENS_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "GARDENS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every garden.
    List,
    /// Print a garden with its flowers and comments.
    Show { garden_id: GardenId },
    /// Add a flower and save.
    Plant { garden_id: GardenId, color: FlowerColor, x: f64, y: f64 },
    /// Erase every flower under a point and save.
    Erase {
        garden_id: GardenId,
        x: f64,
        y: f64,
        #[arg(long)]
        size: Option<f64>,
    },
    /// Comment on a garden.
    Comment { garden_id: GardenId, text: String },
    /// Delete one of your comments.
    Uncomment { garden_id: GardenId, comment_id: CommentId },
    /// Create a garden and print its id.
    Create { name: String },
    /// Create an account from --email and --password, then log in.
    Register { first_name: String, last_name: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config.base_url = parse_base_url(base_url)?;
    }

    let mut app = App::connect(&config)?;
    let mut events = app.subscribe();
    let mut sync_events = app.subscribe_sync();
    let mut canvas = Canvas::new(DisplayList::new());
    app.start().await?;
    let registering = matches!(cli.command, Command::Register { .. });
    if let (false, Some(email), Some(password)) = (registering, cli.email.as_deref(), cli.password.as_deref()) {
        if !app.login(email, password).await? {
            return Err(CliError::LoginRejected(email.to_owned()));
        }
    }

    match cli.command {
        Command::List => {
            app.refresh_gardens().await?;
            for garden in app.gardens() {
                println!("{:>6}  {}  ({})", garden.id, garden.name, garden.author);
            }
        }
        Command::Show { garden_id } => {
            app.select(garden_id).await?;
            if let Some(garden) = app.garden().current() {
                println!("{}", serde_json::to_string_pretty(garden)?);
            }
        }
        Command::Plant { garden_id, color, x, y } => {
            app.select(garden_id).await?;
            app.drop_flower(color, Point::new(x, y))?;
            redraw(&mut events, &mut canvas, &app);
            save(&mut app, &mut sync_events).await?;
        }
        Command::Erase { garden_id, x, y, size } => {
            app.select(garden_id).await?;
            if let Some(size) = size {
                app.set_flower_size(size);
            }
            app.toggle_erasing();
            let removed = app.click(Point::new(x, y))?;
            println!("erased {removed} flower(s)");
            redraw(&mut events, &mut canvas, &app);
            save(&mut app, &mut sync_events).await?;
        }
        Command::Comment { garden_id, text } => {
            app.select(garden_id).await?;
            app.add_comment(&text).await?;
            println!("{} comment(s)", app.garden().comments().len());
        }
        Command::Uncomment { garden_id, comment_id } => {
            app.select(garden_id).await?;
            if !app.garden().comments().iter().any(|c| c.id == comment_id) {
                return Err(CliError::UnknownComment(garden_id, comment_id));
            }
            app.delete_comment(comment_id).await?;
            println!("{} comment(s)", app.garden().comments().len());
        }
        Command::Create { name } => {
            let garden_id = app.create_garden(&name).await?;
            println!("{garden_id}");
        }
        Command::Register { first_name, last_name } => {
            let (Some(email), Some(password)) = (cli.email.as_deref(), cli.password.as_deref()) else {
                return Err(CliError::MissingCredentials);
            };
            let user = NewUser { first_name: &first_name, last_name: &last_name, email, password };
            if !app.register(&user).await? {
                return Err(CliError::AlreadyRegistered(email.to_owned()));
            }
            println!("registered and logged in as {email}");
        }
    }

    redraw(&mut events, &mut canvas, &app);
    println!(
        "canvas: {} flower(s) after {} render pass(es)",
        canvas.surface().flower_count(),
        canvas.passes()
    );
    Ok(())
}

async fn save(app: &mut App, sync_events: &mut mpsc::UnboundedReceiver<SyncEvent>) -> Result<(), CliError> {
    let report = app.save().await?;
    while let Ok(event) = sync_events.try_recv() {
        match event {
            SyncEvent::Started { save_id, required } => tracing::debug!(save_id, required, "save started"),
            SyncEvent::Progress { save_id, progress } => {
                tracing::debug!(save_id, completed = progress.completed, required = progress.required, "save progress");
            }
            SyncEvent::Complete { save_id, failed, .. } => tracing::info!(save_id, failed, "save complete"),
        }
    }
    for failure in &report.failures {
        eprintln!("sync failed: {:?}: {}", failure.op, failure.error);
    }
    println!(
        "saved {}/{} change(s) to garden {}",
        report.required() - report.failures.len(),
        report.required(),
        app.garden().garden_id()
    );
    Ok(())
}

/// Render once per pending state change.
fn redraw(events: &mut mpsc::UnboundedReceiver<GardenEvent>, canvas: &mut Canvas<DisplayList>, app: &App) {
    while let Ok(event) = events.try_recv() {
        match event {
            GardenEvent::Cleared => canvas.clear(),
            GardenEvent::SaveStatus(status) => tracing::debug!(?status, "save status"),
            _ => canvas.redraw(app.garden().flowers(), app.ui().flower_size()),
        }
    }
}
