//! # PlaatBook Client
//!
//! Text-mode entry point: initializes tracing and configuration, assembles
//! the client, runs the startup account validation pass, and renders the
//! current route plus the first page of the timeline.

use anyhow::Result;
use tracing::info;

use plaatbook_client::application::services::AuthUser;
use plaatbook_client::config::Settings;
use plaatbook_client::presentation::routes::Resolution;
use plaatbook_client::shared::time::date_format_ago;
use plaatbook_client::startup::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    plaatbook_client::telemetry::init_tracing();

    info!("Starting PlaatBook client...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        api_url = %settings.api.base_url,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Assemble the client and validate the stored accounts
    let app = App::build(settings)?;
    app.bootstrap().await?;

    match app.auth().user().get() {
        AuthUser::Authenticated(user) => println!("Logged in as @{}", user.username),
        AuthUser::Anonymous => println!("Browsing as guest"),
        AuthUser::Unknown => {}
    }
    let accounts = app.auth().accounts().get();
    if accounts.len() > 1 {
        println!("{} accounts available:", accounts.len());
        for (index, account) in accounts.iter().enumerate() {
            let marker = if index == 0 { "*" } else { " " };
            println!("  {} @{}", marker, account.user.username);
        }
    }

    match app.resolve_current() {
        Resolution::Render(page, _) => info!(?page, "Rendering route"),
        Resolution::Redirect(to) => {
            info!(%to, "Redirecting");
            app.navigator().navigate(&to);
        }
        Resolution::Pending | Resolution::Blank => {}
    }

    // Render the first page of the timeline
    let posts = app.posts().index(1).await?;
    println!();
    for post in &posts {
        let author = post
            .user
            .as_ref()
            .map(|user| user.username.as_str())
            .unwrap_or("unknown");
        let edited = if post.is_edited() { " (edited)" } else { "" };
        println!("@{} · {}{}", author, date_format_ago(post.created_at), edited);
        println!("  {}", post.text);
        println!(
            "  {} replies · {} reposts · {} likes · {} dislikes",
            post.replies_count, post.reposts_count, post.likes_count, post.dislikes_count
        );
        println!();
    }
    info!(count = posts.len(), "Timeline rendered");

    Ok(())
}
