mod render;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use blogfront::config::{ConfigError, normalize_base_url};
use blogfront::net::types::{
    BlogPost, BlogPostCreate, CategoryCreate, CommentCreate, LoginData, PostQuery, RegisterData, Upload,
};
use blogfront::state::categories::CategoriesView;
use blogfront::state::dashboard::DashboardView;
use blogfront::state::feed::{self, FeedView};
use blogfront::state::load::LoadState;
use blogfront::state::post::PostView;
use blogfront::state::profile::ProfileForm;
use blogfront::util::guard::{self, AlwaysConfirm, Confirm, Gate, Outcome};
use blogfront::{ApiClient, ApiError, AuthContext, BlogApi, ClientConfig, FileSessionStore};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("cannot read {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("not signed in; run `blogfront login` first")]
    SignInRequired,
    #[error("{0}")]
    Load(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("the current content of `{0}` is not available for drafts; pass --content")]
    ContentRequired(String),
}

#[derive(Parser, Debug)]
#[command(name = "blogfront", about = "Command-line client for the blog platform")]
struct Cli {
    /// Backend API root, e.g. http://127.0.0.1:8000/api.
    #[arg(long, env = "BLOG_API_BASE_URL")]
    base_url: Option<String>,

    /// Where the session token is kept between runs.
    #[arg(long, env = "BLOG_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        bio: Option<String>,
    },
    Logout,
    Whoami,
    Profile(ProfileCommand),
    Posts(PostsCommand),
    Comments(CommentsCommand),
    Categories(CategoriesCommand),
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        picture: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct PostsCommand {
    #[command(subcommand)]
    command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostsSubcommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
        /// Category slug.
        #[arg(long)]
        category: Option<String>,
        /// Author username.
        #[arg(long)]
        author: Option<String>,
        /// e.g. `-created_at` or `title`.
        #[arg(long)]
        ordering: Option<String>,
    },
    Home,
    Show {
        slug: String,
    },
    Create(PostFields),
    Update {
        slug: String,
        #[command(flatten)]
        fields: PostEdits,
    },
    Delete {
        slug: String,
        #[arg(long, short)]
        yes: bool,
    },
    Like {
        slug: String,
    },
    Mine,
}

#[derive(Args, Debug)]
struct PostFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    content: String,
    /// Category id.
    #[arg(long)]
    category: i64,
    /// Save unpublished.
    #[arg(long, default_value_t = false)]
    draft: bool,
    #[arg(long)]
    image: Option<PathBuf>,
}

/// Fields left out keep the post's current value.
#[derive(Args, Debug)]
struct PostEdits {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    category: Option<i64>,
    #[arg(long, conflicts_with = "publish")]
    draft: bool,
    #[arg(long)]
    publish: bool,
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CommentsCommand {
    #[command(subcommand)]
    command: CommentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CommentsSubcommand {
    List {
        slug: String,
    },
    Add {
        slug: String,
        #[arg(long)]
        content: String,
        /// Reply to this comment id.
        #[arg(long)]
        parent: Option<i64>,
    },
    Delete {
        id: i64,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesSubcommand {
    List {
        /// Filter by name or description.
        #[arg(long)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        slug: String,
        #[arg(long, short)]
        yes: bool,
    },
}

struct CliContext {
    auth: AuthContext<ApiClient>,
    json: bool,
}

impl CliContext {
    fn api(&self) -> &dyn BlogApi {
        self.auth.backend()
    }

    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), CliError> {
        if self.json {
            print_json(value)
        } else {
            println!("{}", text());
            Ok(())
        }
    }
}

/// Confirmation read from the terminal; anything but `y`/`yes` declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn confirmer(yes: bool) -> &'static dyn Confirm {
    if yes { &AlwaysConfirm } else { &StdinConfirm }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            if let CliError::Api(api) = &error {
                for (field, messages) in api.field_errors().into_iter().flatten() {
                    for message in messages {
                        eprintln!("  {field}: {message}");
                    }
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = normalize_base_url(base_url)?;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }

    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let client = ApiClient::new(&config, store)?;
    let ctx = CliContext { auth: AuthContext::new(client), json: cli.json };
    tracing::debug!(base_url = %config.base_url, "client ready");

    // Every command needs a resolved identity, except a fresh login.
    if !matches!(cli.command, Command::Login { .. } | Command::Register { .. }) {
        ctx.auth.initialize().await;
    }

    match cli.command {
        Command::Login { email, password } => run_login(&ctx, email, password).await,
        Command::Register { username, email, first_name, last_name, password, bio } => {
            let data = RegisterData {
                username,
                email,
                first_name,
                last_name,
                password_confirm: password.clone(),
                password,
                bio,
            };
            let response = ctx.auth.register(&data).await?;
            println!("Registered and signed in as {}", response.user.display_name());
            Ok(())
        }
        Command::Logout => {
            ctx.auth.logout().await;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => run_whoami(&ctx),
        Command::Profile(profile) => run_profile(&ctx, profile).await,
        Command::Posts(posts) => run_posts(&ctx, posts).await,
        Command::Comments(comments) => run_comments(&ctx, comments).await,
        Command::Categories(categories) => run_categories(&ctx, categories).await,
    }
}

async fn run_login(ctx: &CliContext, email: String, password: String) -> Result<(), CliError> {
    let response = ctx.auth.login(&LoginData { email, password }).await?;
    println!("Signed in as {}", response.user.display_name());
    Ok(())
}

fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let state = ctx.auth.state();
    match guard::require_auth(&state) {
        Gate::Allowed(user) => ctx.print(user, || render::user(user)),
        Gate::Pending | Gate::SignInRequired => Err(CliError::SignInRequired),
    }
}

async fn run_profile(ctx: &CliContext, profile: ProfileCommand) -> Result<(), CliError> {
    let ProfileSubcommand::Update { first_name, last_name, bio, picture } = profile.command;
    let Some(user) = ctx.auth.user() else {
        return Err(CliError::SignInRequired);
    };

    let mut form = ProfileForm::from_user(&user);
    if let Some(first_name) = first_name {
        form.first_name = first_name;
    }
    if let Some(last_name) = last_name {
        form.last_name = last_name;
    }
    if let Some(bio) = bio {
        form.bio = bio;
    }
    if let Some(path) = picture {
        form.attach_picture(read_upload(path)?);
    }

    let updated = finish(form.submit(&ctx.auth).await?)?;
    if let Some(user) = updated {
        ctx.print(&user, || format!("Profile updated\n{}", render::user(&user)))?;
    }
    Ok(())
}

// =============================================================================
// POSTS
// =============================================================================

async fn run_posts(ctx: &CliContext, posts: PostsCommand) -> Result<(), CliError> {
    let state = ctx.auth.state();
    match posts.command {
        PostsSubcommand::List { page, search, category, author, ordering } => {
            let mut feed = FeedView::new();
            feed.set_search(search.unwrap_or_default());
            feed.set_category(category.unwrap_or_default());
            feed.set_author(author.unwrap_or_default());
            feed.set_ordering(ordering.unwrap_or_default());
            feed.set_page(page);
            feed.load(ctx.api()).await;
            let posts = ready_items(&feed.posts)?;
            ctx.print(&posts, || render::feed(&feed))
        }
        PostsSubcommand::Home => {
            let home = feed::load_home(ctx.api()).await;
            let sections = ready(&home, "No posts yet.")?;
            if let Some(sections) = sections {
                ctx.print(sections, || render::home(sections))?;
            }
            Ok(())
        }
        PostsSubcommand::Show { slug } => {
            let mut view = PostView::new(slug);
            view.load(ctx.api()).await;
            view.load_comments(ctx.api()).await;
            if let Some(post) = ready(&view.post, "Post not found.")? {
                ctx.print(&(post, &view.comments), || render::post_detail(&view))?;
            }
            Ok(())
        }
        PostsSubcommand::Create(fields) => {
            if let Some(outcome) = guard::check_action::<()>(&state) {
                finish(outcome)?;
                return Ok(());
            }
            let draft = BlogPostCreate {
                title: fields.title,
                description: fields.description,
                content: fields.content,
                category: fields.category,
                is_published: !fields.draft,
                image: fields.image.map(read_upload).transpose()?,
            };
            let created = ctx.api().create_post(&draft).await?;
            ctx.print(&created, || format!("Created {}", render::post_line(&created)))
        }
        PostsSubcommand::Update { slug, fields } => {
            if let Some(outcome) = guard::check_action::<()>(&state) {
                finish(outcome)?;
                return Ok(());
            }
            let draft = update_body(ctx.api(), &slug, fields).await?;
            let updated = ctx.api().update_post(&slug, &draft).await?;
            ctx.print(&updated, || format!("Updated {}", render::post_line(&updated)))
        }
        PostsSubcommand::Delete { slug, yes } => {
            let mut view = PostView::new(slug);
            if finish(view.delete_post(&state, ctx.api(), confirmer(yes)).await?)?.is_some() {
                println!("Deleted {}", view.slug());
            }
            Ok(())
        }
        PostsSubcommand::Like { slug } => {
            let mut view = PostView::new(slug);
            if finish(view.like(&state, ctx.api()).await?)?.is_some() {
                let verb = if view.liked { "Liked" } else { "Unliked" };
                println!("{verb} {} ({} likes)", view.slug(), view.likes_count);
            }
            Ok(())
        }
        PostsSubcommand::Mine => {
            let mut dashboard = DashboardView::new();
            match dashboard.load(&state, ctx.api()).await {
                Gate::Allowed(_) => {
                    let posts = ready_items(&dashboard.posts)?;
                    ctx.print(&posts, || render::dashboard(&dashboard))
                }
                Gate::Pending | Gate::SignInRequired => Err(CliError::SignInRequired),
            }
        }
    }
}

// =============================================================================
// COMMENTS
// =============================================================================

async fn run_comments(ctx: &CliContext, comments: CommentsCommand) -> Result<(), CliError> {
    let state = ctx.auth.state();
    match comments.command {
        CommentsSubcommand::List { slug } => {
            let mut view = PostView::new(slug);
            view.load_comments(ctx.api()).await;
            ctx.print(&view.comments, || render::comments(&view.comments))
        }
        CommentsSubcommand::Add { slug, content, parent } => {
            let mut view = PostView::new(slug);
            let draft = CommentCreate { content, parent };
            if let Some(comment) = finish(view.add_comment(&state, ctx.api(), &draft).await?)? {
                ctx.print(&comment, || format!("Comment #{} added", comment.id))?;
            }
            Ok(())
        }
        CommentsSubcommand::Delete { id, yes } => {
            if let Some(outcome) = guard::check_destructive::<()>(&state, confirmer(yes), guard::DELETE_COMMENT_PROMPT) {
                finish(outcome)?;
                return Ok(());
            }
            ctx.api().delete_comment(id).await?;
            println!("Deleted comment #{id}");
            Ok(())
        }
    }
}

// =============================================================================
// CATEGORIES
// =============================================================================

async fn run_categories(ctx: &CliContext, categories: CategoriesCommand) -> Result<(), CliError> {
    let state = ctx.auth.state();
    let mut view = CategoriesView::new();
    match categories.command {
        CategoriesSubcommand::List { search } => {
            view.search = search.unwrap_or_default();
            view.load(ctx.api()).await;
            if let LoadState::Failed(message) = &view.categories {
                return Err(CliError::Load(message.clone()));
            }
            let shown = view.filtered();
            ctx.print(&shown, || render::categories(&shown))
        }
        CategoriesSubcommand::Create { name, description } => {
            let draft = CategoryCreate { name, description };
            if let Some(created) = finish(view.create(&state, ctx.api(), &draft).await?)? {
                ctx.print(&created, || format!("Created category {} ({})", created.name, created.slug))?;
            }
            Ok(())
        }
        CategoriesSubcommand::Delete { slug, yes } => {
            if finish(view.delete(&state, ctx.api(), confirmer(yes), &slug).await?)?.is_some() {
                println!("Deleted category {slug}");
            }
            Ok(())
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// `Done` yields its value; a declined confirmation is not an error.
fn finish<T>(outcome: Outcome<T>) -> Result<Option<T>, CliError> {
    match outcome {
        Outcome::Done(value) => Ok(Some(value)),
        Outcome::SignInRequired => Err(CliError::SignInRequired),
        Outcome::Cancelled => {
            eprintln!("cancelled");
            Ok(None)
        }
    }
}

/// Ready value, or `None` after printing `empty`.
fn ready<'a, T>(state: &'a LoadState<T>, empty: &str) -> Result<Option<&'a T>, CliError> {
    match state {
        LoadState::Ready(value) => Ok(Some(value)),
        LoadState::Failed(message) => Err(CliError::Load(message.clone())),
        LoadState::Empty | LoadState::Loading => {
            println!("{empty}");
            Ok(None)
        }
    }
}

fn ready_items<T>(state: &LoadState<Vec<T>>) -> Result<&[T], CliError> {
    match state {
        LoadState::Failed(message) => Err(CliError::Load(message.clone())),
        _ => Ok(state.items()),
    }
}

/// The detail endpoint hides drafts, so fall back to the author's own list.
async fn current_post(api: &dyn BlogApi, slug: &str) -> Result<BlogPost, CliError> {
    match api.get_post(slug).await {
        Err(ApiError::NotFound { message }) => {
            let own = api.my_posts(&PostQuery::default()).await?;
            own.results
                .into_iter()
                .find(|post| post.slug == slug)
                .ok_or(CliError::Api(ApiError::NotFound { message }))
        }
        result => Ok(result?),
    }
}

/// Full replacement body for `posts update`, seeded from the stored post.
/// Listings omit post bodies, so a draft found only through `my-posts`
/// needs `--content`.
async fn update_body(api: &dyn BlogApi, slug: &str, fields: PostEdits) -> Result<BlogPostCreate, CliError> {
    let current = current_post(api, slug).await?;
    let content = fields
        .content
        .or(current.content)
        .ok_or_else(|| CliError::ContentRequired(slug.to_owned()))?;
    Ok(BlogPostCreate {
        title: fields.title.unwrap_or(current.title),
        description: fields.description.unwrap_or(current.description),
        content,
        category: fields.category.unwrap_or(current.category.id),
        is_published: if fields.draft { false } else { fields.publish || current.is_published },
        image: fields.image.map(read_upload).transpose()?,
    })
}

fn read_upload(path: PathBuf) -> Result<Upload, CliError> {
    Upload::from_path(&path).map_err(|source| CliError::ReadFile { path, source })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
