use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use crate::config::cli::{
    CertificationCommand, Command, ExperienceCommand, ProfileCommand, ProjectCommand,
    SkillCommand,
};
use crate::config::{AppConfig, CliConfig};
use crate::core::client::ApiClient;
use crate::core::manager::EntityManager;
use crate::core::notify::{ConsoleNotifier, TracingNotifier};
use crate::core::portfolio::{fetch_portfolio, render_text};
use crate::core::profile::{ProfileEditor, ProfileField};
use crate::core::session::{self, FileTokenStore, Session};
use crate::core::upload::{UploadFile, Uploader};
use crate::domain::model::{Certification, EntityId, Experience, Project, Skill};
use crate::domain::ports::{Confirm, Entity, Notifier};
use crate::utils::error::{FolioError, Result};

/// `[y/N]` prompt on stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!("{} (assumed yes)", prompt);
        true
    }
}

/// Everything a command needs, built once from the resolved config.
pub struct AppContext {
    pub config: AppConfig,
    pub client: ApiClient,
    pub notifier: Arc<dyn Notifier>,
    json: bool,
    yes: bool,
}

impl AppContext {
    pub fn build(cli: &CliConfig) -> Result<Self> {
        let config = cli.resolve()?;
        let store = Arc::new(FileTokenStore::new(config.token_file()?));
        let session = Session::restore(store)?;
        let client = ApiClient::with_timeout(&config.api.base_url, session, config.timeout())?;
        let notifier: Arc<dyn Notifier> = if cli.json {
            Arc::new(TracingNotifier)
        } else {
            Arc::new(ConsoleNotifier)
        };

        Ok(Self {
            config,
            client,
            notifier,
            json: cli.json,
            yes: cli.yes,
        })
    }

    fn uploader(&self) -> Uploader {
        Uploader::new(self.client.clone()).with_chunk_size(self.config.upload.chunk_size)
    }

    fn manager<E: Entity>(&self) -> EntityManager<E> {
        EntityManager::new(self.client.clone(), self.notifier.clone()).with_uploader(self.uploader())
    }

    fn confirmer(&self) -> Box<dyn Confirm> {
        if self.yes {
            Box::new(AssumeYes)
        } else {
            Box::new(StdinConfirm)
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn print_list<T: Serialize>(&self, items: &[T], empty: &str, line: impl Fn(&T) -> String) -> Result<()> {
        if self.json {
            return self.print_json(items);
        }
        if items.is_empty() {
            println!("{}", empty);
        }
        for item in items {
            println!("{}", line(item));
        }
        Ok(())
    }
}

pub async fn run(cli: CliConfig) -> Result<()> {
    let ctx = AppContext::build(&cli)?;
    tracing::debug!("Running `{}` against {}", cli.command.name(), ctx.client.base_url());

    if cli.command.requires_session() {
        ctx.client.session().require()?;
    }

    match cli.command {
        Command::Show => show(&ctx).await,
        Command::Login { email, password } => login(&ctx, &email, &password).await,
        Command::Logout => {
            session::logout(ctx.client.session())?;
            println!("✅ Logged out");
            Ok(())
        }
        Command::Status => status(&ctx),
        Command::Profile(cmd) => profile(&ctx, cmd).await,
        Command::Skills(cmd) => skills(&ctx, cmd).await,
        Command::Experience(cmd) => experience(&ctx, cmd).await,
        Command::Projects(cmd) => projects(&ctx, cmd).await,
        Command::Certifications(cmd) => certifications(&ctx, cmd).await,
    }
}

async fn show(ctx: &AppContext) -> Result<()> {
    let portfolio = fetch_portfolio(&ctx.client).await;
    if ctx.json {
        ctx.print_json(&portfolio)
    } else {
        print!("{}", render_text(&portfolio));
        Ok(())
    }
}

async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    match session::login(&ctx.client, email, password).await {
        Ok(()) => {
            println!("✅ Logged in as {}", email);
            Ok(())
        }
        Err(FolioError::Server {
            status,
            message: None,
        }) => Err(FolioError::Server {
            status,
            message: Some("Login failed".to_string()),
        }),
        Err(e) => Err(e),
    }
}

fn status(ctx: &AppContext) -> Result<()> {
    let authenticated = ctx.client.session().is_authenticated();
    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "api_url": ctx.client.base_url(),
            "authenticated": authenticated,
        }));
    }
    println!("API: {}", ctx.client.base_url());
    if authenticated {
        println!("Session: logged in");
    } else {
        println!("Session: not logged in");
    }
    Ok(())
}

async fn profile(ctx: &AppContext, cmd: ProfileCommand) -> Result<()> {
    let mut editor = ProfileEditor::new(ctx.client.clone(), ctx.notifier.clone())
        .with_uploader(ctx.uploader());
    editor.load().await?;

    match cmd {
        ProfileCommand::Show => {
            if ctx.json {
                return ctx.print_json(editor.profile());
            }
            for field in ProfileField::ALL {
                println!("{:<30} {}", field.path(), field.value(editor.profile()));
            }
            Ok(())
        }
        ProfileCommand::Set { field, value } => {
            let field: ProfileField = field.parse()?;
            editor.set_field(field, value);
            editor.save().await
        }
        ProfileCommand::Upload { field, file } => {
            let field: ProfileField = field.parse()?;
            let file = UploadFile::from_path(&file).await?;
            let url = editor.upload_into(field, file, None).await?;
            println!("{} = {}", field, url);
            editor.save().await
        }
        ProfileCommand::Remove { field } => {
            let field: ProfileField = field.parse()?;
            editor.remove_file(field, ctx.confirmer().as_ref())?;
            editor.save().await
        }
    }
}

async fn skills(ctx: &AppContext, cmd: SkillCommand) -> Result<()> {
    let mut manager = ctx.manager::<Skill>();
    if cmd.needs_current_items() {
        manager.load().await?;
    }

    match cmd {
        SkillCommand::List => {
            if ctx.json {
                return ctx.print_json(manager.items());
            }
            for (category, skills) in manager.grouped() {
                println!("{}", category.label());
                if skills.is_empty() {
                    println!("  No skills added yet.");
                }
                for skill in skills {
                    println!("  {}  {}", skill.id, skill.name);
                }
            }
            Ok(())
        }
        SkillCommand::Add { name, category } => {
            let draft = manager.begin_create();
            draft.name = name;
            draft.category = category;
            manager.submit().await
        }
        SkillCommand::Update { id, name, category } => {
            let draft = manager.begin_edit(&EntityId::new(id))?;
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            manager.submit().await
        }
        SkillCommand::Delete { id } => {
            manager
                .delete(&EntityId::new(id), ctx.confirmer().as_ref())
                .await
        }
    }
}

async fn experience(ctx: &AppContext, cmd: ExperienceCommand) -> Result<()> {
    let mut manager = ctx.manager::<Experience>();
    if cmd.needs_current_items() {
        manager.load().await?;
    }

    match cmd {
        ExperienceCommand::List => ctx.print_list(manager.items(), "No experience listed.", |e| {
            format!("{}  {} @ {} ({})", e.id, e.role, e.company, e.duration)
        }),
        ExperienceCommand::Add {
            role,
            company,
            duration,
            description,
        } => {
            let draft = manager.begin_create();
            draft.role = role;
            draft.company = company;
            draft.duration = duration;
            draft.description = description;
            manager.submit().await
        }
        ExperienceCommand::Update {
            id,
            role,
            company,
            duration,
            description,
        } => {
            let draft = manager.begin_edit(&EntityId::new(id))?;
            patch(&mut draft.role, role);
            patch(&mut draft.company, company);
            patch(&mut draft.duration, duration);
            patch(&mut draft.description, description);
            manager.submit().await
        }
        ExperienceCommand::Delete { id } => {
            manager
                .delete(&EntityId::new(id), ctx.confirmer().as_ref())
                .await
        }
    }
}

async fn projects(ctx: &AppContext, cmd: ProjectCommand) -> Result<()> {
    let mut manager = ctx.manager::<Project>();
    if cmd.needs_current_items() {
        manager.load().await?;
    }

    match cmd {
        ProjectCommand::List => ctx.print_list(manager.items(), "No projects listed.", |p| {
            format!("{}  {} [{}]", p.id, p.title, p.technologies.join(", "))
        }),
        ProjectCommand::Add {
            title,
            description,
            technologies,
            link,
            image,
        } => {
            let draft = manager.begin_create();
            draft.title = title;
            draft.description = description;
            draft.technologies = technologies;
            draft.link = link.unwrap_or_default();
            upload_if_given(&mut manager, image.as_deref()).await?;
            manager.submit().await
        }
        ProjectCommand::Update {
            id,
            title,
            description,
            technologies,
            link,
            image,
        } => {
            let draft = manager.begin_edit(&EntityId::new(id))?;
            patch(&mut draft.title, title);
            patch(&mut draft.description, description);
            patch(&mut draft.technologies, technologies);
            patch(&mut draft.link, link);
            upload_if_given(&mut manager, image.as_deref()).await?;
            manager.submit().await
        }
        ProjectCommand::Delete { id } => {
            manager
                .delete(&EntityId::new(id), ctx.confirmer().as_ref())
                .await
        }
    }
}

async fn certifications(ctx: &AppContext, cmd: CertificationCommand) -> Result<()> {
    let mut manager = ctx.manager::<Certification>();
    if cmd.needs_current_items() {
        manager.load().await?;
    }

    match cmd {
        CertificationCommand::List => {
            ctx.print_list(manager.items(), "No certifications listed.", |c| {
                format!("{}  {} | {} | {}", c.id, c.name, c.issuer, c.date)
            })
        }
        CertificationCommand::Add {
            name,
            issuer,
            date,
            link,
            file,
        } => {
            let draft = manager.begin_create();
            draft.name = name;
            draft.issuer = issuer;
            draft.date = date;
            draft.link = link.unwrap_or_default();
            upload_if_given(&mut manager, file.as_deref()).await?;
            manager.submit().await
        }
        CertificationCommand::Update {
            id,
            name,
            issuer,
            date,
            link,
            file,
        } => {
            let draft = manager.begin_edit(&EntityId::new(id))?;
            patch(&mut draft.name, name);
            patch(&mut draft.issuer, issuer);
            patch(&mut draft.date, date);
            patch(&mut draft.link, link);
            upload_if_given(&mut manager, file.as_deref()).await?;
            manager.submit().await
        }
        CertificationCommand::Delete { id } => {
            manager
                .delete(&EntityId::new(id), ctx.confirmer().as_ref())
                .await
        }
    }
}

fn patch(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

async fn upload_if_given<E>(manager: &mut EntityManager<E>, path: Option<&Path>) -> Result<()>
where
    E: Entity,
    E::Form: crate::domain::ports::UploadTarget,
{
    if let Some(path) = path {
        let file = UploadFile::from_path(path).await?;
        manager.upload_into_draft(file, None).await?;
    }
    Ok(())
}
