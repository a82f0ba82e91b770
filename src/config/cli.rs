use clap::Subcommand;
use std::path::PathBuf;

use crate::domain::model::SkillCategory;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(about = "Render the public portfolio")]
    Show,

    #[command(about = "Log in and store the session token")]
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    #[command(about = "Forget the stored session token")]
    Logout,

    #[command(about = "Show whether a session token is stored")]
    Status,

    /// Edit the profile (hero, about, contact)
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Manage skills
    #[command(subcommand)]
    Skills(SkillCommand),

    /// Manage experience entries
    #[command(subcommand)]
    Experience(ExperienceCommand),

    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommand),

    /// Manage certifications
    #[command(subcommand)]
    Certifications(CertificationCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::Profile(_) => "profile",
            Self::Skills(_) => "skills",
            Self::Experience(_) => "experience",
            Self::Projects(_) => "projects",
            Self::Certifications(_) => "certifications",
        }
    }

    /// Commands behind the admin session gate.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Show | Self::Login { .. } | Self::Logout | Self::Status)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    Show,
    #[command(about = "Set a field, e.g. `hero.title \"Hello\"`, then save")]
    Set { field: String, value: String },
    #[command(about = "Upload a file into hero.resumeLink or about.image, then save")]
    Upload { field: String, file: PathBuf },
    #[command(about = "Clear a file field, then save")]
    Remove { field: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SkillCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "hr", help = "hr, finance or soft")]
        category: SkillCategory,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<SkillCategory>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExperienceCommand {
    List,
    Add {
        #[arg(long)]
        role: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        duration: String,
        #[arg(long)]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProjectCommand {
    List,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, help = "Comma separated, e.g. \"Excel, SAP, PowerBI\"")]
        technologies: String,
        #[arg(long)]
        link: Option<String>,
        #[arg(long, help = "Cover image to upload")]
        image: Option<PathBuf>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        technologies: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CertificationCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        issuer: String,
        #[arg(long, help = "Date or year")]
        date: String,
        #[arg(long)]
        link: Option<String>,
        #[arg(long, help = "Credential file to upload as the link")]
        file: Option<PathBuf>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

impl SkillCommand {
    /// Adding works without the current list; every other subcommand reads
    /// it first.
    pub fn needs_current_items(&self) -> bool {
        !matches!(self, Self::Add { .. })
    }
}

impl ExperienceCommand {
    pub fn needs_current_items(&self) -> bool {
        !matches!(self, Self::Add { .. })
    }
}

impl ProjectCommand {
    pub fn needs_current_items(&self) -> bool {
        !matches!(self, Self::Add { .. })
    }
}

impl CertificationCommand {
    pub fn needs_current_items(&self) -> bool {
        !matches!(self, Self::Add { .. })
    }
}
