use std::fmt;

use crate::core::client::ApiClient;
use crate::domain::model::{Portfolio, SkillCategory};

/// One-shot read of the aggregate document behind the public site. The
/// public page never fails to render: any error falls back to an empty
/// document.
pub async fn fetch_portfolio(client: &ApiClient) -> Portfolio {
    match client.get::<Portfolio>("portfolio").await {
        Ok(portfolio) => portfolio,
        Err(e) => {
            tracing::error!("Backend fetch error: {}", e);
            Portfolio::default()
        }
    }
}

pub fn render_text(portfolio: &Portfolio) -> String {
    PortfolioText(portfolio).to_string()
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Plain-text rendering of every section, in page order. Collection
/// sections with nothing in them are left out.
pub struct PortfolioText<'a>(pub &'a Portfolio);

impl PortfolioText<'_> {
    fn hero(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hero = &self.0.hero;
        writeln!(f, "# {}", or(&hero.title, "Portfolio"))?;
        if !hero.subtitle.is_empty() {
            writeln!(f, "{}", hero.subtitle)?;
        }
        if !hero.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", hero.description)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{}: {}",
            or(&hero.cta, "View Resume"),
            or(&hero.resume_link, "#resume")
        )
    }

    fn about(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let about = &self.0.about;
        if about.title.is_empty() && about.description.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "## {}", or(&about.title, "About Me"))?;
        if !about.description.is_empty() {
            writeln!(f, "{}", about.description)?;
        }
        if !about.image.is_empty() {
            writeln!(f, "Photo: {}", about.image)?;
        }
        Ok(())
    }

    fn experience(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.experience.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "## Experience")?;
        for item in &self.0.experience {
            writeln!(f, "- {} @ {} ({})", item.role, item.company, item.duration)?;
            if !item.description.is_empty() {
                writeln!(f, "  {}", item.description)?;
            }
        }
        Ok(())
    }

    fn skills(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skills = &self.0.skills;
        if skills.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "## Skills")?;
        for category in SkillCategory::ALL {
            let names = skills.get(category);
            if names.is_empty() {
                continue;
            }
            writeln!(f, "### {}", category.public_label())?;
            writeln!(f, "{}", names.join(", "))?;
        }
        Ok(())
    }

    fn projects(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.projects.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "## Projects")?;
        for project in &self.0.projects {
            write!(f, "- {}", project.title)?;
            if !project.technologies.is_empty() {
                write!(f, " [{}]", project.technologies.join(", "))?;
            }
            writeln!(f)?;
            if !project.description.is_empty() {
                writeln!(f, "  {}", project.description)?;
            }
            if let Some(link) = &project.link {
                writeln!(f, "  {}", link)?;
            }
        }
        Ok(())
    }

    fn certifications(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.certifications.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "## Certifications & Achievements")?;
        for cert in &self.0.certifications {
            writeln!(f, "- {} | {} | {}", cert.name, cert.issuer, cert.date)?;
            if let Some(link) = &cert.link {
                writeln!(f, "  View Credential: {}", link)?;
            }
        }
        Ok(())
    }

    fn education(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let education = &self.0.about.education;
        if education.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "## Education")?;
        let mut degree = education.degree.clone();
        if !education.major.is_empty() {
            degree = format!("{} in {}", or(&degree, "Degree"), education.major);
        }
        writeln!(f, "{}", degree)?;
        if !education.institution.is_empty() {
            writeln!(f, "{}", education.institution)?;
        }
        if !education.year.is_empty() {
            writeln!(f, "Year: {}", education.year)?;
        }
        if !education.gpa.is_empty() {
            writeln!(f, "GPA: {}", education.gpa)?;
        }
        Ok(())
    }

    fn contact(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contact = &self.0.contact;
        writeln!(f)?;
        writeln!(f, "## Contact")?;
        writeln!(f, "Email: {}", or(&contact.email, "Email not available"))?;
        writeln!(f, "Phone: {}", or(&contact.phone, "Phone not available"))?;
        writeln!(f, "LinkedIn: {}", or(&contact.linkedin, "Not Linked"))?;
        writeln!(f, "Location: {}", or(&contact.location, "Location not specified"))
    }
}

impl fmt::Display for PortfolioText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.hero(f)?;
        self.about(f)?;
        self.experience(f)?;
        self.skills(f)?;
        self.projects(f)?;
        self.certifications(f)?;
        self.education(f)?;
        self.contact(f)
    }
}
