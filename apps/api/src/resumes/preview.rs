//! Print-friendly Markdown rendering of a resume.
//!
//! Section order follows the on-screen preview: summary, experience,
//! education, skills, projects, certifications, languages, awards and
//! volunteer work. Empty sections are skipped.

use crate::models::resume::Resume;

/// A missing end date, or a `current` flag, reads as "Present".
fn date_range(start: Option<&str>, end: Option<&str>, current: bool) -> String {
    let end = match end {
        Some(e) if !current => e,
        _ => "Present",
    };
    match start {
        Some(s) => format!("{s} - {end}"),
        None => end.to_string(),
    }
}

fn joined<'a>(parts: impl IntoIterator<Item = Option<&'a str>>, sep: &str) -> String {
    parts
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn render_resume_markdown(resume: &Resume) -> String {
    let c = &resume.content;
    let p = &c.personal_info;
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", p.full_name()));
    if let Some(title) = &p.title {
        md.push_str(&format!("**{title}**\n\n"));
    }

    let location = joined(
        [p.city.as_deref(), p.state.as_deref(), p.zip_code.as_deref()],
        " ",
    );
    let address = joined([p.address.as_deref(), Some(location.as_str())], ", ");
    let contact = joined(
        [
            Some(p.email.as_str()),
            p.phone.as_deref(),
            Some(address.as_str()),
            p.country.as_deref(),
            p.linkedin.as_deref(),
            p.website.as_deref(),
        ],
        " | ",
    );
    if !contact.is_empty() {
        md.push_str(&format!("{contact}\n\n"));
    }

    if let Some(summary) = &p.summary {
        md.push_str(&format!("## Professional Summary\n\n{summary}\n\n"));
    }

    if !c.experience.is_empty() {
        md.push_str("## Work Experience\n\n");
        for exp in &c.experience {
            md.push_str(&format!("### {} — {}\n", exp.title, exp.company));
            let when = date_range(exp.start_date.as_deref(), exp.end_date.as_deref(), exp.current);
            let meta = joined([exp.location.as_deref(), Some(when.as_str())], " | ");
            md.push_str(&format!("_{meta}_\n"));
            if let Some(desc) = &exp.description {
                md.push_str(&format!("\n{desc}\n"));
            }
            for item in &exp.achievements {
                md.push_str(&format!("- {item}\n"));
            }
            if !exp.technologies.is_empty() {
                md.push_str(&format!("\n**Technologies:** {}\n", exp.technologies.join(", ")));
            }
            md.push('\n');
        }
    }

    if !c.education.is_empty() {
        md.push_str("## Education\n\n");
        for edu in &c.education {
            let degree = joined([Some(edu.degree.as_str()), edu.field_of_study.as_deref()], ", ");
            md.push_str(&format!("### {degree}\n"));
            let dated = edu.start_date.is_some() || edu.end_date.is_some() || edu.current;
            let when = edu.year.clone().or_else(|| {
                dated.then(|| {
                    date_range(edu.start_date.as_deref(), edu.end_date.as_deref(), edu.current)
                })
            });
            let meta = joined([Some(edu.institution.as_str()), when.as_deref()], " | ");
            md.push_str(&format!("_{meta}_\n"));
            if let Some(gpa) = &edu.gpa {
                md.push_str(&format!("GPA: {gpa}\n"));
            }
            if let Some(desc) = &edu.description {
                md.push_str(&format!("\n{desc}\n"));
            }
            for item in &edu.achievements {
                md.push_str(&format!("- {item}\n"));
            }
            md.push('\n');
        }
    }

    if !c.skills.is_empty() {
        md.push_str("## Skills\n\n");
        for skill in &c.skills {
            md.push_str(&format!("- {} ({})\n", skill.name, skill.level.as_str()));
        }
        md.push('\n');
    }

    if !c.projects.is_empty() {
        md.push_str("## Projects\n\n");
        for project in &c.projects {
            md.push_str(&format!("### {}\n", project.title));
            if let Some(desc) = &project.description {
                md.push_str(&format!("{desc}\n"));
            }
            if let Some(tech) = &project.technologies {
                md.push_str(&format!("**Technologies:** {tech}\n"));
            }
            let links = joined([project.link.as_deref(), project.github.as_deref()], " | ");
            if !links.is_empty() {
                md.push_str(&format!("{links}\n"));
            }
            md.push('\n');
        }
    }

    if !c.certifications.is_empty() {
        md.push_str("## Certifications\n\n");
        for cert in &c.certifications {
            let meta = joined(
                [cert.issuer.as_deref(), cert.year.as_deref().or(cert.date.as_deref())],
                ", ",
            );
            if meta.is_empty() {
                md.push_str(&format!("- {}\n", cert.name));
            } else {
                md.push_str(&format!("- {} ({meta})\n", cert.name));
            }
        }
        md.push('\n');
    }

    if !c.languages.is_empty() {
        md.push_str("## Languages\n\n");
        for lang in &c.languages {
            md.push_str(&format!("- {}: {}\n", lang.name, lang.proficiency.as_str()));
        }
        md.push('\n');
    }

    if !c.awards.is_empty() {
        md.push_str("## Awards & Achievements\n\n");
        for award in &c.awards {
            let meta = joined([award.issuer.as_deref(), award.year.as_deref()], ", ");
            if meta.is_empty() {
                md.push_str(&format!("- {}\n", award.name));
            } else {
                md.push_str(&format!("- {} ({meta})\n", award.name));
            }
        }
        md.push('\n');
    }

    if !c.volunteer.is_empty() {
        md.push_str("## Volunteer Experience\n\n");
        for vol in &c.volunteer {
            md.push_str(&format!("### {} — {}\n", vol.role, vol.organisation));
            let range = date_range(vol.start_date.as_deref(), vol.end_date.as_deref(), vol.current);
            md.push_str(&format!("_{range}_\n"));
            if let Some(desc) = &vol.description {
                md.push_str(&format!("\n{desc}\n"));
            }
            md.push('\n');
        }
    }

    md
}
