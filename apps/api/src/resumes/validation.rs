use crate::errors::AppError;
use crate::models::resume::{ResumeContent, DEFAULT_SKILL_CATEGORY, DEFAULT_TEMPLATE};

fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional field; blank values collapse to `None`.
fn trim_opt(value: &mut Option<String>) {
    if let Some(s) = value {
        trim(s);
        if s.is_empty() {
            *value = None;
        }
    }
}

fn trim_list(values: &mut Vec<String>) {
    values.iter_mut().for_each(trim);
    values.retain(|s| !s.is_empty());
}

/// Normalises whitespace across every string field of the document.
pub fn sanitize_content(content: &mut ResumeContent) {
    let p = &mut content.personal_info;
    trim(&mut p.first_name);
    trim(&mut p.last_name);
    trim(&mut p.email);
    for field in [
        &mut p.phone,
        &mut p.title,
        &mut p.address,
        &mut p.city,
        &mut p.state,
        &mut p.zip_code,
        &mut p.country,
        &mut p.linkedin,
        &mut p.website,
        &mut p.summary,
    ] {
        trim_opt(field);
    }

    for e in &mut content.education {
        trim(&mut e.institution);
        trim(&mut e.degree);
        for field in [
            &mut e.field_of_study,
            &mut e.year,
            &mut e.start_date,
            &mut e.end_date,
            &mut e.gpa,
            &mut e.description,
        ] {
            trim_opt(field);
        }
        trim_list(&mut e.achievements);
    }

    for e in &mut content.experience {
        trim(&mut e.company);
        trim(&mut e.title);
        for field in [
            &mut e.location,
            &mut e.start_date,
            &mut e.end_date,
            &mut e.description,
        ] {
            trim_opt(field);
        }
        trim_list(&mut e.achievements);
        trim_list(&mut e.technologies);
    }

    for s in &mut content.skills {
        trim(&mut s.name);
        trim(&mut s.category);
        if s.category.is_empty() {
            s.category = DEFAULT_SKILL_CATEGORY.to_string();
        }
    }

    for e in &mut content.projects {
        trim(&mut e.title);
        for field in [
            &mut e.description,
            &mut e.technologies,
            &mut e.link,
            &mut e.github,
            &mut e.start_date,
            &mut e.end_date,
        ] {
            trim_opt(field);
        }
    }

    for e in &mut content.certifications {
        trim(&mut e.name);
        for field in [
            &mut e.issuer,
            &mut e.year,
            &mut e.date,
            &mut e.link,
            &mut e.description,
        ] {
            trim_opt(field);
        }
    }

    for e in &mut content.languages {
        trim(&mut e.name);
    }

    for e in &mut content.volunteer {
        trim(&mut e.organisation);
        trim(&mut e.role);
        for field in [&mut e.start_date, &mut e.end_date, &mut e.description] {
            trim_opt(field);
        }
    }

    for e in &mut content.awards {
        trim(&mut e.name);
        for field in [&mut e.year, &mut e.issuer, &mut e.description] {
            trim_opt(field);
        }
    }
}

fn require(missing: &mut Vec<String>, value: &str, path: impl FnOnce() -> String) {
    if value.trim().is_empty() {
        missing.push(format!("{} is required", path()));
    }
}

/// Checks every required field. All failures are reported together.
pub fn validate_content(content: &ResumeContent) -> Result<(), AppError> {
    let mut missing = Vec::new();

    let p = &content.personal_info;
    require(&mut missing, &p.first_name, || "personalInfo.firstName".into());
    require(&mut missing, &p.last_name, || "personalInfo.lastName".into());
    require(&mut missing, &p.email, || "personalInfo.email".into());

    for (i, e) in content.education.iter().enumerate() {
        require(&mut missing, &e.institution, || format!("education[{i}].institution"));
        require(&mut missing, &e.degree, || format!("education[{i}].degree"));
    }
    for (i, e) in content.experience.iter().enumerate() {
        require(&mut missing, &e.company, || format!("experience[{i}].company"));
        require(&mut missing, &e.title, || format!("experience[{i}].title"));
    }
    for (i, e) in content.skills.iter().enumerate() {
        require(&mut missing, &e.name, || format!("skills[{i}].name"));
    }
    for (i, e) in content.projects.iter().enumerate() {
        require(&mut missing, &e.title, || format!("projects[{i}].title"));
    }
    for (i, e) in content.certifications.iter().enumerate() {
        require(&mut missing, &e.name, || format!("certifications[{i}].name"));
    }
    for (i, e) in content.languages.iter().enumerate() {
        require(&mut missing, &e.name, || format!("languages[{i}].name"));
    }
    for (i, e) in content.volunteer.iter().enumerate() {
        require(&mut missing, &e.organisation, || format!("volunteer[{i}].organisation"));
        require(&mut missing, &e.role, || format!("volunteer[{i}].role"));
    }
    for (i, e) in content.awards.iter().enumerate() {
        require(&mut missing, &e.name, || format!("awards[{i}].name"));
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(missing.join(", ")))
    }
}

/// Blank or absent template names fall back to the default template.
pub fn normalize_template(template: Option<String>) -> String {
    template
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, PersonalInfo, SkillEntry};

    fn valid_content() -> ResumeContent {
        ResumeContent {
            personal_info: PersonalInfo {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_document() {
        assert!(validate_content(&valid_content()).is_ok());
    }

    #[test]
    fn reports_every_missing_field_with_its_path() {
        let mut content = valid_content();
        content.personal_info.email = "   ".to_string();
        content.experience.push(ExperienceEntry {
            company: "Navy".to_string(),
            ..Default::default()
        });

        let err = validate_content(&content).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("personalInfo.email is required"));
                assert!(msg.contains("experience[0].title is required"));
                assert!(!msg.contains("experience[0].company"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn sanitize_trims_and_drops_blank_optionals() {
        let mut content = valid_content();
        content.personal_info.first_name = "  Grace ".to_string();
        content.personal_info.phone = Some("   ".to_string());
        content.personal_info.city = Some(" Arlington ".to_string());
        content.skills.push(SkillEntry {
            name: " COBOL ".to_string(),
            category: " ".to_string(),
            ..Default::default()
        });
        content.experience.push(ExperienceEntry {
            company: "Navy".to_string(),
            title: "Rear Admiral".to_string(),
            technologies: vec![" UNIVAC ".to_string(), "".to_string()],
            ..Default::default()
        });

        sanitize_content(&mut content);

        assert_eq!(content.personal_info.first_name, "Grace");
        assert_eq!(content.personal_info.phone, None);
        assert_eq!(content.personal_info.city.as_deref(), Some("Arlington"));
        assert_eq!(content.skills[0].name, "COBOL");
        assert_eq!(content.skills[0].category, DEFAULT_SKILL_CATEGORY);
        assert_eq!(content.experience[0].technologies, vec!["UNIVAC".to_string()]);
    }

    #[test]
    fn template_defaults_to_modern() {
        assert_eq!(normalize_template(None), "modern");
        assert_eq!(normalize_template(Some("  ".into())), "modern");
        assert_eq!(normalize_template(Some(" classic ".into())), "classic");
    }
}
