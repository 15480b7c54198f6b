//! Fixed HTML template for a portfolio page.
//!
//! Every inserted value is HTML-escaped. Sections with no content are left
//! out entirely rather than rendered with an empty heading.

use std::fmt::Write;

use crate::models::portfolio::{PortfolioContent, PortfolioDocument};

pub const STYLESHEET_HREF: &str = "style.css";

pub const DEFAULT_STYLESHEET: &str = r#"* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif; color: #1f2933; background: #f7f9fb; line-height: 1.6; }
header { background: #1f2933; color: #ffffff; padding: 3rem 1.5rem; text-align: center; }
header h1 { font-size: 2.25rem; letter-spacing: 0.02em; }
main { max-width: 860px; margin: 0 auto; padding: 2rem 1.5rem; }
section { margin-bottom: 2.5rem; }
section h2 { font-size: 1.35rem; border-bottom: 2px solid #3e7bfa; padding-bottom: 0.35rem; margin-bottom: 1rem; }
.about p { margin-bottom: 0.75rem; }
.skills-summary { margin-bottom: 0.75rem; }
.skills ul { list-style: none; display: flex; flex-wrap: wrap; gap: 0.5rem; }
.skills li { background: #e4ecfd; color: #1d4ed8; border-radius: 999px; padding: 0.25rem 0.8rem; font-size: 0.9rem; }
.entry { margin-bottom: 1.25rem; }
.entry h3 { font-size: 1.05rem; }
.entry .meta { color: #52606d; font-size: 0.9rem; }
.entry p { margin-top: 0.35rem; }
footer { text-align: center; color: #7b8794; font-size: 0.85rem; padding: 2rem 0; }
"#;

/// Renders assembled content into markup plus the default stylesheet.
pub fn render_portfolio(content: &PortfolioContent, year: i32) -> PortfolioDocument {
    let resume = &content.resume;
    let title = escape_html(&content.title);
    let mut body = String::new();

    if !content.about_me.trim().is_empty() {
        body.push_str("    <section class=\"about\">\n      <h2>About Me</h2>\n");
        for paragraph in paragraphs(&content.about_me) {
            let _ = writeln!(body, "      <p>{}</p>", escape_html(paragraph));
        }
        body.push_str("    </section>\n");
    }

    if !resume.skills.is_empty() || !content.skills_summary.trim().is_empty() {
        body.push_str("    <section class=\"skills\">\n      <h2>Skills</h2>\n");
        if !content.skills_summary.trim().is_empty() {
            let _ = writeln!(
                body,
                "      <p class=\"skills-summary\">{}</p>",
                escape_html(content.skills_summary.trim())
            );
        }
        if !resume.skills.is_empty() {
            body.push_str("      <ul>\n");
            for skill in &resume.skills {
                let _ = writeln!(body, "        <li>{}</li>", escape_html(skill));
            }
            body.push_str("      </ul>\n");
        }
        body.push_str("    </section>\n");
    }

    if !resume.work_experience.is_empty() {
        body.push_str("    <section class=\"experience\">\n      <h2>Work Experience</h2>\n");
        for job in &resume.work_experience {
            let heading = join_present(&[&job.designation, &job.company], " at ");
            push_entry(&mut body, &heading, &job.duration, &job.description);
        }
        body.push_str("    </section>\n");
    }

    if !resume.projects.is_empty() {
        body.push_str("    <section class=\"projects\">\n      <h2>Projects</h2>\n");
        for project in &resume.projects {
            push_entry(&mut body, &project.name, "", &project.description);
        }
        body.push_str("    </section>\n");
    }

    if !resume.education.is_empty() {
        body.push_str("    <section class=\"education\">\n      <h2>Education</h2>\n");
        for edu in &resume.education {
            let meta = join_present(&[&edu.institution, &edu.board], " · ");
            push_entry(&mut body, &edu.degree, &meta, &edu.description);
        }
        body.push_str("    </section>\n");
    }

    let markup = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20 <meta charset=\"utf-8\">\n\
         \x20 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         \x20 <title>{title}</title>\n\
         \x20 <link rel=\"stylesheet\" href=\"{STYLESHEET_HREF}\">\n\
         </head>\n\
         <body>\n\
         \x20 <header><h1>{title}</h1></header>\n\
         \x20 <main>\n\
         {body}\
         \x20 </main>\n\
         \x20 <footer>&copy; {year} {title}</footer>\n\
         </body>\n\
         </html>\n"
    );

    PortfolioDocument {
        markup,
        stylesheet: DEFAULT_STYLESHEET.to_string(),
    }
}

fn push_entry(body: &mut String, heading: &str, meta: &str, description: &str) {
    body.push_str("      <div class=\"entry\">\n");
    if !heading.is_empty() {
        let _ = writeln!(body, "        <h3>{}</h3>", escape_html(heading));
    }
    if !meta.is_empty() {
        let _ = writeln!(body, "        <div class=\"meta\">{}</div>", escape_html(meta));
    }
    for paragraph in paragraphs(description) {
        let _ = writeln!(body, "        <p>{}</p>", escape_html(paragraph));
    }
    body.push_str("      </div>\n");
}

fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

fn join_present(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
