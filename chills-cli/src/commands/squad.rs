use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;

use super::Session;
use crate::render::Render;

/// Group and squad details requested on the command line.
pub struct Request {
    pub members: Vec<String>,
    pub name: Option<String>,
    pub description: String,
    pub course: Option<String>,
}

pub fn run(session: Session, request: Request, json: bool) -> Result<()> {
    let mut discovery = session.discovery;

    for member in &request.members {
        if discovery.is_selected(member) {
            continue;
        }
        if !discovery.toggle_user(member) {
            anyhow::bail!("'{member}' is not in the candidate pool");
        }
    }

    let decision = discovery.squad_course();
    let course_choice = request.course.map(|c| c.trim().to_uppercase());

    if json {
        let draft = match &request.name {
            Some(name) => Some(discovery.draft_squad(
                name,
                &request.description,
                &session.user_id,
                course_choice.as_deref(),
            )?),
            None => None,
        };
        let output = json!({
            "selected": discovery.selection(),
            "constraint": discovery.constraint(),
            "squad_course": decision,
            "blocked": decision.is_blocked(),
            "draft": draft,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let names: Vec<String> = discovery.selected().map(|m| m.student.full_name()).collect();
    println!("{} {}", "Selected:".bold(), names.join(", "));
    println!("{}", decision.render());

    if decision.is_blocked() {
        anyhow::bail!("No squad is possible with this group");
    }

    let Some(name) = request.name else {
        return Ok(());
    };

    let draft = discovery.draft_squad(
        &name,
        &request.description,
        &session.user_id,
        course_choice.as_deref(),
    )?;
    println!();
    println!("{}", draft.render());

    Ok(())
}
