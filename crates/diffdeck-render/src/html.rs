use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write;

use diffdeck_core::{AreaStats, ProjectSnapshot};
use diffdeck_git::{ChangeArea, CommitType, DiffedEntry};

use crate::assets::{DIFF2HTML_CSS, DIFF2HTML_JS, SCRIPT, STYLE};
use crate::escape::{escape_html, escape_script_json};

/// Settings that do not come from the snapshot itself
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Base URL of the control server, e.g. `http://127.0.0.1:6060`
    pub server_url: String,
    pub generated_at: DateTime<Local>,
}

impl RenderOptions {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            generated_at: Local::now(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientProject<'a> {
    key: &'a str,
    repo_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientConfig<'a> {
    server_url: &'a str,
    projects: Vec<ClientProject<'a>>,
}

/// Render the full viewer document for `projects`.
pub fn render_document(projects: &[ProjectSnapshot], options: &RenderOptions) -> String {
    let config = ClientConfig {
        server_url: &options.server_url,
        projects: projects
            .iter()
            .map(|p| ClientProject {
                key: &p.project_key,
                repo_path: p.repo_path().to_string_lossy().to_string(),
            })
            .collect(),
    };
    let config_json = serde_json::to_string(&config).unwrap_or_else(|_| "{}".to_string());

    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<title>Git Changes</title>\n");
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{}\">", DIFF2HTML_CSS);
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    let _ = writeln!(html, "<script src=\"{}\"></script>", DIFF2HTML_JS);
    let _ = writeln!(
        html,
        "<script>window.DIFFDECK = {};</script>",
        escape_script_json(&config_json)
    );
    let _ = writeln!(html, "<script>{}</script>", SCRIPT);
    html.push_str("</head>\n<body>\n<div class=\"layout\">\n");

    render_sidebar(&mut html, projects);

    html.push_str("<div class=\"main-content\">\n");
    if projects.is_empty() {
        html.push_str("<p class=\"no-changes\">No repositories configured</p>\n");
    }
    for (index, project) in projects.iter().enumerate() {
        render_project(&mut html, index, project);
    }
    let _ = writeln!(
        html,
        "<p class=\"footer\">Generated {} <button class=\"file-button stage-button\" data-action=\"refresh\">Refresh</button></p>",
        options.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    html.push_str("</div>\n</div>\n");

    render_commit_modal(&mut html);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, projects: &[ProjectSnapshot]) {
    html.push_str("<div class=\"sidebar\">\n<ul class=\"sidebar-tabs\">\n");
    for (index, project) in projects.iter().enumerate() {
        let _ = writeln!(
            html,
            "<li class=\"sidebar-tab{}\" data-project=\"{}\">{}</li>",
            if index == 0 { " active" } else { "" },
            index,
            escape_html(&project.project_key.to_uppercase())
        );
    }
    html.push_str("</ul>\n</div>\n");
}

fn render_project(html: &mut String, index: usize, project: &ProjectSnapshot) {
    let repo = escape_html(&project.repo_path().to_string_lossy());
    let snapshot = &project.repository;

    let _ = writeln!(
        html,
        "<div class=\"project-section{}\" data-project=\"{}\">",
        if index == 0 { " active" } else { "" },
        index
    );
    let _ = writeln!(html, "<p class=\"project-path\">{}</p>", repo);

    // Staged
    html.push_str("<div class=\"section\">\n<div class=\"section-header\">\n");
    let _ = writeln!(
        html,
        "<h2 class=\"section-title\">Staged Changes <span class=\"count\">({} files)</span></h2>",
        snapshot.staged_entries.len()
    );
    let _ = writeln!(
        html,
        "<button class=\"batch-button commit-button\" data-action=\"open-commit\"{}>Commit</button>",
        if snapshot.staged_entries.is_empty() { " disabled" } else { "" }
    );
    html.push_str("</div>\n");
    render_stats(html, &snapshot.staged_stats());
    render_file_list(html, index, &repo, ChangeArea::Staged, &snapshot.staged_entries);
    html.push_str("</div>\n");

    // Working
    html.push_str("<div class=\"section\">\n<div class=\"section-header\">\n");
    let _ = writeln!(
        html,
        "<h2 class=\"section-title\">Working Changes <span class=\"count\">({} files)</span></h2>",
        snapshot.working_entries.len()
    );
    if snapshot.has_unstaged() {
        let _ = writeln!(
            html,
            "<div class=\"batch-buttons\">\
             <button class=\"batch-button stage-all\" data-action=\"stage-all\" data-repo=\"{repo}\">Stage All</button>\
             <button class=\"batch-button undo-all\" data-action=\"undo-all-working\" data-repo=\"{repo}\">Undo All</button>\
             </div>"
        );
    }
    html.push_str("</div>\n");
    render_stats(html, &snapshot.working_stats());
    render_file_list(html, index, &repo, ChangeArea::Working, &snapshot.working_entries);
    html.push_str("</div>\n");

    html.push_str("</div>\n");
}

fn render_stats(html: &mut String, stats: &AreaStats) {
    let _ = write!(
        html,
        "<div class=\"stats\">\
         <div><strong>Modified:</strong> <span>{}</span></div>\
         <div><strong>Added:</strong> <span>{}</span></div>\
         <div><strong>Deleted:</strong> <span>{}</span></div>",
        stats.modified, stats.added, stats.deleted
    );
    if stats.unknown > 0 {
        let _ = write!(
            html,
            "<div><strong>Other:</strong> <span>{}</span></div>",
            stats.unknown
        );
    }
    html.push_str("</div>\n");
}

fn render_file_list(
    html: &mut String,
    project_index: usize,
    repo: &str,
    area: ChangeArea,
    entries: &[DiffedEntry],
) {
    html.push_str("<div class=\"file-list\">\n");

    if entries.is_empty() {
        let _ = writeln!(html, "<p class=\"no-changes\">No {} changes</p>", area);
    }

    for (index, diffed) in entries.iter().enumerate() {
        let entry = &diffed.entry;
        let target = format!("{}-{}-{}", area, project_index, index);
        let file = escape_html(&entry.path);

        let _ = write!(
            html,
            "<div class=\"file-item{}\">\n\
             <div class=\"file-header\" data-target=\"{target}\">\
             <span class=\"file-number\">#{}</span>\
             <span class=\"file-name\">{file}</span>\
             <span class=\"file-status status-{}\" title=\"{}\">{}</span>",
            if area.is_staged() { "" } else { " working-file" },
            index + 1,
            entry.kind.code(),
            escape_html(&entry.raw_status),
            entry.kind.label(),
        );

        if !area.is_staged() {
            let _ = write!(
                html,
                "<button class=\"file-button stage-button\" data-action=\"stage\" data-repo=\"{repo}\" data-file=\"{file}\">Stage</button>"
            );
        }
        let _ = write!(
            html,
            "<button class=\"file-button undo-button\" data-action=\"undo\" data-area=\"{area}\" data-repo=\"{repo}\" data-file=\"{file}\">{}</button>",
            if area.is_staged() { "Unstage" } else { "Undo" }
        );
        html.push_str("</div>\n");

        let _ = write!(html, "<div id=\"{target}\" class=\"diff-content\">");
        if diffed.diff_text.is_empty() {
            html.push_str("<p class=\"no-changes\">No textual changes</p>");
        } else {
            let _ = write!(
                html,
                "<div class=\"d2h-target\"><pre class=\"raw-diff\">{}</pre></div>",
                escape_html(&diffed.diff_text)
            );
        }
        html.push_str("</div>\n</div>\n");
    }

    html.push_str("</div>\n");
}

fn render_commit_modal(html: &mut String) {
    html.push_str(
        "<div id=\"commitModal\" class=\"modal\">\n<div class=\"modal-content\">\n\
         <h2>Create Commit</h2>\n\
         <div class=\"form-group\"><label for=\"commitType\">Type</label><select id=\"commitType\">",
    );
    for commit_type in CommitType::ALL {
        let _ = write!(
            html,
            "<option value=\"{}\">{} - {}</option>",
            commit_type,
            commit_type,
            commit_type.description()
        );
    }
    html.push_str(
        "</select></div>\n\
         <div class=\"form-group\"><label for=\"commitMessage\">Message</label>\
         <input type=\"text\" id=\"commitMessage\" placeholder=\"Commit message...\"></div>\n\
         <div class=\"modal-buttons\">\
         <button class=\"modal-button secondary\" data-action=\"close-commit\">Cancel</button>\
         <button id=\"createCommitButton\" class=\"modal-button primary\" data-action=\"create-commit\" disabled>Create Commit</button>\
         </div>\n</div>\n</div>\n",
    );
}
