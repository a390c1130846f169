//! Markdown rendering for status reports and error comments.

pub const NEW_LINE: &str = "\r\n";
pub const REPORT_FOOTER: &str = "\r\n--\r\n_collaborators-manager-action_";
pub const GITHUB_WEB_BASE: &str = "https://github.com";

pub fn user_link(user: &str) -> String {
    format!("[{user}]({GITHUB_WEB_BASE}/{user})")
}

/// Possessive link, e.g. "[alice's](https://github.com/alice)".
pub fn user_possessive_link(user: &str) -> String {
    format!("[{user}'s]({GITHUB_WEB_BASE}/{user})")
}

pub fn repository_link(name: &str, full_name: &str) -> String {
    format!("[{name}]({GITHUB_WEB_BASE}/{full_name})")
}

pub fn invitations_url(full_name: &str) -> String {
    format!("{GITHUB_WEB_BASE}/{full_name}/invitations")
}

#[derive(Debug, Clone)]
/// Numbered markdown table preceded by a title line.
pub struct ReportTable {
    lines: Vec<String>,
    rows: usize,
}

impl ReportTable {
    pub fn new(title: &str, columns: &[&str]) -> Self {
        let header = columns
            .iter()
            .map(|column| format!(" {column} "))
            .collect::<Vec<_>>()
            .join("|");
        let separator = columns
            .iter()
            .map(|column| "-".repeat(column.len() + 2))
            .collect::<Vec<_>>()
            .join("|");
        Self {
            lines: vec![
                format!("{title}{NEW_LINE}"),
                format!("| No |{header}|"),
                format!("|:--:|{separator}|"),
            ],
            rows: 0,
        }
    }

    /// Append a row; the sequence number is assigned here.
    pub fn push_row(&mut self, cells: &[String]) {
        self.rows += 1;
        self.lines.push(format!("|{}|{}|", self.rows, cells.join("|")));
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Comment body for a finished run.
pub fn render_report_comment(lines: &[String]) -> String {
    format!("{}{NEW_LINE}{REPORT_FOOTER}", lines.join(NEW_LINE))
}

/// Comment body posted when a run aborts.
pub fn render_error_comment(message: &str) -> String {
    format!("Error: {message}{NEW_LINE}{REPORT_FOOTER}")
}
