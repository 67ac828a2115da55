//! Transcript export
//!
//! Writes conversation logs as timestamped plain-text files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use support_agent_core::{Turn, TurnRole};

use crate::AgentError;

/// Write `turns` as a numbered transcript under `dir`.
///
/// The directory is created if missing. Returns the path of the written
/// file, named `conversation_{timestamp}.txt`.
pub fn export(dir: &Path, turns: &[Turn]) -> Result<PathBuf, AgentError> {
    if turns.is_empty() {
        return Err(AgentError::EmptyHistory);
    }

    fs::create_dir_all(dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("conversation_{timestamp}.txt"));
    fs::write(&path, render(turns))?;

    tracing::info!(path = %path.display(), turns = turns.len(), "Transcript exported");
    Ok(path)
}

fn render(turns: &[Turn]) -> String {
    let divider = "-".repeat(70);
    let mut lines = vec![
        "CONVERSATION LOG".to_string(),
        format!("Exported: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        format!("Total turns: {}", turns.len() / 2),
        divider.clone(),
    ];

    for (index, pair) in turns.chunks(2).enumerate() {
        lines.push(format!("\nTURN {}", index + 1));
        for turn in pair {
            let label = match turn.role {
                TurnRole::User => "User",
                TurnRole::Assistant => "Assistant",
            };
            lines.push(format!(
                "[{}] {}: {}",
                turn.timestamp.format("%H:%M:%S"),
                label,
                turn.content
            ));
        }
        lines.push(divider.clone());
    }

    lines.push("END OF CONVERSATION".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_turns() -> Vec<Turn> {
        vec![
            Turn::user("What are your hours?"),
            Turn::assistant("We are open 9 to 6."),
            Turn::user("Thanks"),
            Turn::assistant("You're welcome!"),
        ]
    }

    #[test]
    fn test_export_empty_rejected() {
        let dir = TempDir::new().unwrap();
        let result = export(dir.path(), &[]);
        assert!(matches!(result, Err(AgentError::EmptyHistory)));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = export(dir.path(), &sample_turns()).unwrap();

        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("conversation_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_export_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("logs").join("agent");
        let path = export(&nested, &sample_turns()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_format() {
        let text = render(&sample_turns());

        assert!(text.starts_with("CONVERSATION LOG"));
        assert!(text.contains("Total turns: 2"));
        assert!(text.contains("TURN 1"));
        assert!(text.contains("TURN 2"));
        assert!(text.contains("User: What are your hours?"));
        assert!(text.contains("Assistant: We are open 9 to 6."));
        assert!(text.ends_with("END OF CONVERSATION"));
    }
}
