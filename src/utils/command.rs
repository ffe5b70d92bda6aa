use std::path::Path;
use std::process::Command;

use crate::errors::{AppError, Result};

/// Runs an external tool to completion, blocking until it exits.
/// A non-zero exit becomes a `Command` error carrying the captured stderr.
pub fn run(program: &Path, args: &[String]) -> Result<()> {
    let rendered = format!("{} {}", program.display(), args.join(" "));
    tracing::debug!(command = %rendered, "command called");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| AppError::Command {
            command: rendered.clone(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        let mut detail = output.status.to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            detail.push_str(": ");
            detail.push_str(stderr.trim());
        }
        return Err(AppError::Command {
            command: rendered,
            detail,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_run_success() {
        assert!(run(&PathBuf::from("true"), &[]).is_ok());
    }

    #[test]
    fn test_run_nonzero_exit() {
        assert!(matches!(
            run(&PathBuf::from("false"), &[]),
            Err(AppError::Command { .. })
        ));
    }

    #[test]
    fn test_run_missing_program() {
        assert!(matches!(
            run(&PathBuf::from("/nonexistent/tool"), &[]),
            Err(AppError::Command { .. })
        ));
    }
}
