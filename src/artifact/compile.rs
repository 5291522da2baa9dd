//! Stylesheet compiler invocation.
//!
//! Tailwind CLI arguments: `command -i input -o output [--minify] [-c config]`

use std::{
    ffi::OsString,
    fs,
    path::Path,
    process::Command,
};

use super::ArtifactError;
use crate::{config::CompilerConfig, debug, log};

/// Full argument vector, program first.
pub fn compiler_command(config: &CompilerConfig, output: &Path) -> Vec<OsString> {
    let mut command: Vec<OsString> = config.command.iter().map(OsString::from).collect();
    command.extend([
        "-i".into(),
        config.input.clone().into_os_string(),
        "-o".into(),
        output.to_path_buf().into_os_string(),
    ]);
    if config.minify {
        command.push("--minify".into());
    }
    if let Some(path) = &config.config {
        command.extend(["-c".into(), path.clone().into_os_string()]);
    }
    command
}

/// Run the compiler in `cwd`, writing the stylesheet to `output`.
pub fn compile(config: &CompilerConfig, output: &Path, cwd: &Path) -> Result<(), ArtifactError> {
    let command = compiler_command(config, output);
    let Some((program, args)) = command.split_first() else {
        return Err(ArtifactError::CompilerNotFound(String::new()));
    };
    let name = program.to_string_lossy().into_owned();
    let program = which::which(program).map_err(|_| ArtifactError::CompilerNotFound(name.clone()))?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| ArtifactError::CompilerIo(name.clone(), e))?;
    }

    let display = command
        .iter()
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    log!("compile"; "{}", display);

    let result = Command::new(&program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| ArtifactError::CompilerIo(name.clone(), e))?;

    if !result.status.success() {
        return Err(ArtifactError::CompilerFailed {
            command: display,
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    let stderr = String::from_utf8_lossy(&result.stderr);
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        debug!("compile"; "{}", line.trim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_compiler_command() {
        let config = CompilerConfig {
            enable: true,
            command: vec!["npx".into(), "tailwindcss".into()],
            input: PathBuf::from("/site/input.css"),
            config: Some(PathBuf::from("/site/tailwind.config.js")),
            minify: true,
        };
        let command = compiler_command(&config, Path::new("/site/out.css"));
        let command: Vec<_> = command.iter().map(|s| s.to_string_lossy().into_owned()).collect();
        assert_eq!(
            command,
            vec![
                "npx",
                "tailwindcss",
                "-i",
                "/site/input.css",
                "-o",
                "/site/out.css",
                "--minify",
                "-c",
                "/site/tailwind.config.js"
            ]
        );
    }

    #[test]
    fn test_compiler_not_found() {
        let temp = TempDir::new().unwrap();
        let config = CompilerConfig {
            enable: true,
            command: vec!["stylebake-no-such-compiler".into()],
            ..Default::default()
        };
        let err = compile(&config, &temp.path().join("out.css"), temp.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::CompilerNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_runs_command() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.css");
        fs::write(&input, ".a{}").unwrap();

        // $1=-i $2=input $3=-o $4=output
        let config = CompilerConfig {
            enable: true,
            command: vec!["sh".into(), "-c".into(), "cp \"$2\" \"$4\"".into(), "sh".into()],
            input,
            config: None,
            minify: false,
        };
        let output = temp.path().join("dist/out.css");
        compile(&config, &output, temp.path()).unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), ".a{}");
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_failure() {
        let temp = TempDir::new().unwrap();
        let config = CompilerConfig {
            enable: true,
            command: vec!["sh".into(), "-c".into(), "echo broken >&2; exit 3".into(), "sh".into()],
            minify: false,
            ..Default::default()
        };
        let err = compile(&config, &temp.path().join("out.css"), temp.path()).unwrap_err();
        let ArtifactError::CompilerFailed { stderr, .. } = err else {
            panic!("expected compiler failure");
        };
        assert_eq!(stderr, "broken");
    }
}
