use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap_complete::{generate, Shell};

use crate::app::AppError;

const BIN_NAME: &str = "craftlist";

pub fn run_completions_command(shell_arg: Option<&str>, install: bool) -> Result<(), AppError> {
    let shell = resolve_shell(shell_arg, std::env::var("SHELL").ok().as_deref())?;
    if install {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| AppError::InvalidArgument("HOME is not set".to_string()))?;
        let path = install_completions(shell, &home)?;
        println!("completions installed to {}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        write_completions(shell, &mut stdout);
    }
    Ok(())
}

pub fn write_completions(shell: Shell, buf: &mut dyn Write) {
    let mut cmd = crate::cli::styled_command();
    generate(shell, &mut cmd, BIN_NAME, buf);
}

/// An explicit name wins; otherwise the basename of `$SHELL` is used.
fn resolve_shell(explicit: Option<&str>, env_shell: Option<&str>) -> Result<Shell, AppError> {
    if let Some(name) = explicit {
        return parse_shell(name)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown shell '{name}'")));
    }
    env_shell
        .and_then(|path| path.rsplit('/').next())
        .and_then(parse_shell)
        .ok_or_else(|| {
            AppError::InvalidArgument(
                "unable to detect shell from $SHELL; pass a shell name".to_string(),
            )
        })
}

fn parse_shell(raw: &str) -> Option<Shell> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "elvish" => Some(Shell::Elvish),
        "powershell" | "pwsh" => Some(Shell::PowerShell),
        _ => None,
    }
}

fn install_path(shell: Shell, home: &Path) -> Option<PathBuf> {
    let path = match shell {
        Shell::Bash => home
            .join(".local/share/bash-completion/completions")
            .join(BIN_NAME),
        Shell::Zsh => home
            .join(".config/craftlist/completions")
            .join(format!("{BIN_NAME}.zsh")),
        Shell::Fish => home
            .join(".config/fish/completions")
            .join(format!("{BIN_NAME}.fish")),
        _ => return None,
    };
    Some(path)
}

fn install_completions(shell: Shell, home: &Path) -> io::Result<PathBuf> {
    let path = install_path(shell, home).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no install path for {shell:?}"),
        )
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut buf = Vec::new();
    write_completions(shell, &mut buf);
    std::fs::write(&path, buf)?;

    if shell == Shell::Zsh {
        source_from_zshrc(home, &path)?;
    }
    Ok(path)
}

fn source_from_zshrc(home: &Path, completions: &Path) -> io::Result<()> {
    let zshrc = home.join(".zshrc");
    let line = format!("source \"{}\"", completions.display());
    match std::fs::read_to_string(&zshrc) {
        Ok(content) if content.contains(&line) => return Ok(()),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&zshrc)?;
    writeln!(file)?;
    writeln!(file, "# {BIN_NAME} shell completions")?;
    writeln!(file, "{line}")?;
    Ok(())
}
