use colored::Colorize;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn success(s: &str) {
    println!("{} {}", "✓".green().bold(), s);
}

pub fn warning(s: &str) {
    eprintln!("{} {}", "!".yellow().bold(), s.yellow());
}

/// Download progress on a single, rewritten line
pub fn progress(downloaded: u64, total: u64) {
    if total == 0 {
        return;
    }
    let percent = (downloaded as f64 / total as f64 * 100.0).min(100.0) as u8;
    let mb_downloaded = downloaded as f64 / 1_048_576.0;
    let mb_total = total as f64 / 1_048_576.0;
    eprint!(
        "\r  Downloading: {:.1} / {:.1} MB ({}%)",
        mb_downloaded, mb_total, percent
    );
    io::stderr().flush().ok();

    if downloaded >= total {
        eprintln!();
    }
}

/// Whether `dir` is one of the entries of a `PATH`-style value
pub fn is_on_path(dir: &Path, path_var: Option<&OsStr>) -> bool {
    let Some(path_var) = path_var else {
        return false;
    };
    let target = normalize(dir);
    std::env::split_paths(path_var)
        .filter(|p| !p.as_os_str().is_empty())
        .any(|p| normalize(&p) == target)
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Shell instructions for putting `install_dir` on `PATH`
pub fn path_hint(install_dir: &Path) -> String {
    if cfg!(windows) {
        format!(
            "To run neo4j-mcp from anywhere, add this folder to your PATH environment variable:\n  {}",
            install_dir.display()
        )
    } else {
        format!(
            "If `neo4j-mcp` is not found, add this to your shell config (~/.zshrc / ~/.bashrc):\n  export PATH=\"{}:$PATH\"",
            install_dir.display()
        )
    }
}

/// PATH hint or usage hint after a successful install
pub fn print_next_steps(install_dir: &Path) -> io::Result<()> {
    let path_var = std::env::var_os("PATH");
    if is_on_path(install_dir, path_var.as_deref()) {
        print_text("\nYou can now run:\n  neo4j-mcp --help")
    } else {
        print_text(&format!("\n{}", path_hint(install_dir)))
    }
}
