use neo4j_mcp_installer_core::{InstallerError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Arm64,
    I386,
}

/// How a release asset is packed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::TarGz => ".tar.gz",
            ArchiveKind::Zip => ".zip",
        }
    }
}

/// A supported (OS, arch) pair. Only constructible through [`Target::new`],
/// so unsupported combinations never reach the asset locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    os: Os,
    arch: Arch,
}

/// Every target with a published build
pub const SUPPORTED_TARGETS: [Target; 8] = [
    Target { os: Os::Linux, arch: Arch::X86_64 },
    Target { os: Os::Linux, arch: Arch::Arm64 },
    Target { os: Os::Linux, arch: Arch::I386 },
    Target { os: Os::Darwin, arch: Arch::X86_64 },
    Target { os: Os::Darwin, arch: Arch::Arm64 },
    Target { os: Os::Windows, arch: Arch::X86_64 },
    Target { os: Os::Windows, arch: Arch::Arm64 },
    Target { os: Os::Windows, arch: Arch::I386 },
];

impl Target {
    pub fn new(os: Os, arch: Arch) -> Result<Self> {
        match (os, arch) {
            (Os::Darwin, Arch::I386) => Err(unsupported(os.asset_label(), arch.asset_label())),
            _ => Ok(Self { os, arch }),
        }
    }

    /// Target of the running process
    pub fn detect() -> Result<Self> {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps host identifiers (`std::env::consts` style, plus common aliases)
    pub fn from_host(os: &str, arch: &str) -> Result<Self> {
        let os_kind = match os.to_ascii_lowercase().as_str() {
            "linux" => Os::Linux,
            "macos" | "darwin" => Os::Darwin,
            "windows" => Os::Windows,
            _ => return Err(unsupported(os, arch)),
        };

        let arch_kind = match arch.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Arch::X86_64,
            "aarch64" | "arm64" => Arch::Arm64,
            "x86" | "i386" | "i686" => Arch::I386,
            _ => return Err(unsupported(os, arch)),
        };

        Self::new(os_kind, arch_kind)
    }

    pub fn os(self) -> Os {
        self.os
    }

    pub fn arch(self) -> Arch {
        self.arch
    }

    pub fn archive_kind(self) -> ArchiveKind {
        match self.os {
            Os::Windows => ArchiveKind::Zip,
            Os::Linux | Os::Darwin => ArchiveKind::TarGz,
        }
    }

    pub fn binary_name(self) -> &'static str {
        match self.os {
            Os::Windows => "neo4j-mcp.exe",
            Os::Linux | Os::Darwin => "neo4j-mcp",
        }
    }

    /// Platform part of the asset name, e.g. "Linux_x86_64"
    pub fn label(self) -> String {
        format!("{}_{}", self.os.asset_label(), self.arch.asset_label())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.asset_label(), self.arch.asset_label())
    }
}

impl Os {
    pub fn asset_label(self) -> &'static str {
        match self {
            Os::Linux => "Linux",
            Os::Darwin => "Darwin",
            Os::Windows => "Windows",
        }
    }
}

impl Arch {
    pub fn asset_label(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
            Arch::I386 => "i386",
        }
    }
}

/// Binary name on the running host, independent of target support
pub fn host_binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    return "neo4j-mcp.exe";

    #[cfg(not(target_os = "windows"))]
    return "neo4j-mcp";
}

fn unsupported(os: &str, arch: &str) -> InstallerError {
    InstallerError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    }
}
