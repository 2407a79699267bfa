pub mod archive;
pub mod download;
pub mod installer;
pub mod locate;
pub mod platform;
pub mod verify;

// Re-export for convenience
pub use archive::{ExtractedBinary, extract_binary};
pub use download::{Downloader, FetchOptions, FetchedArchive, ProgressFn};
pub use installer::{InstallOutcome, Installer, UninstallReport};
pub use locate::{AssetDescriptor, asset_name, checksums_file_name, locate};
pub use platform::{Arch, ArchiveKind, Os, SUPPORTED_TARGETS, Target, host_binary_name};
pub use verify::{Verification, Verifier, compute_sha256, expected_sha_from_checksums};
