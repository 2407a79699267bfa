//! Fake release artifacts for tests
//!
//! Everything is built in memory so tests never touch the real GitHub
//! releases. Serve the bytes from a `mockito` server.

use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};

/// Contents of the fake `neo4j-mcp` executable placed in archives
pub const FAKE_BINARY: &[u8] = b"#!/bin/sh\necho 'neo4j-mcp test build'\n";

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Builds a `.tar.gz` containing `binary_name` (optionally under a directory)
/// plus a README, mirroring the layout of published release archives.
pub fn tar_gz_with_binary(binary_name: &str, nested: bool) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut tar = tar::Builder::new(encoder);

    let binary_path = if nested {
        format!("neo4j-mcp/{}", binary_name)
    } else {
        binary_name.to_string()
    };

    append_tar_file(&mut tar, "README.md", b"# neo4j-mcp\n", 0o644);
    append_tar_file(&mut tar, &binary_path, FAKE_BINARY, 0o644);

    let encoder = tar.into_inner().expect("Failed to finish tar archive");
    encoder.finish().expect("Failed to finish gzip stream")
}

fn append_tar_file<W: Write>(tar: &mut tar::Builder<W>, path: &str, data: &[u8], mode: u32) {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();
    tar.append_data(&mut header, path, data)
        .expect("Failed to append tar entry");
}

/// Builds a `.zip` containing `binary_name` (optionally under a directory)
pub fn zip_with_binary(binary_name: &str, nested: bool) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    let binary_path = if nested {
        format!("neo4j-mcp/{}", binary_name)
    } else {
        binary_name.to_string()
    };

    zip.start_file("README.md", options)
        .expect("Failed to start zip entry");
    zip.write_all(b"# neo4j-mcp\n")
        .expect("Failed to write zip entry");
    zip.start_file(binary_path.as_str(), options)
        .expect("Failed to start zip entry");
    zip.write_all(FAKE_BINARY).expect("Failed to write zip entry");

    zip.finish().expect("Failed to finish zip").into_inner()
}

/// Checksums file in the block layout published upstream:
///
/// ```text
/// neo4j-mcp_Linux_x86_64.tar.gz
/// sha256:<hash>
/// ```
pub fn checksums_block<N: AsRef<str>, H: AsRef<str>>(entries: &[(N, H)]) -> String {
    entries
        .iter()
        .map(|(name, hash)| format!("{}\nsha256:{}\n", name.as_ref(), hash.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checksums file in `sha256sum` layout: `<hash>  <name>`
pub fn checksums_coreutils<H: AsRef<str>, N: AsRef<str>>(entries: &[(H, N)]) -> String {
    entries
        .iter()
        .map(|(hash, name)| format!("{}  {}\n", hash.as_ref(), name.as_ref()))
        .collect()
}

/// GitHub release API payload with the given assets `(name, url, size)`
pub fn release_json(tag: &str, assets: &[(&str, &str, u64)]) -> String {
    let assets: Vec<_> = assets
        .iter()
        .map(|(name, url, size)| {
            serde_json::json!({
                "name": name,
                "browser_download_url": url,
                "size": size,
            })
        })
        .collect();

    serde_json::json!({
        "tag_name": tag,
        "assets": assets,
    })
    .to_string()
}
