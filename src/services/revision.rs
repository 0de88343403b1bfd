use std::path::Path;
use tokio::process::Command;

/// Cache file written by deploy tooling at the deploy root; read-only here.
const REVISION_FILE: &str = "REVISION";
const SHORT_LEN: usize = 12;

/// The deployed revision, as far as it could be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    pub full: Option<String>,
    pub short: Option<String>,
}

/// Best-effort revision lookup: the cache file wins, then `git rev-parse`.
/// Every failure path collapses to `None`; this never errors and never
/// caches across calls.
pub async fn resolve(deploy_root: &Path) -> Revision {
    let mut full = read_cached(deploy_root).await;
    if full.is_none() {
        full = git_output(deploy_root, &["rev-parse", "HEAD"]).await;
    }

    let short = match &full {
        Some(sha) => Some(sha.chars().take(SHORT_LEN).collect()),
        None => {
            let short_arg = format!("--short={}", SHORT_LEN);
            git_output(deploy_root, &["rev-parse", &short_arg, "HEAD"]).await
        }
    };

    Revision { full, short }
}

async fn read_cached(deploy_root: &Path) -> Option<String> {
    let contents = tokio::fs::read_to_string(deploy_root.join(REVISION_FILE))
        .await
        .ok()?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    #[tokio::test]
    async fn cache_file_provides_both_forms() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(REVISION_FILE), format!("{}\n", SAMPLE_SHA)).unwrap();

        let revision = resolve(dir.path()).await;
        assert_eq!(revision.full.as_deref(), Some(SAMPLE_SHA));
        assert_eq!(revision.short.as_deref(), Some("0123456789ab"));
    }

    #[tokio::test]
    async fn short_is_derived_from_short_cache_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(REVISION_FILE), "abc123").unwrap();

        let revision = resolve(dir.path()).await;
        assert_eq!(revision.full.as_deref(), Some("abc123"));
        assert_eq!(revision.short.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn whitespace_only_cache_file_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(REVISION_FILE), "  \n").unwrap();

        // No repository under the temp dir either, so both lookups miss.
        let revision = resolve(dir.path()).await;
        assert_eq!(revision, Revision::default());
    }

    #[tokio::test]
    async fn missing_cache_and_missing_repo_yield_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let revision = resolve(dir.path()).await;
        assert!(revision.full.is_none());
        assert!(revision.short.is_none());
    }
}
