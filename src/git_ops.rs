use anyhow::{Context, Result};
use git2::{Repository, Signature, Time};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const FALLBACK_NAME: &str = "Study Planner";
const FALLBACK_EMAIL: &str = "study-planner@localhost";

/// Records every snapshot write as a commit in the enclosing repository
pub struct GitOps {
    repo: Option<Mutex<Repository>>,
}

impl GitOps {
    /// Look for a repository enclosing the snapshot location `path`
    pub fn new(path: &Path) -> Self {
        let dir = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };
        let repo = Repository::discover(dir).ok().map(Mutex::new);
        if repo.is_none() {
            log::debug!("{} is not inside a git repository", dir.display());
        }
        Self { repo }
    }

    /// Whether snapshot writes will be committed
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    /// Commit the current contents of one snapshot file
    ///
    /// A no-op when no repository was found.
    pub fn commit(&self, snapshot: &Path, message: &str) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };
        let repo = repo
            .lock()
            .map_err(|_| anyhow::anyhow!("Snapshot repository lock poisoned"))?;

        let entry = Self::snapshot_entry(&repo, snapshot)?;
        let mut index = repo.index()?;
        index.add_path(&entry)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        // None on an unborn branch
        let parent = match repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .context("Snapshot history HEAD is not a commit")?,
            ),
            Err(_) => None,
        };
        let parents: Vec<_> = parent.iter().collect();

        let author = Self::snapshot_signature(&repo)?;
        repo.commit(Some("HEAD"), &author, &author, message, &tree, &parents)?;

        log::debug!("snapshot {} committed: {}", entry.display(), message);
        Ok(())
    }

    /// Path of `snapshot` relative to the repository working directory
    fn snapshot_entry(repo: &Repository, snapshot: &Path) -> Result<PathBuf> {
        let workdir = repo
            .workdir()
            .context("Snapshot repository is bare")?
            .canonicalize()
            .context("Failed to resolve snapshot repository directory")?;
        let snapshot = snapshot
            .canonicalize()
            .with_context(|| format!("Failed to resolve snapshot {}", snapshot.display()))?;
        snapshot
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .with_context(|| {
                format!(
                    "Snapshot {} is outside {}",
                    snapshot.display(),
                    workdir.display()
                )
            })
    }

    /// Commit author for snapshots: the repository's user, else the planner itself
    fn snapshot_signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| FALLBACK_NAME.to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| FALLBACK_EMAIL.to_string());

        Signature::now(&name, &email).or_else(|_| {
            Signature::new(&name, &email, &Time::new(1_700_000_000, 0))
                .context("Failed to build snapshot commit signature")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        (temp_dir, repo)
    }

    #[test]
    fn test_non_git_directory() {
        let temp_dir = TempDir::new().unwrap();
        let git_ops = GitOps::new(temp_dir.path());
        assert!(!git_ops.is_git_managed());

        // commit outside a repository is a no-op
        let file_path = temp_dir.path().join("focusSessions.json");
        fs::write(&file_path, "[]").unwrap();
        assert!(git_ops.commit(&file_path, "Update focusSessions").is_ok());
    }

    #[test]
    fn test_first_commit_on_unborn_branch() {
        let (temp_dir, repo) = setup_test_repo();
        let file_path = temp_dir.path().join("studentPlannerData.json");
        fs::write(&file_path, "[]").unwrap();

        let git_ops = GitOps::new(temp_dir.path());
        assert!(git_ops.is_git_managed());
        git_ops
            .commit(&file_path, "Update studentPlannerData")
            .unwrap();

        let head = repo.head().unwrap();
        let commit = repo.find_commit(head.target().unwrap()).unwrap();
        assert_eq!(commit.message().unwrap(), "Update studentPlannerData");
        assert_eq!(commit.parent_count(), 0);
        assert_eq!(commit.author().name(), Some("Test User"));
    }

    #[test]
    fn test_snapshot_outside_workdir_is_rejected() {
        let (temp_dir, _repo) = setup_test_repo();
        let elsewhere = TempDir::new().unwrap();
        let file_path = elsewhere.path().join("studentPlannerEvents.json");
        fs::write(&file_path, "[]").unwrap();

        let git_ops = GitOps::new(temp_dir.path());
        let err = git_ops.commit(&file_path, "Update studentPlannerEvents").unwrap_err();
        assert!(err.to_string().contains("is outside"));
    }
}
